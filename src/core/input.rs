//! Reading input text
//!
//! Commands take a file path, or `-` for stdin. Invalid UTF-8 is replaced
//! with U+FFFD and byte offsets in results refer to the repaired text.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Path that selects stdin
pub const STDIN: &str = "-";

/// Where input text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str() == STDIN {
            InputSource::Stdin
        } else {
            InputSource::File(path.to_path_buf())
        }
    }

    /// Display name used in log lines and error messages
    pub fn name(&self) -> String {
        match self {
            InputSource::Stdin => "<stdin>".to_string(),
            InputSource::File(path) => path.display().to_string(),
        }
    }

    /// Read all of the input as text
    pub fn read(&self) -> Result<String> {
        let bytes = match self {
            InputSource::Stdin => {
                let mut buffer = Vec::new();
                std::io::stdin()
                    .lock()
                    .read_to_end(&mut buffer)
                    .map_err(|source| Error::Io {
                        path: PathBuf::from(STDIN),
                        source,
                    })?;
                buffer
            }
            InputSource::File(path) => fs::read(path).map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })?,
        };

        Ok(decode(bytes, &self.name()))
    }
}

/// Read text from `path`, or from stdin when `path` is `-`
pub fn read_text(path: &Path) -> Result<String> {
    InputSource::from_path(path).read()
}

fn decode(bytes: Vec<u8>, name: &str) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(
                input = name,
                valid_up_to = err.utf8_error().valid_up_to(),
                "lossy UTF-8 conversion applied (some characters replaced)"
            );
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}
