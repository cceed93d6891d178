//! Enrichment configuration
//!
//! Configuration is read from a JSON file and validated before any
//! extraction runs:
//!
//! ```json
//! {
//!   "pairs": [{ "open": "《", "close": "》" }],
//!   "sentence_delimiters": ["。", "？", "！"],
//!   "ignore_tags": ["footnote"],
//!   "nested_titles": false
//! }
//! ```
//!
//! Every field is optional and falls back to [`EnrichConfig::default`].

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{ConfigError, Error, Result};

/// Default sentence delimiters used to chunk content before extraction
pub const DEFAULT_SENTENCE_DELIMITERS: [&str; 3] = ["。", "？", "！"];

/// A literal open/close delimiter pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DelimiterPair {
    pub open: String,
    pub close: String,
}

impl DelimiterPair {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// The book-title marks used for titles
    pub fn title_marks() -> Self {
        Self::new("《", "》")
    }
}

impl<O: Into<String>, C: Into<String>> From<(O, C)> for DelimiterPair {
    fn from((open, close): (O, C)) -> Self {
        Self::new(open, close)
    }
}

/// Parse `OPEN=CLOSE`, e.g. `<=>` or `《=》`
impl FromStr for DelimiterPair {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // The first '=' after the opening literal separates the halves, so
        // "===" parses as open "=" and close "=".
        let split_at = s
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '=')
            .map(|(i, _)| i)
            .ok_or_else(|| ConfigError::MalformedPair(s.to_string()))?;
        let (open, close) = (&s[..split_at], &s[split_at + 1..]);
        if close.is_empty() {
            return Err(ConfigError::MalformedPair(s.to_string()));
        }
        Ok(Self::new(open, close))
    }
}

/// Settings for the enrichment pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    /// Delimiter pairs enclosing titles
    pub pairs: Vec<DelimiterPair>,

    /// Punctuation used to chunk the content before extraction
    pub sentence_delimiters: Vec<String>,

    /// Tags whose whole subtree is skipped while flattening
    pub ignore_tags: Vec<String>,

    /// Emit nested titles as well, linked to their enclosing title
    pub nested_titles: bool,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            pairs: vec![DelimiterPair::title_marks()],
            sentence_delimiters: DEFAULT_SENTENCE_DELIMITERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ignore_tags: Vec::new(),
            nested_titles: false,
        }
    }
}

impl EnrichConfig {
    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration without building anything from it
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.pairs.is_empty() {
            return Err(ConfigError::EmptyPairs);
        }
        for (index, pair) in self.pairs.iter().enumerate() {
            if pair.open.is_empty() {
                return Err(ConfigError::EmptyDelimiter { index, side: "open" });
            }
            if pair.close.is_empty() {
                return Err(ConfigError::EmptyDelimiter {
                    index,
                    side: "close",
                });
            }
        }
        if let Some(index) = self.sentence_delimiters.iter().position(|d| d.is_empty()) {
            return Err(ConfigError::EmptySentenceDelimiter { index });
        }
        Ok(())
    }
}
