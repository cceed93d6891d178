//! Sentence splitting
//!
//! Content is cut after every sentence delimiter so extraction runs on short,
//! local chunks. Each delimiter stays at the end of its chunk and each chunk
//! remembers where it starts, so chunk offsets can be turned back into
//! absolute content offsets.

use regex::Regex;
use serde::Serialize;

use crate::core::span::Spanned;
use crate::error::ConfigError;

/// A piece of content ending with a sentence delimiter (or the content end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chunk<'a> {
    pub text: &'a str,
    pub start_index: usize,
}

impl Spanned for Chunk<'_> {
    fn start_index(&self) -> usize {
        self.start_index
    }

    fn end_index(&self) -> usize {
        self.start_index + self.text.len()
    }
}

/// Splits content after any of a set of delimiter literals
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    pattern: Option<Regex>,
}

impl SentenceSplitter {
    /// Build a splitter; an empty delimiter set keeps content whole
    pub fn new<I, S>(delimiters: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut literals = Vec::new();
        for (index, delimiter) in delimiters.into_iter().enumerate() {
            let delimiter = delimiter.as_ref();
            if delimiter.is_empty() {
                return Err(ConfigError::EmptySentenceDelimiter { index });
            }
            literals.push(delimiter.to_string());
        }

        if literals.is_empty() {
            return Ok(Self { pattern: None });
        }

        literals.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        literals.dedup();
        let alternation = literals
            .iter()
            .map(|literal| regex::escape(literal))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&alternation).map_err(|e| ConfigError::Pattern(e.to_string()))?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Split `content` into chunks whose concatenation is `content`
    pub fn split<'a>(&self, content: &'a str) -> Vec<Chunk<'a>> {
        if content.is_empty() {
            return Vec::new();
        }

        let Some(pattern) = &self.pattern else {
            return vec![Chunk {
                text: content,
                start_index: 0,
            }];
        };

        let mut chunks = Vec::new();
        let mut start = 0;
        for m in pattern.find_iter(content) {
            chunks.push(Chunk {
                text: &content[start..m.end()],
                start_index: start,
            });
            start = m.end();
        }

        // Ensure the last sentence is not missed
        if start < content.len() {
            chunks.push(Chunk {
                text: &content[start..],
                start_index: start,
            });
        }

        chunks
    }
}
