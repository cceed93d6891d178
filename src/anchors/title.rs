//! Title anchor extraction
//!
//! Titles are the spans enclosed by book-title marks, e.g. `《中华人民共和国公司法》`.
//! By default only the outermost titles become anchors; nested titles can be
//! kept as well, in which case they point at their enclosing title.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::anchors::paired::PairedKeywordExtractor;
use crate::config::DelimiterPair;
use crate::core::span::{Anchor, AnchorId, AnchorType, PairedKeyword, PairedKeywords};
use crate::diagnostics::{DiagnosticSink, Discard};
use crate::error::ConfigError;

/// Trailing parenthesised revision tag with a year, e.g. `(2023修正)` or `（2018年修订）`
static VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[(（]\s*([^()（）]*\d{4}[^()（）]*?)\s*[)）]\s*$")
        .expect("Invalid VERSION_RE regex")
});

/// Extracts [`AnchorType::Title`] anchors from content
#[derive(Debug, Clone)]
pub struct TitleExtractor {
    extractor: PairedKeywordExtractor,
    nested: bool,
}

impl Default for TitleExtractor {
    fn default() -> Self {
        Self {
            extractor: PairedKeywordExtractor::new([DelimiterPair::title_marks()])
                .expect("book-title marks are a valid pair"),
            nested: false,
        }
    }
}

impl TitleExtractor {
    pub fn new<I>(pairs: I, nested: bool) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<DelimiterPair>,
    {
        Ok(Self {
            extractor: PairedKeywordExtractor::new(pairs)?,
            nested,
        })
    }

    pub fn extract(&self, content: &str) -> Vec<Anchor> {
        self.extract_with(content, &mut Discard)
    }

    /// Extract titles, reporting unresolved delimiters to `sink`
    ///
    /// In nested mode every anchor's `parent` is a handle into the returned
    /// list itself.
    pub fn extract_with(&self, content: &str, sink: &mut dyn DiagnosticSink) -> Vec<Anchor> {
        let keywords = self.extractor.extract_with(content, sink);
        if self.nested {
            self.all_titles(&keywords)
        } else {
            keywords
                .roots()
                .map(|(_, keyword)| title_anchor(keyword))
                .collect()
        }
    }

    fn all_titles(&self, keywords: &PairedKeywords) -> Vec<Anchor> {
        // Arena handles and anchor handles line up one to one.
        keywords
            .iter()
            .map(|(_, keyword)| {
                let mut anchor = title_anchor(keyword);
                anchor.parent = keyword.parent.map(|parent| AnchorId(parent.0));
                anchor
            })
            .collect()
    }
}

fn title_anchor(keyword: &PairedKeyword) -> Anchor {
    let anchor = Anchor::new(
        keyword.value(),
        keyword.keyword.start_index,
        keyword.keyword.end_index,
        AnchorType::Title,
    );
    match title_version(keyword.inner()) {
        Some(version) => anchor.with_version(version),
        None => anchor,
    }
}

/// Revision tag at the end of a title, if any
pub fn title_version(title: &str) -> Option<&str> {
    VERSION_RE
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|version| !version.is_empty())
}
