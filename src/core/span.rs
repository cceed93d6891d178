//! Span model
//!
//! Keywords, paired keywords and anchors all describe a half-open byte range
//! `[start_index, end_index)` over the content they were extracted from.
//! Paired keywords live in a [`PairedKeywords`] arena and refer to each other
//! through [`KeywordId`] handles; anchors refer to their parent through an
//! [`AnchorId`] into the flat anchor list that owns them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Anything that covers a half-open byte range
pub trait Spanned {
    fn start_index(&self) -> usize;

    fn end_index(&self) -> usize;

    /// Length of the span in bytes
    fn span_len(&self) -> usize {
        self.end_index().saturating_sub(self.start_index())
    }

    /// Whether the two spans share at least one byte
    fn overlaps_with<S: Spanned + ?Sized>(&self, other: &S) -> bool {
        self.start_index() < other.end_index() && other.start_index() < self.end_index()
    }

    /// Whether `other` lies entirely within this span
    fn contains<S: Spanned + ?Sized>(&self, other: &S) -> bool {
        self.start_index() <= other.start_index() && self.end_index() >= other.end_index()
    }
}

/// A plain span of text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keyword {
    pub value: String,
    pub start_index: usize,
    pub end_index: usize,
}

impl Keyword {
    pub fn new(value: impl Into<String>, start_index: usize, end_index: usize) -> Self {
        debug_assert!(start_index <= end_index);
        Self {
            value: value.into(),
            start_index,
            end_index,
        }
    }
}

impl Spanned for Keyword {
    fn start_index(&self) -> usize {
        self.start_index
    }

    fn end_index(&self) -> usize {
        self.end_index
    }
}

/// Handle of a [`PairedKeyword`] inside its [`PairedKeywords`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordId(pub usize);

/// A keyword enclosed by an open/close delimiter pair, delimiters included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedKeyword {
    #[serde(flatten)]
    pub keyword: Keyword,

    /// Byte length of the opening delimiter
    #[serde(skip)]
    pub open_len: usize,

    /// Byte length of the closing delimiter
    #[serde(skip)]
    pub close_len: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<KeywordId>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<KeywordId>,
}

impl PairedKeyword {
    pub fn new(keyword: Keyword, open_len: usize, close_len: usize) -> Self {
        Self {
            keyword,
            open_len,
            close_len,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.keyword.value
    }

    /// The enclosed text without its delimiters
    pub fn inner(&self) -> &str {
        let value = self.value();
        let end = value.len().saturating_sub(self.close_len);
        value.get(self.open_len..end).unwrap_or_default()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl Spanned for PairedKeyword {
    fn start_index(&self) -> usize {
        self.keyword.start_index
    }

    fn end_index(&self) -> usize {
        self.keyword.end_index
    }
}

/// Arena owning every paired keyword of one extraction, sorted by start offset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PairedKeywords {
    items: Vec<PairedKeyword>,
}

impl PairedKeywords {
    /// Build an arena from keywords already sorted and linked by handle
    pub(crate) fn from_sorted(items: Vec<PairedKeyword>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: KeywordId) -> Option<&PairedKeyword> {
        self.items.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (KeywordId, &PairedKeyword)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, keyword)| (KeywordId(i), keyword))
    }

    /// Keywords that are not nested inside another keyword
    pub fn roots(&self) -> impl Iterator<Item = (KeywordId, &PairedKeyword)> {
        self.iter().filter(|(_, keyword)| keyword.is_root())
    }

    pub fn parent(&self, id: KeywordId) -> Option<&PairedKeyword> {
        self.get(id)
            .and_then(|keyword| keyword.parent)
            .and_then(|parent| self.get(parent))
    }

    pub fn children(&self, id: KeywordId) -> impl Iterator<Item = &PairedKeyword> {
        self.get(id)
            .map(|keyword| keyword.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |child| self.get(*child))
    }

    /// Number of ancestors above the keyword
    pub fn depth(&self, id: KeywordId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).and_then(|keyword| keyword.parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.get(parent).and_then(|keyword| keyword.parent);
        }
        depth
    }

    pub fn as_slice(&self) -> &[PairedKeyword] {
        &self.items
    }
}

impl Index<KeywordId> for PairedKeywords {
    type Output = PairedKeyword;

    fn index(&self, id: KeywordId) -> &Self::Output {
        &self.items[id.0]
    }
}

/// Classification of an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorType {
    Date,
    Title,
    IssueNo,
    SelfRef,
    ArticleNo,
    Abbreviation,
    TrialProgress,
}

impl AnchorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnchorType::Date => "date",
            AnchorType::Title => "title",
            AnchorType::IssueNo => "issue_no",
            AnchorType::SelfRef => "self_ref",
            AnchorType::ArticleNo => "article_no",
            AnchorType::Abbreviation => "abbreviation",
            AnchorType::TrialProgress => "trial_progress",
        }
    }
}

impl fmt::Display for AnchorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle of an [`Anchor`] inside the flat anchor list of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorId(pub usize);

/// A classified span destined to become a hyperlink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub value: String,
    pub start_index: usize,
    pub end_index: usize,

    #[serde(rename = "type")]
    pub kind: AnchorType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<AnchorId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Anchor {
    pub fn new(
        value: impl Into<String>,
        start_index: usize,
        end_index: usize,
        kind: AnchorType,
    ) -> Self {
        debug_assert!(start_index <= end_index);
        Self {
            value: value.into(),
            start_index,
            end_index,
            kind,
            parent: None,
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Move the anchor by `offset` bytes
    pub fn shift(&mut self, offset: usize) {
        self.start_index += offset;
        self.end_index += offset;
    }
}

impl Spanned for Anchor {
    fn start_index(&self) -> usize {
        self.start_index
    }

    fn end_index(&self) -> usize {
        self.end_index
    }
}
