//! Unified Result Model
//!
//! Every command maps what it produced (keywords, anchors, chunks, text
//! nodes, diagnostics) to this model before rendering output.

use serde::{Deserialize, Serialize};

use crate::core::span::{Anchor, AnchorType, KeywordId, PairedKeywords};
use crate::core::util::truncate_string;
use crate::diagnostics::Diagnostic;
use crate::document::flatten::{FragmentKind, TextNode};
use crate::enrich::split::Chunk;

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Keyword,
    Anchor,
    Chunk,
    TextNode,
    Diagnostic,
}

/// Byte-based range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeByte {
    pub start: usize,
    pub end: usize,
}

impl RangeByte {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Position of the item in its own list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<usize>,

    /// Position of the enclosing item, for nested keywords and anchors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_type: Option<AnchorType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Pre-order element index of a text node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<FragmentKind>,

    /// Whether the excerpt was truncated
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

/// Error information for a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemError {
    pub code: String,
    pub message: String,
}

impl ItemError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands must produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Byte range within the content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeByte>,

    /// Text of the item (may be truncated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured data payload, e.g. the anchors attached to a text node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Metadata
    pub meta: Meta,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ItemError>,
}

impl ResultItem {
    fn new(kind: Kind) -> Self {
        Self {
            kind,
            range: None,
            excerpt: None,
            data: None,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a paired keyword result
    pub fn keyword(keywords: &PairedKeywords, id: KeywordId) -> Self {
        let keyword = &keywords[id];
        let mut item = Self::new(Kind::Keyword);
        item.range = Some(RangeByte::new(
            keyword.keyword.start_index,
            keyword.keyword.end_index,
        ));
        item.excerpt = Some(keyword.value().to_string());
        item.meta.id = Some(id.0);
        item.meta.parent = keyword.parent.map(|parent| parent.0);
        if !keyword.children.is_empty() {
            item.data = Some(serde_json::json!({ "children": keyword.children }));
        }
        item
    }

    /// Create an anchor result
    pub fn anchor(id: usize, anchor: &Anchor) -> Self {
        let mut item = Self::new(Kind::Anchor);
        item.range = Some(RangeByte::new(anchor.start_index, anchor.end_index));
        item.excerpt = Some(anchor.value.clone());
        item.meta.id = Some(id);
        item.meta.parent = anchor.parent.map(|parent| parent.0);
        item.meta.anchor_type = Some(anchor.kind);
        item.meta.version = anchor.version.clone();
        item
    }

    /// Create a sentence chunk result
    pub fn chunk(id: usize, chunk: &Chunk<'_>) -> Self {
        let mut item = Self::new(Kind::Chunk);
        item.range = Some(RangeByte::new(
            chunk.start_index,
            chunk.start_index + chunk.text.len(),
        ));
        item.excerpt = Some(chunk.text.to_string());
        item.meta.id = Some(id);
        item
    }

    /// Create a text node result, embedding the anchors attached to it
    pub fn text_node(node: &TextNode, anchors: &[Anchor]) -> Self {
        let mut item = Self::new(Kind::TextNode);
        item.range = Some(RangeByte::new(node.start_index, node.end_index));
        item.excerpt = Some(node.value.clone());
        item.meta.node_id = Some(node.node_id);
        item.meta.parent = node.parent_id;
        item.meta.tag = Some(node.tag.clone());
        item.meta.fragment = Some(node.kind);
        if !node.anchors.is_empty() {
            let attached: Vec<_> = node
                .anchors
                .iter()
                .filter_map(|id| anchors.get(id.0).map(|anchor| (id, anchor)))
                .map(|(id, anchor)| {
                    serde_json::json!({
                        "id": id,
                        "value": anchor.value,
                        "type": anchor.kind,
                        "start": anchor.start_index,
                        "end": anchor.end_index,
                    })
                })
                .collect();
            item.data = Some(serde_json::json!({ "anchors": attached }));
        }
        item
    }

    /// Create a diagnostic result
    pub fn diagnostic(diagnostic: &Diagnostic) -> Self {
        let mut item = Self::new(Kind::Diagnostic);
        match diagnostic {
            Diagnostic::UnresolvedDelimiter { offset, literal } => {
                item.range = Some(RangeByte::new(*offset, offset + literal.len()));
                item.excerpt = Some(literal.clone());
            }
            Diagnostic::AssociationMiss {
                anchor,
                value,
                start_index,
                end_index,
                ..
            } => {
                item.range = Some(RangeByte::new(*start_index, *end_index));
                item.excerpt = Some(value.clone());
                item.meta.id = Some(anchor.0);
            }
        }
        item.errors
            .push(ItemError::new(diagnostic.code(), diagnostic.to_string()));
        item
    }

    /// Cut the excerpt down to `max_bytes`; the range keeps the full span
    pub fn truncate_excerpt(&mut self, max_bytes: usize) {
        if let Some(excerpt) = &self.excerpt {
            let (truncated, was_truncated) = truncate_string(excerpt, max_bytes);
            if was_truncated {
                self.excerpt = Some(truncated);
                self.meta.truncated = true;
            }
        }
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.items.extend(items);
    }

    /// Apply [`ResultItem::truncate_excerpt`] to every item
    pub fn truncate_excerpts(&mut self, max_bytes: usize) {
        for item in &mut self.items {
            item.truncate_excerpt(max_bytes);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
