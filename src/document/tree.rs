//! Document tree protocol
//!
//! The core never parses markup. Callers hand in any tree that exposes, per
//! element, its tag, its own leading text, its trailing ("tail") text and its
//! ordered children, the same shape an XML element tree has. [`Element`] is
//! an owned implementation that can be built in code or read from JSON:
//!
//! ```json
//! { "tag": "p", "text": "A《B", "children": [
//!     { "tag": "em", "text": "C", "tail": "D》" }
//! ] }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Read access to one element of an externally parsed document tree
pub trait DocumentNode {
    type Children<'a>: Iterator<Item = &'a Self>
    where
        Self: 'a;

    fn tag(&self) -> &str;

    /// Text before the first child
    fn text(&self) -> Option<&str>;

    /// Text after this element's end tag, owned by the parent
    fn tail(&self) -> Option<&str>;

    fn children(&self) -> Self::Children<'_>;
}

/// Owned document element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tail: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = Some(tail.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Read an element tree from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl DocumentNode for Element {
    type Children<'a> = std::slice::Iter<'a, Element>;

    fn tag(&self) -> &str {
        &self.tag
    }

    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn tail(&self) -> Option<&str> {
        self.tail.as_deref()
    }

    fn children(&self) -> Self::Children<'_> {
        self.children.iter()
    }
}
