//! Diagnostic sink
//!
//! The core never logs on its own. Non-fatal findings such as delimiters left
//! open at the end of a scan, or anchors that could not be attached to a text
//! node, are handed to a caller-supplied [`DiagnosticSink`].

use serde::Serialize;
use std::fmt;

use crate::core::span::AnchorId;

/// A non-fatal finding raised during extraction or association
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Diagnostic {
    /// A delimiter that was still on the stack when the scan ended
    UnresolvedDelimiter { offset: usize, literal: String },

    /// An anchor whose fragments satisfy neither adjacency rule
    AssociationMiss {
        anchor: AnchorId,
        value: String,
        start_index: usize,
        end_index: usize,
        /// Node id of the fragment holding the first byte, if any
        head: Option<usize>,
        /// Node id of the fragment holding the last byte, if any
        tail: Option<usize>,
    },
}

impl Diagnostic {
    pub fn code(&self) -> &'static str {
        match self {
            Diagnostic::UnresolvedDelimiter { .. } => "UNRESOLVED_DELIMITER",
            Diagnostic::AssociationMiss { .. } => "ASSOCIATION_MISS",
        }
    }

    /// Move every offset carried by the diagnostic by `offset` bytes
    pub fn shifted(self, offset: usize) -> Self {
        match self {
            Diagnostic::UnresolvedDelimiter {
                offset: at,
                literal,
            } => Diagnostic::UnresolvedDelimiter {
                offset: at + offset,
                literal,
            },
            Diagnostic::AssociationMiss {
                anchor,
                value,
                start_index,
                end_index,
                head,
                tail,
            } => Diagnostic::AssociationMiss {
                anchor,
                value,
                start_index: start_index + offset,
                end_index: end_index + offset,
                head,
                tail,
            },
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedDelimiter { offset, literal } => {
                write!(f, "unresolved delimiter '{}' at {}", literal, offset)
            }
            Diagnostic::AssociationMiss {
                value,
                start_index,
                end_index,
                head,
                tail,
                ..
            } => {
                let node = |id: &Option<usize>| id.map_or("-".to_string(), |n| n.to_string());
                write!(
                    f,
                    "unable to associate anchor ({}:{}:{}) with a text node (head={}, tail={})",
                    start_index,
                    end_index,
                    value,
                    node(head),
                    node(tail)
                )
            }
        }
    }
}

/// Receiver of diagnostics
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl<F: FnMut(Diagnostic)> DiagnosticSink for F {
    fn report(&mut self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}

/// Sink that drops every diagnostic
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl DiagnosticSink for Discard {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

/// Sink that forwards diagnostics to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::UnresolvedDelimiter { offset, literal } => {
                tracing::debug!(offset, literal = %literal, "{}", diagnostic);
            }
            Diagnostic::AssociationMiss { anchor, .. } => {
                tracing::warn!(anchor = anchor.0, "{}", diagnostic);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink_collects() {
        let mut seen = Vec::new();
        {
            let mut sink = |d: Diagnostic| seen.push(d);
            let sink: &mut dyn DiagnosticSink = &mut sink;
            sink.report(Diagnostic::UnresolvedDelimiter {
                offset: 3,
                literal: "<".to_string(),
            });
        }
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].code(), "UNRESOLVED_DELIMITER");
    }

    #[test]
    fn test_shifted_moves_offsets() {
        let diagnostic = Diagnostic::UnresolvedDelimiter {
            offset: 2,
            literal: "《".to_string(),
        }
        .shifted(10);
        assert_eq!(
            diagnostic,
            Diagnostic::UnresolvedDelimiter {
                offset: 12,
                literal: "《".to_string()
            }
        );
    }

    #[test]
    fn test_display_and_serialize() {
        let miss = Diagnostic::AssociationMiss {
            anchor: AnchorId(4),
            value: "《a》".to_string(),
            start_index: 1,
            end_index: 8,
            head: Some(0),
            tail: None,
        };
        assert_eq!(
            miss.to_string(),
            "unable to associate anchor (1:8:《a》) with a text node (head=0, tail=-)"
        );

        let json = serde_json::to_value(&miss).unwrap();
        assert_eq!(json["code"], "ASSOCIATION_MISS");
        assert_eq!(json["anchor"], 4);
    }
}
