//! Anchor association
//!
//! Anchors are found on the flattened content, so their offsets must be
//! mapped back onto the text fragments they came from. The fragment holding
//! an anchor's first byte is its *head* and the one holding its last byte is
//! its *tail*. When both are the same fragment the anchor simply belongs to
//! it. When they differ, the anchor crosses an element boundary and is
//! attached to both only in two shapes:
//!
//! - nested child: `<p>《B<em>C</em>D》</p>`, where the head is the body text
//!   of an element and the tail is the tail text of one of its children;
//! - sibling tails: `<p><a/>《B<b/>C》</p>`, where head and tail are tail
//!   texts of elements sharing a parent.
//!
//! Every other crossing is reported to the diagnostic sink and left
//! unattached; the anchor itself stays in the flat anchor list.

use serde::Serialize;

use crate::core::navigable::NavigableOrderedMap;
use crate::core::span::{Anchor, AnchorId};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::document::flatten::{FragmentKind, TextNode};

/// Outcome of one association pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssociationReport {
    /// Anchors attached to at least one text node
    pub attached: usize,
    /// Anchors left unattached
    pub missed: Vec<AnchorId>,
}

/// Attach every anchor in `anchors` to the text node(s) it belongs to
///
/// `nodes` must be the flattener's output, ordered by start offset, and the
/// anchor offsets must be in the same coordinate space.
pub fn associate(
    nodes: &mut [TextNode],
    anchors: &[Anchor],
    sink: &mut dyn DiagnosticSink,
) -> AssociationReport {
    let index = FragmentIndex::new(nodes);
    let mut report = AssociationReport::default();

    for (i, anchor) in anchors.iter().enumerate() {
        let id = AnchorId(i);
        let last_byte = if anchor.end_index > anchor.start_index {
            anchor.end_index - 1
        } else {
            anchor.start_index
        };
        let head = index.locate(nodes, anchor.start_index);
        let tail = index.locate(nodes, last_byte);

        match (head, tail) {
            (Some(h), Some(t)) if h == t => {
                nodes[h].anchors.push(id);
                report.attached += 1;
            }
            (Some(h), Some(t)) if crosses_cleanly(&nodes[h], &nodes[t]) => {
                nodes[h].anchors.push(id);
                nodes[t].anchors.push(id);
                report.attached += 1;
            }
            _ => {
                report.missed.push(id);
                sink.report(Diagnostic::AssociationMiss {
                    anchor: id,
                    value: anchor.value.clone(),
                    start_index: anchor.start_index,
                    end_index: anchor.end_index,
                    head: head.map(|h| nodes[h].node_id),
                    tail: tail.map(|t| nodes[t].node_id),
                });
            }
        }
    }

    report
}

/// Text nodes keyed by start offset
struct FragmentIndex {
    by_start: NavigableOrderedMap<usize, usize>,
}

impl FragmentIndex {
    fn new(nodes: &[TextNode]) -> Self {
        Self {
            by_start: nodes
                .iter()
                .enumerate()
                .map(|(i, node)| (node.start_index, i))
                .collect(),
        }
    }

    /// Position of the node whose range holds `offset`
    fn locate(&self, nodes: &[TextNode], offset: usize) -> Option<usize> {
        self.by_start
            .floor_item(&offset)
            .map(|(_, &i)| i)
            .filter(|&i| offset < nodes[i].end_index)
    }
}

/// Whether an anchor opening in `head` and closing in `tail` may attach to both
fn crosses_cleanly(head: &TextNode, tail: &TextNode) -> bool {
    if tail.kind != FragmentKind::Tail {
        return false;
    }
    match head.kind {
        FragmentKind::Body => tail.parent_id == Some(head.node_id),
        FragmentKind::Tail => head.parent_id.is_some() && head.parent_id == tail.parent_id,
    }
}
