//! Document flattening
//!
//! Walks a document tree depth-first in pre-order and emits its text as an
//! ordered list of fragments. An element's own text comes before its
//! children and its tail text after them, which is the natural reading
//! order. Every fragment records its byte range in the concatenation of all
//! fragments, so the concatenation is the plain text of the whole subtree.
//!
//! The walk keeps its own stack, so nesting depth is bounded by memory rather
//! than by the thread stack.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::span::{AnchorId, Spanned};
use crate::core::util::is_blank;
use crate::document::tree::DocumentNode;

/// Whether a fragment is an element's own text or its trailing text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentKind {
    Body,
    Tail,
}

/// A contiguous text run owned by one element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    /// Pre-order index of the element, shared by its body and tail fragments
    pub node_id: usize,

    /// Pre-order index of the element's parent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<usize>,

    pub tag: String,

    pub kind: FragmentKind,

    pub value: String,

    pub start_index: usize,

    pub end_index: usize,

    /// Anchors attached to this fragment
    #[serde(default)]
    pub anchors: Vec<AnchorId>,
}

impl Spanned for TextNode {
    fn start_index(&self) -> usize {
        self.start_index
    }

    fn end_index(&self) -> usize {
        self.end_index
    }
}

/// Flattened text of a document tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Flattened {
    /// Concatenation of every fragment, in emission order
    pub content: String,
    pub nodes: Vec<TextNode>,
}

/// Flatten the subtree rooted at `root`, skipping any element whose tag is in
/// `ignore_tags` together with its descendants and its tail
pub fn flatten<N, S>(root: &N, ignore_tags: &[S]) -> Flattened
where
    N: DocumentNode,
    S: AsRef<str>,
{
    let mut walker = Walker {
        ignore: ignore_tags.iter().map(|tag| tag.as_ref()).collect(),
        next_id: 0,
        out: Flattened::default(),
    };
    walker.walk(root);
    walker.out
}

/// Pending work on the walk stack
enum Step<'n, N> {
    /// Number the element and emit its text, then queue its children
    Enter(&'n N, Option<usize>),
    /// All children are done; emit the tail
    Leave(&'n N, usize, Option<usize>),
}

struct Walker<'a> {
    ignore: HashSet<&'a str>,
    next_id: usize,
    out: Flattened,
}

impl Walker<'_> {
    fn walk<'n, N: DocumentNode>(&mut self, root: &'n N) {
        let mut stack = vec![Step::Enter(root, None)];

        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(node, parent_id) => {
                    if self.ignore.contains(node.tag()) {
                        continue;
                    }

                    let node_id = self.next_id;
                    self.next_id += 1;

                    if let Some(text) = node.text() {
                        self.emit(node, node_id, parent_id, FragmentKind::Body, text);
                    }
                    stack.push(Step::Leave(node, node_id, parent_id));

                    // first child on top
                    let first = stack.len();
                    stack.extend(node.children().map(|child| Step::Enter(child, Some(node_id))));
                    stack[first..].reverse();
                }
                Step::Leave(node, node_id, parent_id) => {
                    if let Some(tail) = node.tail() {
                        self.emit(node, node_id, parent_id, FragmentKind::Tail, tail);
                    }
                }
            }
        }
    }

    fn emit<N: DocumentNode>(
        &mut self,
        node: &N,
        node_id: usize,
        parent_id: Option<usize>,
        kind: FragmentKind,
        text: &str,
    ) {
        if is_blank(text) {
            return;
        }

        let start_index = self.out.content.len();
        self.out.content.push_str(text);
        self.out.nodes.push(TextNode {
            node_id,
            parent_id,
            tag: node.tag().to_string(),
            kind,
            value: text.to_string(),
            start_index,
            end_index: self.out.content.len(),
            anchors: Vec::new(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::tree::Element;

    fn fragments(flat: &Flattened) -> Vec<(usize, FragmentKind, &str)> {
        flat.nodes
            .iter()
            .map(|n| (n.node_id, n.kind, n.value.as_str()))
            .collect()
    }

    /// `<p>A《B<em>C</em>D》<br/>E</p>`
    fn inline_paragraph() -> Element {
        Element::new("p")
            .with_text("A《B")
            .with_child(Element::new("em").with_text("C").with_tail("D》"))
            .with_child(Element::new("br").with_tail("E"))
    }

    #[test]
    fn test_reading_order() {
        let flat = flatten(&inline_paragraph(), &[] as &[&str]);

        assert_eq!(
            fragments(&flat),
            vec![
                (0, FragmentKind::Body, "A《B"),
                (1, FragmentKind::Body, "C"),
                (1, FragmentKind::Tail, "D》"),
                (2, FragmentKind::Tail, "E"),
            ]
        );
        assert_eq!(flat.content, "A《BCD》E");
        assert_eq!(flat.nodes[1].parent_id, Some(0));
        assert_eq!(flat.nodes[0].parent_id, None);
    }

    #[test]
    fn test_offsets_tile_the_content() {
        let flat = flatten(&inline_paragraph(), &[] as &[&str]);

        let mut expected_start = 0;
        for node in &flat.nodes {
            assert_eq!(node.start_index, expected_start);
            assert_eq!(&flat.content[node.start_index..node.end_index], node.value);
            expected_start = node.end_index;
        }
        assert_eq!(expected_start, flat.content.len());
    }

    #[test]
    fn test_blank_text_is_skipped() {
        let root = Element::new("doc")
            .with_text("\n  ")
            .with_child(Element::new("p").with_text("one").with_tail("\n"))
            .with_child(Element::new("p").with_text("two"));
        let flat = flatten(&root, &[] as &[&str]);

        assert_eq!(
            fragments(&flat),
            vec![(1, FragmentKind::Body, "one"), (2, FragmentKind::Body, "two")]
        );
        assert_eq!(flat.nodes[0].parent_id, Some(0));
    }

    #[test]
    fn test_ignored_subtree_is_skipped() {
        let root = Element::new("doc")
            .with_child(
                Element::new("note")
                    .with_text("skip me")
                    .with_child(Element::new("p").with_text("nested"))
                    .with_tail("and my tail"),
            )
            .with_child(Element::new("p").with_text("kept"));
        let flat = flatten(&root, &["note"]);

        assert_eq!(fragments(&flat), vec![(1, FragmentKind::Body, "kept")]);
        assert_eq!(flat.content, "kept");
    }

    #[test]
    fn test_pre_order_ids() {
        let root = Element::new("a")
            .with_text("a")
            .with_child(
                Element::new("b")
                    .with_text("b")
                    .with_child(Element::new("c").with_text("c").with_tail("c-tail")),
            )
            .with_child(Element::new("d").with_text("d"));
        let flat = flatten(&root, &[] as &[&str]);

        assert_eq!(
            fragments(&flat),
            vec![
                (0, FragmentKind::Body, "a"),
                (1, FragmentKind::Body, "b"),
                (2, FragmentKind::Body, "c"),
                (2, FragmentKind::Tail, "c-tail"),
                (3, FragmentKind::Body, "d"),
            ]
        );
        assert_eq!(flat.nodes[3].parent_id, Some(1));
        assert_eq!(flat.nodes[4].parent_id, Some(0));
    }

    #[test]
    fn test_deeply_nested_tree() {
        const DEPTH: usize = 200_000;

        let mut root = Element::new("span").with_text("in");
        for _ in 0..DEPTH {
            root = Element::new("span").with_child(root).with_tail("-");
        }

        let flat = flatten(&root, &[] as &[&str]);

        assert_eq!(flat.nodes.len(), DEPTH + 1);
        assert_eq!(flat.nodes[0].value, "in");
        assert_eq!(flat.nodes[0].node_id, DEPTH);
        assert_eq!(flat.nodes[0].parent_id, Some(DEPTH - 1));
        assert_eq!(flat.nodes[DEPTH - 1].node_id, 1);
        assert_eq!(flat.nodes[DEPTH - 1].parent_id, Some(0));
        assert_eq!(flat.nodes[DEPTH].node_id, 0);
        assert_eq!(flat.nodes[DEPTH].kind, FragmentKind::Tail);
        assert_eq!(flat.nodes[DEPTH].parent_id, None);
        assert_eq!(flat.content.len(), 2 + DEPTH);

        // Element drops recursively
        let mut next = Some(root);
        while let Some(mut node) = next {
            next = node.children.pop();
        }
    }
}
