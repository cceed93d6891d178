//! Enrichment pipeline
//!
//! tree → flatten → chunk by sentence → extract titles per chunk → shift to
//! absolute offsets → associate with text nodes.

use serde::Serialize;

use crate::anchors::title::TitleExtractor;
use crate::config::EnrichConfig;
use crate::core::span::{Anchor, AnchorId};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::document::flatten::{flatten, TextNode};
use crate::document::tree::DocumentNode;
use crate::enrich::associate::{associate, AssociationReport};
use crate::enrich::split::SentenceSplitter;
use crate::error::ConfigError;

/// A document's text nodes annotated with the anchors found in them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichedDocument {
    /// Flattened plain text; every offset below points into it
    pub content: String,
    pub nodes: Vec<TextNode>,
    /// Every anchor found, attached or not
    pub anchors: Vec<Anchor>,
    pub report: AssociationReport,
}

impl EnrichedDocument {
    pub fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.get(id.0)
    }

    /// Anchors attached to `node`
    pub fn anchors_of<'a>(&'a self, node: &'a TextNode) -> impl Iterator<Item = &'a Anchor> {
        node.anchors.iter().filter_map(move |id| self.anchor(*id))
    }

    /// Anchors that could not be attached to any text node
    pub fn unattached(&self) -> impl Iterator<Item = &Anchor> {
        self.report.missed.iter().filter_map(move |id| self.anchor(*id))
    }
}

/// Reusable, immutable enrichment pipeline
#[derive(Debug, Clone)]
pub struct Enricher {
    titles: TitleExtractor,
    splitter: SentenceSplitter,
    ignore_tags: Vec<String>,
}

impl Enricher {
    pub fn new(config: &EnrichConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            titles: TitleExtractor::new(config.pairs.iter().cloned(), config.nested_titles)?,
            splitter: SentenceSplitter::new(&config.sentence_delimiters)?,
            ignore_tags: config.ignore_tags.clone(),
        })
    }

    /// Extract anchors sentence by sentence, in absolute content offsets
    pub fn extract_anchors(&self, content: &str, sink: &mut dyn DiagnosticSink) -> Vec<Anchor> {
        let mut anchors: Vec<Anchor> = Vec::new();

        for chunk in self.splitter.split(content) {
            let base = anchors.len();
            let mut shifted = |d: Diagnostic| sink.report(d.shifted(chunk.start_index));
            let found = self.titles.extract_with(chunk.text, &mut shifted);

            anchors.extend(found.into_iter().map(|mut anchor| {
                anchor.shift(chunk.start_index);
                anchor.parent = anchor.parent.map(|parent| AnchorId(parent.0 + base));
                anchor
            }));
        }

        anchors
    }

    /// Enrich the subtree rooted at `root`
    pub fn enrich<N: DocumentNode>(&self, root: &N, sink: &mut dyn DiagnosticSink) -> EnrichedDocument {
        let flat = flatten(root, self.ignore_tags.as_slice());
        let mut nodes = flat.nodes;
        let anchors = self.extract_anchors(&flat.content, sink);
        let report = associate(&mut nodes, &anchors, sink);

        tracing::debug!(
            nodes = nodes.len(),
            anchors = anchors.len(),
            attached = report.attached,
            missed = report.missed.len(),
            "enriched document"
        );

        EnrichedDocument {
            content: flat.content,
            nodes,
            anchors,
            report,
        }
    }

    /// Enrich many documents in parallel, one document per task
    ///
    /// Diagnostics go to `tracing`.
    #[cfg(feature = "parallel")]
    pub fn enrich_all<N>(&self, roots: &[N]) -> Vec<EnrichedDocument>
    where
        N: DocumentNode + Sync,
    {
        use crate::diagnostics::TracingSink;
        use rayon::prelude::*;

        roots
            .par_iter()
            .map(|root| self.enrich(root, &mut TracingSink))
            .collect()
    }
}
