//! Command handlers
//!
//! Each handler reads its input, maps what the library produced to a
//! [`ResultSet`] and prints it. Diagnostics become items of their own and are
//! logged to stderr as well.

use anyhow::{Context, Result};
use std::path::Path;

use crate::anchors::paired::PairedKeywordExtractor;
use crate::anchors::title::TitleExtractor;
use crate::config::EnrichConfig;
use crate::core::input::{read_text, InputSource};
use crate::core::model::{ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::span::{Anchor, KeywordId};
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::document::flatten::flatten;
use crate::document::tree::Element;
use crate::enrich::pipeline::Enricher;
use crate::enrich::split::SentenceSplitter;

/// Sink that logs every diagnostic and keeps a copy for the output
#[derive(Debug, Default)]
struct Collector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink for Collector {
    fn report(&mut self, diagnostic: Diagnostic) {
        TracingSink.report(diagnostic.clone());
        self.diagnostics.push(diagnostic);
    }
}

impl Collector {
    fn into_items(self) -> impl Iterator<Item = ResultItem> {
        self.diagnostics
            .into_iter()
            .map(|diagnostic| ResultItem::diagnostic(&diagnostic))
    }
}

/// Paired keywords of `text`, in arena order, followed by diagnostics
pub fn extract_items(text: &str, config: &EnrichConfig) -> Result<ResultSet> {
    config.validate()?;
    let extractor = PairedKeywordExtractor::new(config.pairs.iter().cloned())?;

    let mut collector = Collector::default();
    let keywords = extractor.extract_with(text, &mut collector);

    let mut result_set = ResultSet::new();
    result_set.extend((0..keywords.len()).map(|i| ResultItem::keyword(&keywords, KeywordId(i))));
    result_set.extend(collector.into_items());
    Ok(result_set)
}

/// Title anchors of `text`, followed by diagnostics
pub fn title_items(text: &str, config: &EnrichConfig) -> Result<ResultSet> {
    config.validate()?;
    let titles = TitleExtractor::new(config.pairs.iter().cloned(), config.nested_titles)?;

    let mut collector = Collector::default();
    let anchors = titles.extract_with(text, &mut collector);

    let mut result_set = ResultSet::new();
    result_set.extend(anchor_items(&anchors));
    result_set.extend(collector.into_items());
    Ok(result_set)
}

/// Sentence chunks of `text`
pub fn split_items(text: &str, config: &EnrichConfig) -> Result<ResultSet> {
    let splitter = SentenceSplitter::new(&config.sentence_delimiters)?;

    let mut result_set = ResultSet::new();
    result_set.extend(
        splitter
            .split(text)
            .iter()
            .enumerate()
            .map(|(i, chunk)| ResultItem::chunk(i, chunk)),
    );
    Ok(result_set)
}

/// Text nodes of `root`
pub fn flatten_items(root: &Element, config: &EnrichConfig) -> ResultSet {
    let flat = flatten(root, config.ignore_tags.as_slice());

    let mut result_set = ResultSet::new();
    result_set.extend(flat.nodes.iter().map(|node| ResultItem::text_node(node, &[])));
    result_set
}

/// Text nodes of `root` with their attached anchors, then every anchor, then
/// diagnostics
pub fn enrich_items(root: &Element, config: &EnrichConfig) -> Result<ResultSet> {
    let enricher = Enricher::new(config)?;

    let mut collector = Collector::default();
    let doc = enricher.enrich(root, &mut collector);

    let mut result_set = ResultSet::new();
    result_set.extend(
        doc.nodes
            .iter()
            .map(|node| ResultItem::text_node(node, &doc.anchors)),
    );
    result_set.extend(anchor_items(&doc.anchors));
    result_set.extend(collector.into_items());
    Ok(result_set)
}

fn anchor_items(anchors: &[Anchor]) -> impl Iterator<Item = ResultItem> + '_ {
    anchors
        .iter()
        .enumerate()
        .map(|(i, anchor)| ResultItem::anchor(i, anchor))
}

fn read_input(path: &Path) -> Result<String> {
    read_text(path).with_context(|| {
        format!(
            "Failed to read input {}",
            InputSource::from_path(path).name()
        )
    })
}

fn read_tree(path: &Path) -> Result<Element> {
    let json = read_input(path)?;
    Element::from_json_str(&json).with_context(|| {
        format!(
            "Failed to parse element tree {}",
            InputSource::from_path(path).name()
        )
    })
}

/// How results are written to stdout
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub render: RenderConfig,
    /// Longest excerpt emitted per item, in bytes
    pub max_bytes: usize,
}

impl Output {
    fn print(&self, mut result_set: ResultSet) -> Result<()> {
        result_set.truncate_excerpts(self.max_bytes);
        Renderer::with_config(self.render)
            .render_to(&result_set, std::io::stdout().lock())
            .context("Failed to write output")
    }
}

pub fn run_extract(input: &Path, config: &EnrichConfig, output: Output) -> Result<()> {
    let text = read_input(input)?;
    output.print(extract_items(&text, config)?)
}

pub fn run_titles(input: &Path, config: &EnrichConfig, output: Output) -> Result<()> {
    let text = read_input(input)?;
    output.print(title_items(&text, config)?)
}

pub fn run_split(input: &Path, config: &EnrichConfig, output: Output) -> Result<()> {
    let text = read_input(input)?;
    output.print(split_items(&text, config)?)
}

pub fn run_flatten(tree: &Path, config: &EnrichConfig, output: Output) -> Result<()> {
    let root = read_tree(tree)?;
    output.print(flatten_items(&root, config))
}

pub fn run_enrich(tree: &Path, config: &EnrichConfig, output: Output) -> Result<()> {
    let root = read_tree(tree)?;
    output.print(enrich_items(&root, config)?)
}
