//! anchorlink - Locate delimited titles in structured documents
//!
//! anchorlink provides:
//! - A stack-based extractor for nested paired delimiters (`《...》`)
//! - Title anchors with optional revision tags
//! - Flattening of element trees into offset-tracked text nodes
//! - Association of anchors back onto the text nodes they came from
//! - Unified output format (jsonl/json/md/raw) for the CLI

pub mod anchors;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod document;
pub mod enrich;
pub mod error;

pub use crate::anchors::paired::PairedKeywordExtractor;
pub use crate::anchors::title::TitleExtractor;
pub use crate::config::{DelimiterPair, EnrichConfig};
pub use crate::core::navigable::NavigableOrderedMap;
pub use crate::core::span::{
    Anchor, AnchorId, AnchorType, Keyword, KeywordId, PairedKeyword, PairedKeywords, Spanned,
};
pub use crate::diagnostics::{Diagnostic, DiagnosticSink, Discard, TracingSink};
pub use crate::document::flatten::{flatten, Flattened, FragmentKind, TextNode};
pub use crate::document::tree::{DocumentNode, Element};
pub use crate::enrich::associate::{associate, AssociationReport};
pub use crate::enrich::pipeline::{EnrichedDocument, Enricher};
pub use crate::enrich::split::{Chunk, SentenceSplitter};
pub use crate::error::{ConfigError, Error, Result};
