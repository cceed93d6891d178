//! Enrichment: sentence chunking, anchor extraction and association with
//! the text nodes of a document

pub mod associate;
pub mod pipeline;
pub mod split;
