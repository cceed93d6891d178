//! Anchors module - Find delimited keywords and title anchors in text
//!
//! A title is written between book-title marks, e.g. `《公司法》`. Marks may
//! nest, as in `《关于《公司法》的解释》`, and any literal pair can be used.

pub mod paired;
pub mod title;
