//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Span records, paired keywords and anchors
//! - The frozen sorted map used for offset lookups
//! - Unified result model (ResultItem)
//! - Rendering functions for different output formats
//! - Input reading and common utilities

pub mod input;
pub mod model;
pub mod navigable;
pub mod render;
pub mod span;
pub mod util;
