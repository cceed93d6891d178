//! Document trees and their flattened text

pub mod flatten;
pub mod tree;
