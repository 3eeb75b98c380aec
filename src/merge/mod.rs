//! PDF merge operations.

pub mod merger;

pub use merger::{MergeSummary, Merger};
