//! File output for grid search results.

pub mod export;
