//! Profit optimization over stall count and price.
//!
//! A grid of `(N, p)` pairs is enumerated from [`GridSearchConfig`], each
//! point is averaged over Monte Carlo replicates by
//! [`monte_carlo::evaluate_point`], and the most profitable point meeting
//! the optional service thresholds is reported.

pub mod config;
mod grid_search;
pub mod monte_carlo;
pub mod seed;

pub use config::{GridSearchConfig, PriceGrid, StallRange};
pub use grid_search::{
    GridSearchOutcome, ProgressFn, run_grid_search, run_grid_search_with_cancel, select_best,
};
pub use monte_carlo::{GridPointResult, evaluate_point};
