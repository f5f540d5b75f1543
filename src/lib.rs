//! Profit optimizer for an EV charging station.
//!
//! Simulates a year of arrivals, queueing, and charging for each candidate
//! stall count and price, averages the results over Monte Carlo
//! replicates, and reports the most profitable configuration that meets
//! the optional service-level thresholds.

pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod optimize;
pub mod reporting;
/// Year simulator, demand model, and station state.
pub mod sim;
pub mod stats;
pub mod worker;

pub use config::ScenarioConfig;
pub use error::{ConfigError, Error, Result};
pub use optimize::{
    GridPointResult, GridSearchConfig, GridSearchOutcome, ProgressFn, run_grid_search,
    run_grid_search_with_cancel, select_best,
};
pub use sim::{SimRunKpis, StationParams, StationRng, simulate_year};
