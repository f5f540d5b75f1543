//! Exhaustive search over stall count and price with parallel evaluation.
//!
//! Each grid point is evaluated independently, so points fan out across the
//! rayon pool when the `parallel` feature is on. Results come back in grid
//! order and the best point is chosen afterwards in one sequential scan.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::GridSearchConfig;
use super::monte_carlo::{GridPointResult, evaluate_point};
use crate::error::{Error, Result, ValidationErrors};
use crate::sim::StationParams;

/// Progress callback receiving `(completed, total)` grid points.
pub type ProgressFn<'a> = dyn Fn(usize, usize) + Sync + 'a;

/// Everything a search produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSearchOutcome {
    /// Evaluated points in grid order.
    pub results: Vec<GridPointResult>,
    /// Most profitable feasible point, if any.
    pub best: Option<GridPointResult>,
    /// True if the run stopped before every point was evaluated.
    pub cancelled: bool,
}

impl GridSearchOutcome {
    /// Feasible points under `config`, in grid order.
    pub fn feasible<'a>(
        &'a self,
        config: &'a GridSearchConfig,
    ) -> impl Iterator<Item = &'a GridPointResult> {
        self.results.iter().filter(|r| config.is_feasible(r))
    }
}

/// Most profitable feasible point; on ties the earliest in `results` wins.
pub fn select_best(
    results: &[GridPointResult],
    config: &GridSearchConfig,
) -> Option<GridPointResult> {
    let mut best: Option<&GridPointResult> = None;
    for r in results.iter().filter(|r| config.is_feasible(r)) {
        if best.is_none_or(|b| r.kpis.profit > b.kpis.profit) {
            best = Some(r);
        }
    }
    best.cloned()
}

/// Evaluates every grid point and picks the most profitable feasible one.
///
/// Validation runs first: configuration errors are reported as
/// [`Error::Config`], then parameter errors as [`Error::Params`]. No
/// simulation happens unless both pass.
///
/// # Arguments
/// * `params` - Station parameters shared by every point
/// * `config` - Grid bounds, replicate count, seed, and thresholds
/// * `on_progress` - Called after each finished point with `(completed, total)`
pub fn run_grid_search(
    params: &StationParams,
    config: &GridSearchConfig,
    on_progress: Option<&ProgressFn>,
) -> Result<GridSearchOutcome> {
    let never = AtomicBool::new(false);
    run_grid_search_with_cancel(params, config, on_progress, &never)
}

/// Like [`run_grid_search`], but stops early once `cancel` is set.
///
/// The flag is checked before each grid point. Points already evaluated are
/// kept in grid order and the best point is chosen among them.
pub fn run_grid_search_with_cancel(
    params: &StationParams,
    config: &GridSearchConfig,
    on_progress: Option<&ProgressFn>,
    cancel: &AtomicBool,
) -> Result<GridSearchOutcome> {
    ValidationErrors::into_result(config.validate(), Error::Config)?;
    ValidationErrors::into_result(params.validate(), Error::Params)?;

    let points = config.grid_points();
    let total = points.len();
    info!(
        points = total,
        mc_runs = config.mc_runs,
        seed = config.seed,
        "starting grid search"
    );

    let completed = Mutex::new(0usize);
    let evaluate = |&(n, p): &(u32, f64)| -> Option<GridPointResult> {
        if cancel.load(Ordering::Relaxed) {
            return None;
        }
        let result = evaluate_point(params, n, p, config.mc_runs, config.seed);
        debug!(
            n_stalls = n,
            price = p,
            profit = result.kpis.profit,
            drop_rate = result.drop_rate,
            "grid point evaluated"
        );
        report_progress(&completed, total, on_progress);
        Some(result)
    };

    #[cfg(feature = "parallel")]
    let evaluated: Vec<Option<GridPointResult>> = points.par_iter().map(evaluate).collect();

    #[cfg(not(feature = "parallel"))]
    let evaluated: Vec<Option<GridPointResult>> = points.iter().map(evaluate).collect();

    let cancelled = evaluated.iter().any(Option::is_none);
    let results: Vec<GridPointResult> = evaluated.into_iter().flatten().collect();
    if cancelled {
        warn!(evaluated = results.len(), total, "grid search cancelled");
    }

    let best = select_best(&results, config);
    match &best {
        Some(b) => info!(
            n_stalls = b.n_stalls,
            price = b.price_per_kwh,
            profit = b.kpis.profit,
            drop_rate = b.drop_rate,
            "best grid point"
        ),
        None => warn!("no feasible solution"),
    }

    Ok(GridSearchOutcome {
        results,
        best,
        cancelled,
    })
}

/// Bumps the shared counter and reports it while still holding the lock,
/// so callbacks observe a strictly increasing count.
fn report_progress(completed: &Mutex<usize>, total: usize, on_progress: Option<&ProgressFn>) {
    let mut done = completed
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *done += 1;
    if let Some(cb) = on_progress {
        cb(*done, total);
    }
}
