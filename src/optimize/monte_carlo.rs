//! Monte Carlo evaluation of a single grid point.

use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::seed::{base_seed, replicate_seed};
use crate::sim::{MeanKpis, StationParams, StationRng, simulate_year};
use crate::stats;

/// Replicate-averaged KPIs for one `(n_stalls, price)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPointResult {
    pub n_stalls: u32,
    pub price_per_kwh: f64,
    /// Field-wise means over the replicates.
    pub kpis: MeanKpis,
    /// Standard error of the mean profit.
    pub stderr_profit: f64,
    /// Standard error of the mean per-replicate drop rate.
    pub stderr_drop_rate: f64,
    /// Pooled drop rate: mean dropped over mean arrivals.
    pub drop_rate: f64,
}

impl GridPointResult {
    pub fn profit(&self) -> f64 {
        self.kpis.profit
    }
}

/// Runs `mc_runs` simulated years at `(n_stalls, price)` and averages them.
///
/// Replicates run in order on the calling thread, each with its own RNG
/// stream derived from `seed`, so the result is independent of which
/// thread evaluates the point.
///
/// # Arguments
/// * `params` - Validated station parameters
/// * `n_stalls` - Number of chargers
/// * `price` - Selling price per kWh
/// * `mc_runs` - Replicate count, at least 1
/// * `seed` - Master seed of the search
pub fn evaluate_point(
    params: &StationParams,
    n_stalls: u32,
    price: f64,
    mc_runs: u32,
    seed: u32,
) -> GridPointResult {
    let base = base_seed(seed, n_stalls, price);
    let runs = mc_runs.max(1);

    let mut sum = MeanKpis::default();
    let mut profits = Vec::with_capacity(runs as usize);
    let mut drop_rates = Vec::with_capacity(runs as usize);

    for r in 0..runs {
        let mut rng = StationRng::from_seed(replicate_seed(base, r).to_le_bytes());
        let kpis = simulate_year(params, n_stalls as usize, price, &mut rng);
        trace!(
            n_stalls,
            price,
            replicate = r,
            profit = kpis.profit,
            drop_rate = kpis.drop_rate(),
            "replicate finished"
        );
        profits.push(kpis.profit);
        drop_rates.push(kpis.drop_rate());
        sum = sum + MeanKpis::from(&kpis);
    }

    let kpis = sum.scaled(1.0 / f64::from(runs));
    GridPointResult {
        n_stalls,
        price_per_kwh: price,
        drop_rate: kpis.pooled_drop_rate(),
        stderr_profit: stats::std_error(&profits),
        stderr_drop_rate: stats::std_error(&drop_rates),
        kpis,
    }
}
