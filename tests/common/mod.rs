//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use ev_station_opt::optimize::{GridSearchConfig, PriceGrid, StallRange};
use ev_station_opt::sim::StationParams;

/// Small station: 4 open hours a day, flat season, one arrival per hour at
/// the reference price.
pub fn small_params() -> StationParams {
    StationParams {
        power_kw: 50.0,
        q_max: 3,
        open_hours: 4,
        base_arrivals_per_hour_by_month: vec![1.0; 12],
        avg_temp_c_by_month: vec![15.0; 12],
        ref_temp_c: 15.0,
        p_ref: 0.5,
        fixed_cost_per_stall_per_year: 1_000.0,
        fixed_cost_per_year: 2_000.0,
        ..StationParams::default()
    }
}

/// One operating hour a day: the cheapest year that still has every month.
pub fn cheap_params() -> StationParams {
    StationParams {
        open_hours: 1,
        base_arrivals_per_hour_by_month: vec![0.5; 12],
        ..small_params()
    }
}

/// Slow chargers under heavy traffic, so every stall count drops cars.
pub fn congested_params() -> StationParams {
    StationParams {
        power_kw: 10.0,
        q_max: 2,
        base_arrivals_per_hour_by_month: vec![3.0; 12],
        ..small_params()
    }
}

/// `n_min..=n_max` stalls by `p_min..=p_max` at 0.1 steps, few replicates.
pub fn grid(n_min: u32, n_max: u32, p_min: f64, p_max: f64) -> GridSearchConfig {
    GridSearchConfig {
        n_grid: StallRange { n_min, n_max },
        p_grid: PriceGrid {
            p_min,
            p_max,
            p_step: 0.1,
        },
        mc_runs: 3,
        seed: 2024,
        max_drop_rate: None,
        max_p95_wait_min: None,
    }
}

/// 2 x 3 grid used by most tests.
pub fn small_grid() -> GridSearchConfig {
    grid(1, 2, 0.4, 0.6)
}
