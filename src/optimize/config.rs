//! Grid search configuration: enumeration space and feasibility thresholds.

use serde::{Deserialize, Serialize};

use super::monte_carlo::GridPointResult;
use crate::error::ConfigError;

/// Largest stall count the optimizer will simulate.
pub const MAX_STALLS: u32 = 50;

/// Largest number of prices a grid may enumerate.
pub const MAX_PRICES: usize = 10_000;

/// Inclusive range of stall counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StallRange {
    pub n_min: u32,
    pub n_max: u32,
}

impl StallRange {
    pub fn values(&self) -> impl Iterator<Item = u32> {
        self.n_min..=self.n_max
    }
}

/// Inclusive price grid `p_min, p_min + p_step, ..., p_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriceGrid {
    pub p_min: f64,
    pub p_max: f64,
    pub p_step: f64,
}

impl PriceGrid {
    /// Prices on the grid, snapped to a thousandth.
    ///
    /// The step count is rounded rather than accumulated, so long grids do
    /// not drift.
    ///
    /// # Examples
    ///
    /// ```
    /// use ev_station_opt::optimize::config::PriceGrid;
    ///
    /// let grid = PriceGrid { p_min: 0.45, p_max: 0.85, p_step: 0.05 };
    /// let prices = grid.values();
    /// assert_eq!(prices.len(), 9);
    /// assert_eq!(prices[1], 0.5);
    /// assert_eq!(prices[8], 0.85);
    /// ```
    ///
    /// Grids wider than [`MAX_PRICES`] are truncated; `validate` rejects them.
    pub fn values(&self) -> Vec<f64> {
        let steps = self.step_count().clamp(0.0, (MAX_PRICES - 1) as f64) as usize;
        (0..=steps)
            .map(|i| snap_price(self.p_min + i as f64 * self.p_step))
            .collect()
    }

    /// Rounded number of steps between `p_min` and `p_max`.
    fn step_count(&self) -> f64 {
        ((self.p_max - self.p_min) / self.p_step).round()
    }
}

/// Rounds a price to millicent precision.
pub fn snap_price(p: f64) -> f64 {
    (p * 1000.0).round() / 1000.0
}

/// What to search and which points count as acceptable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridSearchConfig {
    pub n_grid: StallRange,
    pub p_grid: PriceGrid,
    /// Monte Carlo replicates per grid point.
    pub mc_runs: u32,
    /// Master seed; every grid point derives its own streams from it.
    pub seed: u32,
    /// Highest acceptable pooled drop rate; `None` leaves it unconstrained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_drop_rate: Option<f64>,
    /// Highest acceptable mean 95th-percentile wait (minutes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_p95_wait_min: Option<f64>,
}

impl Default for GridSearchConfig {
    fn default() -> Self {
        Self {
            n_grid: StallRange { n_min: 1, n_max: 8 },
            p_grid: PriceGrid {
                p_min: 0.35,
                p_max: 0.95,
                p_step: 0.05,
            },
            mc_runs: 20,
            seed: 12345,
            max_drop_rate: None,
            max_p95_wait_min: None,
        }
    }
}

impl GridSearchConfig {
    /// Every `(n_stalls, price)` pair in scan order: stalls outer, price inner.
    pub fn grid_points(&self) -> Vec<(u32, f64)> {
        let prices = self.p_grid.values();
        self.n_grid
            .values()
            .flat_map(|n| prices.iter().map(move |&p| (n, p)))
            .collect()
    }

    /// Number of grid points without materializing them.
    pub fn point_count(&self) -> usize {
        let stalls = self.n_grid.values().count();
        stalls * self.p_grid.values().len()
    }

    /// True if `point` meets both optional service thresholds.
    pub fn is_feasible(&self, point: &GridPointResult) -> bool {
        let drop_ok = self
            .max_drop_rate
            .is_none_or(|max| point.drop_rate <= max);
        let wait_ok = self
            .max_p95_wait_min
            .is_none_or(|max| point.kpis.p95_wait_min <= max);
        drop_ok && wait_ok
    }

    /// Checks bounds, step, replicate count, and thresholds.
    ///
    /// Field paths are prefixed with `grid.`.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let n = &self.n_grid;
        let p = &self.p_grid;

        if n.n_min < 1 {
            errors.push(ConfigError::new("grid.n_grid.n_min", "must be >= 1"));
        }
        if n.n_max < 1 {
            errors.push(ConfigError::new("grid.n_grid.n_max", "must be >= 1"));
        }
        if n.n_min > n.n_max {
            errors.push(ConfigError::new(
                "grid.n_grid.n_min",
                "must be <= grid.n_grid.n_max",
            ));
        }
        if n.n_max > MAX_STALLS {
            errors.push(ConfigError::new("grid.n_grid.n_max", "must be <= 50"));
        }

        if !(p.p_min.is_finite() && p.p_max.is_finite() && p.p_step.is_finite()) {
            errors.push(ConfigError::new("grid.p_grid", "bounds must be finite"));
        } else {
            if snap_price(p.p_min) <= 0.0 {
                errors.push(ConfigError::new(
                    "grid.p_grid.p_min",
                    "must be >= 0.0005 after rounding to a thousandth",
                ));
            }
            if p.p_max <= 0.0 {
                errors.push(ConfigError::new("grid.p_grid.p_max", "must be > 0"));
            }
            if p.p_min > p.p_max {
                errors.push(ConfigError::new(
                    "grid.p_grid.p_min",
                    "must be <= grid.p_grid.p_max",
                ));
            }
            if p.p_step <= 0.0 {
                errors.push(ConfigError::new("grid.p_grid.p_step", "must be > 0"));
            } else if p.p_min <= p.p_max {
                let steps = p.step_count();
                if !steps.is_finite() || steps + 1.0 > MAX_PRICES as f64 {
                    errors.push(ConfigError::new(
                        "grid.p_grid.p_step",
                        "must yield at most 10000 prices",
                    ));
                }
            }
        }

        if self.mc_runs < 1 {
            errors.push(ConfigError::new("grid.mc_runs", "must be >= 1"));
        }

        if let Some(max) = self.max_drop_rate {
            if !(0.0..=1.0).contains(&max) {
                errors.push(ConfigError::new(
                    "grid.max_drop_rate",
                    "must be in [0.0, 1.0]",
                ));
            }
        }
        if let Some(max) = self.max_p95_wait_min {
            if !(max.is_finite() && max >= 0.0) {
                errors.push(ConfigError::new(
                    "grid.max_p95_wait_min",
                    "must be finite and >= 0",
                ));
            }
        }

        errors
    }
}
