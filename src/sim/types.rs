//! Station parameters consumed by the demand model and the year simulator.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Months per seasonal table.
pub const MONTHS: usize = 12;

/// Upper bound on the waiting-line capacity accepted by validation.
pub const MAX_QUEUE_CAPACITY: usize = 2000;

/// Physical, economic, and behavioural description of one charging station.
///
/// Read-only for the duration of an optimization run. Run
/// [`StationParams::validate`] before simulating; the simulator itself does
/// not re-check anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StationParams {
    /// Charging power per stall (kW).
    pub power_kw: f64,
    /// Maximum number of cars waiting for a stall.
    pub q_max: usize,
    /// Operating hours per day (1-24).
    pub open_hours: u32,

    /// Wholesale energy cost per kWh sold.
    pub grid_cost_per_kwh: f64,
    /// Yearly fixed cost per installed stall.
    pub fixed_cost_per_stall_per_year: f64,
    /// Yearly fixed cost of the site independent of stall count.
    pub fixed_cost_per_year: f64,

    /// Mean arrivals per operating hour at the reference price, January first.
    pub base_arrivals_per_hour_by_month: Vec<f64>,
    /// Average ambient temperature per month (°C), January first.
    pub avg_temp_c_by_month: Vec<f64>,
    /// Relative demand change per °C below `ref_temp_c`.
    pub temp_sensitivity: f64,
    /// Temperature at which the temperature factor is 1.
    pub ref_temp_c: f64,

    /// Reference price per kWh at which the price factor is 1.
    pub p_ref: f64,
    /// Constant price elasticity of demand (positive).
    pub price_elasticity: f64,

    pub energy_kwh_mean: f64,
    pub energy_kwh_std: f64,
    pub energy_kwh_min: f64,
    pub energy_kwh_max: f64,

    /// Mean wait tolerance (minutes).
    pub wait_tol_mean_min: f64,
    pub wait_tol_std_min: f64,
    pub wait_tol_min_min: f64,
    pub wait_tol_max_min: f64,
}

impl Default for StationParams {
    fn default() -> Self {
        Self {
            power_kw: 150.0,
            q_max: 6,
            open_hours: 16,
            grid_cost_per_kwh: 0.18,
            fixed_cost_per_stall_per_year: 15_000.0,
            fixed_cost_per_year: 25_000.0,
            base_arrivals_per_hour_by_month: vec![
                2.2, 2.3, 2.6, 2.9, 3.2, 3.5, 3.7, 3.6, 3.2, 2.9, 2.5, 2.3,
            ],
            avg_temp_c_by_month: vec![
                -1.0, 0.0, 4.0, 9.0, 14.0, 18.0, 21.0, 20.0, 16.0, 10.0, 5.0, 1.0,
            ],
            temp_sensitivity: 0.01,
            ref_temp_c: 15.0,
            p_ref: 0.55,
            price_elasticity: 1.2,
            energy_kwh_mean: 35.0,
            energy_kwh_std: 12.0,
            energy_kwh_min: 5.0,
            energy_kwh_max: 80.0,
            wait_tol_mean_min: 12.0,
            wait_tol_std_min: 6.0,
            wait_tol_min_min: 2.0,
            wait_tol_max_min: 40.0,
        }
    }
}

impl StationParams {
    /// Total operating hours in one simulated (non-leap) year.
    pub fn hours_per_year(&self) -> u32 {
        365 * self.open_hours
    }

    /// Checks every domain constraint and returns all violations.
    ///
    /// Field paths are prefixed with `station.` so they match the TOML layout.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut check = |ok: bool, field: &str, message: &str| {
            if !ok {
                errors.push(ConfigError::new(format!("station.{field}"), message));
            }
        };

        check(
            self.power_kw.is_finite() && self.power_kw > 0.0,
            "power_kw",
            "must be finite and > 0",
        );
        check(
            self.q_max <= MAX_QUEUE_CAPACITY,
            "q_max",
            "must be <= 2000",
        );
        check(
            (1..=24).contains(&self.open_hours),
            "open_hours",
            "must be in [1, 24]",
        );

        for (value, field) in [
            (self.grid_cost_per_kwh, "grid_cost_per_kwh"),
            (
                self.fixed_cost_per_stall_per_year,
                "fixed_cost_per_stall_per_year",
            ),
            (self.fixed_cost_per_year, "fixed_cost_per_year"),
        ] {
            check(value.is_finite() && value >= 0.0, field, "must be finite and >= 0");
        }

        let arrivals = &self.base_arrivals_per_hour_by_month;
        check(
            arrivals.len() >= MONTHS,
            "base_arrivals_per_hour_by_month",
            "must have at least 12 entries",
        );
        check(
            arrivals.iter().all(|a| a.is_finite() && *a > 0.0),
            "base_arrivals_per_hour_by_month",
            "every entry must be finite and > 0",
        );
        let temps = &self.avg_temp_c_by_month;
        check(
            temps.len() >= MONTHS,
            "avg_temp_c_by_month",
            "must have at least 12 entries",
        );
        check(
            temps.iter().all(|t| t.is_finite()),
            "avg_temp_c_by_month",
            "every entry must be finite",
        );
        check(
            self.temp_sensitivity.is_finite(),
            "temp_sensitivity",
            "must be finite",
        );
        check(self.ref_temp_c.is_finite(), "ref_temp_c", "must be finite");

        check(
            self.p_ref.is_finite() && self.p_ref > 0.0,
            "p_ref",
            "must be finite and > 0",
        );
        check(
            self.price_elasticity.is_finite() && self.price_elasticity > 0.0,
            "price_elasticity",
            "must be finite and > 0",
        );

        let energy = [
            self.energy_kwh_mean,
            self.energy_kwh_std,
            self.energy_kwh_min,
            self.energy_kwh_max,
        ];
        if energy.iter().all(|v| v.is_finite()) {
            check(
                self.energy_kwh_std >= 0.0,
                "energy_kwh_std",
                "must be >= 0",
            );
            check(self.energy_kwh_min > 0.0, "energy_kwh_min", "must be > 0");
            check(
                self.energy_kwh_min <= self.energy_kwh_mean,
                "energy_kwh_mean",
                "must be >= station.energy_kwh_min",
            );
            check(
                self.energy_kwh_mean <= self.energy_kwh_max,
                "energy_kwh_max",
                "must be >= station.energy_kwh_mean",
            );
        } else {
            check(false, "energy_kwh_mean", "energy distribution must be finite");
        }

        let wait = [
            self.wait_tol_mean_min,
            self.wait_tol_std_min,
            self.wait_tol_min_min,
            self.wait_tol_max_min,
        ];
        if wait.iter().all(|v| v.is_finite()) {
            check(
                self.wait_tol_std_min >= 0.0,
                "wait_tol_std_min",
                "must be >= 0",
            );
            check(
                self.wait_tol_min_min >= 0.0,
                "wait_tol_min_min",
                "must be >= 0",
            );
            check(
                self.wait_tol_min_min <= self.wait_tol_mean_min,
                "wait_tol_mean_min",
                "must be >= station.wait_tol_min_min",
            );
            check(
                self.wait_tol_mean_min <= self.wait_tol_max_min,
                "wait_tol_max_min",
                "must be >= station.wait_tol_mean_min",
            );
        } else {
            check(
                false,
                "wait_tol_mean_min",
                "wait tolerance distribution must be finite",
            );
        }

        errors
    }
}
