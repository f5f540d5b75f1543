//! Yearly KPIs: per-replicate summaries and their Monte Carlo means.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use super::types::StationParams;
use crate::stats::{self, P95};

/// Running totals collected while a year is simulated.
#[derive(Debug, Clone, Default)]
pub struct RunTally {
    pub revenue: f64,
    pub energy_sold_kwh: f64,
    pub busy_stall_hours: f64,
    pub arrivals: u64,
    pub served: u64,
    pub dropped_queue_full: u64,
    pub dropped_wait_tol: u64,
    /// Wait of every served car (minutes), in service order.
    pub waits_min: Vec<f64>,
}

impl RunTally {
    /// Books a service start.
    pub fn record_service(
        &mut self,
        energy_kwh: f64,
        price: f64,
        service_hours: f64,
        wait_min: f64,
    ) {
        self.revenue += energy_kwh * price;
        self.energy_sold_kwh += energy_kwh;
        self.busy_stall_hours += service_hours;
        self.served += 1;
        self.waits_min.push(wait_min);
    }

    /// Closes the books for a year with `n_stalls` stalls over `total_hours`.
    pub fn finish(self, params: &StationParams, n_stalls: usize, total_hours: u32) -> SimRunKpis {
        let energy_cost = self.energy_sold_kwh * params.grid_cost_per_kwh;
        let fixed_cost =
            params.fixed_cost_per_year + params.fixed_cost_per_stall_per_year * n_stalls as f64;
        let capacity_hours = n_stalls as f64 * f64::from(total_hours);
        let utilization = if n_stalls == 0 || capacity_hours <= 0.0 {
            0.0
        } else {
            (self.busy_stall_hours / capacity_hours).clamp(0.0, 1.0)
        };

        SimRunKpis {
            revenue: self.revenue,
            energy_sold_kwh: self.energy_sold_kwh,
            energy_cost,
            fixed_cost,
            profit: self.revenue - energy_cost - fixed_cost,
            arrivals: self.arrivals,
            served: self.served,
            dropped_queue_full: self.dropped_queue_full,
            dropped_wait_tol: self.dropped_wait_tol,
            avg_wait_min: stats::mean(&self.waits_min),
            p95_wait_min: stats::percentile(&self.waits_min, P95),
            utilization,
        }
    }
}

/// Outcome of one simulated operating year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimRunKpis {
    pub revenue: f64,
    pub energy_sold_kwh: f64,
    pub energy_cost: f64,
    pub fixed_cost: f64,
    /// `revenue - energy_cost - fixed_cost`.
    pub profit: f64,
    pub arrivals: u64,
    pub served: u64,
    /// Arrivals turned away because the waiting line was full.
    pub dropped_queue_full: u64,
    /// Queued cars that left after exceeding their wait tolerance.
    pub dropped_wait_tol: u64,
    /// Mean wait of served cars (minutes).
    pub avg_wait_min: f64,
    /// 95th-percentile wait of served cars (minutes).
    pub p95_wait_min: f64,
    /// Busy stall-hours over available stall-hours, in `[0, 1]`.
    pub utilization: f64,
}

impl SimRunKpis {
    pub fn dropped(&self) -> u64 {
        self.dropped_queue_full + self.dropped_wait_tol
    }

    /// Share of arrivals not served because of a full line or reneging.
    pub fn drop_rate(&self) -> f64 {
        if self.arrivals == 0 {
            0.0
        } else {
            self.dropped() as f64 / self.arrivals as f64
        }
    }
}

impl fmt::Display for SimRunKpis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Year KPIs ---")?;
        writeln!(f, "Revenue:        {:>12.2}", self.revenue)?;
        writeln!(f, "Energy sold:    {:>12.1} kWh", self.energy_sold_kwh)?;
        writeln!(f, "Energy cost:    {:>12.2}", self.energy_cost)?;
        writeln!(f, "Fixed cost:     {:>12.2}", self.fixed_cost)?;
        writeln!(f, "Profit:         {:>12.2}", self.profit)?;
        writeln!(
            f,
            "Arrivals:       {} (served {}, queue full {}, reneged {})",
            self.arrivals, self.served, self.dropped_queue_full, self.dropped_wait_tol
        )?;
        writeln!(
            f,
            "Wait:           avg {:.1} min, p95 {:.1} min",
            self.avg_wait_min, self.p95_wait_min
        )?;
        write!(f, "Utilization:    {:.1}%", self.utilization * 100.0)
    }
}

/// KPI means across Monte Carlo replicates.
///
/// Same field set as [`SimRunKpis`] with counts carried as floats. Built by
/// summing per-replicate records with `+` and scaling once at the end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeanKpis {
    pub revenue: f64,
    pub energy_sold_kwh: f64,
    pub energy_cost: f64,
    pub fixed_cost: f64,
    pub profit: f64,
    pub arrivals: f64,
    pub served: f64,
    pub dropped_queue_full: f64,
    pub dropped_wait_tol: f64,
    pub avg_wait_min: f64,
    pub p95_wait_min: f64,
    pub utilization: f64,
}

impl MeanKpis {
    /// Multiplies every field by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            revenue: self.revenue * factor,
            energy_sold_kwh: self.energy_sold_kwh * factor,
            energy_cost: self.energy_cost * factor,
            fixed_cost: self.fixed_cost * factor,
            profit: self.profit * factor,
            arrivals: self.arrivals * factor,
            served: self.served * factor,
            dropped_queue_full: self.dropped_queue_full * factor,
            dropped_wait_tol: self.dropped_wait_tol * factor,
            avg_wait_min: self.avg_wait_min * factor,
            p95_wait_min: self.p95_wait_min * factor,
            utilization: self.utilization * factor,
        }
    }

    /// Pooled drop rate: total drops over total arrivals.
    pub fn pooled_drop_rate(&self) -> f64 {
        if self.arrivals > 0.0 {
            (self.dropped_queue_full + self.dropped_wait_tol) / self.arrivals
        } else {
            0.0
        }
    }
}

impl From<&SimRunKpis> for MeanKpis {
    fn from(k: &SimRunKpis) -> Self {
        Self {
            revenue: k.revenue,
            energy_sold_kwh: k.energy_sold_kwh,
            energy_cost: k.energy_cost,
            fixed_cost: k.fixed_cost,
            profit: k.profit,
            arrivals: k.arrivals as f64,
            served: k.served as f64,
            dropped_queue_full: k.dropped_queue_full as f64,
            dropped_wait_tol: k.dropped_wait_tol as f64,
            avg_wait_min: k.avg_wait_min,
            p95_wait_min: k.p95_wait_min,
            utilization: k.utilization,
        }
    }
}

impl Add for MeanKpis {
    type Output = Self;

    fn add(self, o: Self) -> Self {
        Self {
            revenue: self.revenue + o.revenue,
            energy_sold_kwh: self.energy_sold_kwh + o.energy_sold_kwh,
            energy_cost: self.energy_cost + o.energy_cost,
            fixed_cost: self.fixed_cost + o.fixed_cost,
            profit: self.profit + o.profit,
            arrivals: self.arrivals + o.arrivals,
            served: self.served + o.served,
            dropped_queue_full: self.dropped_queue_full + o.dropped_queue_full,
            dropped_wait_tol: self.dropped_wait_tol + o.dropped_wait_tol,
            avg_wait_min: self.avg_wait_min + o.avg_wait_min,
            p95_wait_min: self.p95_wait_min + o.p95_wait_min,
            utilization: self.utilization + o.utilization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(arrivals: u64, served: u64, full: u64, reneged: u64, profit: f64) -> SimRunKpis {
        SimRunKpis {
            revenue: profit + 10.0,
            energy_sold_kwh: 100.0,
            energy_cost: 5.0,
            fixed_cost: 5.0,
            profit,
            arrivals,
            served,
            dropped_queue_full: full,
            dropped_wait_tol: reneged,
            avg_wait_min: 2.0,
            p95_wait_min: 8.0,
            utilization: 0.4,
        }
    }

    #[test]
    fn tally_books_services() {
        let mut tally = RunTally::default();
        tally.arrivals = 3;
        tally.record_service(40.0, 0.5, 0.25, 0.0);
        tally.record_service(20.0, 0.5, 0.125, 6.0);
        tally.dropped_wait_tol = 1;

        let params = StationParams {
            grid_cost_per_kwh: 0.2,
            fixed_cost_per_year: 100.0,
            fixed_cost_per_stall_per_year: 10.0,
            ..StationParams::default()
        };
        let k = tally.finish(&params, 2, 10);

        assert_eq!(k.served, 2);
        assert!((k.revenue - 30.0).abs() < 1e-12);
        assert!((k.energy_sold_kwh - 60.0).abs() < 1e-12);
        assert!((k.energy_cost - 12.0).abs() < 1e-12);
        assert!((k.fixed_cost - 120.0).abs() < 1e-12);
        assert!((k.profit - (30.0 - 12.0 - 120.0)).abs() < 1e-12);
        assert!((k.avg_wait_min - 3.0).abs() < 1e-12);
        // busy 0.375 h over 2 stalls * 10 h
        assert!((k.utilization - 0.375 / 20.0).abs() < 1e-12);
    }

    #[test]
    fn utilization_zero_without_stalls() {
        let mut tally = RunTally::default();
        tally.busy_stall_hours = 5.0;
        let k = tally.finish(&StationParams::default(), 0, 100);
        assert_eq!(k.utilization, 0.0);
    }

    #[test]
    fn utilization_clamped_to_one() {
        let mut tally = RunTally::default();
        tally.busy_stall_hours = 50.0;
        let k = tally.finish(&StationParams::default(), 1, 10);
        assert_eq!(k.utilization, 1.0);
    }

    #[test]
    fn empty_year_has_zero_waits() {
        let k = RunTally::default().finish(&StationParams::default(), 1, 10);
        assert_eq!(k.avg_wait_min, 0.0);
        assert_eq!(k.p95_wait_min, 0.0);
        assert_eq!(k.drop_rate(), 0.0);
    }

    #[test]
    fn drop_rate_counts_both_causes() {
        let k = run(10, 6, 3, 1, 0.0);
        assert_eq!(k.dropped(), 4);
        assert!((k.drop_rate() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn mean_of_two_runs() {
        let a = MeanKpis::from(&run(10, 8, 2, 0, 100.0));
        let b = MeanKpis::from(&run(30, 24, 0, 6, 300.0));
        let m = (a + b).scaled(0.5);
        assert!((m.profit - 200.0).abs() < 1e-12);
        assert!((m.arrivals - 20.0).abs() < 1e-12);
        // pooled: (2 + 6) / (10 + 30)
        assert!((m.pooled_drop_rate() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn display_does_not_panic() {
        let s = format!("{}", run(10, 8, 1, 1, 50.0));
        assert!(s.contains("Profit"));
    }
}
