//! Human-readable summary of a grid search.

use std::fmt;

use crate::optimize::{GridPointResult, GridSearchConfig, GridSearchOutcome};

/// True if `a` is at least as good as `b` on profit and drop rate and
/// strictly better on one of them.
fn dominates(a: &GridPointResult, b: &GridPointResult) -> bool {
    let (pa, pb) = (a.kpis.profit, b.kpis.profit);
    let (da, db) = (a.drop_rate, b.drop_rate);
    pa >= pb && da <= db && (pa > pb || da < db)
}

/// Points not dominated on (higher profit, lower drop rate).
///
/// Sorted by ascending drop rate, then descending profit.
pub fn pareto_front(results: &[GridPointResult]) -> Vec<GridPointResult> {
    let mut front: Vec<GridPointResult> = results
        .iter()
        .filter(|r| !results.iter().any(|o| dominates(o, r)))
        .cloned()
        .collect();
    front.sort_by(|a, b| {
        a.drop_rate
            .total_cmp(&b.drop_rate)
            .then(b.kpis.profit.total_cmp(&a.kpis.profit))
    });
    front
}

/// One grid point on a single report line.
struct PointLine<'a>(&'a GridPointResult);

impl fmt::Display for PointLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        write!(
            f,
            "  N={:<3} p={:.3}  profit {:>12.2} ± {:<9.2} drop {:>6.2}%  p95 wait {:>6.1} min  util {:>5.1}%",
            r.n_stalls,
            r.price_per_kwh,
            r.kpis.profit,
            r.stderr_profit,
            r.drop_rate * 100.0,
            r.kpis.p95_wait_min,
            r.kpis.utilization * 100.0,
        )
    }
}

/// Text summary of a finished grid search: the best point, the `top` most
/// profitable feasible points, and the Pareto front.
pub struct Report<'a> {
    pub outcome: &'a GridSearchOutcome,
    pub config: &'a GridSearchConfig,
    pub top: usize,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Report {
            outcome,
            config,
            top,
        } = *self;

        writeln!(f, "--- Grid Search Report ---")?;
        writeln!(
            f,
            "Evaluated {} grid points, {} replicates each, seed {}",
            outcome.results.len(),
            config.mc_runs,
            config.seed
        )?;
        if outcome.cancelled {
            writeln!(f, "Run cancelled before the grid was complete")?;
        }
        if let Some(max) = config.max_drop_rate {
            writeln!(f, "Max drop rate:  {:.2}%", max * 100.0)?;
        }
        if let Some(max) = config.max_p95_wait_min {
            writeln!(f, "Max p95 wait:   {max:.1} min")?;
        }

        writeln!(f)?;
        match &outcome.best {
            Some(b) => {
                writeln!(f, "Best: {} stalls at {:.3}/kWh", b.n_stalls, b.price_per_kwh)?;
                writeln!(
                    f,
                    "  profit {:.2} ± {:.2}, revenue {:.2}, energy sold {:.1} kWh",
                    b.kpis.profit, b.stderr_profit, b.kpis.revenue, b.kpis.energy_sold_kwh
                )?;
                writeln!(
                    f,
                    "  drop rate {:.2}%, avg wait {:.1} min, p95 wait {:.1} min, utilization {:.1}%",
                    b.drop_rate * 100.0,
                    b.kpis.avg_wait_min,
                    b.kpis.p95_wait_min,
                    b.kpis.utilization * 100.0
                )?;
            }
            None => writeln!(f, "Best: no feasible solution")?,
        }

        let mut feasible: Vec<&GridPointResult> = outcome.feasible(config).collect();
        // Stable sort keeps grid order among equal profits.
        feasible.sort_by(|a, b| b.kpis.profit.total_cmp(&a.kpis.profit));
        if top > 0 && !feasible.is_empty() {
            writeln!(f)?;
            writeln!(f, "Top {} feasible points:", top.min(feasible.len()))?;
            for r in feasible.iter().take(top) {
                writeln!(f, "{}", PointLine(r))?;
            }
        }

        let front = pareto_front(&outcome.results);
        if !front.is_empty() {
            writeln!(f)?;
            writeln!(f, "Pareto front (profit vs drop rate):")?;
            for r in &front {
                writeln!(f, "{}", PointLine(r))?;
            }
        }
        Ok(())
    }
}

/// Renders [`Report`] to a string.
pub fn render_report(outcome: &GridSearchOutcome, config: &GridSearchConfig, top: usize) -> String {
    Report {
        outcome,
        config,
        top,
    }
    .to_string()
}
