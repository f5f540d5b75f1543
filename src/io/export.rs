//! CSV and JSON export for grid search results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::optimize::{GridPointResult, GridSearchOutcome};

/// Column header for the per-grid-point CSV export.
pub const HEADER: &str = "n_stalls,price_per_kwh,profit_mean,stderr_profit,drop_rate,\
                          stderr_drop_rate,revenue_mean,energy_sold_kwh_mean,energy_cost_mean,\
                          fixed_cost_mean,arrivals_mean,served_mean,dropped_queue_full_mean,\
                          dropped_wait_tol_mean,avg_wait_min_mean,p95_wait_min_mean,\
                          utilization_mean";

/// Exports grid point results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per grid point, in the
/// order given. Produces deterministic output for identical inputs.
///
/// # Arguments
///
/// * `results` - Evaluated grid points
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_csv(results: &[GridPointResult], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_csv(results, io::BufWriter::new(file))
}

/// Writes grid point results as CSV to any writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv(results: &[GridPointResult], writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in results {
        let k = &r.kpis;
        wtr.write_record(&[
            r.n_stalls.to_string(),
            format!("{:.3}", r.price_per_kwh),
            format!("{:.2}", k.profit),
            format!("{:.2}", r.stderr_profit),
            format!("{:.6}", r.drop_rate),
            format!("{:.6}", r.stderr_drop_rate),
            format!("{:.2}", k.revenue),
            format!("{:.2}", k.energy_sold_kwh),
            format!("{:.2}", k.energy_cost),
            format!("{:.2}", k.fixed_cost),
            format!("{:.2}", k.arrivals),
            format!("{:.2}", k.served),
            format!("{:.2}", k.dropped_queue_full),
            format!("{:.2}", k.dropped_wait_tol),
            format!("{:.4}", k.avg_wait_min),
            format!("{:.4}", k.p95_wait_min),
            format!("{:.6}", k.utilization),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports a complete outcome as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if file creation or serialization fails.
pub fn export_json(outcome: &GridSearchOutcome, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_json(outcome, io::BufWriter::new(file))
}

/// Writes a complete outcome as pretty-printed JSON to any writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(outcome: &GridSearchOutcome, mut writer: impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, outcome)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MeanKpis;

    fn make_point(n: u32, price: f64) -> GridPointResult {
        GridPointResult {
            n_stalls: n,
            price_per_kwh: price,
            kpis: MeanKpis {
                revenue: 90_000.0,
                energy_sold_kwh: 150_000.0,
                energy_cost: 27_000.0,
                fixed_cost: 25_000.0 + 15_000.0 * f64::from(n),
                profit: 38_000.0 - 15_000.0 * f64::from(n),
                arrivals: 4_500.0,
                served: 4_300.0,
                dropped_queue_full: 120.0,
                dropped_wait_tol: 80.0,
                avg_wait_min: 3.2,
                p95_wait_min: 14.5,
                utilization: 0.42,
            },
            stderr_profit: 310.5,
            stderr_drop_rate: 0.002,
            drop_rate: 200.0 / 4_500.0,
        }
    }

    fn csv_string(results: &[GridPointResult]) -> String {
        let mut buf = Vec::new();
        write_csv(results, &mut buf).ok();
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn header_matches_column_list() {
        let output = csv_string(&[make_point(1, 0.5)]);
        let first_line = output.lines().next().unwrap_or("");
        assert_eq!(
            first_line,
            "n_stalls,price_per_kwh,profit_mean,stderr_profit,drop_rate,stderr_drop_rate,\
             revenue_mean,energy_sold_kwh_mean,energy_cost_mean,fixed_cost_mean,arrivals_mean,\
             served_mean,dropped_queue_full_mean,dropped_wait_tol_mean,avg_wait_min_mean,\
             p95_wait_min_mean,utilization_mean"
        );
    }

    #[test]
    fn row_count_matches_point_count() {
        let results: Vec<GridPointResult> = (1..=6).map(|n| make_point(n, 0.55)).collect();
        let output = csv_string(&results);
        // 1 header + 6 data rows
        assert_eq!(output.lines().count(), 7);
    }

    #[test]
    fn empty_results_write_header_only() {
        let output = csv_string(&[]);
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn deterministic_output() {
        let results: Vec<GridPointResult> = (1..=3).map(|n| make_point(n, 0.4)).collect();
        assert_eq!(csv_string(&results), csv_string(&results));
    }

    #[test]
    fn rows_are_parseable() {
        let results: Vec<GridPointResult> = (1..=3).map(|n| make_point(n, 0.65)).collect();
        let output = csv_string(&results);

        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        let headers = rdr.headers().cloned().ok();
        assert_eq!(headers.as_ref().map(csv::StringRecord::len), Some(17));

        let mut row_count = 0;
        for record in rdr.records() {
            let rec = record.ok();
            assert!(rec.is_some(), "every row should parse");
            let rec = rec.unwrap_or_default();
            assert!(rec[0].parse::<u32>().is_ok());
            for i in 1..17 {
                assert!(rec[i].parse::<f64>().is_ok(), "column {i} should parse as f64");
            }
            assert_eq!(&rec[1], "0.650");
            row_count += 1;
        }
        assert_eq!(row_count, 3);
    }

    #[test]
    fn json_round_trips_outcome() {
        let results: Vec<GridPointResult> = (1..=2).map(|n| make_point(n, 0.5)).collect();
        let outcome = GridSearchOutcome {
            best: results.first().cloned(),
            results,
            cancelled: false,
        };
        let mut buf = Vec::new();
        write_json(&outcome, &mut buf).ok();
        let parsed: Option<GridSearchOutcome> = serde_json::from_slice(&buf).ok();
        let parsed = parsed.as_ref();
        assert_eq!(parsed.map(|o| o.results.len()), Some(2));
        assert_eq!(parsed.and_then(|o| o.best.as_ref()).map(|b| b.n_stalls), Some(1));
        assert_eq!(parsed.map(|o| o.cancelled), Some(false));
        let profit = parsed.map(|o| o.results[1].kpis.profit).unwrap_or(f64::NAN);
        assert!((profit - outcome.results[1].kpis.profit).abs() < 1e-6);
    }

    #[test]
    fn export_writes_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let results = vec![make_point(2, 0.45)];
        let csv_path = dir.path().join("grid.csv");
        let json_path = dir.path().join("grid.json");

        export_csv(&results, &csv_path).expect("csv export");
        let outcome = GridSearchOutcome {
            best: None,
            results,
            cancelled: true,
        };
        export_json(&outcome, &json_path).expect("json export");

        let csv_text = std::fs::read_to_string(&csv_path).expect("csv written");
        assert_eq!(csv_text.lines().count(), 2);
        let json_text = std::fs::read_to_string(&json_path).expect("json written");
        assert!(json_text.contains("\"cancelled\": true"));
    }
}
