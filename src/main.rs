//! EV station optimizer entry point: CLI wiring, grid search, and report output.

use std::process;

use clap::Parser;
use tracing::info;

use ev_station_opt::cli::Args;
use ev_station_opt::io::export::{export_csv, export_json};
use ev_station_opt::logging::init_logging;
use ev_station_opt::reporting::render_report;
use ev_station_opt::{Error, ProgressFn, run_grid_search};

/// Logs every tenth of the grid, plus the final point.
fn log_progress(completed: usize, total: usize) {
    let step = (total / 10).max(1);
    if completed % step == 0 || completed == total {
        info!(completed, total, "grid search progress");
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let scenario = args.load_scenario()?;
    let on_progress: &ProgressFn = &log_progress;
    let outcome = run_grid_search(&scenario.station, &scenario.grid, Some(on_progress))?;

    println!("{}", render_report(&outcome, &scenario.grid, args.top));

    if let Some(ref path) = args.csv_out {
        export_csv(&outcome.results, path)?;
        eprintln!("Grid results written to {}", path.display());
    }
    if let Some(ref path) = args.json_out {
        export_json(&outcome, path)?;
        eprintln!("Outcome written to {}", path.display());
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("warning: logging not initialized: {e}");
    }

    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
