//! Command-line arguments for the optimizer binary.

use std::path::PathBuf;

use clap::Parser;

use crate::config::ScenarioConfig;
use crate::error::Result;

/// Preset used when neither `--scenario` nor `--preset` is given.
pub const DEFAULT_PRESET: &str = "baseline";

#[derive(Parser, Debug)]
#[command(name = "ev-station-opt")]
#[command(about = "Find the stall count and price that maximize a charging station's yearly profit")]
pub struct Args {
    /// Load the scenario from a TOML file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, highway, constrained)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Override the master random seed
    #[arg(long)]
    pub seed: Option<u32>,

    /// Override the number of Monte Carlo replicates per grid point
    #[arg(long, value_name = "N")]
    pub mc_runs: Option<u32>,

    /// Export per-grid-point results to CSV
    #[arg(long, value_name = "PATH")]
    pub csv_out: Option<PathBuf>,

    /// Export the full outcome to JSON
    #[arg(long, value_name = "PATH")]
    pub json_out: Option<PathBuf>,

    /// Number of feasible points listed in the report
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Resolves the scenario source and applies command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the preset is unknown or the scenario file cannot
    /// be read or parsed.
    pub fn load_scenario(&self) -> Result<ScenarioConfig> {
        let mut cfg = match (&self.scenario, &self.preset) {
            (Some(path), _) => ScenarioConfig::from_toml_file(path)?,
            (None, Some(name)) => ScenarioConfig::from_preset(name)?,
            (None, None) => ScenarioConfig::from_preset(DEFAULT_PRESET)?,
        };
        if let Some(seed) = self.seed {
            cfg.grid.seed = seed;
        }
        if let Some(runs) = self.mc_runs {
            cfg.grid.mc_runs = runs;
        }
        Ok(cfg)
    }
}
