//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};
use crate::optimize::{GridSearchConfig, PriceGrid, StallRange};
use crate::sim::StationParams;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
///
/// ```toml
/// [station]
/// power_kw = 150.0
/// q_max = 6
///
/// [grid]
/// mc_runs = 50
/// max_drop_rate = 0.05
///
/// [grid.p_grid]
/// p_min = 0.40
/// p_max = 0.80
/// p_step = 0.05
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Physical and economic station description.
    #[serde(default)]
    pub station: StationParams,
    /// Search space, replicate count, seed, and service thresholds.
    #[serde(default)]
    pub grid: GridSearchConfig,
}

impl ScenarioConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "highway", "constrained"];

    /// Returns the baseline scenario: a 16-hour urban site.
    pub fn baseline() -> Self {
        Self {
            station: StationParams::default(),
            grid: GridSearchConfig::default(),
        }
    }

    /// Returns the highway preset: round-the-clock corridor site with fast
    /// chargers, heavier traffic, and higher fixed costs.
    pub fn highway() -> Self {
        let base = StationParams::default();
        Self {
            station: StationParams {
                power_kw: 250.0,
                q_max: 8,
                open_hours: 24,
                fixed_cost_per_stall_per_year: 22_000.0,
                fixed_cost_per_year: 40_000.0,
                base_arrivals_per_hour_by_month: base
                    .base_arrivals_per_hour_by_month
                    .iter()
                    .map(|a| a * 1.6)
                    .collect(),
                energy_kwh_mean: 45.0,
                energy_kwh_std: 15.0,
                energy_kwh_min: 10.0,
                energy_kwh_max: 100.0,
                wait_tol_mean_min: 10.0,
                wait_tol_std_min: 5.0,
                wait_tol_min_min: 2.0,
                wait_tol_max_min: 30.0,
                ..base
            },
            grid: GridSearchConfig {
                n_grid: StallRange { n_min: 2, n_max: 12 },
                p_grid: PriceGrid {
                    p_min: 0.40,
                    p_max: 1.00,
                    p_step: 0.05,
                },
                ..GridSearchConfig::default()
            },
        }
    }

    /// Returns the constrained preset: short waiting line, impatient
    /// drivers, and explicit service-level thresholds.
    pub fn constrained() -> Self {
        Self {
            station: StationParams {
                q_max: 3,
                wait_tol_mean_min: 8.0,
                wait_tol_std_min: 4.0,
                wait_tol_min_min: 1.0,
                wait_tol_max_min: 25.0,
                ..StationParams::default()
            },
            grid: GridSearchConfig {
                max_drop_rate: Some(0.05),
                max_p95_wait_min: Some(15.0),
                ..GridSearchConfig::default()
            },
        }
    }

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPreset`] if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "highway" => Ok(Self::highway()),
            "constrained" => Ok(Self::constrained()),
            _ => Err(Error::UnknownPreset {
                name: name.to_string(),
                available: Self::PRESETS.join(", "),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the file cannot be read, or
    /// [`Error::Toml`] if the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Toml`] if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Grid errors come first, then station errors. Returns an empty vector
    /// if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.grid.validate();
        errors.extend(self.station.validate());
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn baseline_matches_default() {
        assert_eq!(ScenarioConfig::baseline(), ScenarioConfig::default());
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent").unwrap_err();
        assert!(matches!(err, Error::UnknownPreset { ref name, .. } if name == "nonexistent"));
        assert!(err.to_string().contains("highway"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn highway_is_busier_and_always_open() {
        let base = ScenarioConfig::baseline();
        let hw = ScenarioConfig::highway();
        assert_eq!(hw.station.open_hours, 24);
        assert!(hw.station.power_kw > base.station.power_kw);
        for (h, b) in hw
            .station
            .base_arrivals_per_hour_by_month
            .iter()
            .zip(&base.station.base_arrivals_per_hour_by_month)
        {
            assert!(h > b);
        }
    }

    #[test]
    fn constrained_sets_thresholds() {
        let cfg = ScenarioConfig::constrained();
        assert_eq!(cfg.grid.max_drop_rate, Some(0.05));
        assert_eq!(cfg.grid.max_p95_wait_min, Some(15.0));
        assert!(ScenarioConfig::baseline().grid.max_drop_rate.is_none());
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[station]
power_kw = 100.0
q_max = 4
open_hours = 20
base_arrivals_per_hour_by_month = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]

[grid]
mc_runs = 5
seed = 99
max_drop_rate = 0.1

[grid.n_grid]
n_min = 2
n_max = 4

[grid.p_grid]
p_min = 0.40
p_max = 0.60
p_step = 0.10
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.station.q_max), Some(4));
        assert_eq!(cfg.as_ref().map(|c| c.grid.n_grid.n_max), Some(4));
        assert_eq!(cfg.as_ref().and_then(|c| c.grid.max_drop_rate), Some(0.1));
        assert_eq!(cfg.as_ref().map(|c| c.grid.p_grid.values().len()), Some(3));
        assert!(cfg.map(|c| c.validate().is_empty()).unwrap_or(false));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[station]
power_kw = 100.0
bogus_field = true
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn unknown_table_rejected() {
        let result = ScenarioConfig::from_toml_str("[battery]\ncapacity_kwh = 10.0\n");
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = ScenarioConfig::from_toml_file(Path::new("/nonexistent/scenario.toml"))
            .unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn validation_collects_grid_and_station_errors() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.grid.mc_runs = 0;
        cfg.station.open_hours = 0;
        let errors = cfg.validate();
        assert_eq!(errors[0].field, "grid.mc_runs");
        assert!(errors.iter().any(|e| e.field == "station.open_hours"));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[grid]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        // seed overridden
        assert_eq!(cfg.as_ref().map(|c| c.grid.seed), Some(99));
        // replicate count kept default
        assert_eq!(cfg.as_ref().map(|c| c.grid.mc_runs), Some(20));
        // station kept default
        assert_eq!(cfg.as_ref().map(|c| c.station.power_kw), Some(150.0));
    }
}
