//! Error types shared by configuration loading, validation, and export.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// A single violated constraint with its dotted field path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"grid.p_grid.p_step"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every constraint violation found by one validation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(pub Vec<ConfigError>);

impl ValidationErrors {
    /// Returns `Ok(())` for an empty list, otherwise wraps the list with `wrap`.
    pub fn into_result(errors: Vec<ConfigError>, wrap: fn(Self) -> Error) -> Result<()> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(wrap(Self(errors)))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigError> {
        self.0.iter()
    }

    /// True if any error refers to `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

/// Crate-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Grid bounds, steps, replicate count, or constraint thresholds are invalid.
    #[error("invalid grid search configuration: {0}")]
    Config(ValidationErrors),

    /// Station parameters violate a domain constraint.
    #[error("invalid station parameters: {0}")]
    Params(ValidationErrors),

    #[error("unknown preset \"{name}\", available: {available}")]
    UnknownPreset { name: String, available: String },

    #[error("cannot read \"{}\": {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid scenario TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("json export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    /// The background worker thread is gone.
    #[error("optimizer worker disconnected")]
    WorkerDisconnected,
}

pub type Result<T> = std::result::Result<T, Error>;
