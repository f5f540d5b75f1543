//! Tracing subscriber setup for the command-line tool.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a stderr `fmt` subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from `level`
/// applied to this crate (e.g. `"info"`, `"debug"`, `"trace"`).
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(level: &str) -> Result<(), TryInitError> {
    let default_filter = format!("ev_station_opt={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init()
}
