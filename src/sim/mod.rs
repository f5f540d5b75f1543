/// Operating-hour clock and calendar month table.
pub mod clock;
pub mod demand;
pub mod engine;
pub mod kpi;
/// Deterministic random number generator.
pub mod rng;
/// Stall bank and waiting line.
pub mod station;
pub mod types;

pub use engine::{YearSimulator, simulate_year};
pub use kpi::{MeanKpis, SimRunKpis};
pub use rng::StationRng;
pub use types::StationParams;
