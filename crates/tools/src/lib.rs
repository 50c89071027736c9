//! Developer tooling: world inspection and run comparison.
//!
//! # Invariants
//! - Tools are read-only with respect to the world.

mod inspector;

pub use inspector::{TemperatureStats, WorldInspector, WorldSummary};
