//! Heat kernel: the world model, the explicit diffusion stepper and the
//! standard test-world generator.
//!
//! # Invariants
//! - `properties` and `state` always hold `width * height` cells, row-major.
//! - Temperatures stay within `[0, 1]` between steps.
//! - Cell flags never change after a world is created.
//! - Stepping is deterministic: identical worlds stepped identically stay
//!   bit-identical.

mod cell;
mod generator;
mod step;
mod world;

pub use cell::CellFlags;
pub use generator::make_test_world;
pub use world::{World, WorldError};
