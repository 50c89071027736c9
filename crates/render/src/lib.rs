//! Rendering: read-only visual exports of a heat world.
//!
//! # Invariants
//! - Renderers never mutate the world.
//! - Output depends only on the world's flags and temperatures.

mod bitmap;
mod renderer;

pub use bitmap::{BitmapRenderer, RenderError, render_to_path, write_bitmap};
pub use renderer::{DebugTextRenderer, Renderer};
