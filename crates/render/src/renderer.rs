use heatgrid_kernel::World;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the world and produces output. It never mutates the
/// world.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render the current state of `world`.
    fn render(&self, world: &World) -> Self::Output;
}

/// Character heat map for terminals and logs.
///
/// One character per cell, one line per row (top row first). Insulators are
/// `#`; every other cell maps its temperature onto `ramp`, coldest first.
#[derive(Debug)]
pub struct DebugTextRenderer {
    ramp: Vec<char>,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugTextRenderer {
    pub const DEFAULT_RAMP: &'static str = " .:-=+*%@";

    pub fn new() -> Self {
        Self::with_ramp(Self::DEFAULT_RAMP)
    }

    /// Use a custom shading ramp. An empty ramp falls back to the default.
    pub fn with_ramp(ramp: &str) -> Self {
        let ramp: Vec<char> = if ramp.is_empty() {
            Self::DEFAULT_RAMP.chars().collect()
        } else {
            ramp.chars().collect()
        };
        Self { ramp }
    }

    fn shade(&self, temperature: f32) -> char {
        let top = self.ramp.len() - 1;
        let level = (temperature.clamp(0.0, 1.0) * top as f32).round() as usize;
        self.ramp[level.min(top)]
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, world: &World) -> String {
        let w = world.width() as usize;
        let mut out = String::with_capacity((w + 1) * world.height() as usize);
        for (flags, temps) in world.properties().chunks(w).zip(world.state().chunks(w)) {
            for (f, t) in flags.iter().zip(temps) {
                out.push(if f.is_insulator() { '#' } else { self.shade(*t) });
            }
            out.push('\n');
        }
        out
    }
}
