use serde::Serialize;
use sha2::{Digest, Sha256};

use heatgrid_kernel::World;
use heatgrid_persist::{Encoding, encode_to_vec};

/// World inspector for developer tooling.
///
/// Provides read-only queries against a world for debugging and for
/// comparing simulation runs.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        let mut free_cells = 0;
        let mut fixed_cells = 0;
        let mut insulator_cells = 0;
        let mut range: Option<(f32, f32)> = None;
        let mut sum = 0.0f64;

        for (flags, &t) in world.properties().iter().zip(world.state()) {
            if flags.is_insulator() {
                insulator_cells += 1;
                continue;
            }
            if flags.is_fixed() {
                fixed_cells += 1;
            } else {
                free_cells += 1;
            }
            sum += f64::from(t);
            range = Some(match range {
                Some((lo, hi)) => (lo.min(t), hi.max(t)),
                None => (t, t),
            });
        }

        let conductive = free_cells + fixed_cells;
        let temperature = range.map(|(min, max)| TemperatureStats {
            min,
            max,
            mean: (sum / conductive as f64) as f32,
        });

        WorldSummary {
            width: world.width(),
            height: world.height(),
            alpha: world.alpha(),
            time: world.time(),
            free_cells,
            fixed_cells,
            insulator_cells,
            temperature,
        }
    }

    /// Hex SHA-256 of the binary encoding.
    ///
    /// Equal digests mean bit-identical dimensions, alpha, flags and
    /// temperatures. Time is not part of the encoding and so not covered.
    pub fn digest(world: &World) -> String {
        let mut hasher = Sha256::new();
        hasher.update(encode_to_vec(world, Encoding::Binary));
        format!("{:x}", hasher.finalize())
    }
}

/// Summary of a world for the inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSummary {
    pub width: u32,
    pub height: u32,
    pub alpha: f32,
    pub time: f32,
    pub free_cells: usize,
    pub fixed_cells: usize,
    pub insulator_cells: usize,
    /// Statistics over non-insulating cells; `None` if every cell insulates.
    pub temperature: Option<TemperatureStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: {}x{} alpha={} time={} free={} fixed={} insulator={}",
            self.width,
            self.height,
            self.alpha,
            self.time,
            self.free_cells,
            self.fixed_cells,
            self.insulator_cells
        )?;
        match &self.temperature {
            Some(t) => write!(f, " temp=[{:.6}, {:.6}] mean={:.6}", t.min, t.max, t.mean),
            None => write!(f, " temp=n/a"),
        }
    }
}
