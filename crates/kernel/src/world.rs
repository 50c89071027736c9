use serde::Serialize;

use crate::cell::CellFlags;

/// Errors raised while constructing or editing a [`World`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    #[error("world dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },
    #[error("world of {width}x{height} cells does not fit in memory")]
    TooManyCells { width: u32, height: u32 },
    #[error("expected {expected} cells, got {properties} properties and {state} temperatures")]
    LengthMismatch {
        expected: usize,
        properties: usize,
        state: usize,
    },
    #[error("alpha must be finite and non-negative, got {0}")]
    InvalidAlpha(f32),
    #[error("temperature {value} at cell {index} is outside [0, 1]")]
    TemperatureOutOfRange { index: usize, value: f32 },
    #[error("cell ({x}, {y}) is outside a {width}x{height} world")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("test world needs at least 3x3 cells, got {0}")]
    GridTooSmall(u32),
}

/// A heat diffusion world: fixed cell properties plus the evolving temperature
/// field.
///
/// Both arrays are row-major, `index = y * width + x`. Only the stepper (and
/// [`World::set_temperature`] while seeding initial conditions) writes to the
/// state; cell flags are frozen at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct World {
    width: u32,
    height: u32,
    alpha: f32,
    properties: Vec<CellFlags>,
    pub(crate) state: Vec<f32>,
    pub(crate) time: f32,
}

impl World {
    /// Build a world from its parts, validating shape and value ranges.
    /// Time starts at zero.
    pub fn new(
        width: u32,
        height: u32,
        alpha: f32,
        properties: Vec<CellFlags>,
        state: Vec<f32>,
    ) -> Result<Self, WorldError> {
        let expected = cell_count(width, height)?;
        if properties.len() != expected || state.len() != expected {
            return Err(WorldError::LengthMismatch {
                expected,
                properties: properties.len(),
                state: state.len(),
            });
        }
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(WorldError::InvalidAlpha(alpha));
        }
        if let Some((index, &value)) = state
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(WorldError::TemperatureOutOfRange { index, value });
        }
        Ok(Self {
            width,
            height,
            alpha,
            properties,
            state,
            time: 0.0,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Diffusion rate coefficient.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Elapsed simulation time.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn cell_count(&self) -> usize {
        self.properties.len()
    }

    /// Per-cell flags, row-major.
    pub fn properties(&self) -> &[CellFlags] {
        &self.properties
    }

    /// Per-cell temperatures, row-major.
    pub fn state(&self) -> &[f32] {
        &self.state
    }

    /// Row-major index of `(x, y)`, or `None` when outside the grid.
    pub fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn flags_at(&self, x: u32, y: u32) -> Option<CellFlags> {
        self.index(x, y).map(|i| self.properties[i])
    }

    pub fn temperature_at(&self, x: u32, y: u32) -> Option<f32> {
        self.index(x, y).map(|i| self.state[i])
    }

    /// Seed the temperature of a single cell.
    pub fn set_temperature(&mut self, x: u32, y: u32, value: f32) -> Result<(), WorldError> {
        let index = self.index(x, y).ok_or(WorldError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        if !(0.0..=1.0).contains(&value) {
            return Err(WorldError::TemperatureOutOfRange { index, value });
        }
        self.state[index] = value;
        Ok(())
    }

    /// True when every border cell is fixed or insulating, which is what the
    /// stepper needs to avoid reading past the grid edge.
    pub fn border_is_sealed(&self) -> bool {
        let (w, h) = (self.width, self.height);
        let sealed = |x: u32, y: u32| self.flags_at(x, y).is_some_and(CellFlags::blocks_update);
        (0..w).all(|x| sealed(x, 0) && sealed(x, h - 1))
            && (0..h).all(|y| sealed(0, y) && sealed(w - 1, y))
    }
}

fn cell_count(width: u32, height: u32) -> Result<usize, WorldError> {
    if width == 0 || height == 0 {
        return Err(WorldError::EmptyGrid { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(WorldError::TooManyCells { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(width: u32, height: u32) -> World {
        let mut properties = vec![CellFlags::NONE; (width * height) as usize];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    properties[(y * width + x) as usize] = CellFlags::INSULATOR;
                }
            }
        }
        let state = vec![0.0; properties.len()];
        World::new(width, height, 0.1, properties, state).unwrap()
    }

    #[test]
    fn new_world_starts_at_time_zero() {
        let w = boxed(4, 3);
        assert_eq!(w.width(), 4);
        assert_eq!(w.height(), 3);
        assert_eq!(w.cell_count(), 12);
        assert_eq!(w.time(), 0.0);
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = World::new(2, 2, 0.1, vec![CellFlags::NONE; 4], vec![0.0; 3]).unwrap_err();
        assert_eq!(
            err,
            WorldError::LengthMismatch {
                expected: 4,
                properties: 4,
                state: 3
            }
        );
    }

    #[test]
    fn rejects_empty_grid() {
        let err = World::new(0, 5, 0.1, vec![], vec![]).unwrap_err();
        assert!(matches!(err, WorldError::EmptyGrid { .. }));
    }

    #[test]
    fn rejects_bad_alpha() {
        let props = vec![CellFlags::NONE; 1];
        assert!(matches!(
            World::new(1, 1, -0.5, props.clone(), vec![0.0]),
            Err(WorldError::InvalidAlpha(_))
        ));
        assert!(matches!(
            World::new(1, 1, f32::NAN, props, vec![0.0]),
            Err(WorldError::InvalidAlpha(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let err = World::new(2, 1, 0.1, vec![CellFlags::NONE; 2], vec![0.5, 1.5]).unwrap_err();
        assert_eq!(
            err,
            WorldError::TemperatureOutOfRange {
                index: 1,
                value: 1.5
            }
        );
    }

    #[test]
    fn indexing_is_row_major() {
        let w = boxed(5, 4);
        assert_eq!(w.index(0, 0), Some(0));
        assert_eq!(w.index(4, 0), Some(4));
        assert_eq!(w.index(1, 2), Some(11));
        assert_eq!(w.index(5, 0), None);
        assert_eq!(w.index(0, 4), None);
    }

    #[test]
    fn set_temperature_validates() {
        let mut w = boxed(3, 3);
        w.set_temperature(1, 1, 0.75).unwrap();
        assert_eq!(w.temperature_at(1, 1), Some(0.75));
        assert!(matches!(
            w.set_temperature(3, 1, 0.5),
            Err(WorldError::OutOfBounds { .. })
        ));
        assert!(matches!(
            w.set_temperature(1, 1, -0.1),
            Err(WorldError::TemperatureOutOfRange { .. })
        ));
    }

    #[test]
    fn border_sealing() {
        let w = boxed(4, 4);
        assert!(w.border_is_sealed());

        let open = World::new(3, 3, 0.1, vec![CellFlags::NONE; 9], vec![0.0; 9]).unwrap();
        assert!(!open.border_is_sealed());
    }
}
