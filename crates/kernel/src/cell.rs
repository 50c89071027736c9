use serde::{Deserialize, Serialize};

/// Fixed properties of a single grid cell, stored as the on-disk bit-mask.
///
/// A cell may be free (no flags), `FIXED` (temperature clamped by the world
/// author) or `INSULATOR` (never exchanges heat). Flags never change once a
/// world has been created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellFlags(u32);

impl CellFlags {
    /// Free-flowing cell.
    pub const NONE: Self = Self(0);
    /// Cell maintains a fixed temperature.
    pub const FIXED: Self = Self(0x1);
    /// Heat does not flow across this cell.
    pub const INSULATOR: Self = Self(0x2);

    /// Accept exactly the values a persisted world may contain: free, fixed or
    /// insulator. The combined pattern `FIXED | INSULATOR` is rejected, as is
    /// any unknown bit.
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0 => Some(Self::NONE),
            0x1 => Some(Self::FIXED),
            0x2 => Some(Self::INSULATOR),
            _ => None,
        }
    }

    /// Raw bit-mask.
    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_fixed(self) -> bool {
        self.contains(Self::FIXED)
    }

    pub fn is_insulator(self) -> bool {
        self.contains(Self::INSULATOR)
    }

    /// True when the stepper must leave this cell's temperature untouched.
    pub fn blocks_update(self) -> bool {
        self.is_fixed() || self.is_insulator()
    }
}

impl std::ops::BitOr for CellFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
