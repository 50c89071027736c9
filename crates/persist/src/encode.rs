use std::io::Write;

use heatgrid_kernel::World;

use crate::CodecError;

/// Magic header of the text encoding.
pub const TEXT_MAGIC: &str = "HPCEHeatWorldV0";
/// Magic header of the binary encoding.
pub const BINARY_MAGIC: &str = "HPCEHeatWorldV0Binary";
/// Trailing marker closing every world file.
pub const TERMINATOR: &str = "End";

/// How the two bulk arrays of a world file are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Space-separated decimal values, one line per row.
    #[default]
    Text,
    /// Packed little-endian 4-byte values, rows back to back.
    Binary,
}

impl Encoding {
    pub fn magic(self) -> &'static str {
        match self {
            Encoding::Text => TEXT_MAGIC,
            Encoding::Binary => BINARY_MAGIC,
        }
    }

    pub fn from_magic(header: &str) -> Option<Self> {
        match header {
            TEXT_MAGIC => Some(Encoding::Text),
            BINARY_MAGIC => Some(Encoding::Binary),
            _ => None,
        }
    }

    /// Pick binary when `binary` is set, text otherwise.
    pub fn from_flag(binary: bool) -> Self {
        if binary {
            Encoding::Binary
        } else {
            Encoding::Text
        }
    }
}

/// Write `world` to `dst` in the V0 world format.
///
/// The header line (`width height alpha`) is textual in both encodings; only
/// the properties and state arrays differ. Text state values are written with
/// 8 fixed decimal places, so a text round trip is accurate to about 1e-8
/// rather than bit-exact. Simulation time is not part of the format.
///
/// Output is not atomic: on error `dst` may hold a partial world.
pub fn encode<W: Write>(world: &World, encoding: Encoding, mut dst: W) -> Result<(), CodecError> {
    let w = world.width() as usize;

    writeln!(dst, "{}", encoding.magic())?;
    writeln!(dst, "{} {} {}", world.width(), world.height(), world.alpha())?;

    write_delimiter(&mut dst, encoding)?;
    for row in world.properties().chunks(w) {
        match encoding {
            Encoding::Text => {
                for flags in row {
                    write!(dst, " {}", flags.bits())?;
                }
                writeln!(dst)?;
            }
            Encoding::Binary => {
                let bytes: Vec<u8> = row.iter().flat_map(|f| f.bits().to_le_bytes()).collect();
                dst.write_all(&bytes)?;
            }
        }
    }
    tracing::trace!(rows = world.height(), "wrote properties");

    write_delimiter(&mut dst, encoding)?;
    for row in world.state().chunks(w) {
        match encoding {
            Encoding::Text => {
                for temp in row {
                    write!(dst, " {temp:.8}")?;
                }
                writeln!(dst)?;
            }
            Encoding::Binary => {
                let bytes: Vec<u8> = row.iter().flat_map(|t| t.to_le_bytes()).collect();
                dst.write_all(&bytes)?;
            }
        }
    }
    tracing::trace!(rows = world.height(), "wrote state");

    writeln!(dst, "{TERMINATOR}")?;
    dst.flush()?;
    Ok(())
}

/// Encode into an in-memory buffer.
pub fn encode_to_vec(world: &World, encoding: Encoding) -> Vec<u8> {
    let mut buf = Vec::new();
    encode(world, encoding, &mut buf).expect("encoding into a Vec cannot fail");
    buf
}

fn write_delimiter<W: Write>(dst: &mut W, encoding: Encoding) -> std::io::Result<()> {
    match encoding {
        Encoding::Text => writeln!(dst, "-"),
        Encoding::Binary => dst.write_all(b"-"),
    }
}
