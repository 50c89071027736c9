//! Persistence: the V0 heat world file format, in text and binary encodings.
//!
//! # Layout
//! ```text
//! HPCEHeatWorldV0 | HPCEHeatWorldV0Binary
//! <width> <height> <alpha>
//! -
//! <properties, row-major>
//! -
//! <state, row-major>
//! End
//! ```
//!
//! # Invariants
//! - Decoding is all-or-nothing; no partially populated world escapes.
//! - Binary round trips are bit-exact; text round trips are exact except for
//!   state values, which keep 8 decimal places.
//! - The format is frozen at `V0`; layout changes need a new version token.

mod decode;
mod encode;
mod error;
mod file;

pub use decode::{decode, read_world};
pub use encode::{BINARY_MAGIC, Encoding, TERMINATOR, TEXT_MAGIC, encode, encode_to_vec};
pub use error::{CodecError, FormatError, Section, ValidationError};
pub use file::{encode_and_flush, load_path, save_path};
