use heatgrid_kernel::WorldError;

/// Which part of a world file was being read when decoding failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Properties,
    State,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Properties => f.write_str("properties"),
            Section::State => f.write_str("state"),
        }
    }
}

/// Structural problems in a world file.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("unrecognized world format, header was {found:?}")]
    UnrecognizedFormat { found: String },
    #[error("corrupt header: bad {field} {found:?}")]
    CorruptHeader { field: &'static str, found: String },
    #[error("corrupt input: expected '-' before {section} array, found {found:?}")]
    CorruptDelimiter {
        section: Section,
        found: Option<char>,
    },
    #[error("truncated input: read {read} of {expected} {section} values")]
    Truncated {
        section: Section,
        expected: usize,
        read: usize,
    },
    #[error("malformed {section} value {found:?} at cell {index}")]
    MalformedValue {
        section: Section,
        index: usize,
        found: String,
    },
    #[error("missing 'End' terminator, found {found:?}")]
    MissingTerminator { found: Option<String> },
}

/// Well-formed values that a world may not contain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown flags {bits} for cell {index}")]
    InvalidFlags { index: usize, bits: u32 },
    #[error("temperature {value} at cell {index} is outside [0, 1]")]
    TemperatureOutOfRange { index: usize, value: f32 },
}

/// Errors from encoding or decoding a world.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid world: {0}")]
    World(#[from] WorldError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
