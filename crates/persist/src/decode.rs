use std::io::Read;
use std::str::FromStr;

use heatgrid_kernel::{CellFlags, World};

use crate::encode::{Encoding, TERMINATOR};
use crate::error::{CodecError, FormatError, Section, ValidationError};

/// Read a whole world from `src`.
///
/// The stream is read to its end; anything after the `End` marker is ignored.
pub fn read_world<R: Read>(mut src: R) -> Result<World, CodecError> {
    let mut bytes = Vec::new();
    src.read_to_end(&mut bytes)?;
    decode(&bytes)
}

/// Parse a world from its encoded bytes.
///
/// The encoding (text or binary) is chosen solely by the magic header. Tokens
/// are separated by ASCII whitespace; each `-` delimiter is a single character,
/// so a binary payload starts on the byte right after it. Decoding is
/// all-or-nothing: any error means no world.
pub fn decode(bytes: &[u8]) -> Result<World, CodecError> {
    let mut scanner = Scanner::new(bytes);

    let header = scanner.token().unwrap_or_default();
    let encoding = std::str::from_utf8(header)
        .ok()
        .and_then(Encoding::from_magic)
        .ok_or_else(|| FormatError::UnrecognizedFormat {
            found: lossy(header),
        })?;

    let width: u32 = header_field(&mut scanner, "width")?;
    let height: u32 = header_field(&mut scanner, "height")?;
    let alpha: f32 = header_field(&mut scanner, "alpha")?;
    if width == 0 {
        return Err(corrupt_header("width", width).into());
    }
    if height == 0 {
        return Err(corrupt_header("height", height).into());
    }
    if !alpha.is_finite() || alpha < 0.0 {
        return Err(corrupt_header("alpha", alpha).into());
    }
    let cells = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| corrupt_header("dimensions", format!("{width}x{height}")))?;

    tracing::debug!(?encoding, width, height, alpha, "decoding world");

    expect_delimiter(&mut scanner, Section::Properties)?;
    let properties = match encoding {
        Encoding::Text => read_text(&mut scanner, Section::Properties, cells, parse_flags)?,
        Encoding::Binary => read_binary(&mut scanner, Section::Properties, cells, |i, raw| {
            parse_flags(i, u32::from_le_bytes(raw))
        })?,
    };

    expect_delimiter(&mut scanner, Section::State)?;
    let state = match encoding {
        Encoding::Text => read_text(&mut scanner, Section::State, cells, check_temperature)?,
        Encoding::Binary => read_binary(&mut scanner, Section::State, cells, |i, raw| {
            check_temperature(i, f32::from_le_bytes(raw))
        })?,
    };

    match scanner.token() {
        Some(t) if t == TERMINATOR.as_bytes() => {}
        found => {
            return Err(FormatError::MissingTerminator {
                found: found.map(lossy),
            }
            .into());
        }
    }

    Ok(World::new(width, height, alpha, properties, state)?)
}

fn parse_flags(index: usize, bits: u32) -> Result<CellFlags, CodecError> {
    CellFlags::from_bits(bits).ok_or_else(|| ValidationError::InvalidFlags { index, bits }.into())
}

fn check_temperature(index: usize, value: f32) -> Result<f32, CodecError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::TemperatureOutOfRange { index, value }.into())
    }
}

/// Read `count` whitespace-separated decimal values.
fn read_text<N, T>(
    scanner: &mut Scanner<'_>,
    section: Section,
    count: usize,
    validate: impl Fn(usize, N) -> Result<T, CodecError>,
) -> Result<Vec<T>, CodecError>
where
    N: FromStr,
{
    // Every value takes at least two bytes (separator + digit).
    let mut out = Vec::with_capacity(count.min(scanner.remaining() / 2));
    for index in 0..count {
        let token = scanner.token().ok_or(FormatError::Truncated {
            section,
            expected: count,
            read: index,
        })?;
        let value = std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse::<N>().ok())
            .ok_or_else(|| FormatError::MalformedValue {
                section,
                index,
                found: lossy(token),
            })?;
        out.push(validate(index, value)?);
    }
    Ok(out)
}

/// Read `count` packed 4-byte little-endian values.
fn read_binary<T>(
    scanner: &mut Scanner<'_>,
    section: Section,
    count: usize,
    validate: impl Fn(usize, [u8; 4]) -> Result<T, CodecError>,
) -> Result<Vec<T>, CodecError> {
    let raw = count
        .checked_mul(4)
        .and_then(|len| scanner.take(len))
        .ok_or(FormatError::Truncated {
            section,
            expected: count,
            read: scanner.remaining() / 4,
        })?;
    raw.chunks_exact(4)
        .enumerate()
        .map(|(index, chunk)| validate(index, [chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

fn header_field<N: FromStr>(
    scanner: &mut Scanner<'_>,
    field: &'static str,
) -> Result<N, FormatError> {
    let token = scanner.token().unwrap_or_default();
    std::str::from_utf8(token)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| corrupt_header(field, lossy(token)))
}

fn expect_delimiter(scanner: &mut Scanner<'_>, section: Section) -> Result<(), FormatError> {
    match scanner.next_char() {
        Some(b'-') => Ok(()),
        found => Err(FormatError::CorruptDelimiter {
            section,
            found: found.map(char::from),
        }),
    }
}

fn corrupt_header(field: &'static str, found: impl ToString) -> FormatError {
    FormatError::CorruptHeader {
        field,
        found: found.to_string(),
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Byte cursor with stream-extraction style whitespace skipping.
struct Scanner<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.buf.len() && self.buf[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    /// Next whitespace-delimited token, or `None` at end of input.
    fn token(&mut self) -> Option<&'a [u8]> {
        self.skip_whitespace();
        let start = self.pos;
        while self.pos < self.buf.len() && !self.buf[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        (self.pos > start).then(|| &self.buf[start..self.pos])
    }

    /// Next non-whitespace byte.
    fn next_char(&mut self) -> Option<u8> {
        self.skip_whitespace();
        let c = self.buf.get(self.pos).copied()?;
        self.pos += 1;
        Some(c)
    }

    /// Exactly `len` raw bytes, with no whitespace skipping.
    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let bytes = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }
}
