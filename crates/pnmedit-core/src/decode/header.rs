//! Header tokenizer.
//!
//! Netpbm headers are whitespace-delimited tokens. A `#` where a token would
//! start opens a comment that runs to the end of the line and is skipped.

use super::DecodeError;
use crate::raster::ImageFormat;

/// Largest max value the raster store can hold.
const MAX_SAMPLE_VALUE: u32 = u16::MAX as u32;

/// ASCII whitespace, vertical tab and form feed included.
#[inline]
pub(super) fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Cursor over whitespace-delimited tokens.
pub(super) struct Tokens<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub(super) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Byte offset just past the last token returned.
    pub(super) fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    pub(super) fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    /// Next token, skipping whitespace and comments. `None` at end of input.
    pub(super) fn next_token(&mut self) -> Option<&'a [u8]> {
        loop {
            while self.pos < self.bytes.len() && is_whitespace(self.bytes[self.pos]) {
                self.pos += 1;
            }
            if self.pos >= self.bytes.len() {
                return None;
            }
            if self.bytes[self.pos] == b'#' {
                while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }

            let start = self.pos;
            while self.pos < self.bytes.len() && !is_whitespace(self.bytes[self.pos]) {
                self.pos += 1;
            }
            return Some(&self.bytes[start..self.pos]);
        }
    }

    /// Next token parsed as a base-10 unsigned integer.
    pub(super) fn next_u32(&mut self) -> Option<Result<u32, &'a [u8]>> {
        self.next_token().map(|token| {
            std::str::from_utf8(token)
                .ok()
                .and_then(|text| text.parse::<u32>().ok())
                .ok_or(token)
        })
    }
}

/// The four header fields in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Header {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub max_value: u16,
}

/// Read magic, width, height and max value.
///
/// On success the cursor sits just past the max value token.
pub(super) fn read_header(tokens: &mut Tokens<'_>) -> Result<Header, DecodeError> {
    let magic = tokens
        .next_token()
        .ok_or_else(|| DecodeError::InvalidFormat(String::new()))?;
    let format = ImageFormat::from_magic(magic)
        .ok_or_else(|| DecodeError::InvalidFormat(String::from_utf8_lossy(magic).into_owned()))?;

    let width = read_field(tokens, "width")?;
    let height = read_field(tokens, "height")?;
    let max_value = read_field(tokens, "max value")?;

    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidHeader(format!(
            "dimensions {width}x{height} must be non-zero"
        )));
    }
    if max_value == 0 || max_value > MAX_SAMPLE_VALUE {
        return Err(DecodeError::InvalidHeader(format!(
            "max value {max_value} must be between 1 and {MAX_SAMPLE_VALUE}"
        )));
    }

    Ok(Header {
        format,
        width,
        height,
        max_value: max_value as u16,
    })
}

fn read_field(tokens: &mut Tokens<'_>, name: &str) -> Result<u32, DecodeError> {
    match tokens.next_u32() {
        Some(Ok(value)) => Ok(value),
        Some(Err(token)) => Err(DecodeError::InvalidHeader(format!(
            "{name} {:?} is not a number",
            String::from_utf8_lossy(token)
        ))),
        None => Err(DecodeError::InvalidHeader(format!("missing {name}"))),
    }
}
