//! PNM (P2/P3/P5/P6) decoding.

use std::path::Path;

use log::debug;

use super::header::{is_whitespace, read_header, Header, Tokens};
use super::DecodeError;
use crate::raster::{Channels, Encoding, Image, Pixels, Rgb};

/// Decode a PNM image from bytes.
///
/// The magic token picks the channel axis (`P2`/`P5` grayscale, `P3`/`P6`
/// color) and the encoding axis (`P2`/`P3` text, `P5`/`P6` binary). The
/// returned image selects its full bounds.
///
/// # Errors
///
/// - `DecodeError::InvalidFormat` for an unknown magic token
/// - `DecodeError::InvalidHeader` for a bad width, height or max value
/// - `DecodeError::CorruptedFile` when the pixel data is short or malformed
/// - `DecodeError::OutOfMemory` when the plane cannot be allocated
pub fn decode_pnm(bytes: &[u8]) -> Result<Image, DecodeError> {
    let mut tokens = Tokens::new(bytes);
    let header = read_header(&mut tokens)?;

    let pixels = match header.format.encoding() {
        Encoding::Text => read_text_body(&mut tokens, &header)?,
        Encoding::Binary => read_binary_body(&bytes[tokens.position()..], &header)?,
    };

    let image = Image::new(
        header.format,
        header.width,
        header.height,
        header.max_value,
        pixels,
    )?;

    debug!(
        "decoded {} image {}x{} (max {})",
        image.format(),
        image.width(),
        image.height(),
        image.max_value()
    );
    Ok(image)
}

/// Read and decode a PNM file.
pub fn load_image(path: impl AsRef<Path>) -> Result<Image, DecodeError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_pnm(&bytes)
}

/// Number of samples the body must hold.
fn sample_count(header: &Header) -> Result<usize, DecodeError> {
    (header.width as usize)
        .checked_mul(header.height as usize)
        .and_then(|pixels| pixels.checked_mul(header.format.channels().samples_per_pixel()))
        .ok_or(DecodeError::OutOfMemory)
}

/// Allocate an empty plane with room for `len` pixels.
fn reserve_plane<T>(len: usize) -> Result<Vec<T>, DecodeError> {
    let mut plane = Vec::new();
    plane
        .try_reserve_exact(len)
        .map_err(|_| DecodeError::OutOfMemory)?;
    Ok(plane)
}

fn read_text_body(tokens: &mut Tokens<'_>, header: &Header) -> Result<Pixels, DecodeError> {
    let needed = sample_count(header)?;

    // Every sample takes at least one digit plus a separator, so a body
    // shorter than that cannot be complete. Checked before allocating.
    if tokens.remaining().len() < needed.saturating_mul(2).saturating_sub(1) {
        return Err(DecodeError::CorruptedFile(format!(
            "expected {needed} samples, body is only {} bytes",
            tokens.remaining().len()
        )));
    }

    let mut samples = reserve_plane::<u16>(needed)?;
    for index in 0..needed {
        let sample = match tokens.next_u32() {
            Some(Ok(value)) => value,
            Some(Err(token)) => {
                return Err(DecodeError::CorruptedFile(format!(
                    "sample {index} {:?} is not a number",
                    String::from_utf8_lossy(token)
                )))
            }
            None => {
                return Err(DecodeError::CorruptedFile(format!(
                    "expected {needed} samples, found {index}"
                )))
            }
        };
        if sample > u32::from(header.max_value) {
            return Err(DecodeError::CorruptedFile(format!(
                "sample {index} ({sample}) exceeds max value {}",
                header.max_value
            )));
        }
        samples.push(sample as u16);
    }

    into_plane(samples, header.format.channels())
}

fn read_binary_body(after_header: &[u8], header: &Header) -> Result<Pixels, DecodeError> {
    // Exactly one whitespace byte separates the header from raw samples.
    let body = match after_header.split_first() {
        Some((&separator, body)) if is_whitespace(separator) => body,
        _ => {
            return Err(DecodeError::CorruptedFile(
                "missing whitespace after header".to_string(),
            ))
        }
    };

    let needed = sample_count(header)?;
    let width = bytes_per_sample(header.max_value);
    let needed_bytes = needed.checked_mul(width).ok_or(DecodeError::OutOfMemory)?;
    if body.len() < needed_bytes {
        return Err(DecodeError::CorruptedFile(format!(
            "expected {needed_bytes} bytes of pixel data, found {}",
            body.len()
        )));
    }

    let mut samples = reserve_plane::<u16>(needed)?;
    match width {
        1 => samples.extend(body[..needed].iter().map(|&b| u16::from(b))),
        _ => samples.extend(
            body[..needed_bytes]
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]])),
        ),
    }

    into_plane(samples, header.format.channels())
}

/// Bytes per binary sample: one below 256, two (big-endian) above.
#[inline]
pub(crate) fn bytes_per_sample(max_value: u16) -> usize {
    if max_value < 256 {
        1
    } else {
        2
    }
}

/// Group a flat sample list into the plane for `channels`.
fn into_plane(samples: Vec<u16>, channels: Channels) -> Result<Pixels, DecodeError> {
    match channels {
        Channels::Grayscale => Ok(Pixels::Gray(samples)),
        Channels::Color => {
            let mut plane = reserve_plane::<Rgb>(samples.len() / 3)?;
            plane.extend(
                samples
                    .chunks_exact(3)
                    .map(|rgb| Rgb::new(rgb[0], rgb[1], rgb[2])),
            );
            Ok(Pixels::Color(plane))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{ImageFormat, Pixel};

    #[test]
    fn test_decode_grayscale_text() {
        let img = decode_pnm(b"P2\n2 2\n255\n10 20\n30 40\n").unwrap();
        assert_eq!(img.format(), ImageFormat::GrayscaleText);
        assert_eq!((img.width(), img.height(), img.max_value()), (2, 2, 255));
        assert_eq!(img.pixels(), &Pixels::Gray(vec![10, 20, 30, 40]));
        assert!(img.is_fully_selected());
    }

    #[test]
    fn test_decode_color_text() {
        let img = decode_pnm(b"P3\n2 1\n100\n1 2 3 4 5 6\n").unwrap();
        assert_eq!(img.format(), ImageFormat::ColorText);
        assert_eq!(img.pixel(0, 0), Some(Pixel::Color(Rgb::new(1, 2, 3))));
        assert_eq!(img.pixel(1, 0), Some(Pixel::Color(Rgb::new(4, 5, 6))));
    }

    #[test]
    fn test_decode_text_ignores_line_layout() {
        let img = decode_pnm(b"P2 3 1 9 1\n\n2    3").unwrap();
        assert_eq!(img.pixels(), &Pixels::Gray(vec![1, 2, 3]));
    }

    #[test]
    fn test_decode_grayscale_binary() {
        let mut bytes = b"P5\n3 2\n255\n".to_vec();
        bytes.extend_from_slice(&[0, 1, 2, 253, 254, 255]);
        let img = decode_pnm(&bytes).unwrap();
        assert_eq!(img.format(), ImageFormat::GrayscaleBinary);
        assert_eq!(img.pixels(), &Pixels::Gray(vec![0, 1, 2, 253, 254, 255]));
    }

    #[test]
    fn test_decode_color_binary() {
        let mut bytes = b"P6\n1 2\n255\n".to_vec();
        bytes.extend_from_slice(&[255, 0, 0, 0, 128, 255]);
        let img = decode_pnm(&bytes).unwrap();
        assert_eq!(img.pixel(0, 0), Some(Pixel::Color(Rgb::new(255, 0, 0))));
        assert_eq!(img.pixel(0, 1), Some(Pixel::Color(Rgb::new(0, 128, 255))));
    }

    #[test]
    fn test_binary_sample_that_looks_like_whitespace() {
        // First sample is '\n' (10); only the single separator is skipped
        let mut bytes = b"P5 2 1 255\n".to_vec();
        bytes.extend_from_slice(&[b'\n', b' ']);
        let img = decode_pnm(&bytes).unwrap();
        assert_eq!(img.pixels(), &Pixels::Gray(vec![10, 32]));
    }

    #[test]
    fn test_decode_sixteen_bit_binary() {
        let mut bytes = b"P5\n2 1\n1023\n".to_vec();
        bytes.extend_from_slice(&[0x03, 0xFF, 0x01, 0x00]);
        let img = decode_pnm(&bytes).unwrap();
        assert_eq!(img.pixels(), &Pixels::Gray(vec![1023, 256]));
    }

    #[test]
    fn test_decode_binary_with_header_comment() {
        let mut bytes = b"P5\n# comment\n1 1\n# another\n255\n".to_vec();
        bytes.push(7);
        let img = decode_pnm(&bytes).unwrap();
        assert_eq!(img.pixels(), &Pixels::Gray(vec![7]));
    }

    #[test]
    fn test_truncated_binary_body() {
        let mut bytes = b"P6\n2 2\n255\n".to_vec();
        bytes.extend_from_slice(&[1, 2, 3]);
        let err = decode_pnm(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::CorruptedFile(_)));
    }

    #[test]
    fn test_binary_without_separator() {
        let err = decode_pnm(b"P5\n1 1\n255").unwrap_err();
        assert!(matches!(err, DecodeError::CorruptedFile(_)));
    }

    #[test]
    fn test_truncated_text_body() {
        let err = decode_pnm(b"P2\n2 2\n255\n1 2 3\n").unwrap_err();
        assert!(matches!(err, DecodeError::CorruptedFile(_)));
    }

    #[test]
    fn test_text_sample_not_a_number() {
        let err = decode_pnm(b"P2\n2 1\n255\n1 x\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Corrupted or incomplete image file: sample 1 \"x\" is not a number"
        );
    }

    #[test]
    fn test_text_sample_above_max() {
        let err = decode_pnm(b"P2\n2 1\n15\n1 16\n").unwrap_err();
        assert!(matches!(err, DecodeError::CorruptedFile(_)));
    }

    #[test]
    fn test_binary_sample_above_max() {
        let mut bytes = b"P5\n1 1\n100\n".to_vec();
        bytes.push(200);
        let err = decode_pnm(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::Raster(_)));
    }

    #[test]
    fn test_huge_header_fails_before_allocating() {
        let err = decode_pnm(b"P5\n100000 100000\n255\n\x00").unwrap_err();
        assert!(matches!(err, DecodeError::CorruptedFile(_)));

        let err = decode_pnm(b"P2\n100000 100000\n255\n0 0").unwrap_err();
        assert!(matches!(err, DecodeError::CorruptedFile(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_image("/definitely/not/here.pgm").unwrap_err();
        assert!(matches!(err, DecodeError::Io { .. }));
        assert!(err.to_string().starts_with("Failed to read /definitely/not/here.pgm"));
    }

    #[test]
    fn test_bytes_per_sample() {
        assert_eq!(bytes_per_sample(1), 1);
        assert_eq!(bytes_per_sample(255), 1);
        assert_eq!(bytes_per_sample(256), 2);
        assert_eq!(bytes_per_sample(u16::MAX), 2);
    }
}
