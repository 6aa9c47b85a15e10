//! PNM (P2/P3/P5/P6) encoding.
//!
//! The channel axis always comes from the image; the encoding axis is chosen
//! by the caller, so a `P2` image can be saved as `P5` and vice versa.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::decode::bytes_per_sample;
use crate::raster::{Encoding, Image, Pixels};

/// Errors that can occur while writing an image.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The destination file could not be created or written
    #[error("Failed to write {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output stream rejected a write
    #[error("Write failed: {0}")]
    Write(#[from] std::io::Error),
}

/// Write `image` to `writer` in the given encoding.
///
/// Layout: magic, `"{width} {height}\n"`, `"{max_value}\n"`, then the body.
/// Text bodies put one image row per line with single spaces between
/// samples. Binary bodies are raw samples, one byte each below a max value
/// of 256 and two big-endian bytes otherwise.
///
/// Rows are streamed straight from the image without an intermediate copy,
/// so an unbuffered `writer` should be wrapped in a `BufWriter`.
pub fn write_pnm<W: Write>(
    image: &Image,
    encoding: Encoding,
    mut writer: W,
) -> Result<(), EncodeError> {
    let format = image.format().with_encoding(encoding);
    write!(
        writer,
        "{}\n{} {}\n{}\n",
        format.magic(),
        image.width(),
        image.height(),
        image.max_value()
    )?;

    let width = image.width() as usize;
    let wide = bytes_per_sample(image.max_value()) == 2;
    match image.pixels() {
        Pixels::Gray(plane) => {
            let rows = plane.chunks(width).map(|row| row.iter().copied());
            write_body(&mut writer, rows, encoding, wide)?;
        }
        Pixels::Color(plane) => {
            let rows = plane
                .chunks(width)
                .map(|row| row.iter().flat_map(|px| px.channels()));
            write_body(&mut writer, rows, encoding, wide)?;
        }
    }

    writer.flush()?;
    debug!(
        "encoded {format} image {}x{}",
        image.width(),
        image.height()
    );
    Ok(())
}

/// Encode `image` into an in-memory buffer.
///
/// # Example
///
/// ```ignore
/// use pnmedit_core::encode::encode_pnm;
/// use pnmedit_core::{Encoding, Image};
///
/// let image = Image::from_gray(2, 1, 255, vec![0, 255])?;
/// let bytes = encode_pnm(&image, Encoding::Text)?;
/// assert_eq!(bytes, b"P2\n2 1\n255\n0 255\n");
/// ```
pub fn encode_pnm(image: &Image, encoding: Encoding) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Vec::new();
    write_pnm(image, encoding, &mut buffer)?;
    Ok(buffer)
}

/// Create (or truncate) `path` and write `image` to it.
pub fn save_image(
    image: &Image,
    path: impl AsRef<Path>,
    encoding: Encoding,
) -> Result<(), EncodeError> {
    let path = path.as_ref();
    let io_error = |source| EncodeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    write_pnm(image, encoding, BufWriter::new(file)).map_err(|err| match err {
        EncodeError::Write(source) => io_error(source),
        other => other,
    })
}

/// Stream the body row by row; `wide` selects two-byte binary samples.
fn write_body<W, R>(
    writer: &mut W,
    rows: impl Iterator<Item = R>,
    encoding: Encoding,
    wide: bool,
) -> std::io::Result<()>
where
    W: Write,
    R: Iterator<Item = u16>,
{
    for row in rows {
        match encoding {
            Encoding::Text => {
                for (i, sample) in row.enumerate() {
                    if i > 0 {
                        writer.write_all(b" ")?;
                    }
                    write!(writer, "{sample}")?;
                }
                writer.write_all(b"\n")?;
            }
            Encoding::Binary if wide => {
                for sample in row {
                    writer.write_all(&sample.to_be_bytes())?;
                }
            }
            Encoding::Binary => {
                for sample in row {
                    writer.write_all(&[sample as u8])?;
                }
            }
        }
    }
    Ok(())
}
