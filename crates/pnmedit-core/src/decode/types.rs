//! Core types for image decoding.

use std::path::PathBuf;

use thiserror::Error;

use crate::raster::RasterError;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The magic token is not one of the four supported formats.
    #[error("Invalid or unsupported image format: {0:?}")]
    InvalidFormat(String),

    /// A header field is missing, not a number, or out of range.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The pixel data is truncated or malformed.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The pixel plane could not be allocated.
    #[error("Out of memory during decoding")]
    OutOfMemory,

    /// The decoded parts violate an image invariant.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// The source file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
