//! Geometric and filtering transforms: crop, rotation and 3x3 kernels.
//!
//! Every transform reads the image's current [`Selection`](crate::Selection)
//! and returns a new [`Image`](crate::Image); the source is left untouched so
//! a failed transform never disturbs the caller's image.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, `x` grows right and `y` grows down
//! - Planes are row-major, indexed `y * width + x`
//! - Positive rotation angles turn clockwise

use thiserror::Error;

use crate::raster::Channels;

mod crop;
mod kernel;
mod rotation;

pub use crop::apply_crop;
pub use kernel::{apply_kernel, Kernel};
pub use rotation::{apply_rotation, QuarterTurns};

pub(crate) use crop::crop_plane;

/// Errors raised when a transform's preconditions do not hold.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransformError {
    /// The operation is defined for one channel family only
    #[error("{operation} requires a {required:?} image")]
    UnsupportedChannels {
        operation: &'static str,
        required: Channels,
    },

    /// Rotation angle is not a multiple of 90 degrees
    #[error("Unsupported rotation angle: {0}")]
    UnsupportedAngle(i32),

    /// A partial selection must be square to rotate in place
    #[error("The selection must be square, got {width}x{height}")]
    SelectionNotSquare { width: u32, height: u32 },

    /// Histograms need at least one bin
    #[error("Invalid bin count: {0}")]
    InvalidBinCount(u32),

    /// The kernel name is not one of the fixed filters
    #[error("Unknown kernel: {0:?}")]
    UnknownKernel(String),

    /// A working buffer could not be allocated
    #[error("Out of memory")]
    OutOfMemory,
}

impl TransformError {
    /// Shorthand for a channel-family mismatch.
    pub(crate) fn requires(operation: &'static str, required: Channels) -> Self {
        TransformError::UnsupportedChannels {
            operation,
            required,
        }
    }
}
