use std::path::PathBuf;

use pnmedit_core::{Channels, DecodeError, EncodeError, SelectionError, TransformError};
use thiserror::Error;

/// A rejected command. `Display` is the exact line shown to the user.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No image loaded")]
    NoImage,

    /// Unknown verb, wrong argument count or a malformed argument
    #[error("Invalid command")]
    Invalid,

    #[error("Failed to load {path}")]
    Load {
        path: String,
        #[source]
        source: DecodeError,
    },

    #[error("Cannot open {path}")]
    Save {
        path: String,
        #[source]
        source: EncodeError,
    },

    #[error("Invalid set of coordinates")]
    Selection(#[from] SelectionError),

    #[error("Black and white image needed")]
    GrayscaleRequired,

    #[error("Easy, Charlie Chaplin")]
    ColorRequired,

    #[error("APPLY parameter invalid")]
    UnknownKernel,

    #[error("Unsupported rotation angle")]
    UnsupportedAngle,

    #[error("The selection must be square")]
    NotSquare,

    /// The command needed more memory than was available
    #[error("Not enough memory")]
    OutOfMemory,
}

impl From<TransformError> for CommandError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::UnsupportedChannels {
                required: Channels::Grayscale,
                ..
            } => CommandError::GrayscaleRequired,
            TransformError::UnsupportedChannels {
                required: Channels::Color,
                ..
            } => CommandError::ColorRequired,
            TransformError::UnsupportedAngle(_) => CommandError::UnsupportedAngle,
            TransformError::SelectionNotSquare { .. } => CommandError::NotSquare,
            TransformError::UnknownKernel(_) => CommandError::UnknownKernel,
            TransformError::InvalidBinCount(_) => CommandError::Invalid,
            TransformError::OutOfMemory => CommandError::OutOfMemory,
        }
    }
}

/// Failures that end the whole run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to read script {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
