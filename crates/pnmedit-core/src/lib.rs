//! pnmedit core - raster editing library
//!
//! This crate holds the single-image model and everything that operates on
//! it: PNM decoding and encoding, rectangular selection, crop, quarter-turn
//! rotation, 3x3 kernel filters, histograms and equalization.
//!
//! It is stateless apart from the [`Image`] a caller hands it. Operations
//! that produce a new image take `&Image` and return a fresh one, so a
//! failed operation never disturbs the caller's image.
//!
//! # Example
//!
//! ```ignore
//! use pnmedit_core::{apply_rotation, load_image, save_image, Encoding};
//!
//! let mut image = load_image("in.pgm")?;
//! image.select(0, 0, 64, 64)?;
//! let image = apply_rotation(&image, 90)?;
//! save_image(&image, "out.pgm", Encoding::Text)?;
//! ```

pub mod decode;
pub mod encode;
pub mod equalize;
pub mod histogram;
pub mod numeric;
pub mod raster;
pub mod selection;
pub mod transform;

pub use decode::{decode_pnm, load_image, DecodeError};
pub use encode::{encode_pnm, save_image, write_pnm, EncodeError};
pub use equalize::{apply_equalization, EqualizationLut};
pub use histogram::{compute_histogram, Histogram, HistogramBin};
pub use raster::{Channels, Encoding, Image, ImageFormat, Pixel, Pixels, RasterError, Rgb};
pub use selection::{Selection, SelectionError};
pub use transform::{apply_crop, apply_kernel, apply_rotation, Kernel, QuarterTurns, TransformError};
