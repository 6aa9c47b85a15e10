//! Image decoding for pnmedit.
//!
//! This module reads the netpbm raster family:
//! - `P2` grayscale text and `P3` color text (decimal samples)
//! - `P5` grayscale binary and `P6` color binary (raw samples)
//!
//! Header tokens may be separated by any whitespace and interleaved with
//! `#` comments. Binary bodies start after exactly one whitespace byte and
//! use one byte per sample, or two big-endian bytes when the max value is
//! 256 or more.
//!
//! # Examples
//!
//! ```ignore
//! use pnmedit_core::decode::load_image;
//!
//! let image = load_image("photo.ppm")?;
//! println!("Decoded {}x{} image", image.width(), image.height());
//! ```

mod header;
mod pnm;
mod types;

pub(crate) use pnm::bytes_per_sample;
pub use pnm::{decode_pnm, load_image};
pub use types::DecodeError;
