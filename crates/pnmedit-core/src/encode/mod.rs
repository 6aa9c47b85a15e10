//! Image encoding for pnmedit.
//!
//! Any in-memory [`Image`](crate::Image) can be written in either encoding:
//! - [`Encoding::Text`](crate::Encoding::Text) emits `P2`/`P3`
//! - [`Encoding::Binary`](crate::Encoding::Binary) emits `P5`/`P6` (default)
//!
//! The channel family never changes on save.

mod pnm;

pub use pnm::{encode_pnm, save_image, write_pnm, EncodeError};
