//! Cropping to the current selection.
//!
//! # Example
//!
//! ```ignore
//! image.select(1, 1, 3, 3)?;
//! let cropped = apply_crop(&image);
//! assert_eq!((cropped.width(), cropped.height()), (2, 2));
//! ```

use log::debug;

use crate::raster::{Image, Pixels};
use crate::selection::Selection;

/// Crop an image to its selection.
///
/// The result keeps the source format and max value, and its selection
/// covers the whole cropped image. A full selection yields an equal copy.
pub fn apply_crop(image: &Image) -> Image {
    let sel = image.selection();
    let width = image.width();

    let pixels = match image.pixels() {
        Pixels::Gray(plane) => Pixels::Gray(crop_plane(plane, width, &sel)),
        Pixels::Color(plane) => Pixels::Color(crop_plane(plane, width, &sel)),
    };

    debug!(
        "cropped {}x{} to {}x{} at ({}, {})",
        image.width(),
        image.height(),
        sel.width(),
        sel.height(),
        sel.x1(),
        sel.y1()
    );
    image.derive(sel.width(), sel.height(), pixels)
}

/// Copy the rectangle `sel` out of a row-major plane `width` pixels wide.
pub(crate) fn crop_plane<T: Copy>(plane: &[T], width: u32, sel: &Selection) -> Vec<T> {
    let width = width as usize;
    let (x1, x2) = (sel.x1() as usize, sel.x2() as usize);
    let mut out = Vec::with_capacity(sel.width() as usize * sel.height() as usize);

    for y in sel.y1() as usize..sel.y2() as usize {
        let row = y * width;
        out.extend_from_slice(&plane[row + x1..row + x2]);
    }
    out
}
