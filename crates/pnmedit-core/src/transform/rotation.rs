//! Quarter-turn rotation of the whole image or of a square selection.
//!
//! Angles are reduced to a number of clockwise quarter turns (`k mod 4`), and
//! each residue is applied as a single closed-form remap. For a source plane
//! `w` wide and `h` tall:
//!
//! ```text
//! 1 turn  (90):   dst[i][j] = src[h-1-j][i]        dst is h wide, w tall
//! 2 turns (180):  dst[i][j] = src[h-1-i][w-1-j]    plane reversed
//! 3 turns (-90):  dst[i][j] = src[j][w-1-i]        dst is h wide, w tall
//! ```
//!
//! This is exactly what `k` repeated single turns produce, so four turns
//! always reproduce the source.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{crop_plane, TransformError};
use crate::raster::{Image, Pixels};
use crate::selection::Selection;

/// Clockwise quarter turns, always in `0..4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct QuarterTurns(u8);

impl QuarterTurns {
    /// Reduce an angle in degrees to clockwise quarter turns.
    ///
    /// Negative angles turn counter-clockwise, so `-90` is three turns.
    ///
    /// # Errors
    ///
    /// `TransformError::UnsupportedAngle` when `degrees` is not a multiple of 90.
    pub fn from_degrees(degrees: i32) -> Result<Self, TransformError> {
        if degrees % 90 != 0 {
            return Err(TransformError::UnsupportedAngle(degrees));
        }
        Ok(Self((degrees / 90).rem_euclid(4) as u8))
    }

    pub fn count(self) -> u8 {
        self.0
    }

    pub fn is_identity(self) -> bool {
        self.0 == 0
    }

    /// Whether the turn exchanges width and height.
    pub fn swaps_axes(self) -> bool {
        self.0 % 2 == 1
    }
}

/// Rotate an image by `degrees`, a multiple of 90.
///
/// With the whole image selected the canvas itself turns: width and height
/// swap on odd quarter turns and the selection covers the new bounds.
/// With a partial selection only the selected square turns in place, and
/// the selection is kept.
///
/// # Errors
///
/// - `TransformError::UnsupportedAngle` when `degrees` is not a multiple of 90
/// - `TransformError::SelectionNotSquare` for a non-square partial selection
pub fn apply_rotation(image: &Image, degrees: i32) -> Result<Image, TransformError> {
    let turns = QuarterTurns::from_degrees(degrees)?;

    if image.is_fully_selected() {
        if turns.is_identity() {
            return Ok(image.clone());
        }
        let (width, height) = (image.width(), image.height());
        let pixels = match image.pixels() {
            Pixels::Gray(plane) => Pixels::Gray(rotate_plane(plane, width, height, turns)),
            Pixels::Color(plane) => Pixels::Color(rotate_plane(plane, width, height, turns)),
        };
        let (width, height) = if turns.swaps_axes() {
            (height, width)
        } else {
            (width, height)
        };
        debug!("rotated full image by {degrees} to {width}x{height}");
        return Ok(image.derive(width, height, pixels));
    }

    let sel = image.selection();
    if !sel.is_square() {
        return Err(TransformError::SelectionNotSquare {
            width: sel.width(),
            height: sel.height(),
        });
    }
    if turns.is_identity() {
        return Ok(image.clone());
    }

    let width = image.width();
    let pixels = match image.pixels() {
        Pixels::Gray(plane) => Pixels::Gray(rotate_region(plane, width, &sel, turns)),
        Pixels::Color(plane) => Pixels::Color(rotate_region(plane, width, &sel, turns)),
    };
    debug!("rotated selection {sel:?} by {degrees}");
    Ok(image.with_pixels(pixels))
}

/// Rotate a row-major `width x height` plane clockwise by `turns`.
fn rotate_plane<T: Copy>(plane: &[T], width: u32, height: u32, turns: QuarterTurns) -> Vec<T> {
    let (w, h) = (width as usize, height as usize);
    match turns.count() {
        0 => plane.to_vec(),
        2 => plane.iter().rev().copied().collect(),
        1 => (0..w)
            .flat_map(|i| (0..h).map(move |j| plane[(h - 1 - j) * w + i]))
            .collect(),
        _ => (0..w)
            .flat_map(|i| (0..h).map(move |j| plane[j * w + (w - 1 - i)]))
            .collect(),
    }
}

/// Rotate the square `sel` of a plane in place, leaving the rest untouched.
fn rotate_region<T: Copy>(plane: &[T], width: u32, sel: &Selection, turns: QuarterTurns) -> Vec<T> {
    let side = sel.width();
    let turned = rotate_plane(&crop_plane(plane, width, sel), side, side, turns);

    let (w, side) = (width as usize, side as usize);
    let (x1, y1) = (sel.x1() as usize, sel.y1() as usize);
    let mut out = plane.to_vec();
    for (row, chunk) in turned.chunks_exact(side).enumerate() {
        let start = (y1 + row) * w + x1;
        out[start..start + side].copy_from_slice(chunk);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{Pixel, Rgb};

    /// Grayscale image whose sample at (x, y) is `y * width + x`.
    fn ramp(width: u32, height: u32) -> Image {
        let samples = (0..width * height).map(|v| v as u16).collect();
        Image::from_gray(width, height, u16::MAX, samples).unwrap()
    }

    fn gray(image: &Image) -> Vec<u16> {
        match image.pixels() {
            Pixels::Gray(plane) => plane.clone(),
            Pixels::Color(_) => panic!("expected grayscale"),
        }
    }

    #[test]
    fn test_quarter_turns_from_degrees() {
        assert_eq!(QuarterTurns::from_degrees(0).unwrap().count(), 0);
        assert_eq!(QuarterTurns::from_degrees(90).unwrap().count(), 1);
        assert_eq!(QuarterTurns::from_degrees(-90).unwrap().count(), 3);
        assert_eq!(QuarterTurns::from_degrees(180).unwrap().count(), 2);
        assert_eq!(QuarterTurns::from_degrees(-270).unwrap().count(), 1);
        assert_eq!(QuarterTurns::from_degrees(360).unwrap().count(), 0);
        assert_eq!(QuarterTurns::from_degrees(-720).unwrap().count(), 0);
    }

    #[test]
    fn test_unsupported_angle() {
        let img = ramp(2, 2);
        assert_eq!(
            apply_rotation(&img, 45),
            Err(TransformError::UnsupportedAngle(45))
        );
        assert_eq!(
            apply_rotation(&img, -100),
            Err(TransformError::UnsupportedAngle(-100))
        );
    }

    #[test]
    fn test_rotate_90_clockwise() {
        // 0 1 2        3 0
        // 3 4 5   ->   4 1
        //              5 2
        let rotated = apply_rotation(&ramp(3, 2), 90).unwrap();
        assert_eq!((rotated.width(), rotated.height()), (2, 3));
        assert_eq!(gray(&rotated), vec![3, 0, 4, 1, 5, 2]);
        assert!(rotated.is_fully_selected());
    }

    #[test]
    fn test_rotate_90_counter_clockwise() {
        // 0 1 2        2 5
        // 3 4 5   ->   1 4
        //              0 3
        let rotated = apply_rotation(&ramp(3, 2), -90).unwrap();
        assert_eq!((rotated.width(), rotated.height()), (2, 3));
        assert_eq!(gray(&rotated), vec![2, 5, 1, 4, 0, 3]);
    }

    #[test]
    fn test_rotate_180() {
        let rotated = apply_rotation(&ramp(3, 2), 180).unwrap();
        assert_eq!((rotated.width(), rotated.height()), (3, 2));
        assert_eq!(gray(&rotated), vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_rotate_270_equals_minus_90() {
        let img = ramp(4, 3);
        assert_eq!(
            apply_rotation(&img, 270).unwrap(),
            apply_rotation(&img, -90).unwrap()
        );
    }

    #[test]
    fn test_rotate_zero_is_noop() {
        let img = ramp(3, 2);
        assert_eq!(apply_rotation(&img, 0).unwrap(), img);
    }

    #[test]
    fn test_rotate_color_image() {
        let plane = vec![Rgb::new(1, 0, 0), Rgb::new(0, 2, 0)];
        let img = Image::from_rgb(2, 1, 255, plane).unwrap();
        let rotated = apply_rotation(&img, 90).unwrap();
        assert_eq!((rotated.width(), rotated.height()), (1, 2));
        assert_eq!(rotated.pixel(0, 0), Some(Pixel::Color(Rgb::new(1, 0, 0))));
        assert_eq!(rotated.pixel(0, 1), Some(Pixel::Color(Rgb::new(0, 2, 0))));
    }

    #[test]
    fn test_rotate_square_selection() {
        //  0  1  2  3         0  1  2  3
        //  4  5  6  7   ->    4  9  5  7
        //  8  9 10 11         8 10  6 11
        let mut img = ramp(4, 3);
        img.select(1, 1, 3, 3).unwrap();
        let rotated = apply_rotation(&img, 90).unwrap();

        assert_eq!((rotated.width(), rotated.height()), (4, 3));
        assert_eq!(gray(&rotated), vec![0, 1, 2, 3, 4, 9, 5, 7, 8, 10, 6, 11]);
        assert_eq!(rotated.selection(), img.selection());
    }

    #[test]
    fn test_rotate_selection_back() {
        let mut img = ramp(4, 3);
        img.select(1, 1, 3, 3).unwrap();
        let rotated = apply_rotation(&img, -90).unwrap();
        assert_eq!(gray(&rotated), vec![0, 1, 2, 3, 4, 6, 10, 7, 8, 5, 9, 11]);
    }

    #[test]
    fn test_non_square_selection_rejected() {
        let mut img = ramp(5, 5);
        img.select(0, 0, 3, 2).unwrap();
        assert_eq!(
            apply_rotation(&img, 90),
            Err(TransformError::SelectionNotSquare {
                width: 3,
                height: 2
            })
        );
        // Squareness is checked even for a zero angle
        assert!(apply_rotation(&img, 0).is_err());
    }

    #[test]
    fn test_angle_checked_before_shape() {
        let mut img = ramp(5, 5);
        img.select(0, 0, 3, 2).unwrap();
        assert_eq!(
            apply_rotation(&img, 30),
            Err(TransformError::UnsupportedAngle(30))
        );
    }
}
