//! Histogram equalization for grayscale images.
//!
//! Equalization remaps every intensity `v` through the cumulative
//! distribution of the image:
//!
//! ```text
//! v' = round(clamp(max_value * cdf(v) / area, 0, max_value))
//! ```
//!
//! where `cdf(v)` counts pixels with value `<= v`. The map is precomputed
//! as a lookup table with one entry per representable value, then applied
//! in place. The selection is ignored and left unchanged.

use log::debug;

use crate::numeric::round_to_sample;
use crate::raster::{Channels, Image, Pixels};
use crate::transform::TransformError;

/// Precomputed intensity map: `lut[v]` is the equalized value of `v`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualizationLut {
    lut: Vec<u16>,
}

impl EqualizationLut {
    /// Build the table from a grayscale plane with the given max value.
    pub fn from_plane(plane: &[u16], max_value: u16) -> Self {
        let mut frequency = vec![0u64; usize::from(max_value) + 1];
        for &value in plane {
            frequency[usize::from(value)] += 1;
        }

        let area = plane.len().max(1) as f64;
        let scale = f64::from(max_value);
        let mut cumulative = 0u64;
        let lut = frequency
            .into_iter()
            .map(|count| {
                cumulative += count;
                round_to_sample(scale * cumulative as f64 / area, max_value)
            })
            .collect();

        Self { lut }
    }

    /// Mapped value for `value`. Values past the table map to themselves.
    #[inline]
    pub fn apply(&self, value: u16) -> u16 {
        self.lut.get(usize::from(value)).copied().unwrap_or(value)
    }

    /// Whether the table leaves every value unchanged.
    pub fn is_identity(&self) -> bool {
        self.lut.iter().enumerate().all(|(i, &v)| usize::from(v) == i)
    }
}

/// Equalize a grayscale image in place.
///
/// # Errors
///
/// `TransformError::UnsupportedChannels` for color images; the image is
/// left untouched.
pub fn apply_equalization(image: &mut Image) -> Result<(), TransformError> {
    let max_value = image.max_value();
    let Pixels::Gray(plane) = image.pixels_mut() else {
        return Err(TransformError::requires("EQUALIZE", Channels::Grayscale));
    };

    let lut = EqualizationLut::from_plane(&plane[..], max_value);
    if lut.is_identity() {
        debug!("equalize: histogram already flat, {} pixels unchanged", plane.len());
        return Ok(());
    }
    for value in plane.iter_mut() {
        *value = lut.apply(*value);
    }

    debug!("equalized {} pixels (max {max_value})", plane.len());
    Ok(())
}
