//! Rounding and clamping helpers shared by the transforms.
//!
//! Rounding is half away from zero (`f64::round`), so 2.5 becomes 3 and
//! -2.5 becomes -3 before clamping.

/// Round `value` to the nearest integer and clamp it into `[0, max_value]`.
///
/// Because both bounds are integers, clamping before or after rounding
/// gives the same result.
#[inline]
pub fn round_to_sample(value: f64, max_value: u16) -> u16 {
    value.round().clamp(0.0, f64::from(max_value)) as u16
}

/// Index of the histogram bin holding `value`.
///
/// The range `[0, max_value]` is split into `bins` half-open intervals of
/// real-valued width `(max_value + 1) / bins`. The result is clamped to
/// `bins - 1` so rounding at the top edge never escapes the table.
#[inline]
pub fn bin_index(value: u16, max_value: u16, bins: u32) -> usize {
    debug_assert!(bins > 0);
    let interval = (f64::from(max_value) + 1.0) / f64::from(bins);
    let index = (f64::from(value) / interval).floor() as usize;
    index.min(bins as usize - 1)
}
