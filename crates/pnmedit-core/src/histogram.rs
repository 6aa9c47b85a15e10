//! Binned intensity histogram of a grayscale image.
//!
//! Used by the `HISTOGRAM` command to print a star chart; the image itself
//! is never modified. The whole image is counted regardless of selection.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::numeric::bin_index;
use crate::raster::{Channels, Image, Pixels};
use crate::transform::TransformError;

/// One bar of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Pixels whose value falls in this bin
    pub count: u64,
    /// Bar length, scaled so the fullest bin gets `max_stars`
    pub stars: u32,
}

/// Histogram data for a grayscale image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    bins: Vec<HistogramBin>,
}

impl Histogram {
    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    /// Sum of all raw counts; equals the image area.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    /// The chart as printed: one `<stars>\t|\t<***>` line per bin.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bin in &self.bins {
            writeln!(f, "{}\t|\t{}", bin.stars, "*".repeat(bin.stars as usize))?;
        }
        Ok(())
    }
}

/// Count pixels into `bins` equal-width bins and scale them to `max_stars`.
///
/// Bin `i` covers values in `[i * w, (i + 1) * w)` with the real-valued width
/// `w = (max_value + 1) / bins`. Star counts are
/// `floor(count * max_stars / max_count)`.
///
/// # Errors
///
/// - `TransformError::UnsupportedChannels` for color images
/// - `TransformError::InvalidBinCount` when `bins` is zero
/// - `TransformError::OutOfMemory` when the bin table cannot be allocated
///
/// # Example
///
/// ```ignore
/// let image = Image::from_gray(2, 2, 255, vec![10, 20, 30, 40])?;
/// let hist = compute_histogram(&image, 5, 2)?;
/// assert_eq!(hist.total(), 4);
/// ```
pub fn compute_histogram(
    image: &Image,
    max_stars: u32,
    bins: u32,
) -> Result<Histogram, TransformError> {
    let Pixels::Gray(plane) = image.pixels() else {
        return Err(TransformError::requires("HISTOGRAM", Channels::Grayscale));
    };
    if bins == 0 {
        return Err(TransformError::InvalidBinCount(bins));
    }

    let max_value = image.max_value();
    let mut counts = reserve_bins::<u64>(bins as usize)?;
    counts.resize(bins as usize, 0);
    for &value in plane {
        counts[bin_index(value, max_value, bins)] += 1;
    }

    // Area is at least one pixel, so some bin is non-empty.
    let max_count = counts.iter().copied().max().unwrap_or(1).max(1);
    let mut table = reserve_bins::<HistogramBin>(bins as usize)?;
    table.extend(counts.into_iter().map(|count| HistogramBin {
        count,
        stars: (count * u64::from(max_stars) / max_count) as u32,
    }));

    let hist = Histogram { bins: table };
    debug!(
        "histogram of {} pixels into {bins} bins (max count {max_count})",
        hist.total()
    );
    Ok(hist)
}

/// Empty table with room for `len` bins, or `OutOfMemory`.
fn reserve_bins<T>(len: usize) -> Result<Vec<T>, TransformError> {
    let mut table = Vec::new();
    table
        .try_reserve_exact(len)
        .map_err(|_| TransformError::OutOfMemory)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Rgb;

    fn counts(hist: &Histogram) -> Vec<u64> {
        hist.bins().iter().map(|bin| bin.count).collect()
    }

    fn stars(hist: &Histogram) -> Vec<u32> {
        hist.bins().iter().map(|bin| bin.stars).collect()
    }

    #[test]
    fn test_two_by_two_two_bins() {
        let img = crate::decode::decode_pnm(b"P2\n2 2\n255\n10 20\n30 40\n").unwrap();
        let hist = compute_histogram(&img, 5, 2).unwrap();
        assert_eq!(hist.bins().len(), 2);
        assert_eq!(hist.total(), 4);
        assert_eq!(counts(&hist), vec![4, 0]);
        assert_eq!(stars(&hist), vec![5, 0]);
    }

    #[test]
    fn test_render_lines() {
        let img = Image::from_gray(2, 2, 255, vec![0, 0, 0, 200]).unwrap();
        let hist = compute_histogram(&img, 6, 2).unwrap();
        assert_eq!(hist.render(), "6\t|\t******\n2\t|\t**\n");
    }

    #[test]
    fn test_star_scaling_floors() {
        // counts 3 and 2, max_stars 4 -> 4 and floor(8/3) = 2
        let img = Image::from_gray(5, 1, 3, vec![0, 0, 0, 3, 3]).unwrap();
        let hist = compute_histogram(&img, 4, 2).unwrap();
        assert_eq!(counts(&hist), vec![3, 2]);
        assert_eq!(stars(&hist), vec![4, 2]);
    }

    #[test]
    fn test_zero_stars() {
        let img = Image::from_gray(2, 1, 255, vec![0, 255]).unwrap();
        let hist = compute_histogram(&img, 0, 4).unwrap();
        assert_eq!(stars(&hist), vec![0, 0, 0, 0]);
        assert_eq!(hist.render(), "0\t|\t\n".repeat(4));
    }

    #[test]
    fn test_bin_per_value() {
        let img = Image::from_gray(4, 1, 3, vec![0, 1, 2, 3]).unwrap();
        let hist = compute_histogram(&img, 1, 4).unwrap();
        assert_eq!(counts(&hist), vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_ignores_selection() {
        let mut img = Image::from_gray(4, 4, 255, vec![100; 16]).unwrap();
        img.select(0, 0, 2, 2).unwrap();
        assert_eq!(compute_histogram(&img, 10, 1).unwrap().total(), 16);
    }

    #[test]
    fn test_color_rejected() {
        let img = Image::from_rgb(1, 1, 255, vec![Rgb::default()]).unwrap();
        assert_eq!(
            compute_histogram(&img, 10, 4),
            Err(TransformError::UnsupportedChannels {
                operation: "HISTOGRAM",
                required: Channels::Grayscale
            })
        );
    }

    #[test]
    fn test_zero_bins_rejected() {
        let img = Image::from_gray(1, 1, 255, vec![0]).unwrap();
        assert_eq!(
            compute_histogram(&img, 10, 0),
            Err(TransformError::InvalidBinCount(0))
        );
    }

    #[test]
    fn test_unallocatable_table_is_an_error() {
        assert_eq!(
            reserve_bins::<HistogramBin>(usize::MAX),
            Err(TransformError::OutOfMemory)
        );
        assert!(reserve_bins::<u64>(3).unwrap().capacity() >= 3);
    }

    #[test]
    fn test_histogram_serializes() {
        let img = Image::from_gray(1, 1, 1, vec![1]).unwrap();
        let hist = compute_histogram(&img, 3, 1).unwrap();
        let json = serde_json::to_value(&hist).unwrap();
        assert_eq!(json, serde_json::json!({"bins": [{"count": 1, "stars": 3}]}));
    }
}
