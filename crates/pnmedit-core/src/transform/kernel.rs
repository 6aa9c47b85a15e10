//! 3x3 convolution filters for color images.
//!
//! A centre pixel is filtered only when its whole 3x3 neighbourhood lies
//! inside the image, so the outer one-pixel ring of the image is never
//! modified. Within that interior, only centres inside the selection are
//! touched. Sums always read the unfiltered source.

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use super::TransformError;
use crate::numeric::round_to_sample;
use crate::raster::{Channels, Image, Pixels, Rgb};

/// The fixed set of filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kernel {
    Edge,
    Sharpen,
    Blur,
    GaussianBlur,
}

impl Kernel {
    pub const ALL: [Kernel; 4] = [
        Kernel::Edge,
        Kernel::Sharpen,
        Kernel::Blur,
        Kernel::GaussianBlur,
    ];

    /// Command-line name, e.g. `GAUSSIAN_BLUR`.
    pub fn name(self) -> &'static str {
        match self {
            Kernel::Edge => "EDGE",
            Kernel::Sharpen => "SHARPEN",
            Kernel::Blur => "BLUR",
            Kernel::GaussianBlur => "GAUSSIAN_BLUR",
        }
    }

    /// Row-major weights.
    pub fn weights(self) -> [[f64; 3]; 3] {
        match self {
            Kernel::Edge => [[-1.0, -1.0, -1.0], [-1.0, 8.0, -1.0], [-1.0, -1.0, -1.0]],
            Kernel::Sharpen => [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]],
            Kernel::Blur => [[1.0 / 9.0; 3]; 3],
            Kernel::GaussianBlur => [
                [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
                [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
                [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
            ],
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kernel {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kernel::ALL
            .into_iter()
            .find(|kernel| kernel.name() == s)
            .ok_or_else(|| TransformError::UnknownKernel(s.to_string()))
    }
}

/// Filter the selected interior of a color image.
///
/// # Errors
///
/// `TransformError::UnsupportedChannels` for grayscale images.
pub fn apply_kernel(image: &Image, kernel: Kernel) -> Result<Image, TransformError> {
    let Pixels::Color(source) = image.pixels() else {
        return Err(TransformError::requires("APPLY", Channels::Color));
    };

    let (width, height) = (image.width() as usize, image.height() as usize);
    let sel = image.selection();
    let rows = (sel.y1() as usize).max(1)..(sel.y2() as usize).min(height.saturating_sub(1));
    let cols = (sel.x1() as usize).max(1)..(sel.x2() as usize).min(width.saturating_sub(1));

    let weights = kernel.weights();
    let max_value = image.max_value();
    let mut output = source.clone();

    for y in rows.clone() {
        for x in cols.clone() {
            let mut sum = [0.0f64; 3];
            for (dy, row) in weights.iter().enumerate() {
                for (dx, &weight) in row.iter().enumerate() {
                    let px = source[(y + dy - 1) * width + (x + dx - 1)];
                    for (acc, sample) in sum.iter_mut().zip(px.channels()) {
                        *acc += weight * f64::from(sample);
                    }
                }
            }
            output[y * width + x] = Rgb::new(
                round_to_sample(sum[0], max_value),
                round_to_sample(sum[1], max_value),
                round_to_sample(sum[2], max_value),
            );
        }
    }

    debug!("applied {kernel} to rows {rows:?} cols {cols:?}");
    Ok(image.with_pixels(Pixels::Color(output)))
}
