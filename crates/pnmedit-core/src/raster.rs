//! In-memory raster store.
//!
//! An [`Image`] owns one row-major pixel plane together with its format
//! metadata and the current [`Selection`]. The plane is a tagged enum keyed
//! by channel family, so a grayscale image never carries RGB samples and a
//! color image never carries a lone intensity.
//!
//! # Invariants
//!
//! - `width >= 1`, `height >= 1`
//! - `1 <= max_value <= 65535`
//! - the plane holds exactly `width * height` pixels
//! - every sample lies in `[0, max_value]`
//! - the plane variant matches the channel axis of `format`

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::selection::Selection;

/// Errors raised when building an [`Image`] from raw parts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RasterError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Max value of zero leaves no representable intensity
    #[error("Invalid max value: must be at least 1")]
    ZeroMaxValue,

    /// Pixel count doesn't match the dimensions
    #[error("Invalid pixel data: expected {expected} pixels (width * height), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// A sample lies above the declared max value
    #[error("Sample {value} exceeds max value {max_value}")]
    SampleOutOfRange { value: u16, max_value: u16 },

    /// The plane variant disagrees with the format's channel axis
    #[error("{format} expects {expected:?} pixels")]
    ChannelMismatch {
        format: ImageFormat,
        expected: Channels,
    },
}

/// Channel axis of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channels {
    /// One intensity per pixel.
    Grayscale,
    /// Red, green and blue per pixel.
    Color,
}

impl Channels {
    /// Number of samples stored per pixel.
    #[inline]
    pub fn samples_per_pixel(self) -> usize {
        match self {
            Channels::Grayscale => 1,
            Channels::Color => 3,
        }
    }
}

/// Encoding axis of an image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Encoding {
    /// Whitespace-separated decimal samples.
    Text,
    /// Raw unsigned samples.
    #[default]
    Binary,
}

/// One of the four concrete on-disk formats, identified by a magic token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    /// `P2`
    GrayscaleText,
    /// `P3`
    ColorText,
    /// `P5`
    GrayscaleBinary,
    /// `P6`
    ColorBinary,
}

impl ImageFormat {
    /// Combine a channel axis and an encoding axis.
    pub fn new(channels: Channels, encoding: Encoding) -> Self {
        match (channels, encoding) {
            (Channels::Grayscale, Encoding::Text) => ImageFormat::GrayscaleText,
            (Channels::Color, Encoding::Text) => ImageFormat::ColorText,
            (Channels::Grayscale, Encoding::Binary) => ImageFormat::GrayscaleBinary,
            (Channels::Color, Encoding::Binary) => ImageFormat::ColorBinary,
        }
    }

    /// Look up the format for a magic token such as `"P6"`.
    pub fn from_magic(magic: &[u8]) -> Option<Self> {
        match magic {
            b"P2" => Some(ImageFormat::GrayscaleText),
            b"P3" => Some(ImageFormat::ColorText),
            b"P5" => Some(ImageFormat::GrayscaleBinary),
            b"P6" => Some(ImageFormat::ColorBinary),
            _ => None,
        }
    }

    /// The two-character magic token written at the start of a file.
    pub fn magic(self) -> &'static str {
        match self {
            ImageFormat::GrayscaleText => "P2",
            ImageFormat::ColorText => "P3",
            ImageFormat::GrayscaleBinary => "P5",
            ImageFormat::ColorBinary => "P6",
        }
    }

    #[inline]
    pub fn channels(self) -> Channels {
        match self {
            ImageFormat::GrayscaleText | ImageFormat::GrayscaleBinary => Channels::Grayscale,
            ImageFormat::ColorText | ImageFormat::ColorBinary => Channels::Color,
        }
    }

    #[inline]
    pub fn encoding(self) -> Encoding {
        match self {
            ImageFormat::GrayscaleText | ImageFormat::ColorText => Encoding::Text,
            ImageFormat::GrayscaleBinary | ImageFormat::ColorBinary => Encoding::Binary,
        }
    }

    /// Same channel axis, different encoding.
    pub fn with_encoding(self, encoding: Encoding) -> Self {
        Self::new(self.channels(), encoding)
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.magic())
    }
}

/// An (r, g, b) sample triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl Rgb {
    pub const fn new(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b }
    }

    /// Samples in r, g, b order.
    #[inline]
    pub fn channels(self) -> [u16; 3] {
        [self.r, self.g, self.b]
    }

    #[inline]
    pub fn max_channel(self) -> u16 {
        self.r.max(self.g).max(self.b)
    }
}

/// A single pixel read out of an [`Image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pixel {
    Gray(u16),
    Color(Rgb),
}

/// Row-major pixel plane, tagged by channel family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pixels {
    Gray(Vec<u16>),
    Color(Vec<Rgb>),
}

impl Pixels {
    /// Number of pixels in the plane.
    pub fn len(&self) -> usize {
        match self {
            Pixels::Gray(plane) => plane.len(),
            Pixels::Color(plane) => plane.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channels(&self) -> Channels {
        match self {
            Pixels::Gray(_) => Channels::Grayscale,
            Pixels::Color(_) => Channels::Color,
        }
    }

    pub fn get(&self, index: usize) -> Option<Pixel> {
        match self {
            Pixels::Gray(plane) => plane.get(index).copied().map(Pixel::Gray),
            Pixels::Color(plane) => plane.get(index).copied().map(Pixel::Color),
        }
    }

    /// Largest sample in the plane, 0 when empty.
    fn max_sample(&self) -> u16 {
        match self {
            Pixels::Gray(plane) => plane.iter().copied().max().unwrap_or(0),
            Pixels::Color(plane) => plane.iter().map(|p| p.max_channel()).max().unwrap_or(0),
        }
    }
}

/// The single mutable image an editing session works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    format: ImageFormat,
    width: u32,
    height: u32,
    max_value: u16,
    pixels: Pixels,
    selection: Selection,
}

impl Image {
    /// Build an image from raw parts, validating every invariant.
    ///
    /// The selection starts out covering the whole image.
    pub fn new(
        format: ImageFormat,
        width: u32,
        height: u32,
        max_value: u16,
        pixels: Pixels,
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        if max_value == 0 {
            return Err(RasterError::ZeroMaxValue);
        }
        if pixels.channels() != format.channels() {
            return Err(RasterError::ChannelMismatch {
                format,
                expected: format.channels(),
            });
        }

        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(RasterError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }

        let brightest = pixels.max_sample();
        if brightest > max_value {
            return Err(RasterError::SampleOutOfRange {
                value: brightest,
                max_value,
            });
        }

        Ok(Self {
            format,
            width,
            height,
            max_value,
            pixels,
            selection: Selection::full(width, height),
        })
    }

    /// Grayscale image tagged with the binary format.
    pub fn from_gray(
        width: u32,
        height: u32,
        max_value: u16,
        samples: Vec<u16>,
    ) -> Result<Self, RasterError> {
        Self::new(
            ImageFormat::GrayscaleBinary,
            width,
            height,
            max_value,
            Pixels::Gray(samples),
        )
    }

    /// Color image tagged with the binary format.
    pub fn from_rgb(
        width: u32,
        height: u32,
        max_value: u16,
        samples: Vec<Rgb>,
    ) -> Result<Self, RasterError> {
        Self::new(
            ImageFormat::ColorBinary,
            width,
            height,
            max_value,
            Pixels::Color(samples),
        )
    }

    /// Format recorded when the image was loaded.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn channels(&self) -> Channels {
        self.format.channels()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn max_value(&self) -> u16 {
        self.max_value
    }

    /// Total number of pixels.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn pixels(&self) -> &Pixels {
        &self.pixels
    }

    /// Pixel at column `x`, row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Whether the selection covers the whole image.
    pub fn is_fully_selected(&self) -> bool {
        self.selection == Selection::full(self.width, self.height)
    }

    pub(crate) fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Mutable access for in-place remaps that keep samples in range.
    pub(crate) fn pixels_mut(&mut self) -> &mut Pixels {
        &mut self.pixels
    }

    /// New image with this image's format and max value but a different
    /// plane. The selection resets to the new full bounds.
    pub(crate) fn derive(&self, width: u32, height: u32, pixels: Pixels) -> Image {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        debug_assert_eq!(pixels.channels(), self.channels());
        Image {
            format: self.format,
            width,
            height,
            max_value: self.max_value,
            pixels,
            selection: Selection::full(width, height),
        }
    }

    /// Copy of this image, same geometry and selection, with a new plane.
    pub(crate) fn with_pixels(&self, pixels: Pixels) -> Image {
        debug_assert_eq!(pixels.len(), self.area());
        debug_assert_eq!(pixels.channels(), self.channels());
        Image {
            format: self.format,
            width: self.width,
            height: self.height,
            max_value: self.max_value,
            pixels,
            selection: self.selection,
        }
    }
}
