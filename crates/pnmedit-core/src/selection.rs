//! Rectangular selection model.
//!
//! A [`Selection`] is the half-open rectangle `[x1, x2) × [y1, y2)` that
//! scopes kernel filters, rotation and cropping. Every image owns exactly one;
//! it starts out covering the whole image and is replaced wholesale by
//! [`Image::select`] or [`Image::select_all`].

use serde::Serialize;
use thiserror::Error;

use crate::raster::Image;

/// Reasons a requested rectangle is refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// A coordinate is negative or past the image edge on its axis
    #[error("Coordinates ({x1}, {y1}, {x2}, {y2}) fall outside the {width}x{height} image")]
    OutOfBounds {
        x1: i64,
        y1: i64,
        x2: i64,
        y2: i64,
        width: u32,
        height: u32,
    },

    /// The rectangle collapses to a line or a point
    #[error("Degenerate selection ({x1}, {y1}, {x2}, {y2})")]
    Degenerate { x1: u32, y1: u32, x2: u32, y2: u32 },
}

/// Axis-aligned selection rectangle with `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Selection {
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
}

impl Selection {
    /// The rectangle covering a whole `width × height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x1: 0,
            y1: 0,
            x2: width,
            y2: height,
        }
    }

    /// Validate a user-supplied rectangle against image bounds.
    ///
    /// Corners may be given in any order; they are normalised so that
    /// `x1 <= x2` and `y1 <= y2`. The rectangle is refused when:
    /// - a coordinate is negative or beyond `width`/`height` on its axis
    /// - three or more of the four coordinates share one value
    /// - three or more coordinates sit on an image border value (`width` or `height`)
    /// - it has zero width or zero height
    pub fn validated(
        width: u32,
        height: u32,
        x1: i64,
        y1: i64,
        x2: i64,
        y2: i64,
    ) -> Result<Self, SelectionError> {
        let in_range = |v: i64, limit: u32| (0..=i64::from(limit)).contains(&v);
        let inside = in_range(x1, width)
            && in_range(x2, width)
            && in_range(y1, height)
            && in_range(y2, height);
        if !inside {
            return Err(SelectionError::OutOfBounds {
                x1,
                y1,
                x2,
                y2,
                width,
                height,
            });
        }

        // Range checked above, so the narrowing is lossless.
        let (x1, x2) = ordered(x1 as u32, x2 as u32);
        let (y1, y2) = ordered(y1 as u32, y2 as u32);
        let coords = [x1, x2, y1, y2];

        let repeated = coords
            .iter()
            .any(|v| coords.iter().filter(|w| *w == v).count() >= 3);
        let on_border = coords
            .iter()
            .filter(|&&v| v == width || v == height)
            .count();

        if repeated || on_border >= 3 || x1 == x2 || y1 == y2 {
            return Err(SelectionError::Degenerate { x1, y1, x2, y2 });
        }

        Ok(Self { x1, y1, x2, y2 })
    }

    pub fn x1(&self) -> u32 {
        self.x1
    }

    pub fn y1(&self) -> u32 {
        self.y1
    }

    pub fn x2(&self) -> u32 {
        self.x2
    }

    pub fn y2(&self) -> u32 {
        self.y2
    }

    /// Number of selected columns.
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    /// Number of selected rows.
    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    pub fn is_square(&self) -> bool {
        self.width() == self.height()
    }
}

#[inline]
fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl Image {
    /// Replace the selection with a validated rectangle.
    ///
    /// On error the current selection is left untouched.
    pub fn select(
        &mut self,
        x1: i64,
        y1: i64,
        x2: i64,
        y2: i64,
    ) -> Result<Selection, SelectionError> {
        let selection = Selection::validated(self.width(), self.height(), x1, y1, x2, y2)?;
        self.set_selection(selection);
        log::debug!("selected {selection:?}");
        Ok(selection)
    }

    /// Select the whole image.
    pub fn select_all(&mut self) -> Selection {
        let selection = Selection::full(self.width(), self.height());
        self.set_selection(selection);
        selection
    }
}
