#![forbid(unsafe_code)]

//! Pixel-space geometric primitives.
//!
//! Uses container coordinates (origin at the container's top-left corner,
//! `y` growing downward). Values are `f64` because cell widths are derived by
//! division and are rarely whole pixels.

use serde::{Deserialize, Serialize};

/// A point in container pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    /// The container origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `origin` to `self`.
    #[inline]
    #[must_use]
    pub fn delta_from(self, origin: PixelPoint) -> PixelPoint {
        PixelPoint::new(self.x - origin.x, self.y - origin.y)
    }

    /// Translate by `offset` in the negative direction.
    #[inline]
    #[must_use]
    pub fn minus(self, offset: PixelPoint) -> PixelPoint {
        self.delta_from(offset)
    }

    /// Clamp both axes to `>= 0`.
    ///
    /// NaN coordinates collapse to zero.
    #[inline]
    #[must_use]
    pub fn clamp_non_negative(self) -> PixelPoint {
        PixelPoint::new(non_negative(self.x), non_negative(self.y))
    }

    /// Squared euclidean distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance_squared(self, other: PixelPoint) -> f64 {
        let d = self.delta_from(other);
        d.x * d.x + d.y * d.y
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else {
        value
    }
}

/// An axis-aligned rectangle in container pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> PixelPoint {
        PixelPoint::new(self.x, self.y)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Same size, moved so its top-left corner is `origin`.
    #[inline]
    #[must_use]
    pub const fn with_origin(&self, origin: PixelPoint) -> PixelRect {
        PixelRect::new(origin.x, origin.y, self.width, self.height)
    }
}
