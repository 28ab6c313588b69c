#![forbid(unsafe_code)]

//! Grid-cell rectangles and their size constraints.

use serde::{Deserialize, Serialize};

/// Default cap on a rectangle's height when `maxH` is absent.
pub const DEFAULT_MAX_ROWS: i32 = 20;

/// A widget's position and size in grid-cell units for one breakpoint.
///
/// Fields are signed so that malformed input (negative sizes, off-grid
/// origins) can still be represented and then clamped by [`GridRect::sanitize`]
/// rather than rejected at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_w: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_h: Option<i32>,
}

/// Effective size bounds after defaults and sanitization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBounds {
    pub min_w: i32,
    pub max_w: i32,
    pub min_h: i32,
    pub max_h: i32,
}

impl GridRect {
    /// Unconstrained rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            min_w: None,
            min_h: None,
            max_w: None,
            max_h: None,
        }
    }

    #[must_use]
    pub const fn with_min(mut self, min_w: i32, min_h: i32) -> Self {
        self.min_w = Some(min_w);
        self.min_h = Some(min_h);
        self
    }

    #[must_use]
    pub const fn with_max(mut self, max_w: i32, max_h: i32) -> Self {
        self.max_w = Some(max_w);
        self.max_h = Some(max_h);
        self
    }

    #[must_use]
    pub const fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    #[must_use]
    pub const fn sized(mut self, w: i32, h: i32) -> Self {
        self.w = w;
        self.h = h;
        self
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Axis-aligned intersection test.
    ///
    /// Two rectangles overlap unless one lies entirely left of, right of,
    /// above, or below the other. Touching edges do not overlap.
    #[inline]
    #[must_use]
    pub const fn overlaps(&self, other: &GridRect) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.bottom() <= other.y
            || other.bottom() <= self.y)
    }

    /// Same placement and size, ignoring constraints.
    #[inline]
    #[must_use]
    pub const fn same_box(&self, other: &GridRect) -> bool {
        self.x == other.x && self.y == other.y && self.w == other.w && self.h == other.h
    }

    /// Effective bounds for a grid with `columns` columns.
    ///
    /// Missing values default to `minW = minH = 1`, `maxW = columns`,
    /// `maxH = DEFAULT_MAX_ROWS`. Conflicting bounds (`min > max`) resolve to
    /// the minimum, and every width bound is capped at `columns`.
    #[must_use]
    pub fn bounds(&self, columns: u16) -> SizeBounds {
        let columns = i32::from(columns.max(1));
        let min_w = self.min_w.unwrap_or(1).clamp(1, columns);
        let max_w = self.max_w.unwrap_or(columns).clamp(min_w, columns);
        let min_h = self.min_h.unwrap_or(1).max(1);
        let max_h = self.max_h.unwrap_or(DEFAULT_MAX_ROWS).max(min_h);
        SizeBounds {
            min_w,
            max_w,
            min_h,
            max_h,
        }
    }

    /// Clamp size to the effective bounds and the origin to the grid.
    ///
    /// Constraint fields are carried through untouched so the rectangle
    /// serializes back to what the host stored. Idempotent.
    #[must_use]
    pub fn sanitize(&self, columns: u16) -> GridRect {
        let b = self.bounds(columns);
        let w = self.w.clamp(b.min_w, b.max_w);
        let h = self.h.clamp(b.min_h, b.max_h);
        let max_x = i32::from(columns.max(1)) - w;
        GridRect {
            x: self.x.clamp(0, max_x),
            y: self.y.max(0),
            w,
            h,
            ..*self
        }
    }
}
