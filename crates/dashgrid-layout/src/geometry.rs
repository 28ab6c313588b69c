#![forbid(unsafe_code)]

//! Breakpoint and coordinate resolver.
//!
//! [`GridGeometry`] is derived from a [`DashboardLayout`] and a container
//! width. It is cheap to build and is rebuilt, never patched, whenever either
//! input changes.

use dashgrid_core::{PixelPoint, PixelRect};

use crate::breakpoint::Breakpoint;
use crate::model::DashboardLayout;
use crate::rect::GridRect;

/// Cell geometry for one container width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub container_width: f64,
    pub breakpoint: Breakpoint,
    pub columns: u16,
    /// Derived column width; never negative.
    pub cell_width: f64,
    pub row_height: f64,
    pub gap: f64,
    pub padding: f64,
}

impl GridGeometry {
    /// Resolve the active breakpoint and cell size for `container_width`.
    ///
    /// `cell_width = (container_width − 2·padding − gap·(columns−1)) / columns`,
    /// floored at zero for containers too narrow to hold the grid.
    #[must_use]
    pub fn resolve(layout: &DashboardLayout, container_width: f64) -> Self {
        let breakpoint = layout.breakpoint_for_width(container_width);
        let columns = layout.columns_for(breakpoint);
        let n = f64::from(columns);
        let usable = container_width - 2.0 * layout.padding - layout.gap * (n - 1.0);
        let cell_width = (usable / n).max(0.0);
        Self {
            container_width,
            breakpoint,
            columns,
            cell_width,
            row_height: layout.row_height.max(0.0),
            gap: layout.gap.max(0.0),
            padding: layout.padding.max(0.0),
        }
    }

    /// Horizontal distance between the left edges of adjacent columns.
    #[inline]
    #[must_use]
    pub fn column_pitch(&self) -> f64 {
        self.cell_width + self.gap
    }

    /// Vertical distance between the top edges of adjacent rows.
    #[inline]
    #[must_use]
    pub fn row_pitch(&self) -> f64 {
        self.row_height + self.gap
    }

    /// Top-left pixel corner of grid cell `(x, y)`.
    #[must_use]
    pub fn grid_to_pixel(&self, x: i32, y: i32) -> PixelPoint {
        PixelPoint::new(
            self.padding + f64::from(x) * self.column_pitch(),
            self.padding + f64::from(y) * self.row_pitch(),
        )
    }

    /// Nearest grid cell to a pixel point, clamped to `>= 0` on both axes.
    #[must_use]
    pub fn pixel_to_grid(&self, point: PixelPoint) -> (i32, i32) {
        (
            snap(point.x - self.padding, self.column_pitch()),
            snap(point.y - self.padding, self.row_pitch()),
        )
    }

    /// Pixel delta converted to a whole number of columns and rows.
    #[must_use]
    pub fn delta_to_cells(&self, delta: PixelPoint) -> (i32, i32) {
        (
            cells(delta.x, self.column_pitch()),
            cells(delta.y, self.row_pitch()),
        )
    }

    /// Pixel frame of a grid rectangle. Inner gaps are included in the size.
    #[must_use]
    pub fn frame(&self, rect: &GridRect) -> PixelRect {
        let origin = self.grid_to_pixel(rect.x, rect.y);
        PixelRect::new(
            origin.x,
            origin.y,
            span(rect.w, self.cell_width, self.gap),
            span(rect.h, self.row_height, self.gap),
        )
    }

    /// Pixel height needed to show every rectangle, including both paddings.
    #[must_use]
    pub fn container_height<'a>(&self, rects: impl IntoIterator<Item = &'a GridRect>) -> f64 {
        let rows = rects.into_iter().map(GridRect::bottom).max().unwrap_or(0).max(0);
        let body = if rows == 0 {
            0.0
        } else {
            span(rows, self.row_height, self.gap)
        };
        body + 2.0 * self.padding
    }
}

fn span(count: i32, unit: f64, gap: f64) -> f64 {
    if count <= 0 {
        return 0.0;
    }
    let n = f64::from(count);
    n * unit + (n - 1.0) * gap
}

fn cells(distance: f64, pitch: f64) -> i32 {
    if pitch <= 0.0 || !distance.is_finite() {
        return 0;
    }
    saturate((distance / pitch).round())
}

fn snap(offset: f64, pitch: f64) -> i32 {
    cells(offset, pitch).max(0)
}

fn saturate(value: f64) -> i32 {
    // `as` saturates at the i32 bounds.
    value as i32
}
