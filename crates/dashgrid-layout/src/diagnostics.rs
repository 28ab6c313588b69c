#![forbid(unsafe_code)]

//! Non-fatal layout anomalies.
//!
//! Nothing in the engine fails on bad geometry. Malformed input is clamped or
//! skipped, and the anomaly is reported as a [`LayoutDiagnostic`] so the host
//! can fix its data.

use std::fmt;

use dashgrid_core::warn;

use crate::breakpoint::Breakpoint;
use crate::model::WidgetId;
use crate::rect::GridRect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutDiagnostic {
    /// A stored rectangle violated its constraints or the grid bounds and was
    /// clamped.
    RectClamped {
        widget: WidgetId,
        breakpoint: Breakpoint,
        before: GridRect,
        after: GridRect,
    },
    /// Compaction gave up on a widget after the retry cap and left it at `y`.
    CompactionStalled {
        widget: WidgetId,
        iterations: u32,
        y: i32,
    },
    /// The widget has no rectangle at any breakpoint and is not rendered.
    Unplaceable {
        widget: WidgetId,
        breakpoint: Breakpoint,
    },
    /// A resize started from a handle name the engine does not know.
    UnknownResizeHandle { widget: WidgetId, handle: String },
}

impl LayoutDiagnostic {
    /// Widget the anomaly concerns.
    #[must_use]
    pub fn widget(&self) -> &WidgetId {
        match self {
            Self::RectClamped { widget, .. }
            | Self::CompactionStalled { widget, .. }
            | Self::Unplaceable { widget, .. }
            | Self::UnknownResizeHandle { widget, .. } => widget,
        }
    }

    /// Stable snake_case code for log aggregation.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::RectClamped { .. } => "rect_clamped",
            Self::CompactionStalled { .. } => "compaction_stalled",
            Self::Unplaceable { .. } => "unplaceable",
            Self::UnknownResizeHandle { .. } => "unknown_resize_handle",
        }
    }

    /// Emit at `warn` level.
    pub fn log(&self) {
        warn!(code = self.code(), widget = %self.widget(), "{self}");
    }
}

impl fmt::Display for LayoutDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RectClamped {
                widget,
                breakpoint,
                before,
                after,
            } => write!(
                f,
                "widget {widget} at {breakpoint}: rect ({}, {}, {}x{}) clamped to ({}, {}, {}x{})",
                before.x, before.y, before.w, before.h, after.x, after.y, after.w, after.h
            ),
            Self::CompactionStalled {
                widget,
                iterations,
                y,
            } => write!(
                f,
                "widget {widget}: compaction stopped after {iterations} retries, left at row {y}"
            ),
            Self::Unplaceable { widget, breakpoint } => write!(
                f,
                "widget {widget} has no rect at any breakpoint (active: {breakpoint})"
            ),
            Self::UnknownResizeHandle { widget, handle } => {
                write!(f, "widget {widget}: unknown resize handle {handle:?}")
            }
        }
    }
}
