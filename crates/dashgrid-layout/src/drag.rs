#![forbid(unsafe_code)]

//! Drag controller.
//!
//! ```text
//! Idle -> Dragging -> Idle
//!            \-----> Idle (cancel: candidate discarded)
//! ```
//!
//! While dragging, the widget follows the pointer in pixel space with no grid
//! snapping. Snapping happens once, on release. The machine only computes
//! transitions; writing the dropped rectangle and compacting is up to the
//! caller.

use dashgrid_core::{CancelReason, PixelPoint, PointerId};

use crate::geometry::GridGeometry;
use crate::model::WidgetId;
use crate::rect::GridRect;

/// Pointer travel (in pixels) that turns a press into a drag rather than a
/// click.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Input to [`DragMachine::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    /// Pointer went down on a widget body. `rect` is the widget's committed
    /// rectangle at the active breakpoint.
    Press {
        widget: WidgetId,
        pointer_id: PointerId,
        position: PixelPoint,
        rect: GridRect,
    },
    Move {
        pointer_id: PointerId,
        position: PixelPoint,
    },
    Release {
        pointer_id: PointerId,
        position: PixelPoint,
    },
    Cancel {
        reason: CancelReason,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        widget: WidgetId,
        pointer_id: PointerId,
        /// Rectangle the widget had when the drag started.
        committed: GridRect,
        /// Pointer position at press.
        press: PixelPoint,
        /// Pointer position relative to the widget's top-left corner.
        offset: PixelPoint,
        /// Current top-left corner of the widget in pixels.
        candidate: PixelPoint,
        /// Pointer has travelled at least [`DRAG_THRESHOLD_PX`].
        moved: bool,
    },
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    PointerMismatch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragEffect {
    Started {
        widget: WidgetId,
        pointer_id: PointerId,
        origin: PixelPoint,
        offset: PixelPoint,
    },
    Moved {
        widget: WidgetId,
        candidate: PixelPoint,
    },
    /// Released after moving. `to` is snapped and clamped to the grid.
    Dropped {
        widget: WidgetId,
        from: GridRect,
        to: GridRect,
    },
    /// Released without crossing the drag threshold.
    Clicked { widget: WidgetId },
    /// Gesture abandoned; the widget stays at `restore`.
    Canceled {
        widget: WidgetId,
        restore: GridRect,
        reason: CancelReason,
    },
    Noop { reason: DragNoopReason },
}

/// One state-machine step.
#[derive(Debug, Clone, PartialEq)]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragState,
    pub to: DragState,
    pub effect: DragEffect,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DragMachine {
    state: DragState,
    transition_counter: u64,
}

impl DragMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Pointer that owns the active drag.
    #[must_use]
    pub fn pointer_id(&self) -> Option<PointerId> {
        match &self.state {
            DragState::Dragging { pointer_id, .. } => Some(*pointer_id),
            DragState::Idle => None,
        }
    }

    /// Widget being dragged and its current pixel top-left corner.
    #[must_use]
    pub fn candidate(&self) -> Option<(&WidgetId, PixelPoint)> {
        match &self.state {
            DragState::Dragging {
                widget, candidate, ..
            } => Some((widget, *candidate)),
            DragState::Idle => None,
        }
    }

    /// Apply one event.
    pub fn apply(&mut self, event: &DragEvent, geometry: &GridGeometry) -> DragTransition {
        let from = self.state.clone();
        let effect = match (&self.state, event) {
            (
                DragState::Idle,
                DragEvent::Press {
                    widget,
                    pointer_id,
                    position,
                    rect,
                },
            ) => {
                let origin = geometry.grid_to_pixel(rect.x, rect.y);
                let offset = position.delta_from(origin);
                self.state = DragState::Dragging {
                    widget: widget.clone(),
                    pointer_id: *pointer_id,
                    committed: *rect,
                    press: *position,
                    offset,
                    candidate: origin,
                    moved: false,
                };
                DragEffect::Started {
                    widget: widget.clone(),
                    pointer_id: *pointer_id,
                    origin,
                    offset,
                }
            }
            (DragState::Idle, _) => DragEffect::Noop {
                reason: DragNoopReason::IdleWithoutActiveDrag,
            },
            (DragState::Dragging { .. }, DragEvent::Press { .. }) => DragEffect::Noop {
                reason: DragNoopReason::ActiveDragAlreadyInProgress,
            },
            (
                DragState::Dragging {
                    widget,
                    pointer_id,
                    committed,
                    press,
                    offset,
                    moved,
                    ..
                },
                DragEvent::Move {
                    pointer_id: incoming,
                    position,
                },
            ) => {
                if incoming != pointer_id {
                    DragEffect::Noop {
                        reason: DragNoopReason::PointerMismatch,
                    }
                } else {
                    let widget = widget.clone();
                    let candidate = follow(*position, *offset);
                    self.state = DragState::Dragging {
                        widget: widget.clone(),
                        pointer_id: *pointer_id,
                        committed: *committed,
                        press: *press,
                        offset: *offset,
                        candidate,
                        moved: *moved || crossed_threshold(*press, *position),
                    };
                    DragEffect::Moved { widget, candidate }
                }
            }
            (
                DragState::Dragging {
                    widget,
                    pointer_id,
                    committed,
                    press,
                    offset,
                    moved,
                    ..
                },
                DragEvent::Release {
                    pointer_id: incoming,
                    position,
                },
            ) => {
                if incoming != pointer_id {
                    DragEffect::Noop {
                        reason: DragNoopReason::PointerMismatch,
                    }
                } else {
                    let widget = widget.clone();
                    let effect = if *moved || crossed_threshold(*press, *position) {
                        DragEffect::Dropped {
                            widget,
                            from: *committed,
                            to: snap_to_grid(committed, follow(*position, *offset), geometry),
                        }
                    } else {
                        DragEffect::Clicked { widget }
                    };
                    self.state = DragState::Idle;
                    effect
                }
            }
            (
                DragState::Dragging {
                    widget, committed, ..
                },
                DragEvent::Cancel { reason },
            ) => {
                let effect = DragEffect::Canceled {
                    widget: widget.clone(),
                    restore: *committed,
                    reason: *reason,
                };
                self.state = DragState::Idle;
                effect
            }
        };

        self.transition_counter = self.transition_counter.saturating_add(1);
        DragTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state.clone(),
            effect,
        }
    }
}

/// Widget top-left corner for a pointer at `position`, kept inside the
/// container's non-negative quadrant.
fn follow(position: PixelPoint, offset: PixelPoint) -> PixelPoint {
    position.minus(offset).clamp_non_negative()
}

fn crossed_threshold(press: PixelPoint, current: PixelPoint) -> bool {
    press.distance_squared(current) >= DRAG_THRESHOLD_PX * DRAG_THRESHOLD_PX
}

/// Snap a pixel corner to the grid: `x` in `[0, columns − w]`, `y >= 0`.
fn snap_to_grid(committed: &GridRect, candidate: PixelPoint, geometry: &GridGeometry) -> GridRect {
    let (x, y) = geometry.pixel_to_grid(candidate);
    let max_x = (i32::from(geometry.columns) - committed.w).max(0);
    committed.at(x.clamp(0, max_x), y.max(0))
}
