#![forbid(unsafe_code)]

//! Resize controller.
//!
//! ```text
//! Idle -> Resizing -> Idle
//! ```
//!
//! Unlike dragging, every pointer move produces a new grid rectangle so the
//! widget visibly grows and shrinks during the gesture.

use std::fmt;

use bitflags::bitflags;
use dashgrid_core::{CancelReason, PixelPoint, PointerId};

use crate::geometry::GridGeometry;
use crate::model::WidgetId;
use crate::rect::GridRect;

bitflags! {
    /// Edges moved by a resize handle. Corners combine two edges.
    ///
    /// The empty set stands for a handle name the engine did not recognize;
    /// such a gesture runs to completion but never changes the size.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResizeHandle: u8 {
        const N = 0b0001;
        const S = 0b0010;
        const E = 0b0100;
        const W = 0b1000;
        const NE = Self::N.bits() | Self::E.bits();
        const NW = Self::N.bits() | Self::W.bits();
        const SE = Self::S.bits() | Self::E.bits();
        const SW = Self::S.bits() | Self::W.bits();
    }
}

impl ResizeHandle {
    /// Parse a handle name (`n`, `s`, `e`, `w`, `ne`, `nw`, `se`, `sw`).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "n" => Some(Self::N),
            "s" => Some(Self::S),
            "e" => Some(Self::E),
            "w" => Some(Self::W),
            "ne" => Some(Self::NE),
            "nw" => Some(Self::NW),
            "se" => Some(Self::SE),
            "sw" => Some(Self::SW),
            _ => None,
        }
    }

    /// Canonical name; empty for the unrecognized handle.
    #[must_use]
    pub fn name(self) -> &'static str {
        const NAMES: [(ResizeHandle, &str); 8] = [
            (ResizeHandle::NE, "ne"),
            (ResizeHandle::NW, "nw"),
            (ResizeHandle::SE, "se"),
            (ResizeHandle::SW, "sw"),
            (ResizeHandle::N, "n"),
            (ResizeHandle::S, "s"),
            (ResizeHandle::E, "e"),
            (ResizeHandle::W, "w"),
        ];
        NAMES
            .iter()
            .find(|(handle, _)| *handle == self)
            .map_or("", |(_, name)| *name)
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Apply a cell delta to `start` through `handle`.
///
/// Trailing edges (`e`, `s`) add the delta; leading edges (`w`, `n`) subtract
/// it. The origin never moves. Width is clamped to `[minW, maxW]` and to the
/// columns right of `x`; height to `[minH, maxH]`.
#[must_use]
pub fn resized(start: &GridRect, handle: ResizeHandle, dx: i32, dy: i32, columns: u16) -> GridRect {
    if handle.is_empty() {
        return *start;
    }
    let mut w = start.w;
    let mut h = start.h;
    if handle.contains(ResizeHandle::E) {
        w = w.saturating_add(dx);
    }
    if handle.contains(ResizeHandle::W) {
        w = w.saturating_sub(dx);
    }
    if handle.contains(ResizeHandle::S) {
        h = h.saturating_add(dy);
    }
    if handle.contains(ResizeHandle::N) {
        h = h.saturating_sub(dy);
    }
    let b = start.bounds(columns);
    let room = i32::from(columns.max(1)) - start.x.max(0);
    let max_w = b.max_w.min(room).max(b.min_w);
    start.sized(w.clamp(b.min_w, max_w), h.clamp(b.min_h, b.max_h))
}

/// Input to [`ResizeMachine::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeEvent {
    Press {
        widget: WidgetId,
        pointer_id: PointerId,
        handle: ResizeHandle,
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
pub enum ResizeState {
    #[default]
    Idle,
    Resizing {
        widget: WidgetId,
        pointer_id: PointerId,
        handle: ResizeHandle,
        /// Rectangle when the gesture started.
        start: GridRect,
        press: PixelPoint,
        /// Rectangle after the latest move.
        current: GridRect,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeNoopReason {
    IdleWithoutActiveResize,
    ActiveResizeAlreadyInProgress,
    PointerMismatch,
    /// The gesture's handle has no edges.
    UnknownHandle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResizeEffect {
    Started {
        widget: WidgetId,
        handle: ResizeHandle,
        start: GridRect,
    },
    /// Emitted on every move with a known handle.
    Resized { widget: WidgetId, rect: GridRect },
    Finished { widget: WidgetId, rect: GridRect },
    Canceled {
        widget: WidgetId,
        restore: GridRect,
        reason: CancelReason,
    },
    Noop { reason: ResizeNoopReason },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeTransition {
    pub transition_id: u64,
    pub from: ResizeState,
    pub to: ResizeState,
    pub effect: ResizeEffect,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResizeMachine {
    state: ResizeState,
    transition_counter: u64,
}

impl ResizeMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &ResizeState {
        &self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, ResizeState::Resizing { .. })
    }

    /// Pointer that owns the active resize.
    #[must_use]
    pub fn pointer_id(&self) -> Option<PointerId> {
        match &self.state {
            ResizeState::Resizing { pointer_id, .. } => Some(*pointer_id),
            ResizeState::Idle => None,
        }
    }

    /// Apply one event.
    pub fn apply(&mut self, event: &ResizeEvent, geometry: &GridGeometry) -> ResizeTransition {
        let from = self.state.clone();
        let effect = match (&self.state, event) {
            (
                ResizeState::Idle,
                ResizeEvent::Press {
                    widget,
                    pointer_id,
                    handle,
                    position,
                    rect,
                },
            ) => {
                self.state = ResizeState::Resizing {
                    widget: widget.clone(),
                    pointer_id: *pointer_id,
                    handle: *handle,
                    start: *rect,
                    press: *position,
                    current: *rect,
                };
                ResizeEffect::Started {
                    widget: widget.clone(),
                    handle: *handle,
                    start: *rect,
                }
            }
            (ResizeState::Idle, _) => ResizeEffect::Noop {
                reason: ResizeNoopReason::IdleWithoutActiveResize,
            },
            (ResizeState::Resizing { .. }, ResizeEvent::Press { .. }) => ResizeEffect::Noop {
                reason: ResizeNoopReason::ActiveResizeAlreadyInProgress,
            },
            (
                ResizeState::Resizing {
                    widget,
                    pointer_id,
                    handle,
                    start,
                    press,
                    ..
                },
                ResizeEvent::Move {
                    pointer_id: incoming,
                    position,
                },
            ) => {
                if incoming != pointer_id {
                    ResizeEffect::Noop {
                        reason: ResizeNoopReason::PointerMismatch,
                    }
                } else if handle.is_empty() {
                    ResizeEffect::Noop {
                        reason: ResizeNoopReason::UnknownHandle,
                    }
                } else {
                    let widget = widget.clone();
                    let rect = rect_at(start, *handle, *press, *position, geometry);
                    self.state = ResizeState::Resizing {
                        widget: widget.clone(),
                        pointer_id: *pointer_id,
                        handle: *handle,
                        start: *start,
                        press: *press,
                        current: rect,
                    };
                    ResizeEffect::Resized { widget, rect }
                }
            }
            (
                ResizeState::Resizing {
                    widget,
                    pointer_id,
                    handle,
                    start,
                    press,
                    ..
                },
                ResizeEvent::Release {
                    pointer_id: incoming,
                    position,
                },
            ) => {
                if incoming != pointer_id {
                    ResizeEffect::Noop {
                        reason: ResizeNoopReason::PointerMismatch,
                    }
                } else {
                    let effect = ResizeEffect::Finished {
                        widget: widget.clone(),
                        rect: rect_at(start, *handle, *press, *position, geometry),
                    };
                    self.state = ResizeState::Idle;
                    effect
                }
            }
            (ResizeState::Resizing { widget, start, .. }, ResizeEvent::Cancel { reason }) => {
                let effect = ResizeEffect::Canceled {
                    widget: widget.clone(),
                    restore: *start,
                    reason: *reason,
                };
                self.state = ResizeState::Idle;
                effect
            }
        };

        self.transition_counter = self.transition_counter.saturating_add(1);
        ResizeTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state.clone(),
            effect,
        }
    }
}

fn rect_at(
    start: &GridRect,
    handle: ResizeHandle,
    press: PixelPoint,
    position: PixelPoint,
    geometry: &GridGeometry,
) -> GridRect {
    let (dx, dy) = geometry.delta_to_cells(position.delta_from(press));
    resized(start, handle, dx, dy, geometry.columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DashboardLayout;

    // 12 columns, pitch 100 x 60, padding 10.
    fn geometry() -> GridGeometry {
        let layout = DashboardLayout {
            gap: 10.0,
            padding: 10.0,
            row_height: 50.0,
            ..DashboardLayout::default()
        };
        GridGeometry::resolve(&layout, 1210.0)
    }

    fn start(machine: &mut ResizeMachine, handle: ResizeHandle, rect: GridRect) {
        machine.apply(
            &ResizeEvent::Press {
                widget: WidgetId::from("w"),
                pointer_id: PointerId::PRIMARY,
                handle,
                position: PixelPoint::new(500.0, 300.0),
                rect,
            },
            &geometry(),
        );
    }

    fn move_by(machine: &mut ResizeMachine, dx: f64, dy: f64) -> ResizeTransition {
        machine.apply(
            &ResizeEvent::Move {
                pointer_id: PointerId::PRIMARY,
                position: PixelPoint::new(500.0 + dx, 300.0 + dy),
            },
            &geometry(),
        )
    }

    #[test]
    fn parse_known_handles() {
        assert_eq!(ResizeHandle::parse("se"), Some(ResizeHandle::S | ResizeHandle::E));
        assert_eq!(ResizeHandle::parse("w"), Some(ResizeHandle::W));
        assert_eq!(ResizeHandle::parse("ns"), None);
        assert_eq!(ResizeHandle::parse("SE"), None);
        assert_eq!(ResizeHandle::parse(""), None);
        for name in ["n", "s", "e", "w", "ne", "nw", "se", "sw"] {
            let handle = ResizeHandle::parse(name).expect("known");
            assert_eq!(handle.name(), name);
        }
        assert_eq!(ResizeHandle::empty().name(), "");
    }

    #[test]
    fn trailing_edges_add_delta() {
        let r = resized(&GridRect::new(0, 0, 4, 2), ResizeHandle::SE, 2, 3, 12);
        assert_eq!((r.w, r.h), (6, 5));
    }

    #[test]
    fn leading_edges_subtract_delta() {
        let r = resized(&GridRect::new(4, 4, 4, 4), ResizeHandle::NW, 2, -1, 12);
        assert_eq!((r.x, r.y, r.w, r.h), (4, 4, 2, 5));
    }

    #[test]
    fn single_edge_handles_touch_one_axis() {
        let r = resized(&GridRect::new(0, 0, 4, 2), ResizeHandle::E, 3, 7, 12);
        assert_eq!((r.w, r.h), (7, 2));
        let r = resized(&GridRect::new(0, 0, 4, 2), ResizeHandle::S, 3, 7, 12);
        assert_eq!((r.w, r.h), (4, 9));
    }

    #[test]
    fn shrink_past_min_stops_at_min() {
        let rect = GridRect::new(0, 0, 4, 3).with_min(2, 2);
        let r = resized(&rect, ResizeHandle::SE, -6, -6, 12);
        assert_eq!((r.w, r.h), (2, 2));
    }

    #[test]
    fn grow_past_max_stops_at_max() {
        let rect = GridRect::new(0, 0, 4, 3).with_max(6, 5);
        let r = resized(&rect, ResizeHandle::SE, 40, 40, 12);
        assert_eq!((r.w, r.h), (6, 5));
    }

    #[test]
    fn width_cannot_cross_right_edge() {
        let r = resized(&GridRect::new(9, 0, 2, 2), ResizeHandle::E, 10, 0, 12);
        assert_eq!(r.w, 3);
    }

    // Leading-edge handles never move the origin, so a widget flush with the
    // right edge cannot be widened from its west side: pulling `w` left asks
    // for more width, but only `columns - x` columns exist to the right of `x`.
    #[test]
    fn west_handle_cannot_widen_widget_at_right_edge() {
        let flush = GridRect::new(8, 0, 4, 2);
        for handle in [ResizeHandle::W, ResizeHandle::NW, ResizeHandle::SW] {
            let r = resized(&flush, handle, -3, 0, 12);
            assert_eq!((r.x, r.y, r.w), (8, 0, 4), "handle {handle}");
        }
        // Shrinking from the west still works and keeps the origin.
        let r = resized(&flush, ResizeHandle::W, 2, 0, 12);
        assert_eq!((r.x, r.w), (8, 2));
    }

    #[test]
    fn empty_handle_never_changes_size() {
        let rect = GridRect::new(1, 1, 3, 3);
        assert_eq!(resized(&rect, ResizeHandle::empty(), 5, 5, 12), rect);
    }

    #[test]
    fn every_move_reports_candidate_rect() {
        let mut m = ResizeMachine::new();
        start(&mut m, ResizeHandle::SE, GridRect::new(0, 0, 4, 2));
        let t = move_by(&mut m, 110.0, 0.0);
        assert_eq!(
            t.effect,
            ResizeEffect::Resized {
                widget: WidgetId::from("w"),
                rect: GridRect::new(0, 0, 5, 2),
            }
        );
        let t = move_by(&mut m, 240.0, 130.0);
        assert_eq!(
            t.effect,
            ResizeEffect::Resized {
                widget: WidgetId::from("w"),
                rect: GridRect::new(0, 0, 6, 4),
            }
        );
        // Delta is measured from the press, not the previous move.
        let t = move_by(&mut m, 0.0, 0.0);
        assert!(matches!(t.effect, ResizeEffect::Resized { rect, .. } if rect.w == 4 && rect.h == 2));
    }

    #[test]
    fn pointer_delta_of_minus_six_cells_stops_at_min_width() {
        let mut m = ResizeMachine::new();
        let rect = GridRect::new(0, 0, 4, 2).with_min(2, 1);
        start(&mut m, ResizeHandle::E, rect);
        move_by(&mut m, -600.0, 0.0);
        let t = m.apply(
            &ResizeEvent::Release {
                pointer_id: PointerId::PRIMARY,
                position: PixelPoint::new(-100.0, 300.0),
            },
            &geometry(),
        );
        match t.effect {
            ResizeEffect::Finished { rect, .. } => assert_eq!(rect.w, 2),
            other => panic!("expected finish, got {other:?}"),
        }
        assert!(!m.is_active());
    }

    #[test]
    fn unknown_handle_is_noop_until_release() {
        let mut m = ResizeMachine::new();
        let rect = GridRect::new(0, 0, 4, 2);
        start(&mut m, ResizeHandle::empty(), rect);
        let t = move_by(&mut m, 300.0, 300.0);
        assert_eq!(
            t.effect,
            ResizeEffect::Noop {
                reason: ResizeNoopReason::UnknownHandle
            }
        );
        let t = m.apply(
            &ResizeEvent::Release {
                pointer_id: PointerId::PRIMARY,
                position: PixelPoint::new(900.0, 900.0),
            },
            &geometry(),
        );
        assert_eq!(
            t.effect,
            ResizeEffect::Finished {
                widget: WidgetId::from("w"),
                rect,
            }
        );
        assert_eq!(t.to, ResizeState::Idle);
    }

    #[test]
    fn cancel_restores_start() {
        let mut m = ResizeMachine::new();
        let rect = GridRect::new(2, 2, 3, 3);
        start(&mut m, ResizeHandle::SE, rect);
        move_by(&mut m, 300.0, 300.0);
        let t = m.apply(
            &ResizeEvent::Cancel {
                reason: CancelReason::PointerLeave,
            },
            &geometry(),
        );
        assert_eq!(
            t.effect,
            ResizeEffect::Canceled {
                widget: WidgetId::from("w"),
                restore: rect,
                reason: CancelReason::PointerLeave,
            }
        );
    }

    #[test]
    fn foreign_pointer_and_second_press_are_ignored() {
        let mut m = ResizeMachine::new();
        start(&mut m, ResizeHandle::S, GridRect::new(0, 0, 2, 2));
        let t = m.apply(
            &ResizeEvent::Move {
                pointer_id: PointerId(4),
                position: PixelPoint::new(0.0, 900.0),
            },
            &geometry(),
        );
        assert_eq!(
            t.effect,
            ResizeEffect::Noop {
                reason: ResizeNoopReason::PointerMismatch
            }
        );
        let t = m.apply(
            &ResizeEvent::Press {
                widget: WidgetId::from("other"),
                pointer_id: PointerId(4),
                handle: ResizeHandle::E,
                position: PixelPoint::ORIGIN,
                rect: GridRect::new(4, 0, 2, 2),
            },
            &geometry(),
        );
        assert_eq!(
            t.effect,
            ResizeEffect::Noop {
                reason: ResizeNoopReason::ActiveResizeAlreadyInProgress
            }
        );
    }
}
