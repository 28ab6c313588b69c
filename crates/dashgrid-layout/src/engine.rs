#![forbid(unsafe_code)]

//! The grid engine and its host contract.
//!
//! [`GridEngine`] owns the position model, the container geometry, and the
//! two gesture machines. Hosts feed it pointer input through
//! [`GridEngine::handle`] and receive results through [`GridHost`] callbacks.
//! Everything runs synchronously on the caller's thread.

use dashgrid_core::{
    CancelReason, Clock, PixelPoint, PixelRect, PointerId, SystemClock, debug, debug_span,
};

use crate::breakpoint::Breakpoint;
use crate::compact::compact_widgets;
use crate::diagnostics::LayoutDiagnostic;
use crate::drag::{DragEffect, DragEvent, DragMachine, DragTransition};
use crate::geometry::GridGeometry;
use crate::model::{DashboardLayout, Widget, WidgetId, WidgetSet};
use crate::rect::GridRect;
use crate::resize::{ResizeEffect, ResizeEvent, ResizeHandle, ResizeMachine, ResizeTransition};

/// Callbacks from the engine to its host.
pub trait GridHost {
    /// Whatever the host draws inside a widget's frame. The engine never
    /// inspects it.
    type Content;

    /// Produce content for one visible widget.
    fn render_widget(&mut self, widget: &Widget) -> Self::Content;

    /// Called after every committed drag, every resize move, and every resize
    /// end, with the full widget collection.
    fn on_layout_change(&mut self, widgets: &WidgetSet, breakpoint: Breakpoint);

    /// A widget was clicked (pressed and released without dragging) in edit mode.
    fn on_widget_select(&mut self, _widget: &Widget) {}

    /// The host's own UI asked to remove a widget. The engine never removes
    /// widgets; the host should drop it and call [`GridEngine::set_widgets`].
    fn on_widget_delete(&mut self, _id: &WidgetId) {}

    /// A container resize moved the grid to a different breakpoint.
    fn on_breakpoint_change(&mut self, _from: Breakpoint, _to: Breakpoint) {}

    fn on_diagnostic(&mut self, _diagnostic: &LayoutDiagnostic) {}
}

/// What the pointer went down on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// The widget body; starts a drag.
    Body(WidgetId),
    /// A named resize handle (`n`, `se`, ...); starts a resize.
    Handle { widget: WidgetId, handle: String },
}

/// Pointer input in container pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum GridInput {
    PointerDown {
        pointer_id: PointerId,
        position: PixelPoint,
        target: HitTarget,
    },
    PointerMove {
        pointer_id: PointerId,
        position: PixelPoint,
    },
    PointerUp {
        pointer_id: PointerId,
        position: PixelPoint,
    },
    /// The pointer left the tracked surface without a release.
    PointerLeave { pointer_id: PointerId },
    Cancel { reason: CancelReason },
}

/// Why [`GridEngine::handle`] did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotEditing,
    /// Unknown, hidden, or unplaceable widget.
    NotPlaceable,
    GestureInProgress,
    NoActiveGesture,
    PointerMismatch,
}

/// Outcome of one input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputResponse {
    Ignored(IgnoreReason),
    Drag(DragTransition),
    Resize(ResizeTransition),
}

/// One widget ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedWidget<C> {
    pub id: WidgetId,
    pub frame: PixelRect,
    /// Frame follows the pointer instead of the grid.
    pub dragging: bool,
    pub content: C,
}

/// Responsive widget grid with drag, resize, and vertical compaction.
pub struct GridEngine<H: GridHost> {
    host: H,
    layout: DashboardLayout,
    widgets: WidgetSet,
    edit_mode: bool,
    geometry: GridGeometry,
    drag: DragMachine,
    resize: ResizeMachine,
    /// Model as it was when the active resize started.
    resize_origin: Option<WidgetSet>,
    clock: Box<dyn Clock>,
}

impl<H: GridHost> GridEngine<H> {
    /// Empty engine for a container `container_width` pixels wide.
    pub fn new(host: H, layout: DashboardLayout, container_width: f64) -> Self {
        let geometry = GridGeometry::resolve(&layout, container_width);
        Self {
            host,
            layout,
            widgets: WidgetSet::default(),
            edit_mode: false,
            geometry,
            drag: DragMachine::new(),
            resize: ResizeMachine::new(),
            resize_origin: None,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the clock used for `updated_at` stamps.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn widgets(&self) -> &WidgetSet {
        &self.widgets
    }

    pub fn layout(&self) -> &DashboardLayout {
        &self.layout
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.geometry.breakpoint
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn is_gesture_active(&self) -> bool {
        self.drag.is_active() || self.resize.is_active()
    }

    /// Replace the working set and configuration.
    ///
    /// Recomputes geometry and reports malformed or unplaceable widgets, but
    /// does not compact or emit a layout change. An in-progress gesture is
    /// cancelled silently, since the new set replaces whatever it touched.
    pub fn set_widgets(
        &mut self,
        widgets: impl Into<WidgetSet>,
        layout: DashboardLayout,
        edit_mode: bool,
    ) {
        self.abort_gesture(CancelReason::Programmatic, false);
        self.widgets = widgets.into();
        self.layout = layout;
        self.edit_mode = edit_mode;
        self.geometry = GridGeometry::resolve(&self.layout, self.geometry.container_width);
        self.validate();
    }

    /// Turn edit mode on or off.
    ///
    /// Turning it off cancels any gesture. A cancelled resize restores the
    /// pre-gesture model and emits it, so the host does not keep the
    /// intermediate rects it was shown.
    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        if !edit_mode {
            self.abort_gesture(CancelReason::Programmatic, true);
        }
        self.edit_mode = edit_mode;
    }

    /// Container resize notification.
    ///
    /// Cell geometry is recomputed on every call. When the breakpoint changes,
    /// any gesture is cancelled (a resize is restored and emitted, as in
    /// [`GridEngine::set_edit_mode`]) and the host is notified. Never compacts.
    pub fn set_container_width(&mut self, width: f64) {
        let previous = self.geometry.breakpoint;
        self.geometry = GridGeometry::resolve(&self.layout, width);
        let current = self.geometry.breakpoint;
        if previous != current {
            debug!(from = %previous, to = %current, width, "breakpoint changed");
            self.abort_gesture(CancelReason::Programmatic, true);
            self.host.on_breakpoint_change(previous, current);
            self.validate();
        }
    }

    /// Forward a removal request to the host. Returns `false` for unknown ids.
    pub fn request_delete(&mut self, id: &WidgetId) -> bool {
        if self.widgets.get(id).is_none() {
            return false;
        }
        self.host.on_widget_delete(id);
        true
    }

    /// Feed one pointer event through the gesture machines.
    pub fn handle(&mut self, input: GridInput) -> InputResponse {
        let span = debug_span!("grid_input", edit_mode = self.edit_mode);
        let _guard = span.enter();
        match input {
            GridInput::PointerDown {
                pointer_id,
                position,
                target,
            } => self.pointer_down(pointer_id, position, target),
            GridInput::PointerMove {
                pointer_id,
                position,
            } => {
                if self.drag.is_active() {
                    self.drive_drag(DragEvent::Move {
                        pointer_id,
                        position,
                    })
                } else if self.resize.is_active() {
                    self.drive_resize(ResizeEvent::Move {
                        pointer_id,
                        position,
                    })
                } else {
                    InputResponse::Ignored(IgnoreReason::NoActiveGesture)
                }
            }
            GridInput::PointerUp {
                pointer_id,
                position,
            } => {
                if self.drag.is_active() {
                    self.drive_drag(DragEvent::Release {
                        pointer_id,
                        position,
                    })
                } else if self.resize.is_active() {
                    self.drive_resize(ResizeEvent::Release {
                        pointer_id,
                        position,
                    })
                } else {
                    InputResponse::Ignored(IgnoreReason::NoActiveGesture)
                }
            }
            GridInput::PointerLeave { pointer_id } => {
                let owner = self.drag.pointer_id().or(self.resize.pointer_id());
                match owner {
                    None => InputResponse::Ignored(IgnoreReason::NoActiveGesture),
                    Some(owner) if owner != pointer_id => {
                        InputResponse::Ignored(IgnoreReason::PointerMismatch)
                    }
                    Some(_) => self.cancel(CancelReason::PointerLeave, true),
                }
            }
            GridInput::Cancel { reason } => self.cancel(reason, true),
        }
    }

    /// Draw list: one entry per visible, placeable widget in insertion order,
    /// with the dragged widget (if any) last so it paints on top.
    pub fn render(&mut self) -> Vec<RenderedWidget<H::Content>> {
        let bp = self.geometry.breakpoint;
        let columns = self.geometry.columns;
        let dragging = self
            .drag
            .candidate()
            .map(|(id, corner)| (id.clone(), corner));

        let mut out = Vec::with_capacity(self.widgets.len());
        let mut lifted = None;
        for (_, widget, placement) in self.widgets.placements(bp, columns) {
            let frame = self.geometry.frame(&placement.rect);
            let rendered = match &dragging {
                Some((id, corner)) if *id == widget.id => RenderedWidget {
                    id: widget.id.clone(),
                    frame: frame.with_origin(*corner),
                    dragging: true,
                    content: self.host.render_widget(widget),
                },
                _ => RenderedWidget {
                    id: widget.id.clone(),
                    frame,
                    dragging: false,
                    content: self.host.render_widget(widget),
                },
            };
            if rendered.dragging {
                lifted = Some(rendered);
            } else {
                out.push(rendered);
            }
        }
        out.extend(lifted);
        out
    }

    /// Topmost visible widget whose frame contains `point`.
    pub fn hit_test(&self, point: PixelPoint) -> Option<WidgetId> {
        if let Some((id, corner)) = self.drag.candidate()
            && let Some(placement) = self
                .widgets
                .get(id)
                .and_then(|w| w.resolve(self.geometry.breakpoint, self.geometry.columns))
            && self
                .geometry
                .frame(&placement.rect)
                .with_origin(corner)
                .contains(point)
        {
            return Some(id.clone());
        }
        let hits: Vec<&WidgetId> = self
            .widgets
            .placements(self.geometry.breakpoint, self.geometry.columns)
            .filter(|(_, _, placement)| self.geometry.frame(&placement.rect).contains(point))
            .map(|(_, widget, _)| &widget.id)
            .collect();
        hits.last().map(|id| (*id).clone())
    }

    /// Pixel height of the grid content at the active breakpoint.
    pub fn container_height(&self) -> f64 {
        let rects: Vec<GridRect> = self
            .widgets
            .placements(self.geometry.breakpoint, self.geometry.columns)
            .map(|(_, _, placement)| placement.rect)
            .collect();
        self.geometry.container_height(&rects)
    }

    /// Where a new `w`×`h` widget fits at the active breakpoint.
    pub fn suggest_slot(&self, w: i32, h: i32) -> GridRect {
        self.widgets
            .first_free_slot(w, h, self.geometry.breakpoint, self.geometry.columns)
    }

    fn pointer_down(
        &mut self,
        pointer_id: PointerId,
        position: PixelPoint,
        target: HitTarget,
    ) -> InputResponse {
        if !self.edit_mode {
            return InputResponse::Ignored(IgnoreReason::NotEditing);
        }
        if self.is_gesture_active() {
            return InputResponse::Ignored(IgnoreReason::GestureInProgress);
        }
        let widget_id = match &target {
            HitTarget::Body(id) | HitTarget::Handle { widget: id, .. } => id,
        };
        let Some(rect) = self.committed_rect(widget_id) else {
            return InputResponse::Ignored(IgnoreReason::NotPlaceable);
        };
        match target {
            HitTarget::Body(widget) => self.drive_drag(DragEvent::Press {
                widget,
                pointer_id,
                position,
                rect,
            }),
            HitTarget::Handle { widget, handle } => {
                let parsed = ResizeHandle::parse(&handle).unwrap_or_else(|| {
                    self.report(LayoutDiagnostic::UnknownResizeHandle {
                        widget: widget.clone(),
                        handle: handle.clone(),
                    });
                    ResizeHandle::empty()
                });
                self.resize_origin = Some(self.widgets.clone());
                self.drive_resize(ResizeEvent::Press {
                    widget,
                    pointer_id,
                    handle: parsed,
                    position,
                    rect,
                })
            }
        }
    }

    fn drive_drag(&mut self, event: DragEvent) -> InputResponse {
        let transition = self.drag.apply(&event, &self.geometry);
        debug!(
            transition = transition.transition_id,
            effect = ?transition.effect,
            "drag transition"
        );
        match &transition.effect {
            DragEffect::Dropped { widget, to, .. } => {
                let now = self.clock.now();
                let next = self
                    .widgets
                    .with_rect(widget, self.geometry.breakpoint, *to, now);
                self.commit(next);
            }
            DragEffect::Clicked { widget } => {
                if let Some(w) = self.widgets.get(widget) {
                    self.host.on_widget_select(w);
                }
            }
            DragEffect::Started { .. }
            | DragEffect::Moved { .. }
            | DragEffect::Canceled { .. }
            | DragEffect::Noop { .. } => {}
        }
        InputResponse::Drag(transition)
    }

    fn drive_resize(&mut self, event: ResizeEvent) -> InputResponse {
        let transition = self.resize.apply(&event, &self.geometry);
        debug!(
            transition = transition.transition_id,
            effect = ?transition.effect,
            "resize transition"
        );
        let bp = self.geometry.breakpoint;
        match &transition.effect {
            ResizeEffect::Resized { widget, rect } => {
                let now = self.clock.now();
                self.widgets = self.widgets.with_rect(widget, bp, *rect, now);
                self.host.on_layout_change(&self.widgets, bp);
            }
            ResizeEffect::Finished { widget, rect } => {
                self.resize_origin = None;
                let now = self.clock.now();
                let next = self.widgets.with_rect(widget, bp, *rect, now);
                self.commit(next);
            }
            ResizeEffect::Canceled { .. } => {
                if let Some(origin) = self.resize_origin.take() {
                    self.widgets = origin;
                }
            }
            ResizeEffect::Started { .. } | ResizeEffect::Noop { .. } => {}
        }
        InputResponse::Resize(transition)
    }

    /// Cancel the active gesture. A cancelled resize restores the model it
    /// started from; with `emit` the host is told about the restored set.
    fn cancel(&mut self, reason: CancelReason, emit: bool) -> InputResponse {
        let response = if self.drag.is_active() {
            self.drive_drag(DragEvent::Cancel { reason })
        } else if self.resize.is_active() {
            self.drive_resize(ResizeEvent::Cancel { reason })
        } else {
            InputResponse::Ignored(IgnoreReason::NoActiveGesture)
        };
        if emit
            && let InputResponse::Resize(ResizeTransition {
                effect: ResizeEffect::Canceled { .. },
                ..
            }) = &response
        {
            self.host
                .on_layout_change(&self.widgets, self.geometry.breakpoint);
        }
        response
    }

    /// Cancel on behalf of the engine itself rather than the pointer.
    fn abort_gesture(&mut self, reason: CancelReason, emit: bool) {
        match self.cancel(reason, emit) {
            InputResponse::Ignored(_) => {}
            InputResponse::Drag(_) | InputResponse::Resize(_) => {
                debug!(reason = reason.label(), emit, "gesture aborted");
            }
        }
    }

    /// Swap in `next`, compacting first when configured, and notify the host.
    fn commit(&mut self, next: WidgetSet) {
        let bp = self.geometry.breakpoint;
        if self.layout.compact_type.is_vertical() {
            let now = self.clock.now();
            let compacted = compact_widgets(&next, bp, self.geometry.columns, now);
            for diagnostic in compacted.diagnostics {
                self.report(diagnostic);
            }
            self.widgets = compacted.widgets;
        } else {
            self.widgets = next;
        }
        self.host.on_layout_change(&self.widgets, bp);
    }

    fn committed_rect(&self, id: &WidgetId) -> Option<GridRect> {
        self.widgets
            .get(id)
            .filter(|widget| widget.visible)
            .and_then(|widget| widget.resolve(self.geometry.breakpoint, self.geometry.columns))
            .map(|placement| placement.rect)
    }

    fn validate(&mut self) {
        let bp = self.geometry.breakpoint;
        let columns = self.geometry.columns;
        let found: Vec<LayoutDiagnostic> = self
            .widgets
            .iter()
            .filter(|widget| widget.visible)
            .filter_map(|widget| match widget.resolve(bp, columns) {
                None => Some(LayoutDiagnostic::Unplaceable {
                    widget: widget.id.clone(),
                    breakpoint: bp,
                }),
                Some(placement) if placement.was_clamped() => {
                    Some(LayoutDiagnostic::RectClamped {
                        widget: widget.id.clone(),
                        breakpoint: bp,
                        before: placement.stored,
                        after: placement.rect,
                    })
                }
                Some(_) => None,
            })
            .collect();
        for diagnostic in found {
            self.report(diagnostic);
        }
    }

    fn report(&mut self, diagnostic: LayoutDiagnostic) {
        diagnostic.log();
        self.host.on_diagnostic(&diagnostic);
    }
}
