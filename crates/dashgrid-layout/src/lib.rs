#![forbid(unsafe_code)]

//! Responsive dashboard grid.
//!
//! Widgets sit on a column grid whose column count depends on the container
//! width. Users drag and resize them in edit mode, and after each committed
//! change the grid is compacted upward so no vertical gaps remain.
//!
//! - [`GridEngine`] - owns the model and routes pointer input to the gesture machines
//! - [`DragMachine`] / [`ResizeMachine`] - per-gesture state machines
//! - [`compact`] - overlap-free vertical compaction
//! - [`GridGeometry`] - grid-cell ↔ pixel conversion for one container width
//! - [`DashboardRecord`] - the persisted JSON shape
//!
//! ```ignore
//! use dashgrid_layout::{DashboardLayout, GridEngine, GridInput, HitTarget};
//!
//! let mut engine = GridEngine::new(host, DashboardLayout::default(), 1280.0);
//! engine.set_widgets(record.widget_set(), record.layout.clone(), true);
//! engine.handle(GridInput::PointerDown {
//!     pointer_id: PointerId::PRIMARY,
//!     position: PixelPoint::new(40.0, 40.0),
//!     target: HitTarget::Body("cpu".into()),
//! });
//! ```

pub mod breakpoint;
pub mod compact;
pub mod diagnostics;
pub mod drag;
pub mod engine;
pub mod geometry;
pub mod model;
pub mod record;
pub mod rect;
pub mod resize;

pub use breakpoint::{Breakpoint, BreakpointValues};
pub use compact::{
    CompactedSet, Compaction, MAX_COMPACTION_ITERATIONS, Stall, compact, compact_widgets,
    overlapping_pairs,
};
pub use dashgrid_core::{CancelReason, PixelPoint, PixelRect, PointerId, Timestamp};
pub use diagnostics::LayoutDiagnostic;
pub use drag::{
    DRAG_THRESHOLD_PX, DragEffect, DragEvent, DragMachine, DragNoopReason, DragState,
    DragTransition,
};
pub use engine::{
    GridEngine, GridHost, GridInput, HitTarget, IgnoreReason, InputResponse, RenderedWidget,
};
pub use geometry::GridGeometry;
pub use model::{CompactType, DashboardLayout, Placement, Widget, WidgetId, WidgetSet};
pub use record::{DashboardRecord, RecordError, RecordResult};
pub use rect::{DEFAULT_MAX_ROWS, GridRect, SizeBounds};
pub use resize::{
    ResizeEffect, ResizeEvent, ResizeHandle, ResizeMachine, ResizeNoopReason, ResizeState,
    ResizeTransition, resized,
};
