#![forbid(unsafe_code)]

//! Core: pixel geometry, pointer input vocabulary, clocks, and logging shared
//! by the dashgrid layout engine and its hosts.

pub mod event;
pub mod geometry;
pub mod logging;
pub mod time;

pub use event::{CancelReason, PointerId};
pub use geometry::{PixelPoint, PixelRect};
pub use time::{Clock, ManualClock, SystemClock, Timestamp};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
