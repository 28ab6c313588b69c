#![forbid(unsafe_code)]

//! Pointer input vocabulary shared between hosts and the layout engine.
//!
//! Hosts translate their native pointer events (DOM pointer events, winit
//! cursor events, terminal mouse reports) into these types before handing them
//! to the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of one pointer (mouse, pen, or touch contact).
///
/// A gesture is bound to the pointer that started it; events from any other
/// pointer are ignored until the gesture ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointerId(pub u32);

impl PointerId {
    /// The primary mouse pointer.
    pub const PRIMARY: Self = Self(1);

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for PointerId {
    fn default() -> Self {
        Self::PRIMARY
    }
}

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pointer#{}", self.0)
    }
}

/// Why an in-progress gesture ended without a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// The pointer left the tracked surface without a release.
    PointerLeave,
    /// The platform cancelled the pointer stream (e.g. touch interrupted).
    PointerCancel,
    /// The surface lost focus.
    FocusLost,
    /// The host replaced the widget set or layout mid-gesture.
    Programmatic,
}

impl CancelReason {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PointerLeave => "pointer_leave",
            Self::PointerCancel => "pointer_cancel",
            Self::FocusLost => "focus_lost",
            Self::Programmatic => "programmatic",
        }
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_id_serializes_transparently() {
        let json = serde_json::to_string(&PointerId(7)).expect("serialize");
        assert_eq!(json, "7");
        assert_eq!(PointerId::default(), PointerId::PRIMARY);
        assert_eq!(PointerId(3).to_string(), "pointer#3");
    }

    #[test]
    fn cancel_reason_labels_match_serde() {
        for reason in [
            CancelReason::PointerLeave,
            CancelReason::PointerCancel,
            CancelReason::FocusLost,
            CancelReason::Programmatic,
        ] {
            let json = serde_json::to_string(&reason).expect("serialize");
            assert_eq!(json, format!("\"{}\"", reason.label()));
        }
    }
}
