#![forbid(unsafe_code)]

//! At-rest dashboard record.
//!
//! A [`DashboardRecord`] is what a host persists: the widget list, the grid
//! configuration, and any dashboard-level fields the engine does not know
//! about. Unknown fields are kept in `extensions` on both the record and each
//! widget, so decoding and re-encoding a document does not drop anything.
//!
//! ```json
//! {
//!   "widgets": [
//!     { "id": "cpu", "title": "CPU",
//!       "position": { "lg": { "x": 0, "y": 0, "w": 4, "h": 2, "minW": 2 } },
//!       "visible": true, "updatedAt": 1700000000000, "chart": "line" }
//!   ],
//!   "layout": { "columns": 12, "rowHeight": 80, "gap": 16, "padding": 16,
//!               "breakpoints": { "lg": 1200, "md": 996, "sm": 768, "xs": 480 },
//!               "compactType": "vertical" },
//!   "owner": "ops"
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{DashboardLayout, Widget, WidgetId, WidgetSet};

/// Errors from decoding or encoding a [`DashboardRecord`].
#[derive(Debug)]
pub enum RecordError {
    /// The document is not valid JSON or does not have the record's shape.
    Decode(serde_json::Error),
    /// Serialization failed (non-string map keys in an extension value, etc.).
    Encode(serde_json::Error),
    /// Two widgets share an id.
    DuplicateWidgetId(WidgetId),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Decode(e) => write!(f, "invalid dashboard record: {e}"),
            RecordError::Encode(e) => write!(f, "failed to encode dashboard record: {e}"),
            RecordError::DuplicateWidgetId(id) => write!(f, "duplicate widget id `{id}`"),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordError::Decode(e) | RecordError::Encode(e) => Some(e),
            RecordError::DuplicateWidgetId(_) => None,
        }
    }
}

/// Result type for record operations.
pub type RecordResult<T> = Result<T, RecordError>;

/// Persisted dashboard: widgets, layout configuration, and host fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardRecord {
    #[serde(default)]
    pub widgets: Vec<Widget>,
    #[serde(default)]
    pub layout: DashboardLayout,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl DashboardRecord {
    /// Record for a working set and its configuration.
    pub fn new(widgets: &WidgetSet, layout: DashboardLayout) -> Self {
        Self {
            widgets: widgets.as_slice().to_vec(),
            layout,
            extensions: BTreeMap::new(),
        }
    }

    /// Decode a record and reject duplicate widget ids.
    pub fn from_json(json: &str) -> RecordResult<Self> {
        let record: Self = serde_json::from_str(json).map_err(RecordError::Decode)?;
        record.check_ids()?;
        Ok(record)
    }

    /// Encode as compact JSON.
    pub fn to_json(&self) -> RecordResult<String> {
        serde_json::to_string(self).map_err(RecordError::Encode)
    }

    /// Encode as indented JSON.
    pub fn to_json_pretty(&self) -> RecordResult<String> {
        serde_json::to_string_pretty(self).map_err(RecordError::Encode)
    }

    /// The widget list as an engine working set.
    pub fn widget_set(&self) -> WidgetSet {
        WidgetSet::new(self.widgets.clone())
    }

    fn check_ids(&self) -> RecordResult<()> {
        let mut seen = BTreeSet::new();
        for widget in &self.widgets {
            if !seen.insert(widget.id.as_str()) {
                return Err(RecordError::DuplicateWidgetId(widget.id.clone()));
            }
        }
        Ok(())
    }
}
