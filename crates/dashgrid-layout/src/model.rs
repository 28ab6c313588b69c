#![forbid(unsafe_code)]

//! Position model: widgets, their per-breakpoint rectangles, and the grid
//! configuration.
//!
//! [`WidgetSet`] is an immutable value. Every mutation builds a new set and
//! the engine swaps it in wholesale, so a reader holding an older set never
//! observes a half-applied change.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use dashgrid_core::Timestamp;
use serde::{Deserialize, Serialize};

use crate::breakpoint::{Breakpoint, BreakpointValues};
use crate::rect::GridRect;

/// Stable widget identifier assigned by the host.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

fn default_visible() -> bool {
    true
}

/// A positioned dashboard widget.
///
/// The engine only ever writes `positions` and `updated_at`; everything else
/// belongs to the host and is carried through untouched, including unknown
/// fields, which land in `extensions`. Re-encoding is lossless in content but
/// not byte-exact: `visible` and `position` are always written, with their
/// defaults (`true`, `{}`) when the input left them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: WidgetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "position", default)]
    pub positions: BTreeMap<Breakpoint, GridRect>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

/// A widget rectangle resolved for one breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Breakpoint whose entry supplied the rectangle.
    pub source: Breakpoint,
    /// Rectangle as stored.
    pub stored: GridRect,
    /// Rectangle clamped to the target breakpoint's grid.
    pub rect: GridRect,
}

impl Placement {
    /// Whether sanitization moved or resized the stored rectangle.
    #[must_use]
    pub fn was_clamped(&self) -> bool {
        !self.stored.same_box(&self.rect)
    }
}

impl Widget {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: WidgetId::new(id),
            title: Some(title.into()),
            positions: BTreeMap::new(),
            visible: true,
            updated_at: None,
            extensions: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_position(mut self, bp: Breakpoint, rect: GridRect) -> Self {
        self.positions.insert(bp, rect);
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Stored rectangle for `bp`, walking [`Breakpoint::fallback_chain`].
    #[must_use]
    pub fn rect_for(&self, bp: Breakpoint) -> Option<(Breakpoint, GridRect)> {
        bp.fallback_chain()
            .into_iter()
            .find_map(|candidate| self.positions.get(&candidate).map(|r| (candidate, *r)))
    }

    /// Resolve and sanitize the rectangle for `bp` on a `columns`-wide grid.
    ///
    /// `None` means the widget has no rectangle at any breakpoint and cannot
    /// be placed.
    #[must_use]
    pub fn resolve(&self, bp: Breakpoint, columns: u16) -> Option<Placement> {
        self.rect_for(bp).map(|(source, stored)| Placement {
            source,
            stored,
            rect: stored.sanitize(columns),
        })
    }
}

/// Copy-on-write collection of widgets in host insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Widget>", into = "Vec<Widget>")]
pub struct WidgetSet {
    widgets: Arc<[Widget]>,
}

impl From<Vec<Widget>> for WidgetSet {
    fn from(widgets: Vec<Widget>) -> Self {
        Self {
            widgets: widgets.into(),
        }
    }
}

impl From<WidgetSet> for Vec<Widget> {
    fn from(set: WidgetSet) -> Self {
        set.widgets.to_vec()
    }
}

impl FromIterator<Widget> for WidgetSet {
    fn from_iter<I: IntoIterator<Item = Widget>>(iter: I) -> Self {
        Self {
            widgets: iter.into_iter().collect(),
        }
    }
}

impl WidgetSet {
    #[must_use]
    pub fn new(widgets: Vec<Widget>) -> Self {
        Self::from(widgets)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Widget> {
        self.widgets.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Widget] {
        &self.widgets
    }

    #[must_use]
    pub fn get(&self, id: &WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| &w.id == id)
    }

    #[must_use]
    pub fn index_of(&self, id: &WidgetId) -> Option<usize> {
        self.widgets.iter().position(|w| &w.id == id)
    }

    /// Whether both sets share the same backing storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &WidgetSet) -> bool {
        Arc::ptr_eq(&self.widgets, &other.widgets)
    }

    /// New set with `rect` written to `bp` for widget `id`.
    ///
    /// Returns `self` unchanged (same storage) when the widget is unknown or
    /// already stores an identical rectangle at `bp`.
    #[must_use]
    pub fn with_rect(&self, id: &WidgetId, bp: Breakpoint, rect: GridRect, now: Timestamp) -> Self {
        match self.index_of(id) {
            Some(index) => self.with_rects(&[(index, rect)], bp, now),
            None => self.clone(),
        }
    }

    /// New set with each `(index, rect)` written to `bp`.
    ///
    /// Only widgets whose stored rectangle actually changes get a new
    /// `updated_at`. Out-of-range indices are ignored.
    #[must_use]
    pub fn with_rects(&self, updates: &[(usize, GridRect)], bp: Breakpoint, now: Timestamp) -> Self {
        let changes = |index: usize, widget: &Widget| {
            updates
                .iter()
                .rev()
                .find(|(i, _)| *i == index)
                .map(|(_, rect)| *rect)
                .filter(|rect| widget.positions.get(&bp) != Some(rect))
        };
        let dirty = self
            .widgets
            .iter()
            .enumerate()
            .any(|(index, widget)| changes(index, widget).is_some());
        if !dirty {
            return self.clone();
        }
        self.widgets
            .iter()
            .enumerate()
            .map(|(index, widget)| match changes(index, widget) {
                Some(rect) => {
                    let mut next = widget.clone();
                    next.positions.insert(bp, rect);
                    next.updated_at = Some(now);
                    next
                }
                None => widget.clone(),
            })
            .collect()
    }

    /// Visible widgets with their resolved placement at `bp`, in insertion
    /// order. Unplaceable widgets are skipped.
    pub fn placements(
        &self,
        bp: Breakpoint,
        columns: u16,
    ) -> impl Iterator<Item = (usize, &Widget, Placement)> + '_ {
        self.widgets
            .iter()
            .enumerate()
            .filter(|(_, widget)| widget.visible)
            .filter_map(move |(index, widget)| {
                widget
                    .resolve(bp, columns)
                    .map(|placement| (index, widget, placement))
            })
    }

    /// Top-most, then left-most origin where a `w`×`h` box fits at `bp`
    /// without overlapping any visible widget.
    ///
    /// The size is clamped to the grid first, so a slot always exists.
    #[must_use]
    pub fn first_free_slot(&self, w: i32, h: i32, bp: Breakpoint, columns: u16) -> GridRect {
        let shape = GridRect::new(0, 0, w, h).sanitize(columns);
        let occupied: Vec<GridRect> = self
            .placements(bp, columns)
            .map(|(_, _, placement)| placement.rect)
            .collect();
        let floor = occupied.iter().map(GridRect::bottom).max().unwrap_or(0);
        let last_x = i32::from(columns.max(1)) - shape.w;
        for y in 0..=floor {
            for x in 0..=last_x {
                let candidate = shape.at(x, y);
                if !occupied.iter().any(|rect| rect.overlaps(&candidate)) {
                    return candidate;
                }
            }
        }
        shape.at(0, floor)
    }
}

impl<'a> IntoIterator for &'a WidgetSet {
    type Item = &'a Widget;
    type IntoIter = std::slice::Iter<'a, Widget>;

    fn into_iter(self) -> Self::IntoIter {
        self.widgets.iter()
    }
}

/// Post-mutation packing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompactType {
    /// Pull every widget up as far as it goes.
    #[default]
    Vertical,
    /// Leave widgets where they are dropped.
    #[serde(rename = "none")]
    Disabled,
}

impl CompactType {
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Vertical)
    }
}

/// Grid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardLayout {
    /// Base column count, used for any breakpoint configured with 0 columns.
    pub columns: u16,
    /// Row height in pixels.
    pub row_height: f64,
    /// Space between cells in pixels, both axes.
    pub gap: f64,
    /// Space between the container edge and the outermost cells in pixels.
    pub padding: f64,
    /// Minimum container width in pixels for each breakpoint.
    pub breakpoints: BreakpointValues<u32>,
    pub columns_per_breakpoint: BreakpointValues<u16>,
    pub compact_type: CompactType,
    /// Host configuration keys the grid does not interpret.
    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl Default for DashboardLayout {
    fn default() -> Self {
        Self {
            columns: 12,
            row_height: 80.0,
            gap: 16.0,
            padding: 16.0,
            breakpoints: BreakpointValues::DEFAULT_THRESHOLDS,
            columns_per_breakpoint: BreakpointValues::DEFAULT_COLUMNS,
            compact_type: CompactType::Vertical,
            extensions: BTreeMap::new(),
        }
    }
}

impl DashboardLayout {
    /// Active breakpoint for a container `width` pixels wide.
    #[must_use]
    pub fn breakpoint_for_width(&self, width: f64) -> Breakpoint {
        self.breakpoints.classify_width(width)
    }

    /// Column count at `bp`; never zero.
    #[must_use]
    pub fn columns_for(&self, bp: Breakpoint) -> u16 {
        match self.columns_per_breakpoint.get(bp) {
            0 => self.columns.max(1),
            n => n,
        }
    }
}
