#![forbid(unsafe_code)]

//! Collision detection and vertical compaction.
//!
//! [`compact`] is a pure function over rectangles. Widgets are placed one at a
//! time in `(y, x)` order; each starts at row 0 and is pushed to the bottom of
//! the first already-placed rectangle it overlaps until it overlaps none.
//! Widgets never move horizontally.
//!
//! Ties on identical `(y, x)` keep input order (the sort is stable), so the
//! earlier widget in the host's collection wins the higher slot.

use dashgrid_core::{Timestamp, debug};

use crate::breakpoint::Breakpoint;
use crate::diagnostics::LayoutDiagnostic;
use crate::model::WidgetSet;
use crate::rect::GridRect;

/// Retry cap for placing one rectangle.
pub const MAX_COMPACTION_ITERATIONS: u32 = 1000;

/// A rectangle whose placement hit [`MAX_COMPACTION_ITERATIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stall {
    /// Index into the input slice.
    pub index: usize,
    pub iterations: u32,
    /// Row the rectangle was left at.
    pub y: i32,
}

/// Output of [`compact`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Compaction {
    /// Compacted rectangles, in input order.
    pub rects: Vec<GridRect>,
    pub stalls: Vec<Stall>,
}

/// Indices of `rects` in placement priority order: `(y, x)` ascending, ties by
/// input position.
#[must_use]
pub fn placement_order(rects: &[GridRect]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rects.len()).collect();
    order.sort_by_key(|&i| (rects[i].y, rects[i].x));
    order
}

/// Remove overlaps and pull every rectangle up as far as it goes.
#[must_use]
pub fn compact(rects: &[GridRect]) -> Compaction {
    let mut out = rects.to_vec();
    let mut placed: Vec<GridRect> = Vec::with_capacity(rects.len());
    let mut stalls = Vec::new();

    for index in placement_order(rects) {
        let mut candidate = rects[index];
        candidate.y = 0;
        let mut iterations = 0;
        let mut settled = false;
        while iterations < MAX_COMPACTION_ITERATIONS {
            iterations += 1;
            match placed.iter().find(|other| other.overlaps(&candidate)) {
                Some(blocker) => candidate.y = blocker.bottom(),
                None => {
                    settled = true;
                    break;
                }
            }
        }
        if !settled {
            stalls.push(Stall {
                index,
                iterations,
                y: candidate.y,
            });
        }
        out[index] = candidate;
        placed.push(candidate);
    }

    Compaction { rects: out, stalls }
}

/// All index pairs `(i, j)`, `i < j`, whose rectangles overlap.
#[must_use]
pub fn overlapping_pairs(rects: &[GridRect]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, a) in rects.iter().enumerate() {
        for (j, b) in rects.iter().enumerate().skip(i + 1) {
            if a.overlaps(b) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Result of compacting a widget set at one breakpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactedSet {
    pub widgets: WidgetSet,
    pub diagnostics: Vec<LayoutDiagnostic>,
}

/// Compact every visible, placeable widget at `bp`.
///
/// Rectangles are resolved and clamped to the `columns`-wide grid first. A
/// widget whose final rectangle differs from the stored one it was resolved
/// from gets the new rectangle written to `bp` and `updated_at = now`. All
/// other widgets keep their storage, including inherited fallback entries.
#[must_use]
pub fn compact_widgets(
    widgets: &WidgetSet,
    bp: Breakpoint,
    columns: u16,
    now: Timestamp,
) -> CompactedSet {
    let placements: Vec<_> = widgets.placements(bp, columns).collect();
    let rects: Vec<GridRect> = placements.iter().map(|(_, _, p)| p.rect).collect();
    let compaction = compact(&rects);

    let updates: Vec<(usize, GridRect)> = placements
        .iter()
        .zip(&compaction.rects)
        .filter(|((_, _, placement), rect)| **rect != placement.stored)
        .map(|((index, _, _), rect)| (*index, *rect))
        .collect();

    let diagnostics = compaction
        .stalls
        .iter()
        .map(|stall| LayoutDiagnostic::CompactionStalled {
            widget: placements[stall.index].1.id.clone(),
            iterations: stall.iterations,
            y: stall.y,
        })
        .collect();

    debug!(
        breakpoint = %bp,
        placed = rects.len(),
        moved = updates.len(),
        stalls = compaction.stalls.len(),
        "compaction finished"
    );

    CompactedSet {
        widgets: widgets.with_rects(&updates, bp, now),
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Widget, WidgetId};

    fn r(x: i32, y: i32, w: i32, h: i32) -> GridRect {
        GridRect::new(x, y, w, h)
    }

    #[test]
    fn gap_above_is_closed() {
        let out = compact(&[r(0, 0, 4, 2), r(4, 0, 4, 2), r(0, 5, 12, 2)]);
        assert_eq!(out.rects, vec![r(0, 0, 4, 2), r(4, 0, 4, 2), r(0, 2, 12, 2)]);
        assert!(out.stalls.is_empty());
    }

    #[test]
    fn overlapping_rects_are_pushed_down() {
        let out = compact(&[r(0, 0, 6, 3), r(2, 1, 6, 2)]);
        assert_eq!(out.rects[1], r(2, 3, 6, 2));
    }

    #[test]
    fn widgets_fall_through_gaps_between_columns() {
        // Narrow widget at x=10 can rise past the wide widget it does not touch.
        let out = compact(&[r(0, 0, 8, 4), r(10, 6, 2, 2)]);
        assert_eq!(out.rects[1], r(10, 0, 2, 2));
    }

    #[test]
    fn retest_after_push_finds_second_blocker() {
        // C is pushed below A, lands on B, and must be pushed again.
        let out = compact(&[r(0, 0, 4, 2), r(2, 2, 4, 3), r(0, 3, 6, 1)]);
        assert_eq!(out.rects[2], r(0, 5, 6, 1));
        assert!(overlapping_pairs(&out.rects).is_empty());
    }

    #[test]
    fn identical_origin_resolves_by_input_order() {
        // Same (x, y): the earlier entry keeps the top slot.
        let out = compact(&[r(4, 0, 4, 2), r(4, 0, 4, 2)]);
        assert_eq!(out.rects[0].y, 0);
        assert_eq!(out.rects[1].y, 2);
        let swapped = compact(&[r(4, 0, 4, 3), r(4, 0, 4, 2)]);
        assert_eq!(swapped.rects[0].y, 0);
        assert_eq!(swapped.rects[1].y, 3);
    }

    #[test]
    fn horizontal_position_is_never_changed() {
        let input = [r(3, 9, 2, 2), r(0, 4, 5, 1), r(7, 1, 5, 8)];
        let out = compact(&input);
        for (before, after) in input.iter().zip(&out.rects) {
            assert_eq!(before.x, after.x);
            assert_eq!(before.w, after.w);
            assert_eq!(before.h, after.h);
        }
    }

    #[test]
    fn zero_height_rect_terminates() {
        let out = compact(&[r(0, 0, 4, 2), r(0, 1, 4, 0), r(0, 0, 4, 0)]);
        assert!(out.stalls.is_empty());
        assert_eq!(out.rects.len(), 3);
    }

    #[test]
    fn retry_cap_surfaces_a_stall() {
        // Full-width rows stacked; row k needs k + 1 checks to settle, so the
        // last of 1001 rows runs out of retries.
        let count = MAX_COMPACTION_ITERATIONS as usize + 1;
        let input: Vec<GridRect> = (0..count).map(|i| r(0, i as i32, 12, 1)).collect();
        let out = compact(&input);
        assert_eq!(out.stalls.len(), 1);
        let stall = out.stalls[0];
        assert_eq!(stall.index, count - 1);
        assert_eq!(stall.iterations, MAX_COMPACTION_ITERATIONS);
        assert_eq!(stall.y, MAX_COMPACTION_ITERATIONS as i32);
        assert_eq!(out.rects[count - 1].y, stall.y);
    }

    #[test]
    fn empty_input() {
        assert_eq!(compact(&[]), Compaction::default());
    }

    #[test]
    fn compact_widgets_writes_only_moved_widgets() {
        let set = WidgetSet::new(vec![
            Widget::new("a", "A").with_position(Breakpoint::Lg, r(0, 0, 4, 2)),
            Widget::new("b", "B").with_position(Breakpoint::Lg, r(4, 0, 4, 2)),
            Widget::new("c", "C").with_position(Breakpoint::Lg, r(0, 5, 12, 2)),
        ]);
        let out = compact_widgets(&set, Breakpoint::Lg, 12, Timestamp(42));
        assert!(out.diagnostics.is_empty());
        let widgets = out.widgets.as_slice();
        assert_eq!(widgets[0].updated_at, None);
        assert_eq!(widgets[1].updated_at, None);
        assert_eq!(widgets[2].positions[&Breakpoint::Lg], r(0, 2, 12, 2));
        assert_eq!(widgets[2].updated_at, Some(Timestamp(42)));
    }

    #[test]
    fn compact_widgets_ignores_hidden_widgets() {
        let set = WidgetSet::new(vec![
            Widget::new("a", "A")
                .with_position(Breakpoint::Lg, r(0, 0, 12, 4))
                .hidden(),
            Widget::new("b", "B").with_position(Breakpoint::Lg, r(0, 6, 4, 2)),
        ]);
        let out = compact_widgets(&set, Breakpoint::Lg, 12, Timestamp(1));
        let b = out.widgets.get(&WidgetId::from("b")).expect("b");
        assert_eq!(b.positions[&Breakpoint::Lg].y, 0);
        let a = out.widgets.get(&WidgetId::from("a")).expect("a");
        assert_eq!(a.positions[&Breakpoint::Lg].y, 0);
    }

    #[test]
    fn compact_widgets_materializes_fallback_entries_only_when_moved() {
        let set = WidgetSet::new(vec![
            Widget::new("a", "A").with_position(Breakpoint::Lg, r(0, 0, 4, 2)),
            Widget::new("b", "B").with_position(Breakpoint::Lg, r(0, 4, 4, 2)),
        ]);
        let out = compact_widgets(&set, Breakpoint::Md, 10, Timestamp(5));
        let widgets = out.widgets.as_slice();
        assert!(!widgets[0].positions.contains_key(&Breakpoint::Md));
        assert_eq!(widgets[1].positions[&Breakpoint::Md], r(0, 2, 4, 2));
        assert_eq!(widgets[1].positions[&Breakpoint::Lg], r(0, 4, 4, 2));
    }
}
