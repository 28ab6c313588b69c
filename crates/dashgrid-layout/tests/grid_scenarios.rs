//! End-to-end grid scenarios driven through `GridEngine`.

use dashgrid_core::ManualClock;
use dashgrid_layout::{
    Breakpoint, DashboardLayout, DashboardRecord, GridEngine, GridHost, GridInput, GridRect,
    HitTarget, LayoutDiagnostic, PixelPoint, PointerId, Timestamp, Widget, WidgetId, WidgetSet,
    compact, compact_widgets, overlapping_pairs,
};

#[derive(Default)]
struct RecordingHost {
    changes: Vec<(WidgetSet, Breakpoint)>,
    diagnostics: Vec<LayoutDiagnostic>,
}

impl GridHost for RecordingHost {
    type Content = ();

    fn render_widget(&mut self, _widget: &Widget) {}

    fn on_layout_change(&mut self, widgets: &WidgetSet, breakpoint: Breakpoint) {
        self.changes.push((widgets.clone(), breakpoint));
    }

    fn on_diagnostic(&mut self, diagnostic: &LayoutDiagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }
}

/// 12 columns at lg with a 100 x 60 pixel pitch and 10 px padding.
fn layout() -> DashboardLayout {
    DashboardLayout {
        gap: 10.0,
        padding: 10.0,
        row_height: 50.0,
        ..DashboardLayout::default()
    }
}

fn engine(widgets: Vec<Widget>) -> GridEngine<RecordingHost> {
    let mut engine = GridEngine::new(RecordingHost::default(), layout(), 1210.0)
        .with_clock(ManualClock::new(100, 1));
    engine.set_widgets(widgets, layout(), true);
    engine
}

fn widget(id: &str, rect: GridRect) -> Widget {
    Widget::new(id, id.to_uppercase()).with_position(Breakpoint::Lg, rect)
}

fn lg(set: &WidgetSet, id: &str) -> GridRect {
    set.get(&WidgetId::from(id))
        .and_then(|w| w.positions.get(&Breakpoint::Lg).copied())
        .expect("lg rect")
}

fn at(x: f64, y: f64) -> PixelPoint {
    PixelPoint::new(x, y)
}

#[test]
fn compaction_closes_gap_above_full_width_widget() {
    let set: WidgetSet = vec![
        widget("a", GridRect::new(0, 0, 4, 2)),
        widget("b", GridRect::new(4, 0, 4, 2)),
        widget("c", GridRect::new(0, 5, 12, 2)),
    ]
    .into();
    let out = compact_widgets(&set, Breakpoint::Lg, 12, Timestamp(7));

    assert!(out.diagnostics.is_empty());
    assert_eq!(lg(&out.widgets, "a"), GridRect::new(0, 0, 4, 2));
    assert_eq!(lg(&out.widgets, "b"), GridRect::new(4, 0, 4, 2));
    assert_eq!(lg(&out.widgets, "c"), GridRect::new(0, 2, 12, 2));

    let stamped: Vec<&str> = out
        .widgets
        .iter()
        .filter(|w| w.updated_at == Some(Timestamp(7)))
        .map(|w| w.id.as_str())
        .collect();
    assert_eq!(stamped, vec!["c"]);
}

#[test]
fn dropping_onto_a_neighbour_pushes_it_below() {
    let mut engine = engine(vec![
        widget("a", GridRect::new(0, 0, 4, 2)),
        widget("b", GridRect::new(4, 0, 4, 2)),
    ]);

    // Grab A 10 px inside its corner and carry it four columns right.
    engine.handle(GridInput::PointerDown {
        pointer_id: PointerId::PRIMARY,
        position: at(20.0, 20.0),
        target: HitTarget::Body("a".into()),
    });
    for x in [120.0, 250.0, 380.0, 415.0] {
        engine.handle(GridInput::PointerMove {
            pointer_id: PointerId::PRIMARY,
            position: at(x, 24.0),
        });
    }
    engine.handle(GridInput::PointerUp {
        pointer_id: PointerId::PRIMARY,
        position: at(415.0, 24.0),
    });

    let host = engine.host();
    assert_eq!(host.changes.len(), 1);
    let (set, bp) = &host.changes[0];
    assert_eq!(*bp, Breakpoint::Lg);
    assert_eq!(lg(set, "a"), GridRect::new(4, 0, 4, 2));
    assert_eq!(lg(set, "b"), GridRect::new(4, 2, 4, 2));

    let rects: Vec<GridRect> = set.iter().map(|w| lg(set, w.id.as_str())).collect();
    assert!(overlapping_pairs(&rects).is_empty());
    assert!(host.diagnostics.is_empty());
}

#[test]
fn shrinking_past_min_width_stops_at_the_bound() {
    let mut engine = engine(vec![widget(
        "a",
        GridRect::new(0, 0, 4, 2).with_min(2, 1),
    )]);

    // East edge of a 4-wide widget sits at x = 10 + 4*100 - 10.
    engine.handle(GridInput::PointerDown {
        pointer_id: PointerId::PRIMARY,
        position: at(400.0, 60.0),
        target: HitTarget::Handle {
            widget: "a".into(),
            handle: "e".into(),
        },
    });
    engine.handle(GridInput::PointerMove {
        pointer_id: PointerId::PRIMARY,
        position: at(-200.0, 60.0),
    });
    engine.handle(GridInput::PointerUp {
        pointer_id: PointerId::PRIMARY,
        position: at(-200.0, 60.0),
    });

    let final_rect = lg(engine.widgets(), "a");
    assert_eq!(final_rect.w, 2);
    assert_eq!(final_rect.min_w, Some(2));
    for (set, _) in &engine.host().changes {
        assert!(lg(set, "a").w >= 2);
    }
}

/// Identical `(x, y)` origins have no documented winner; ties resolve by
/// insertion order, so whichever widget the host listed first keeps the spot.
#[test]
fn identical_origins_resolve_by_insertion_order() {
    let first = GridRect::new(2, 1, 3, 2);
    let second = GridRect::new(2, 1, 3, 1);

    let out = compact(&[first, second]);
    assert_eq!(out.rects[0].y, 0);
    assert_eq!(out.rects[1].y, 2);

    let out = compact(&[second, first]);
    assert_eq!(out.rects[0].y, 0);
    assert_eq!(out.rects[1].y, 1);
}

#[test]
fn persisted_record_drives_the_engine() {
    let json = r#"{
        "widgets": [
            { "id": "cpu", "position": { "lg": { "x": 0, "y": 3, "w": 6, "h": 2 } }, "chart": "line" },
            { "id": "mem", "position": { "lg": { "x": 6, "y": 0, "w": 6, "h": 2 } } }
        ],
        "layout": { "gap": 10, "padding": 10, "rowHeight": 50 },
        "owner": "ops"
    }"#;
    let record = DashboardRecord::from_json(json).expect("record");
    let mut engine = GridEngine::new(RecordingHost::default(), record.layout.clone(), 1210.0)
        .with_clock(ManualClock::default());
    engine.set_widgets(record.widget_set(), record.layout.clone(), true);

    // Click-and-release on mem commits nothing.
    engine.handle(GridInput::PointerDown {
        pointer_id: PointerId::PRIMARY,
        position: at(620.0, 20.0),
        target: HitTarget::Body("mem".into()),
    });
    engine.handle(GridInput::PointerUp {
        pointer_id: PointerId::PRIMARY,
        position: at(620.0, 20.0),
    });
    assert!(engine.host().changes.is_empty());

    // Nudge cpu one row down; the commit compacts it back to the top.
    engine.handle(GridInput::PointerDown {
        pointer_id: PointerId::PRIMARY,
        position: at(20.0, 200.0),
        target: HitTarget::Body("cpu".into()),
    });
    engine.handle(GridInput::PointerMove {
        pointer_id: PointerId::PRIMARY,
        position: at(20.0, 260.0),
    });
    engine.handle(GridInput::PointerUp {
        pointer_id: PointerId::PRIMARY,
        position: at(20.0, 260.0),
    });
    assert_eq!(lg(engine.widgets(), "cpu"), GridRect::new(0, 0, 6, 2));

    let saved = DashboardRecord {
        widgets: engine.widgets().as_slice().to_vec(),
        ..record
    };
    let json = saved.to_json().expect("encode");
    let reloaded = DashboardRecord::from_json(&json).expect("decode");
    assert_eq!(reloaded.extensions["owner"], "ops");
    assert_eq!(reloaded.widgets[0].extensions["chart"], "line");
    assert_eq!(lg(&reloaded.widget_set(), "cpu").y, 0);
}
