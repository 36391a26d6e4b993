use std::cell::{Cell, RefCell};
use std::rc::Rc;

use approx::assert_abs_diff_eq;
use keycurve::{
    Dot, DotKind, Editor, EditorConfig, EditorState, FrameScheduler, Key, KeyEvent, LayerSet,
    Modifiers, Point, PointerEvent, RecordingSurface, Units,
};

/// Counts frame requests; the test plays the host and calls `frame()`.
#[derive(Default)]
struct CountingScheduler {
    requests: Rc<Cell<usize>>,
}

impl FrameScheduler for CountingScheduler {
    fn schedule_frame(&mut self) {
        self.requests.set(self.requests.get() + 1);
    }
}

struct Harness {
    ed: Editor<RecordingSurface, CountingScheduler>,
    requests: Rc<Cell<usize>>,
    changes: Rc<Cell<usize>>,
}

// 420x220 surface with a 10 px border: 4 px per unit on X, 2 px per unit on Y.
fn surface(x: f64, y: f64) -> (f64, f64) {
    (10.0 + x * 4.0, 10.0 + (100.0 - y) * 2.0)
}

fn down(x: f64, y: f64) -> PointerEvent {
    let (sx, sy) = surface(x, y);
    PointerEvent::new(sx, sy, 1)
}

fn up(x: f64, y: f64) -> PointerEvent {
    let (sx, sy) = surface(x, y);
    PointerEvent::new(sx, sy, 0)
}

fn harness() -> Harness {
    let layers = LayerSet::new(
        "translateY",
        vec![
            Dot::new(0.0, 0.0, DotKind::Corner),
            Dot::new(25.0, 50.0, DotKind::Round)
                .with_handles(Point::new(15.0, 50.0), Point::new(35.0, 50.0)),
            Dot::new(100.0, 100.0, DotKind::Corner),
        ],
    );
    let requests = Rc::new(Cell::new(0));
    let scheduler = CountingScheduler { requests: requests.clone() };
    let mut ed = Editor::new(
        RecordingSurface::new(420.0, 220.0),
        scheduler,
        layers,
        EditorConfig::default(),
    );
    let changes = Rc::new(Cell::new(0));
    let c = changes.clone();
    ed.set_on_change(move || c.set(c.get() + 1));
    Harness { ed, requests, changes }
}

#[test]
fn a_drag_session_coalesces_into_one_frame() {
    let mut h = harness();
    h.ed.frame();
    assert_eq!(h.ed.surface().presented, 1);
    let before = h.requests.get();

    h.ed.on_pointer_down(down(25.0, 50.0));
    for i in 1..=10 {
        h.ed.on_pointer_move(down(25.0 + i as f64, 50.0 + i as f64));
    }
    h.ed.on_pointer_up(up(35.0, 60.0));

    assert_eq!(h.requests.get(), before + 1);
    assert!(h.changes.get() >= 10);
    h.ed.frame();
    assert_eq!(h.ed.surface().presented, 2);

    let d = h.ed.layers().active_dots()[1];
    assert_abs_diff_eq!(d.x, 35.0, epsilon = 1e-9);
    assert_abs_diff_eq!(d.y, 60.0, epsilon = 1e-9);
    assert_abs_diff_eq!(d.h2.x, 45.0, epsilon = 1e-9);
}

#[test]
fn add_then_edit_then_export() {
    let mut h = harness();
    h.ed.on_key_down(KeyEvent::new(Key::Char('a')).with_modifiers(Modifiers::shift()));
    assert_eq!(h.ed.state(), EditorState::Adding);
    // the preview never touches the model
    h.ed.on_pointer_move(up(60.0, 5.0));
    assert_eq!(h.ed.layers().active_dots().len(), 3);
    h.ed.on_pointer_down(down(60.0, 5.0));
    assert_eq!(h.ed.layers().active_dots().len(), 4);
    assert_eq!(h.ed.selected_index(), Some(2));

    h.ed.on_key_down(KeyEvent::new(Key::Char('c')));
    assert_eq!(h.ed.selected_dot().unwrap().kind, DotKind::Round);
    h.ed.on_key_down(KeyEvent::new(Key::Delete));
    assert_eq!(h.ed.layers().active_dots().len(), 3);
    assert_eq!(h.ed.selected_index(), Some(1));

    let id = h.ed.layers().active_id();
    h.ed.set_layer_sample_count(id, 5);
    let entries = h.ed.keyframe_entries();
    let offsets: Vec<f64> = entries.iter().map(|e| e.offset_percent).collect();
    assert_eq!(offsets, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    // translateY is paired; translateX was never sampled, so it takes its default.
    for e in &entries {
        assert_eq!(e.value_of("translateX"), Some(0.0));
    }
    assert_abs_diff_eq!(entries[1].value_of("translateY").unwrap(), 50.0, epsilon = 1e-6);
}

#[test]
fn layers_flow_through_the_editor() {
    let mut h = harness();
    let x = h.ed.add_layer("translateX").unwrap();
    assert_eq!(h.ed.add_layer("translateX"), None);
    assert!(h.ed.set_active_layer(x));
    assert!(h.ed.layers().active_dots().is_empty());
    assert!(h.ed.set_layer_units(x, Units::Percent));
    assert!(h.ed.set_layer_flipped(x, true));

    // an empty curve: clicks and keys are harmless
    h.ed.on_pointer_down(down(50.0, 50.0));
    assert_eq!(h.ed.selected_index(), None);
    assert!(!h.ed.on_key_down(KeyEvent::new(Key::ArrowUp)));
    h.ed.on_key_down(KeyEvent::new(Key::Tab));
    assert_eq!(h.ed.selected_index(), None);

    h.ed.begin_adding_dot(None);
    h.ed.on_pointer_down(down(0.0, 10.0));
    h.ed.begin_adding_dot(None);
    h.ed.on_pointer_down(down(100.0, 30.0));
    assert_eq!(h.ed.layers().active_dots().len(), 2);

    let entries = h.ed.keyframe_entries();
    let first = &entries[0];
    assert_abs_diff_eq!(first.value_of("translateX").unwrap(), -10.0, epsilon = 1e-9);

    let ids = h.ed.layers().ids();
    assert!(h.ed.delete_layer(ids[0]));
    assert!(!h.ed.delete_layer(x));
    assert_eq!(h.ed.layers().len(), 1);
}

#[test]
fn escape_during_drag_keeps_last_position() {
    let mut h = harness();
    let dragging = Rc::new(RefCell::new(Vec::new()));
    let d = dragging.clone();
    h.ed.set_on_dragging_changed(move |on| d.borrow_mut().push(on));
    h.ed.on_pointer_down(down(100.0, 100.0));
    h.ed.on_pointer_move(down(90.0, 80.0));
    h.ed.on_key_down(KeyEvent::new(Key::Escape));
    assert_eq!(h.ed.state(), EditorState::Idle);
    h.ed.on_pointer_move(down(50.0, 20.0));
    let last = h.ed.layers().active_dots()[2];
    assert_abs_diff_eq!(last.x, 90.0, epsilon = 1e-9);
    assert_eq!(*dragging.borrow(), vec![true, false]);
}

#[test]
fn scene_reflects_selection_and_zoom() {
    let mut h = harness();
    h.ed.on_pointer_down(down(0.0, 0.0));
    h.ed.on_pointer_up(up(0.0, 0.0));
    assert_eq!(h.ed.zoom_out(), (-25.0, 125.0));
    h.ed.frame();
    let scene = h.ed.surface().last.clone().expect("presented");
    assert_eq!(scene.range, (-25.0, 125.0));
    assert!(scene.dots[0].selected);
    assert_eq!(scene.handles.len(), 2);
    assert!(scene.curve.starts_with('M'));
}
