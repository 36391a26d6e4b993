use super::{Drag, DragTarget, Editor, Mode};
use crate::algorithms::picking::{pick_impl, Pick};
use crate::frame::{FrameScheduler, Surface};
use crate::input::PointerEvent;
use crate::model::{Dot, Point};

impl<S: Surface, F: FrameScheduler> Editor<S, F> {
    fn pick(&self, at: Point) -> Option<Pick> {
        pick_impl(
            self.layers.active_dots(),
            &self.viewport,
            at,
            self.config.hit_radius,
        )
    }

    pub fn on_pointer_down(&mut self, ev: PointerEvent) {
        if !self.alive() {
            return;
        }
        match self.mode {
            Mode::Adding { .. } => self.commit_add(ev.pos),
            Mode::Dragging(_) => {
                // a second press while a drag is armed restarts from here
                self.end_drag();
                self.press(ev);
            }
            Mode::Idle => self.press(ev),
        }
    }

    fn press(&mut self, ev: PointerEvent) {
        let Some(hit) = self.pick(ev.pos) else {
            self.select(None);
            return;
        };
        let index = hit.index();
        self.select(Some(index));
        if ev.modifiers.alt {
            if let Pick::Dot { .. } = hit {
                self.toggle_kind_at(index);
                return;
            }
        }
        let Some(dot) = self.layers.active_dots().get(index).copied() else {
            return;
        };
        let (target, anchor) = match hit {
            Pick::Dot { index, .. } => (DragTarget::Dot { index }, dot.pos()),
            Pick::Handle { index, side, .. } => (DragTarget::Handle { index, side }, dot.handle(side)),
        };
        let pointer = self.viewport.to_user(ev.pos);
        self.mode = Mode::Dragging(Drag {
            layer: self.layers.active_id(),
            target,
            press: ev.pos,
            grab: Point::new(anchor.x - pointer.x, anchor.y - pointer.y),
            live: false,
        });
        log::debug!("drag candidate {:?}", target);
    }

    pub fn on_pointer_move(&mut self, ev: PointerEvent) {
        if !self.alive() {
            return;
        }
        match self.mode {
            Mode::Adding { .. } => {
                let preview = self.preview_at(ev.pos);
                self.mode = Mode::Adding { preview: Some(preview) };
                self.request_redraw();
            }
            Mode::Dragging(mut drag) => {
                if !ev.any_button() {
                    self.end_drag();
                    return;
                }
                if !drag.live {
                    let t = self.config.drag_threshold;
                    if drag.press.dist_sq(ev.pos) <= t * t {
                        return;
                    }
                    drag.live = true;
                    self.mode = Mode::Dragging(drag);
                    self.notify_dragging(true);
                }
                self.drag_to(drag, ev.pos);
            }
            Mode::Idle => {}
        }
    }

    fn drag_to(&mut self, drag: Drag, pos: Point) {
        let user = self.viewport.to_user(pos);
        let (x, y) = (user.x + drag.grab.x, user.y + drag.grab.y);
        let snap = self.snap;
        let Some(layer) = self.layers.layer_mut(drag.layer) else {
            self.end_drag();
            return;
        };
        let changed = layer.edit_curve(|c| match drag.target {
            DragTarget::Dot { index } => c.move_dot(index, x, y, snap),
            DragTarget::Handle { index, side } => c.move_handle(index, side, x, y),
        });
        if changed {
            self.changed();
        }
    }

    pub fn on_pointer_up(&mut self, _ev: PointerEvent) {
        if !self.alive() {
            return;
        }
        self.end_drag();
    }

    /// Pointer left the surface. A drag survives only while a button is held;
    /// adding mode is cancelled.
    pub fn on_pointer_leave(&mut self, ev: PointerEvent) {
        if !self.alive() {
            return;
        }
        match self.mode {
            Mode::Dragging(_) if !ev.any_button() => self.end_drag(),
            Mode::Adding { .. } => self.end_adding(),
            _ => {}
        }
    }

    /// Double-click on a dot toggles Corner/Round.
    pub fn on_double_click(&mut self, ev: PointerEvent) {
        if !self.alive() {
            return;
        }
        self.end_drag();
        if let Some(Pick::Dot { index, .. }) = self.pick(ev.pos) {
            self.select(Some(index));
            self.toggle_kind_at(index);
        }
    }

    fn commit_add(&mut self, pos: Point) {
        let p = self.preview_at(pos);
        let dot = Dot::corner_with_span(p.x, p.y, self.config.new_handle_span);
        let inserted = self.layers.active_mut().edit_curve(|c| c.insert_sorted(dot));
        self.end_adding();
        match inserted {
            Some(index) => {
                self.selected = Some(index);
                self.changed();
            }
            None => log::debug!("add declined at x={}", p.x),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EditorConfig;
    use crate::editor::{Editor, EditorState};
    use crate::frame::{ManualFrames, RecordingSurface};
    use crate::input::{Modifiers, PointerEvent};
    use crate::layers::LayerSet;
    use crate::model::{Dot, DotKind, Point};
    use approx::assert_abs_diff_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    // 400x400 surface, no border: 4 px per unit, user (x, y) -> (4x, 400 - 4y)
    fn editor() -> Editor<RecordingSurface, ManualFrames> {
        let layers = LayerSet::new(
            "translateY",
            vec![
                Dot::new(0.0, 0.0, DotKind::Corner),
                Dot::new(50.0, 50.0, DotKind::Round)
                    .with_handles(Point::new(40.0, 50.0), Point::new(60.0, 50.0)),
                Dot::new(100.0, 100.0, DotKind::Corner),
            ],
        );
        let cfg = EditorConfig { border: 0.0, ..EditorConfig::default() };
        Editor::new(RecordingSurface::new(400.0, 400.0), ManualFrames::default(), layers, cfg)
    }

    fn at(x: f64, y: f64, buttons: u16) -> PointerEvent {
        PointerEvent::new(x * 4.0, 400.0 - y * 4.0, buttons)
    }

    #[test]
    fn small_moves_do_not_drag() {
        let mut ed = editor();
        let flags = Rc::new(RefCell::new(Vec::new()));
        let f = flags.clone();
        ed.set_on_dragging_changed(move |d| f.borrow_mut().push(d));
        ed.on_pointer_down(at(50.0, 50.0, 1));
        assert_eq!(ed.selected_index(), Some(1));
        assert_eq!(ed.state(), EditorState::Dragging);
        ed.on_pointer_move(PointerEvent::new(201.0, 201.0, 1));
        assert_eq!(ed.layers().active_dots()[1].pos(), Point::new(50.0, 50.0));
        ed.on_pointer_up(at(50.0, 50.0, 0));
        assert_eq!(ed.state(), EditorState::Idle);
        assert!(flags.borrow().is_empty());
    }

    #[test]
    fn drag_moves_dot_and_handles() {
        let mut ed = editor();
        let flags = Rc::new(RefCell::new(Vec::new()));
        let f = flags.clone();
        ed.set_on_dragging_changed(move |d| f.borrow_mut().push(d));
        ed.on_pointer_down(at(50.0, 50.0, 1));
        ed.on_pointer_move(at(60.0, 40.0, 1));
        let d = ed.layers().active_dots()[1];
        assert_abs_diff_eq!(d.x, 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(d.y, 40.0, epsilon = 1e-9);
        assert_abs_diff_eq!(d.h1.x, 50.0, epsilon = 1e-9);
        ed.on_pointer_up(at(60.0, 40.0, 0));
        assert_eq!(*flags.borrow(), vec![true, false]);
    }

    #[test]
    fn drag_cannot_cross_neighbour() {
        let mut ed = editor();
        ed.on_pointer_down(at(50.0, 50.0, 1));
        ed.on_pointer_move(at(120.0, 50.0, 1));
        assert!(ed.layers().active().curve().is_sorted());
        assert!(ed.layers().active_dots()[1].x < 100.0);
    }

    #[test]
    fn handle_drag_mirrors_round_dot() {
        let mut ed = editor();
        ed.on_pointer_down(at(40.0, 50.0, 1));
        ed.on_pointer_move(at(30.0, 60.0, 1));
        let d = ed.layers().active_dots()[1];
        assert_abs_diff_eq!(d.h1.x, 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(d.h2.x, 70.0, epsilon = 1e-9);
        assert_abs_diff_eq!(d.h2.y, 40.0, epsilon = 1e-9);
    }

    #[test]
    fn move_without_buttons_ends_drag() {
        let mut ed = editor();
        ed.on_pointer_down(at(50.0, 50.0, 1));
        ed.on_pointer_move(at(60.0, 60.0, 1));
        ed.on_pointer_move(at(70.0, 60.0, 0));
        assert_eq!(ed.state(), EditorState::Idle);
        assert_abs_diff_eq!(ed.layers().active_dots()[1].x, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn miss_clears_selection() {
        let mut ed = editor();
        ed.on_pointer_down(at(50.0, 50.0, 1));
        ed.on_pointer_up(at(50.0, 50.0, 0));
        ed.on_pointer_down(at(20.0, 80.0, 1));
        assert_eq!(ed.selected_index(), None);
        assert_eq!(ed.state(), EditorState::Idle);
    }

    #[test]
    fn alt_click_and_double_click_toggle_kind() {
        let mut ed = editor();
        ed.on_pointer_down(at(0.0, 0.0, 1).with_modifiers(Modifiers::alt()));
        assert_eq!(ed.layers().active_dots()[0].kind, DotKind::Round);
        assert_eq!(ed.state(), EditorState::Idle);
        ed.on_double_click(at(0.0, 0.0, 0));
        assert_eq!(ed.layers().active_dots()[0].kind, DotKind::Corner);
    }

    #[test]
    fn adding_previews_then_inserts_corner() {
        let mut ed = editor();
        let flags = Rc::new(RefCell::new(Vec::new()));
        let f = flags.clone();
        ed.set_on_adding_changed(move |a| f.borrow_mut().push(a));
        ed.begin_adding_dot(None);
        ed.on_pointer_move(at(75.0, 10.0, 0));
        let preview = ed.build_scene().preview.expect("preview");
        // the curve covers x = 75, so the preview sits on it rather than at y = 10
        assert!(preview.y < 400.0 - 4.0 * 50.0);
        assert_eq!(ed.layers().active_dots().len(), 3);

        ed.on_pointer_down(at(75.0, 10.0, 1));
        assert_eq!(ed.layers().active_dots().len(), 4);
        let d = ed.selected_dot().unwrap();
        assert_eq!(d.kind, DotKind::Corner);
        assert_abs_diff_eq!(d.x, 75.0, epsilon = 1e-9);
        assert_eq!(ed.selected_index(), Some(2));
        assert_eq!(ed.state(), EditorState::Idle);
        assert_eq!(*flags.borrow(), vec![true, false]);
    }

    #[test]
    fn drag_survives_leaving_with_button_held() {
        let mut ed = editor();
        let flags = Rc::new(RefCell::new(Vec::new()));
        let f = flags.clone();
        ed.set_on_dragging_changed(move |d| f.borrow_mut().push(d));
        ed.on_pointer_down(at(50.0, 50.0, 1));
        ed.on_pointer_move(at(60.0, 50.0, 1));
        ed.on_pointer_leave(at(60.0, 50.0, 1));
        assert_eq!(ed.state(), EditorState::Dragging);
        assert_eq!(*flags.borrow(), vec![true]);

        ed.on_pointer_move(at(70.0, 55.0, 1));
        let d = ed.layers().active_dots()[1];
        assert_abs_diff_eq!(d.x, 70.0, epsilon = 1e-9);
        assert_abs_diff_eq!(d.y, 55.0, epsilon = 1e-9);

        ed.on_pointer_leave(at(70.0, 55.0, 0));
        assert_eq!(ed.state(), EditorState::Idle);
        assert_eq!(*flags.borrow(), vec![true, false]);
        assert_abs_diff_eq!(ed.layers().active_dots()[1].x, 70.0, epsilon = 1e-9);
    }

    #[test]
    fn leaving_surface_cancels_adding() {
        let mut ed = editor();
        ed.begin_adding_dot(Some(Point::new(100.0, 100.0)));
        ed.on_pointer_leave(at(0.0, 0.0, 0));
        assert_eq!(ed.state(), EditorState::Idle);
        assert_eq!(ed.layers().active_dots().len(), 3);
    }
}
