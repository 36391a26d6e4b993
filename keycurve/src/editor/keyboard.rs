use super::{Editor, Mode};
use crate::frame::{FrameScheduler, Surface};
use crate::input::{Key, KeyEvent};

impl<S: Surface, F: FrameScheduler> Editor<S, F> {
    /// Handle a key press. Returns `true` when the key was consumed, so the
    /// host can suppress its default action.
    pub fn on_key_down(&mut self, ev: KeyEvent) -> bool {
        if !self.alive() {
            return false;
        }
        let shift = ev.modifiers.shift;
        // Ctrl/Cmd chords belong to the host (copy, select all, ...)
        let chord = ev.modifiers.ctrl || ev.modifiers.meta;
        match ev.key {
            Key::Escape => {
                self.cancel();
                true
            }
            Key::Char('a') if shift && !chord => {
                self.begin_adding_dot(None);
                true
            }
            _ if self.mode != Mode::Idle => false,
            Key::Tab => {
                self.select_step(if shift { -1 } else { 1 });
                true
            }
            Key::Delete | Key::Backspace => self.delete_selected_dot(),
            Key::Char('c') if !chord => self.toggle_selected_kind(),
            Key::ArrowLeft | Key::ArrowRight | Key::ArrowUp | Key::ArrowDown => {
                let step = if shift { self.config.large_nudge_step } else { self.config.nudge_step };
                let (dx, dy) = match ev.key {
                    Key::ArrowLeft => (-step, 0.0),
                    Key::ArrowRight => (step, 0.0),
                    Key::ArrowUp => (0.0, step),
                    _ => (0.0, -step),
                };
                self.nudge_selected(dx, dy)
            }
            _ => false,
        }
    }

    fn nudge_selected(&mut self, dx: f64, dy: f64) -> bool {
        let Some(index) = self.selected else {
            return false;
        };
        let snap = self.snap;
        let changed = self.layers.active_mut().edit_curve(|c| c.nudge(index, dx, dy, snap));
        if changed {
            self.changed();
        }
        changed
    }

    /// Move the selection by `dir` dots, wrapping at either end. With no
    /// selection, forward picks the first dot and backward the last.
    fn select_step(&mut self, dir: isize) {
        let len = self.layers.active_dots().len();
        if len == 0 {
            return;
        }
        let next = match self.selected {
            Some(i) => (i as isize + dir).rem_euclid(len as isize) as usize,
            None if dir < 0 => len - 1,
            None => 0,
        };
        self.select(Some(next));
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EditorConfig;
    use crate::editor::{Editor, EditorState};
    use crate::frame::{ManualFrames, RecordingSurface};
    use crate::input::{Key, KeyEvent, Modifiers};
    use crate::layers::LayerSet;
    use crate::model::{Dot, DotKind, Point};

    fn editor() -> Editor<RecordingSurface, ManualFrames> {
        let layers = LayerSet::new(
            "opacity",
            vec![
                Dot::new(0.0, 0.0, DotKind::Corner),
                Dot::new(50.0, 50.0, DotKind::Corner),
                Dot::new(51.0, 60.0, DotKind::Corner),
            ],
        );
        Editor::new(
            RecordingSurface::new(400.0, 400.0),
            ManualFrames::default(),
            layers,
            EditorConfig::default(),
        )
    }

    fn key(k: Key) -> KeyEvent {
        KeyEvent::new(k)
    }

    #[test]
    fn tab_cycles_selection() {
        let mut ed = editor();
        assert!(ed.on_key_down(key(Key::Tab)));
        assert_eq!(ed.selected_index(), Some(0));
        ed.on_key_down(key(Key::Tab).with_modifiers(Modifiers::shift()));
        assert_eq!(ed.selected_index(), Some(2));
        ed.on_key_down(key(Key::Tab));
        assert_eq!(ed.selected_index(), Some(0));
    }

    #[test]
    fn arrows_nudge_and_clamp() {
        let mut ed = editor();
        ed.select(Some(1));
        assert!(ed.on_key_down(key(Key::ArrowUp)));
        assert_eq!(ed.selected_dot().unwrap().pos(), Point::new(50.0, 51.0));
        ed.on_key_down(key(Key::ArrowDown).with_modifiers(Modifiers::shift()));
        assert_eq!(ed.selected_dot().unwrap().y, 41.0);
        ed.on_key_down(key(Key::ArrowRight).with_modifiers(Modifiers::shift()));
        let x = ed.selected_dot().unwrap().x;
        assert!(x < 51.0 && x > 50.0);
        assert!(ed.layers().active().curve().is_sorted());
    }

    #[test]
    fn keys_need_a_selection() {
        let mut ed = editor();
        assert!(!ed.on_key_down(key(Key::ArrowUp)));
        assert!(!ed.on_key_down(key(Key::Char('c'))));
        assert!(!ed.on_key_down(key(Key::Delete)));
        assert_eq!(ed.layers().active_dots().len(), 3);
    }

    #[test]
    fn c_toggles_and_delete_removes() {
        let mut ed = editor();
        ed.select(Some(2));
        assert!(ed.on_key_down(key(Key::Char('c'))));
        assert_eq!(ed.selected_dot().unwrap().kind, DotKind::Round);
        assert!(ed.on_key_down(key(Key::Backspace)));
        assert_eq!(ed.layers().active_dots().len(), 2);
        assert_eq!(ed.selected_index(), Some(1));
    }

    #[test]
    fn ctrl_and_meta_chords_are_left_to_the_host() {
        let mut ed = editor();
        ed.select(Some(2));
        let ctrl = Modifiers { ctrl: true, ..Modifiers::NONE };
        let meta = Modifiers { meta: true, ..Modifiers::NONE };
        assert!(!ed.on_key_down(key(Key::Char('c')).with_modifiers(ctrl)));
        assert!(!ed.on_key_down(key(Key::Char('c')).with_modifiers(meta)));
        assert_eq!(ed.selected_dot().unwrap().kind, DotKind::Corner);

        let ctrl_shift = Modifiers { shift: true, ..ctrl };
        assert!(!ed.on_key_down(key(Key::Char('a')).with_modifiers(ctrl_shift)));
        assert_eq!(ed.state(), EditorState::Idle);
    }

    #[test]
    fn shift_a_enters_adding_and_escape_leaves() {
        let mut ed = editor();
        ed.on_key_down(key(Key::Char('a')).with_modifiers(Modifiers::shift()));
        assert_eq!(ed.state(), EditorState::Adding);
        assert!(!ed.on_key_down(key(Key::Tab)));
        ed.on_key_down(key(Key::Escape));
        assert_eq!(ed.state(), EditorState::Idle);
        assert_eq!(ed.layers().active_dots().len(), 3);
    }
}
