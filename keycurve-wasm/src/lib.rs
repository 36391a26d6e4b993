use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use keycurve::{Editor, EditorConfig, LayerSet};
use wasm_bindgen::prelude::*;

mod api;
mod error;
mod host;
mod interop;
mod logger;

pub use api::{gen_keyframe_entries, gen_keyframe_entries_res};
use host::{Callbacks, JsSurface, Notice, NoticeQueue, RafScheduler};

pub(crate) type WebEditor = Editor<JsSurface, RafScheduler>;

pub(crate) struct Shared {
    pub(crate) editor: RefCell<WebEditor>,
    pub(crate) callbacks: RefCell<Callbacks>,
    pub(crate) last_scene: RefCell<JsValue>,
    notices: NoticeQueue,
}

impl Shared {
    fn new(width: f64, height: f64, layers: LayerSet, config: EditorConfig) -> Rc<Shared> {
        Rc::new_cyclic(|weak| {
            let notices: NoticeQueue = Rc::new(RefCell::new(VecDeque::new()));
            let surface = JsSurface::new(width, height, notices.clone());
            let mut editor = Editor::new(surface, RafScheduler::new(weak.clone()), layers, config);

            let q = notices.clone();
            editor.set_on_change(move || q.borrow_mut().push_back(Notice::Changed));
            let q = notices.clone();
            editor.set_on_adding_changed(move |on| q.borrow_mut().push_back(Notice::Adding(on)));
            let q = notices.clone();
            editor.set_on_dragging_changed(move |on| q.borrow_mut().push_back(Notice::Dragging(on)));

            Shared {
                editor: RefCell::new(editor),
                callbacks: RefCell::new(Callbacks::default()),
                last_scene: RefCell::new(JsValue::NULL),
                notices,
            }
        })
    }

    pub(crate) fn run_frame(&self) {
        match self.editor.try_borrow_mut() {
            Ok(mut ed) => ed.frame(),
            Err(_) => {
                log::warn!("animation frame arrived while the editor was busy");
                return;
            }
        }
        self.flush();
    }

    /// Deliver queued notices. Must run with the editor borrow released.
    pub(crate) fn flush(&self) {
        loop {
            let next = self.notices.borrow_mut().pop_front();
            let Some(notice) = next else { break };
            match notice {
                Notice::Draw(scene) => {
                    let js = interop::to_js(&scene);
                    *self.last_scene.borrow_mut() = js.clone();
                    let cb = self.callbacks.borrow().draw.clone();
                    call1(cb, &js);
                }
                Notice::Changed => {
                    let cb = self.callbacks.borrow().change.clone();
                    if let Some(f) = cb {
                        if let Err(e) = f.call0(&JsValue::NULL) {
                            log::error!("change callback threw: {:?}", e);
                        }
                    }
                }
                Notice::Adding(on) => {
                    let cb = self.callbacks.borrow().adding.clone();
                    call1(cb, &JsValue::from_bool(on));
                }
                Notice::Dragging(on) => {
                    let cb = self.callbacks.borrow().dragging.clone();
                    call1(cb, &JsValue::from_bool(on));
                }
            }
        }
    }

    fn clear(&self) {
        self.notices.borrow_mut().clear();
        *self.callbacks.borrow_mut() = Callbacks::default();
    }
}

fn call1(cb: Option<js_sys::Function>, arg: &JsValue) {
    if let Some(f) = cb {
        if let Err(e) = f.call1(&JsValue::NULL, arg) {
            log::error!("callback threw: {:?}", e);
        }
    }
}

#[wasm_bindgen]
pub struct CurveEditor {
    pub(crate) shared: Rc<Shared>,
}

impl CurveEditor {
    pub fn rs_new(width: f64, height: f64, layers: LayerSet, config: EditorConfig) -> CurveEditor {
        CurveEditor { shared: Shared::new(width, height, layers, config) }
    }

    /// Run `f` on a live editor, then deliver whatever it queued.
    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut WebEditor) -> R) -> Option<R> {
        let out = {
            let mut ed = self.shared.editor.try_borrow_mut().ok()?;
            if ed.is_destroyed() {
                log::warn!("ignoring call on destroyed editor");
                return None;
            }
            f(&mut ed)
        };
        self.shared.flush();
        Some(out)
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&WebEditor) -> R) -> Option<R> {
        let ed = self.shared.editor.try_borrow().ok()?;
        Some(f(&ed))
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.read(|ed| ed.is_destroyed()).unwrap_or(false)
    }

    pub(crate) fn teardown(&self) {
        if let Ok(mut ed) = self.shared.editor.try_borrow_mut() {
            ed.destroy();
        }
        self.shared.clear();
    }
}

#[cfg(feature = "console_error_panic_hook")]
#[wasm_bindgen]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Route `log` output to the browser console ("error".."trace", default "warn").
#[wasm_bindgen]
pub fn init_logging(level: Option<String>) {
    logger::init(logger::parse_level(level.as_deref().unwrap_or("warn")));
}
