//! Browser implementations of the editor's host seams.
//!
//! Everything the editor wants to tell JS is queued as a [`Notice`] while the
//! editor is borrowed and delivered by `Shared::flush` once the borrow is
//! released, so JS callbacks may call back into the editor.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use keycurve::{FrameScheduler, Scene, Surface};
use wasm_bindgen::prelude::*;

use crate::Shared;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;
}

pub(crate) enum Notice {
    Draw(Scene),
    Changed,
    Adding(bool),
    Dragging(bool),
}

pub(crate) type NoticeQueue = Rc<RefCell<VecDeque<Notice>>>;

/// One `requestAnimationFrame` per requested redraw; the editor coalesces.
pub(crate) struct RafScheduler {
    shared: Weak<Shared>,
}

impl RafScheduler {
    pub(crate) fn new(shared: Weak<Shared>) -> Self {
        RafScheduler { shared }
    }
}

impl FrameScheduler for RafScheduler {
    fn schedule_frame(&mut self) {
        let shared = self.shared.clone();
        let cb = Closure::once_into_js(move |_ts: f64| {
            if let Some(shared) = shared.upgrade() {
                shared.run_frame();
            }
        });
        request_animation_frame(&cb);
    }
}

pub(crate) struct JsSurface {
    pub(crate) width: f64,
    pub(crate) height: f64,
    queue: NoticeQueue,
}

impl JsSurface {
    pub(crate) fn new(width: f64, height: f64, queue: NoticeQueue) -> Self {
        JsSurface { width, height, queue }
    }
}

impl Surface for JsSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn present(&mut self, scene: &Scene) {
        self.queue.borrow_mut().push_back(Notice::Draw(scene.clone()));
    }
}

#[derive(Default)]
pub(crate) struct Callbacks {
    pub(crate) draw: Option<js_sys::Function>,
    pub(crate) change: Option<js_sys::Function>,
    pub(crate) adding: Option<js_sys::Function>,
    pub(crate) dragging: Option<js_sys::Function>,
}
