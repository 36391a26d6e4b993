//! Interactive curve editor.
//!
//! The editor owns the layer set, the viewport and the interaction state
//! machine (`Idle`, `Dragging`, `Adding`). Hosts feed it input events and a
//! frame callback; it hands finished scenes to a [`Surface`].
//!
//! Redraws are coalesced: every mutation calls `request_redraw()`, which asks
//! the [`FrameScheduler`] for a frame only when none is pending. The host then
//! calls [`Editor::frame`], which draws once.

mod keyboard;
mod pointer;

use crate::config::EditorConfig;
use crate::frame::{FrameScheduler, Surface};
use crate::geometry::tolerance::{DOMAIN_MAX, DOMAIN_MIN};
use crate::geometry::viewport::Viewport;
use crate::layers::{LayerId, LayerSet};
use crate::merge::{gen_keyframe_entries, KeyframeEntry, MergeConfig};
use crate::model::{Dot, DotPatch, HandleSide, Point, Units};
use crate::properties::PropertyRegistry;
use crate::sampling::sample_y;
use crate::scene::{build_scene, Scene};

/// What a drag moves, addressed by index into the layer's dot list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragTarget {
    Dot { index: usize },
    Handle { index: usize, side: HandleSide },
}

impl DragTarget {
    pub fn index(&self) -> usize {
        match *self {
            DragTarget::Dot { index } | DragTarget::Handle { index, .. } => index,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Drag {
    layer: LayerId,
    target: DragTarget,
    // surface position of the press
    press: Point,
    // user-space offset from pointer to the target at press time
    grab: Point,
    // past the drag threshold
    live: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Mode {
    Idle,
    Dragging(Drag),
    Adding { preview: Option<Point> },
}

/// Externally visible interaction state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Dragging,
    Adding,
}

type ChangeFn = Box<dyn FnMut()>;
type FlagFn = Box<dyn FnMut(bool)>;

pub struct Editor<S: Surface, F: FrameScheduler> {
    surface: S,
    scheduler: F,
    layers: LayerSet,
    viewport: Viewport,
    config: EditorConfig,
    registry: PropertyRegistry,
    merge: MergeConfig,
    mode: Mode,
    selected: Option<usize>,
    snap: bool,
    frame_pending: bool,
    destroyed: bool,
    on_change: Option<ChangeFn>,
    on_adding_changed: Option<FlagFn>,
    on_dragging_changed: Option<FlagFn>,
}

impl<S: Surface, F: FrameScheduler> Editor<S, F> {
    pub fn new(surface: S, scheduler: F, mut layers: LayerSet, config: EditorConfig) -> Self {
        layers.set_sample_tolerance(config.sample_tolerance);
        let (w, h) = surface.size();
        let mut viewport = Viewport::new(w, h, config.border);
        viewport.set_zoom(config.initial_zoom);
        let mut ed = Editor {
            surface,
            scheduler,
            layers,
            viewport,
            snap: config.snap_to_grid,
            config,
            registry: PropertyRegistry::css(),
            merge: MergeConfig::default(),
            mode: Mode::Idle,
            selected: None,
            frame_pending: false,
            destroyed: false,
            on_change: None,
            on_adding_changed: None,
            on_dragging_changed: None,
        };
        ed.request_redraw();
        ed
    }

    pub fn with_registry(mut self, registry: PropertyRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_merge_config(mut self, merge: MergeConfig) -> Self {
        self.merge = merge;
        self
    }

    fn alive(&self) -> bool {
        debug_assert!(!self.destroyed, "editor used after destroy()");
        if self.destroyed {
            log::warn!("ignoring call on destroyed editor");
        }
        !self.destroyed
    }

    /// Detach callbacks and stop reacting to input.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.mode = Mode::Idle;
        self.selected = None;
        self.on_change = None;
        self.on_adding_changed = None;
        self.on_dragging_changed = None;
        log::debug!("editor destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    pub fn state(&self) -> EditorState {
        match self.mode {
            Mode::Idle => EditorState::Idle,
            Mode::Dragging(_) => EditorState::Dragging,
            Mode::Adding { .. } => EditorState::Adding,
        }
    }

    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending
    }

    // ---- callbacks ----

    pub fn set_on_change(&mut self, f: impl FnMut() + 'static) {
        self.on_change = Some(Box::new(f));
    }

    pub fn set_on_adding_changed(&mut self, f: impl FnMut(bool) + 'static) {
        self.on_adding_changed = Some(Box::new(f));
    }

    pub fn set_on_dragging_changed(&mut self, f: impl FnMut(bool) + 'static) {
        self.on_dragging_changed = Some(Box::new(f));
    }

    fn notify_change(&mut self) {
        if let Some(cb) = self.on_change.as_mut() {
            cb();
        }
    }

    fn notify_adding(&mut self, adding: bool) {
        log::debug!("adding mode {}", if adding { "entered" } else { "left" });
        if let Some(cb) = self.on_adding_changed.as_mut() {
            cb(adding);
        }
    }

    fn notify_dragging(&mut self, dragging: bool) {
        log::debug!("drag {}", if dragging { "started" } else { "ended" });
        if let Some(cb) = self.on_dragging_changed.as_mut() {
            cb(dragging);
        }
    }

    /// Redraw and tell listeners something changed.
    fn changed(&mut self) {
        self.request_redraw();
        self.notify_change();
    }

    // ---- drawing ----

    /// Ask for a frame unless one is already pending.
    pub fn request_redraw(&mut self) {
        if self.destroyed || self.frame_pending {
            return;
        }
        self.frame_pending = true;
        self.scheduler.schedule_frame();
    }

    /// Frame callback from the host: draws once if a redraw was requested.
    pub fn frame(&mut self) {
        if !self.frame_pending {
            return;
        }
        self.frame_pending = false;
        if !self.destroyed {
            self.draw();
        }
    }

    pub fn build_scene(&self) -> Scene {
        build_scene(&self.layers, &self.viewport, self.selected, self.preview())
    }

    /// Draw immediately.
    pub fn draw(&mut self) {
        if !self.alive() {
            return;
        }
        let (w, h) = self.surface.size();
        if (w, h) != self.viewport.size() {
            self.viewport.resize(w, h);
        }
        let scene = self.build_scene();
        self.surface.present(&scene);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if !self.alive() {
            return;
        }
        self.viewport.resize(width, height);
        self.request_redraw();
    }

    // ---- settings ----

    pub fn snap_to_grid(&self) -> bool {
        self.snap
    }

    pub fn set_snap_to_grid(&mut self, snap: bool) {
        if self.alive() {
            self.snap = snap;
        }
    }

    /// Sample count of the active layer (clamped to 3..=50).
    pub fn set_sample_count(&mut self, n: usize) -> bool {
        if !self.alive() {
            return false;
        }
        let id = self.layers.active_id();
        self.set_layer_sample_count(id, n)
    }

    pub fn zoom_in(&mut self) -> (f64, f64) {
        let range = self.viewport.zoom_in();
        self.after_zoom();
        range
    }

    pub fn zoom_out(&mut self) -> (f64, f64) {
        let range = self.viewport.zoom_out();
        self.after_zoom();
        range
    }

    pub fn set_zoom(&mut self, scale: f64) -> (f64, f64) {
        let range = self.viewport.set_zoom(scale);
        self.after_zoom();
        range
    }

    fn after_zoom(&mut self) {
        self.layers.invalidate_all();
        self.request_redraw();
    }

    // ---- selection and dot edits ----

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_dot(&self) -> Option<Dot> {
        self.selected.and_then(|i| self.layers.active_dots().get(i).copied())
    }

    /// Select a dot of the active layer (`None` clears). Returns `true` when
    /// the selection changed.
    pub fn select(&mut self, index: Option<usize>) -> bool {
        let index = index.filter(|&i| i < self.layers.active_dots().len());
        if index == self.selected {
            return false;
        }
        self.selected = index;
        self.changed();
        true
    }

    /// Apply a partial update to the selected dot. Kind first, then position
    /// (clamped like a drag), then explicit handle positions.
    pub fn update_selected_dot(&mut self, patch: DotPatch) -> bool {
        if !self.alive() {
            return false;
        }
        let Some(index) = self.selected else {
            return false;
        };
        let Some(current) = self.selected_dot() else {
            return false;
        };
        let snap = self.snap;
        let changed = self.layers.active_mut().edit_curve(|c| {
            let mut changed = false;
            if let Some(kind) = patch.kind {
                changed |= c.set_kind(index, kind);
            }
            if patch.x.is_some() || patch.y.is_some() {
                // only the supplied axes snap
                let snapped = |v: f64| if snap { v.round() } else { v };
                let x = patch.x.map_or(current.x, snapped);
                let y = patch.y.map_or(current.y, snapped);
                changed |= c.move_dot(index, x, y, false);
            }
            if let Some(h1) = patch.h1 {
                changed |= c.move_handle(index, HandleSide::In, h1.x, h1.y);
            }
            if let Some(h2) = patch.h2 {
                changed |= c.move_handle(index, HandleSide::Out, h2.x, h2.y);
            }
            changed
        });
        if changed {
            self.changed();
        }
        changed
    }

    /// Remove the selected dot and select the one before it.
    pub fn delete_selected_dot(&mut self) -> bool {
        if !self.alive() || self.mode != Mode::Idle {
            return false;
        }
        let Some(index) = self.selected else {
            return false;
        };
        if self.layers.active_mut().edit_curve(|c| c.remove_at(index)).is_none() {
            return false;
        }
        let len = self.layers.active_dots().len();
        self.selected = if len == 0 {
            None
        } else {
            Some(index.saturating_sub(1).min(len - 1))
        };
        self.changed();
        true
    }

    pub fn toggle_selected_kind(&mut self) -> bool {
        match self.selected {
            Some(index) => self.toggle_kind_at(index),
            None => false,
        }
    }

    fn toggle_kind_at(&mut self, index: usize) -> bool {
        let changed = self.layers.active_mut().edit_curve(|c| c.toggle_kind(index));
        if changed {
            self.changed();
        }
        changed
    }

    // ---- modes ----

    /// Enter adding mode, optionally with an initial preview at the surface
    /// position `at`.
    pub fn begin_adding_dot(&mut self, at: Option<Point>) {
        if !self.alive() {
            return;
        }
        self.end_drag();
        let preview = at.map(|p| self.preview_at(p));
        let was_adding = matches!(self.mode, Mode::Adding { .. });
        self.mode = Mode::Adding { preview };
        if !was_adding {
            self.notify_adding(true);
        }
        self.request_redraw();
    }

    /// Leave the current mode without touching the model. In idle mode this
    /// clears the selection.
    pub fn cancel(&mut self) {
        if !self.alive() {
            return;
        }
        match self.mode {
            Mode::Idle => {
                self.select(None);
            }
            Mode::Dragging(_) => self.end_drag(),
            Mode::Adding { .. } => self.end_adding(),
        }
    }

    fn end_adding(&mut self) {
        if let Mode::Adding { .. } = self.mode {
            self.mode = Mode::Idle;
            self.notify_adding(false);
            self.request_redraw();
        }
    }

    fn end_drag(&mut self) {
        if let Mode::Dragging(drag) = self.mode {
            self.mode = Mode::Idle;
            if drag.live {
                self.notify_dragging(false);
            }
        }
    }

    fn preview(&self) -> Option<Point> {
        match self.mode {
            Mode::Adding { preview } => preview,
            _ => None,
        }
    }

    /// Where a dot added at surface position `pos` would land, in user space.
    /// Follows the active curve where it covers the X.
    fn preview_at(&self, pos: Point) -> Point {
        let user = self.viewport.to_user(pos);
        let mut x = user.x.clamp(DOMAIN_MIN, DOMAIN_MAX);
        if self.snap {
            x = x.round();
        }
        let on_curve = sample_y(
            self.layers.active().curve(),
            x,
            self.config.preview_tolerance,
        );
        let y = match on_curve {
            Some(y) => y,
            None if self.snap => user.y.round(),
            None => user.y,
        };
        Point::new(x, y)
    }

    // ---- layers ----

    fn reset_interaction(&mut self) {
        self.end_drag();
        self.end_adding();
        self.selected = None;
    }

    pub fn add_layer(&mut self, property: &str) -> Option<LayerId> {
        if !self.alive() {
            return None;
        }
        let id = self.layers.add_layer(property)?;
        self.changed();
        Some(id)
    }

    pub fn delete_layer(&mut self, id: LayerId) -> bool {
        if !self.alive() {
            return false;
        }
        let was_active = self.layers.active_id() == id;
        if !self.layers.delete_layer(id) {
            return false;
        }
        if was_active {
            self.reset_interaction();
        }
        self.changed();
        true
    }

    pub fn set_active_layer(&mut self, id: LayerId) -> bool {
        if !self.alive() {
            return false;
        }
        debug_assert!(self.layers.layer(id).is_some(), "unknown layer id {}", id);
        if !self.layers.set_active(id) {
            return false;
        }
        self.reset_interaction();
        self.changed();
        true
    }

    pub fn set_layer_sample_count(&mut self, id: LayerId, n: usize) -> bool {
        if !self.alive() {
            return false;
        }
        let changed = self.layers.set_sample_count(id, n);
        if changed {
            self.changed();
        }
        changed
    }

    pub fn set_layer_flipped(&mut self, id: LayerId, flipped: bool) -> bool {
        if !self.alive() {
            return false;
        }
        let changed = self.layers.set_flipped(id, flipped);
        if changed {
            self.changed();
        }
        changed
    }

    pub fn set_layer_units(&mut self, id: LayerId, units: Units) -> bool {
        if !self.alive() {
            return false;
        }
        let changed = self.layers.set_units(id, units);
        if changed {
            self.changed();
        }
        changed
    }

    /// Replace the whole layer set, e.g. after loading a saved layout.
    pub fn replace_layers(&mut self, layers: LayerSet) {
        if !self.alive() {
            return;
        }
        self.reset_interaction();
        self.layers = layers;
        self.layers.set_sample_tolerance(self.config.sample_tolerance);
        self.changed();
    }

    pub fn keyframe_entries(&self) -> Vec<KeyframeEntry> {
        gen_keyframe_entries(&self.layers, &self.registry, &self.merge)
    }
}
