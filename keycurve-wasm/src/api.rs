use js_sys::Array;
use keycurve::{
    gen_keyframe_entries as merge_layers, DotPatch, EditorConfig, EditorState, Key, KeyEvent,
    LayerSet, MergeConfig, Point, PointerEvent, PropertyRegistry, Units,
};
use wasm_bindgen::prelude::*;

use crate::{error, interop, CurveEditor};

fn layers_from_js(v: JsValue) -> Result<serde_json::Value, String> {
    if v.is_string() {
        let s = v.as_string().unwrap_or_default();
        serde_json::from_str(&s).map_err(|e| e.to_string())
    } else {
        interop::from_js(v)
    }
}

fn lenient_layers(v: JsValue) -> LayerSet {
    if v.is_undefined() || v.is_null() {
        return LayerSet::default();
    }
    match layers_from_js(v) {
        Ok(doc) => LayerSet::from_json(doc),
        Err(e) => {
            log::warn!("unreadable layout ({}); using default", e);
            LayerSet::default()
        }
    }
}

fn strict_layers(v: JsValue) -> Result<LayerSet, JsValue> {
    let doc = layers_from_js(v).map_err(|e| error::err("json_parse", e, None))?;
    LayerSet::from_json_strict(doc).map_err(|e| error::load_error(&e))
}

fn pointer(x: f64, y: f64, buttons: u16, mods: u8) -> PointerEvent {
    PointerEvent::new(x, y, buttons).with_modifiers(interop::modifiers(mods))
}

fn state_str(s: EditorState) -> &'static str {
    match s {
        EditorState::Idle => "idle",
        EditorState::Dragging => "dragging",
        EditorState::Adding => "adding",
    }
}

#[wasm_bindgen]
impl CurveEditor {
    /// `layers` is a saved layout (object, array or JSON text) or undefined;
    /// `config` is a partial `EditorConfig` or undefined.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, layers: JsValue, config: JsValue) -> CurveEditor {
        let config = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            interop::from_js(config).unwrap_or_else(|e| {
                log::warn!("bad editor config ({}); using defaults", e);
                EditorConfig::default()
            })
        };
        CurveEditor::rs_new(width, height, lenient_layers(layers), config)
    }

    // ---- lifecycle / drawing ----

    pub fn destroy(&self) {
        self.teardown();
    }

    pub fn destroyed(&self) -> bool {
        self.is_destroyed()
    }

    /// Draw now, bypassing the frame scheduler.
    pub fn draw(&self) {
        self.with(|ed| ed.draw());
    }

    pub fn resize(&self, width: f64, height: f64) {
        if !(width.is_finite() && height.is_finite()) {
            return;
        }
        self.with(|ed| {
            ed.surface_mut().width = width;
            ed.surface_mut().height = height;
            ed.resize(width, height);
        });
    }

    pub fn scene(&self) -> JsValue {
        self.read(|ed| interop::to_js(&ed.build_scene())).unwrap_or(JsValue::NULL)
    }

    pub fn last_scene(&self) -> JsValue {
        self.shared.last_scene.borrow().clone()
    }

    pub fn state(&self) -> String {
        self.read(|ed| state_str(ed.state()).to_string()).unwrap_or_default()
    }

    // ---- callbacks ----

    pub fn set_on_draw(&self, f: Option<js_sys::Function>) {
        self.shared.callbacks.borrow_mut().draw = f;
    }

    pub fn set_on_change(&self, f: Option<js_sys::Function>) {
        self.shared.callbacks.borrow_mut().change = f;
    }

    pub fn set_on_adding_changed(&self, f: Option<js_sys::Function>) {
        self.shared.callbacks.borrow_mut().adding = f;
    }

    pub fn set_on_dragging_changed(&self, f: Option<js_sys::Function>) {
        self.shared.callbacks.borrow_mut().dragging = f;
    }

    // ---- settings ----

    pub fn set_snap_to_grid(&self, snap: bool) {
        self.with(|ed| ed.set_snap_to_grid(snap));
    }

    pub fn snap_to_grid(&self) -> bool {
        self.read(|ed| ed.snap_to_grid()).unwrap_or(false)
    }

    pub fn set_sample_count(&self, n: u32) -> bool {
        self.with(|ed| ed.set_sample_count(n as usize)).unwrap_or(false)
    }

    pub fn zoom_in(&self) -> JsValue {
        self.with(|ed| ed.zoom_in()).map(interop::range).unwrap_or(JsValue::NULL)
    }

    pub fn zoom_out(&self) -> JsValue {
        self.with(|ed| ed.zoom_out()).map(interop::range).unwrap_or(JsValue::NULL)
    }

    pub fn y_range(&self) -> JsValue {
        self.read(|ed| interop::range(ed.viewport().range())).unwrap_or(JsValue::NULL)
    }

    // ---- selection ----

    pub fn begin_adding_dot(&self, x: Option<f64>, y: Option<f64>) {
        let at = match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some(Point::new(x, y)),
            _ => None,
        };
        self.with(|ed| ed.begin_adding_dot(at));
    }

    pub fn cancel(&self) {
        self.with(|ed| ed.cancel());
    }

    pub fn select(&self, index: Option<u32>) -> bool {
        self.with(|ed| ed.select(index.map(|i| i as usize))).unwrap_or(false)
    }

    pub fn selected_index(&self) -> Option<u32> {
        self.read(|ed| ed.selected_index()).flatten().map(|i| i as u32)
    }

    /// Selected dot as `{type, x, y, h1, h2}` in user units, or null.
    pub fn selected_dot(&self) -> JsValue {
        self.read(|ed| ed.selected_dot())
            .flatten()
            .map(|d| interop::to_js(&d))
            .unwrap_or(JsValue::NULL)
    }

    pub fn update_selected_dot(&self, patch: JsValue) -> bool {
        match interop::from_js::<DotPatch>(patch) {
            Ok(p) => self.with(|ed| ed.update_selected_dot(p)).unwrap_or(false),
            Err(e) => {
                log::warn!("bad dot patch: {}", e);
                false
            }
        }
    }

    pub fn update_selected_dot_res(&self, patch: JsValue) -> JsValue {
        if self.is_destroyed() {
            return error::destroyed();
        }
        let p: DotPatch = match interop::from_js(patch) {
            Ok(p) => p,
            Err(e) => return error::err("invalid_patch", e, None),
        };
        for (name, v) in [("x", p.x), ("y", p.y)] {
            if v.map_or(false, |v| !v.is_finite()) {
                return error::non_finite(name);
            }
        }
        for (name, h) in [("h1", p.h1), ("h2", p.h2)] {
            if h.map_or(false, |h| !h.is_finite()) {
                return error::non_finite(name);
            }
        }
        if self.read(|ed| ed.selected_index()).flatten().is_none() {
            return error::no_selection();
        }
        let changed = self.with(|ed| ed.update_selected_dot(p)).unwrap_or(false);
        error::ok(JsValue::from_bool(changed))
    }

    pub fn delete_selected_dot(&self) -> bool {
        self.with(|ed| ed.delete_selected_dot()).unwrap_or(false)
    }

    pub fn toggle_selected_kind(&self) -> bool {
        self.with(|ed| ed.toggle_selected_kind()).unwrap_or(false)
    }

    // ---- input (surface pixels; mods: 1 shift, 2 alt, 4 ctrl, 8 meta) ----

    pub fn pointer_down(&self, x: f64, y: f64, buttons: u16, mods: u8) {
        self.with(|ed| ed.on_pointer_down(pointer(x, y, buttons, mods)));
    }

    pub fn pointer_move(&self, x: f64, y: f64, buttons: u16, mods: u8) {
        self.with(|ed| ed.on_pointer_move(pointer(x, y, buttons, mods)));
    }

    pub fn pointer_up(&self, x: f64, y: f64, buttons: u16, mods: u8) {
        self.with(|ed| ed.on_pointer_up(pointer(x, y, buttons, mods)));
    }

    pub fn pointer_leave(&self, x: f64, y: f64, buttons: u16, mods: u8) {
        self.with(|ed| ed.on_pointer_leave(pointer(x, y, buttons, mods)));
    }

    pub fn double_click(&self, x: f64, y: f64) {
        self.with(|ed| ed.on_double_click(pointer(x, y, 0, 0)));
    }

    /// `key` is a DOM `KeyboardEvent.key`. Returns true when handled, so the
    /// host can `preventDefault()`.
    pub fn key_down(&self, key: &str, mods: u8) -> bool {
        let ev = KeyEvent::new(Key::from_dom(key)).with_modifiers(interop::modifiers(mods));
        self.with(|ed| ed.on_key_down(ev)).unwrap_or(false)
    }

    // ---- layers ----

    /// `[{id, cssProp, isFlipped, sampleCount, units, active}]`
    pub fn layers(&self) -> JsValue {
        self.read(|ed| {
            let set = ed.layers();
            let out = Array::new();
            for layer in set.iter() {
                let o = interop::new_obj();
                interop::set_kv(&o, "id", &JsValue::from_f64(layer.id() as f64));
                interop::set_kv(&o, "cssProp", &JsValue::from_str(layer.property()));
                interop::set_kv(&o, "isFlipped", &JsValue::from_bool(layer.is_flipped()));
                interop::set_kv(&o, "sampleCount", &JsValue::from_f64(layer.sample_count() as f64));
                interop::set_kv(&o, "units", &JsValue::from_str(layer.units().as_str()));
                interop::set_kv(&o, "active", &JsValue::from_bool(layer.id() == set.active_id()));
                out.push(&o);
            }
            JsValue::from(out)
        })
        .unwrap_or(JsValue::NULL)
    }

    pub fn active_layer(&self) -> Option<u32> {
        self.read(|ed| ed.layers().active_id())
    }

    /// Samples of one layer as a flat `[x0, y0, x1, y1, ...]` array.
    pub fn layer_samples(&self, id: u32) -> JsValue {
        self.read(|ed| {
            ed.layers().layer(id).map(|layer| {
                let flat: Vec<f64> = layer.samples().iter().flat_map(|p| [p.x, p.y]).collect();
                JsValue::from(interop::arr_f64(&flat))
            })
        })
        .flatten()
        .unwrap_or(JsValue::NULL)
    }

    pub fn add_layer(&self, property: &str) -> Option<u32> {
        self.with(|ed| ed.add_layer(property)).flatten()
    }

    pub fn add_layer_res(&self, property: &str) -> JsValue {
        if self.is_destroyed() {
            return error::destroyed();
        }
        let property = property.trim();
        if property.is_empty() {
            return error::err("invalid_property", "property name is empty", None);
        }
        if self.read(|ed| ed.layers().find_property(property).is_some()).unwrap_or(false) {
            return error::err("duplicate_property", format!("'{}' already has a layer", property), None);
        }
        match self.with(|ed| ed.add_layer(property)).flatten() {
            Some(id) => error::ok(JsValue::from_f64(id as f64)),
            None => error::err("caps_exceeded", "layer limit reached", None),
        }
    }

    pub fn delete_layer(&self, id: u32) -> bool {
        self.with(|ed| ed.delete_layer(id)).unwrap_or(false)
    }

    pub fn delete_layer_res(&self, id: u32) -> JsValue {
        if let Some(e) = self.check_layer(id) {
            return e;
        }
        if self.read(|ed| ed.layers().len()).unwrap_or(0) <= 1 {
            return error::err("last_layer", "the last layer cannot be deleted", None);
        }
        let done = self.with(|ed| ed.delete_layer(id)).unwrap_or(false);
        error::ok(JsValue::from_bool(done))
    }

    pub fn set_active_layer(&self, id: u32) -> bool {
        if !self.has_layer(id) {
            log::warn!("set_active_layer: unknown layer id {}", id);
            return false;
        }
        self.with(|ed| ed.set_active_layer(id)).unwrap_or(false)
    }

    pub fn set_active_layer_res(&self, id: u32) -> JsValue {
        if let Some(e) = self.check_layer(id) {
            return e;
        }
        let changed = self.with(|ed| ed.set_active_layer(id)).unwrap_or(false);
        error::ok(JsValue::from_bool(changed))
    }

    pub fn set_layer_sample_count(&self, id: u32, n: u32) -> bool {
        self.with(|ed| ed.set_layer_sample_count(id, n as usize)).unwrap_or(false)
    }

    pub fn set_layer_sample_count_res(&self, id: u32, n: f64) -> JsValue {
        if let Some(e) = self.check_layer(id) {
            return e;
        }
        if !n.is_finite() {
            return error::non_finite("n");
        }
        let (lo, hi) = (keycurve::geometry::limits::MIN_SAMPLE_COUNT, keycurve::geometry::limits::MAX_SAMPLE_COUNT);
        if n < lo as f64 || n > hi as f64 || n.fract() != 0.0 {
            return error::out_of_range("n", lo as f64, hi as f64, n);
        }
        let changed = self.with(|ed| ed.set_layer_sample_count(id, n as usize)).unwrap_or(false);
        error::ok(JsValue::from_bool(changed))
    }

    pub fn set_layer_flipped(&self, id: u32, flipped: bool) -> bool {
        self.with(|ed| ed.set_layer_flipped(id, flipped)).unwrap_or(false)
    }

    pub fn set_layer_units(&self, id: u32, units: &str) -> bool {
        match units.parse::<Units>() {
            Ok(u) => self.with(|ed| ed.set_layer_units(id, u)).unwrap_or(false),
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    pub fn set_layer_units_res(&self, id: u32, units: &str) -> JsValue {
        if let Some(e) = self.check_layer(id) {
            return e;
        }
        let Ok(u) = units.parse::<Units>() else {
            return error::unknown_units(units);
        };
        let changed = self.with(|ed| ed.set_layer_units(id, u)).unwrap_or(false);
        error::ok(JsValue::from_bool(changed))
    }

    // ---- persistence / export ----

    pub fn to_json(&self) -> JsValue {
        self.read(|ed| interop::to_js(&ed.layers().to_json())).unwrap_or(JsValue::NULL)
    }

    pub fn to_json_string(&self) -> String {
        self.read(|ed| ed.layers().to_json_string()).unwrap_or_default()
    }

    /// Lenient load; bad data is repaired or dropped.
    pub fn from_json(&self, v: JsValue) -> bool {
        let set = lenient_layers(v);
        self.with(|ed| ed.replace_layers(set)).is_some()
    }

    pub fn from_json_res(&self, v: JsValue) -> JsValue {
        if self.is_destroyed() {
            return error::destroyed();
        }
        match strict_layers(v) {
            Ok(set) => {
                let n = set.len();
                self.with(|ed| ed.replace_layers(set));
                error::ok(JsValue::from_f64(n as f64))
            }
            Err(e) => e,
        }
    }

    pub fn keyframe_entries(&self) -> JsValue {
        self.read(|ed| interop::to_js(&ed.keyframe_entries())).unwrap_or(JsValue::NULL)
    }
}

impl CurveEditor {
    fn has_layer(&self, id: u32) -> bool {
        self.read(|ed| ed.layers().layer(id).is_some()).unwrap_or(false)
    }

    fn check_layer(&self, id: u32) -> Option<JsValue> {
        if self.is_destroyed() {
            return Some(error::destroyed());
        }
        if !self.has_layer(id) {
            return Some(error::invalid_id("layer", id));
        }
        None
    }
}

fn merge_config(precision: Option<u32>) -> MergeConfig {
    precision.map_or_else(MergeConfig::default, |precision| MergeConfig { precision })
}

/// Merge a saved layout into keyframe entries without an editor.
#[wasm_bindgen]
pub fn gen_keyframe_entries(layers: JsValue, precision: Option<u32>) -> JsValue {
    let set = lenient_layers(layers);
    interop::to_js(&merge_layers(&set, &PropertyRegistry::css(), &merge_config(precision)))
}

#[wasm_bindgen]
pub fn gen_keyframe_entries_res(layers: JsValue, precision: Option<u32>) -> JsValue {
    match strict_layers(layers) {
        Ok(set) => error::ok(interop::to_js(&merge_layers(
            &set,
            &PropertyRegistry::css(),
            &merge_config(precision),
        ))),
        Err(e) => e,
    }
}
