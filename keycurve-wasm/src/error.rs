use js_sys::Object;
use keycurve::LoadError;
use wasm_bindgen::prelude::*;

use crate::interop::{new_obj, set_kv};

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

fn param_obj(param: &str) -> Object {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    d
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    err("non_finite", format!("parameter '{}' must be finite", param), Some(param_obj(param).into()))
}

#[inline]
pub fn out_of_range(param: &str, min: f64, max: f64, got: f64) -> JsValue {
    let d = param_obj(param);
    set_kv(&d, "min", &JsValue::from_f64(min));
    set_kv(&d, "max", &JsValue::from_f64(max));
    set_kv(&d, "got", &JsValue::from_f64(got));
    err("out_of_range", format!("parameter '{}' out of range", param), Some(d.into()))
}

#[inline]
pub fn invalid_id(kind: &str, id: u32) -> JsValue {
    let d = new_obj();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "id", &JsValue::from_f64(id as f64));
    err("invalid_id", format!("invalid {} id", kind), Some(d.into()))
}

#[inline]
pub fn unknown_units(got: &str) -> JsValue {
    let d = new_obj();
    set_kv(&d, "got", &JsValue::from_str(got));
    err("unknown_units", format!("unknown units '{}'", got), Some(d.into()))
}

#[inline]
pub fn no_selection() -> JsValue {
    err("no_selection", "no dot is selected", None)
}

#[inline]
pub fn destroyed() -> JsValue {
    err("destroyed", "editor has been destroyed", None)
}

/// Strict loader failures keep their own stable codes.
pub fn load_error(e: &LoadError) -> JsValue {
    err(e.code(), e.to_string(), None)
}
