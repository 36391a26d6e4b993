use js_sys::{Array, Float64Array, Object, Reflect};
use keycurve::Modifiers;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn arr_f64(slice: &[f64]) -> Float64Array {
    let arr = Float64Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
pub fn range(r: (f64, f64)) -> JsValue {
    let a = Array::new();
    a.push(&JsValue::from_f64(r.0));
    a.push(&JsValue::from_f64(r.1));
    a.into()
}

/// Serialize to plain JS objects (maps become objects, not `Map`).
pub fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    let ser = serde_wasm_bindgen::Serializer::json_compatible();
    match v.serialize(&ser) {
        Ok(js) => js,
        Err(e) => {
            log::warn!("serialize to js failed: {}", e);
            JsValue::NULL
        }
    }
}

pub fn from_js<T: DeserializeOwned>(v: JsValue) -> Result<T, String> {
    serde_wasm_bindgen::from_value(v).map_err(|e| e.to_string())
}

/// Bit mask from the host: 1 shift, 2 alt, 4 ctrl, 8 meta.
pub fn modifiers(bits: u8) -> Modifiers {
    Modifiers {
        shift: bits & 1 != 0,
        alt: bits & 2 != 0,
        ctrl: bits & 4 != 0,
        meta: bits & 8 != 0,
    }
}
