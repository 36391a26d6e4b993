use js_sys::{Reflect, JSON};
use keycurve_wasm::{gen_keyframe_entries_res, CurveEditor};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn is_err(v: &JsValue, code: &str) -> bool {
    if let Ok(ok) =
        Reflect::get(v, &JsValue::from_str("ok")).and_then(|x| x.as_bool().ok_or(JsValue::NULL))
    {
        if ok {
            return false;
        }
        if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
            if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) {
                return c.as_string().map_or(false, |s| s == code);
            }
        }
    }
    false
}

fn is_ok(v: &JsValue) -> bool {
    Reflect::get(v, &JsValue::from_str("ok"))
        .ok()
        .and_then(|x| x.as_bool())
        .unwrap_or(false)
}

fn js(text: &str) -> JsValue {
    JSON::parse(text).unwrap()
}

const LAYOUT: &str = r#"{"version":1,"active":0,"layers":[
  {"cssProp":"left","isFlipped":false,"sampleCount":10,"units":"px","dots":[
    {"type":"square","x":0,"y":0,"h1":{"x":-10,"y":0},"h2":{"x":10,"y":0}},
    {"type":"round","x":50,"y":50,"h1":{"x":40,"y":50},"h2":{"x":60,"y":50}},
    {"type":"square","x":100,"y":100,"h1":{"x":90,"y":100},"h2":{"x":110,"y":100}}]}]}"#;

fn editor() -> CurveEditor {
    CurveEditor::new(420.0, 220.0, js(LAYOUT), JsValue::UNDEFINED)
}

#[wasm_bindgen_test]
fn layer_ops_return_typed_errors() {
    let ed = editor();
    let id = ed.active_layer().unwrap();
    assert!(is_err(&ed.delete_layer_res(id), "last_layer"));
    assert!(is_err(&ed.delete_layer_res(999), "invalid_id"));
    assert!(is_err(&ed.set_active_layer_res(999), "invalid_id"));
    assert!(is_err(&ed.set_layer_units_res(id, "furlong"), "unknown_units"));
    assert!(is_err(&ed.set_layer_sample_count_res(id, 51.0), "out_of_range"));
    assert!(is_err(&ed.set_layer_sample_count_res(id, f64::NAN), "non_finite"));
    assert!(is_err(&ed.add_layer_res("left"), "duplicate_property"));
    assert!(is_err(&ed.add_layer_res("  "), "invalid_property"));
    // nothing above mutated the set
    assert_eq!(ed.to_json_string(), editor().to_json_string());

    assert!(is_ok(&ed.set_layer_sample_count_res(id, 20.0)));
    assert!(is_ok(&ed.add_layer_res("opacity")));
}

#[wasm_bindgen_test]
fn dot_patch_errors() {
    let ed = editor();
    assert!(is_err(&ed.update_selected_dot_res(js(r#"{"y":10}"#)), "no_selection"));
    assert!(ed.select(Some(1)));

    let patch = js("{}");
    Reflect::set(&patch, &JsValue::from_str("x"), &JsValue::from_f64(f64::INFINITY)).unwrap();
    assert!(is_err(&ed.update_selected_dot_res(patch), "non_finite"));
    assert!(is_err(&ed.update_selected_dot_res(js(r#"{"type":"hexagon"}"#)), "invalid_patch"));

    let r = ed.update_selected_dot_res(js(r#"{"y":60}"#));
    assert!(is_ok(&r));
    let dot = ed.selected_dot();
    let y = Reflect::get(&dot, &JsValue::from_str("y")).unwrap().as_f64().unwrap();
    assert_eq!(y, 60.0);
}

#[wasm_bindgen_test]
fn strict_load_reports_loader_codes() {
    let ed = editor();
    let before = ed.to_json_string();
    assert!(is_err(&ed.from_json_res(JsValue::from_str("{not json")), "json_parse"));
    assert!(is_err(&ed.from_json_res(js(r#"{"version":7,"layers":[]}"#)), "unsupported_version"));
    assert!(is_err(&ed.from_json_res(js("[]")), "empty"));
    assert!(is_err(
        &ed.from_json_res(js(r#"[{"cssProp":"top","isFlipped":false,"sampleCount":10,"units":"parsec","dots":[]}]"#)),
        "unknown_units"
    ));
    assert_eq!(ed.to_json_string(), before);

    assert!(is_err(&gen_keyframe_entries_res(js("[]"), None), "empty"));
}

#[wasm_bindgen_test]
fn destroyed_editor_rejects_calls() {
    let ed = editor();
    ed.destroy();
    assert!(ed.destroyed());
    assert!(is_err(&ed.add_layer_res("opacity"), "destroyed"));
    assert!(is_err(&ed.from_json_res(js(LAYOUT)), "destroyed"));
    // plain variants are silent no-ops
    assert_eq!(ed.add_layer("opacity"), None);
    ed.pointer_down(10.0, 10.0, 1, 0);
    assert!(!ed.key_down("Delete", 0));
}
