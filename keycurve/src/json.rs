//! Persisted layer layout.
//!
//! ```json
//! { "version": 1, "active": 0,
//!   "layers": [ { "cssProp": "translateY", "isFlipped": false, "sampleCount": 10,
//!                 "units": "px", "dots": [ { "type": "square", "x": 0, "y": 0,
//!                                            "h1": {"x": 0, "y": 0}, "h2": {"x": 0, "y": 0} } ] } ] }
//! ```
//!
//! A bare array of layers is accepted as well. The lenient loader repairs what
//! it can and drops the rest; the strict loader rejects anything off-shape.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::curve::Curve;
use crate::error::LoadError;
use crate::geometry::limits::{self, clamp_sample_count};
use crate::geometry::tolerance::{EPS_POS, SAMPLE_TOLERANCE};
use crate::layers::{Layer, LayerId, LayerSet};
use crate::model::{Dot, DotKind, Point, Units};

pub const LAYOUT_VERSION: u32 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayerSer<'a> {
    css_prop: &'a str,
    is_flipped: bool,
    sample_count: usize,
    units: Units,
    dots: &'a [Dot],
}

#[derive(Serialize)]
struct DocSer<'a> {
    version: u32,
    active: usize,
    layers: Vec<LayerSer<'a>>,
}

pub fn to_json_impl(set: &LayerSet) -> Value {
    let layers = set
        .iter()
        .map(|l| LayerSer {
            css_prop: l.property(),
            is_flipped: l.is_flipped(),
            sample_count: l.sample_count(),
            units: l.units(),
            dots: l.dots(),
        })
        .collect();
    let doc = DocSer {
        version: LAYOUT_VERSION,
        active: set.active_index(),
        layers,
    };
    serde_json::to_value(doc).unwrap_or(Value::Null)
}

/// Split a document into its layer list, active index and declared version.
fn split_doc(v: Value) -> Option<(Vec<Value>, usize, Option<u64>)> {
    match v {
        Value::Array(layers) => Some((layers, 0, None)),
        Value::Object(mut m) => {
            let active = m.get("active").and_then(Value::as_u64).unwrap_or(0) as usize;
            let version = m.get("version").and_then(Value::as_u64);
            match m.remove("layers") {
                Some(Value::Array(layers)) => Some((layers, active, version)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn assemble(layers: Vec<Layer>, active: usize) -> LayerSet {
    let next_id = layers.len() as LayerId;
    let active = if active < layers.len() { active } else { 0 };
    LayerSet { layers, active, next_id, tolerance: SAMPLE_TOLERANCE }
}

fn dot_in_bounds(d: &Dot) -> bool {
    [d.x, d.y, d.h1.x, d.h1.y, d.h2.x, d.h2.y]
        .into_iter()
        .all(limits::in_coord_bounds)
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct LayerLoose {
    #[serde(alias = "propertyId")]
    css_prop: Option<String>,
    is_flipped: Option<bool>,
    sample_count: Option<f64>,
    units: Option<String>,
    dots: Vec<Value>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct DotLoose {
    #[serde(rename = "type")]
    kind: Option<String>,
    x: Option<f64>,
    y: Option<f64>,
    h1: Option<Point>,
    h2: Option<Point>,
}

fn loose_dot(v: Value) -> Option<Dot> {
    let d: DotLoose = serde_json::from_value(v).ok()?;
    let (x, y) = (d.x?, d.y?);
    let kind = match d.kind.as_deref() {
        Some("round") => DotKind::Round,
        _ => DotKind::Corner,
    };
    let p = Point::new(x, y);
    let dot = Dot::new(x, y, kind).with_handles(d.h1.unwrap_or(p), d.h2.unwrap_or(p));
    dot_in_bounds(&dot).then_some(dot)
}

/// Lenient load: never fails. Off-shape layers and dots are dropped, sample
/// counts clamped, unknown units read as unitless. An unusable document
/// yields the default single-layer set.
pub fn from_json_impl(v: Value) -> LayerSet {
    let Some((raw_layers, active, version)) = split_doc(v) else {
        log::warn!("layout is neither a layer list nor a layout object; using default");
        return LayerSet::default();
    };
    if version.is_some_and(|ver| ver != LAYOUT_VERSION as u64) {
        log::warn!("layout version {:?} is not {}; loading anyway", version, LAYOUT_VERSION);
    }
    let mut seen: HashSet<String> = HashSet::new();
    let mut layers: Vec<Layer> = Vec::new();
    let mut kept_active = 0;
    for (i, raw) in raw_layers.into_iter().enumerate() {
        if layers.len() >= limits::MAX_LAYERS {
            log::warn!("layout exceeds {} layers; dropping the rest", limits::MAX_LAYERS);
            break;
        }
        let loose: LayerLoose = match serde_json::from_value(raw) {
            Ok(l) => l,
            Err(e) => {
                log::warn!("dropping malformed layer {}: {}", i, e);
                continue;
            }
        };
        let Some(property) = loose.css_prop.filter(|p| !p.is_empty()) else {
            log::warn!("dropping layer {} without a property", i);
            continue;
        };
        if !seen.insert(property.clone()) {
            log::warn!("dropping duplicate layer for '{}'", property);
            continue;
        }
        let total = loose.dots.len();
        let dots: Vec<Dot> = loose
            .dots
            .into_iter()
            .take(limits::MAX_DOTS_PER_LAYER)
            .filter_map(loose_dot)
            .collect();
        if dots.len() < total {
            log::warn!("dropped {} unusable dots from '{}'", total - dots.len(), property);
        }
        let mut layer = Layer::new(layers.len() as LayerId, property, Curve::from_dots(dots));
        layer.flipped = loose.is_flipped.unwrap_or(false);
        layer.sample_count = loose
            .sample_count
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map_or(limits::DEFAULT_SAMPLE_COUNT, |n| clamp_sample_count(n.round() as usize));
        layer.units = loose
            .units
            .and_then(|u| u.parse().ok())
            .unwrap_or(Units::None);
        if i == active {
            kept_active = layers.len();
        }
        layers.push(layer);
    }
    if layers.is_empty() {
        return LayerSet::default();
    }
    assemble(layers, kept_active)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayerStrict {
    #[serde(alias = "propertyId")]
    css_prop: String,
    is_flipped: bool,
    sample_count: usize,
    units: String,
    dots: Vec<Dot>,
}

/// Strict load: the document must be well-formed and within limits.
pub fn from_json_impl_strict(v: Value) -> Result<LayerSet, LoadError> {
    let (raw_layers, active, version) = split_doc(v)
        .ok_or_else(|| LoadError::InvalidStructure("expected a layer list or layout object".into()))?;
    if let Some(ver) = version {
        if ver != LAYOUT_VERSION as u64 {
            return Err(LoadError::UnsupportedVersion(ver.min(u32::MAX as u64) as u32));
        }
    }
    if raw_layers.is_empty() {
        return Err(LoadError::Empty);
    }
    if raw_layers.len() > limits::MAX_LAYERS {
        return Err(LoadError::CapsExceeded { what: "layers", cap: limits::MAX_LAYERS });
    }
    if active >= raw_layers.len() {
        return Err(LoadError::OutOfBounds("active".into()));
    }
    let mut seen: HashSet<String> = HashSet::new();
    let mut layers = Vec::with_capacity(raw_layers.len());
    for (i, raw) in raw_layers.into_iter().enumerate() {
        let l: LayerStrict = serde_json::from_value(raw)?;
        if l.css_prop.is_empty() {
            return Err(LoadError::InvalidStructure(format!("layer {} has no property", i)));
        }
        if !seen.insert(l.css_prop.clone()) {
            return Err(LoadError::DuplicateProperty(l.css_prop));
        }
        if l.dots.len() > limits::MAX_DOTS_PER_LAYER {
            return Err(LoadError::CapsExceeded { what: "dots", cap: limits::MAX_DOTS_PER_LAYER });
        }
        if !(limits::MIN_SAMPLE_COUNT..=limits::MAX_SAMPLE_COUNT).contains(&l.sample_count) {
            return Err(LoadError::OutOfBounds(format!("layer {} sampleCount", i)));
        }
        let units: Units = l.units.parse().map_err(|_| LoadError::UnknownUnits(l.units.clone()))?;
        if let Some(j) = l.dots.iter().position(|d| !dot_in_bounds(d)) {
            return Err(LoadError::OutOfBounds(format!("layer {} dot {}", i, j)));
        }
        // same gap the curve uses to merge coincident dots
        if !l.dots.windows(2).all(|w| w[1].x - w[0].x > EPS_POS) {
            return Err(LoadError::InvalidStructure(format!(
                "layer {} dots not strictly ascending by x",
                i
            )));
        }
        let mut layer = Layer::new(i as LayerId, l.css_prop, Curve::from_dots(l.dots));
        layer.flipped = l.is_flipped;
        layer.sample_count = l.sample_count;
        layer.units = units;
        layers.push(layer);
    }
    Ok(assemble(layers, active))
}
