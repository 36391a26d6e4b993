//! Keyframe merge: combines the samples of every layer into one ordered list
//! of keyframe entries.
//!
//! Model:
//! - Samples are bucketed into time slices keyed by their X rounded to
//!   `MergeConfig::precision` decimals, so near-equal X values coming from
//!   different layers share a slice.
//! - Slices are sorted and linked to their neighbours by index.
//! - Paired properties are always emitted together; a partner missing from
//!   a slice is interpolated along the chain, or falls back to its default.

use std::collections::HashMap;
use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geometry::tolerance::lerp;
use crate::layers::{LayerSamples, LayerSet};
use crate::model::Units;
use crate::properties::{Axis, PropertyRegistry};

const MAX_PRECISION: u32 = 9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Decimal places of X kept when bucketing samples into slices.
    pub precision: u32,
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig { precision: 2 }
    }
}

impl MergeConfig {
    fn scale(&self) -> f64 {
        10f64.powi(self.precision.min(MAX_PRECISION) as i32)
    }

    fn key(&self, x: f64) -> i64 {
        (x * self.scale()).round() as i64
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisValue {
    pub property: String,
    pub value: f64,
    pub units: Units,
    /// `true` when the value was not sampled at this slice.
    pub interpolated: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntryValue {
    Single {
        property: String,
        value: f64,
        units: Units,
    },
    Paired {
        group: String,
        first: AxisValue,
        second: AxisValue,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyframeEntry {
    pub offset_percent: f64,
    pub values: Vec<EntryValue>,
}

impl KeyframeEntry {
    /// Value of `property` in this entry, looking inside pairs.
    pub fn value_of(&self, property: &str) -> Option<f64> {
        self.values.iter().find_map(|v| match v {
            EntryValue::Single { property: p, value, .. } if p == property => Some(*value),
            EntryValue::Paired { first, second, .. } => [first, second]
                .into_iter()
                .find(|a| a.property == property)
                .map(|a| a.value),
            _ => None,
        })
    }
}

#[derive(Debug)]
struct TimeSlice {
    x: f64,
    prev: Option<usize>,
    next: Option<usize>,
    values: IndexMap<String, f64>,
}

/// Bucket samples by rounded X, then link the sorted buckets.
fn build_slices(layers: &[LayerSamples], cfg: &MergeConfig) -> Vec<TimeSlice> {
    let scale = cfg.scale();
    let mut buckets: IndexMap<i64, IndexMap<String, f64>> = IndexMap::new();
    for layer in layers {
        for s in &layer.samples {
            if !s.x.is_finite() || !s.y.is_finite() {
                continue;
            }
            let value = if layer.flipped { -s.y } else { s.y };
            buckets
                .entry(cfg.key(s.x))
                .or_default()
                .insert(layer.property.clone(), value);
        }
    }
    buckets.sort_keys();

    let n = buckets.len();
    buckets
        .into_iter()
        .enumerate()
        .map(|(i, (key, values))| TimeSlice {
            x: key as f64 / scale,
            prev: i.checked_sub(1),
            next: (i + 1 < n).then_some(i + 1),
            values,
        })
        .collect()
}

/// Nearest value of `property` walking the chain from `start` via `step`.
fn find_along(
    slices: &[TimeSlice],
    start: usize,
    property: &str,
    step: impl Fn(&TimeSlice) -> Option<usize>,
) -> Option<(f64, f64)> {
    let mut cur = step(&slices[start]);
    while let Some(i) = cur {
        let slice = &slices[i];
        if let Some(v) = slice.values.get(property) {
            return Some((slice.x, *v));
        }
        cur = step(slice);
    }
    None
}

fn interpolate(slices: &[TimeSlice], at: usize, property: &str, default: f64) -> f64 {
    let before = find_along(slices, at, property, |s| s.prev);
    let after = find_along(slices, at, property, |s| s.next);
    match (before, after) {
        (Some((x0, v0)), Some((x1, v1))) => {
            let span = x1 - x0;
            if span.abs() <= f64::EPSILON {
                v0
            } else {
                lerp(v0, v1, (slices[at].x - x0) / span)
            }
        }
        (Some((_, v)), None) | (None, Some((_, v))) => v,
        (None, None) => default,
    }
}

/// Merge per-layer samples into ordered keyframe entries.
pub fn merge_samples(
    layers: &[LayerSamples],
    registry: &PropertyRegistry,
    cfg: &MergeConfig,
) -> Vec<KeyframeEntry> {
    let units: HashMap<&str, Units> = layers
        .iter()
        .map(|l| (l.property.as_str(), l.units))
        .collect();
    let units_of = |p: &str| {
        units
            .get(p)
            .copied()
            .unwrap_or_else(|| registry.default_units(p))
    };

    let slices = build_slices(layers, cfg);
    let mut entries = Vec::with_capacity(slices.len());
    for (idx, slice) in slices.iter().enumerate() {
        let mut handled: HashSet<&str> = HashSet::new();
        let mut values = Vec::with_capacity(slice.values.len());
        for (property, &value) in &slice.values {
            if !handled.insert(property.as_str()) {
                continue;
            }
            let Some(pair) = registry.pair_of(property) else {
                values.push(EntryValue::Single {
                    property: property.clone(),
                    value,
                    units: units_of(property),
                });
                continue;
            };
            handled.insert(pair.partner.as_str());
            let own = AxisValue {
                property: property.clone(),
                value,
                units: units_of(property),
                interpolated: false,
            };
            let partner = match slice.values.get(&pair.partner) {
                Some(&v) => AxisValue {
                    property: pair.partner.clone(),
                    value: v,
                    units: units_of(&pair.partner),
                    interpolated: false,
                },
                None => AxisValue {
                    property: pair.partner.clone(),
                    value: interpolate(
                        &slices,
                        idx,
                        &pair.partner,
                        registry.default_value(&pair.partner),
                    ),
                    units: units_of(&pair.partner),
                    interpolated: true,
                },
            };
            let (first, second) = match pair.axis {
                Axis::First => (own, partner),
                Axis::Second => (partner, own),
            };
            values.push(EntryValue::Paired {
                group: pair.group.clone(),
                first,
                second,
            });
        }
        entries.push(KeyframeEntry {
            offset_percent: slice.x,
            values,
        });
    }
    log::debug!(
        "merged {} layers into {} keyframe entries",
        layers.len(),
        entries.len()
    );
    entries
}

/// Keyframe entries for every layer of `set`. Pure; safe to call any time.
pub fn gen_keyframe_entries(
    set: &LayerSet,
    registry: &PropertyRegistry,
    cfg: &MergeConfig,
) -> Vec<KeyframeEntry> {
    merge_samples(&set.layers_with_samples(), registry, cfg)
}
