//! Catalogue of animatable properties: default values, default units and
//! which properties travel together as two-axis pairs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::Units;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    First,
    Second,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairSpec {
    pub group: String,
    pub axis: Axis,
    pub partner: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    pub id: String,
    pub default_value: f64,
    pub default_units: Units,
    pub pair: Option<PairSpec>,
}

#[derive(Clone, Debug, Default)]
pub struct PropertyRegistry {
    specs: HashMap<String, PropertySpec>,
}

impl PropertyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transform and box properties commonly driven by CSS keyframes.
    pub fn css() -> Self {
        let mut reg = PropertyRegistry::new();
        reg.register_pair("translate", ("translateX", "translateY"), 0.0, Units::Px);
        reg.register_pair("scale", ("scaleX", "scaleY"), 1.0, Units::None);
        reg.register_pair("skew", ("skewX", "skewY"), 0.0, Units::Deg);
        reg.register("rotate", 0.0, Units::Deg);
        reg.register("opacity", 1.0, Units::None);
        reg.register("width", 0.0, Units::Px);
        reg.register("height", 0.0, Units::Px);
        reg.register("left", 0.0, Units::Px);
        reg.register("top", 0.0, Units::Px);
        reg.register("blur", 0.0, Units::Px);
        reg
    }

    pub fn register(&mut self, id: &str, default_value: f64, default_units: Units) {
        self.specs.insert(
            id.to_string(),
            PropertySpec {
                id: id.to_string(),
                default_value,
                default_units,
                pair: None,
            },
        );
    }

    /// Register two properties emitted together under `group`.
    pub fn register_pair(
        &mut self,
        group: &str,
        (first, second): (&str, &str),
        default_value: f64,
        default_units: Units,
    ) {
        for (id, axis, partner) in [(first, Axis::First, second), (second, Axis::Second, first)] {
            self.specs.insert(
                id.to_string(),
                PropertySpec {
                    id: id.to_string(),
                    default_value,
                    default_units,
                    pair: Some(PairSpec {
                        group: group.to_string(),
                        axis,
                        partner: partner.to_string(),
                    }),
                },
            );
        }
    }

    pub fn get(&self, id: &str) -> Option<&PropertySpec> {
        self.specs.get(id)
    }

    pub fn pair_of(&self, id: &str) -> Option<&PairSpec> {
        self.specs.get(id).and_then(|s| s.pair.as_ref())
    }

    /// Declared default value; unknown properties default to 0.
    pub fn default_value(&self, id: &str) -> f64 {
        self.specs.get(id).map_or(0.0, |s| s.default_value)
    }

    pub fn default_units(&self, id: &str) -> Units {
        self.specs.get(id).map_or(Units::None, |s| s.default_units)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }
}
