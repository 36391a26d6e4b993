use std::cell::RefCell;

use crate::curve::Curve;
use crate::geometry::limits::{clamp_sample_count, DEFAULT_SAMPLE_COUNT, MAX_LAYERS};
use crate::model::{Dot, Point, Units};
use crate::geometry::tolerance::SAMPLE_TOLERANCE;
use crate::sampling::sample_curve_with_tolerance;

pub type LayerId = u32;

/// One animatable property and the curve that drives it.
#[derive(Debug)]
pub struct Layer {
    pub(crate) id: LayerId,
    pub(crate) property: String,
    pub(crate) curve: Curve,
    pub(crate) sample_count: usize,
    pub(crate) flipped: bool,
    pub(crate) units: Units,
    pub(crate) tolerance: f64,
    // Lazily computed samples; None when stale.
    pub(crate) cached_samples: RefCell<Option<Vec<Point>>>,
}

impl Clone for Layer {
    fn clone(&self) -> Self {
        Layer {
            id: self.id,
            property: self.property.clone(),
            curve: self.curve.clone(),
            sample_count: self.sample_count,
            flipped: self.flipped,
            units: self.units,
            tolerance: self.tolerance,
            cached_samples: RefCell::new(self.cached_samples.borrow().clone()),
        }
    }
}

impl Layer {
    pub(crate) fn new(id: LayerId, property: String, curve: Curve) -> Self {
        Layer {
            id,
            property,
            curve,
            sample_count: DEFAULT_SAMPLE_COUNT,
            flipped: false,
            units: Units::None,
            tolerance: SAMPLE_TOLERANCE,
            cached_samples: RefCell::new(None),
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn dots(&self) -> &[Dot] {
        self.curve.dots()
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Edit the curve through `f`; the sample cache is dropped when `f`
    /// reports a change.
    pub(crate) fn edit_curve<R>(&mut self, f: impl FnOnce(&mut Curve) -> R) -> R
    where
        R: Changed,
    {
        let r = f(&mut self.curve);
        if r.changed() {
            self.invalidate();
        }
        r
    }

    pub fn invalidate(&self) {
        self.cached_samples.borrow_mut().take();
    }

    pub fn has_cached_samples(&self) -> bool {
        self.cached_samples.borrow().is_some()
    }

    /// Samples of the curve, computed on first use after an invalidation.
    pub fn samples(&self) -> Vec<Point> {
        if let Some(s) = self.cached_samples.borrow().as_ref() {
            return s.clone();
        }
        let fresh = sample_curve_with_tolerance(&self.curve, self.sample_count, self.tolerance);
        *self.cached_samples.borrow_mut() = Some(fresh.clone());
        fresh
    }

    pub fn to_samples(&self) -> LayerSamples {
        LayerSamples {
            property: self.property.clone(),
            samples: self.samples(),
            flipped: self.flipped,
            units: self.units,
        }
    }
}

/// Outcome of a curve edit that may or may not have changed anything.
pub(crate) trait Changed {
    fn changed(&self) -> bool;
}

impl Changed for bool {
    fn changed(&self) -> bool {
        *self
    }
}

impl<T> Changed for Option<T> {
    fn changed(&self) -> bool {
        self.is_some()
    }
}

/// Everything the merge stage needs from one layer.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSamples {
    pub property: String,
    pub samples: Vec<Point>,
    pub flipped: bool,
    pub units: Units,
}

/// Ordered property layers with one active layer. Never empty.
#[derive(Clone, Debug)]
pub struct LayerSet {
    pub(crate) layers: Vec<Layer>,
    pub(crate) active: usize,
    pub(crate) next_id: LayerId,
    // Newton stop criterion handed to every layer.
    pub(crate) tolerance: f64,
}

impl LayerSet {
    /// A set holding one layer for `property` with the given dots.
    pub fn new(property: &str, dots: Vec<Dot>) -> Self {
        LayerSet {
            layers: vec![Layer::new(0, property.to_string(), Curve::from_dots(dots))],
            active: 0,
            next_id: 1,
            tolerance: SAMPLE_TOLERANCE,
        }
    }

    fn next_id(&mut self) -> LayerId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(|l| l.id).collect()
    }

    /// Get layer by ID
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub(crate) fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        let found = self.layers.iter_mut().find(|l| l.id == id);
        if found.is_none() {
            log::warn!("unknown layer id {}", id);
        }
        found
    }

    pub fn find_property(&self, property: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.property == property)
    }

    /// Add an empty layer for `property`. Declines duplicates and anything
    /// past the layer cap.
    pub fn add_layer(&mut self, property: &str) -> Option<LayerId> {
        self.add_layer_with(property, Vec::new())
    }

    pub fn add_layer_with(&mut self, property: &str, dots: Vec<Dot>) -> Option<LayerId> {
        if property.is_empty() || self.find_property(property).is_some() {
            return None;
        }
        if self.layers.len() >= MAX_LAYERS {
            log::warn!("layer cap of {} reached", MAX_LAYERS);
            return None;
        }
        let id = self.next_id();
        let mut layer = Layer::new(id, property.to_string(), Curve::from_dots(dots));
        layer.tolerance = self.tolerance;
        self.layers.push(layer);
        Some(id)
    }

    /// Remove a layer. The last remaining layer is never removed.
    pub fn delete_layer(&mut self, id: LayerId) -> bool {
        if self.layers.len() <= 1 {
            return false;
        }
        let Some(idx) = self.layers.iter().position(|l| l.id == id) else {
            log::warn!("delete of unknown layer id {}", id);
            return false;
        };
        let active_id = self.active_id();
        self.layers.remove(idx);
        self.active = self
            .layers
            .iter()
            .position(|l| l.id == active_id)
            .unwrap_or_else(|| idx.saturating_sub(1));
        true
    }

    pub fn set_active(&mut self, id: LayerId) -> bool {
        match self.layers.iter().position(|l| l.id == id) {
            Some(idx) => {
                let changed = idx != self.active;
                self.active = idx;
                changed
            }
            None => {
                log::warn!("cannot activate unknown layer id {}", id);
                false
            }
        }
    }

    pub(crate) fn active_index(&self) -> usize {
        if self.active < self.layers.len() {
            self.active
        } else {
            log::warn!(
                "active layer index {} out of bounds ({} layers), using 0",
                self.active,
                self.layers.len()
            );
            0
        }
    }

    pub fn active(&self) -> &Layer {
        &self.layers[self.active_index()]
    }

    pub(crate) fn active_mut(&mut self) -> &mut Layer {
        let idx = self.active_index();
        self.active = idx;
        &mut self.layers[idx]
    }

    pub fn active_id(&self) -> LayerId {
        self.active().id
    }

    pub fn active_dots(&self) -> &[Dot] {
        self.active().dots()
    }

    pub fn active_samples(&self) -> Vec<Point> {
        self.active().samples()
    }

    /// Set sample density (clamped to 3..=50). Returns `true` on change.
    pub fn set_sample_count(&mut self, id: LayerId, n: usize) -> bool {
        let n = clamp_sample_count(n);
        match self.layer_mut(id) {
            Some(l) if l.sample_count != n => {
                l.sample_count = n;
                l.invalidate();
                true
            }
            _ => false,
        }
    }

    pub fn set_flipped(&mut self, id: LayerId, flipped: bool) -> bool {
        match self.layer_mut(id) {
            Some(l) if l.flipped != flipped => {
                l.flipped = flipped;
                true
            }
            _ => false,
        }
    }

    pub fn set_units(&mut self, id: LayerId, units: Units) -> bool {
        match self.layer_mut(id) {
            Some(l) if l.units != units => {
                l.units = units;
                true
            }
            _ => false,
        }
    }

    pub fn sample_tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Solver tolerance used for every layer's samples. Non-positive or
    /// non-finite values are ignored. Returns `true` on change.
    pub fn set_sample_tolerance(&mut self, tol: f64) -> bool {
        if !(tol.is_finite() && tol > 0.0) {
            log::warn!("ignoring sample tolerance {}", tol);
            return false;
        }
        if tol == self.tolerance && self.layers.iter().all(|l| l.tolerance == tol) {
            return false;
        }
        self.tolerance = tol;
        for l in &mut self.layers {
            if l.tolerance != tol {
                l.tolerance = tol;
                l.invalidate();
            }
        }
        true
    }

    /// Drop every layer's sample cache.
    pub fn invalidate_all(&self) {
        for l in &self.layers {
            l.invalidate();
        }
    }

    pub fn layers_with_samples(&self) -> Vec<LayerSamples> {
        self.layers.iter().map(Layer::to_samples).collect()
    }
}

impl Default for LayerSet {
    fn default() -> Self {
        LayerSet::new("translateY", Vec::new())
    }
}
