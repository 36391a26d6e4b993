//! Mapping between user space and surface space.
//!
//! User space runs 0..100 on X and `min_y..max_y` on Y (Y up). Surface space
//! is pixels with the origin at the top-left, inset by `border` on every side.
//! The Y range is driven by a zoom scale: scale 1 shows `0..100`, every extra
//! unit of scale widens the range by 50 on both ends.

use super::tolerance::{safe_div, DOMAIN_MAX, DOMAIN_MIN};
use crate::model::Point;

pub const ZOOM_STEP: f64 = 0.5;
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 5.0;

const RANGE_CENTER: f64 = 50.0;
const RANGE_HALF: f64 = 50.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
    border: f64,
    scale: f64,
    min_y: f64,
    max_y: f64,
    x_ratio: f64, // px per user unit
    y_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, border: f64) -> Self {
        let mut vp = Viewport {
            width,
            height,
            border,
            scale: MIN_ZOOM,
            min_y: 0.0,
            max_y: 100.0,
            x_ratio: 1.0,
            y_ratio: 1.0,
        };
        vp.relayout();
        vp
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn border(&self) -> f64 {
        self.border
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min_y, self.max_y)
    }

    pub fn ratios(&self) -> (f64, f64) {
        (self.x_ratio, self.y_ratio)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.relayout();
    }

    /// Set the zoom scale, snapped to the step grid and clamped. Returns the
    /// resulting Y range.
    pub fn set_zoom(&mut self, scale: f64) -> (f64, f64) {
        let scale = if scale.is_finite() { scale } else { MIN_ZOOM };
        let snapped = (scale / ZOOM_STEP).round() * ZOOM_STEP;
        self.scale = snapped.clamp(MIN_ZOOM, MAX_ZOOM);
        self.relayout();
        self.range()
    }

    /// Narrow the Y range by one step.
    pub fn zoom_in(&mut self) -> (f64, f64) {
        self.set_zoom(self.scale - ZOOM_STEP)
    }

    /// Widen the Y range by one step.
    pub fn zoom_out(&mut self) -> (f64, f64) {
        self.set_zoom(self.scale + ZOOM_STEP)
    }

    fn relayout(&mut self) {
        self.min_y = RANGE_CENTER - RANGE_HALF * self.scale;
        self.max_y = RANGE_CENTER + RANGE_HALF * self.scale;
        let inner_w = (self.width - 2.0 * self.border).max(1.0);
        let inner_h = (self.height - 2.0 * self.border).max(1.0);
        self.x_ratio = inner_w / (DOMAIN_MAX - DOMAIN_MIN);
        self.y_ratio = inner_h / (self.max_y - self.min_y);
    }

    #[inline]
    pub fn x_to_surface(&self, x: f64) -> f64 {
        self.border + (x - DOMAIN_MIN) * self.x_ratio
    }

    #[inline]
    pub fn y_to_surface(&self, y: f64) -> f64 {
        self.border + (self.max_y - y) * self.y_ratio
    }

    #[inline]
    pub fn x_to_user(&self, x: f64) -> f64 {
        DOMAIN_MIN + safe_div(x - self.border, self.x_ratio, 0.0)
    }

    #[inline]
    pub fn y_to_user(&self, y: f64) -> f64 {
        self.max_y - safe_div(y - self.border, self.y_ratio, 0.0)
    }

    pub fn to_surface(&self, p: Point) -> Point {
        Point::new(self.x_to_surface(p.x), self.y_to_surface(p.y))
    }

    pub fn to_user(&self, p: Point) -> Point {
        Point::new(self.x_to_user(p.x), self.y_to_user(p.y))
    }
}
