// Centralized tolerances and helpers for robust curve numerics

pub const EPS_POS: f64 = 1e-9;            // coordinate coincidence threshold (user units)
pub const EPS_DERIV: f64 = 1e-9;          // |Bx'(t)| below this aborts Newton
pub const EPS_DENOM: f64 = 1e-12;         // denominator guard for ratios
pub const MIN_DOT_GAP: f64 = 1e-3;        // smallest X gap kept between neighbouring dots

pub const SAMPLE_TOLERANCE: f64 = 1e-6;   // Newton stop criterion for exported samples
pub const PREVIEW_TOLERANCE: f64 = 1e-3;  // Newton stop criterion for interactive previews
pub const MAX_NEWTON_ITERS: usize = 100;

// User-space X domain
pub const DOMAIN_MIN: f64 = 0.0;
pub const DOMAIN_MAX: f64 = 100.0;

#[inline] pub fn clamp01(x: f64) -> f64 { x.clamp(0.0, 1.0) }
#[inline] pub fn lerp(a: f64, b: f64, t: f64) -> f64 { a + (b - a) * t }

#[inline]
pub fn safe_div(num: f64, den: f64, fallback: f64) -> f64 {
    if den.abs() <= EPS_DENOM { fallback } else { num / den }
}

/// Clamp into `[lo, hi]`, collapsing to the midpoint when the interval is inverted.
#[inline]
pub fn clamp_span(x: f64, lo: f64, hi: f64) -> f64 {
    if lo > hi { 0.5 * (lo + hi) } else { x.clamp(lo, hi) }
}
