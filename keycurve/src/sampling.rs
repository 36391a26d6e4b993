//! Curve sampling.
//!
//! Model:
//! - A curve is a chain of cubic segments between consecutive dots.
//! - `sample_y(curve, x)` finds the segment whose X span holds `x` and solves
//!   the segment for `t` with Newton–Raphson on the X component.
//! - X values not covered by any segment have no value; that is an expected
//!   outcome, not an error.
//!
//! API:
//! - sample_y(&Curve, x, tol) -> Option<f64>
//! - sample_curve(&Curve, n) -> Vec<Point> over n evenly spaced X in [0, 100].

use crate::curve::Curve;
use crate::geometry::limits::clamp_sample_count;
use crate::geometry::tolerance::{DOMAIN_MAX, DOMAIN_MIN, SAMPLE_TOLERANCE};
use crate::model::Point;

/// Y of the curve at `x`, or `None` when no segment covers `x` or the
/// solver fails to converge.
pub fn sample_y(curve: &Curve, x: f64, tol: f64) -> Option<f64> {
    if !x.is_finite() {
        return None;
    }
    let seg = curve.segment_containing(x)?;
    curve.control_points(seg)?.y_for_x(x, tol)
}

/// Evenly spaced sample X positions across the domain, the last one pinned
/// to exactly 100.
pub fn sample_positions(n: usize) -> Vec<f64> {
    let n = clamp_sample_count(n);
    let step = (DOMAIN_MAX - DOMAIN_MIN) / (n - 1) as f64;
    (0..n)
        .map(|i| {
            if i + 1 == n {
                DOMAIN_MAX
            } else {
                DOMAIN_MIN + step * i as f64
            }
        })
        .collect()
}

/// Sample `n` (clamped to 3..=50) evenly spaced points, skipping X values the
/// curve does not cover.
pub fn sample_curve(curve: &Curve, n: usize) -> Vec<Point> {
    sample_curve_with_tolerance(curve, n, SAMPLE_TOLERANCE)
}

pub fn sample_curve_with_tolerance(curve: &Curve, n: usize, tol: f64) -> Vec<Point> {
    if curve.len() < 2 {
        return Vec::new();
    }
    sample_positions(n)
        .into_iter()
        .filter_map(|x| sample_y(curve, x, tol).map(|y| Point::new(x, y)))
        .collect()
}
