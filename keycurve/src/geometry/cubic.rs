//! Cubic Bézier evaluation and inverse evaluation on the X axis.
//!
//! Curves in this crate are functions of X drawn as parametric cubics, so
//! reading a value at a given X needs `t` such that `Bx(t) = x`. That is solved
//! with Newton–Raphson seeded by linear interpolation across the segment.

use super::tolerance::{clamp01, safe_div, EPS_DERIV, MAX_NEWTON_ITERS};
use crate::model::Point;

/// Control points of a cubic Bézier curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub p0: Point, // Start point
    pub p1: Point, // First control point
    pub p2: Point, // Second control point
    pub p3: Point, // End point
}

impl CubicBezier {
    pub fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluate the curve at parameter t ∈ [0, 1].
    pub fn eval(&self, t: f64) -> Point {
        Point::new(
            bernstein(t, self.p0.x, self.p1.x, self.p2.x, self.p3.x),
            bernstein(t, self.p0.y, self.p1.y, self.p2.y, self.p3.y),
        )
    }

    /// Evaluate the tangent (derivative) at parameter t.
    pub fn tangent(&self, t: f64) -> Point {
        Point::new(
            bernstein_deriv(t, self.p0.x, self.p1.x, self.p2.x, self.p3.x),
            bernstein_deriv(t, self.p0.y, self.p1.y, self.p2.y, self.p3.y),
        )
    }

    pub fn x_at(&self, t: f64) -> f64 {
        bernstein(t, self.p0.x, self.p1.x, self.p2.x, self.p3.x)
    }

    pub fn y_at(&self, t: f64) -> f64 {
        bernstein(t, self.p0.y, self.p1.y, self.p2.y, self.p3.y)
    }

    /// Find `t` with `|Bx(t) - x| < tol`.
    ///
    /// Returns `None` when the derivative vanishes before convergence or the
    /// iteration cap is reached.
    pub fn solve_t_for_x(&self, x: f64, tol: f64) -> Option<f64> {
        let span = self.p3.x - self.p0.x;
        let mut t = clamp01(safe_div(x - self.p0.x, span, 0.0));
        for _ in 0..MAX_NEWTON_ITERS {
            let err = self.x_at(t) - x;
            if err.abs() < tol {
                return Some(t);
            }
            let d = bernstein_deriv(t, self.p0.x, self.p1.x, self.p2.x, self.p3.x);
            if d.abs() < EPS_DERIV {
                return None;
            }
            t = clamp01(t - err / d);
        }
        None
    }

    /// Y on the curve where it crosses `x`, if solvable.
    pub fn y_for_x(&self, x: f64, tol: f64) -> Option<f64> {
        self.solve_t_for_x(x, tol).map(|t| self.y_at(t))
    }
}

#[inline]
fn bernstein(t: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let t2 = t * t;
    mt2 * mt * a + 3.0 * mt2 * t * b + 3.0 * mt * t2 * c + t2 * t * d
}

#[inline]
fn bernstein_deriv(t: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * (b - a) + 6.0 * mt * t * (c - b) + 3.0 * t * t * (d - c)
}
