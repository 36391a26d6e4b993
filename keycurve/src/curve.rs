//! Ordered anchor list of a single property curve.
//!
//! Dots are kept strictly ascending by X. Every mutation that can move a dot
//! horizontally clamps it between its neighbours (or the 0..100 domain when a
//! neighbour is missing), so a dot's index never changes while it is edited.

use crate::geometry::cubic::CubicBezier;
use crate::geometry::tolerance::{clamp_span, DOMAIN_MAX, DOMAIN_MIN, EPS_POS, MIN_DOT_GAP};
use crate::model::{Dot, DotKind, HandleSide, Point, Space};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Curve {
    dots: Vec<Dot>,
}

impl Curve {
    pub fn new() -> Self {
        Curve { dots: Vec::new() }
    }

    /// Build from arbitrary dots: sorted by X, same-X duplicates dropped.
    pub fn from_dots(mut dots: Vec<Dot>) -> Self {
        dots.retain(|d| d.is_finite());
        dots.sort_by(|a, b| a.x.total_cmp(&b.x));
        dots.dedup_by(|b, a| (a.x - b.x).abs() <= EPS_POS);
        Curve { dots }
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn get(&self, index: usize) -> Option<&Dot> {
        self.dots.get(index)
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.dots.windows(2).all(|w| w[0].x < w[1].x)
    }

    /// Allowed X interval for the dot at `index`.
    pub fn x_bounds(&self, index: usize) -> (f64, f64) {
        let lo = match index.checked_sub(1).and_then(|i| self.dots.get(i)) {
            Some(prev) => prev.x + MIN_DOT_GAP,
            None => DOMAIN_MIN,
        };
        let hi = match self.dots.get(index + 1) {
            Some(next) => next.x - MIN_DOT_GAP,
            None => DOMAIN_MAX,
        };
        (lo, hi)
    }

    /// Insert keeping X order. Declines (returns `None`) when a dot already
    /// sits at the same X or the dot is not in user space.
    pub fn insert_sorted(&mut self, dot: Dot) -> Option<usize> {
        if dot.space != Space::User || !dot.is_finite() {
            return None;
        }
        let index = self.dots.partition_point(|d| d.x < dot.x);
        if let Some(existing) = self.dots.get(index) {
            if (existing.x - dot.x).abs() <= EPS_POS {
                return None;
            }
        }
        self.dots.insert(index, dot);
        Some(index)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Dot> {
        if index < self.dots.len() {
            Some(self.dots.remove(index))
        } else {
            None
        }
    }

    /// Move the dot at `index` towards `(x, y)`, dragging both handles along.
    ///
    /// With `snap` the proposed coordinates are rounded to whole units first.
    /// Returns `false` when nothing changed.
    pub fn move_dot(&mut self, index: usize, x: f64, y: f64, snap: bool) -> bool {
        if !x.is_finite() || !y.is_finite() || index >= self.dots.len() {
            return false;
        }
        let (x, y) = if snap { (x.round(), y.round()) } else { (x, y) };
        let (lo, hi) = self.x_bounds(index);
        let x = clamp_span(x, lo, hi);
        let dot = &mut self.dots[index];
        let dx = x - dot.x;
        let dy = y - dot.y;
        if dx.abs() <= EPS_POS && dy.abs() <= EPS_POS {
            return false;
        }
        dot.x = x;
        dot.y = y;
        dot.h1 = dot.h1.offset(dx, dy);
        dot.h2 = dot.h2.offset(dx, dy);
        true
    }

    /// Move the dot at `index` by a delta; see [`Curve::move_dot`].
    pub fn nudge(&mut self, index: usize, dx: f64, dy: f64, snap: bool) -> bool {
        match self.dots.get(index) {
            Some(d) => {
                let (x, y) = (d.x + dx, d.y + dy);
                self.move_dot(index, x, y, snap)
            }
            None => false,
        }
    }

    /// Reposition one handle. Round dots mirror the opposite handle through
    /// the dot; Corner dots only store the new position.
    pub fn move_handle(&mut self, index: usize, side: HandleSide, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        let Some(dot) = self.dots.get_mut(index) else {
            return false;
        };
        let target = Point::new(x, y);
        if dot.handle(side).dist_sq(target) <= EPS_POS * EPS_POS {
            return false;
        }
        *dot.handle_mut(side) = target;
        if dot.kind == DotKind::Round {
            let center = dot.pos();
            *dot.handle_mut(side.opposite()) = target.mirror_through(center);
        }
        true
    }

    pub fn toggle_kind(&mut self, index: usize) -> bool {
        match self.dots.get(index) {
            Some(d) => {
                let kind = d.kind.toggled();
                self.set_kind(index, kind)
            }
            None => false,
        }
    }

    /// Change the joint type. Becoming Round re-mirrors `h2` from `h1`.
    pub fn set_kind(&mut self, index: usize, kind: DotKind) -> bool {
        let Some(dot) = self.dots.get_mut(index) else {
            return false;
        };
        if dot.kind == kind {
            return false;
        }
        dot.kind = kind;
        if kind == DotKind::Round {
            dot.h2 = dot.h1.mirror_through(dot.pos());
        }
        true
    }

    pub fn segment_count(&self) -> usize {
        self.dots.len().saturating_sub(1)
    }

    /// Bézier control points of segment `i` (between dot `i` and `i + 1`).
    pub fn control_points(&self, i: usize) -> Option<CubicBezier> {
        let a = self.dots.get(i)?;
        let b = self.dots.get(i + 1)?;
        let p1 = match a.kind {
            DotKind::Round => a.h2,
            DotKind::Corner => a.pos(),
        };
        let p2 = match b.kind {
            DotKind::Round => b.h1,
            DotKind::Corner => b.pos(),
        };
        Some(CubicBezier::new(a.pos(), p1, p2, b.pos()))
    }

    /// First segment whose X span contains `x`.
    pub fn segment_containing(&self, x: f64) -> Option<usize> {
        self.dots
            .windows(2)
            .position(|w| x >= w[0].x && x <= w[1].x)
    }
}

impl From<Vec<Dot>> for Curve {
    fn from(dots: Vec<Dot>) -> Self {
        Curve::from_dots(dots)
    }
}
