use crate::geometry::viewport::Viewport;
use crate::model::{Dot, DotKind, HandleSide, Point};

/// Hit-test result in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pick {
    Dot { index: usize, dist: f64 },
    Handle { index: usize, side: HandleSide, dist: f64 },
}

impl Pick {
    pub fn index(&self) -> usize {
        match *self {
            Pick::Dot { index, .. } | Pick::Handle { index, .. } => index,
        }
    }
}

/// Pick against user-space `dots` at surface position `at`.
///
/// Dot bodies win over handles; only Round dots expose their handles. The
/// closest candidate within `radius` pixels is returned.
pub fn pick_impl(dots: &[Dot], vp: &Viewport, at: Point, radius: f64) -> Option<Pick> {
    if !at.is_finite() || dots.is_empty() {
        return None;
    }
    let r2 = radius * radius;
    let surface: Vec<Dot> = dots.iter().map(|d| d.to_surface(vp)).collect();
    // Dots first
    let mut best_dot: Option<(usize, f64)> = None;
    for (i, d) in surface.iter().enumerate() {
        let d2 = d.pos().dist_sq(at);
        if d2 <= r2 && best_dot.map_or(true, |(_, bd)| d2 < bd) {
            best_dot = Some((i, d2));
        }
    }
    if let Some((index, d2)) = best_dot {
        return Some(Pick::Dot { index, dist: d2.sqrt() });
    }
    // Handles of round dots
    let mut best_handle: Option<(usize, HandleSide, f64)> = None;
    for (i, d) in surface.iter().enumerate().filter(|(_, d)| d.kind == DotKind::Round) {
        for side in [HandleSide::In, HandleSide::Out] {
            let d2 = d.handle(side).dist_sq(at);
            if d2 <= r2 && best_handle.map_or(true, |(_, _, bd)| d2 < bd) {
                best_handle = Some((i, side, d2));
            }
        }
    }
    best_handle.map(|(index, side, d2)| Pick::Handle { index, side, dist: d2.sqrt() })
}
