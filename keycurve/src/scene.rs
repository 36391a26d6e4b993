//! Host-agnostic draw list for one frame, everything in surface pixels.

use serde::Serialize;

use crate::geometry::tolerance::{DOMAIN_MAX, DOMAIN_MIN};
use crate::geometry::viewport::Viewport;
use crate::layers::LayerSet;
use crate::model::{DotKind, HandleSide, Point};
use crate::svg::curve_path;

const GRID_STEP: f64 = 10.0;
const MAJOR_STEP: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GridLine {
    pub from: Point,
    pub to: Point,
    pub major: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DotMark {
    pub index: usize,
    pub pos: Point,
    pub kind: DotKind,
    pub selected: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HandleMark {
    pub index: usize,
    pub side: HandleSide,
    pub pos: Point,
    pub anchor: Point,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub grid: Vec<GridLine>,
    pub curve: String,
    pub ghosts: Vec<String>,
    pub dots: Vec<DotMark>,
    pub handles: Vec<HandleMark>,
    pub preview: Option<Point>,
    pub samples: Vec<Point>,
    pub range: (f64, f64),
}

fn grid(vp: &Viewport) -> Vec<GridLine> {
    let (min_y, max_y) = vp.range();
    let mut lines = Vec::new();
    let mut x = DOMAIN_MIN;
    while x <= DOMAIN_MAX {
        lines.push(GridLine {
            from: vp.to_surface(Point::new(x, min_y)),
            to: vp.to_surface(Point::new(x, max_y)),
            major: x % MAJOR_STEP == 0.0,
        });
        x += GRID_STEP;
    }
    let mut y = (min_y / GRID_STEP).ceil() * GRID_STEP;
    while y <= max_y {
        lines.push(GridLine {
            from: vp.to_surface(Point::new(DOMAIN_MIN, y)),
            to: vp.to_surface(Point::new(DOMAIN_MAX, y)),
            major: y % MAJOR_STEP == 0.0,
        });
        y += GRID_STEP;
    }
    lines
}

pub(crate) fn build_scene(
    layers: &LayerSet,
    vp: &Viewport,
    selected: Option<usize>,
    preview: Option<Point>,
) -> Scene {
    let (width, height) = vp.size();
    let active = layers.active();
    let ghosts = layers
        .iter()
        .filter(|l| l.id() != active.id())
        .map(|l| curve_path(l.curve(), vp))
        .filter(|d| !d.is_empty())
        .collect();

    let mut dots = Vec::with_capacity(active.dots().len());
    let mut handles = Vec::new();
    for (index, d) in active.dots().iter().enumerate() {
        let s = d.to_surface(vp);
        dots.push(DotMark {
            index,
            pos: s.pos(),
            kind: d.kind,
            selected: selected == Some(index),
        });
        if d.kind == DotKind::Round {
            for side in [HandleSide::In, HandleSide::Out] {
                handles.push(HandleMark { index, side, pos: s.handle(side), anchor: s.pos() });
            }
        }
    }

    Scene {
        width,
        height,
        grid: grid(vp),
        curve: curve_path(active.curve(), vp),
        ghosts,
        dots,
        handles,
        preview: preview.map(|p| vp.to_surface(p)),
        samples: active.samples().into_iter().map(|p| vp.to_surface(p)).collect(),
        range: vp.range(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dot;

    #[test]
    fn scene_marks_selection_and_round_handles() {
        let set = LayerSet::new(
            "opacity",
            vec![
                Dot::new(0.0, 0.0, DotKind::Corner),
                Dot::new(50.0, 50.0, DotKind::Round)
                    .with_handles(Point::new(40.0, 50.0), Point::new(60.0, 50.0)),
                Dot::new(100.0, 100.0, DotKind::Corner),
            ],
        );
        let vp = Viewport::new(420.0, 220.0, 10.0);
        let scene = build_scene(&set, &vp, Some(1), None);
        assert_eq!(scene.dots.len(), 3);
        assert!(scene.dots[1].selected && !scene.dots[0].selected);
        assert_eq!(scene.handles.len(), 2);
        assert!(scene.curve.starts_with("M 10 210 C"));
        assert_eq!(scene.samples.len(), 10);
        assert!(scene.ghosts.is_empty());
        // 11 vertical + 11 horizontal lines over a 0..100 range
        assert_eq!(scene.grid.len(), 22);
    }
}
