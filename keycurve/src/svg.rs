use crate::curve::Curve;
use crate::geometry::viewport::Viewport;
use crate::model::Point;

/// SVG path data for `curve` in surface space: one `M` followed by a `C`
/// command per segment. Empty for curves with fewer than two dots.
pub fn curve_path(curve: &Curve, vp: &Viewport) -> String {
    if curve.len() < 2 {
        return String::new();
    }
    let mut d = String::new();
    for i in 0..curve.segment_count() {
        let Some(seg) = curve.control_points(i) else {
            continue;
        };
        let [p0, p1, p2, p3] = [seg.p0, seg.p1, seg.p2, seg.p3].map(|p| vp.to_surface(p));
        if d.is_empty() {
            d.push_str(&format!("M {} {}", p0.x, p0.y));
        }
        d.push_str(&format!(
            " C {} {}, {} {}, {} {}",
            p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
        ));
    }
    d
}

/// Polyline through already-mapped surface points.
pub fn polyline_path(points: &[Point]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { "M" } else { " L" };
        d.push_str(&format!("{} {} {}", cmd, p.x, p.y));
    }
    d
}
