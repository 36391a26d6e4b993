use approx::assert_abs_diff_eq;
use keycurve::geometry::cubic::CubicBezier;
use keycurve::sampling::{sample_curve, sample_y};
use keycurve::{
    Curve, Dot, DotKind, Editor, EditorConfig, LayerSet, ManualFrames, Point, RecordingSurface,
};

fn seed(last: (f64, f64)) -> Curve {
    Curve::from_dots(vec![
        Dot::new(0.0, 0.0, DotKind::Corner),
        Dot::new(25.0, 50.0, DotKind::Round)
            .with_handles(Point::new(15.0, 50.0), Point::new(35.0, 50.0)),
        Dot::new(last.0, last.1, DotKind::Corner),
    ])
}

#[test]
fn degenerate_corner_segment_is_zero_everywhere() {
    let c = Curve::from_dots(vec![
        Dot::new(0.0, 0.0, DotKind::Corner),
        Dot::new(100.0, 0.0, DotKind::Corner),
    ]);
    for s in sample_curve(&c, 50) {
        assert_eq!(s.y, 0.0);
    }
    assert_eq!(sample_curve(&c, 50).len(), 50);
}

#[test]
fn symmetric_round_curve_passes_through_center() {
    let c = Curve::from_dots(vec![
        Dot::new(0.0, 0.0, DotKind::Round)
            .with_handles(Point::new(-50.0, 0.0), Point::new(50.0, 0.0)),
        Dot::new(100.0, 100.0, DotKind::Round)
            .with_handles(Point::new(50.0, 100.0), Point::new(150.0, 100.0)),
    ]);
    let y = sample_y(&c, 50.0, 1e-6).expect("covered");
    assert_abs_diff_eq!(y, 50.0, epsilon = 1e-9);
}

#[test]
fn seed_curve_skips_uncovered_tail() {
    // The seed ends at x = 50, so the third sample position (x = 100) has no value.
    let samples = sample_curve(&seed((50.0, 100.0)), 3);
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0], Point::new(0.0, 0.0));
    assert_abs_diff_eq!(samples[1].x, 50.0, epsilon = 1e-12);
    assert_abs_diff_eq!(samples[1].y, 100.0, epsilon = 1e-9);
}

#[test]
fn full_span_seed_samples_bezier_middle() {
    let c = seed((100.0, 100.0));
    let samples = sample_curve(&c, 3);
    let xs: Vec<f64> = samples.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.0, 50.0, 100.0]);
    assert_eq!(samples[0].y, 0.0);
    assert_abs_diff_eq!(samples[2].y, 100.0, epsilon = 1e-9);

    let seg = CubicBezier::new(
        Point::new(25.0, 50.0),
        Point::new(35.0, 50.0),
        Point::new(100.0, 100.0),
        Point::new(100.0, 100.0),
    );
    let expected = seg.y_for_x(50.0, 1e-12).expect("solvable");
    let mid = samples[1].y;
    assert_abs_diff_eq!(mid, expected, epsilon = 1e-4);
    // not the straight line between (25, 50) and (100, 100)
    assert!((mid - 200.0 / 3.0).abs() > 1.0);
    assert!(mid > 50.0 && mid < 100.0);
}

#[test]
fn layer_cache_follows_sample_count() {
    let mut set = LayerSet::new("translateY", seed((100.0, 100.0)).dots().to_vec());
    let id = set.active_id();
    assert_eq!(set.active_samples().len(), 10);
    set.set_sample_count(id, 3);
    assert_eq!(set.active_samples().len(), 3);
    set.set_sample_count(id, 0);
    assert_eq!(set.layer(id).unwrap().sample_count(), 3);
}

#[test]
fn editor_sample_tolerance_drives_layer_samples() {
    let layers = || {
        let mut set = LayerSet::new("translateY", seed((100.0, 100.0)).dots().to_vec());
        let id = set.active_id();
        set.set_sample_count(id, 3);
        set
    };
    let editor = |config: EditorConfig| {
        Editor::new(RecordingSurface::new(420.0, 220.0), ManualFrames::default(), layers(), config)
    };
    let fine = editor(EditorConfig::default()).layers().active_samples();
    let coarse = editor(EditorConfig { sample_tolerance: 5.0, ..EditorConfig::default() })
        .layers()
        .active_samples();

    assert_eq!(fine.len(), 3);
    assert_eq!(coarse.len(), 3);
    // x = 50 is within 5 units of the linear seed t = 1/3, so Newton stops there
    assert_abs_diff_eq!(coarse[1].y, 1700.0 / 27.0, epsilon = 1e-9);
    assert!((coarse[1].y - fine[1].y).abs() > 0.1);
    assert_eq!(coarse[0], fine[0]);

    // replacing the layers keeps the configured tolerance
    let mut ed = editor(EditorConfig { sample_tolerance: 5.0, ..EditorConfig::default() });
    ed.replace_layers(layers());
    assert_eq!(ed.layers().sample_tolerance(), 5.0);
    assert_abs_diff_eq!(ed.layers().active_samples()[1].y, 1700.0 / 27.0, epsilon = 1e-9);
}
