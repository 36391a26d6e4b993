use approx::assert_abs_diff_eq;
use keycurve::{
    gen_keyframe_entries, Dot, DotKind, EntryValue, LayerSet, MergeConfig, PropertyRegistry, Units,
};

fn registry() -> PropertyRegistry {
    let mut reg = PropertyRegistry::new();
    reg.register_pair("offset", ("propertyA", "propertyB"), 3.0, Units::Px);
    reg
}

fn line(y0: f64, y1: f64) -> Vec<Dot> {
    vec![
        Dot::new(0.0, y0, DotKind::Corner),
        Dot::new(100.0, y1, DotKind::Corner),
    ]
}

#[test]
fn unsampled_partner_uses_declared_default() {
    let mut set = LayerSet::new("propertyA", line(0.0, 100.0));
    let id = set.active_id();
    set.set_sample_count(id, 3);
    let entries = gen_keyframe_entries(&set, &registry(), &MergeConfig::default());
    assert_eq!(entries.len(), 3);
    for e in &entries {
        match &e.values[..] {
            [EntryValue::Paired { first, second, .. }] => {
                assert_eq!(first.property, "propertyA");
                assert_eq!(second.property, "propertyB");
                assert_eq!(second.value, 3.0);
                assert!(second.interpolated);
                assert_eq!(second.units, Units::Px);
            }
            other => panic!("unexpected values {:?}", other),
        }
    }
}

#[test]
fn partner_gap_is_interpolated_across_layers() {
    let mut set = LayerSet::new("propertyA", line(0.0, 100.0));
    let a = set.active_id();
    set.set_sample_count(a, 3);
    // B only covers x = 50: a one-dot curve yields nothing, so give it a tiny span
    let b = set
        .add_layer_with(
            "propertyB",
            vec![Dot::new(50.0, 7.0, DotKind::Corner), Dot::new(50.001, 7.0, DotKind::Corner)],
        )
        .unwrap();
    set.set_sample_count(b, 3);
    set.set_units(b, Units::Deg);

    let entries = gen_keyframe_entries(&set, &registry(), &MergeConfig::default());
    let xs: Vec<f64> = entries.iter().map(|e| e.offset_percent).collect();
    assert_eq!(xs, vec![0.0, 50.0, 100.0]);

    let mid = &entries[1];
    assert_abs_diff_eq!(mid.value_of("propertyA").unwrap(), 50.0, epsilon = 1e-6);
    assert_eq!(mid.value_of("propertyB"), Some(7.0));
    match &mid.values[..] {
        [EntryValue::Paired { second, .. }] => {
            assert!(!second.interpolated);
            assert_eq!(second.units, Units::Deg);
        }
        other => panic!("unexpected values {:?}", other),
    }
    assert_eq!(entries[0].value_of("propertyB"), Some(7.0));
}

#[test]
fn unpaired_properties_pass_through_in_layer_order() {
    let mut set = LayerSet::new("opacity", line(1.0, 0.0));
    set.add_layer_with("rotate", line(0.0, 360.0)).unwrap();
    let entries = gen_keyframe_entries(&set, &PropertyRegistry::css(), &MergeConfig::default());
    assert_eq!(entries.len(), 10);
    let names: Vec<&str> = entries[0]
        .values
        .iter()
        .map(|v| match v {
            EntryValue::Single { property, .. } => property.as_str(),
            EntryValue::Paired { group, .. } => group.as_str(),
        })
        .collect();
    assert_eq!(names, vec!["opacity", "rotate"]);
    assert!(entries.windows(2).all(|w| w[0].offset_percent < w[1].offset_percent));
}
