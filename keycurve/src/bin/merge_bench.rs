use keycurve::{gen_keyframe_entries, Dot, DotKind, LayerSet, MergeConfig, PropertyRegistry};
use std::time::Instant;

const PROPS: [&str; 8] = ["translateX", "translateY", "scaleX", "scaleY", "rotate", "opacity", "left", "top"];

fn build_layers(layers: usize, dots: usize, samples: usize) -> LayerSet {
    let wave = |phase: f64| -> Vec<Dot> {
        (0..dots).map(|i| {
            let x = i as f64 * 100.0 / (dots - 1) as f64;
            let mut d = Dot::corner_with_span(x, 50.0 + 40.0 * (x * 0.1 + phase).sin(), 2.0);
            if i % 2 == 0 { d.kind = DotKind::Round; }
            d
        }).collect()
    };
    let mut set = LayerSet::new(PROPS[0], wave(0.0));
    for k in 1..layers.min(PROPS.len()) { set.add_layer_with(PROPS[k], wave(k as f64)); }
    for id in set.ids() { set.set_sample_count(id, samples); }
    set
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len()-1)]
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut layers = 8usize;
    let mut dots = 200usize;
    let mut samples = 50usize;
    let mut runs = 200usize;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val)=a.strip_prefix("--layers=") { if let Ok(v)=val.parse() { layers=v; } }
        else if let Some(val)=a.strip_prefix("--dots=") { if let Ok(v)=val.parse() { dots=v; } }
        else if let Some(val)=a.strip_prefix("--samples=") { if let Ok(v)=val.parse() { samples=v; } }
        else if let Some(val)=a.strip_prefix("--runs=") { if let Ok(v)=val.parse() { runs=v; } }
        else if let Some(val)=a.strip_prefix("--assert-ms=") { if let Ok(v)=val.parse() { assert_ms=Some(v); } }
    }
    let dots = dots.max(2);

    let set = build_layers(layers, dots, samples);
    let reg = PropertyRegistry::css();
    let cfg = MergeConfig::default();

    // each run drops the sample caches so sampling is measured too
    let mut times_ms: Vec<f64> = Vec::with_capacity(runs);
    let start_all = Instant::now();
    let mut entries = 0usize;
    for _ in 0..runs {
        let s = set.clone();
        s.invalidate_all();
        let t0 = Instant::now();
        entries = gen_keyframe_entries(&s, &reg, &cfg).len();
        times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
    }
    let dur_all = start_all.elapsed().as_secs_f64() * 1000.0;
    times_ms.sort_by(|a,b| a.total_cmp(b));
    let med = percentile(&times_ms, 0.5);
    let p90 = percentile(&times_ms, 0.9);
    let p99 = percentile(&times_ms, 0.99);
    println!("layers={} dots={} samples={} runs={} entries={} total_ms={:.3} median_ms={:.4} p90_ms={:.4} p99_ms={:.4}", set.len(), dots, samples, runs, entries, dur_all, med, p90, p99);
    if let Some(th) = assert_ms { if med > th { eprintln!("FAIL: median {:.4} ms > threshold {:.3} ms", med, th); std::process::exit(1); } }
}
