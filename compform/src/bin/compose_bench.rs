use compform::config::{Config, Range, ShapeConfig};
use compform::model::{EndpointRef, LineDecl, Vec2};
use compform::{Composer, Composition};
use std::time::Instant;

fn build_grid_config(w: usize, h: usize, lines_target: u32) -> Config {
    let mut points = Vec::with_capacity(w * h);
    for j in 0..h { for i in 0..w { points.push(Vec2::new(i as f32 * 8.0, j as f32 * 6.0)); } }
    let mut lines = Vec::new();
    let idx = |i: usize, j: usize| EndpointRef::Index((j * w + i) as u32);
    for j in 0..h {
        for i in 0..w {
            if i + 1 < w { lines.push(LineDecl { start: idx(i, j), end: idx(i + 1, j) }); }
            if j + 1 < h { lines.push(LineDecl { start: idx(i, j), end: idx(i, j + 1) }); }
        }
    }
    Config {
        points,
        lines,
        number_of_lines: Range::new(lines_target as f32, lines_target as f32),
        miss_area: 2.0,
        shapes: vec![ShapeConfig { amount: Range::new(50.0, 50.0), ..ShapeConfig::default() }],
        ..Config::default()
    }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len()-1)]
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut grid = 40usize;
    let mut lines = 200u32;
    let mut passes = 200usize;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val)=a.strip_prefix("--grid=") { if let Ok(v)=val.parse() { grid=v; } }
        else if let Some(val)=a.strip_prefix("--lines=") { if let Ok(v)=val.parse() { lines=v; } }
        else if let Some(val)=a.strip_prefix("--passes=") { if let Ok(v)=val.parse() { passes=v; } }
        else if let Some(val)=a.strip_prefix("--assert-ms=") { if let Ok(v)=val.parse() { assert_ms=Some(v); } }
    }

    let base = build_grid_config(grid, grid, lines);
    let mut worst_median = 0.0f64;
    for policy in [Composition::Random, Composition::Branched, Composition::Sequential] {
        let cfg = Config { line_composition: policy, ..base.clone() };
        let mut composer = Composer::new(cfg, 0x5EED);
        let mut times_ms: Vec<f64> = Vec::with_capacity(passes);
        let mut selected = 0u64;
        let start_all = Instant::now();
        for _ in 0..passes {
            let t0 = Instant::now();
            let stats = composer.generate();
            times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
            selected += stats.selected as u64;
        }
        let dur_all = start_all.elapsed().as_secs_f64() * 1000.0;
        times_ms.sort_by(|a,b| a.total_cmp(b));
        let med = percentile(&times_ms, 0.5);
        let p90 = percentile(&times_ms, 0.9);
        let p99 = percentile(&times_ms, 0.99);
        worst_median = worst_median.max(med);
        println!("policy={:?} grid={} lines={} passes={} avg_selected={:.1} total_ms={:.3} median_ms={:.4} p90_ms={:.4} p99_ms={:.4}",
            policy, grid, lines, passes, selected as f64 / passes.max(1) as f64, dur_all, med, p90, p99);
    }
    if let Some(th) = assert_ms { if worst_median > th { eprintln!("FAIL: median {:.4} ms > threshold {:.3} ms", worst_median, th); std::process::exit(1); } }
}
