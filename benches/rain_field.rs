//! Benchmarks for the per-frame CPU work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;

use drizzle::config::RainConfig;
use drizzle::motion::DampingFilter;
use drizzle::projection::{project, StreakStyle};
use drizzle::rain::RainField;

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("rain_advance");

    for &(w, h) in &[(300.0, 400.0), (1280.0, 720.0), (2560.0, 1440.0)] {
        let mut field = RainField::seeded(RainConfig::default().with_density(80.0), 1);
        field.resize(w, h);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{} ({} drops)", w, h, field.len())),
            &(),
            |b, _| b.iter(|| field.advance(black_box(1.0 / 60.0))),
        );
    }

    group.finish();
}

fn bench_project(c: &mut Criterion) {
    let config = RainConfig::default().with_density(80.0);
    let style = StreakStyle::from(&config);
    let mut field = RainField::seeded(config, 1);
    field.resize(1280.0, 720.0);
    let size = field.last_size().unwrap_or_default();

    c.bench_function("project_1280x720", |b| {
        b.iter(|| black_box(project(field.drops(), size, &style, Vec2::new(3.0, -2.0))))
    });
}

fn bench_damping(c: &mut Criterion) {
    let mut filter = DampingFilter::new(1.5);
    c.bench_function("damping_update", |b| {
        b.iter(|| black_box(filter.update(black_box(0.3), black_box(-0.2), 1.0 / 60.0)))
    });
}

fn bench_regenerate(c: &mut Criterion) {
    let mut field = RainField::seeded(RainConfig::default().with_density(80.0), 1);
    let mut flip = false;

    c.bench_function("regenerate_1280x720", |b| {
        b.iter(|| {
            // Alternate sizes so every resize crosses the threshold.
            flip = !flip;
            let w = if flip { 1280.0 } else { 640.0 };
            black_box(field.resize(w, 720.0))
        })
    });
}

criterion_group!(benches, bench_advance, bench_project, bench_damping, bench_regenerate);
criterion_main!(benches);
