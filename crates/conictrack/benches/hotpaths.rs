use std::f64::consts::PI;

use conictrack::conic::{fit_conic_irls, Ellipse, IrlsConfig};
use conictrack::robust::TukeyEstimator;
use conictrack::synth::{blur, render_ellipse};
use conictrack::{EllipseTracker, TrackerConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_ellipse_points(n: usize) -> Vec<[f64; 2]> {
    let e = Ellipse::new([512.0, 640.0], 17.5, 34.0, 0.31);
    let mut rng = StdRng::seed_from_u64(12345);
    (0..n)
        .map(|k| {
            let p = e.point_at(2.0 * PI * k as f64 / n as f64);
            [
                p[0] + rng.gen_range(-0.35f64..0.35f64),
                p[1] + rng.gen_range(-0.35f64..0.35f64),
            ]
        })
        .collect()
}

fn bench_irls_fit(c: &mut Criterion) {
    let points = make_ellipse_points(36);
    let cfg = IrlsConfig::default();
    let est = TukeyEstimator::new(cfg.noise_threshold);

    c.bench_function("irls_ellipse_36pts", |b| {
        b.iter(|| {
            let fit = fit_conic_irls(black_box(&points), false, &cfg, &est)
                .expect("deterministic fixture should always fit");
            black_box(fit.coeffs)
        })
    });

    c.bench_function("irls_circle_36pts", |b| {
        b.iter(|| {
            let fit = fit_conic_irls(black_box(&points), true, &cfg, &est)
                .expect("deterministic fixture should always fit");
            black_box(fit.coeffs)
        })
    });
}

fn bench_track_pass(c: &mut Criterion) {
    let e0 = Ellipse::new([240.0, 320.0], 60.0, 95.0, 0.5);
    let e1 = Ellipse::new([241.0, 319.0], 60.0, 95.0, 0.51);
    let frames = [
        blur(&render_ellipse(640, 480, &e0, 40, 210), 1.0),
        blur(&render_ellipse(640, 480, &e1, 40, 210), 1.0),
    ];
    let init: Vec<[f64; 2]> = [-170.0f64, -90.0, 0.0, 90.0, 170.0]
        .iter()
        .map(|d| e0.point_at(d.to_radians()))
        .collect();

    let mut tracker = EllipseTracker::new(TrackerConfig::default()).expect("default config is valid");
    tracker
        .init_tracking(&frames[0], &init)
        .expect("synthetic ellipse should initialize");

    let mut k = 0usize;
    c.bench_function("track_pass_640x480", |b| {
        b.iter(|| {
            k += 1;
            tracker
                .track(black_box(&frames[k % 2]))
                .expect("alternating frames should keep tracking");
            black_box(tracker.moments().m00)
        })
    });
}

criterion_group!(hotpaths, bench_irls_fit, bench_track_pass);
criterion_main!(hotpaths);
