//! Track a synthetic ellipse drifting across 30 frames and print its path.
//!
//! Run with `RUST_LOG=conictrack=debug` to see the per-frame stages.

use conictrack::synth::{blur, render_ellipse};
use conictrack::{Ellipse, EllipseTracker, TrackerConfig};

fn frame(k: usize) -> (Ellipse, image::GrayImage) {
    let t = k as f64;
    let e = Ellipse::new(
        [120.0 + 1.2 * t, 150.0 + 0.8 * t],
        38.0,
        62.0,
        0.3 + 0.015 * t,
    );
    let img = blur(&render_ellipse(360, 300, &e, 35, 220), 1.2);
    (e, img)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let (truth, first) = frame(0);
    let init: Vec<[f64; 2]> = [-160.0f64, -80.0, 0.0, 80.0, 160.0]
        .iter()
        .map(|d| truth.point_at(d.to_radians()))
        .collect();

    let mut tracker = EllipseTracker::new(TrackerConfig::default())?;
    tracker.init_tracking(&first, &init)?;

    for k in 1..30 {
        let (truth, img) = frame(k);
        tracker.track(&img)?;
        let g = tracker.geometry().ok_or("tracker has no geometry")?;
        let (a1, a2) = tracker.extremity_angles();
        println!(
            "frame {:2}: center ({:7.2}, {:7.2}) err {:.3} px, axes ({:.2}, {:.2}), arc {:5.1} deg",
            k,
            g.ic,
            g.jc,
            (g.ic - truth.ic).hypot(g.jc - truth.jc),
            g.a,
            g.b,
            (a2 - a1).to_degrees()
        );
    }
    Ok(())
}
