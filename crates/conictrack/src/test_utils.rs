//! Shared helpers for image-based unit tests.

use image::GrayImage;

use crate::conic::Ellipse;
use crate::synth::{blur, render_ellipse};

/// Dark ellipse on a bright background, blurred with σ = 1 px.
pub(crate) fn blurred_ellipse_image(w: u32, h: u32, ellipse: &Ellipse) -> GrayImage {
    blur(&render_ellipse(w, h, ellipse, 40, 210), 1.0)
}

/// Boundary points at the given parametric angles (degrees).
pub(crate) fn points_at_degrees(ellipse: &Ellipse, degrees: &[f64]) -> Vec<[f64; 2]> {
    degrees
        .iter()
        .map(|d| ellipse.point_at(d.to_radians()))
        .collect()
}
