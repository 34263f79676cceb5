use image::GrayImage;

use super::{SearchParams, SiteSearch};
use crate::site::{Site, SiteState};

/// Central-difference edge search on bilinearly interpolated intensities.
///
/// The response at a candidate `q` is `I(q + h·n) − I(q − h·n)` in gray
/// levels, with `n` the site normal and `h` the configured half width. The
/// winning offset is refined to sub-pixel precision with a three-point
/// parabola through the absolute responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct GradientSearch;

impl GradientSearch {
    fn response(image: &GrayImage, p: [f64; 2], n: [f64; 2], h: f64) -> Option<f64> {
        let ahead = sample_bilinear(image, p[0] + h * n[0], p[1] + h * n[1])?;
        let behind = sample_bilinear(image, p[0] - h * n[0], p[1] - h * n[1])?;
        Some(ahead - behind)
    }
}

impl SiteSearch for GradientSearch {
    fn search(&self, image: &GrayImage, site: &mut Site, params: &SearchParams, use_reference: bool) {
        let (sin_t, cos_t) = site.theta.sin_cos();
        let n = [sin_t, cos_t];
        let range = params.range as i64;
        let reference = if use_reference {
            site.contrast.filter(|c| *c != 0.0)
        } else {
            None
        };

        let responses: Vec<Option<f64>> = (-range..=range)
            .map(|k| {
                let q = [site.i + k as f64 * n[0], site.j + k as f64 * n[1]];
                Self::response(image, q, n, params.half_width)
            })
            .collect();

        let mut any_inside = false;
        let mut any_strong = false;
        let mut best: Option<(usize, f64)> = None;
        for (idx, r) in responses.iter().enumerate() {
            let Some(r) = *r else { continue };
            any_inside = true;
            if r.abs() < params.threshold {
                continue;
            }
            any_strong = true;
            if let Some(reference) = reference {
                if !params.matches_reference(r, reference) {
                    continue;
                }
            }
            if best.map_or(true, |(_, b)| r.abs() > b.abs()) {
                best = Some((idx, r));
            }
        }

        let Some((idx, r)) = best else {
            site.state = if !any_inside {
                SiteState::OutOfImage
            } else if any_strong {
                SiteState::ContrastMismatch
            } else {
                SiteState::BelowThreshold
            };
            return;
        };

        let offset = (idx as i64 - range) as f64 + parabolic_offset(&responses, idx);
        site.set_position([site.i + offset * n[0], site.j + offset * n[1]]);
        site.contrast = Some(r);
        site.state = SiteState::Valid;
    }
}

/// Vertex of the parabola through `|r|` at `idx - 1`, `idx`, `idx + 1`.
fn parabolic_offset(responses: &[Option<f64>], idx: usize) -> f64 {
    if idx == 0 || idx + 1 >= responses.len() {
        return 0.0;
    }
    let (Some(ym1), Some(y0), Some(yp1)) = (responses[idx - 1], responses[idx], responses[idx + 1])
    else {
        return 0.0;
    };
    let (ym1, y0, yp1) = (ym1.abs(), y0.abs(), yp1.abs());
    let denom = ym1 - 2.0 * y0 + yp1;
    if denom.abs() < 1e-12 {
        0.0
    } else {
        (0.5 * (ym1 - yp1) / denom).clamp(-0.5, 0.5)
    }
}

/// Bilinear intensity at row `i`, column `j` in gray levels, or `None`
/// outside the interpolation domain.
pub(crate) fn sample_bilinear(image: &GrayImage, i: f64, j: f64) -> Option<f64> {
    let (w, h) = image.dimensions();
    if w < 2 || h < 2 || !(i >= 0.0) || !(j >= 0.0) {
        return None;
    }
    let j0 = j.floor() as u32;
    let i0 = i.floor() as u32;
    if j0 >= w - 1 || i0 >= h - 1 {
        return None;
    }
    let fj = j - j0 as f64;
    let fi = i - i0 as f64;
    let stride = w as usize;
    let idx00 = i0 as usize * stride + j0 as usize;
    let idx01 = idx00 + 1;
    let idx10 = idx00 + stride;
    let idx11 = idx10 + 1;

    let raw = image.as_raw();
    let p00 = raw[idx00] as f64;
    let p01 = raw[idx01] as f64;
    let p10 = raw[idx10] as f64;
    let p11 = raw[idx11] as f64;

    Some(
        (1.0 - fi) * (1.0 - fj) * p00
            + (1.0 - fi) * fj * p01
            + fi * (1.0 - fj) * p10
            + fi * fj * p11,
    )
}
