//! Synthetic imagery: anti-aliased filled ellipses and Gaussian blur.

use image::{GrayImage, ImageBuffer, Luma};

use crate::conic::Ellipse;

/// Sub-samples per pixel along each axis.
const SUPERSAMPLE: u32 = 4;

/// Render `ellipse` filled with `fg` on a `bg` background.
///
/// Pixel `(i, j)` covers `[i − ½, i + ½] × [j − ½, j + ½]`; its value is the
/// area-weighted mix of `fg` and `bg`, estimated on a 4×4 sub-pixel grid.
pub fn render_ellipse(width: u32, height: u32, ellipse: &Ellipse, fg: u8, bg: u8) -> GrayImage {
    let n = SUPERSAMPLE;
    let total = (n * n) as f64;
    let offsets: Vec<f64> = (0..n).map(|s| (s as f64 + 0.5) / n as f64 - 0.5).collect();
    let reach = ellipse.a.max(ellipse.b) + 1.0;

    GrayImage::from_fn(width, height, |x, y| {
        let (i, j) = (y as f64, x as f64);
        if (i - ellipse.ic).abs() > reach || (j - ellipse.jc).abs() > reach {
            return Luma([bg]);
        }
        let mut inside = 0u32;
        for di in &offsets {
            for dj in &offsets {
                if ellipse.contains([i + di, j + dj]) {
                    inside += 1;
                }
            }
        }
        let cover = inside as f64 / total;
        let v = bg as f64 + (fg as f64 - bg as f64) * cover;
        Luma([v.round().clamp(0.0, 255.0) as u8])
    })
}

/// Gaussian blur in gray-level units, requantized to `u8`.
pub fn blur(img: &GrayImage, sigma: f32) -> GrayImage {
    let levels: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_fn(img.width(), img.height(), |x, y| {
            Luma([img.get_pixel(x, y)[0] as f32])
        });
    let blurred = imageproc::filter::gaussian_blur_f32(&levels, sigma);
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        Luma([blurred.get_pixel(x, y)[0].round().clamp(0.0, 255.0) as u8])
    })
}
