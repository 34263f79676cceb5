//! Draw the tracked contour onto an RGB frame.

use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_line_segment_mut};

use crate::search::SiteSearch;
use crate::tracker::EllipseTracker;

/// Angular length of one drawn arc segment (degrees).
const SEGMENT_DEG: f64 = 2.0;

/// RGB copy of a grayscale frame, for drawing.
pub fn gray_to_rgb(gray: &GrayImage) -> RgbImage {
    image::DynamicImage::ImageLuma8(gray.clone()).to_rgb8()
}

/// Draw the tracked arc, the center, the spokes to both extremities and a
/// cross at every valid site. Does nothing before initialization.
pub fn draw_overlay<S: SiteSearch>(canvas: &mut RgbImage, tracker: &EllipseTracker<S>, color: Rgb<u8>) {
    let Some(ellipse) = tracker.geometry() else {
        return;
    };
    let xy = |p: [f64; 2]| (p[1] as f32, p[0] as f32);

    let (alpha1, alpha2) = tracker.extremity_angles();
    let step = SEGMENT_DEG.to_radians();
    let segments = ((alpha2 - alpha1) / step).ceil().max(0.0) as usize;
    for k in 0..segments {
        let a0 = alpha1 + k as f64 * step;
        let a1 = (a0 + step).min(alpha2);
        draw_line_segment_mut(canvas, xy(ellipse.point_at(a0)), xy(ellipse.point_at(a1)), color);
    }

    let center = ellipse.center();
    let (p1, p2) = tracker.extremity_points();
    draw_line_segment_mut(canvas, xy(center), xy(p1), color);
    draw_line_segment_mut(canvas, xy(center), xy(p2), color);
    draw_cross_mut(canvas, color, center[1].round() as i32, center[0].round() as i32);

    for s in tracker.valid_sites() {
        let [i, j] = s.site.pixel;
        draw_cross_mut(canvas, color, j as i32, i as i32);
    }
}
