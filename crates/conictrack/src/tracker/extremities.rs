use std::f64::consts::PI;

use image::GrayImage;

use super::EllipseTracker;
use crate::error::TrackError;
use crate::search::SiteSearch;
use crate::site::{in_image, Site};

/// Parametric resolution of the initial nearest-point search.
const ANGLE_SEARCH_STEPS: usize = 2000;

impl<S: SiteSearch> EllipseTracker<S> {
    /// Take the arc bounds from the sites with extreme angles.
    pub(super) fn set_extremities(&mut self) {
        if let Some(ext) = self.ring.extent() {
            self.alpha1 = ext.alpha1;
            self.alpha2 = ext.alpha2;
            self.p1 = ext.p1;
            self.p2 = ext.p2;
        }
    }

    /// Try to extend an open arc by a few candidates past each extremity.
    ///
    /// Accepted candidates join the ring; rejected sites are dropped from the
    /// ring afterwards. Returns the number of sites added.
    pub(super) fn seek_extremities(&mut self, image: &GrayImage) -> Result<usize, TrackError> {
        let seek = &self.config.seek;
        if self.alpha2 - self.alpha1 >= 2.0 * PI - seek.closing_gap_deg.to_radians() {
            return Ok(0);
        }

        let ellipse = self.model()?;
        let step = seek.step_deg.to_radians();
        let (cols, rows) = image.dimensions();
        let mut added = 0;
        for (origin, dir) in [(self.alpha1, -1.0), (self.alpha2, 1.0)] {
            for n in 1..=seek.steps {
                let alpha = origin + dir * n as f64 * step;
                let p = ellipse.point_at(alpha);
                if !in_image(p, self.config.seek_border, rows, cols) {
                    continue;
                }
                let mut site = Site::new(p, self.coeffs.tangent_angle(p));
                self.searcher.search(image, &mut site, &seek.search, false);
                if site.is_valid() {
                    self.ring.push(site, alpha);
                    added += 1;
                }
            }
        }

        let removed = self.ring.suppress_rejected();
        tracing::debug!(
            added,
            removed,
            arc_deg = (self.alpha2 - self.alpha1).to_degrees(),
            "extremity search"
        );
        Ok(added)
    }

    /// Set the arc bounds from the conic points nearest to `p1` and `p2`.
    ///
    /// `alpha2` is wrapped by a full turn when it does not exceed `alpha1`,
    /// so identical points select the full contour.
    pub(super) fn compute_angle(&mut self, p1: [f64; 2], p2: [f64; 2]) -> Result<(), TrackError> {
        let ellipse = self.model()?;
        let mut best1 = (f64::INFINITY, -PI);
        let mut best2 = (f64::INFINITY, -PI);
        for k in 0..ANGLE_SEARCH_STEPS {
            let alpha = -PI + 2.0 * PI * k as f64 / ANGLE_SEARCH_STEPS as f64;
            let q = ellipse.point_at(alpha);
            let d1 = (p1[0] - q[0]).powi(2) + (p1[1] - q[1]).powi(2);
            if d1 < best1.0 {
                best1 = (d1, alpha);
            }
            let d2 = (p2[0] - q[0]).powi(2) + (p2[1] - q[1]).powi(2);
            if d2 < best2.0 {
                best2 = (d2, alpha);
            }
        }

        self.alpha1 = best1.1;
        self.alpha2 = best2.1;
        if self.alpha2 <= self.alpha1 {
            self.alpha2 += 2.0 * PI;
        }
        self.p1 = p1;
        self.p2 = p2;
        tracing::debug!(
            alpha1 = self.alpha1,
            alpha2 = self.alpha2,
            "initial arc extremities"
        );
        Ok(())
    }
}
