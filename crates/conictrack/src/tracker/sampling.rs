use image::GrayImage;

use super::EllipseTracker;
use crate::error::TrackError;
use crate::search::SiteSearch;
use crate::site::{in_image, Site};

impl<S: SiteSearch> EllipseTracker<S> {
    /// Rebuild the ring along the arc `[alpha1, alpha2)` at the configured
    /// angular step. Points outside the image are skipped; every new site is
    /// primed with a search that records its reference contrast.
    pub(super) fn sample(&mut self, image: &GrayImage) -> Result<(), TrackError> {
        let ellipse = self.model()?;
        let step = self.config.sample_step();
        let (cols, rows) = image.dimensions();

        self.ring.clear();
        for k in 0usize.. {
            let alpha = self.alpha1 + k as f64 * step;
            if !(alpha < self.alpha2) {
                break;
            }
            let p = ellipse.point_at(alpha);
            if !in_image(p, self.config.sample_border, rows, cols) {
                continue;
            }
            let mut site = Site::new(p, self.coeffs.tangent_angle(p));
            self.searcher.search(image, &mut site, &self.config.search, false);
            self.ring.push(site, alpha);
        }

        tracing::debug!(
            sites = self.ring.len(),
            valid = self.ring.valid_count(),
            "sampled arc"
        );
        Ok(())
    }

    /// Resample when fewer valid sites remain than `resample_ratio` of the
    /// count expected for the current arc. Returns whether it resampled.
    pub(super) fn resample(&mut self, image: &GrayImage) -> Result<bool, TrackError> {
        let expected = (self.alpha2 - self.alpha1) / self.config.sample_step();
        let valid = self.ring.valid_count();
        if (valid as f64) < self.config.resample_ratio * expected {
            tracing::debug!(valid, expected, "site density too low, resampling");
            self.sample(image)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Recompute every site's search orientation from the current conic.
    pub(super) fn update_theta(&mut self) {
        let coeffs = self.coeffs;
        for entry in self.ring.iter_mut() {
            entry.site.theta = coeffs.tangent_angle(entry.site.position());
        }
    }
}
