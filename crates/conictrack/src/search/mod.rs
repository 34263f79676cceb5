//! 1-D moving-edge search along site normals.
//!
//! A [`SiteSearch`] relocates one [`Site`] in a new image by scanning a short
//! segment along the site normal `(sin θ, cos θ)` and picking the strongest
//! admissible edge. [`track_sites`] is the per-frame pass that applies a
//! searcher to every valid site of a [`SiteRing`].

mod gradient;

pub use gradient::GradientSearch;

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::site::{Site, SiteRing};

/// Parameters of one 1-D edge search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Candidates are tried at integer offsets `-range..=range` (pixels).
    pub range: u32,
    /// Lower contrast-ratio tolerance: ratios must exceed `1 - mu1`.
    pub mu1: f64,
    /// Upper contrast-ratio tolerance: ratios must stay below `1 + mu2`.
    pub mu2: f64,
    /// Minimum absolute edge response (gray levels).
    pub threshold: f64,
    /// Half aperture of the derivative along the normal (pixels).
    pub half_width: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            range: 4,
            mu1: 0.5,
            mu2: 0.5,
            threshold: 20.0,
            half_width: 1.0,
        }
    }
}

impl SearchParams {
    /// Whether `response` is compatible with the reference contrast.
    ///
    /// Polarity must agree and `|response| / |reference|` must lie strictly
    /// inside `(1 - mu1, 1 + mu2)`.
    pub fn matches_reference(&self, response: f64, reference: f64) -> bool {
        if reference == 0.0 || response.signum() != reference.signum() {
            return false;
        }
        let ratio = response.abs() / reference.abs();
        ratio > 1.0 - self.mu1 && ratio < 1.0 + self.mu2
    }
}

/// Per-site edge search in a grayscale image.
pub trait SiteSearch {
    /// Relocate `site` in `image`, updating its position, contrast and state.
    ///
    /// With `use_reference` the site's stored contrast restricts which edges
    /// are admissible; without it (or without a stored contrast) the
    /// strongest edge above threshold is taken and becomes the new reference.
    fn search(&self, image: &GrayImage, site: &mut Site, params: &SearchParams, use_reference: bool);
}

/// Search every valid site of `ring` against its reference contrast.
///
/// Returns the number of sites that the search rejected.
pub fn track_sites<S: SiteSearch + ?Sized>(
    image: &GrayImage,
    ring: &mut SiteRing,
    searcher: &S,
    params: &SearchParams,
) -> usize {
    let mut rejected = 0;
    for entry in ring.iter_mut().filter(|e| e.site.is_valid()) {
        searcher.search(image, &mut entry.site, params, true);
        if !entry.site.is_valid() {
            rejected += 1;
        }
    }
    tracing::debug!(sites = ring.len(), rejected, "site search pass");
    rejected
}
