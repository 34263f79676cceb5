//! Tracked boundary samples and the ordered ring that holds them.

use serde::{Deserialize, Serialize};

/// Why a site is excluded from geometry use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteState {
    /// Tracked and usable.
    Valid,
    /// Edge found but its contrast does not match the reference.
    ContrastMismatch,
    /// No candidate reached the contrast threshold.
    BelowThreshold,
    /// Down-weighted by the robust fit.
    Outlier,
    /// Search window left the image.
    OutOfImage,
}

impl SiteState {
    /// Any state but `Valid`.
    pub fn is_suppressed(self) -> bool {
        self != SiteState::Valid
    }
}

/// One tracked boundary sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Sub-pixel row.
    pub i: f64,
    /// Sub-pixel column.
    pub j: f64,
    /// Rounded `[row, column]`.
    pub pixel: [i64; 2],
    /// Search orientation: the 1-D search runs along `(sin θ, cos θ)`.
    pub theta: f64,
    pub state: SiteState,
    /// Signed edge response at the last accepted position.
    pub contrast: Option<f64>,
}

impl Site {
    pub fn new(p: [f64; 2], theta: f64) -> Self {
        Self {
            i: p[0],
            j: p[1],
            pixel: [p[0].round() as i64, p[1].round() as i64],
            theta,
            state: SiteState::Valid,
            contrast: None,
        }
    }

    pub fn position(&self) -> [f64; 2] {
        [self.i, self.j]
    }

    pub fn set_position(&mut self, p: [f64; 2]) {
        self.i = p[0];
        self.j = p[1];
        self.pixel = [p[0].round() as i64, p[1].round() as i64];
    }

    pub fn is_valid(&self) -> bool {
        !self.state.is_suppressed()
    }
}

/// A site together with its parametric angle on the conic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampledSite {
    pub site: Site,
    pub alpha: f64,
}

/// Angular extent of the ring: the sites with smallest and largest angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcExtent {
    pub alpha1: f64,
    pub p1: [f64; 2],
    pub alpha2: f64,
    pub p2: [f64; 2],
}

/// Ordered sequence of tracked sites.
///
/// Every site is stored with its parametric angle, so insertion and removal
/// keep both in lockstep.
#[derive(Debug, Clone, Default)]
pub struct SiteRing {
    entries: Vec<SampledSite>,
}

impl SiteRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn push(&mut self, site: Site, alpha: f64) {
        self.entries.push(SampledSite { site, alpha });
    }

    pub fn entries(&self) -> &[SampledSite] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SampledSite> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, SampledSite> {
        self.entries.iter_mut()
    }

    /// Number of non-suppressed sites.
    pub fn valid_count(&self) -> usize {
        self.entries.iter().filter(|e| e.site.is_valid()).count()
    }

    /// Positions of the non-suppressed sites, in ring order.
    pub fn valid_points(&self) -> Vec<[f64; 2]> {
        self.entries
            .iter()
            .filter(|e| e.site.is_valid())
            .map(|e| e.site.position())
            .collect()
    }

    /// Drop every suppressed site. Returns how many were removed.
    pub fn suppress_rejected(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.site.is_valid());
        before - self.entries.len()
    }

    /// Flag valid sites whose weight is below `limit` as outliers.
    ///
    /// `weights` is aligned with [`valid_points`](Self::valid_points).
    /// Returns the number of sites flagged.
    pub fn mark_outliers(&mut self, weights: &[f64], limit: f64) -> usize {
        let mut flagged = 0;
        let valid = self.entries.iter_mut().filter(|e| e.site.is_valid());
        for (entry, &w) in valid.zip(weights.iter()) {
            if w < limit {
                entry.site.state = SiteState::Outlier;
                flagged += 1;
            }
        }
        flagged
    }

    /// Sites with minimum and maximum angle; the first occurrence wins ties.
    pub fn extent(&self) -> Option<ArcExtent> {
        let first = self.entries.first()?;
        let mut lo = first;
        let mut hi = first;
        for e in &self.entries[1..] {
            if e.alpha < lo.alpha {
                lo = e;
            }
            if e.alpha > hi.alpha {
                hi = e;
            }
        }
        Some(ArcExtent {
            alpha1: lo.alpha,
            p1: lo.site.position(),
            alpha2: hi.alpha,
            p2: hi.site.position(),
        })
    }
}

/// Bounds test on rounded coordinates: `p` is inside a `rows × cols` image
/// when it keeps a margin of more than `border + 2` pixels from every edge.
pub fn in_image(p: [f64; 2], border: u32, rows: u32, cols: u32) -> bool {
    if !p[0].is_finite() || !p[1].is_finite() {
        return false;
    }
    let i = p[0].round() as i64;
    let j = p[1].round() as i64;
    let m = border as i64 + 2;
    i > m && i < rows as i64 - m && j > m && j < cols as i64 - m
}
