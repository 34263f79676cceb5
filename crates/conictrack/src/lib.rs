//! conictrack — moving-edge tracker for elliptical and circular contours.
//!
//! A contour is modeled as the conic
//! `i² + K0·j² + 2·K1·i·j + 2·K2·i + 2·K3·j + K4 = 0` in image row/column
//! coordinates. The tracker keeps a ring of boundary sites along the conic,
//! relocates them in every new frame with a 1-D edge search along the conic
//! normal and refits the conic with a Tukey-weighted IRLS solve.
//!
//! The per-frame stages are:
//!
//! 1. **Search** – each site moves to the best edge within a few pixels.
//! 2. **Fit** – robust least squares; low-weight sites become outliers.
//! 3. **Extremities** – open arcs are extended past their ends.
//! 4. **Resample** – the ring is regenerated when too many sites are lost.
//!
//! # Public API
//! - [`EllipseTracker`] with [`TrackerConfig`] as the entry point
//! - [`SiteSearch`] to plug in a custom edge search
//! - conic fitting primitives and result structures
//!
//! # Example
//!
//! ```no_run
//! use conictrack::{EllipseTracker, TrackerConfig};
//!
//! let frames: Vec<image::GrayImage> = Vec::new();
//! let init = [[40.0, 80.0], [80.0, 120.0], [120.0, 80.0], [80.0, 40.0], [52.0, 52.0]];
//! let mut tracker = EllipseTracker::new(TrackerConfig::default())?;
//! tracker.init_tracking(&frames[0], &init)?;
//! for frame in &frames[1..] {
//!     tracker.track(frame)?;
//!     if let Some(e) = tracker.geometry() {
//!         println!("center ({:.2}, {:.2})", e.ic, e.jc);
//!     }
//! }
//! # Ok::<(), conictrack::TrackError>(())
//! ```

pub mod conic;
mod error;
pub mod overlay;
pub mod robust;
pub mod search;
pub mod site;
pub mod synth;
mod tracker;

#[cfg(test)]
pub(crate) mod test_utils;

pub use conic::{ConicCoeffs, Ellipse, IrlsConfig, IrlsFit, Moments};
pub use error::TrackError;
pub use overlay::draw_overlay;
pub use search::{GradientSearch, SearchParams, SiteSearch};
pub use site::{SampledSite, Site, SiteState};
pub use tracker::{EllipseTracker, SeekConfig, TrackState, TrackerConfig};

/// Ellipse geometry for serialization.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeometryParams {
    /// Center `[i, j]` (row, column).
    pub center: [f64; 2],
    /// Semi-axes `[a, b]`; `a` lies along `(−sin e, cos e)`.
    pub semi_axes: [f64; 2],
    /// Rotation `e` in radians, in `[0, π)`.
    pub rotation: f64,
}

impl From<&Ellipse> for GeometryParams {
    fn from(e: &Ellipse) -> Self {
        Self {
            center: e.center(),
            semi_axes: [e.a, e.b],
            rotation: e.e,
        }
    }
}

impl From<Ellipse> for GeometryParams {
    fn from(e: Ellipse) -> Self {
        Self::from(&e)
    }
}

impl From<&GeometryParams> for Ellipse {
    fn from(p: &GeometryParams) -> Self {
        Ellipse::new(p.center, p.semi_axes[0].abs(), p.semi_axes[1].abs(), p.rotation)
    }
}

/// Tracker output for one frame.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FrameResult {
    /// Frame index; the initialization pass is frame 0.
    pub frame: u64,
    pub state: TrackState,
    pub geometry: GeometryParams,
    pub coeffs: ConicCoeffs,
    pub moments: Moments,
    /// Image points `[p1, p2]` at the arc extremities.
    pub extremities: [[f64; 2]; 2],
    /// Parametric angles `[alpha1, alpha2]` of the arc extremities.
    pub extremity_angles: [f64; 2],
    /// Sites in the ring after the frame.
    pub sites: usize,
    /// Sites flagged as outliers by the last robust refit.
    pub outliers: usize,
}
