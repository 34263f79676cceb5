//! Frame-to-frame ellipse tracking.
//!
//! [`EllipseTracker`] owns the conic model, the arc extremities and the ring
//! of boundary sites. Each call to [`EllipseTracker::track`] runs the
//! per-frame pipeline:
//!
//! 1. site search against the reference contrast
//! 2. drop rejected sites, update extremities, robust refit
//! 3. extend the arc past its extremities, update extremities, robust refit
//! 4. drop outliers, update extremities, resample if the ring is sparse
//! 5. refresh site orientations and area moments

mod config;
mod extremities;
mod sampling;

pub use config::{SeekConfig, TrackerConfig};

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::conic::{fit_conic_direct, fit_conic_irls, ConicCoeffs, Ellipse, IrlsFit, Moments, MIN_FIT_POINTS};
use crate::error::TrackError;
use crate::robust::TukeyEstimator;
use crate::search::{track_sites, GradientSearch, SiteSearch};
use crate::site::{SampledSite, SiteRing};
use crate::{FrameResult, GeometryParams};

/// Lifecycle of a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackState {
    Uninitialized,
    /// Model fitted from the initial points; first pass not yet complete.
    Initialized,
    Tracking,
    /// A frame failed; the tracker must be re-initialized.
    Lost,
}

/// Moving-edge tracker for one elliptical or circular contour.
#[derive(Debug)]
pub struct EllipseTracker<S: SiteSearch = GradientSearch> {
    config: TrackerConfig,
    searcher: S,
    estimator: TukeyEstimator,
    state: TrackState,
    coeffs: ConicCoeffs,
    ellipse: Option<Ellipse>,
    alpha1: f64,
    alpha2: f64,
    p1: [f64; 2],
    p2: [f64; 2],
    ring: SiteRing,
    moments: Moments,
    last_fit: Option<IrlsFit>,
    frame: u64,
}

impl EllipseTracker<GradientSearch> {
    /// Tracker using the built-in [`GradientSearch`].
    pub fn new(config: TrackerConfig) -> Result<Self, TrackError> {
        Self::with_searcher(config, GradientSearch)
    }
}

impl<S: SiteSearch> EllipseTracker<S> {
    /// Tracker with a custom per-site search.
    pub fn with_searcher(config: TrackerConfig, searcher: S) -> Result<Self, TrackError> {
        config.validate()?;
        let estimator = TukeyEstimator::new(config.irls.noise_threshold);
        let coeffs = unfitted_coeffs(config.circle);
        Ok(Self {
            coeffs,
            config,
            searcher,
            estimator,
            state: TrackState::Uninitialized,
            ellipse: None,
            alpha1: 0.0,
            alpha2: 2.0 * std::f64::consts::PI,
            p1: [0.0; 2],
            p2: [0.0; 2],
            ring: SiteRing::new(),
            moments: Moments::default(),
            last_fit: None,
            frame: 0,
        })
    }

    /// Initialize from boundary points picked in `image`.
    ///
    /// Needs at least 5 points (3 in circle mode). The conic is fitted
    /// through the points directly, the tracked arc runs from the first to
    /// the last point in increasing parametric angle, and one full tracking
    /// pass is run on `image`. On failure the tracker is left uninitialized.
    pub fn init_tracking(&mut self, image: &GrayImage, points: &[[f64; 2]]) -> Result<(), TrackError> {
        let result = self.try_init(image, points);
        match &result {
            Ok(()) => {
                self.state = TrackState::Tracking;
                if let Some(e) = &self.ellipse {
                    tracing::info!(
                        center_i = e.ic,
                        center_j = e.jc,
                        a = e.a,
                        b = e.b,
                        sites = self.ring.len(),
                        "tracker initialized"
                    );
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "tracker initialization failed");
                self.reset();
            }
        }
        result
    }

    fn try_init(&mut self, image: &GrayImage, points: &[[f64; 2]]) -> Result<(), TrackError> {
        let needed = self.config.min_init_points();
        let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
            return Err(TrackError::InsufficientPoints { needed, got: 0 });
        };
        if points.len() < needed {
            return Err(TrackError::InsufficientPoints {
                needed,
                got: points.len(),
            });
        }

        let coeffs = fit_conic_direct(points, self.config.circle, self.config.irls.pinv_tolerance)?;
        self.commit(coeffs)?;
        self.compute_angle(first, last)?;
        self.frame = 0;
        self.last_fit = None;
        self.state = TrackState::Initialized;

        self.sample(image)?;
        self.track_frame(image)
    }

    fn reset(&mut self) {
        self.state = TrackState::Uninitialized;
        self.coeffs = unfitted_coeffs(self.config.circle);
        self.ellipse = None;
        self.ring.clear();
        self.last_fit = None;
        self.moments = Moments::default();
        self.frame = 0;
    }

    /// Track the contour into the next frame.
    ///
    /// Any failure is fatal for the track: the tracker moves to
    /// [`TrackState::Lost`] and later calls return [`TrackError::Lost`].
    pub fn track(&mut self, image: &GrayImage) -> Result<(), TrackError> {
        match self.state {
            TrackState::Uninitialized => return Err(TrackError::NotInitialized),
            TrackState::Lost => return Err(TrackError::Lost),
            TrackState::Initialized | TrackState::Tracking => {}
        }
        self.frame += 1;
        match self.track_frame(image) {
            Ok(()) => {
                self.state = TrackState::Tracking;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(frame = self.frame, error = %err, "contour lost");
                self.state = TrackState::Lost;
                Err(err)
            }
        }
    }

    fn track_frame(&mut self, image: &GrayImage) -> Result<(), TrackError> {
        track_sites(image, &mut self.ring, &self.searcher, &self.config.search);
        self.suppress_points();
        self.set_extremities();
        self.least_square()?;

        self.seek_extremities(image)?;
        self.set_extremities();
        self.least_square()?;

        self.suppress_points();
        self.set_extremities();
        self.resample(image)?;
        self.update_theta();
        self.compute_moments()?;

        tracing::debug!(
            frame = self.frame,
            sites = self.ring.len(),
            alpha1 = self.alpha1,
            alpha2 = self.alpha2,
            "frame tracked"
        );
        Ok(())
    }

    /// Robust refit from the valid sites; low-weight sites become outliers.
    fn least_square(&mut self) -> Result<(), TrackError> {
        let points = self.ring.valid_points();
        if points.len() < MIN_FIT_POINTS {
            return Err(TrackError::InsufficientPoints {
                needed: MIN_FIT_POINTS,
                got: points.len(),
            });
        }

        let fit = fit_conic_irls(&points, self.config.circle, &self.config.irls, &self.estimator)?;
        if fit.is_rank_deficient() {
            tracing::warn!(
                rank = fit.rank,
                unknowns = fit.unknowns,
                points = points.len(),
                "robust conic system is rank deficient"
            );
        }
        self.commit(fit.coeffs)?;

        let outliers = self.ring.mark_outliers(&fit.weights, self.config.irls.outlier_weight);
        tracing::trace!(points = points.len(), outliers, "robust refit");
        self.last_fit = Some(fit);
        Ok(())
    }

    /// Replace the model; geometry is rederived and must be a real ellipse.
    fn commit(&mut self, coeffs: ConicCoeffs) -> Result<(), TrackError> {
        let ellipse = coeffs.to_ellipse()?;
        self.coeffs = coeffs;
        self.ellipse = Some(ellipse);
        Ok(())
    }

    fn compute_moments(&mut self) -> Result<(), TrackError> {
        self.moments = self.model()?.moments();
        Ok(())
    }

    fn suppress_points(&mut self) -> usize {
        let removed = self.ring.suppress_rejected();
        if removed > 0 {
            tracing::trace!(removed, remaining = self.ring.len(), "suppressed sites");
        }
        removed
    }

    fn model(&self) -> Result<Ellipse, TrackError> {
        self.ellipse.ok_or(TrackError::NotInitialized)
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn state(&self) -> TrackState {
        self.state
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Current conic coefficients.
    pub fn coeffs(&self) -> &ConicCoeffs {
        &self.coeffs
    }

    /// Current ellipse geometry, once initialized.
    pub fn geometry(&self) -> Option<&Ellipse> {
        self.ellipse.as_ref()
    }

    /// Area moments computed at the end of the last frame.
    pub fn moments(&self) -> &Moments {
        &self.moments
    }

    /// Image points at the two arc extremities.
    pub fn extremity_points(&self) -> ([f64; 2], [f64; 2]) {
        (self.p1, self.p2)
    }

    /// Parametric angles `(alpha1, alpha2)` bounding the tracked arc.
    pub fn extremity_angles(&self) -> (f64, f64) {
        (self.alpha1, self.alpha2)
    }

    /// All sites currently in the ring.
    pub fn sites(&self) -> &[SampledSite] {
        self.ring.entries()
    }

    pub fn valid_sites(&self) -> impl Iterator<Item = &SampledSite> {
        self.ring.iter().filter(|e| e.site.is_valid())
    }

    /// Report of the last robust refit.
    pub fn last_fit(&self) -> Option<&IrlsFit> {
        self.last_fit.as_ref()
    }

    /// Index of the last tracked frame; the initialization pass is frame 0.
    pub fn frame_index(&self) -> u64 {
        self.frame
    }

    /// Serializable snapshot of the current frame.
    pub fn frame_result(&self) -> Option<FrameResult> {
        let ellipse = self.ellipse.as_ref()?;
        Some(FrameResult {
            frame: self.frame,
            state: self.state,
            geometry: GeometryParams::from(ellipse),
            coeffs: self.coeffs,
            moments: self.moments,
            extremities: [self.p1, self.p2],
            extremity_angles: [self.alpha1, self.alpha2],
            sites: self.ring.len(),
            outliers: self
                .last_fit
                .as_ref()
                .map_or(0, |f| f.count_below(self.config.irls.outlier_weight)),
        })
    }
}

/// Unit circle held as K before the first fit and after a reset.
fn unfitted_coeffs(circle: bool) -> ConicCoeffs {
    ConicCoeffs {
        k: [1.0, 0.0, 0.0, 0.0, -1.0],
        circle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::{Site, SiteState};
    use crate::test_utils::{blurred_ellipse_image, points_at_degrees};
    use approx::assert_relative_eq;
    use image::Luma;
    use std::cell::Cell;
    use std::f64::consts::PI;

    /// Accepts every site where it is and counts the calls.
    #[derive(Default)]
    struct CountingSearch {
        calls: Cell<usize>,
    }

    impl SiteSearch for CountingSearch {
        fn search(&self, _: &GrayImage, site: &mut Site, _: &crate::search::SearchParams, _: bool) {
            self.calls.set(self.calls.get() + 1);
            site.state = SiteState::Valid;
        }
    }

    fn truth() -> Ellipse {
        Ellipse::new([100.0, 110.0], 35.0, 60.0, 0.4)
    }

    fn assert_close(got: &Ellipse, want: &Ellipse, center_tol: f64, axis_tol: f64) {
        assert!(
            (got.ic - want.ic).abs() < center_tol && (got.jc - want.jc).abs() < center_tol,
            "center ({:.3}, {:.3}) vs ({:.3}, {:.3})",
            got.ic,
            got.jc,
            want.ic,
            want.jc
        );
        assert!((got.a - want.a).abs() < axis_tol, "a {:.3} vs {:.3}", got.a, want.a);
        assert!((got.b - want.b).abs() < axis_tol, "b {:.3} vs {:.3}", got.b, want.b);
    }

    /// Tracker holding `ellipse` as its model, without any image pass.
    fn seeded<S: SiteSearch>(config: TrackerConfig, searcher: S, ellipse: Ellipse) -> EllipseTracker<S> {
        let mut t = EllipseTracker::with_searcher(config, searcher).unwrap();
        t.commit(ellipse.to_conic(false)).unwrap();
        t.state = TrackState::Tracking;
        t
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = TrackerConfig {
            resample_ratio: 0.0,
            ..TrackerConfig::default()
        };
        assert!(matches!(
            EllipseTracker::new(cfg),
            Err(TrackError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn track_before_init_fails() {
        let mut t = EllipseTracker::new(TrackerConfig::default()).unwrap();
        let img = GrayImage::new(50, 50);
        assert_eq!(t.track(&img), Err(TrackError::NotInitialized));
        assert_eq!(t.state(), TrackState::Uninitialized);
        assert!(t.frame_result().is_none());
    }

    #[test]
    fn init_needs_enough_points() {
        let e = truth();
        let img = blurred_ellipse_image(220, 220, &e);
        let pts = points_at_degrees(&e, &[-170.0, -90.0, 0.0, 90.0]);
        let mut t = EllipseTracker::new(TrackerConfig::default()).unwrap();
        assert_eq!(
            t.init_tracking(&img, &pts),
            Err(TrackError::InsufficientPoints { needed: 5, got: 4 })
        );
        assert_eq!(t.state(), TrackState::Uninitialized);
        assert_eq!(
            t.init_tracking(&img, &[]),
            Err(TrackError::InsufficientPoints { needed: 5, got: 0 })
        );
    }

    #[test]
    fn init_rejects_degenerate_points() {
        // Five points on the hyperbola (i − 50)² − (j − 50)² = 100.
        let img = GrayImage::from_pixel(100, 100, Luma([200]));
        let pts: Vec<[f64; 2]> = [0.0f64, 5.0, -5.0, 10.0, -10.0]
            .iter()
            .map(|&dj| [50.0 + (100.0 + dj * dj).sqrt(), 50.0 + dj])
            .collect();
        let mut t = EllipseTracker::new(TrackerConfig::default()).unwrap();
        assert!(matches!(
            t.init_tracking(&img, &pts),
            Err(TrackError::DegenerateConic { .. })
        ));
        assert_eq!(t.state(), TrackState::Uninitialized);
        assert!(t.geometry().is_none());
        assert!(t.sites().is_empty());
    }

    #[test]
    fn failed_init_on_blank_frame_restores_unfitted_model() {
        let e = truth();
        let pts = points_at_degrees(&e, &[-170.0, -90.0, 0.0, 90.0, 170.0]);
        let blank = GrayImage::from_pixel(220, 220, Luma([200]));
        let mut t = EllipseTracker::new(TrackerConfig::default()).unwrap();
        assert_eq!(
            t.init_tracking(&blank, &pts),
            Err(TrackError::InsufficientPoints { needed: 3, got: 0 })
        );
        assert_eq!(t.state(), TrackState::Uninitialized);
        assert!(t.geometry().is_none());
        assert_eq!(*t.coeffs(), unfitted_coeffs(false));
        assert!(t.sites().is_empty());

        let mut c = EllipseTracker::new(TrackerConfig::circle()).unwrap();
        assert!(c.init_tracking(&blank, &pts[..3]).is_err());
        assert_eq!(*c.coeffs(), unfitted_coeffs(true));
    }

    #[test]
    fn init_locks_onto_synthetic_ellipse() {
        let e = truth();
        let img = blurred_ellipse_image(220, 220, &e);
        let pts = points_at_degrees(&e, &[-170.0, -90.0, 0.0, 90.0, 170.0]);
        let mut t = EllipseTracker::new(TrackerConfig::default()).unwrap();
        t.init_tracking(&img, &pts).unwrap();

        assert_eq!(t.state(), TrackState::Tracking);
        assert_eq!(t.frame_index(), 0);
        let g = t.geometry().unwrap();
        assert_close(g, &e, 0.5, 1.0);
        assert!((g.e - e.e).abs() < 0.03, "rotation {}", g.e);
        assert!(t.valid_sites().count() >= 30);
        assert_relative_eq!(t.moments().m00, PI * e.a * e.b, max_relative = 0.05);

        // Every site sits on the fitted contour.
        for s in t.sites() {
            let d = t.coeffs().algebraic_distance(s.site.position()).abs();
            let grad = t.coeffs().gradient(s.site.position());
            let dist = d / grad[0].hypot(grad[1]);
            assert!(dist < 1.5, "site {:?} is {:.2} px off", s.site.position(), dist);
        }
    }

    #[test]
    fn follows_moving_ellipse() {
        let mut e = truth();
        let img = blurred_ellipse_image(220, 220, &e);
        let pts = points_at_degrees(&e, &[-170.0, -90.0, 0.0, 90.0, 170.0]);
        let mut t = EllipseTracker::new(TrackerConfig::default()).unwrap();
        t.init_tracking(&img, &pts).unwrap();

        for frame in 1..=6 {
            e = Ellipse::new([e.ic + 1.5, e.jc - 1.0], e.a, e.b, e.e + 0.02);
            let img = blurred_ellipse_image(220, 220, &e);
            t.track(&img).unwrap();
            assert_eq!(t.frame_index(), frame);
            assert_close(t.geometry().unwrap(), &e, 0.6, 1.0);
        }
        assert!((t.geometry().unwrap().e - e.e).abs() < 0.03);
        let result = t.frame_result().unwrap();
        assert_eq!(result.frame, 6);
        assert_eq!(result.state, TrackState::Tracking);
        assert_eq!(result.sites, t.sites().len());
    }

    #[test]
    fn circle_mode_tracks_disk() {
        let mut e = Ellipse::new([90.0, 100.0], 40.0, 40.0, 0.0);
        let img = blurred_ellipse_image(200, 200, &e);
        let pts = points_at_degrees(&e, &[-150.0, 0.0, 150.0]);
        let mut t = EllipseTracker::new(TrackerConfig::circle()).unwrap();
        t.init_tracking(&img, &pts).unwrap();
        assert!(t.coeffs().circle);
        assert_eq!(t.coeffs().k[0], 1.0);
        assert_eq!(t.coeffs().k[1], 0.0);

        for _ in 0..4 {
            e = Ellipse::new([e.ic + 2.0, e.jc + 1.0], 40.0, 40.0, 0.0);
            t.track(&blurred_ellipse_image(200, 200, &e)).unwrap();
        }
        let g = t.geometry().unwrap();
        assert_close(g, &e, 0.5, 0.8);
        assert_relative_eq!(g.a, g.b, epsilon = 1e-9);
    }

    #[test]
    fn open_arc_grows_toward_closure() {
        let e = truth();
        let img = blurred_ellipse_image(220, 220, &e);
        let pts = points_at_degrees(&e, &[-150.0, -90.0, 0.0, 90.0, 150.0]);
        let mut t = EllipseTracker::new(TrackerConfig::default()).unwrap();
        t.init_tracking(&img, &pts).unwrap();
        let (a1, a2) = t.extremity_angles();
        let first = a2 - a1;
        assert!(first > 300f64.to_radians() + 1e-6, "arc {}", first.to_degrees());

        for _ in 0..8 {
            t.track(&img).unwrap();
        }
        let (a1, a2) = t.extremity_angles();
        assert!(a2 - a1 >= 354f64.to_radians() - 1e-9, "arc {}", (a2 - a1).to_degrees());
        assert!(a2 - a1 <= 2.0 * PI + 12f64.to_radians() + 1e-9);
    }

    #[test]
    fn blank_frame_loses_track() {
        let e = truth();
        let img = blurred_ellipse_image(220, 220, &e);
        let pts = points_at_degrees(&e, &[-170.0, -90.0, 0.0, 90.0, 170.0]);
        let mut t = EllipseTracker::new(TrackerConfig::default()).unwrap();
        t.init_tracking(&img, &pts).unwrap();
        let before = *t.geometry().unwrap();

        let blank = GrayImage::from_pixel(220, 220, Luma([200]));
        assert!(matches!(
            t.track(&blank),
            Err(TrackError::InsufficientPoints { needed: 3, got: 0 })
        ));
        assert_eq!(t.state(), TrackState::Lost);
        assert_eq!(*t.geometry().unwrap(), before);
        assert_eq!(t.track(&img), Err(TrackError::Lost));

        t.init_tracking(&img, &pts).unwrap();
        assert_eq!(t.state(), TrackState::Tracking);
    }

    #[test]
    fn resample_threshold_boundary() {
        let e = truth();
        let img = blurred_ellipse_image(220, 220, &e);
        let cfg = TrackerConfig {
            sample_step_deg: 1.0,
            ..TrackerConfig::default()
        };
        let mut t = seeded(cfg, CountingSearch::default(), e);
        t.alpha1 = 0.0;
        t.alpha2 = 100f64.to_radians();

        let fill = |t: &mut EllipseTracker<CountingSearch>, valid: usize| {
            t.ring.clear();
            for k in 0..valid + 5 {
                let mut s = Site::new([50.0, 50.0], 0.0);
                if k >= valid {
                    s.state = SiteState::Outlier;
                }
                t.ring.push(s, 0.5 + k as f64);
            }
        };

        fill(&mut t, 90);
        let before = t.ring.entries().to_vec();
        assert!(!t.resample(&img).unwrap());
        assert_eq!(t.ring.entries(), &before[..]);
        assert_eq!(t.searcher.calls.get(), 0);

        fill(&mut t, 89);
        assert!(t.resample(&img).unwrap());
        assert_eq!(t.ring.len(), 100);
        assert_eq!(t.searcher.calls.get(), 100);
        assert_eq!(t.ring.entries()[0].alpha, 0.0);
        assert!(t.ring.iter().all(|s| s.site.is_valid()));
    }

    #[test]
    fn sampling_skips_points_outside_image() {
        // Center near the left border: part of the contour leaves the image.
        let e = Ellipse::new([60.0, 20.0], 25.0, 40.0, 0.0);
        let img = GrayImage::from_pixel(120, 120, Luma([200]));
        let mut t = seeded(TrackerConfig::default(), CountingSearch::default(), e);
        t.alpha1 = 0.0;
        t.alpha2 = 2.0 * PI;
        t.sample(&img).unwrap();
        assert!(t.ring.len() < 36);
        assert!(t.ring.len() > 10);
        for s in t.ring.iter() {
            assert!(crate::site::in_image(s.site.position(), 0, 120, 120));
            assert_relative_eq!(
                s.site.theta,
                t.coeffs.tangent_angle(s.site.position()),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn extension_fires_only_on_open_arcs() {
        let e = truth();
        let img = GrayImage::from_pixel(220, 220, Luma([200]));

        let mut open = seeded(TrackerConfig::default(), CountingSearch::default(), e);
        open.alpha1 = 0.0;
        open.alpha2 = 350f64.to_radians();
        open.ring.push(Site::new(e.point_at(0.0), 0.0), 0.0);
        let added = open.seek_extremities(&img).unwrap();
        assert_eq!(added, 6);
        assert_eq!(open.searcher.calls.get(), 6);
        let mut angles: Vec<f64> = open.ring.iter().map(|s| s.alpha.to_degrees()).collect();
        angles.sort_by(f64::total_cmp);
        let want = [-6.0, -4.0, -2.0, 0.0, 352.0, 354.0, 356.0];
        for (got, want) in angles.iter().zip(want.iter()) {
            assert_relative_eq!(*got, *want, epsilon = 1e-9);
        }

        let mut closed = seeded(TrackerConfig::default(), CountingSearch::default(), e);
        closed.alpha1 = 0.0;
        closed.alpha2 = 358f64.to_radians();
        assert_eq!(closed.seek_extremities(&img).unwrap(), 0);
        assert_eq!(closed.searcher.calls.get(), 0);
    }

    #[test]
    fn extremities_follow_ring() {
        let e = truth();
        let mut t = seeded(TrackerConfig::default(), CountingSearch::default(), e);
        t.alpha1 = 9.0;
        t.alpha2 = 9.0;
        t.set_extremities();
        assert_eq!(t.extremity_angles(), (9.0, 9.0));

        t.ring.push(Site::new([1.0, 2.0], 0.0), 0.3);
        t.ring.push(Site::new([3.0, 4.0], 0.0), -0.2);
        t.ring.push(Site::new([5.0, 6.0], 0.0), 1.1);
        t.set_extremities();
        assert_eq!(t.extremity_angles(), (-0.2, 1.1));
        assert_eq!(t.extremity_points(), ([3.0, 4.0], [5.0, 6.0]));
    }

    #[test]
    fn angle_search_orders_extremities() {
        let e = truth();
        let mut t = seeded(TrackerConfig::default(), CountingSearch::default(), e);

        t.compute_angle(e.point_at(-1.0), e.point_at(2.0)).unwrap();
        let step = 2.0 * PI / 2000.0;
        assert!((t.alpha1 + 1.0).abs() <= step);
        assert!((t.alpha2 - 2.0).abs() <= step);

        // Last point before the first one: the arc wraps through ±π.
        t.compute_angle(e.point_at(2.5), e.point_at(-2.5)).unwrap();
        assert!((t.alpha1 - 2.5).abs() <= step);
        assert!((t.alpha2 - (2.0 * PI - 2.5)).abs() <= step);

        // Same point twice: the full contour.
        t.compute_angle(e.point_at(0.7), e.point_at(0.7)).unwrap();
        assert_relative_eq!(t.alpha2 - t.alpha1, 2.0 * PI, epsilon = 1e-12);
    }
}
