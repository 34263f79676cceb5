use serde::{Deserialize, Serialize};

use crate::conic::IrlsConfig;
use crate::error::TrackError;
use crate::search::SearchParams;

/// Extension search past the arc extremities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekConfig {
    /// Angular step between extension candidates (degrees).
    pub step_deg: f64,
    /// Number of candidates tried beyond each extremity.
    pub steps: usize,
    /// The extension runs only while the arc leaves a gap of at least this
    /// many degrees.
    pub closing_gap_deg: f64,
    /// Search parameters used for extension candidates.
    pub search: SearchParams,
}

impl Default for SeekConfig {
    fn default() -> Self {
        Self {
            step_deg: 2.0,
            steps: 3,
            closing_gap_deg: 6.0,
            search: SearchParams {
                range: 2,
                mu1: 0.5,
                mu2: 0.5,
                ..SearchParams::default()
            },
        }
    }
}

/// Top-level tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Fit a circle (3 unknowns) instead of a general ellipse (5 unknowns).
    pub circle: bool,
    /// Angular step between sampled sites (degrees).
    pub sample_step_deg: f64,
    /// Extra margin (pixels) for sampled sites, on top of the fixed 2 px.
    pub sample_border: u32,
    /// Extra margin (pixels) for extension candidates.
    pub seek_border: u32,
    /// The ring is regenerated when fewer than this fraction of the expected
    /// sites survive.
    pub resample_ratio: f64,
    /// Per-frame site search.
    pub search: SearchParams,
    pub seek: SeekConfig,
    pub irls: IrlsConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            circle: false,
            sample_step_deg: 10.0,
            sample_border: 0,
            seek_border: 5,
            resample_ratio: 0.9,
            search: SearchParams::default(),
            seek: SeekConfig::default(),
            irls: IrlsConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Circle-tracking defaults.
    pub fn circle() -> Self {
        Self {
            circle: true,
            ..Self::default()
        }
    }

    /// Angular sampling step in radians.
    pub fn sample_step(&self) -> f64 {
        self.sample_step_deg.to_radians()
    }

    /// Minimum number of points for initialization.
    pub fn min_init_points(&self) -> usize {
        if self.circle {
            3
        } else {
            5
        }
    }

    /// Reject parameter values the tracker cannot work with.
    pub fn validate(&self) -> Result<(), TrackError> {
        if !(self.sample_step_deg > 0.0 && self.sample_step_deg < 360.0) {
            return Err(TrackError::invalid_config(format!(
                "sample_step_deg must be in (0, 360), got {}",
                self.sample_step_deg
            )));
        }
        if !(self.resample_ratio > 0.0 && self.resample_ratio <= 1.0) {
            return Err(TrackError::invalid_config(format!(
                "resample_ratio must be in (0, 1], got {}",
                self.resample_ratio
            )));
        }
        if !(self.seek.step_deg > 0.0) {
            return Err(TrackError::invalid_config(format!(
                "seek.step_deg must be positive, got {}",
                self.seek.step_deg
            )));
        }
        if self.irls.iterations == 0 {
            return Err(TrackError::invalid_config("irls.iterations must be at least 1"));
        }
        if !(self.irls.noise_threshold > 0.0) {
            return Err(TrackError::invalid_config(format!(
                "irls.noise_threshold must be positive, got {}",
                self.irls.noise_threshold
            )));
        }
        for (name, p) in [("search", &self.search), ("seek.search", &self.seek.search)] {
            if !(p.half_width > 0.0) {
                return Err(TrackError::invalid_config(format!(
                    "{}.half_width must be positive, got {}",
                    name, p.half_width
                )));
            }
            if !(p.mu1 >= 0.0 && p.mu1 <= 1.0 && p.mu2 >= 0.0) {
                return Err(TrackError::invalid_config(format!(
                    "{}.mu1 must be in [0, 1] and mu2 non-negative",
                    name
                )));
            }
        }
        Ok(())
    }
}
