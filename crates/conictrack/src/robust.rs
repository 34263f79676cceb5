//! Robust M-estimator weights for iteratively reweighted least squares.

/// Maps a residual vector to per-sample weights in `[0, 1]`.
pub trait WeightEstimator {
    /// Compute weights for `residuals`; `iteration` is the IRLS pass index.
    fn weights(&self, residuals: &[f64], iteration: usize) -> Vec<f64>;
}

/// Tukey biweight constant (95% efficiency under Gaussian noise).
const TUKEY_C: f64 = 4.6851;
/// Converts the median absolute deviation to a Gaussian standard deviation.
const MAD_TO_SIGMA: f64 = 1.4826;

/// Tukey biweight with a MAD scale estimate.
///
/// Residuals are centered on their median; the scale is
/// `1.4826 · median(|r − median(r)|)`, floored at `noise_threshold`.
/// The weight is `(1 − (u/C)²)²` for `|u| <= C` and 0 beyond, with
/// `u = |r − median(r)| / scale`. The scale does not depend on the pass index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TukeyEstimator {
    /// Minimum scale, in residual units.
    pub noise_threshold: f64,
}

impl TukeyEstimator {
    pub fn new(noise_threshold: f64) -> Self {
        Self { noise_threshold }
    }

    /// Robust scale used for `residuals`.
    pub fn scale(&self, residuals: &[f64]) -> f64 {
        if residuals.is_empty() {
            return self.noise_threshold;
        }
        let med = median(residuals);
        let dev: Vec<f64> = residuals.iter().map(|r| (r - med).abs()).collect();
        (MAD_TO_SIGMA * median(&dev)).max(self.noise_threshold)
    }
}

impl WeightEstimator for TukeyEstimator {
    fn weights(&self, residuals: &[f64], _iteration: usize) -> Vec<f64> {
        if residuals.is_empty() {
            return Vec::new();
        }
        let med = median(residuals);
        let dev: Vec<f64> = residuals.iter().map(|r| (r - med).abs()).collect();
        let sigma = (MAD_TO_SIGMA * median(&dev)).max(self.noise_threshold);
        dev.iter().map(|&d| tukey_weight(d / sigma)).collect()
    }
}

fn tukey_weight(u: f64) -> f64 {
    if !u.is_finite() || u.abs() > TUKEY_C {
        return 0.0;
    }
    let t = u / TUKEY_C;
    let s = 1.0 - t * t;
    s * s
}

/// Lower median (element `⌈n/2⌉ − 1` of the sorted values).
pub(crate) fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut v = values.to_vec();
    let mid = (v.len() - 1) / 2;
    let (_, m, _) = v.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
    *m
}
