//! Conic coefficients, geometric ellipse parameters and IRLS settings.
//!
//! All points are `[i, j]` in image row/column order.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::TrackError;

// ── Types ──────────────────────────────────────────────────────────────────

/// Implicit conic `i² + K0·j² + 2·K1·i·j + 2·K2·i + 2·K3·j + K4 = 0`.
///
/// With `circle` set, `K0 = 1` and `K1 = 0` are held fixed and only
/// `K2..K4` are estimated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConicCoeffs {
    /// Coefficients `[K0, K1, K2, K3, K4]`.
    pub k: [f64; 5],
    /// Reduced circle model.
    pub circle: bool,
}

/// Geometric ellipse derived from [`ConicCoeffs`].
///
/// The parametrization used across the tracker is
/// `p(α) = c + b·cos(α)·(cos e, sin e) + a·sin(α)·(−sin e, cos e)`,
/// so `a` lies along `(−sin e, cos e)` and `b` along `(cos e, sin e)`.
/// Fitted ellipses always have `a <= b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    /// Center row.
    pub ic: f64,
    /// Center column.
    pub jc: f64,
    /// Semi-axis along `(−sin e, cos e)`.
    pub a: f64,
    /// Semi-axis along `(cos e, sin e)`.
    pub b: f64,
    /// Rotation in `[0, π)`.
    pub e: f64,
    cos_e: f64,
    sin_e: f64,
}

/// Settings of the iteratively reweighted least-squares conic fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IrlsConfig {
    /// Number of reweighting passes.
    pub iterations: usize,
    /// Sites whose final weight falls below this are flagged as outliers.
    pub outlier_weight: f64,
    /// Relative singular-value cutoff of the pseudo-inverse.
    pub pinv_tolerance: f64,
    /// Lower bound of the robust scale estimate (algebraic residual units).
    pub noise_threshold: f64,
}

impl Default for IrlsConfig {
    fn default() -> Self {
        Self {
            iterations: 4,
            outlier_weight: 0.2,
            pinv_tolerance: 1e-26,
            noise_threshold: 2.0,
        }
    }
}

/// Outcome of [`fit_conic_irls`](super::fit_conic_irls).
#[derive(Debug, Clone)]
pub struct IrlsFit {
    /// Fitted coefficients.
    pub coeffs: ConicCoeffs,
    /// Final robust weight of every input point, in input order.
    pub weights: Vec<f64>,
    /// Numerical rank of the last weighted system.
    pub rank: usize,
    /// Number of unknowns (5 for an ellipse, 3 for a circle).
    pub unknowns: usize,
}

impl IrlsFit {
    /// The last solve truncated at least one singular value.
    pub fn is_rank_deficient(&self) -> bool {
        self.rank < self.unknowns
    }

    /// Number of points whose weight is below `limit`.
    pub fn count_below(&self, limit: f64) -> usize {
        self.weights.iter().filter(|&&w| w < limit).count()
    }
}

// ── Conic ──────────────────────────────────────────────────────────────────

impl ConicCoeffs {
    /// General (ellipse) model.
    pub fn new(k: [f64; 5]) -> Self {
        Self { k, circle: false }
    }

    /// Circle `i² + j² + 2·K2·i + 2·K3·j + K4 = 0`.
    pub fn circle(k2: f64, k3: f64, k4: f64) -> Self {
        Self {
            k: [1.0, 0.0, k2, k3, k4],
            circle: true,
        }
    }

    /// `K1² − K0`; negative for an ellipse.
    pub fn discriminant(&self) -> f64 {
        let [k0, k1, ..] = self.k;
        k1 * k1 - k0
    }

    /// Check whether the conic is an ellipse.
    pub fn is_ellipse(&self) -> bool {
        self.discriminant() < 0.0
    }

    /// Value of the implicit polynomial at `p`.
    pub fn algebraic_distance(&self, p: [f64; 2]) -> f64 {
        let [k0, k1, k2, k3, k4] = self.k;
        let [i, j] = p;
        i * i + k0 * j * j + 2.0 * k1 * i * j + 2.0 * k2 * i + 2.0 * k3 * j + k4
    }

    /// Partial derivatives `(∂/∂i, ∂/∂j)` at `p`.
    pub fn gradient(&self, p: [f64; 2]) -> [f64; 2] {
        let [k0, k1, k2, k3, _] = self.k;
        let [i, j] = p;
        [
            2.0 * i + 2.0 * k1 * j + 2.0 * k2,
            2.0 * k0 * j + 2.0 * k1 * i + 2.0 * k3,
        ]
    }

    /// Orientation in `[0, π)` of the site at `p`.
    ///
    /// This is `atan2(∂/∂i, ∂/∂j)`; the 1-D edge search runs along
    /// `(sin θ, cos θ)`, which is the conic normal.
    pub fn tangent_angle(&self, p: [f64; 2]) -> f64 {
        let [gi, gj] = self.gradient(p);
        wrap_pi(gi.atan2(gj))
    }

    /// Derive center, semi-axes and rotation.
    ///
    /// Fails when the conic is not a real ellipse: non-negative
    /// discriminant, non-positive or non-finite squared semi-axes.
    pub fn to_ellipse(&self) -> Result<Ellipse, TrackError> {
        if self.k.iter().any(|v| !v.is_finite()) {
            return Err(TrackError::degenerate("non-finite coefficients"));
        }
        let [k0, k1, k2, k3, k4] = self.k;

        let d = k1 * k1 - k0;
        if d >= 0.0 {
            return Err(TrackError::degenerate(format!(
                "discriminant K1²−K0 = {:.3e} is not negative",
                d
            )));
        }

        let ic = (k0 * k2 - k1 * k3) / d;
        let jc = (k3 - k1 * k2) / d;

        let sq = ((k0 - 1.0).powi(2) + 4.0 * k1 * k1).sqrt();
        let e = if self.circle {
            0.0
        } else {
            rotation_from_quadratic(k0, k1, sq)
        };

        let num = 2.0 * (ic * ic + 2.0 * k1 * ic * jc + k0 * jc * jc - k4);
        let a2 = num / (1.0 + k0 + sq);
        let b2 = num / (1.0 + k0 - sq);
        if !(a2 > 0.0 && b2 > 0.0 && a2.is_finite() && b2.is_finite()) {
            return Err(TrackError::degenerate(format!(
                "squared semi-axes ({:.3e}, {:.3e}) are not positive",
                a2, b2
            )));
        }

        let ellipse = Ellipse::new([ic, jc], a2.sqrt(), b2.sqrt(), e);
        if !ellipse.is_valid() {
            return Err(TrackError::degenerate("non-finite geometry"));
        }
        Ok(ellipse)
    }
}

impl std::fmt::Display for ConicCoeffs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [k0, k1, k2, k3, k4] = self.k;
        write!(
            f,
            "K = [{:.6e}, {:.6e}, {:.6e}, {:.6e}, {:.6e}]{}",
            k0,
            k1,
            k2,
            k3,
            k4,
            if self.circle { " (circle)" } else { "" }
        )
    }
}

/// Rotation `e` such that `(−sin e, cos e)` is the eigenvector of the
/// largest eigenvalue of `[[1, K1], [K1, K0]]`.
///
/// Two algebraically equivalent eigenvector forms are compared and the
/// better-conditioned one is used; isotropic quadratic parts give `e = 0`.
fn rotation_from_quadratic(k0: f64, k1: f64, sq: f64) -> f64 {
    let v1 = [2.0 * k1, k0 - 1.0 + sq];
    let v2 = [1.0 - k0 + sq, 2.0 * k1];
    let n1 = v1[0].hypot(v1[1]);
    let n2 = v2[0].hypot(v2[1]);
    let v = if n1 >= n2 { v1 } else { v2 };
    if n1.max(n2) <= 1e-12 * (1.0 + k0.abs()) {
        return 0.0;
    }
    wrap_pi((-v[0]).atan2(v[1]))
}

/// Wrap an angle into `[0, π)`.
pub(crate) fn wrap_pi(angle: f64) -> f64 {
    let mut t = angle % PI;
    if t < 0.0 {
        t += PI;
    }
    if t >= PI {
        t -= PI;
    }
    // Turns −0.0 into +0.0.
    t + 0.0
}

// ── Ellipse ────────────────────────────────────────────────────────────────

impl Ellipse {
    /// Build from center `[ic, jc]`, semi-axes and rotation.
    pub fn new(center: [f64; 2], a: f64, b: f64, e: f64) -> Self {
        Self {
            ic: center[0],
            jc: center[1],
            a,
            b,
            e,
            cos_e: e.cos(),
            sin_e: e.sin(),
        }
    }

    /// Center as `[i, j]`.
    pub fn center(&self) -> [f64; 2] {
        [self.ic, self.jc]
    }

    /// Cached `(cos e, sin e)`.
    pub fn rotation_cs(&self) -> (f64, f64) {
        (self.cos_e, self.sin_e)
    }

    /// Check basic validity: positive semi-axes, finite values.
    pub fn is_valid(&self) -> bool {
        self.a > 0.0
            && self.b > 0.0
            && self.a.is_finite()
            && self.b.is_finite()
            && self.ic.is_finite()
            && self.jc.is_finite()
            && self.e.is_finite()
    }

    /// Point at parametric angle `alpha`.
    pub fn point_at(&self, alpha: f64) -> [f64; 2] {
        let j0 = self.a * alpha.sin();
        let i0 = self.b * alpha.cos();
        [
            self.ic - self.sin_e * j0 + self.cos_e * i0,
            self.jc + self.cos_e * j0 + self.sin_e * i0,
        ]
    }

    /// Sample `n` points uniformly in parametric angle.
    pub fn sample_points(&self, n: usize) -> Vec<[f64; 2]> {
        (0..n)
            .map(|k| self.point_at(2.0 * PI * (k as f64) / (n as f64)))
            .collect()
    }

    /// Whether `p` lies inside or on the ellipse.
    pub fn contains(&self, p: [f64; 2]) -> bool {
        let di = p[0] - self.ic;
        let dj = p[1] - self.jc;
        let u = di * self.cos_e + dj * self.sin_e;
        let v = -di * self.sin_e + dj * self.cos_e;
        (u / self.b).powi(2) + (v / self.a).powi(2) <= 1.0
    }

    /// Implicit form normalized so that the `i²` coefficient is 1.
    pub fn to_conic(&self, circle: bool) -> ConicCoeffs {
        let (c, s) = (self.cos_e, self.sin_e);
        let ia2 = 1.0 / (self.a * self.a);
        let ib2 = 1.0 / (self.b * self.b);

        let m_ii = c * c * ib2 + s * s * ia2;
        let m_ij = c * s * (ib2 - ia2);
        let m_jj = s * s * ib2 + c * c * ia2;

        let mc_i = m_ii * self.ic + m_ij * self.jc;
        let mc_j = m_ij * self.ic + m_jj * self.jc;
        let cmc = self.ic * mc_i + self.jc * mc_j;

        ConicCoeffs {
            k: [
                m_jj / m_ii,
                m_ij / m_ii,
                -mc_i / m_ii,
                -mc_j / m_ii,
                (cmc - 1.0) / m_ii,
            ],
            circle,
        }
    }
}
