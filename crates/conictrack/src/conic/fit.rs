//! Linear least-squares conic fits: direct solve and robust IRLS.
//!
//! Ellipse rows are `[j², 2ij, 2i, 2j, 1]` against `−i²`; circle rows are
//! `[2i, 2j, 1]` against `−i² − j²`. Systems are solved through an SVD
//! pseudo-inverse whose singular-value cutoff is relative to the largest
//! singular value.

use nalgebra::{DMatrix, DVector};

use super::types::{ConicCoeffs, IrlsConfig, IrlsFit};
use crate::error::TrackError;
use crate::robust::WeightEstimator;

/// Minimum number of points accepted by the robust fit.
pub const MIN_FIT_POINTS: usize = 3;

/// Build the linear system `A·x = b` for `points`.
pub(crate) fn design_system(points: &[[f64; 2]], circle: bool) -> (DMatrix<f64>, DVector<f64>) {
    let n = points.len();
    let cols = if circle { 3 } else { 5 };
    let mut a = DMatrix::<f64>::zeros(n, cols);
    let mut b = DVector::<f64>::zeros(n);
    for (r, &[i, j]) in points.iter().enumerate() {
        if circle {
            a[(r, 0)] = 2.0 * i;
            a[(r, 1)] = 2.0 * j;
            a[(r, 2)] = 1.0;
            b[r] = -i * i - j * j;
        } else {
            a[(r, 0)] = j * j;
            a[(r, 1)] = 2.0 * i * j;
            a[(r, 2)] = 2.0 * i;
            a[(r, 3)] = 2.0 * j;
            a[(r, 4)] = 1.0;
            b[r] = -i * i;
        }
    }
    (a, b)
}

/// Minimum-norm least-squares solution through a truncated SVD.
///
/// Returns the solution and the number of singular values kept.
pub(crate) fn solve_pseudo_inverse(
    a: DMatrix<f64>,
    b: &DVector<f64>,
    rel_tolerance: f64,
) -> (DVector<f64>, usize) {
    let cols = a.ncols();
    let svd = a.svd(true, true);
    let s_max = svd.singular_values.iter().cloned().fold(0.0f64, f64::max);
    let eps = (s_max * rel_tolerance).max(0.0);
    let rank = svd.singular_values.iter().filter(|&&s| s > eps).count();
    match svd.solve(b, eps) {
        Ok(x) => (x, rank),
        // U and V are always requested above.
        Err(_) => (DVector::zeros(cols), 0),
    }
}

fn coeffs_from_solution(x: &DVector<f64>, circle: bool) -> ConicCoeffs {
    if circle {
        ConicCoeffs::circle(x[0], x[1], x[2])
    } else {
        ConicCoeffs::new([x[0], x[1], x[2], x[3], x[4]])
    }
}

/// Unweighted fit through exactly the given points.
///
/// Needs 5 points for an ellipse and 3 for a circle. The result is not
/// checked for being a real ellipse; call [`ConicCoeffs::to_ellipse`].
pub fn fit_conic_direct(
    points: &[[f64; 2]],
    circle: bool,
    rel_tolerance: f64,
) -> Result<ConicCoeffs, TrackError> {
    let needed = if circle { 3 } else { 5 };
    if points.len() < needed {
        return Err(TrackError::InsufficientPoints {
            needed,
            got: points.len(),
        });
    }
    let (a, b) = design_system(points, circle);
    let (x, rank) = solve_pseudo_inverse(a, &b, rel_tolerance);
    if rank < x.len() {
        tracing::warn!(
            rank,
            unknowns = x.len(),
            "initial conic system is rank deficient"
        );
    }
    Ok(coeffs_from_solution(&x, circle))
}

/// Iteratively reweighted least-squares conic fit.
///
/// Each pass solves `pinv(D·A)·D·b`, computes `b − A·x` and replaces the
/// diagonal of `D` with the estimator's weights. The returned weights are
/// those produced by the last pass.
pub fn fit_conic_irls(
    points: &[[f64; 2]],
    circle: bool,
    config: &IrlsConfig,
    estimator: &dyn WeightEstimator,
) -> Result<IrlsFit, TrackError> {
    if points.len() < MIN_FIT_POINTS {
        return Err(TrackError::InsufficientPoints {
            needed: MIN_FIT_POINTS,
            got: points.len(),
        });
    }

    let (a, b) = design_system(points, circle);
    let unknowns = a.ncols();
    let mut weights = vec![1.0; points.len()];
    let mut x = DVector::<f64>::zeros(unknowns);
    let mut rank = unknowns;

    for iter in 0..config.iterations.max(1) {
        let mut da = a.clone();
        let mut db = b.clone();
        for (r, &w) in weights.iter().enumerate() {
            for c in 0..unknowns {
                da[(r, c)] *= w;
            }
            db[r] *= w;
        }

        let (sol, kept) = solve_pseudo_inverse(da, &db, config.pinv_tolerance);
        x = sol;
        rank = kept;

        let residual = &b - &a * &x;
        weights = estimator.weights(residual.as_slice(), iter);

        tracing::trace!(
            iter,
            rank,
            rejected = weights.iter().filter(|&&w| w < config.outlier_weight).count(),
            "irls pass"
        );
    }

    Ok(IrlsFit {
        coeffs: coeffs_from_solution(&x, circle),
        weights,
        rank,
        unknowns,
    })
}
