//! Conic model, least-squares fitting and ellipse geometry.
//!
//! Implements:
//! - The implicit conic `i² + K0·j² + 2·K1·i·j + 2·K2·i + 2·K3·j + K4 = 0`
//!   and its reduced circle form.
//! - Conversion from coefficients to center, semi-axes and rotation.
//! - Direct and iteratively reweighted (Tukey) least-squares fits.
//! - Closed-form area moments of the fitted ellipse.

mod fit;
mod moments;
mod types;

pub use fit::{fit_conic_direct, fit_conic_irls, MIN_FIT_POINTS};
pub use moments::Moments;
pub use types::{ConicCoeffs, Ellipse, IrlsConfig, IrlsFit};

pub(crate) use types::wrap_pi;
