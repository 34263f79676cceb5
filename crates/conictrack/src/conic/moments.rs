//! Area moments of the region enclosed by an ellipse.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::types::Ellipse;

/// Raw and central area moments up to second order, in `(i, j)` order:
/// `m10 = ∫ i`, `m01 = ∫ j`, `m20 = ∫ i²`, `m02 = ∫ j²`, `m11 = ∫ i·j`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m20: f64,
    pub m02: f64,
    pub m11: f64,
    pub mu20: f64,
    pub mu02: f64,
    pub mu11: f64,
}

impl Ellipse {
    /// Closed-form moments of the filled ellipse.
    ///
    /// The central second moments are `m00/4 · (a²·u_a·u_aᵀ + b²·u_b·u_bᵀ)`
    /// with `u_a = (−sin e, cos e)` and `u_b = (cos e, sin e)`.
    pub fn moments(&self) -> Moments {
        let (c, s) = self.rotation_cs();
        let a2 = self.a * self.a;
        let b2 = self.b * self.b;

        let m00 = PI * self.a * self.b;
        let mu20 = m00 * (a2 * s * s + b2 * c * c) / 4.0;
        let mu02 = m00 * (a2 * c * c + b2 * s * s) / 4.0;
        let mu11 = m00 * c * s * (b2 - a2) / 4.0;

        let m10 = m00 * self.ic;
        let m01 = m00 * self.jc;
        Moments {
            m00,
            m10,
            m01,
            m20: mu20 + self.ic * m10,
            m02: mu02 + self.jc * m01,
            m11: mu11 + self.ic * m01,
            mu20,
            mu02,
            mu11,
        }
    }
}
