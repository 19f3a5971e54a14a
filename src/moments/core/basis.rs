//! Spherical-harmonic basis evaluation.
//!
//! Purpose
//! -------
//! Evaluate the orthonormal spherical harmonics `Y_L^M(θ, φ)` (Condon–Shortley
//! phase included) for every moment of a [`MomentIndices`] set. This is the
//! single basis implementation shared by the moment estimator and the
//! acceptance integral matrix.
//!
//! Key behaviors
//! -------------
//! - [`SphericalHarmonicBasis::evaluate_all`] fills a caller-provided buffer
//!   with all `Y_L^M` of one event in linear-index order. It is the hot path
//!   and performs no allocation.
//! - [`SphericalHarmonicBasis::evaluate`] returns a single `Y_L^M` through the
//!   same recursion.
//! - [`moment_factor`] returns the `sqrt(4π/(2L+1))` factor that turns
//!   `Y_L^M` into a moment contribution normalized to `H(0 0) = N`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Normalized associated-Legendre functions `P̄_L^M` are generated by the
//!   recursion
//!   - `P̄_0^0 = 1/sqrt(4π)`,
//!   - `P̄_M^M = −sqrt((2M+1)/(2M)) · sinθ · P̄_{M−1}^{M−1}`,
//!   - `P̄_{M+1}^M = sqrt(2M+3) · cosθ · P̄_M^M`,
//!   - `P̄_L^M = a_LM (cosθ · P̄_{L−1}^M − b_LM · P̄_{L−2}^M)` with
//!     `a_LM = sqrt((4L²−1)/(L²−M²))`,
//!     `b_LM = sqrt(((L−1)²−M²)/(4(L−1)²−1))`,
//!
//!   so no factorials are formed and the values stay bounded up to
//!   `MAX_SUPPORTED_L`.
//! - `Y_L^M = P̄_L^M(cosθ) · e^{iMφ}`; only `M ≥ 0` is evaluated.
//!
//! Conventions
//! -----------
//! - Angles are in radians with `θ ∈ [0, π]`; callers obtain them from an
//!   [`EventSample`](crate::moments::core::data::EventSample).
//!
//! Testing notes
//! -------------
//! - Unit tests compare against closed forms for `L ≤ 2`, check the
//!   Condon–Shortley sign, and verify orthonormality by quadrature.
use crate::moments::{
    core::index::{MomentIndex, MomentIndices},
    errors::MomentResult,
};
use num_complex::Complex64;
use std::f64::consts::PI;

/// `sqrt(4π/(2L+1))`, the factor applied to `Y_L^M` in a moment sum.
pub fn moment_factor(l: usize) -> f64 {
    (4.0 * PI / (2 * l + 1) as f64).sqrt()
}

/// SphericalHarmonicBasis — `Y_L^M` evaluator for a fixed moment set.
///
/// Fields
/// ------
/// - `indices`: [`MomentIndices`]
///   Moment set covered by [`evaluate_all`](Self::evaluate_all).
///
/// Notes
/// -----
/// - Two bases compare equal iff they cover the same moment set; moments and
///   integral matrices store their basis so mismatches are detectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SphericalHarmonicBasis {
    indices: MomentIndices,
}

impl SphericalHarmonicBasis {
    pub fn new(indices: MomentIndices) -> Self {
        SphericalHarmonicBasis { indices }
    }

    pub fn indices(&self) -> &MomentIndices {
        &self.indices
    }

    pub fn max_l(&self) -> usize {
        self.indices.max_l()
    }

    /// Number of basis functions.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Evaluate every `Y_L^M` of the moment set at one point.
    ///
    /// Parameters
    /// ----------
    /// - `theta`: `f64`
    ///   Polar angle in radians.
    /// - `phi`: `f64`
    ///   Azimuthal angle in radians.
    /// - `out`: `&mut [Complex64]`
    ///   Output buffer; `out[i(L, M)] = Y_L^M(θ, φ)`.
    ///
    /// Panics
    /// ------
    /// - Panics if `out.len() != self.len()`. Buffers are sized from the same
    ///   basis, so a mismatch is a programming error.
    ///
    /// Notes
    /// -----
    /// - Cost is `O(n)` per event with one `sin`/`cos` pair per `M`.
    pub fn evaluate_all(&self, theta: f64, phi: f64, out: &mut [Complex64]) {
        assert_eq!(out.len(), self.len(), "basis buffer length mismatch");
        let max_l = self.indices.max_l();
        let (sin_theta, cos_theta) = theta.sin_cos();

        let mut p_mm = 1.0 / (4.0 * PI).sqrt();
        for m in 0..=max_l {
            if m > 0 {
                let mf = m as f64;
                p_mm *= -((2.0 * mf + 1.0) / (2.0 * mf)).sqrt() * sin_theta;
            }
            let phase = Complex64::from_polar(1.0, m as f64 * phi);
            out[linear(m, m)] = phase * p_mm;
            if m == max_l {
                break;
            }

            let mut p_prev = p_mm;
            let mut p_curr = (2.0 * m as f64 + 3.0).sqrt() * cos_theta * p_mm;
            out[linear(m + 1, m)] = phase * p_curr;

            for l in (m + 2)..=max_l {
                let (lf, mf) = (l as f64, m as f64);
                let a = ((4.0 * lf * lf - 1.0) / (lf * lf - mf * mf)).sqrt();
                let lm1 = lf - 1.0;
                let b = ((lm1 * lm1 - mf * mf) / (4.0 * lm1 * lm1 - 1.0)).sqrt();
                let p_next = a * (cos_theta * p_curr - b * p_prev);
                p_prev = p_curr;
                p_curr = p_next;
                out[linear(l, m)] = phase * p_curr;
            }
        }
    }

    /// Evaluate a single `Y_L^M`.
    ///
    /// Errors
    /// ------
    /// - `MomentError::IndexOutOfRange`
    ///   Returned when `idx` is not part of this basis.
    pub fn evaluate(&self, theta: f64, phi: f64, idx: MomentIndex) -> MomentResult<Complex64> {
        let linear_idx = self.indices.linear(idx)?;
        let sub = SphericalHarmonicBasis::new(MomentIndices::from_max_l_unchecked(idx.l));
        let mut buf = vec![Complex64::new(0.0, 0.0); sub.len()];
        sub.evaluate_all(theta, phi, &mut buf);
        Ok(buf[linear_idx])
    }
}

fn linear(l: usize, m: usize) -> usize {
    l * (l + 1) / 2 + m
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement with closed-form `Y_L^M` for `L ≤ 2` at several points.
    // - The Condon–Shortley sign of `Y_1^1`.
    // - Orthonormality over the sphere by quadrature for `Lmax = 4`.
    // - Index validation in `evaluate`.
    // -------------------------------------------------------------------------

    fn closed_form(l: usize, m: usize, theta: f64, phi: f64) -> Complex64 {
        let (s, c) = theta.sin_cos();
        let phase = Complex64::from_polar(1.0, m as f64 * phi);
        let p = match (l, m) {
            (0, 0) => (1.0 / (4.0 * PI)).sqrt(),
            (1, 0) => (3.0 / (4.0 * PI)).sqrt() * c,
            (1, 1) => -(3.0 / (8.0 * PI)).sqrt() * s,
            (2, 0) => (5.0 / (16.0 * PI)).sqrt() * (3.0 * c * c - 1.0),
            (2, 1) => -(15.0 / (8.0 * PI)).sqrt() * s * c,
            (2, 2) => (15.0 / (32.0 * PI)).sqrt() * s * s,
            _ => unreachable!(),
        };
        phase * p
    }

    #[test]
    // Purpose
    // -------
    // Verify the recursion against textbook closed forms.
    //
    // Given
    // -----
    // - `Lmax = 2` and a grid of `(θ, φ)` including the poles.
    //
    // Expect
    // ------
    // - Every entry matches its closed form to 1e-14.
    fn evaluate_all_matches_closed_forms() {
        let basis = SphericalHarmonicBasis::new(MomentIndices::new(2).unwrap());
        let mut buf = vec![Complex64::new(0.0, 0.0); basis.len()];
        for &theta in &[0.0, 0.3, 1.1, PI / 2.0, 2.5, PI] {
            for &phi in &[-PI, -0.7, 0.0, 1.9] {
                basis.evaluate_all(theta, phi, &mut buf);
                for idx in basis.indices().iter() {
                    let expected = closed_form(idx.l, idx.m, theta, phi);
                    let got = buf[idx.linear()];
                    assert_relative_eq!(got.re, expected.re, epsilon = 1e-14);
                    assert_relative_eq!(got.im, expected.im, epsilon = 1e-14);
                }
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Pin the Condon–Shortley phase.
    //
    // Given
    // -----
    // - `Y_1^1` at `θ = π/2`, `φ = 0`.
    //
    // Expect
    // ------
    // - Real part equals `−sqrt(3/(8π))`, imaginary part zero.
    fn y11_carries_condon_shortley_sign() {
        let basis = SphericalHarmonicBasis::new(MomentIndices::new(1).unwrap());
        let y11 = basis.evaluate(PI / 2.0, 0.0, MomentIndex { l: 1, m: 1 }).unwrap();
        assert_relative_eq!(y11.re, -(3.0 / (8.0 * PI)).sqrt(), epsilon = 1e-15);
        assert_relative_eq!(y11.im, 0.0, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Check orthonormality `∫ Y_i conj(Y_j) dΩ = δ_ij` numerically.
    //
    // Given
    // -----
    // - `Lmax = 4`; midpoint rule in `cosθ` with 4000 nodes and a uniform
    //   32-point grid in `φ` (exact for the trigonometric part).
    //
    // Expect
    // ------
    // - The Gram matrix equals the identity within 1e-5.
    fn basis_is_orthonormal_by_quadrature() {
        let basis = SphericalHarmonicBasis::new(MomentIndices::new(4).unwrap());
        let n = basis.len();
        let (n_x, n_phi) = (4000, 32);
        let weight = (2.0 / n_x as f64) * (2.0 * PI / n_phi as f64);

        let mut gram = vec![Complex64::new(0.0, 0.0); n * n];
        let mut buf = vec![Complex64::new(0.0, 0.0); n];
        for ix in 0..n_x {
            let x = -1.0 + (ix as f64 + 0.5) * 2.0 / n_x as f64;
            let theta = x.acos();
            for ip in 0..n_phi {
                let phi = ip as f64 * 2.0 * PI / n_phi as f64;
                basis.evaluate_all(theta, phi, &mut buf);
                for i in 0..n {
                    for j in 0..n {
                        gram[i * n + j] += buf[i] * buf[j].conj() * weight;
                    }
                }
            }
        }

        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(gram[i * n + j].re, expected, epsilon = 1e-5);
                assert_relative_eq!(gram[i * n + j].im, 0.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure `evaluate` rejects indices outside the basis and agrees with
    // `evaluate_all` inside it.
    //
    // Given
    // -----
    // - `Lmax = 3`; requests `(2, 1)` and `(4, 0)`.
    //
    // Expect
    // ------
    // - `(2, 1)` matches the buffer entry; `(4, 0)` is `IndexOutOfRange`.
    fn evaluate_checks_membership() {
        let basis = SphericalHarmonicBasis::new(MomentIndices::new(3).unwrap());
        let mut buf = vec![Complex64::new(0.0, 0.0); basis.len()];
        basis.evaluate_all(0.8, -2.0, &mut buf);

        let single = basis.evaluate(0.8, -2.0, MomentIndex { l: 2, m: 1 }).unwrap();
        assert_eq!(single, buf[4]);
        assert!(basis.evaluate(0.8, -2.0, MomentIndex { l: 4, m: 0 }).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Confirm the moment factor normalizes `H(0 0)` per event to 1.
    //
    // Given
    // -----
    // - `moment_factor(0) · Y_0^0`.
    //
    // Expect
    // ------
    // - Exactly 1 up to rounding.
    fn moment_factor_normalizes_reference() {
        let basis = SphericalHarmonicBasis::new(MomentIndices::new(0).unwrap());
        let y00 = basis.evaluate(1.0, 1.0, MomentIndex { l: 0, m: 0 }).unwrap();
        assert_relative_eq!(moment_factor(0) * y00.re, 1.0, epsilon = 1e-15);
    }
}
