//! augmented — covariance of a complex vector together with its conjugate.
//!
//! Purpose
//! -------
//! Represent the full second-order statistics of a complex estimate `H` as
//! the covariance of the stacked vector `(H, conj H)`:
//!
//! ```text
//! V_aug = [[ V_H,       V_P       ],
//!          [ conj(V_P), conj(V_H) ]]
//! ```
//!
//! with the Hermitian covariance `V_H = E[δH δH^H]` and the pseudo-covariance
//! `V_P = E[δH δH^T]`. Both blocks are required to recover the covariances of
//! real and imaginary parts, so linear maps act on the whole augmented matrix.
//!
//! Key behaviors
//! -------------
//! - [`AugmentedCovariance::from_blocks`] assembles `V_aug` from `V_H`, `V_P`.
//! - [`AugmentedCovariance::propagate`] applies a complex Jacobian `J` as
//!   `J_aug V_aug J_aug^H` with `J_aug = [[J, 0], [0, conj J]]`.
//! - [`AugmentedCovariance::scaled`] divides by a complex normalization
//!   squared.
//! - [`AugmentedCovariance::decompose`] returns the real-valued blocks
//!   `Cov[Re, Re]`, `Cov[Im, Im]`, `Cov[Re, Im]`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The stored matrix is `2n × 2n` for `n` complex components.
//! - `V_aug` is Hermitian up to rounding when produced by an estimator or by
//!   [`propagate`](AugmentedCovariance::propagate); deviations are measured by
//!   [`hermiticity_defect`](AugmentedCovariance::hermiticity_defect) and never
//!   corrected silently.
//!
//! Conventions
//! -----------
//! - With `δH = δa + i δb`:
//!   `Cov[a_i, a_j] = (Re V_H + Re V_P)/2`,
//!   `Cov[b_i, b_j] = (Re V_H − Re V_P)/2`,
//!   `Cov[a_i, b_j] = (Im V_P − Im V_H)/2`.
//!
//! Testing notes
//! -------------
//! - Unit tests build `V_aug` from known real covariances, check the
//!   decomposition identities, and compare `propagate` with a hand-computed
//!   product.
use crate::inference::errors::{InferenceError, InferenceResult};
use ndarray::{Array2, ArrayView2, s};
use num_complex::Complex64;

/// Real-valued covariance blocks of a complex estimate.
///
/// Fields
/// ------
/// - `re_re`: `Array2<f64>` — `Cov[Re_i, Re_j]`.
/// - `im_im`: `Array2<f64>` — `Cov[Im_i, Im_j]`.
/// - `re_im`: `Array2<f64>` — `Cov[Re_i, Im_j]` (not symmetric in general).
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceComponents {
    pub re_re: Array2<f64>,
    pub im_im: Array2<f64>,
    pub re_im: Array2<f64>,
}

/// AugmentedCovariance — `2n × 2n` covariance of `(H, conj H)`.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedCovariance {
    matrix: Array2<Complex64>,
    n: usize,
}

impl AugmentedCovariance {
    /// Zero covariance for `n` components.
    pub fn zeros(n: usize) -> Self {
        AugmentedCovariance { matrix: Array2::zeros((2 * n, 2 * n)), n }
    }

    /// Assemble `V_aug` from the Hermitian and pseudo-covariance blocks.
    ///
    /// Errors
    /// ------
    /// - `InferenceError::DimensionMismatch`
    ///   Returned when either block is not square or the blocks differ in
    ///   shape.
    pub fn from_blocks(
        hermitian: &Array2<Complex64>, pseudo: &Array2<Complex64>,
    ) -> InferenceResult<Self> {
        let n = hermitian.nrows();
        if hermitian.dim() != (n, n) {
            return Err(InferenceError::DimensionMismatch { expected: (n, n), found: hermitian.dim() });
        }
        if pseudo.dim() != (n, n) {
            return Err(InferenceError::DimensionMismatch { expected: (n, n), found: pseudo.dim() });
        }

        let mut matrix = Array2::<Complex64>::zeros((2 * n, 2 * n));
        matrix.slice_mut(s![..n, ..n]).assign(hermitian);
        matrix.slice_mut(s![..n, n..]).assign(pseudo);
        matrix.slice_mut(s![n.., ..n]).assign(&pseudo.mapv(|v| v.conj()));
        matrix.slice_mut(s![n.., n..]).assign(&hermitian.mapv(|v| v.conj()));
        Ok(AugmentedCovariance { matrix, n })
    }

    /// Wrap a full `2n × 2n` augmented matrix.
    ///
    /// Errors
    /// ------
    /// - `InferenceError::DimensionMismatch`
    ///   Returned when the matrix is not square with even dimension.
    pub fn from_matrix(matrix: Array2<Complex64>) -> InferenceResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols || rows % 2 != 0 {
            let even = rows + rows % 2;
            return Err(InferenceError::DimensionMismatch {
                expected: (even, even),
                found: (rows, cols),
            });
        }
        Ok(AugmentedCovariance { matrix, n: rows / 2 })
    }

    /// Number of complex components `n`.
    pub fn n_components(&self) -> usize {
        self.n
    }

    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    pub fn into_matrix(self) -> Array2<Complex64> {
        self.matrix
    }

    /// Upper-left block `V_H`.
    pub fn hermitian(&self) -> ArrayView2<'_, Complex64> {
        self.matrix.slice(s![..self.n, ..self.n])
    }

    /// Upper-right block `V_P`.
    pub fn pseudo(&self) -> ArrayView2<'_, Complex64> {
        self.matrix.slice(s![..self.n, self.n..])
    }

    /// `V_aug / norm²`, the covariance of `(H / norm, conj(H / norm))` when
    /// `norm` is treated as exact.
    pub fn scaled(&self, norm: Complex64) -> Self {
        let norm_sq = norm * norm;
        AugmentedCovariance { matrix: self.matrix.mapv(|v| v / norm_sq), n: self.n }
    }

    /// propagate — first-order propagation through `H ↦ J H`.
    ///
    /// Parameters
    /// ----------
    /// - `jacobian`: `&Array2<Complex64>`
    ///   `n × n` Jacobian `J`. The map is holomorphic, so the conjugate
    ///   Jacobian block is zero.
    ///
    /// Returns
    /// -------
    /// `InferenceResult<AugmentedCovariance>`
    ///   `J_aug · (V_aug · J_aug^H)`.
    ///
    /// Errors
    /// ------
    /// - `InferenceError::DimensionMismatch`
    ///   Returned when `J` is not `n × n`.
    pub fn propagate(&self, jacobian: &Array2<Complex64>) -> InferenceResult<Self> {
        let n = self.n;
        if jacobian.dim() != (n, n) {
            return Err(InferenceError::DimensionMismatch { expected: (n, n), found: jacobian.dim() });
        }

        let mut j_aug = Array2::<Complex64>::zeros((2 * n, 2 * n));
        j_aug.slice_mut(s![..n, ..n]).assign(jacobian);
        j_aug.slice_mut(s![n.., n..]).assign(&jacobian.mapv(|v| v.conj()));
        let j_aug_h = j_aug.t().mapv(|v| v.conj());

        let matrix = j_aug.dot(&self.matrix.dot(&j_aug_h));
        Ok(AugmentedCovariance { matrix, n })
    }

    /// Real and imaginary covariance blocks.
    pub fn decompose(&self) -> CovarianceComponents {
        let vh = self.hermitian();
        let vp = self.pseudo();
        let n = self.n;
        let mut re_re = Array2::<f64>::zeros((n, n));
        let mut im_im = Array2::<f64>::zeros((n, n));
        let mut re_im = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            for j in 0..n {
                let (h, p) = (vh[[i, j]], vp[[i, j]]);
                re_re[[i, j]] = (h.re + p.re) / 2.0;
                im_im[[i, j]] = (h.re - p.re) / 2.0;
                re_im[[i, j]] = (p.im - h.im) / 2.0;
            }
        }
        CovarianceComponents { re_re, im_im, re_im }
    }

    /// Largest `|V_aug − V_aug^H|` entry relative to the largest `|V_aug|`.
    ///
    /// Returns `0` for the zero matrix.
    pub fn hermiticity_defect(&self) -> f64 {
        let scale = self.matrix.iter().map(|v| v.norm()).fold(0.0_f64, f64::max);
        if scale == 0.0 {
            return 0.0;
        }
        let dim = 2 * self.n;
        let mut defect = 0.0_f64;
        for i in 0..dim {
            for j in i..dim {
                defect = defect.max((self.matrix[[i, j]] - self.matrix[[j, i]].conj()).norm());
            }
        }
        defect / scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Assembly of `V_aug` from known real covariances and recovery of those
    //   covariances by `decompose`.
    // - `propagate` against a hand-computed product.
    // - Scaling by a complex normalization and the Hermiticity measure.
    // -------------------------------------------------------------------------

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    // V_H = A + B + i(Cᵀ − C), V_P = A − B + i(Cᵀ + C) for real blocks
    // A = Cov[a, a], B = Cov[b, b], C = Cov[a, b].
    fn blocks_from_real(
        a: &Array2<f64>, b: &Array2<f64>, cab: &Array2<f64>,
    ) -> (Array2<Complex64>, Array2<Complex64>) {
        let ct = cab.t().to_owned();
        let vh = Array2::from_shape_fn(a.dim(), |(i, j)| {
            c(a[[i, j]] + b[[i, j]], ct[[i, j]] - cab[[i, j]])
        });
        let vp = Array2::from_shape_fn(a.dim(), |(i, j)| {
            c(a[[i, j]] - b[[i, j]], ct[[i, j]] + cab[[i, j]])
        });
        (vh, vp)
    }

    #[test]
    // Purpose
    // -------
    // Verify that `decompose` inverts the construction of `V_H`, `V_P` from
    // real covariance blocks.
    //
    // Given
    // -----
    // - Real 2×2 blocks `A`, `B` (symmetric) and `C` (general).
    //
    // Expect
    // ------
    // - `re_re = A`, `im_im = B`, `re_im = C`, and the diagonal identity
    //   `re_re + im_im = Re V_H`.
    fn decompose_recovers_real_blocks() {
        let a = array![[2.0, 0.3], [0.3, 1.0]];
        let b = array![[0.5, -0.1], [-0.1, 0.7]];
        let cab = array![[0.2, 0.05], [-0.15, 0.1]];
        let (vh, vp) = blocks_from_real(&a, &b, &cab);
        let cov = AugmentedCovariance::from_blocks(&vh, &vp).unwrap();

        let parts = cov.decompose();
        for i in 0..2 {
            for j in 0..2 {
                assert_relative_eq!(parts.re_re[[i, j]], a[[i, j]], epsilon = 1e-15);
                assert_relative_eq!(parts.im_im[[i, j]], b[[i, j]], epsilon = 1e-15);
                assert_relative_eq!(parts.re_im[[i, j]], cab[[i, j]], epsilon = 1e-15);
            }
            assert_relative_eq!(
                parts.re_re[[i, i]] + parts.im_im[[i, i]],
                cov.hermitian()[[i, i]].re,
                epsilon = 1e-15
            );
        }
        assert_relative_eq!(cov.hermiticity_defect(), 0.0, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Check `propagate` against an explicit `J_aug V J_aug^H`.
    //
    // Given
    // -----
    // - `n = 1`, `J = [2i]`, `V_H = [1]`, `V_P = [0.5]`.
    //
    // Expect
    // ------
    // - `V_H' = |2i|² · 1 = 4`, `V_P' = (2i)² · 0.5 = −2`, lower blocks
    //   conjugated.
    fn propagate_matches_hand_computation() {
        let cov = AugmentedCovariance::from_blocks(&array![[c(1.0, 0.0)]], &array![[c(0.5, 0.0)]])
            .unwrap();
        let out = cov.propagate(&array![[c(0.0, 2.0)]]).unwrap();
        let m = out.matrix();
        assert_relative_eq!(m[[0, 0]].re, 4.0, epsilon = 1e-14);
        assert_relative_eq!(m[[0, 1]].re, -2.0, epsilon = 1e-14);
        assert_relative_eq!(m[[0, 1]].im, 0.0, epsilon = 1e-14);
        assert_relative_eq!(m[[1, 0]].re, -2.0, epsilon = 1e-14);
        assert_relative_eq!(m[[1, 1]].re, 4.0, epsilon = 1e-14);
    }

    #[test]
    // Purpose
    // -------
    // Ensure the identity Jacobian leaves the covariance unchanged and that a
    // mismatched Jacobian is rejected.
    //
    // Given
    // -----
    // - A 2-component covariance, `J = 1₂` and a 3×3 Jacobian.
    //
    // Expect
    // ------
    // - Unchanged matrix; `DimensionMismatch` for the 3×3 case.
    fn propagate_identity_and_shape_check() {
        let (vh, vp) = blocks_from_real(
            &array![[1.0, 0.2], [0.2, 2.0]],
            &array![[0.4, 0.0], [0.0, 0.3]],
            &array![[0.1, 0.0], [0.05, -0.1]],
        );
        let cov = AugmentedCovariance::from_blocks(&vh, &vp).unwrap();
        let eye = Array2::from_shape_fn((2, 2), |(i, j)| c(if i == j { 1.0 } else { 0.0 }, 0.0));
        assert_eq!(cov.propagate(&eye).unwrap(), cov);
        assert!(matches!(
            cov.propagate(&Array2::zeros((3, 3))),
            Err(InferenceError::DimensionMismatch { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Check complex scaling and the rejection of odd-sized matrices.
    //
    // Given
    // -----
    // - `V_H = [4]`, `V_P = [4]`, norm `2`; a 3×3 matrix for `from_matrix`.
    //
    // Expect
    // ------
    // - Entries divided by 4; `DimensionMismatch` for the odd matrix.
    fn scaled_divides_by_norm_squared() {
        let cov = AugmentedCovariance::from_blocks(&array![[c(4.0, 0.0)]], &array![[c(4.0, 0.0)]])
            .unwrap();
        let scaled = cov.scaled(c(2.0, 0.0));
        assert_relative_eq!(scaled.hermitian()[[0, 0]].re, 1.0, epsilon = 1e-15);
        assert_relative_eq!(scaled.pseudo()[[0, 0]].re, 1.0, epsilon = 1e-15);
        assert!(AugmentedCovariance::from_matrix(Array2::zeros((3, 3))).is_err());
    }
}
