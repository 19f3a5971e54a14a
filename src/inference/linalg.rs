//! linalg — `ndarray` ↔ `nalgebra` bridge and library-grade matrix routines.
//!
//! Purpose
//! -------
//! Keep the crate's storage in `ndarray` while delegating decompositions to
//! `nalgebra`. This module copies matrices between the two representations
//! and wraps the decompositions the moment pipeline needs: LU inversion with
//! a conditioning guard, singular values for the condition number, complex
//! Schur eigenvalues for diagnostics, and an eigenvalue-truncated
//! pseudoinverse for symmetric real matrices.
//!
//! Key behaviors
//! -------------
//! - [`fill_dmatrix`] / [`to_array2`] copy between `Array2<T>` and
//!   `DMatrix<T>` without altering values.
//! - [`condition_number`] returns `σ_max / σ_min` (`+∞` for an exactly
//!   singular matrix).
//! - [`invert_checked`] refuses matrices whose condition number exceeds the
//!   caller's tolerance and reports failed LU inversions as singular.
//! - [`eigenvalues`] reads the diagonal of the complex Schur form.
//! - [`symmetric_pseudo_inverse`] discards eigenvalues `≤ EIGEN_EPS · λ_max`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are square and finite; [`check_square_finite`] enforces this and
//!   is called by every public routine here.
//!
//! Conventions
//! -----------
//! - Iterative decompositions are capped at [`MAX_ITERATIONS`] sweeps and use
//!   `f64::EPSILON` as convergence threshold; non-convergence is
//!   `InferenceError::DecompositionFailed`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover copying, the condition number of diagonal matrices,
//!   inversion of a small complex matrix, rejection of singular input, Schur
//!   eigenvalues of a triangular matrix, and the pseudoinverse of a
//!   rank-deficient matrix.
use crate::inference::errors::{InferenceError, InferenceResult};
use nalgebra::{DMatrix, Scalar};
use ndarray::Array2;
use num_complex::Complex64;

/// Relative cutoff below which eigenvalues are treated as zero.
pub const EIGEN_EPS: f64 = 1e-12;

/// Iteration cap for SVD and Schur decompositions.
pub const MAX_ITERATIONS: usize = 10_000;

/// fill_dmatrix — copy an `ndarray` matrix into a preallocated `DMatrix`.
///
/// Panics
/// ------
/// - Panics if the shapes differ; both sides are sized by the caller.
///
/// Notes
/// -----
/// - The copy proceeds column by column, matching the column-major storage
///   of `DMatrix`.
pub fn fill_dmatrix<T: Scalar + Copy>(src: &Array2<T>, dst: &mut DMatrix<T>) {
    assert_eq!(src.dim(), dst.shape(), "fill_dmatrix shape mismatch");
    for j in 0..src.ncols() {
        for i in 0..src.nrows() {
            dst[(i, j)] = src[[i, j]];
        }
    }
}

/// Copy a `DMatrix` into a new row-major `Array2`.
pub fn to_array2<T: Scalar + Copy>(src: &DMatrix<T>) -> Array2<T> {
    Array2::from_shape_fn(src.shape(), |(i, j)| src[(i, j)])
}

fn to_dmatrix(src: &Array2<Complex64>) -> DMatrix<Complex64> {
    let mut dst = DMatrix::<Complex64>::zeros(src.nrows(), src.ncols());
    fill_dmatrix(src, &mut dst);
    dst
}

/// Ensure `a` is square with finite entries; returns its dimension.
///
/// Errors
/// ------
/// - `InferenceError::DimensionMismatch`
/// - `InferenceError::NonFiniteMatrix` (first offending entry in row-major
///   order).
pub fn check_square_finite(a: &Array2<Complex64>) -> InferenceResult<usize> {
    let (rows, cols) = a.dim();
    if rows != cols {
        return Err(InferenceError::DimensionMismatch { expected: (rows, rows), found: (rows, cols) });
    }
    if let Some(((row, col), _)) =
        a.indexed_iter().find(|(_, v)| !(v.re.is_finite() && v.im.is_finite()))
    {
        return Err(InferenceError::NonFiniteMatrix { row, col });
    }
    Ok(rows)
}

/// Singular values of a complex square matrix, in no particular order.
///
/// Errors
/// ------
/// - Shape/finiteness errors from [`check_square_finite`].
/// - `InferenceError::DecompositionFailed { routine: "SVD" }`.
pub fn singular_values(a: &Array2<Complex64>) -> InferenceResult<Vec<f64>> {
    check_square_finite(a)?;
    let svd = to_dmatrix(a)
        .try_svd(false, false, f64::EPSILON, MAX_ITERATIONS)
        .ok_or(InferenceError::DecompositionFailed { routine: "SVD" })?;
    Ok(svd.singular_values.iter().copied().collect())
}

/// Condition number `σ_max / σ_min` in the spectral norm.
///
/// Returns `+∞` when the smallest singular value is exactly zero.
pub fn condition_number(a: &Array2<Complex64>) -> InferenceResult<f64> {
    let sv = singular_values(a)?;
    let max = sv.iter().copied().fold(0.0_f64, f64::max);
    let min = sv.iter().copied().fold(f64::INFINITY, f64::min);
    if min <= 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(max / min)
}

/// invert_checked — inverse of a well-conditioned complex matrix.
///
/// Parameters
/// ----------
/// - `a`: `&Array2<Complex64>`
///   Square, finite matrix.
/// - `max_condition_number`: `f64`
///   Largest accepted condition number.
///
/// Returns
/// -------
/// `InferenceResult<(Array2<Complex64>, f64)>`
///   The inverse and the condition number of `a`.
///
/// Errors
/// ------
/// - `InferenceError::SingularMatrix`
///   Returned when the condition number exceeds `max_condition_number`, is
///   not finite, or when the LU inversion fails or yields non-finite entries.
/// - Shape, finiteness and SVD errors as in [`singular_values`].
pub fn invert_checked(
    a: &Array2<Complex64>, max_condition_number: f64,
) -> InferenceResult<(Array2<Complex64>, f64)> {
    let cond = condition_number(a)?;
    let singular = InferenceError::SingularMatrix {
        condition_number: cond,
        tolerance: max_condition_number,
    };
    if !cond.is_finite() || cond > max_condition_number {
        return Err(singular);
    }

    let inverse = to_dmatrix(a).lu().try_inverse().ok_or_else(|| singular.clone())?;
    let inverse = to_array2(&inverse);
    if inverse.iter().any(|v| !(v.re.is_finite() && v.im.is_finite())) {
        return Err(singular);
    }
    Ok((inverse, cond))
}

/// Eigenvalues of a complex square matrix from its Schur form `Q T Q^H`.
///
/// Errors
/// ------
/// - `InferenceError::DecompositionFailed { routine: "Schur" }`.
pub fn eigenvalues(a: &Array2<Complex64>) -> InferenceResult<Vec<Complex64>> {
    check_square_finite(a)?;
    let schur = to_dmatrix(a)
        .try_schur(f64::EPSILON, MAX_ITERATIONS)
        .ok_or(InferenceError::DecompositionFailed { routine: "Schur" })?;
    let (_, t) = schur.unpack();
    Ok(t.diagonal().iter().copied().collect())
}

/// symmetric_pseudo_inverse — Moore–Penrose inverse of a symmetric real matrix.
///
/// Purpose
/// -------
/// Invert a covariance block that may be rank deficient (e.g. constrained
/// moments with zero variance) by discarding near-null eigendirections.
///
/// Returns
/// -------
/// `InferenceResult<(Array2<f64>, usize)>`
///   `A⁺ = Σ_{k: λ_k > EIGEN_EPS·λ_max} q_k q_kᵀ / λ_k` and the retained rank.
///
/// Errors
/// ------
/// - `InferenceError::DimensionMismatch` for non-square input.
/// - `InferenceError::NonFiniteMatrix`.
/// - `InferenceError::ZeroRank` when no eigenvalue survives the cutoff.
pub fn symmetric_pseudo_inverse(a: &Array2<f64>) -> InferenceResult<(Array2<f64>, usize)> {
    let (rows, cols) = a.dim();
    if rows != cols {
        return Err(InferenceError::DimensionMismatch { expected: (rows, rows), found: (rows, cols) });
    }
    if let Some(((row, col), _)) = a.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(InferenceError::NonFiniteMatrix { row, col });
    }

    let mut a_nalg = DMatrix::<f64>::zeros(rows, cols);
    fill_dmatrix(a, &mut a_nalg);
    let eigen = a_nalg.symmetric_eigen();
    let q = eigen.eigenvectors;
    let lambda_max = eigen.eigenvalues.iter().copied().fold(0.0_f64, f64::max);
    let cutoff = EIGEN_EPS * lambda_max;

    let mut pinv = Array2::<f64>::zeros((rows, cols));
    let mut rank = 0;
    for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if lambda <= cutoff || lambda <= 0.0 {
            continue;
        }
        rank += 1;
        for i in 0..rows {
            let coeff = q[(i, k)] / lambda;
            for j in 0..cols {
                pinv[[i, j]] += coeff * q[(j, k)];
            }
        }
    }
    if rank == 0 {
        return Err(InferenceError::ZeroRank);
    }
    Ok((pinv, rank))
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
    // - Copying between `ndarray` and `nalgebra` without modification.
    // - Condition numbers, checked inversion, and singular rejection.
    // - Schur eigenvalues and the truncated pseudoinverse.
    // -------------------------------------------------------------------------

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    // Purpose
    // -------
    // Verify that `fill_dmatrix` and `to_array2` preserve every entry,
    // including asymmetric ones.
    //
    // Given
    // -----
    // - A 2×3 complex matrix.
    //
    // Expect
    // ------
    // - Identical entries after a round trip.
    fn fill_dmatrix_copies_without_modification() {
        let a = array![[c(1.0, 2.0), c(3.0, 0.0), c(0.0, -1.0)], [c(4.0, 4.0), c(5.0, 0.5), c(6.0, 0.0)]];
        let mut dm = DMatrix::<Complex64>::zeros(2, 3);
        fill_dmatrix(&a, &mut dm);
        assert_eq!(dm[(1, 0)], c(4.0, 4.0));
        assert_eq!(dm[(0, 2)], c(0.0, -1.0));
        assert_eq!(to_array2(&dm), a);
    }

    #[test]
    // Purpose
    // -------
    // Check the condition number on a diagonal matrix with known spectrum.
    //
    // Given
    // -----
    // - `diag(4, −2i, 0.5)`.
    //
    // Expect
    // ------
    // - `κ = 4 / 0.5 = 8`.
    fn condition_number_of_diagonal_matrix() {
        let a = array![
            [c(4.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)],
            [c(0.0, 0.0), c(0.0, -2.0), c(0.0, 0.0)],
            [c(0.0, 0.0), c(0.0, 0.0), c(0.5, 0.0)]
        ];
        assert_relative_eq!(condition_number(&a).unwrap(), 8.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Ensure `invert_checked` returns a true inverse of a complex matrix.
    //
    // Given
    // -----
    // - A well-conditioned 2×2 complex matrix.
    //
    // Expect
    // ------
    // - `A · A⁻¹ = 1` within 1e-12.
    fn invert_checked_returns_inverse() {
        let a = array![[c(2.0, 1.0), c(0.5, 0.0)], [c(0.0, -0.3), c(1.0, 0.0)]];
        let (inv, cond) = invert_checked(&a, 1e6).unwrap();
        assert!(cond >= 1.0);
        let prod = a.dot(&inv);
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(prod[[i, j]].re, expected, epsilon = 1e-12);
                assert_relative_eq!(prod[[i, j]].im, 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure singular and ill-conditioned matrices are refused.
    //
    // Given
    // -----
    // - A rank-1 matrix, and `diag(1, 1e-8)` with tolerance `1e6`.
    //
    // Expect
    // ------
    // - `SingularMatrix` in both cases; the second reports `κ ≈ 1e8`.
    fn invert_checked_rejects_singular_and_ill_conditioned() {
        let rank_one = array![[c(1.0, 0.0), c(2.0, 0.0)], [c(2.0, 0.0), c(4.0, 0.0)]];
        assert!(matches!(
            invert_checked(&rank_one, 1e12),
            Err(InferenceError::SingularMatrix { .. })
        ));

        let ill = array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(1e-8, 0.0)]];
        match invert_checked(&ill, 1e6) {
            Err(InferenceError::SingularMatrix { condition_number, tolerance }) => {
                assert_relative_eq!(condition_number, 1e8, max_relative = 1e-8);
                assert_eq!(tolerance, 1e6);
            }
            other => panic!("expected SingularMatrix, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify Schur eigenvalues on an upper-triangular matrix.
    //
    // Given
    // -----
    // - Upper-triangular matrix with diagonal `(3, 1+i)`.
    //
    // Expect
    // ------
    // - The same two eigenvalues (in any order).
    fn eigenvalues_of_triangular_matrix() {
        let a = array![[c(3.0, 0.0), c(1.0, 2.0)], [c(0.0, 0.0), c(1.0, 1.0)]];
        let mut eig = eigenvalues(&a).unwrap();
        eig.sort_by(|x, y| x.re.total_cmp(&y.re));
        assert_relative_eq!(eig[0].re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(eig[0].im, 1.0, epsilon = 1e-12);
        assert_relative_eq!(eig[1].re, 3.0, epsilon = 1e-12);
        assert_relative_eq!(eig[1].im, 0.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Check rank truncation in the symmetric pseudoinverse.
    //
    // Given
    // -----
    // - `diag(2, 0)` and the zero matrix.
    //
    // Expect
    // ------
    // - `diag(0.5, 0)` with rank 1; `ZeroRank` for the zero matrix.
    fn symmetric_pseudo_inverse_truncates_null_space() {
        let (pinv, rank) = symmetric_pseudo_inverse(&array![[2.0, 0.0], [0.0, 0.0]]).unwrap();
        assert_eq!(rank, 1);
        assert_relative_eq!(pinv[[0, 0]], 0.5, epsilon = 1e-14);
        assert_relative_eq!(pinv[[1, 1]], 0.0, epsilon = 1e-14);
        assert_eq!(
            symmetric_pseudo_inverse(&Array2::<f64>::zeros((2, 2))).unwrap_err(),
            InferenceError::ZeroRank
        );
    }
}
