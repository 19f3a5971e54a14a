//! comparison — measured moments versus an externally computed truth.
//!
//! Purpose
//! -------
//! Quantify how well a [`MomentReport`] reproduces ground-truth moments
//! supplied by an external calculator (e.g. partial-wave amplitudes recoupled
//! into moments). The truth is accepted as a plain complex vector in
//! linear-index order, normalized so that `H(0 0) = 1`.
//!
//! Key behaviors
//! -------------
//! - [`pulls`] returns `(measured − true) / σ` per real and imaginary part.
//! - [`chi_squared`] computes `χ² = rᵀ C⁺ r` over the real parts of all
//!   non-reference moments, using the eigenvalue-truncated pseudoinverse of
//!   the `ReRe` block; the p-value comes from `statrs`' `ChiSquared` with the
//!   retained rank as degrees of freedom.
//! - [`check_realness`] flags truth moments whose imaginary part exceeds a
//!   tolerance.
//!
//! Invariants & assumptions
//! ------------------------
//! - The reference moment is excluded from `χ²`: after normalization it has
//!   zero variance by construction.
//! - Rank-deficient covariance blocks are handled by truncation, never by
//!   regularization.
//!
//! Testing notes
//! -------------
//! - Unit tests use a hand-built report with diagonal covariance so pulls
//!   and `χ²` have closed forms.
use crate::{
    inference::{
        diagnostics::NumericAnomaly,
        errors::{InferenceError, InferenceResult},
        linalg::symmetric_pseudo_inverse,
    },
    moments::{core::index::{MomentIndex, MomentIndices}, report::MomentReport},
};
use ndarray::{Array1, s};
use num_complex::Complex64;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Pull of one moment; `None` where the standard error is zero or undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentPull {
    pub index: MomentIndex,
    pub re: Option<f64>,
    pub im: Option<f64>,
}

/// χ² comparison result.
///
/// Fields
/// ------
/// - `stat`: `f64` — `rᵀ C⁺ r`.
/// - `dof`: `usize` — rank retained by the pseudoinverse.
/// - `p_value`: `f64` — upper-tail probability, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquaredOutcome {
    pub stat: f64,
    pub dof: usize,
    pub p_value: f64,
}

fn check_length(report: &MomentReport, truth: &Array1<Complex64>) -> InferenceResult<usize> {
    let n = report.basis().len();
    if truth.len() != n {
        return Err(InferenceError::LengthMismatch { expected: n, found: truth.len() });
    }
    Ok(n)
}

fn pull(diff: f64, sigma: f64) -> Option<f64> {
    (sigma.is_finite() && sigma > 0.0).then(|| diff / sigma)
}

/// pulls — per-moment pulls against the truth.
///
/// Errors
/// ------
/// - `InferenceError::LengthMismatch`
///   Returned when `truth` does not cover the report's moment set.
pub fn pulls(report: &MomentReport, truth: &Array1<Complex64>) -> InferenceResult<Vec<MomentPull>> {
    check_length(report, truth)?;
    let parts = report.components();
    Ok(report
        .moments()
        .into_iter()
        .map(|(index, value)| {
            let i = index.linear();
            let diff = value - truth[i];
            MomentPull {
                index,
                re: pull(diff.re, parts.re_re[[i, i]].sqrt()),
                im: pull(diff.im, parts.im_im[[i, i]].sqrt()),
            }
        })
        .collect())
}

/// chi_squared — χ² of the real parts of non-reference moments.
///
/// Parameters
/// ----------
/// - `report`: `&MomentReport`
/// - `truth`: `&Array1<Complex64>`
///   Ground-truth moments in linear-index order.
///
/// Returns
/// -------
/// `InferenceResult<ChiSquaredOutcome>`
///
/// Errors
/// ------
/// - `InferenceError::LengthMismatch`
/// - `InferenceError::ZeroRank`
///   Returned when there are no non-reference moments or the `ReRe` block
///   has no direction above the eigenvalue cutoff.
/// - `InferenceError::NonFiniteMatrix`
/// - `InferenceError::InvalidDegreesOfFreedom`
pub fn chi_squared(
    report: &MomentReport, truth: &Array1<Complex64>,
) -> InferenceResult<ChiSquaredOutcome> {
    let n = check_length(report, truth)?;
    if n < 2 {
        return Err(InferenceError::ZeroRank);
    }

    let residual: Array1<f64> = (1..n).map(|i| report.values()[i].re - truth[i].re).collect();
    let cov = report.components().re_re.slice(s![1.., 1..]).to_owned();
    let (pinv, dof) = symmetric_pseudo_inverse(&cov)?;
    let stat = residual.dot(&pinv.dot(&residual));

    let dist = ChiSquared::new(dof as f64)
        .map_err(|_| InferenceError::InvalidDegreesOfFreedom { dof })?;
    let p_value = (1.0 - dist.cdf(stat)).clamp(0.0, 1.0);
    Ok(ChiSquaredOutcome { stat, dof, p_value })
}

/// check_realness — flag truth moments with `|Im| > tol`.
///
/// Notes
/// -----
/// - Entries beyond `indices.len()` are ignored.
pub fn check_realness(
    truth: &Array1<Complex64>, indices: &MomentIndices, tol: f64,
) -> Vec<NumericAnomaly> {
    indices
        .iter()
        .zip(truth.iter())
        .filter(|(_, value)| value.im.abs() > tol)
        .map(|(index, value)| NumericAnomaly::NonRealMoment { index, imag: value.im, tol })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        inference::augmented::AugmentedCovariance,
        moments::{
            core::basis::SphericalHarmonicBasis, correction::CorrectedMoments,
        },
    };
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Pulls with a diagonal covariance, including `None` for the
    //   reference moment.
    // - χ² and its degrees of freedom for a diagonal `ReRe` block.
    // - Realness screening and length validation.
    // -------------------------------------------------------------------------

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    // `Lmax = 1`, H = (1, 0.5 + 0.1i, −0.2), Var[Re] = (0, 0.01, 0.04),
    // Var[Im] = (0, 0.04, 0.01).
    fn report() -> MomentReport {
        let basis = SphericalHarmonicBasis::new(MomentIndices::new(1).unwrap());
        let var_re = [0.0, 0.01, 0.04];
        let var_im = [0.0, 0.04, 0.01];
        let vh = Array2::from_shape_fn((3, 3), |(i, j)| {
            if i == j { c(var_re[i] + var_im[i], 0.0) } else { c(0.0, 0.0) }
        });
        let vp = Array2::from_shape_fn((3, 3), |(i, j)| {
            if i == j { c(var_re[i] - var_im[i], 0.0) } else { c(0.0, 0.0) }
        });
        MomentReport::from_corrected(&CorrectedMoments {
            basis,
            values: array![c(1.0, 0.0), c(0.5, 0.1), c(-0.2, 0.0)],
            covariance: AugmentedCovariance::from_blocks(&vh, &vp).unwrap(),
            acceptance_corrected: false,
        })
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify pulls against closed forms.
    //
    // Given
    // -----
    // - Truth `(1, 0.4, 0)`.
    //
    // Expect
    // ------
    // - Reference pulls are `None`; `H(1 0)`: `(0.1/0.1, 0.1/0.2)`;
    //   `H(1 1)`: `(−0.2/0.2, 0)`.
    fn pulls_match_closed_form() {
        let truth = array![c(1.0, 0.0), c(0.4, 0.0), c(0.0, 0.0)];
        let p = pulls(&report(), &truth).unwrap();
        assert_eq!(p[0].re, None);
        assert_eq!(p[0].im, None);
        assert_relative_eq!(p[1].re.unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(p[1].im.unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(p[2].re.unwrap(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(p[2].im.unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Check χ² with a diagonal `ReRe` block.
    //
    // Given
    // -----
    // - Same truth as above; real residuals `(0.1, −0.2)`, variances
    //   `(0.01, 0.04)`.
    //
    // Expect
    // ------
    // - `χ² = 1 + 1 = 2`, `dof = 2`, `p = exp(−1)`.
    fn chi_squared_with_diagonal_covariance() {
        let truth = array![c(1.0, 0.0), c(0.4, 0.0), c(0.0, 0.0)];
        let out = chi_squared(&report(), &truth).unwrap();
        assert_relative_eq!(out.stat, 2.0, epsilon = 1e-10);
        assert_eq!(out.dof, 2);
        assert_relative_eq!(out.p_value, (-1.0_f64).exp(), epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Ensure realness screening and length validation behave as documented.
    //
    // Given
    // -----
    // - Truth with `Im H(1 1) = 0.3`; a truth vector of the wrong length.
    //
    // Expect
    // ------
    // - One `NonRealMoment` for `H(1 1)`; `LengthMismatch` for both
    //   comparison routines.
    fn realness_and_length_checks() {
        let indices = MomentIndices::new(1).unwrap();
        let truth = array![c(1.0, 0.0), c(0.4, 1e-14), c(0.0, 0.3)];
        let anomalies = check_realness(&truth, &indices, 1e-10);
        assert_eq!(
            anomalies,
            vec![NumericAnomaly::NonRealMoment {
                index: MomentIndex { l: 1, m: 1 },
                imag: 0.3,
                tol: 1e-10
            }]
        );

        let short = array![c(1.0, 0.0)];
        assert_eq!(
            pulls(&report(), &short).unwrap_err(),
            InferenceError::LengthMismatch { expected: 3, found: 1 }
        );
        assert!(chi_squared(&report(), &short).is_err());
    }
}
