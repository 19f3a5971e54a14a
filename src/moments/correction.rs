//! correction — acceptance correction with augmented-covariance propagation.
//!
//! Purpose
//! -------
//! Map measured moments to physical moments by inverting the acceptance
//! integral matrix and propagate the augmented covariance to first order.
//!
//! Key behaviors
//! -------------
//! - Without an integral matrix the correction is the identity and the
//!   inputs are returned unchanged.
//! - With a matrix: `J = I_acc⁻¹`, `H_phys = J · H_meas` and
//!   `V_phys = J_aug · V_meas · J_aug^H` with `J_aug = [[J, 0], [0, conj J]]`.
//! - The condition number is checked against
//!   [`CorrectionOptions::max_condition_number`] before the LU inversion.
//!
//! Invariants & assumptions
//! ------------------------
//! - Moments and matrix must share the same basis; otherwise the call fails
//!   with `BasisMismatch` before any numerics run.
//! - A singular or ill-conditioned matrix aborts the correction with
//!   `SingularAcceptance`; the uncorrected path stays available by passing
//!   `None`.
use crate::{
    inference::{augmented::AugmentedCovariance, linalg},
    moments::{
        acceptance::AcceptanceIntegralMatrix,
        core::{basis::SphericalHarmonicBasis, options::CorrectionOptions},
        errors::{MomentError, MomentResult},
        estimator::RawMoments,
    },
};
use ndarray::Array1;
use num_complex::Complex64;
use tracing::debug;

/// CorrectedMoments — acceptance-corrected (or explicitly uncorrected)
/// moments, not yet normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectedMoments {
    pub basis: SphericalHarmonicBasis,
    pub values: Array1<Complex64>,
    pub covariance: AugmentedCovariance,
    /// `false` when no integral matrix was applied.
    pub acceptance_corrected: bool,
}

/// correct_moments — apply `I_acc⁻¹` to raw moments and their covariance.
///
/// Parameters
/// ----------
/// - `raw`: `&RawMoments`
///   Output of the estimator.
/// - `integral`: `Option<&AcceptanceIntegralMatrix>`
///   `None` selects the identity correction.
/// - `opts`: `&CorrectionOptions`
///
/// Returns
/// -------
/// `MomentResult<CorrectedMoments>`
///
/// Errors
/// ------
/// - `MomentError::BasisMismatch`
/// - `MomentError::SingularAcceptance`
///   Condition number above `opts.max_condition_number`, or LU failure.
/// - `MomentError::Inference(DecompositionFailed)` when the SVD used for
///   the condition number does not converge.
pub fn correct_moments(
    raw: &RawMoments, integral: Option<&AcceptanceIntegralMatrix>, opts: &CorrectionOptions,
) -> MomentResult<CorrectedMoments> {
    let Some(integral) = integral else {
        return Ok(CorrectedMoments {
            basis: raw.basis,
            values: raw.values.clone(),
            covariance: raw.covariance.clone(),
            acceptance_corrected: false,
        });
    };

    if integral.basis() != &raw.basis {
        return Err(MomentError::BasisMismatch {
            moments_max_l: raw.basis.max_l(),
            acceptance_max_l: integral.basis().max_l(),
        });
    }

    let (jacobian, cond) = linalg::invert_checked(integral.matrix(), opts.max_condition_number)?;
    debug!(condition_number = cond, "inverted acceptance integral matrix");

    let values = jacobian.dot(&raw.values);
    let covariance = raw.covariance.propagate(&jacobian)?;
    Ok(CorrectedMoments { basis: raw.basis, values, covariance, acceptance_corrected: true })
}
