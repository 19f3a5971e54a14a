//! diagnostics — non-fatal numeric anomalies.
//!
//! Purpose
//! -------
//! Detect and report conditions that do not invalidate a result but should
//! not pass silently: negative variances after propagation, covariance
//! matrices that drifted away from Hermiticity, and ground-truth moments
//! with sizable imaginary parts.
//!
//! Key behaviors
//! -------------
//! - Checks return [`NumericAnomaly`] values; they never return errors and
//!   never alter the inspected data.
//! - [`log_anomalies`] emits one `tracing::warn!` event per anomaly.
//!
//! Conventions
//! -----------
//! - Moments are identified by their `(L, M)` label.
//! - Hermiticity is measured relative to the largest covariance magnitude.
use crate::{
    inference::augmented::{AugmentedCovariance, CovarianceComponents},
    moments::core::index::{MomentIndex, MomentIndices},
};
use tracing::warn;

/// Real or imaginary part of a moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Re,
    Im,
}

impl std::fmt::Display for Part {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Part::Re => write!(f, "Re"),
            Part::Im => write!(f, "Im"),
        }
    }
}

/// Non-fatal numeric anomaly.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericAnomaly {
    /// Ground-truth moment with `|Im| > tol`.
    NonRealMoment { index: MomentIndex, imag: f64, tol: f64 },

    /// Negative diagonal covariance entry.
    NegativeVariance { index: MomentIndex, part: Part, value: f64 },

    /// Augmented covariance deviates from Hermitian beyond `tol`.
    NonHermitian { defect: f64, tol: f64 },
}

impl std::fmt::Display for NumericAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericAnomaly::NonRealMoment { index, imag, tol } => {
                write!(f, "{index} has imaginary part {imag:e} beyond tolerance {tol:e}")
            }
            NumericAnomaly::NegativeVariance { index, part, value } => {
                write!(f, "Var[{part} {index}] = {value:e} is negative")
            }
            NumericAnomaly::NonHermitian { defect, tol } => {
                write!(f, "Augmented covariance is non-Hermitian: relative defect {defect:e} > {tol:e}")
            }
        }
    }
}

/// Flag the covariance when its relative Hermiticity defect exceeds `tol`.
pub fn check_hermitian(cov: &AugmentedCovariance, tol: f64) -> Option<NumericAnomaly> {
    let defect = cov.hermiticity_defect();
    (defect > tol).then_some(NumericAnomaly::NonHermitian { defect, tol })
}

/// Flag every negative diagonal entry of `ReRe` and `ImIm`.
///
/// Exact zeros (e.g. the reference moment after normalization) are not
/// anomalies.
pub fn check_variances(
    components: &CovarianceComponents, indices: &MomentIndices,
) -> Vec<NumericAnomaly> {
    let mut anomalies = Vec::new();
    for index in indices.iter() {
        let i = index.linear();
        for (part, value) in
            [(Part::Re, components.re_re[[i, i]]), (Part::Im, components.im_im[[i, i]])]
        {
            if value < 0.0 {
                anomalies.push(NumericAnomaly::NegativeVariance { index, part, value });
            }
        }
    }
    anomalies
}

/// Emit one warning per anomaly.
pub fn log_anomalies(anomalies: &[NumericAnomaly]) {
    for anomaly in anomalies {
        warn!(%anomaly, "numeric anomaly");
    }
}
