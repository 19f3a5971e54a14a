//! Moment options — configuration for extraction and acceptance correction.
//!
//! Purpose
//! -------
//! Collect the knobs of the moment pipeline in one place: the truncation of
//! the spherical-harmonic expansion, the conditioning threshold used before
//! inverting the acceptance integral matrix, and the tolerance used when
//! screening results for numeric anomalies.
//!
//! Key behaviors
//! -------------
//! - [`CorrectionOptions`] holds the condition-number threshold consulted by
//!   the acceptance corrector.
//! - [`MomentOptions`] bundles the moment set, correction options, and the
//!   anomaly tolerance, and is the single configuration handle passed to
//!   `analyze_moments`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `max_condition_number` is finite and `≥ 1`.
//! - `anomaly_tol` is finite and `≥ 0`; it is relative to the largest
//!   covariance magnitude when checking Hermiticity.
//!
//! Conventions
//! -----------
//! - `None` arguments to the builders select the documented defaults.
//! - Builders never panic; invalid values return [`MomentError`].
//!
//! Testing notes
//! -------------
//! - Unit tests verify defaults and that invalid tolerances are rejected.
//!
//! [`MomentError`]: crate::moments::errors::MomentError
use crate::moments::{
    core::{
        index::MomentIndices,
        validation::{validate_anomaly_tolerance, validate_condition_tolerance},
    },
    errors::MomentResult,
};

/// Default `Lmax`: moments of partial waves with spin up to 2.
pub const DEFAULT_MAX_L: usize = 5;
/// Default condition-number threshold for the acceptance integral matrix.
pub const DEFAULT_MAX_CONDITION_NUMBER: f64 = 1e12;
/// Default relative tolerance for anomaly screening.
pub const DEFAULT_ANOMALY_TOL: f64 = 1e-10;

/// CorrectionOptions — settings of the acceptance-correction step.
///
/// Fields
/// ------
/// - `max_condition_number`: `f64`
///   Largest accepted ratio of extreme singular values of `I_acc`. Larger
///   values abort the correction with `SingularAcceptance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionOptions {
    pub max_condition_number: f64,
}

impl CorrectionOptions {
    /// Construct validated correction options.
    ///
    /// Parameters
    /// ----------
    /// - `max_condition_number`: `Option<f64>`
    ///   `None` selects [`DEFAULT_MAX_CONDITION_NUMBER`].
    ///
    /// Errors
    /// ------
    /// - `MomentError::InvalidConditionTolerance`
    ///   Returned when the value is non-finite or `< 1`.
    pub fn new(max_condition_number: Option<f64>) -> MomentResult<Self> {
        let max_condition_number = validate_condition_tolerance(
            max_condition_number.unwrap_or(DEFAULT_MAX_CONDITION_NUMBER),
        )?;
        Ok(CorrectionOptions { max_condition_number })
    }
}

impl Default for CorrectionOptions {
    fn default() -> Self {
        CorrectionOptions { max_condition_number: DEFAULT_MAX_CONDITION_NUMBER }
    }
}

/// MomentOptions — configuration of a full moment analysis.
///
/// Purpose
/// -------
/// Provide one validated handle describing which moments are extracted and
/// how strictly the correction and the anomaly screening behave.
///
/// Fields
/// ------
/// - `indices`: [`MomentIndices`]
///   Moment set `0 ≤ M ≤ L ≤ Lmax`.
/// - `correction`: [`CorrectionOptions`]
/// - `anomaly_tol`: `f64`
///   Relative tolerance for non-Hermitian covariance detection.
///
/// Notes
/// -----
/// - The same `indices` must be used for the acceptance integral matrix;
///   `integral_matrix(phase_space, &options)` guarantees this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentOptions {
    pub indices: MomentIndices,
    pub correction: CorrectionOptions,
    pub anomaly_tol: f64,
}

impl MomentOptions {
    /// Construct validated moment options.
    ///
    /// Parameters
    /// ----------
    /// - `max_l`: `usize`
    ///   Highest angular momentum of the expansion.
    /// - `max_condition_number`: `Option<f64>`
    ///   `None` selects [`DEFAULT_MAX_CONDITION_NUMBER`].
    /// - `anomaly_tol`: `Option<f64>`
    ///   `None` selects [`DEFAULT_ANOMALY_TOL`].
    ///
    /// Returns
    /// -------
    /// `MomentResult<MomentOptions>`
    ///
    /// Errors
    /// ------
    /// - `MomentError::MaxLTooLarge`
    /// - `MomentError::InvalidConditionTolerance`
    /// - `MomentError::InvalidAnomalyTolerance`
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use angular_moments::moments::core::options::MomentOptions;
    /// let opts = MomentOptions::new(3, Some(1e8), None).unwrap();
    /// assert_eq!(opts.indices.len(), 10);
    /// ```
    pub fn new(
        max_l: usize, max_condition_number: Option<f64>, anomaly_tol: Option<f64>,
    ) -> MomentResult<Self> {
        let indices = MomentIndices::new(max_l)?;
        let correction = CorrectionOptions::new(max_condition_number)?;
        let anomaly_tol = validate_anomaly_tolerance(anomaly_tol.unwrap_or(DEFAULT_ANOMALY_TOL))?;
        Ok(MomentOptions { indices, correction, anomaly_tol })
    }

    /// Options for partial waves with spin up to `max_spin` (`Lmax = 2j + 1`).
    pub fn from_wave_spin(max_spin: usize) -> MomentResult<Self> {
        Ok(MomentOptions { indices: MomentIndices::from_wave_spin(max_spin)?, ..Self::default() })
    }
}

impl Default for MomentOptions {
    /// `Lmax = 5`, condition threshold `1e12`, anomaly tolerance `1e-10`.
    fn default() -> Self {
        MomentOptions {
            indices: MomentIndices::from_max_l_unchecked(DEFAULT_MAX_L),
            correction: CorrectionOptions::default(),
            anomaly_tol: DEFAULT_ANOMALY_TOL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moments::errors::MomentError;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Defaults of `CorrectionOptions` and `MomentOptions`.
    // - Propagation of validation errors from the builders.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `None` arguments select the documented defaults.
    //
    // Given
    // -----
    // - `MomentOptions::new(5, None, None)`.
    //
    // Expect
    // ------
    // - Equal to `MomentOptions::default()`.
    fn none_arguments_select_defaults() {
        let opts = MomentOptions::new(DEFAULT_MAX_L, None, None).unwrap();
        assert_eq!(opts, MomentOptions::default());
        assert_eq!(opts.correction.max_condition_number, 1e12);
        assert_eq!(opts.indices.len(), 21);
    }

    #[test]
    // Purpose
    // -------
    // Ensure each invalid argument is rejected with its own error.
    //
    // Given
    // -----
    // - `max_l = 65`, condition tolerance `0.0`, anomaly tolerance `NaN`.
    //
    // Expect
    // ------
    // - `MaxLTooLarge`, `InvalidConditionTolerance`, `InvalidAnomalyTolerance`.
    fn invalid_arguments_are_rejected() {
        assert!(matches!(
            MomentOptions::new(65, None, None),
            Err(MomentError::MaxLTooLarge { .. })
        ));
        assert_eq!(
            MomentOptions::new(2, Some(0.0), None).unwrap_err(),
            MomentError::InvalidConditionTolerance { value: 0.0 }
        );
        assert!(matches!(
            MomentOptions::new(2, None, Some(f64::NAN)),
            Err(MomentError::InvalidAnomalyTolerance { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Check the wave-spin shortcut.
    //
    // Given
    // -----
    // - `max_spin = 1`.
    //
    // Expect
    // ------
    // - `Lmax = 3` with default tolerances.
    fn wave_spin_shortcut_sets_max_l() {
        let opts = MomentOptions::from_wave_spin(1).unwrap();
        assert_eq!(opts.indices.max_l(), 3);
        assert_eq!(opts.anomaly_tol, DEFAULT_ANOMALY_TOL);
    }
}
