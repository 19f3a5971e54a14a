//! pipeline — one-call moment analysis.
//!
//! Purpose
//! -------
//! Run estimator → corrector → report for one data sample and collect the
//! numeric anomalies found along the way.
//!
//! Key behaviors
//! -------------
//! - [`integral_matrix`] builds `I_acc` with the basis implied by the
//!   options, so data moments and matrix always agree.
//! - [`analyze_moments`] returns every intermediate stage in
//!   [`MomentAnalysis`]; `integral = None` is the explicit uncorrected path.
//! - Anomalies are logged with `tracing::warn!` and returned, never raised.
use crate::{
    inference::diagnostics::{NumericAnomaly, check_hermitian, check_variances, log_anomalies},
    moments::{
        acceptance::AcceptanceIntegralMatrix,
        core::{basis::SphericalHarmonicBasis, data::EventSample, options::MomentOptions},
        correction::{CorrectedMoments, correct_moments},
        errors::MomentResult,
        estimator::{RawMoments, estimate_moments},
        report::MomentReport,
    },
};
use tracing::{Level, enabled, info, warn};

/// All stages of one moment analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentAnalysis {
    pub raw: RawMoments,
    pub corrected: CorrectedMoments,
    pub report: MomentReport,
    pub anomalies: Vec<NumericAnomaly>,
}

/// Build the acceptance integral matrix for `options` from accepted
/// phase-space events.
///
/// The SVD and Schur diagnostics only run when `DEBUG` events are enabled;
/// the corrector performs its own conditioning check.
pub fn integral_matrix(
    phase_space: &EventSample, options: &MomentOptions,
) -> MomentResult<AcceptanceIntegralMatrix> {
    let basis = SphericalHarmonicBasis::new(options.indices);
    let integral = AcceptanceIntegralMatrix::from_phase_space(phase_space, &basis)?;
    if enabled!(Level::DEBUG) {
        if let Err(err) = integral.condition_number().and_then(|_| integral.eigenvalues()) {
            warn!(%err, "acceptance integral matrix diagnostics failed");
        }
    }
    Ok(integral)
}

/// analyze_moments — raw, corrected and normalized moments of a sample.
///
/// Parameters
/// ----------
/// - `sample`: `&EventSample`
///   Data events.
/// - `options`: `&MomentOptions`
/// - `integral`: `Option<&AcceptanceIntegralMatrix>`
///   `None` skips the acceptance correction.
///
/// Returns
/// -------
/// `MomentResult<MomentAnalysis>`
///
/// Errors
/// ------
/// - `MomentError::InsufficientEvents`
/// - `MomentError::BasisMismatch`
/// - `MomentError::SingularAcceptance`
/// - `MomentError::DegenerateNormalization`
///
/// Notes
/// -----
/// - Anomaly checks run on the raw and corrected augmented covariances
///   (Hermiticity) and on the normalized report (negative variances).
pub fn analyze_moments(
    sample: &EventSample, options: &MomentOptions, integral: Option<&AcceptanceIntegralMatrix>,
) -> MomentResult<MomentAnalysis> {
    let basis = SphericalHarmonicBasis::new(options.indices);
    let raw = estimate_moments(sample, &basis)?;
    let corrected = correct_moments(&raw, integral, &options.correction)?;
    let report = MomentReport::from_corrected(&corrected)?;

    let mut anomalies = Vec::new();
    anomalies.extend(check_hermitian(&raw.covariance, options.anomaly_tol));
    if corrected.acceptance_corrected {
        anomalies.extend(check_hermitian(&corrected.covariance, options.anomaly_tol));
    }
    anomalies.extend(check_variances(report.components(), basis.indices()));
    log_anomalies(&anomalies);

    info!(
        n_events = raw.n_events,
        max_l = basis.max_l(),
        acceptance_corrected = corrected.acceptance_corrected,
        n_anomalies = anomalies.len(),
        "moment analysis finished"
    );
    Ok(MomentAnalysis { raw, corrected, report, anomalies })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moments::{
        core::{
            data::EventMeta,
            index::MomentIndex,
            units::{AngleUnit, PolarAxis},
        },
        errors::MomentError,
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Wiring of the stages on a tiny sample without correction.
    // - Basis mismatch between options and a prebuilt matrix.
    // - Matrix construction without an active `DEBUG` subscriber.
    // - The report is derived from the stored corrected stage.
    //
    // They intentionally DO NOT cover:
    // - Statistical properties (see tests/integration_moment_pipeline.rs).
    // -------------------------------------------------------------------------

    fn sample() -> EventSample {
        EventSample::new(
            array![0.1, 0.5, 0.9, -0.3, -0.8, 0.0],
            array![10.0, 100.0, -45.0, 170.0, -120.0, 60.0],
            EventMeta::new(PolarAxis::CosTheta, AngleUnit::Degrees),
        )
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify the stages are chained and the report is normalized.
    //
    // Given
    // -----
    // - Six events, `Lmax = 2`, no integral matrix.
    //
    // Expect
    // ------
    // - Raw `H(0 0) = 6`, report `H(0 0) = 1`, uncorrected flag, and corrected
    //   values identical to raw values.
    fn uncorrected_analysis_chains_stages() {
        let opts = MomentOptions::new(2, None, None).unwrap();
        let out = analyze_moments(&sample(), &opts, None).unwrap();
        assert!((out.raw.values[0].re - 6.0).abs() < 1e-12);
        assert_eq!(out.report.value(MomentIndex { l: 0, m: 0 }).unwrap().re, 1.0);
        assert!(!out.report.acceptance_corrected());
        assert_eq!(out.corrected.values, out.raw.values);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a matrix built for another `Lmax` is rejected.
    //
    // Given
    // -----
    // - Matrix from `Lmax = 1` options, analysis with `Lmax = 2`.
    //
    // Expect
    // ------
    // - `BasisMismatch`.
    fn mismatched_integral_matrix_is_rejected() {
        let small = MomentOptions::new(1, None, None).unwrap();
        let integral = integral_matrix(&sample(), &small).unwrap();
        let opts = MomentOptions::new(2, None, None).unwrap();
        assert_eq!(
            analyze_moments(&sample(), &opts, Some(&integral)).unwrap_err(),
            MomentError::BasisMismatch { moments_max_l: 2, acceptance_max_l: 1 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Ensure `integral_matrix` skips the decompositions when no `DEBUG`
    // subscriber is installed and still returns the plain matrix.
    //
    // Given
    // -----
    // - A degenerate phase space (every event at one point), `Lmax = 2`,
    //   no tracing subscriber.
    //
    // Expect
    // ------
    // - The result equals `AcceptanceIntegralMatrix::from_phase_space` for
    //   the same basis.
    fn integral_matrix_without_debug_subscriber_returns_plain_matrix() {
        let opts = MomentOptions::new(2, None, None).unwrap();
        let phase_space = EventSample::new(
            array![0.3, 0.3, 0.3],
            array![40.0, 40.0, 40.0],
            EventMeta::new(PolarAxis::CosTheta, AngleUnit::Degrees),
        )
        .unwrap();
        let basis = SphericalHarmonicBasis::new(opts.indices);
        let expected = AcceptanceIntegralMatrix::from_phase_space(&phase_space, &basis).unwrap();
        assert_eq!(integral_matrix(&phase_space, &opts).unwrap(), expected);
    }

    #[test]
    // Purpose
    // -------
    // Verify the report is built from the corrected stage that the analysis
    // keeps.
    //
    // Given
    // -----
    // - Six events, `Lmax = 1`, a matrix from the same events.
    //
    // Expect
    // ------
    // - Rebuilding the report from `out.corrected` reproduces `out.report`.
    fn report_matches_stored_corrected_stage() {
        let opts = MomentOptions::new(1, None, None).unwrap();
        let integral = integral_matrix(&sample(), &opts).unwrap();
        let out = analyze_moments(&sample(), &opts, Some(&integral)).unwrap();
        assert!(out.corrected.acceptance_corrected);
        assert_eq!(MomentReport::from_corrected(&out.corrected).unwrap(), out.report);
    }
}
