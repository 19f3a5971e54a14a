//! moments — acceptance-corrected spherical-harmonic moment analysis.
//!
//! Purpose
//! -------
//! Extract the spherical-harmonic moments `H(L, M)` of an angular
//! distribution from an event sample, correct them for a non-uniform
//! detection efficiency, and report normalized moments with their full
//! covariance. This is the main entry point of the crate and the surface the
//! Python bindings depend on.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds indices, event samples, options and the basis evaluator.
//! - [`estimator`] sums per-event basis values into raw moments and their
//!   Monte-Carlo augmented covariance ([`RawMoments`]).
//! - [`acceptance`] builds the integral matrix `I_acc` from accepted
//!   phase-space events ([`AcceptanceIntegralMatrix`]).
//! - [`correction`] applies `I_acc⁻¹` with first-order covariance
//!   propagation ([`CorrectedMoments`]).
//! - [`report`] normalizes to `H(0 0)` and decomposes the covariance
//!   ([`MomentReport`]).
//! - [`pipeline`] chains the stages ([`analyze_moments`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - One [`SphericalHarmonicBasis`] serves every stage; stages record the
//!   basis they used and refuse to combine mismatched ones.
//! - Events are i.i.d., so `Var[Σ f] = N · Var[f]`.
//! - Singular or ill-conditioned acceptance is fatal for the correction step
//!   only; the uncorrected path is always available.
//!
//! Conventions
//! -----------
//! - Moments use `f_LM = conj(sqrt(4π/(2L+1)) Y_L^M)`, so raw `H(0 0) = N`.
//! - Vectors and matrices are indexed by `i(L, M) = L(L+1)/2 + M`.
//! - Errors are [`MomentError`]; numeric anomalies are returned as values
//!   and logged with `tracing`.
//!
//! Downstream usage
//! ----------------
//! 1. Build [`EventSample`]s for data and accepted phase space.
//! 2. Choose [`MomentOptions`] (`Lmax`, conditioning threshold, anomaly
//!    tolerance).
//! 3. `let acc = integral_matrix(&phase_space, &opts)?;`
//! 4. `let analysis = analyze_moments(&data, &opts, Some(&acc))?;`
//! 5. Read `analysis.report` or compare it with
//!    [`inference::comparison`](crate::inference::comparison).
//!
//! Testing notes
//! -------------
//! - Unit tests live in each submodule; statistical end-to-end properties
//!   (uniform acceptance, isotropic samples, variance scaling, acceptance
//!   recovery) are in `tests/integration_moment_pipeline.rs`.

pub mod acceptance;
pub mod core;
pub mod correction;
pub mod errors;
pub mod estimator;
pub mod pipeline;
pub mod report;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::acceptance::AcceptanceIntegralMatrix;
pub use self::core::{
    AngleUnit, CorrectionOptions, EventMeta, EventSample, MomentIndex, MomentIndices,
    MomentOptions, PolarAxis, SphericalHarmonicBasis,
};
pub use self::correction::{CorrectedMoments, correct_moments};
pub use self::errors::{MomentError, MomentResult};
pub use self::estimator::{RawMoments, estimate_moments};
pub use self::pipeline::{MomentAnalysis, analyze_moments, integral_matrix};
pub use self::report::{CovarianceEntry, MomentReport};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use angular_moments::moments::prelude::*;
//
// to import the main moment-analysis surface in a single line.

pub mod prelude {
    pub use super::{
        AcceptanceIntegralMatrix, AngleUnit, CorrectionOptions, CovarianceEntry, EventMeta,
        EventSample, MomentAnalysis, MomentError, MomentIndex, MomentIndices, MomentOptions,
        MomentReport, MomentResult, PolarAxis, SphericalHarmonicBasis, analyze_moments,
        integral_matrix,
    };
}
