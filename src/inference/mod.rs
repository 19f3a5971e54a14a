//! inference — covariance algebra, linear algebra, and result diagnostics.
//!
//! Purpose
//! -------
//! Provide the numerical building blocks behind moment uncertainties: the
//! augmented covariance of a complex estimate and its propagation through
//! linear maps, a thin bridge to `nalgebra` decompositions, comparison of
//! measured moments against an external ground truth, and detection of
//! non-fatal numeric anomalies.
//!
//! Key behaviors
//! -------------
//! - [`AugmentedCovariance`] stores `Cov[(H, conj H)]`, propagates it through
//!   a complex Jacobian, and decomposes it into [`CovarianceComponents`].
//! - [`linalg`] copies between `ndarray` and `nalgebra`, inverts with a
//!   condition-number guard, and computes singular values, Schur eigenvalues
//!   and truncated pseudoinverses.
//! - [`comparison`] computes pulls and a χ² test against ground truth.
//! - [`diagnostics`] collects [`NumericAnomaly`] values and logs them with
//!   `tracing`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Matrices are dense and indexed by linear moment indices.
//! - Decompositions come from `nalgebra`; no hand-rolled inversion or
//!   eigen-solvers are used.
//! - Failures are reported as [`InferenceError`]; anomalies are values, not
//!   errors.
//!
//! Conventions
//! -----------
//! - `V_H` denotes the Hermitian covariance block and `V_P` the
//!   pseudo-covariance block of an augmented matrix.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests with small matrices whose results are
//!   known in closed form; end-to-end behavior is covered by the integration
//!   tests of the moment pipeline.

pub mod augmented;
pub mod comparison;
pub mod diagnostics;
pub mod errors;
pub mod linalg;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::augmented::{AugmentedCovariance, CovarianceComponents};
pub use self::comparison::{ChiSquaredOutcome, MomentPull, check_realness, chi_squared, pulls};
pub use self::diagnostics::{NumericAnomaly, Part, log_anomalies};
pub use self::errors::{InferenceError, InferenceResult};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::augmented::{AugmentedCovariance, CovarianceComponents};
    pub use super::comparison::{ChiSquaredOutcome, MomentPull, chi_squared, pulls};
    pub use super::diagnostics::NumericAnomaly;
    pub use super::errors::{InferenceError, InferenceResult};
}
