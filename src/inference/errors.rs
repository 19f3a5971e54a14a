//! Unified error handling for inference routines.
//!
//! This module defines `InferenceError`, the central error type used by the
//! augmented-covariance algebra, the `ndarray`/`nalgebra` linear-algebra
//! bridge, and the ground-truth comparison helpers. It groups shape
//! violations, numerically singular matrices, and failed decompositions. An
//! alias `InferenceResult<T>` standardizes the return type across inference
//! code.

/// Unified error type for inference routines.
///
/// Covers dimension mismatches, singular or non-finite matrices, failed
/// decompositions, and degenerate comparisons. Provides readable diagnostics
/// through `Display`; moment-level code converts it into
/// [`MomentError`](crate::moments::errors::MomentError) via `From`.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Shapes ----
    /// Matrix dimensions do not match what the routine requires.
    DimensionMismatch { expected: (usize, usize), found: (usize, usize) },

    /// Vector lengths do not match.
    LengthMismatch { expected: usize, found: usize },

    // ---- Numerical ----
    /// Matrix entry is NaN/±inf.
    NonFiniteMatrix { row: usize, col: usize },

    /// Matrix is singular or its condition number exceeds the tolerance.
    SingularMatrix { condition_number: f64, tolerance: f64 },

    /// A library decomposition did not converge.
    DecompositionFailed { routine: &'static str },

    // ---- Comparison ----
    /// Covariance block has no direction above the eigenvalue cutoff.
    ZeroRank,

    /// χ² distribution could not be constructed.
    InvalidDegreesOfFreedom { dof: usize },
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl std::error::Error for InferenceError {}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Shapes ----
            InferenceError::DimensionMismatch { expected, found } => {
                write!(f, "Inference Error: Dimension mismatch (expected {expected:?}, found {found:?})")
            }
            InferenceError::LengthMismatch { expected, found } => {
                write!(f, "Inference Error: Length mismatch (expected {expected}, found {found})")
            }

            // ---- Numerical ----
            InferenceError::NonFiniteMatrix { row, col } => {
                write!(f, "Inference Error: Non-finite matrix entry at ({row}, {col})")
            }
            InferenceError::SingularMatrix { condition_number, tolerance } => write!(
                f,
                "Inference Error: Matrix is singular (condition number {condition_number:e}, tolerance {tolerance:e})"
            ),
            InferenceError::DecompositionFailed { routine } => {
                write!(f, "Inference Error: {routine} did not converge")
            }

            // ---- Comparison ----
            InferenceError::ZeroRank => {
                write!(f, "Inference Error: Covariance has no resolvable direction")
            }
            InferenceError::InvalidDegreesOfFreedom { dof } => {
                write!(f, "Inference Error: Invalid degrees of freedom ({dof}) for chi-squared")
            }
        }
    }
}
