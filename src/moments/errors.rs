//! Errors for moment extraction and acceptance correction (configuration
//! checks, event validation, singular acceptance, and normalization failures).
//!
//! This module defines the moment error type, [`MomentError`], used across the
//! Rust core and the optional Python-facing API. It implements
//! `Display`/`Error` and converts to `PyErr` for PyO3 when the
//! `python-bindings` feature is enabled.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy); event indices point at the
//!   first offending event.
//! - Moment indices are reported as `(L, M)` pairs, never as linear indices,
//!   so messages stay meaningful when `Lmax` changes.
//! - Linear-algebra failures raised in `inference` are folded into
//!   [`MomentError::Inference`] so callers only match on one type.
//! - Numeric anomalies are **not** errors; they are collected as
//!   [`NumericAnomaly`](crate::inference::diagnostics::NumericAnomaly) values.
use crate::inference::errors::InferenceError;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Crate-wide result alias for moment operations that may produce
/// [`MomentError`].
pub type MomentResult<T> = Result<T, MomentError>;

/// Unified error type for moment extraction and correction.
///
/// Covers invalid configuration (options, event input, basis mismatches),
/// fatal acceptance problems, and degenerate normalization. Implements
/// `Display`/`Error` and converts to a Python `ValueError` at PyO3 boundaries.
#[derive(Debug, Clone, PartialEq)]
pub enum MomentError {
    // ---- Configuration ----
    /// Requested maximum L is above the supported limit.
    MaxLTooLarge { max_l: usize, limit: usize },

    /// Condition-number tolerance must be finite and ≥ 1.
    InvalidConditionTolerance { value: f64 },

    /// Anomaly tolerance must be finite and ≥ 0.
    InvalidAnomalyTolerance { value: f64 },

    /// Moment index outside the configured moment set.
    IndexOutOfRange { l: usize, m: usize, max_l: usize },

    /// Moments and acceptance matrix were built with different bases.
    BasisMismatch { moments_max_l: usize, acceptance_max_l: usize },

    /// Array shape does not match the configured moment set.
    ShapeMismatch { expected: (usize, usize), found: (usize, usize) },

    // ---- Event input ----
    /// Event sample has no events.
    EmptySample,

    /// Too few events for an unbiased covariance estimate.
    InsufficientEvents { n_events: usize, required: usize },

    /// Polar and azimuthal arrays differ in length.
    CoordinateLengthMismatch { polar: usize, azimuthal: usize },

    /// An event coordinate is NaN/±inf.
    NonFiniteCoordinate { index: usize, value: f64 },

    /// Polar coordinate outside its domain (θ ∉ [0, π] or |cosθ| > 1).
    PolarOutOfRange { index: usize, value: f64 },

    // ---- Acceptance correction ----
    /// Acceptance integral matrix is singular or too ill-conditioned.
    SingularAcceptance { condition_number: f64, tolerance: f64 },

    // ---- Normalization ----
    /// Reference moment H(0, 0) is zero or non-finite.
    DegenerateNormalization { re: f64, im: f64 },

    // ---- Inference passthrough ----
    /// Linear-algebra or comparison failure from `inference`.
    Inference(InferenceError),
}

impl std::error::Error for MomentError {}

impl std::fmt::Display for MomentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            MomentError::MaxLTooLarge { max_l, limit } => {
                write!(f, "Maximum L = {max_l} exceeds the supported limit of {limit}.")
            }
            MomentError::InvalidConditionTolerance { value } => {
                write!(f, "Condition-number tolerance must be finite and >= 1; got: {value}")
            }
            MomentError::InvalidAnomalyTolerance { value } => {
                write!(f, "Anomaly tolerance must be finite and >= 0; got: {value}")
            }
            MomentError::IndexOutOfRange { l, m, max_l } => {
                write!(f, "Moment index (L = {l}, M = {m}) is outside 0 <= M <= L <= {max_l}.")
            }
            MomentError::BasisMismatch { moments_max_l, acceptance_max_l } => {
                write!(
                    f,
                    "Moments use max L = {moments_max_l} but the acceptance matrix uses max L = {acceptance_max_l}."
                )
            }
            MomentError::ShapeMismatch { expected, found } => {
                write!(f, "Shape mismatch: expected {expected:?}, found {found:?}")
            }
            // ---- Event input ----
            MomentError::EmptySample => {
                write!(f, "Event sample is empty.")
            }
            MomentError::InsufficientEvents { n_events, required } => {
                write!(
                    f,
                    "Event sample has {n_events} events; at least {required} are required for a covariance estimate."
                )
            }
            MomentError::CoordinateLengthMismatch { polar, azimuthal } => {
                write!(
                    f,
                    "Polar ({polar}) and azimuthal ({azimuthal}) coordinate arrays differ in length."
                )
            }
            MomentError::NonFiniteCoordinate { index, value } => {
                write!(f, "Event {index} has a non-finite coordinate: {value}")
            }
            MomentError::PolarOutOfRange { index, value } => {
                write!(f, "Event {index} has a polar coordinate outside its domain: {value}")
            }
            // ---- Acceptance correction ----
            MomentError::SingularAcceptance { condition_number, tolerance } => {
                write!(
                    f,
                    "Acceptance integral matrix is singular or ill-conditioned: condition number {condition_number:e} exceeds {tolerance:e}."
                )
            }
            // ---- Normalization ----
            MomentError::DegenerateNormalization { re, im } => {
                write!(f, "Reference moment H(0 0) = ({re}, {im}) cannot be used for normalization.")
            }
            // ---- Inference passthrough ----
            MomentError::Inference(err) => write!(f, "{err}"),
        }
    }
}

impl From<InferenceError> for MomentError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::SingularMatrix { condition_number, tolerance } => {
                MomentError::SingularAcceptance { condition_number, tolerance }
            }
            other => MomentError::Inference(other),
        }
    }
}

/// Convert a [`MomentError`] into a Python `ValueError` with the error message.
///
/// This is used at the Rust↔Python boundary to surface domain errors cleanly.
#[cfg(feature = "python-bindings")]
impl From<MomentError> for PyErr {
    fn from(err: MomentError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
