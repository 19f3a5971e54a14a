//! core — moment indices, event samples, options, and basis evaluation.
//!
//! Purpose
//! -------
//! Collect the building blocks shared by every stage of the moment pipeline:
//! the linearization of `(L, M)` moment labels, validated event containers
//! with explicit angle conventions, option structs, input guards, and the
//! spherical-harmonic basis evaluator. The estimator, the acceptance
//! integral matrix, and the corrector build on these primitives.
//!
//! Key behaviors
//! -------------
//! - Label and linearize moments via [`MomentIndex`] / [`MomentIndices`]
//!   (`i(L, M) = L(L+1)/2 + M`).
//! - Hold validated event coordinates in [`EventSample`] with [`EventMeta`]
//!   recording [`PolarAxis`] and [`AngleUnit`].
//! - Configure the pipeline via [`MomentOptions`] and [`CorrectionOptions`].
//! - Evaluate `Y_L^M(θ, φ)` for a whole moment set in one pass with
//!   [`SphericalHarmonicBasis`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `Lmax ≤ MAX_SUPPORTED_L`.
//! - Samples hold `θ ∈ [0, π]` and finite `φ` in radians.
//! - Vectors and matrices indexed by moments always use the linear index of
//!   the same [`MomentIndices`]; no keyed maps are used on hot paths.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based. Option builders take `Option<f64>` for tunable
//!   tolerances and fall back to documented defaults.
//! - This module performs no I/O and no logging.
//!
//! Downstream usage
//! ----------------
//! - Build an [`EventSample`] for data and one for accepted phase space,
//!   choose [`MomentOptions`], then hand both to `moments::pipeline`.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover the index bijection, event validation and
//!   unit conversion, option defaults, and basis closed forms plus
//!   orthonormality.

pub mod basis;
pub mod data;
pub mod index;
pub mod options;
pub mod units;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::basis::{SphericalHarmonicBasis, moment_factor};
pub use self::data::{EventMeta, EventSample};
pub use self::index::{MAX_SUPPORTED_L, MomentIndex, MomentIndices};
pub use self::options::{CorrectionOptions, MomentOptions};
pub use self::units::{AngleUnit, PolarAxis};
pub use self::validation::{MIN_EVENTS, validate_coordinates, validate_event_count};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::basis::SphericalHarmonicBasis;
    pub use super::data::{EventMeta, EventSample};
    pub use super::index::{MomentIndex, MomentIndices};
    pub use super::options::{CorrectionOptions, MomentOptions};
    pub use super::units::{AngleUnit, PolarAxis};
}
