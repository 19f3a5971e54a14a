//! Angle conventions for event coordinates.
//!
//! - [`AngleUnit`] declares whether angles arrive in radians or degrees.
//! - [`PolarAxis`] declares whether the polar coordinate is `θ` or `cosθ`.
//!
//! Notes
//! -----
//! - Both are metadata describing caller input; [`EventSample`] converts
//!   everything to `θ`, `φ` in radians once at construction.
//!
//! [`EventSample`]: crate::moments::core::data::EventSample

/// Unit of angular input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngleUnit {
    /// Radians.
    Radians,
    /// Degrees (e.g. φ ∈ [−180°, +180°]).
    Degrees,
}

impl AngleUnit {
    /// Convert a value in this unit to radians.
    pub fn to_radians(&self, value: f64) -> f64 {
        match self {
            AngleUnit::Radians => value,
            AngleUnit::Degrees => value.to_radians(),
        }
    }
}

/// Representation of the polar coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolarAxis {
    /// Polar angle `θ ∈ [0, π]`, in the sample's [`AngleUnit`].
    Theta,
    /// `cosθ ∈ [−1, 1]`; unitless.
    CosTheta,
}
