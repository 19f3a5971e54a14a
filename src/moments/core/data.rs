//! Event containers for moment extraction.
//!
//! Purpose
//! -------
//! Provide a small, validated container for per-event angular coordinates and
//! their metadata. This module centralizes input validation for raw event
//! data and standardizes how angle units are represented, so the estimator
//! and the integral-matrix builder can assume clean `θ`, `φ` in radians.
//!
//! Key behaviors
//! -------------
//! - [`EventSample`] enforces basic invariants (non-empty, equal-length,
//!   finite coordinates, polar coordinate inside its domain).
//! - [`EventMeta`] records how the caller supplied the coordinates
//!   (`θ` vs `cosθ`, radians vs degrees) without changing what is stored.
//!
//! Invariants & assumptions
//! ------------------------
//! - Stored `theta` lies in `[0, π]` and stored `phi` is finite, both in
//!   radians.
//! - The sample is read-only after construction; events are assumed i.i.d.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; validation errors report the first offending event.
//! - `cosθ` inputs are converted via `acos`, which maps `[−1, 1]` onto
//!   `[0, π]` exactly.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy path for every input convention and each
//!   rejection branch.
use crate::moments::{
    core::{
        units::{AngleUnit, PolarAxis},
        validation::validate_coordinates,
    },
    errors::MomentResult,
};
use ndarray::Array1;

/// `EventSample` — validated angular coordinates of an event sample.
///
/// Purpose
/// -------
/// Represent one already-materialized, read-only event sample (data or
/// accepted phase space) as polar and azimuthal angles in radians.
///
/// Fields
/// ------
/// - `theta`: `Array1<f64>`
///   Polar angles in `[0, π]`.
/// - `phi`: `Array1<f64>`
///   Azimuthal angles, finite.
/// - `meta`: [`EventMeta`]
///   How the caller supplied the coordinates.
///
/// Invariants
/// ----------
/// - `theta.len() == phi.len() > 0`.
///
/// Performance
/// -----------
/// - Construction is one O(n) pass plus the unit conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSample {
    theta: Array1<f64>,
    phi: Array1<f64>,
    meta: EventMeta,
}

impl EventSample {
    /// Construct a validated [`EventSample`] from raw coordinates.
    ///
    /// Parameters
    /// ----------
    /// - `polar`: `Array1<f64>`
    ///   `θ` or `cosθ` per event, as declared by `meta.polar`.
    /// - `azimuthal`: `Array1<f64>`
    ///   `φ` per event in `meta.unit`.
    /// - `meta`: [`EventMeta`]
    ///
    /// Returns
    /// -------
    /// `MomentResult<EventSample>`
    ///
    /// Errors
    /// ------
    /// - `MomentError::EmptySample`
    /// - `MomentError::CoordinateLengthMismatch { polar, azimuthal }`
    /// - `MomentError::NonFiniteCoordinate { index, value }`
    /// - `MomentError::PolarOutOfRange { index, value }`
    ///   `cosθ` outside `[−1, 1]` or `θ` outside `[0, π]` (after unit
    ///   conversion).
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use angular_moments::moments::core::data::{EventMeta, EventSample};
    /// # use angular_moments::moments::core::units::{AngleUnit, PolarAxis};
    /// let meta = EventMeta::new(PolarAxis::CosTheta, AngleUnit::Degrees);
    /// let sample = EventSample::new(array![0.5, -1.0], array![90.0, -180.0], meta).unwrap();
    /// assert_eq!(sample.len(), 2);
    /// ```
    pub fn new(polar: Array1<f64>, azimuthal: Array1<f64>, meta: EventMeta) -> MomentResult<Self> {
        validate_coordinates(&polar, &azimuthal, meta.polar, meta.unit)?;

        let theta = match meta.polar {
            PolarAxis::CosTheta => polar.mapv(f64::acos),
            PolarAxis::Theta => polar.mapv(|v| meta.unit.to_radians(v)),
        };
        let phi = azimuthal.mapv(|v| meta.unit.to_radians(v));
        Ok(EventSample { theta, phi, meta })
    }

    /// Build a sample from `(polar, azimuthal)` pairs.
    pub fn from_pairs<I>(pairs: I, meta: EventMeta) -> MomentResult<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (polar, azimuthal): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        Self::new(Array1::from(polar), Array1::from(azimuthal), meta)
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.theta.len()
    }

    /// Never true for a constructed sample.
    pub fn is_empty(&self) -> bool {
        self.theta.is_empty()
    }

    /// Polar angles in radians.
    pub fn theta(&self) -> &Array1<f64> {
        &self.theta
    }

    /// Azimuthal angles in radians.
    pub fn phi(&self) -> &Array1<f64> {
        &self.phi
    }

    pub fn meta(&self) -> &EventMeta {
        &self.meta
    }

    /// Iterate over `(θ, φ)` in radians.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.theta.iter().copied().zip(self.phi.iter().copied())
    }
}

/// `EventMeta` — how raw event coordinates were supplied.
///
/// Fields
/// ------
/// - `polar`: [`PolarAxis`]
///   `θ` or `cosθ`.
/// - `unit`: [`AngleUnit`]
///   Unit of `φ` and, for [`PolarAxis::Theta`], of `θ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventMeta {
    pub polar: PolarAxis,
    pub unit: AngleUnit,
}

impl EventMeta {
    pub fn new(polar: PolarAxis, unit: AngleUnit) -> EventMeta {
        EventMeta { polar, unit }
    }
}

impl Default for EventMeta {
    /// `θ` and `φ` in radians.
    fn default() -> Self {
        EventMeta { polar: PolarAxis::Theta, unit: AngleUnit::Radians }
    }
}
