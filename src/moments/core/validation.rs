//! Moment validation helpers — reusable checks for event input and options.
//!
//! Purpose
//! -------
//! Centralize the small checks performed at the boundaries of the moment
//! stack, so constructors (`EventSample`, `MomentOptions`,
//! `CorrectionOptions`) and the estimator can fail fast with structured
//! [`MomentError`] values.
//!
//! Key behaviors
//! -------------
//! - Validate raw event coordinates (lengths, finiteness, polar domain).
//! - Validate the event count required by the unbiased covariance estimate.
//! - Validate numeric tolerances supplied through option structs.
//!
//! Invariants & assumptions
//! ------------------------
//! - Polar coordinates must lie in `[0, π]` (`θ`) or `[−1, 1]` (`cosθ`) after
//!   unit conversion; azimuths only need to be finite.
//! - The covariance estimate divides by `N − 1`, so `N ≥ MIN_EVENTS`.
//!
//! Conventions
//! -----------
//! - Event indices in errors are 0-based and point at the first offending
//!   event.
//! - This module contains no logging; it only inspects values and lengths.
use crate::moments::{
    core::units::{AngleUnit, PolarAxis},
    errors::{MomentError, MomentResult},
};
use ndarray::Array1;
use std::f64::consts::PI;

/// Minimum number of events for an unbiased covariance estimate.
pub const MIN_EVENTS: usize = 2;

/// Validate raw per-event coordinates before unit conversion.
///
/// Parameters
/// ----------
/// - `polar`: `&Array1<f64>`
///   `θ` (in `unit`) or `cosθ`, per `axis`.
/// - `azimuthal`: `&Array1<f64>`
///   `φ` in `unit`.
/// - `axis`: [`PolarAxis`]
/// - `unit`: [`AngleUnit`]
///
/// Returns
/// -------
/// `MomentResult<()>`
///
/// Errors
/// ------
/// - `MomentError::EmptySample`
/// - `MomentError::CoordinateLengthMismatch`
/// - `MomentError::NonFiniteCoordinate`
///   The polar array is scanned before the azimuthal array.
/// - `MomentError::PolarOutOfRange`
///
/// Notes
/// -----
/// - A `θ` bound is checked after conversion to radians, so `180°` and `π`
///   are both accepted.
pub fn validate_coordinates(
    polar: &Array1<f64>, azimuthal: &Array1<f64>, axis: PolarAxis, unit: AngleUnit,
) -> MomentResult<()> {
    if polar.len() != azimuthal.len() {
        return Err(MomentError::CoordinateLengthMismatch {
            polar: polar.len(),
            azimuthal: azimuthal.len(),
        });
    }
    if polar.is_empty() {
        return Err(MomentError::EmptySample);
    }

    for (index, &value) in polar.iter().enumerate() {
        if !value.is_finite() {
            return Err(MomentError::NonFiniteCoordinate { index, value });
        }
        let in_domain = match axis {
            PolarAxis::CosTheta => (-1.0..=1.0).contains(&value),
            PolarAxis::Theta => (0.0..=PI).contains(&unit.to_radians(value)),
        };
        if !in_domain {
            return Err(MomentError::PolarOutOfRange { index, value });
        }
    }
    if let Some((index, &value)) = azimuthal.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(MomentError::NonFiniteCoordinate { index, value });
    }
    Ok(())
}

/// Ensure `n_events ≥ MIN_EVENTS`.
///
/// Errors
/// ------
/// - `MomentError::EmptySample` when `n_events == 0`.
/// - `MomentError::InsufficientEvents` when `0 < n_events < MIN_EVENTS`.
pub fn validate_event_count(n_events: usize) -> MomentResult<()> {
    match n_events {
        0 => Err(MomentError::EmptySample),
        n if n < MIN_EVENTS => {
            Err(MomentError::InsufficientEvents { n_events: n, required: MIN_EVENTS })
        }
        _ => Ok(()),
    }
}

/// Validate a condition-number tolerance (finite, `≥ 1`).
pub fn validate_condition_tolerance(value: f64) -> MomentResult<f64> {
    if !value.is_finite() || value < 1.0 {
        return Err(MomentError::InvalidConditionTolerance { value });
    }
    Ok(value)
}

/// Validate an anomaly tolerance (finite, `≥ 0`).
pub fn validate_anomaly_tolerance(value: f64) -> MomentResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(MomentError::InvalidAnomalyTolerance { value });
    }
    Ok(value)
}
