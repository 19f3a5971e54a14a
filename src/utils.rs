//! Python-boundary helpers: array extraction and event-sample conversion.
#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::moments::core::{
    data::{EventMeta, EventSample},
    units::{AngleUnit, PolarAxis},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// Accept a contiguous `numpy.ndarray`, anything with `to_numpy()`, or a
/// sequence of floats.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Parse the polar-axis keyword (`"cos_theta"` or `"theta"`).
#[cfg(feature = "python-bindings")]
pub fn extract_polar_axis(polar_axis: Option<&str>) -> PyResult<PolarAxis> {
    match polar_axis.unwrap_or("cos_theta").to_lowercase().as_str() {
        "cos_theta" | "costheta" | "cos" => Ok(PolarAxis::CosTheta),
        "theta" => Ok(PolarAxis::Theta),
        other => Err(PyValueError::new_err(format!(
            "invalid polar_axis {other:?} (expected 'cos_theta' or 'theta')"
        ))),
    }
}

/// Parse the angle-unit keyword (`"degrees"` or `"radians"`).
#[cfg(feature = "python-bindings")]
pub fn extract_angle_unit(unit: Option<&str>) -> PyResult<AngleUnit> {
    match unit.unwrap_or("degrees").to_lowercase().as_str() {
        "degrees" | "deg" => Ok(AngleUnit::Degrees),
        "radians" | "rad" => Ok(AngleUnit::Radians),
        other => Err(PyValueError::new_err(format!(
            "invalid unit {other:?} (expected 'degrees' or 'radians')"
        ))),
    }
}

/// Build a validated [`EventSample`] from Python arrays.
///
/// Defaults follow the usual analysis layout: `cosθ` and `φ` in degrees.
#[cfg(feature = "python-bindings")]
pub fn extract_event_sample<'py>(
    py: Python<'py>, polar: &Bound<'py, PyAny>, azimuthal: &Bound<'py, PyAny>,
    polar_axis: Option<&str>, unit: Option<&str>,
) -> PyResult<EventSample> {
    let meta = EventMeta::new(extract_polar_axis(polar_axis)?, extract_angle_unit(unit)?);

    let polar_arr = extract_f64_array(py, polar)?;
    let azimuthal_arr = extract_f64_array(py, azimuthal)?;
    let polar_slice = polar_arr
        .as_slice()
        .map_err(|_| PyValueError::new_err("polar must be a 1-D contiguous float64 array"))?;
    let azimuthal_slice = azimuthal_arr
        .as_slice()
        .map_err(|_| PyValueError::new_err("azimuthal must be a 1-D contiguous float64 array"))?;

    let sample = EventSample::new(
        Array1::from(polar_slice.to_vec()),
        Array1::from(azimuthal_slice.to_vec()),
        meta,
    )?;
    Ok(sample)
}
