//! angular_moments — acceptance-corrected spherical-harmonic moments with
//! Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the moment analysis to Python via the `_angular_moments` extension module.
//! When the `python-bindings` feature is enabled, this module defines the
//! Python-facing classes and the `moments` submodule used by the
//! `angular_moments` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`moments` and `inference`) as the public
//!   crate surface.
//! - Define `#[pyclass]` wrappers ([`AcceptanceMatrix`], [`SphericalMoments`])
//!   and the `#[pymodule]` initializer for the `_angular_moments` extension.
//! - Register the `moments` submodule under `angular_moments` so that
//!   dot-notation imports work.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, input conversion, and error mapping.
//! - Python inputs default to `cosθ` and `φ` in degrees, the layout produced
//!   by typical analysis ntuples.
//!
//! Conventions
//! -----------
//! - Moments are keyed by `(L, M)` tuples; covariance entries by
//!   `(L, M, L', M')` with values `(ReRe, ImIm, ReIm)`.
//! - Complex numbers cross the boundary as `(re, im)` tuples or as `complex128`
//!   numpy arrays.
//! - [`MomentError`](crate::moments::errors::MomentError) maps to
//!   `ValueError`.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on [`moments`] and [`inference`] directly
//!   and can ignore the PyO3 items guarded by `python-bindings`.
//! - The Python packaging layer imports `_angular_moments` and wraps its
//!   classes in user-facing APIs.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by
//!   `tests/integration_moment_pipeline.rs`; the PyO3 layer is exercised from
//!   Python.

pub mod inference;
pub mod moments;
pub mod utils;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use num_complex::Complex64;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    inference::comparison::chi_squared,
    moments::{
        acceptance::AcceptanceIntegralMatrix,
        core::{index::MomentIndex, options::MomentOptions},
        errors::MomentError,
        pipeline::{MomentAnalysis, analyze_moments, integral_matrix},
    },
    utils::{extract_event_sample, extract_f64_array},
};

/// AcceptanceMatrix — Python-facing acceptance integral matrix.
///
/// Purpose
/// -------
/// Build `I_acc` from accepted phase-space events once, so it can be reused
/// for every data sample analysed with the same `Lmax`.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `AcceptanceMatrix(polar, azimuthal, max_l=5, polar_axis="cos_theta", unit="degrees")`:
/// - `polar`, `azimuthal`: array-like of `f64`, equal lengths, at least two
///   events.
/// - `max_l`: `usize` — highest `L` of the moment basis.
/// - `polar_axis`: `"cos_theta"` or `"theta"`.
/// - `unit`: `"degrees"` or `"radians"`; applies to every angle.
///
/// Fields
/// ------
/// - `inner`: [`AcceptanceIntegralMatrix`]
#[cfg(feature = "python-bindings")]
#[pyclass(module = "angular_moments.moments")]
pub struct AcceptanceMatrix {
    inner: AcceptanceIntegralMatrix,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl AcceptanceMatrix {
    #[new]
    #[pyo3(
        text_signature = "(polar, azimuthal, /, max_l=5, polar_axis='cos_theta', unit='degrees')",
        signature = (polar, azimuthal, max_l = 5, polar_axis = None, unit = None)
    )]
    fn new<'py>(
        py: Python<'py>, polar: &Bound<'py, PyAny>, azimuthal: &Bound<'py, PyAny>, max_l: usize,
        polar_axis: Option<&str>, unit: Option<&str>,
    ) -> PyResult<Self> {
        let sample = extract_event_sample(py, polar, azimuthal, polar_axis, unit)?;
        let options = MomentOptions::new(max_l, None, None)?;
        let inner = integral_matrix(&sample, &options)?;
        Ok(AcceptanceMatrix { inner })
    }

    /// Highest `L` of the basis.
    #[getter]
    fn max_l(&self) -> usize {
        self.inner.basis().max_l()
    }

    /// Number of phase-space events used.
    #[getter]
    fn n_events(&self) -> usize {
        self.inner.n_events()
    }

    /// The matrix as a `complex128` array of shape `(K, K)`.
    #[getter]
    fn matrix<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<Complex64>> {
        self.inner.matrix().clone().into_pyarray(py)
    }

    /// Ratio of largest to smallest singular value.
    #[getter]
    fn condition_number(&self) -> PyResult<f64> {
        Ok(self.inner.condition_number()?)
    }

    /// Eigenvalues as `(re, im)` pairs.
    #[getter]
    fn eigenvalues(&self) -> PyResult<Vec<(f64, f64)>> {
        Ok(self.inner.eigenvalues()?.into_iter().map(|z| (z.re, z.im)).collect())
    }
}

/// SphericalMoments — Python-facing moment analysis of one data sample.
///
/// Purpose
/// -------
/// Run [`analyze_moments`] on Python arrays and expose the normalized
/// moments, their covariance decomposition and the anomalies found.
///
/// Key behaviors
/// -------------
/// - `acceptance=None` yields uncorrected moments.
/// - The acceptance matrix fixes `Lmax`; `max_l` must agree with it.
/// - Numeric anomalies are reported as strings and never raise.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `SphericalMoments(polar, azimuthal, max_l=5, acceptance=None,
/// polar_axis="cos_theta", unit="degrees", max_condition_number=None,
/// anomaly_tol=None)`.
///
/// Fields
/// ------
/// - `inner`: [`MomentAnalysis`]
#[cfg(feature = "python-bindings")]
#[pyclass(module = "angular_moments.moments")]
pub struct SphericalMoments {
    inner: MomentAnalysis,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl SphericalMoments {
    #[new]
    #[allow(clippy::too_many_arguments)]
    #[pyo3(
        text_signature = "(polar, azimuthal, /, max_l=5, acceptance=None, polar_axis='cos_theta', unit='degrees', max_condition_number=None, anomaly_tol=None)",
        signature = (
            polar, azimuthal, max_l = 5, acceptance = None, polar_axis = None, unit = None,
            max_condition_number = None, anomaly_tol = None
        )
    )]
    fn new<'py>(
        py: Python<'py>, polar: &Bound<'py, PyAny>, azimuthal: &Bound<'py, PyAny>, max_l: usize,
        acceptance: Option<PyRef<'py, AcceptanceMatrix>>, polar_axis: Option<&str>,
        unit: Option<&str>, max_condition_number: Option<f64>, anomaly_tol: Option<f64>,
    ) -> PyResult<Self> {
        let sample = extract_event_sample(py, polar, azimuthal, polar_axis, unit)?;
        let options = MomentOptions::new(max_l, max_condition_number, anomaly_tol)?;
        let integral = acceptance.as_ref().map(|acc| &acc.inner);
        let inner = analyze_moments(&sample, &options, integral)?;
        Ok(SphericalMoments { inner })
    }

    /// Number of data events.
    #[getter]
    fn n_events(&self) -> usize {
        self.inner.raw.n_events
    }

    #[getter]
    fn max_l(&self) -> usize {
        self.inner.report.basis().max_l()
    }

    #[getter]
    fn acceptance_corrected(&self) -> bool {
        self.inner.report.acceptance_corrected()
    }

    /// Normalization constant `H(0 0)` before normalization, as `(re, im)`.
    #[getter]
    fn norm(&self) -> (f64, f64) {
        let norm = self.inner.report.norm();
        (norm.re, norm.im)
    }

    /// Normalized moments as `[((L, M), (re, im)), ...]`.
    #[getter]
    fn moments(&self) -> Vec<((usize, usize), (f64, f64))> {
        self.inner
            .report
            .moments()
            .into_iter()
            .map(|(idx, h)| ((idx.l, idx.m), (h.re, h.im)))
            .collect()
    }

    /// Normalized moments as a `complex128` array in linear-index order.
    #[getter]
    fn values<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<Complex64>> {
        self.inner.report.values().clone().into_pyarray(py)
    }

    /// Raw (unnormalized, uncorrected) moments in linear-index order.
    #[getter]
    fn raw_values<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<Complex64>> {
        self.inner.raw.values.clone().into_pyarray(py)
    }

    /// Covariance entries as `[((L, M, L', M'), (ReRe, ImIm, ReIm)), ...]`.
    #[getter]
    fn covariances(&self) -> Vec<((usize, usize, usize, usize), (f64, f64, f64))> {
        self.inner
            .report
            .iter_covariances()
            .map(|(row, col, e)| ((row.l, row.m, col.l, col.m), (e.re_re, e.im_im, e.re_im)))
            .collect()
    }

    /// Augmented covariance `[[V_H, V_P], [conj V_P, conj V_H]]`.
    #[getter]
    fn augmented_covariance<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<Complex64>> {
        self.inner.report.augmented_covariance().matrix().clone().into_pyarray(py)
    }

    /// Numeric anomalies found during the analysis.
    #[getter]
    fn anomalies(&self) -> Vec<String> {
        self.inner.anomalies.iter().map(ToString::to_string).collect()
    }

    /// Standard errors `(σ_Re, σ_Im)` of `H(l m)`.
    #[pyo3(text_signature = "(self, l, m)")]
    fn standard_errors(&self, l: usize, m: usize) -> PyResult<(f64, f64)> {
        Ok(self.inner.report.standard_errors(MomentIndex { l, m })?)
    }

    /// χ² of the real parts against ground-truth moments.
    ///
    /// `truth_re` and `truth_im` are in linear-index order and normalized so
    /// that `H(0 0) = 1`. Returns `(chi2, dof, p_value)`.
    #[pyo3(text_signature = "(self, truth_re, truth_im)")]
    fn chi_squared<'py>(
        &self, py: Python<'py>, truth_re: &Bound<'py, PyAny>, truth_im: &Bound<'py, PyAny>,
    ) -> PyResult<(f64, usize, f64)> {
        let re: PyReadonlyArray1<f64> = extract_f64_array(py, truth_re)?;
        let im: PyReadonlyArray1<f64> = extract_f64_array(py, truth_im)?;
        let (re, im) = (re.as_array(), im.as_array());
        if re.len() != im.len() {
            return Err(PyValueError::new_err(format!(
                "truth_re and truth_im differ in length ({} vs {})",
                re.len(),
                im.len()
            )));
        }
        let truth: Array1<Complex64> =
            re.iter().zip(im.iter()).map(|(&a, &b)| Complex64::new(a, b)).collect();
        let out = chi_squared(&self.inner.report, &truth).map_err(MomentError::from)?;
        Ok((out.stat, out.dof, out.p_value))
    }
}

/// _angular_moments — PyO3 module initializer for the Python extension.
///
/// Key behaviors
/// -------------
/// - Create the `moments` submodule, attach it to `_angular_moments`, and
///   register it in `sys.modules` as `angular_moments.moments`.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating the submodule or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _angular_moments<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let moments_mod = PyModule::new(_py, "moments")?;
    moments_module(_py, m, &moments_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("angular_moments.moments", moments_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn moments_module<'py>(
    _py: Python, angular_moments: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<AcceptanceMatrix>()?;
    m.add_class::<SphericalMoments>()?;
    angular_moments.add_submodule(m)?;
    Ok(())
}
