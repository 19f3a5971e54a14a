//! acceptance — Monte-Carlo acceptance integral matrix.
//!
//! Purpose
//! -------
//! Build the linear response `I_acc` that maps true moments onto the moments
//! observed through a non-uniform detection efficiency,
//! `H_meas ≈ I_acc · H_phys`, from a sample of phase-space events that
//! passed the acceptance.
//!
//! Key behaviors
//! -------------
//! - [`AcceptanceIntegralMatrix::from_phase_space`] evaluates
//!   `I[i, j] = (4π/N_ps) · sqrt((2L_j+1)/(2L_i+1)) · (2 − δ_{M_j 0}) ·
//!   Σ_k Re[Y_j(Ω_k)] · conj(Y_i(Ω_k))`
//!   in one pass over the sample using the shared basis evaluator.
//! - [`AcceptanceIntegralMatrix::from_matrix`] restores a matrix computed
//!   elsewhere after validating its shape and finiteness.
//! - Diagnostics ([`condition_number`](AcceptanceIntegralMatrix::condition_number),
//!   [`eigenvalues`](AcceptanceIntegralMatrix::eigenvalues)) are computed with
//!   `nalgebra` and logged at debug level.
//!
//! Invariants & assumptions
//! ------------------------
//! - For perfect acceptance (uniform phase space) `I_acc → 1` with
//!   statistical fluctuations `~1/sqrt(N_ps)`.
//! - The Monte-Carlo uncertainty of `I_acc` itself is not propagated into
//!   corrected moments.
//! - The matrix is computed once per (efficiency, `Lmax`, phase-space sample)
//!   and is read-only afterwards.
//!
//! Testing notes
//! -------------
//! - Unit tests verify shape validation in `from_matrix`, the element
//!   formula on a two-event sample, and that `get` uses `(L, M)` labels.
//! - The uniform-acceptance identity is checked in the integration tests.
use crate::{
    inference::linalg,
    moments::{
        core::{
            basis::SphericalHarmonicBasis, data::EventSample, index::MomentIndex,
            validation::validate_event_count,
        },
        errors::{MomentError, MomentResult},
    },
};
use ndarray::Array2;
use num_complex::Complex64;
use std::f64::consts::PI;
use tracing::debug;

/// AcceptanceIntegralMatrix — `n × n` complex response matrix.
///
/// Fields
/// ------
/// - `basis`: [`SphericalHarmonicBasis`] defining the moment set.
/// - `matrix`: `Array2<Complex64>` indexed by linear moment indices.
/// - `n_events`: `usize` phase-space events used (`0` when restored via
///   [`from_matrix`](Self::from_matrix)).
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptanceIntegralMatrix {
    basis: SphericalHarmonicBasis,
    matrix: Array2<Complex64>,
    n_events: usize,
}

impl AcceptanceIntegralMatrix {
    /// from_phase_space — integral matrix from accepted phase-space events.
    ///
    /// Parameters
    /// ----------
    /// - `sample`: `&EventSample`
    ///   Phase-space events that passed the acceptance.
    /// - `basis`: `&SphericalHarmonicBasis`
    ///   Must be the basis used for the data moments.
    ///
    /// Returns
    /// -------
    /// `MomentResult<AcceptanceIntegralMatrix>`
    ///
    /// Errors
    /// ------
    /// - `MomentError::InsufficientEvents`
    ///   Returned for a single-event sample; the same minimum as the
    ///   estimator is applied.
    ///
    /// Notes
    /// -----
    /// - Cost is `O(N_ps · n²)`.
    pub fn from_phase_space(
        sample: &EventSample, basis: &SphericalHarmonicBasis,
    ) -> MomentResult<Self> {
        let n_events = sample.len();
        validate_event_count(n_events)?;

        let n = basis.len();
        let indices: Vec<MomentIndex> = basis.indices().iter().collect();
        let mut y = vec![Complex64::new(0.0, 0.0); n];
        let mut sums = Array2::<Complex64>::zeros((n, n));
        for (theta, phi) in sample.iter() {
            basis.evaluate_all(theta, phi, &mut y);
            for i in 0..n {
                let y_i_conj = y[i].conj();
                for j in 0..n {
                    sums[[i, j]] += y_i_conj * y[j].re;
                }
            }
        }

        let norm = 4.0 * PI / n_events as f64;
        let matrix = Array2::from_shape_fn((n, n), |(i, j)| {
            let (li, lj) = (indices[i].l as f64, indices[j].l as f64);
            let m_factor = if indices[j].m == 0 { 1.0 } else { 2.0 };
            sums[[i, j]] * (norm * ((2.0 * lj + 1.0) / (2.0 * li + 1.0)).sqrt() * m_factor)
        });

        debug!(max_l = basis.max_l(), n_moments = n, n_events, "built acceptance integral matrix");
        Ok(AcceptanceIntegralMatrix { basis: *basis, matrix, n_events })
    }

    /// Restore a matrix computed elsewhere.
    ///
    /// Errors
    /// ------
    /// - `MomentError::ShapeMismatch`
    ///   Returned when `matrix` is not `n × n` for the basis.
    /// - `MomentError::Inference(NonFiniteMatrix)`
    ///   Returned for NaN/±inf entries.
    pub fn from_matrix(basis: SphericalHarmonicBasis, matrix: Array2<Complex64>) -> MomentResult<Self> {
        let n = basis.len();
        if matrix.dim() != (n, n) {
            return Err(MomentError::ShapeMismatch { expected: (n, n), found: matrix.dim() });
        }
        linalg::check_square_finite(&matrix)?;
        Ok(AcceptanceIntegralMatrix { basis, matrix, n_events: 0 })
    }

    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    pub fn basis(&self) -> &SphericalHarmonicBasis {
        &self.basis
    }

    pub fn n_events(&self) -> usize {
        self.n_events
    }

    /// Entry `I[(L, M), (L', M')]`.
    pub fn get(&self, row: MomentIndex, col: MomentIndex) -> MomentResult<Complex64> {
        let i = self.basis.indices().linear(row)?;
        let j = self.basis.indices().linear(col)?;
        Ok(self.matrix[[i, j]])
    }

    /// Spectral condition number `σ_max / σ_min`.
    pub fn condition_number(&self) -> MomentResult<f64> {
        let cond = linalg::condition_number(&self.matrix)?;
        debug!(condition_number = cond, "acceptance integral matrix conditioning");
        Ok(cond)
    }

    /// Eigenvalues from the complex Schur form.
    pub fn eigenvalues(&self) -> MomentResult<Vec<Complex64>> {
        let eig = linalg::eigenvalues(&self.matrix)?;
        debug!(eigenvalues = ?eig, "acceptance integral matrix eigenvalues");
        Ok(eig)
    }
}
