//! estimator — raw spherical-harmonic moments and their augmented covariance.
//!
//! Purpose
//! -------
//! Turn an event sample into unnormalized complex moments
//! `H(L, M) = Σ_k f_LM(θ_k, φ_k)` with per-event contributions
//! `f_LM = conj(sqrt(4π/(2L+1)) · Y_L^M)`, together with the Monte-Carlo
//! estimate of their augmented covariance.
//!
//! Key behaviors
//! -------------
//! - One pass over the sample evaluates the basis for each event and updates
//!   the running mean and the Hermitian / pseudo co-moments with Welford's
//!   recurrence:
//!   `C += (f − μ_old)(f − μ_new)^H`, `P += (f − μ_old)(f − μ_new)^T`.
//! - For i.i.d. events `Var[Σ f] = N · Var[f]`, so
//!   `V_aug = N · Cov([f; conj f]) = N/(N−1) · [[C, P], [conj P, conj C]]`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `N ≥ 2` (unbiased covariance); fewer events are a configuration error.
//! - Memory is `O(n²)` in the number of moments and independent of `N`.
//! - `H(0, 0) = N` exactly up to rounding, with zero variance.
//!
//! Testing notes
//! -------------
//! - Unit tests compare the single-pass covariance with a two-pass
//!   reference on a small sample and check the reference moment.
use crate::{
    inference::augmented::AugmentedCovariance,
    moments::{
        core::{
            basis::{SphericalHarmonicBasis, moment_factor},
            data::EventSample,
            validation::validate_event_count,
        },
        errors::MomentResult,
    },
};
use ndarray::{Array1, Array2};
use num_complex::Complex64;

/// RawMoments — unnormalized moments of one event sample.
///
/// Fields
/// ------
/// - `basis`: [`SphericalHarmonicBasis`] that produced the moments.
/// - `values`: `Array1<Complex64>` indexed by the linear moment index.
/// - `covariance`: [`AugmentedCovariance`] of `(H, conj H)`.
/// - `n_events`: `usize` sample size `N`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMoments {
    pub basis: SphericalHarmonicBasis,
    pub values: Array1<Complex64>,
    pub covariance: AugmentedCovariance,
    pub n_events: usize,
}

/// estimate_moments — raw moments and augmented covariance of a sample.
///
/// Parameters
/// ----------
/// - `sample`: `&EventSample`
///   Validated events with `θ`, `φ` in radians.
/// - `basis`: `&SphericalHarmonicBasis`
///   Moment set to extract.
///
/// Returns
/// -------
/// `MomentResult<RawMoments>`
///
/// Errors
/// ------
/// - `MomentError::InsufficientEvents`
///   Returned when the sample holds a single event.
///
/// Notes
/// -----
/// - Cost is `O(N · n²)` for the co-moment updates; the basis evaluation
///   itself is `O(N · n)`.
pub fn estimate_moments(
    sample: &EventSample, basis: &SphericalHarmonicBasis,
) -> MomentResult<RawMoments> {
    let n_events = sample.len();
    validate_event_count(n_events)?;

    let n = basis.len();
    let factors: Vec<f64> = basis.indices().iter().map(|idx| moment_factor(idx.l)).collect();

    let mut y = vec![Complex64::new(0.0, 0.0); n];
    let mut f = vec![Complex64::new(0.0, 0.0); n];
    let mut delta_old = vec![Complex64::new(0.0, 0.0); n];
    let mut mean = Array1::<Complex64>::zeros(n);
    let mut sum = Array1::<Complex64>::zeros(n);
    let mut c_acc = Array2::<Complex64>::zeros((n, n));
    let mut p_acc = Array2::<Complex64>::zeros((n, n));

    for (k, (theta, phi)) in sample.iter().enumerate() {
        basis.evaluate_all(theta, phi, &mut y);
        let weight = 1.0 / (k + 1) as f64;
        for i in 0..n {
            f[i] = (y[i] * factors[i]).conj();
            sum[i] += f[i];
            delta_old[i] = f[i] - mean[i];
            mean[i] += delta_old[i] * weight;
        }
        for i in 0..n {
            let d_i = delta_old[i];
            for j in 0..n {
                let d_new_j = f[j] - mean[j];
                c_acc[[i, j]] += d_i * d_new_j.conj();
                p_acc[[i, j]] += d_i * d_new_j;
            }
        }
    }

    let scale = n_events as f64 / (n_events - 1) as f64;
    c_acc.mapv_inplace(|v| v * scale);
    p_acc.mapv_inplace(|v| v * scale);
    let covariance = AugmentedCovariance::from_blocks(&c_acc, &p_acc)?;

    Ok(RawMoments { basis: *basis, values: sum, covariance, n_events })
}
