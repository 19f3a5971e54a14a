//! report — normalized moments and their decomposed covariance.
//!
//! Purpose
//! -------
//! Package the final result of a moment analysis: moments normalized to the
//! reference moment `H(0 0)`, the normalized augmented covariance, and its
//! decomposition into `Cov[Re, Re]`, `Cov[Im, Im]` and `Cov[Re, Im]` tables
//! addressable by `(L, M)` pairs.
//!
//! Key behaviors
//! -------------
//! - Normalization divides values by `H(0 0)` and the augmented covariance by
//!   `H(0 0)²`; the reference moment is then set to exactly `1 + 0i`.
//! - Lookups ([`MomentReport::value`], [`MomentReport::covariance`],
//!   [`MomentReport::standard_errors`]) validate their `(L, M)` arguments.
//! - Negative variances are never clamped; their standard error is `NaN`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The normalization is treated as exact; its own uncertainty is not
//!   folded into the covariance.
//! - Tables are dense `n × n` arrays indexed by linear moment indices.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the exact reference moment, the `1/norm²` scaling of
//!   the covariance, the diagonal identity `ReRe + ImIm = Re V_H`, and the
//!   degenerate-normalization error.
use crate::{
    inference::augmented::{AugmentedCovariance, CovarianceComponents},
    moments::{
        core::{basis::SphericalHarmonicBasis, index::MomentIndex},
        correction::CorrectedMoments,
        errors::{MomentError, MomentResult},
    },
};
use ndarray::Array1;
use num_complex::Complex64;

/// Covariance triple of a moment pair `(i, j)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CovarianceEntry {
    /// `Cov[Re H_i, Re H_j]`.
    pub re_re: f64,
    /// `Cov[Im H_i, Im H_j]`.
    pub im_im: f64,
    /// `Cov[Re H_i, Im H_j]`.
    pub re_im: f64,
}

/// MomentReport — normalized moments with full covariance information.
///
/// Fields
/// ------
/// - `basis`: moment set of the report.
/// - `values`: normalized moments, `values[0] = 1 + 0i`.
/// - `covariance`: normalized augmented covariance.
/// - `components`: real/imaginary covariance blocks of `covariance`.
/// - `norm`: `H(0 0)` before normalization.
/// - `acceptance_corrected`: whether an integral matrix was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentReport {
    basis: SphericalHarmonicBasis,
    values: Array1<Complex64>,
    covariance: AugmentedCovariance,
    components: CovarianceComponents,
    norm: Complex64,
    acceptance_corrected: bool,
}

impl MomentReport {
    /// from_corrected — normalize and decompose corrected moments.
    ///
    /// Parameters
    /// ----------
    /// - `corrected`: `&CorrectedMoments`
    ///   Left untouched; only the value vector is copied, the scaled
    ///   covariance is built directly from the borrowed one.
    ///
    /// Returns
    /// -------
    /// `MomentResult<MomentReport>`
    ///
    /// Errors
    /// ------
    /// - `MomentError::DegenerateNormalization`
    ///   Returned when `H(0 0)` is zero or has a non-finite component.
    pub fn from_corrected(corrected: &CorrectedMoments) -> MomentResult<Self> {
        let norm = corrected.values[0];
        if !(norm.re.is_finite() && norm.im.is_finite()) || norm.norm_sqr() == 0.0 {
            return Err(MomentError::DegenerateNormalization { re: norm.re, im: norm.im });
        }

        let mut values = corrected.values.mapv(|v| v / norm);
        values[0] = Complex64::new(1.0, 0.0);
        let covariance = corrected.covariance.scaled(norm);
        let components = covariance.decompose();
        Ok(MomentReport {
            basis: corrected.basis,
            values,
            covariance,
            components,
            norm,
            acceptance_corrected: corrected.acceptance_corrected,
        })
    }

    pub fn basis(&self) -> &SphericalHarmonicBasis {
        &self.basis
    }

    /// Normalized moments in linear-index order.
    pub fn values(&self) -> &Array1<Complex64> {
        &self.values
    }

    /// Ordered `((L, M), H)` list.
    pub fn moments(&self) -> Vec<(MomentIndex, Complex64)> {
        self.basis.indices().iter().map(|idx| (idx, self.values[idx.linear()])).collect()
    }

    /// Normalized moment `H(L, M)`.
    pub fn value(&self, idx: MomentIndex) -> MomentResult<Complex64> {
        Ok(self.values[self.basis.indices().linear(idx)?])
    }

    pub fn augmented_covariance(&self) -> &AugmentedCovariance {
        &self.covariance
    }

    pub fn components(&self) -> &CovarianceComponents {
        &self.components
    }

    /// Reference moment before normalization.
    pub fn norm(&self) -> Complex64 {
        self.norm
    }

    pub fn acceptance_corrected(&self) -> bool {
        self.acceptance_corrected
    }

    /// Covariance triple of `(H_i, H_j)`.
    pub fn covariance(&self, row: MomentIndex, col: MomentIndex) -> MomentResult<CovarianceEntry> {
        let i = self.basis.indices().linear(row)?;
        let j = self.basis.indices().linear(col)?;
        Ok(self.entry(i, j))
    }

    /// Every ordered pair `((L, M), (L', M'), entry)` in linear-index order.
    pub fn iter_covariances(
        &self,
    ) -> impl Iterator<Item = (MomentIndex, MomentIndex, CovarianceEntry)> + '_ {
        let indices = self.basis.indices();
        indices.iter().flat_map(move |row| {
            indices.iter().map(move |col| (row, col, self.entry(row.linear(), col.linear())))
        })
    }

    /// `(σ_Re, σ_Im)` of `H(L, M)`; `NaN` for a negative variance.
    pub fn standard_errors(&self, idx: MomentIndex) -> MomentResult<(f64, f64)> {
        let i = self.basis.indices().linear(idx)?;
        Ok((self.components.re_re[[i, i]].sqrt(), self.components.im_im[[i, i]].sqrt()))
    }

    fn entry(&self, i: usize, j: usize) -> CovarianceEntry {
        CovarianceEntry {
            re_re: self.components.re_re[[i, j]],
            im_im: self.components.im_im[[i, j]],
            re_im: self.components.re_im[[i, j]],
        }
    }
}
