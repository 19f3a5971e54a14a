//! Moment indices and their linearization.
//!
//! Purpose
//! -------
//! Address every moment slot `(L, M)` of a truncated spherical-harmonic
//! expansion through one dense running index so that hot loops, vectors and
//! matrices never need a keyed map.
//!
//! Key behaviors
//! -------------
//! - [`MomentIndex`] is a plain `(L, M)` label with `0 ≤ M ≤ L`.
//! - [`MomentIndices`] describes the set `0 ≤ L ≤ Lmax` and maps it
//!   bijectively onto `0..len()` via `i(L, M) = L(L+1)/2 + M`.
//! - [`MomentIndices::from_wave_spin`] gives the moment set needed for an
//!   intensity built from partial waves with spin up to `j` (`Lmax = 2j + 1`).
//!
//! Invariants & assumptions
//! ------------------------
//! - `max_l ≤ MAX_SUPPORTED_L`; enforced by [`MomentIndices::new`].
//! - Iteration order is `L` ascending, then `M` ascending, which coincides
//!   with ascending linear index.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the bijection for a range of `Lmax`, the inverse map,
//!   out-of-range lookups, and the wave-spin convention.
use crate::moments::errors::{MomentError, MomentResult};

/// Largest `Lmax` accepted by [`MomentIndices::new`].
///
/// The integral matrix holds `n²` complex entries with
/// `n = (Lmax+1)(Lmax+2)/2`; at this limit `n = 2145`.
pub const MAX_SUPPORTED_L: usize = 64;

/// `(L, M)` label of a single moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MomentIndex {
    /// Angular momentum `L ≥ 0`.
    pub l: usize,
    /// Projection `0 ≤ M ≤ L`.
    pub m: usize,
}

impl MomentIndex {
    /// Running index `L(L+1)/2 + M`.
    pub fn linear(&self) -> usize {
        self.l * (self.l + 1) / 2 + self.m
    }

    /// Whether this is the reference moment `(0, 0)`.
    pub fn is_reference(&self) -> bool {
        self.l == 0 && self.m == 0
    }
}

impl std::fmt::Display for MomentIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "H({} {})", self.l, self.m)
    }
}

/// MomentIndices — the truncated moment set `0 ≤ M ≤ L ≤ Lmax`.
///
/// Purpose
/// -------
/// Own the linearization used by every vector and matrix in the crate.
///
/// Fields
/// ------
/// - `max_l`: `usize`
///   Highest angular momentum in the set.
///
/// Invariants
/// ----------
/// - `max_l ≤ MAX_SUPPORTED_L`.
/// - `len() = (max_l + 1)(max_l + 2)/2` and `linear` is a bijection onto
///   `0..len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MomentIndices {
    max_l: usize,
}

impl MomentIndices {
    /// Construct the moment set for `0 ≤ L ≤ max_l`.
    ///
    /// Parameters
    /// ----------
    /// - `max_l`: `usize`
    ///   Highest angular momentum. `0` is valid and yields the single
    ///   reference moment.
    ///
    /// Returns
    /// -------
    /// `MomentResult<MomentIndices>`
    ///
    /// Errors
    /// ------
    /// - `MomentError::MaxLTooLarge`
    ///   Returned when `max_l > MAX_SUPPORTED_L`.
    pub fn new(max_l: usize) -> MomentResult<Self> {
        if max_l > MAX_SUPPORTED_L {
            return Err(MomentError::MaxLTooLarge { max_l, limit: MAX_SUPPORTED_L });
        }
        Ok(MomentIndices { max_l })
    }

    /// Construct without the limit check; callers pass compile-time constants.
    pub(crate) const fn from_max_l_unchecked(max_l: usize) -> Self {
        MomentIndices { max_l }
    }

    /// Moment set for an intensity built from partial waves of spin `≤ max_spin`.
    ///
    /// The intensity is bilinear in the amplitudes, so moments up to
    /// `L = 2·max_spin` carry physics; one extra `L` is kept as a control
    /// band that must be consistent with zero.
    pub fn from_wave_spin(max_spin: usize) -> MomentResult<Self> {
        Self::new(2 * max_spin + 1)
    }

    pub fn max_l(&self) -> usize {
        self.max_l
    }

    /// Number of moments `(Lmax+1)(Lmax+2)/2`.
    pub fn len(&self) -> usize {
        (self.max_l + 1) * (self.max_l + 2) / 2
    }

    /// Never true; the reference moment is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Validated lookup of `(l, m)`.
    ///
    /// Errors
    /// ------
    /// - `MomentError::IndexOutOfRange`
    ///   Returned when `m > l` or `l > max_l`.
    pub fn index(&self, l: usize, m: usize) -> MomentResult<MomentIndex> {
        if m > l || l > self.max_l {
            return Err(MomentError::IndexOutOfRange { l, m, max_l: self.max_l });
        }
        Ok(MomentIndex { l, m })
    }

    /// Linear index of `idx` after checking that it belongs to this set.
    pub fn linear(&self, idx: MomentIndex) -> MomentResult<usize> {
        self.index(idx.l, idx.m).map(|idx| idx.linear())
    }

    /// Inverse of [`MomentIndex::linear`]; `None` when `i ≥ len()`.
    pub fn from_linear(&self, i: usize) -> Option<MomentIndex> {
        if i >= self.len() {
            return None;
        }
        // Largest L with L(L+1)/2 <= i; the float guess is corrected exactly.
        let mut l = (((8 * i + 1) as f64).sqrt() as usize).saturating_sub(1) / 2;
        while (l + 1) * (l + 2) / 2 <= i {
            l += 1;
        }
        while l * (l + 1) / 2 > i {
            l -= 1;
        }
        Some(MomentIndex { l, m: i - l * (l + 1) / 2 })
    }

    /// All indices in ascending linear order.
    pub fn iter(&self) -> impl Iterator<Item = MomentIndex> + '_ {
        (0..=self.max_l).flat_map(|l| (0..=l).map(move |m| MomentIndex { l, m }))
    }
}
