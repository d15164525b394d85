//! Symmetry-distinct supercell enumeration.
//!
//! Purpose
//! - Yield one canonical superlattice per equivalence class, by increasing volume,
//!   for a reference lattice under its point group.
//!
//! Why this design
//! - `SupercellEnumerator` follows the generator protocol (`generate_next`,
//!   `reset`) and is also an `Iterator`, so callers can stream, restart, or collect.
//! - Candidates are `reference · unit · H` for every Hermite normal form `H` of
//!   the current volume. Each is reduced to its canonical form and emitted only if
//!   no equal canonical basis was emitted for that volume.
//! - `SupercellList` is the accumulating collection that also accepts lattices
//!   found elsewhere (`add_supercell`).
//!
//! Code cross-refs: `hnf::hermite_normal_forms`, `canonical::canonical_equivalent_lattice`.

mod hnf;
mod list;

pub use hnf::hermite_normal_forms;
pub use list::SupercellList;

use crate::canonical::canonical_equivalent_lattice;
use crate::cfg::DEFAULT_TOL;
use crate::lattice::{Lattice, LatticeError};
use crate::linalg::det_i64;
use crate::symmetry::PointGroup;
use nalgebra::Matrix3;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnumError {
    #[error("point group is empty")]
    EmptyGroup,
    #[error("point group does not map the reference lattice onto itself")]
    GroupMismatch,
    #[error("volume range [{min}, {max}] is empty")]
    EmptyRange { min: u64, max: u64 },
    #[error("minimum volume must be at least 1")]
    ZeroVolume,
    #[error("periodic dimensionality must be 1, 2 or 3, got {0}")]
    InvalidDims(usize),
    #[error("unit transformation matrix is singular")]
    SingularUnit,
    #[error("maximum volume {0} overflows integer transformation entries")]
    VolumeTooLarge(u64),
    #[error("lattice is not a superlattice of the reference")]
    NotASupercell,
    #[error(transparent)]
    Lattice(#[from] LatticeError),
}

/// Enumeration settings.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumParams {
    /// Inclusive volume range, in multiples of the unit cell volume.
    pub min_volume: u64,
    pub max_volume: u64,
    /// Number of leading basis vectors that may be expanded.
    pub dims: usize,
    /// Generating matrix: candidates are `reference · unit · H`.
    pub unit: Matrix3<i64>,
    pub tol: f64,
}

impl Default for EnumParams {
    fn default() -> Self {
        Self {
            min_volume: 1,
            max_volume: 1,
            dims: 3,
            unit: Matrix3::identity(),
            tol: DEFAULT_TOL,
        }
    }
}

impl EnumParams {
    pub fn new(min_volume: u64, max_volume: u64, dims: usize) -> Self {
        Self {
            min_volume,
            max_volume,
            dims,
            ..Self::default()
        }
    }

    pub fn with_unit(mut self, unit: Matrix3<i64>) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn validate(&self) -> Result<(), EnumError> {
        if self.min_volume == 0 {
            return Err(EnumError::ZeroVolume);
        }
        if self.min_volume > self.max_volume {
            return Err(EnumError::EmptyRange {
                min: self.min_volume,
                max: self.max_volume,
            });
        }
        if !(1..=3).contains(&self.dims) {
            return Err(EnumError::InvalidDims(self.dims));
        }
        let unit_volume = det_i64(&self.unit).unsigned_abs();
        if unit_volume == 0 {
            return Err(EnumError::SingularUnit);
        }
        let fits = self
            .max_volume
            .checked_mul(unit_volume)
            .is_some_and(|v| i64::try_from(v).is_ok());
        if !fits {
            return Err(EnumError::VolumeTooLarge(self.max_volume));
        }
        Ok(())
    }
}

/// One emitted superlattice.
#[derive(Clone, Debug, PartialEq)]
pub struct Supercell {
    /// Canonical form under the point group.
    pub lattice: Lattice,
    /// `lattice = reference · transformation`.
    pub transformation: Matrix3<i64>,
    /// `|det transformation|`, in multiples of the reference cell volume.
    pub volume: u64,
}

/// Shared precondition: non-empty group that is a symmetry of `reference`.
pub(crate) fn check_group(reference: &Lattice, group: &PointGroup, tol: f64) -> Result<(), EnumError> {
    if group.is_empty() {
        return Err(EnumError::EmptyGroup);
    }
    if !group.maps_lattice_onto_itself(reference, tol) {
        return Err(EnumError::GroupMismatch);
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct SupercellEnumerator<'g> {
    reference: Lattice,
    unit_lattice: Lattice,
    unit_volume: u64,
    group: &'g PointGroup,
    params: EnumParams,
    next_volume: u64,
    current_volume: u64,
    pending: Vec<Matrix3<i64>>,
    next_candidate: usize,
    emitted: Vec<Lattice>,
}

impl<'g> SupercellEnumerator<'g> {
    pub fn new(reference: Lattice, group: &'g PointGroup, params: EnumParams) -> Result<Self, EnumError> {
        params.validate()?;
        check_group(&reference, group, params.tol)?;
        let unit_lattice = reference.make_supercell(&params.unit)?;
        let unit_volume = det_i64(&params.unit).unsigned_abs();
        Ok(Self {
            reference,
            unit_lattice,
            unit_volume,
            group,
            next_volume: params.min_volume,
            current_volume: params.min_volume,
            params,
            pending: Vec::new(),
            next_candidate: 0,
            emitted: Vec::new(),
        })
    }

    #[inline]
    pub fn params(&self) -> &EnumParams {
        &self.params
    }

    #[inline]
    pub fn reference(&self) -> &Lattice {
        &self.reference
    }

    #[inline]
    pub fn group(&self) -> &'g PointGroup {
        self.group
    }

    /// Rewinds to the first volume; the sequence then repeats exactly.
    pub fn reset(&mut self) {
        self.next_volume = self.params.min_volume;
        self.current_volume = self.params.min_volume;
        self.pending.clear();
        self.next_candidate = 0;
        self.emitted.clear();
    }

    /// Volume currently being enumerated, in multiples of the unit cell.
    #[inline]
    pub fn current_volume(&self) -> u64 {
        self.current_volume
    }

    /// Next canonical supercell, or `Ok(None)` once the volume range is exhausted.
    pub fn generate_next(&mut self) -> Result<Option<Supercell>, EnumError> {
        let tol = self.params.tol;
        loop {
            if self.next_candidate >= self.pending.len() {
                if self.next_volume > self.params.max_volume {
                    return Ok(None);
                }
                if !self.pending.is_empty() {
                    tracing::debug!(
                        volume = self.current_volume,
                        distinct = self.emitted.len(),
                        "volume done"
                    );
                }
                self.current_volume = self.next_volume;
                self.next_volume += 1;
                self.pending = hermite_normal_forms(self.current_volume, self.params.dims);
                self.next_candidate = 0;
                self.emitted.clear();
                tracing::trace!(
                    volume = self.current_volume,
                    candidates = self.pending.len(),
                    "next volume"
                );
                continue;
            }

            let h = self.pending[self.next_candidate];
            self.next_candidate += 1;
            let candidate = self.unit_lattice.make_supercell(&h)?;
            let canon = canonical_equivalent_lattice(&candidate, self.group, tol)?;
            if self.emitted.iter().any(|l| l.basis_eq(&canon, tol)) {
                continue;
            }
            let transformation = self
                .reference
                .transformation_to(&canon, tol)
                .ok_or(LatticeError::NonIntegerTransform)?;
            self.emitted.push(canon.clone());
            return Ok(Some(Supercell {
                lattice: canon,
                transformation,
                volume: self.current_volume * self.unit_volume,
            }));
        }
    }
}

impl Iterator for SupercellEnumerator<'_> {
    type Item = Result<Supercell, EnumError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.generate_next().transpose()
    }
}
