//! Identifiers, classification tags, and small value types shared by the
//! representation arena.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Configuration and lookup failures of the representation registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepError {
    #[error("operation is not bound to a master group")]
    NoMaster,
    #[error("operation is bound to a different master group")]
    MasterMismatch,
    #[error("operation index is unset")]
    UnsetIndex,
    #[error("operation index {index} out of range for a group of order {order}")]
    IndexOutOfRange { index: usize, order: usize },
    #[error("master group has no representation table {0:?}")]
    MissingTable(RepId),
    #[error("table {rep:?} has no entry for operation {op_index}")]
    EmptySlot { rep: RepId, op_index: usize },
    #[error("table {rep:?} entry for operation {op_index} carries no {what}")]
    MissingPayload {
        rep: RepId,
        op_index: usize,
        what: &'static str,
    },
    #[error("representation table {0:?} is read-only")]
    ReadOnlyTable(RepId),
    #[error("no operation in table {0:?} matches within tolerance")]
    NoMatch(RepId),
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("invalid group: {0}")]
    InvalidGroup(String),
}

impl RepError {
    pub(crate) fn group(reason: impl Into<String>) -> Self {
        Self::InvalidGroup(reason.into())
    }

    pub(crate) fn payload(reason: impl Into<String>) -> Self {
        Self::InvalidPayload(reason.into())
    }
}

/// Classification of a symmetry operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymmetryType {
    #[serde(rename = "identity_op")]
    Identity,
    #[serde(rename = "mirror_op")]
    Mirror,
    #[serde(rename = "glide_op")]
    Glide,
    #[serde(rename = "rotation_op")]
    Rotation,
    #[serde(rename = "screw_op")]
    Screw,
    #[serde(rename = "inversion_op")]
    Inversion,
    #[serde(rename = "rotoinversion_op")]
    Rotoinversion,
    #[serde(rename = "invalid_op")]
    Invalid,
}

impl SymmetryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "identity_op",
            Self::Mirror => "mirror_op",
            Self::Glide => "glide_op",
            Self::Rotation => "rotation_op",
            Self::Screw => "screw_op",
            Self::Inversion => "inversion_op",
            Self::Rotoinversion => "rotoinversion_op",
            Self::Invalid => "invalid_op",
        }
    }

    /// Orientation-preserving kinds (determinant +1).
    pub fn is_proper(&self) -> bool {
        matches!(self, Self::Identity | Self::Rotation | Self::Screw)
    }
}

impl fmt::Display for SymmetryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle of a [`MasterGroup`](super::MasterGroup). Unique per process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupId(u64);

impl GroupId {
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Index of a representation table inside a master group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepId(pub usize);

impl RepId {
    /// Table holding the Cartesian prototypes the group was built from.
    pub const COORD: RepId = RepId(0);
}

/// Bijection on `0..n`; `images()[i]` is the image of `i`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Permutation(Vec<usize>);

impl Permutation {
    pub fn new(images: Vec<usize>) -> Result<Self, RepError> {
        let mut seen = vec![false; images.len()];
        for &i in &images {
            let Some(slot) = seen.get_mut(i) else {
                return Err(RepError::InvalidPermutation(format!(
                    "{i} out of range for length {}",
                    images.len()
                )));
            };
            if std::mem::replace(slot, true) {
                return Err(RepError::InvalidPermutation(format!("{i} repeated")));
            }
        }
        Ok(Self(images))
    }

    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn images(&self) -> &[usize] {
        &self.0
    }

    #[inline]
    pub fn apply(&self, i: usize) -> Option<usize> {
        self.0.get(i).copied()
    }

    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.0.len()];
        for (i, &j) in self.0.iter().enumerate() {
            inv[j] = i;
        }
        Self(inv)
    }

    /// `self ∘ other`: first `other`, then `self`. `None` on length mismatch.
    pub fn compose(&self, other: &Permutation) -> Option<Self> {
        (self.len() == other.len()).then(|| Self(other.0.iter().map(|&j| self.0[j]).collect()))
    }

    pub fn fixed_points(&self) -> usize {
        self.0.iter().enumerate().filter(|(i, j)| i == *j).count()
    }
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = RepError;

    fn try_from(images: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(images)
    }
}

impl From<Permutation> for Vec<usize> {
    fn from(p: Permutation) -> Self {
        p.0
    }
}

/// Basis site `sublattice` in the unit cell translated by `unitcell`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitCellCoord {
    pub sublattice: usize,
    pub unitcell: [i64; 3],
}

impl UnitCellCoord {
    #[inline]
    pub fn new(sublattice: usize, unitcell: [i64; 3]) -> Self {
        Self {
            sublattice,
            unitcell,
        }
    }
}
