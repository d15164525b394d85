//! Lattice reduction, symmetry-aware canonical forms, and supercell enumeration.
//!
//! Pipeline
//! - raw basis → [`niggli::niggli`] → reduced basis
//! - reduced basis + [`symmetry::PointGroup`] → [`canonical::canonical_equivalent_lattice`]
//! - [`enumerate::SupercellEnumerator`] drives both once per Hermite normal form
//!   and keeps one representative per symmetry class.
//!
//! Conventions
//! - Lattice bases are `Matrix3<f64>` with lattice vectors as columns.
//! - Symmetry operations act on Cartesian column vectors: `x' = R x`, so a lattice
//!   maps to `R · basis`.
//! - Integer transformations act from the right: `supercell = reference · T`.
//! - Every comparison takes an explicit tolerance; [`cfg::DEFAULT_TOL`] is only a
//!   suggested value for callers.

pub mod api;
pub mod canonical;
pub mod cfg;
pub mod enumerate;
pub mod lattice;
pub mod linalg;
pub mod niggli;
pub mod symmetry;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::{Matrix3 as Mat3, Vector3 as Vec3};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::canonical::{canonical_equivalent_lattice, is_canonical};
    pub use crate::cfg::DEFAULT_TOL;
    pub use crate::enumerate::{EnumError, EnumParams, Supercell, SupercellEnumerator, SupercellList};
    pub use crate::lattice::{Lattice, LatticeError};
    pub use crate::niggli::{is_niggli, niggli, niggli_with_transform};
    pub use crate::symmetry::{
        GroupId, MasterGroup, PointGroup, RepError, RepId, RepPayload, SymOpRep, SymmetryType,
    };
    pub use nalgebra::{Matrix3 as Mat3, Vector3 as Vec3};
}
