//! Curated API surface for benches and downstream tooling.
//!
//! Important
//! - Re-exports only; everything here also lives at its module path.
//! - Prefer `prelude` for the small everyday set and this module when a caller
//!   needs the lower-level pieces (HNFs, orientation order, wire records).

// Lattices and integer helpers
pub use crate::lattice::{Lattice, LatticeError};
pub use crate::linalg::{det_i64, inverse_unimodular, is_persymmetric, is_symmetric};
// Niggli reduction
pub use crate::niggli::{
    gram_tolerance, is_niggli, is_niggli_basis, niggli, niggli_with_transform, spatial_unroll,
    standard_orientation_cmp, NiggliParams,
};
// Symmetry
pub use crate::symmetry::special::{
    cubic_generators, cubic_point_group, hexagonal_generators, hexagonal_point_group,
    hexagonal_prim,
};
pub use crate::symmetry::wire::SymOpRecord;
pub use crate::symmetry::{
    CoordOp, GroupId, MasterGroup, Permutation, PointGroup, RepError, RepId, RepPayload, SymOpRep,
    SymmetryType, UnitCellCoord,
};
// Canonical forms and enumeration
pub use crate::canonical::{canonical_cmp, canonical_equivalent_lattice, is_canonical, is_equivalent};
pub use crate::enumerate::{
    hermite_normal_forms, EnumError, EnumParams, Supercell, SupercellEnumerator, SupercellList,
};
