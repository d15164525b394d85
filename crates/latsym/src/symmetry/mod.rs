//! Symmetry operations and their representations.
//!
//! Purpose
//! - Let one abstract operation be queried as a Cartesian map, a dense matrix,
//!   a label permutation, or a basis-site permutation, without any of these
//!   knowing about the others.
//!
//! Why this design
//! - `MasterGroup` is an arena: it owns the Cartesian prototypes, the
//!   multiplication/inverse tables, and one table per extra representation.
//! - `SymOpRep` is a plain value with a closed payload enum. It points back to
//!   its group through a `GroupId` handle and `(rep_id, op_index)`, never by
//!   reference, so group lifetime is governed by ordinary ownership.
//! - Registration needs `&mut MasterGroup`; lookups need `&MasterGroup`. The
//!   borrow checker separates the setup phase from shared reads.
//!
//! Code cross-refs: `MasterGroup`, `PointGroup`, `SymOpRep`, `wire::SymOpRecord`.

mod group;
mod rep;
pub mod special;
mod types;
pub mod wire;

pub use group::{MasterGroup, PointGroup};
pub use rep::{CoordOp, RepPayload, SymOpRep};
pub use types::{GroupId, Permutation, RepError, RepId, SymmetryType, UnitCellCoord};
