//! Niggli reduction with a deterministic choice among equally reduced bases.
//!
//! Purpose
//! - Map every basis of a point lattice to one reduced basis, so that lattices
//!   differing only by an integer change of basis compare equal.
//!
//! Why this design
//! - Křivý–Gruber (steps A1–A8) with the epsilon handling of Grosse-Kunstleve,
//!   Sauter & Adams reaches *a* Niggli cell, but which of several
//!   sign/permutation-equivalent bases it lands on depends on the path taken.
//! - A second pass enumerates the right-handed Niggli bases among the unimodular
//!   neighbours of that result (coefficients in {-1, 0, 1}) and keeps the one that
//!   is greatest under [`standard_orientation_cmp`]. The answer then depends only
//!   on the point lattice, which makes reduction idempotent.
//! - The integer transform is tracked exactly and the working basis is rebuilt as
//!   `input · U` each step, so no floating error accumulates across steps.
//! - Gram parameters are compared with [`gram_tolerance`], which scales `tol`
//!   by `V^(2/3)`. A fixed epsilon on squared lengths is too tight for large
//!   cells and lets noisy inputs cycle between steps.
//!
//! References
//! - I. Křivý, B. Gruber, Acta Cryst. A32 (1976) 297–298.
//! - R. W. Grosse-Kunstleve, N. K. Sauter, P. D. Adams, Acta Cryst. A60 (2004) 1–6.
//! - International Tables for Crystallography Vol. A, §9.2.

mod conditions;
mod krivy_gruber;
mod orientation;

pub use conditions::{gram_tolerance, is_niggli_basis, NiggliParams};
pub use orientation::{spatial_unroll, standard_orientation_cmp};

use crate::lattice::{Lattice, LatticeError};
use crate::linalg::to_f64;
use nalgebra::Matrix3;

/// `true` iff the lattice's basis satisfies every Niggli condition within `tol`.
pub fn is_niggli(lattice: &Lattice, tol: f64) -> bool {
    is_niggli_basis(lattice.basis(), tol)
}

/// Niggli-reduced, right-handed basis of the same point lattice.
///
/// Idempotent: `niggli(&niggli(l, tol)?, tol)? == niggli(l, tol)?`.
pub fn niggli(lattice: &Lattice, tol: f64) -> Result<Lattice, LatticeError> {
    niggli_with_transform(lattice, tol).map(|(reduced, _)| reduced)
}

/// Like [`niggli`], also returning the unimodular `U` with `reduced = input · U`.
pub fn niggli_with_transform(
    lattice: &Lattice,
    tol: f64,
) -> Result<(Lattice, Matrix3<i64>), LatticeError> {
    let u = reduce_basis(lattice.basis(), tol)?;
    let reduced = Lattice::new(lattice.basis() * to_f64(&u))?;
    Ok((reduced, u))
}

/// Unimodular transform taking `basis` to its standard Niggli form.
pub(crate) fn reduce_basis(basis: &Matrix3<f64>, tol: f64) -> Result<Matrix3<i64>, LatticeError> {
    // Validates non-singularity before iterating.
    Lattice::new(*basis)?;
    let kg = krivy_gruber::reduce(basis, gram_tolerance(basis, tol))?;
    let reduced = basis * to_f64(&kg);
    let v = orientation::standard_choice(&reduced, tol);
    Ok(kg * v)
}

#[cfg(test)]
mod tests;
