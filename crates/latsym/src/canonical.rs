//! Canonical representative of a lattice's orbit under a point group.
//!
//! The orbit of `L` is `{ niggli(R · L) : R ∈ G }`. Its members are ranked by
//! 1. Gram parameters `(A, B, C, ξ, η, ζ)`, smaller first (tolerance-aware);
//! 2. then the standard orientation of the basis matrix, more standard first.
//!
//! Every candidate is generated from the same reduced input, so the minimum
//! over the whole orbit is found regardless of group order.

use crate::lattice::{Lattice, LatticeError};
use crate::linalg::lex_cmp_tol;
use crate::niggli::{gram_tolerance, niggli, standard_orientation_cmp, NiggliParams};
use crate::symmetry::PointGroup;
use std::cmp::Ordering;

/// `Less` iff `a` ranks before `b` as an orbit representative.
pub fn canonical_cmp(a: &Lattice, b: &Lattice, tol: f64) -> Ordering {
    let pa = NiggliParams::from_basis(a.basis()).as_array();
    let pb = NiggliParams::from_basis(b.basis()).as_array();
    lex_cmp_tol(&pa, &pb, gram_tolerance(a.basis(), tol))
        .then_with(|| standard_orientation_cmp(a.basis(), b.basis(), tol).reverse())
}

/// Deterministic representative of `{ R · lattice · U }` over `R ∈ group` and
/// unimodular `U`. An empty group reduces to plain Niggli reduction.
pub fn canonical_equivalent_lattice(
    lattice: &Lattice,
    group: &PointGroup,
    tol: f64,
) -> Result<Lattice, LatticeError> {
    let reduced = niggli(lattice, tol)?;
    let mut best = reduced.clone();
    for r in group.cart_matrices() {
        let candidate = niggli(&reduced.transformed_by(r)?, tol)?;
        if canonical_cmp(&candidate, &best, tol).is_lt() {
            best = candidate;
        }
    }
    Ok(best)
}

/// `true` iff `lattice` already is its own canonical form.
pub fn is_canonical(lattice: &Lattice, group: &PointGroup, tol: f64) -> Result<bool, LatticeError> {
    Ok(canonical_equivalent_lattice(lattice, group, tol)?.basis_eq(lattice, tol))
}

/// Same lattice up to integer basis changes and operations of `group`.
pub fn is_equivalent(
    a: &Lattice,
    b: &Lattice,
    group: &PointGroup,
    tol: f64,
) -> Result<bool, LatticeError> {
    let ca = canonical_equivalent_lattice(a, group, tol)?;
    let cb = canonical_equivalent_lattice(b, group, tol)?;
    Ok(ca.basis_eq(&cb, tol))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::DEFAULT_TOL;
    use crate::symmetry::special::{cubic_point_group, hexagonal_point_group, hexagonal_prim};
    use nalgebra::{matrix, Matrix3};

    fn skew() -> Matrix3<i64> {
        matrix![1, 2, 3; 0, 1, 4; 0, 0, 1]
    }

    #[test]
    fn invariant_under_unimodular_and_point_group() {
        let oh = cubic_point_group(1e-8).unwrap();
        let pg = PointGroup::from_master(&oh);
        let sup = Lattice::fcc()
            .make_supercell(&matrix![2, 1, 0; 0, 1, 0; 0, 0, 2])
            .unwrap();
        let canon = canonical_equivalent_lattice(&sup, &pg, DEFAULT_TOL).unwrap();

        let alt = sup.make_supercell(&skew()).unwrap();
        assert!(canonical_equivalent_lattice(&alt, &pg, DEFAULT_TOL)
            .unwrap()
            .basis_eq(&canon, DEFAULT_TOL));

        for r in pg.cart_matrices() {
            let rotated = sup.transformed_by(r).unwrap();
            let c = canonical_equivalent_lattice(&rotated, &pg, DEFAULT_TOL).unwrap();
            assert!(c.basis_eq(&canon, DEFAULT_TOL));
        }
        assert!(is_canonical(&canon, &pg, DEFAULT_TOL).unwrap());
        assert!(!is_canonical(&alt, &pg, DEFAULT_TOL).unwrap());
    }

    #[test]
    fn hexagonal_supercells_under_d6h() {
        let d6h = hexagonal_point_group(1e-8).unwrap();
        let pg = PointGroup::from_master(&d6h);
        let prim = hexagonal_prim(3.23398686, 5.16867834).unwrap();
        // Same index-2 superlattice written along a₁ and along a₂.
        let along_a = prim.make_supercell(&matrix![2, 0, 0; 0, 1, 0; 0, 0, 1]).unwrap();
        let along_b = prim.make_supercell(&matrix![1, 0, 0; 0, 2, 0; 0, 0, 1]).unwrap();
        let along_c = prim.make_supercell(&matrix![1, 0, 0; 0, 1, 0; 0, 0, 2]).unwrap();
        assert!(is_equivalent(&along_a, &along_b, &pg, DEFAULT_TOL).unwrap());
        assert!(!is_equivalent(&along_a, &along_c, &pg, DEFAULT_TOL).unwrap());

        let canon = canonical_equivalent_lattice(&along_a, &pg, DEFAULT_TOL).unwrap();
        let again = canonical_equivalent_lattice(&canon, &pg, DEFAULT_TOL).unwrap();
        assert!(again.basis_eq(&canon, 1e-9));
        assert!(canon.is_right_handed());
    }

    #[test]
    fn trivial_group_is_plain_reduction() {
        let pg = PointGroup::from_ops(Vec::new(), DEFAULT_TOL).unwrap();
        let lat = Lattice::bcc().make_supercell(&skew().transpose()).unwrap();
        let canon = canonical_equivalent_lattice(&lat, &pg, DEFAULT_TOL).unwrap();
        assert!(canon.basis_eq(&Lattice::bcc(), DEFAULT_TOL));
    }

    #[test]
    fn ordering_prefers_shorter_vectors() {
        let short = Lattice::cubic();
        let long = Lattice::cubic()
            .make_supercell(&matrix![1, 0, 0; 0, 1, 0; 0, 0, 2])
            .unwrap();
        assert_eq!(canonical_cmp(&short, &long, DEFAULT_TOL), Ordering::Less);
        assert_eq!(canonical_cmp(&short, &short, DEFAULT_TOL), Ordering::Equal);
    }
}
