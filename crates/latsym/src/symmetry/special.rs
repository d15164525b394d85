//! Special point groups and lattices used in tests and benchmarks.
//!
//! Groups are built by generator closure; a real symmetry finder would supply
//! them for arbitrary lattices.
//!
//! References
//! - Oh (m-3m, order 48): 4-fold about z, 3-fold about [111], inversion.
//! - D6h (6/mmm, order 24): 6-fold about z, mirror ⊥ y, inversion.

use super::group::MasterGroup;
use super::types::RepError;
use crate::lattice::{Lattice, LatticeError};
use nalgebra::Matrix3;

pub fn cubic_generators() -> [Matrix3<f64>; 3] {
    [
        Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0),
        Matrix3::new(0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0),
        -Matrix3::identity(),
    ]
}

/// Generators for a hexagonal lattice with `a` along x and `c` along z.
pub fn hexagonal_generators() -> [Matrix3<f64>; 3] {
    let s = 3f64.sqrt() / 2.0;
    [
        Matrix3::new(0.5, -s, 0.0, s, 0.5, 0.0, 0.0, 0.0, 1.0),
        Matrix3::from_diagonal(&nalgebra::vector![1.0, -1.0, 1.0]),
        -Matrix3::identity(),
    ]
}

/// Full cubic point group Oh.
pub fn cubic_point_group(tol: f64) -> Result<MasterGroup, RepError> {
    MasterGroup::generate(&cubic_generators(), tol)
}

/// Full hexagonal point group D6h.
pub fn hexagonal_point_group(tol: f64) -> Result<MasterGroup, RepError> {
    MasterGroup::generate(&hexagonal_generators(), tol)
}

/// Primitive hexagonal cell: `a₁ = (a, 0, 0)`, `a₂ = (-a/2, a√3/2, 0)`, `a₃ = (0, 0, c)`.
pub fn hexagonal_prim(a: f64, c: f64) -> Result<Lattice, LatticeError> {
    let basis = Matrix3::new(
        a,
        -a / 2.0,
        0.0,
        0.0,
        a * 3f64.sqrt() / 2.0,
        0.0,
        0.0,
        0.0,
        c,
    );
    Lattice::new(basis)
}
