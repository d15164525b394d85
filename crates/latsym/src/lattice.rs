//! Lattice: an immutable 3×3 basis with lattice vectors as columns.
//!
//! Invariants:
//! - `det(basis) != 0` (checked relative to the Hadamard bound of the columns).
//! - Never mutated after construction; transformations return new lattices.

use crate::cfg::SINGULAR_EPS;
use crate::linalg::{approx_eq3, det_i64, round_to_integer, to_f64};
use nalgebra::{Matrix3, Vector3};
use thiserror::Error;

/// Invariant violations that abort a lattice-level request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LatticeError {
    #[error("singular lattice basis (det = {det:e})")]
    Singular { det: f64 },
    #[error("transformation matrix has zero determinant")]
    SingularTransform,
    #[error("Niggli reduction did not converge within {steps} steps")]
    NoConvergence { steps: usize },
    #[error("lattices are not related by an integer transformation")]
    NonIntegerTransform,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Lattice {
    basis: Matrix3<f64>,
}

impl Lattice {
    pub fn new(basis: Matrix3<f64>) -> Result<Self, LatticeError> {
        let det = basis.determinant();
        let bound: f64 = basis.column_iter().map(|c| c.norm()).product();
        if !det.is_finite() || det.abs() <= SINGULAR_EPS * bound {
            return Err(LatticeError::Singular { det });
        }
        Ok(Self { basis })
    }

    pub fn from_vectors(
        a: Vector3<f64>,
        b: Vector3<f64>,
        c: Vector3<f64>,
    ) -> Result<Self, LatticeError> {
        Self::new(Matrix3::from_columns(&[a, b, c]))
    }

    /// Unit simple cubic lattice.
    pub fn cubic() -> Self {
        Self {
            basis: Matrix3::identity(),
        }
    }

    /// Face-centred cubic with unit nearest-neighbour distance, in its reduced
    /// symmetric form.
    pub fn fcc() -> Self {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        Self {
            basis: Matrix3::new(0.0, s, s, s, 0.0, s, s, s, 0.0),
        }
    }

    /// Body-centred cubic with unit nearest-neighbour distance, in its reduced
    /// symmetric form.
    pub fn bcc() -> Self {
        let s = 1.0 / 3f64.sqrt();
        Self {
            basis: Matrix3::new(-s, s, s, s, -s, s, s, s, -s),
        }
    }

    /// Ideal hexagonal lattice (`a = 1`, `c = sqrt(8/3)`).
    pub fn hexagonal() -> Self {
        Self {
            basis: Matrix3::new(
                1.0,
                -0.5,
                0.0,
                0.0,
                3f64.sqrt() / 2.0,
                0.0,
                0.0,
                0.0,
                (8.0f64 / 3.0).sqrt(),
            ),
        }
    }

    #[inline]
    pub fn basis(&self) -> &Matrix3<f64> {
        &self.basis
    }

    #[inline]
    pub fn vector(&self, i: usize) -> Vector3<f64> {
        self.basis.column(i).into_owned()
    }

    #[inline]
    pub fn det(&self) -> f64 {
        self.basis.determinant()
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.det().abs()
    }

    #[inline]
    pub fn is_right_handed(&self) -> bool {
        self.det() > 0.0
    }

    /// Gram (metric) matrix `Bᵀ B`.
    #[inline]
    pub fn gram(&self) -> Matrix3<f64> {
        self.basis.transpose() * self.basis
    }

    /// `self · t`. Rejects transformations with zero determinant.
    pub fn make_supercell(&self, t: &Matrix3<i64>) -> Result<Self, LatticeError> {
        if det_i64(t) == 0 {
            return Err(LatticeError::SingularTransform);
        }
        Self::new(self.basis * to_f64(t))
    }

    /// Applies a Cartesian operation to every lattice vector: `op · basis`.
    pub fn transformed_by(&self, op: &Matrix3<f64>) -> Result<Self, LatticeError> {
        Self::new(op * self.basis)
    }

    /// Entrywise basis comparison.
    #[inline]
    pub fn basis_eq(&self, other: &Lattice, tol: f64) -> bool {
        approx_eq3(&self.basis, &other.basis, tol)
    }

    /// Integer `T` with `other ≈ self · T`, if one exists.
    pub fn transformation_to(&self, other: &Lattice, tol: f64) -> Option<Matrix3<i64>> {
        let inv = self.basis.try_inverse()?;
        let t = round_to_integer(&(inv * other.basis), tol)?;
        approx_eq3(&(self.basis * to_f64(&t)), &other.basis, tol).then_some(t)
    }

    /// Same point lattice: related by an integer unimodular change of basis.
    pub fn is_unimodular_equivalent(&self, other: &Lattice, tol: f64) -> bool {
        self.transformation_to(other, tol)
            .is_some_and(|t| det_i64(&t).abs() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::matrix;

    #[test]
    fn rejects_singular_bases() {
        let flat = matrix![1.0, 0.0, 1.0; 0.0, 1.0, 1.0; 0.0, 0.0, 0.0];
        assert!(matches!(Lattice::new(flat), Err(LatticeError::Singular { .. })));
        assert!(Lattice::new(Matrix3::from_element(f64::NAN)).is_err());
        // Tiny but regular cells are fine.
        assert!(Lattice::new(Matrix3::identity() * 1e-4).is_ok());
    }

    #[test]
    fn reference_lattices_have_unit_nearest_neighbour() {
        for lat in [Lattice::cubic(), Lattice::fcc(), Lattice::bcc(), Lattice::hexagonal()] {
            let g = lat.gram();
            assert!((g[(0, 0)] - 1.0).abs() < 1e-12);
            assert!(lat.is_right_handed());
        }
        assert!((Lattice::fcc().volume() - 1.0 / 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn supercells_and_transformations() {
        let fcc = Lattice::fcc();
        let t = matrix![2i64, 1, 0; 0, 1, 0; 0, 0, 3];
        let sup = fcc.make_supercell(&t).unwrap();
        assert!((sup.volume() - 6.0 * fcc.volume()).abs() < 1e-12);
        assert_eq!(fcc.transformation_to(&sup, 1e-6), Some(t));
        assert!(sup.transformation_to(&fcc, 1e-6).is_none());
        assert!(!fcc.is_unimodular_equivalent(&sup, 1e-6));

        let u = matrix![1i64, 2, 3; 0, 1, 4; 0, 0, 1];
        let skew = fcc.make_supercell(&u).unwrap();
        assert!(fcc.is_unimodular_equivalent(&skew, 1e-6));
        assert!(!fcc.basis_eq(&skew, 1e-6));

        assert_eq!(
            fcc.make_supercell(&matrix![1i64, 1, 0; 1, 1, 0; 0, 0, 1]),
            Err(LatticeError::SingularTransform)
        );
    }
}
