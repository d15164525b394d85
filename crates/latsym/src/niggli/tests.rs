use super::*;
use crate::cfg::DEFAULT_TOL;
use crate::lattice::{Lattice, LatticeError};
use crate::linalg::{det_i64, is_symmetric, to_f64};
use nalgebra::{matrix, Matrix3};
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn skew() -> Matrix3<i64> {
    matrix![1, 2, 3; 0, 1, 4; 0, 0, 1]
}

fn triclinic() -> Lattice {
    Lattice::new(matrix![
        1.0, 0.31, 0.23;
        0.0, 1.17, -0.41;
        0.0, 0.0, 1.52
    ])
    .unwrap()
}

/// `niggli(R·U) == R` and `is_niggli` flips for a reduced reference `R`.
fn confirm_round_trip(reference: &Lattice, u: &Matrix3<i64>) {
    let tol = DEFAULT_TOL;
    assert!(is_niggli(reference, tol));
    let skewed = reference.make_supercell(u).unwrap();
    assert!(!is_niggli(&skewed, tol));
    let reduced = niggli(&skewed, tol).unwrap();
    assert!(
        reduced.basis_eq(reference, tol),
        "expected {:?}, got {:?}",
        reference.basis(),
        reduced.basis()
    );
    assert_eq!(niggli(&reduced, tol).unwrap(), reduced);
}

#[test]
fn reference_lattices_round_trip_through_skewed_bases() {
    for reference in [
        Lattice::fcc(),
        Lattice::bcc(),
        Lattice::cubic(),
        Lattice::hexagonal(),
    ] {
        confirm_round_trip(&reference, &skew());
        confirm_round_trip(&reference, &skew().transpose());
    }
}

#[test]
fn fcc_reduces_to_symmetric_form() {
    let reduced = niggli(&Lattice::fcc().make_supercell(&skew()).unwrap(), DEFAULT_TOL).unwrap();
    assert!(is_symmetric(reduced.basis(), DEFAULT_TOL));
    assert!(reduced.basis()[(0, 0)].abs() < DEFAULT_TOL);
}

#[test]
fn transform_relates_input_and_output() {
    let input = triclinic().make_supercell(&skew().transpose()).unwrap();
    let (reduced, u) = niggli_with_transform(&input, DEFAULT_TOL).unwrap();
    assert_eq!(det_i64(&u).abs(), 1);
    assert!(input.make_supercell(&u).unwrap().basis_eq(&reduced, 1e-9));
    assert!(is_niggli(&reduced, DEFAULT_TOL));
}

#[test]
fn left_handed_input_gives_right_handed_cell() {
    let left = Lattice::hexagonal()
        .make_supercell(&matrix![0, 1, 0; 1, 0, 0; 0, 0, 1])
        .unwrap();
    assert!(!left.is_right_handed());
    let reduced = niggli(&left, DEFAULT_TOL).unwrap();
    assert!(reduced.is_right_handed());
    assert!(reduced.basis_eq(&Lattice::hexagonal(), DEFAULT_TOL));
}

#[test]
fn singular_basis_is_rejected() {
    let flat = matrix![1.0, 2.0, 3.0; 0.0, 1.0, 1.0; 0.0, 0.0, 0.0];
    assert!(matches!(
        reduce_basis(&flat, DEFAULT_TOL),
        Err(LatticeError::Singular { .. })
    ));
}

#[test]
fn params_match_gram_matrix() {
    let lat = triclinic();
    let p = NiggliParams::from_basis(lat.basis());
    let g = lat.gram();
    assert!((p.a - g[(0, 0)]).abs() < 1e-12);
    assert!((p.xi - 2.0 * g[(1, 2)]).abs() < 1e-12);
    assert!((p.zeta - 2.0 * g[(0, 1)]).abs() < 1e-12);
}

#[test]
fn orientation_prefers_symmetric_then_larger_entries() {
    let fcc = *Lattice::fcc().basis();
    let flipped = fcc * Matrix3::from_diagonal(&nalgebra::vector![1.0, -1.0, -1.0]);
    assert!(standard_orientation_cmp(&fcc, &flipped, DEFAULT_TOL).is_gt());
    assert!(standard_orientation_cmp(&fcc, &fcc, DEFAULT_TOL).is_eq());
    let id = Matrix3::<f64>::identity();
    assert!(standard_orientation_cmp(&id, &-id, DEFAULT_TOL).is_gt());
    assert_eq!(spatial_unroll(&fcc)[3], fcc[(0, 1)]);
}

#[test]
fn seeded_random_bases_reduce_to_one_cell() {
    let mut rng = StdRng::seed_from_u64(7);
    let base = triclinic();
    let expected = niggli(&base, DEFAULT_TOL).unwrap();
    for _ in 0..50 {
        let mut u = Matrix3::<i64>::identity();
        for _ in 0..rng.gen_range(1..6) {
            let i = rng.gen_range(0..3);
            let j = (i + rng.gen_range(1..3)) % 3;
            let mut e = Matrix3::<i64>::identity();
            e[(i, j)] = rng.gen_range(-2..=2);
            u *= e;
        }
        let got = niggli(&base.make_supercell(&u).unwrap(), DEFAULT_TOL).unwrap();
        assert!(got.basis_eq(&expected, DEFAULT_TOL));
    }
}

#[test]
fn noisy_large_cells_reduce_like_clean_ones() {
    let expected = Lattice::new(Matrix3::identity() * 4.05).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..40 {
        let mut u = Matrix3::<i64>::identity();
        for _ in 0..5 {
            let i = rng.gen_range(0..3);
            let j = (i + rng.gen_range(1..3)) % 3;
            let mut e = Matrix3::<i64>::identity();
            e[(i, j)] = rng.gen_range(-2..=2);
            u *= e;
        }
        let mut basis = expected.basis() * to_f64(&u);
        for x in basis.iter_mut() {
            *x += rng.gen_range(-1e-8..1e-8);
        }
        let reduced = niggli(&Lattice::new(basis).unwrap(), DEFAULT_TOL).unwrap();
        assert!(reduced.basis_eq(&expected, 1e-4), "got {:?}", reduced.basis());
        assert!(is_niggli(&reduced, DEFAULT_TOL));
    }
}

#[test]
fn gram_tolerance_grows_with_cell_size() {
    let unit = Matrix3::<f64>::identity();
    assert_eq!(gram_tolerance(&unit, DEFAULT_TOL), DEFAULT_TOL);
    assert_eq!(gram_tolerance(&(unit * 0.5), DEFAULT_TOL), DEFAULT_TOL);
    let big = gram_tolerance(&(unit * 4.0), DEFAULT_TOL);
    assert!((big - 16.0 * DEFAULT_TOL).abs() < 1e-12);
}

fn shear_sequence() -> impl Strategy<Value = Matrix3<i64>> {
    prop::collection::vec((0usize..3, 1usize..3, -2i64..=2, any::<bool>()), 0..6).prop_map(
        |ops| {
            let mut u = Matrix3::<i64>::identity();
            for (i, shift, k, flip) in ops {
                let mut e = Matrix3::<i64>::identity();
                e[(i, (i + shift) % 3)] = k;
                if flip {
                    e.swap_columns(0, 1);
                }
                u *= e;
            }
            u
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn reduction_is_idempotent(u in shear_sequence(), which in 0usize..3) {
        let base = [Lattice::fcc(), Lattice::hexagonal(), triclinic()][which].clone();
        let once = niggli(&base.make_supercell(&u).unwrap(), DEFAULT_TOL).unwrap();
        let twice = niggli(&once, DEFAULT_TOL).unwrap();
        prop_assert!(twice.basis_eq(&once, 1e-9));
        prop_assert!(is_niggli(&once, DEFAULT_TOL));
        prop_assert!(once.is_right_handed());
        prop_assert!(once.basis_eq(&niggli(&base, DEFAULT_TOL).unwrap(), DEFAULT_TOL));
    }
}
