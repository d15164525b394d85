//! Standard orientation: a total order on equally reduced bases.
//!
//! Greater means "more standard". Compared in order:
//! 1. symmetric basis matrix first,
//! 2. then persymmetric,
//! 3. then the larger sum of all entries,
//! 4. then the lexicographically larger [`spatial_unroll`].
//!
//! Comparisons of reals are tolerance-aware. For the cubic and hexagonal
//! lattices this picks the familiar textbook forms (e.g. fcc `[[0,1,1],[1,0,1],[1,1,0]]/√2`).

use super::conditions::{gram_tolerance, is_niggli_basis};
use crate::linalg::{cmp_tol, det_i64, is_persymmetric, is_symmetric, lex_cmp_tol, to_f64};
use nalgebra::{Matrix3, Vector3};
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Diagonal, then upper triangle, then lower triangle.
pub fn spatial_unroll(m: &Matrix3<f64>) -> [f64; 9] {
    [
        m[(0, 0)],
        m[(1, 1)],
        m[(2, 2)],
        m[(0, 1)],
        m[(0, 2)],
        m[(1, 2)],
        m[(1, 0)],
        m[(2, 0)],
        m[(2, 1)],
    ]
}

/// `Greater` iff `x` is more standard than `y`.
pub fn standard_orientation_cmp(x: &Matrix3<f64>, y: &Matrix3<f64>, tol: f64) -> Ordering {
    is_symmetric(x, tol)
        .cmp(&is_symmetric(y, tol))
        .then_with(|| is_persymmetric(x, tol).cmp(&is_persymmetric(y, tol)))
        .then_with(|| cmp_tol(x.sum(), y.sum(), tol))
        .then_with(|| lex_cmp_tol(&spatial_unroll(x), &spatial_unroll(y), tol))
}

/// Non-zero integer vectors with entries in {-1, 0, 1}.
fn coefficient_vectors() -> &'static [Vector3<i64>] {
    static COEFFS: OnceLock<Vec<Vector3<i64>>> = OnceLock::new();
    COEFFS.get_or_init(|| {
        let mut out = Vec::with_capacity(26);
        for i in -1..=1 {
            for j in -1..=1 {
                for k in -1..=1 {
                    if (i, j, k) != (0, 0, 0) {
                        out.push(Vector3::new(i, j, k));
                    }
                }
            }
        }
        out
    })
}

/// Unimodular `V` (entries in {-1, 0, 1}) such that `reduced · V` is the most
/// standard right-handed Niggli basis reachable from `reduced`.
///
/// Column `j` of any Niggli basis has squared length `G_jj` of the reduced cell,
/// so candidates for each column are prefiltered by length.
pub(super) fn standard_choice(reduced: &Matrix3<f64>, tol: f64) -> Matrix3<i64> {
    let g = reduced.transpose() * reduced;
    let eps = gram_tolerance(reduced, tol);
    let columns: [Vec<Vector3<i64>>; 3] = std::array::from_fn(|j| {
        coefficient_vectors()
            .iter()
            .filter(|v| ((reduced * v.map(|x| x as f64)).norm_squared() - g[(j, j)]).abs() <= eps)
            .copied()
            .collect()
    });

    let mut best: Option<(Matrix3<i64>, Matrix3<f64>)> = None;
    for v0 in &columns[0] {
        for v1 in &columns[1] {
            for v2 in &columns[2] {
                let v = Matrix3::from_columns(&[*v0, *v1, *v2]);
                if det_i64(&v).abs() != 1 {
                    continue;
                }
                let m = reduced * to_f64(&v);
                if m.determinant() <= 0.0 || !is_niggli_basis(&m, tol) {
                    continue;
                }
                let better = best
                    .as_ref()
                    .map_or(true, |(_, b)| standard_orientation_cmp(&m, b, tol).is_gt());
                if better {
                    best = Some((v, m));
                }
            }
        }
    }

    match best {
        Some((v, _)) => v,
        None => {
            // Only reachable if the reduced cell itself fails `is_niggli` at `tol`.
            tracing::warn!(tol, "no right-handed Niggli neighbour found; keeping reduced cell");
            if reduced.determinant() < 0.0 {
                -Matrix3::identity()
            } else {
                Matrix3::identity()
            }
        }
    }
}
