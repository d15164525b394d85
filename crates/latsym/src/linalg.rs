//! Tolerant linear-algebra predicates and small integer-matrix helpers.
//!
//! Everything here is a total function: predicates answer `false` instead of
//! failing, and helpers that may have no answer return `Option`.

use nalgebra::{Dim, Matrix, Matrix3, RawStorage};
use std::cmp::Ordering;

/// `true` iff `|m[i,j] - m[j,i]| <= tol` for all `i, j`.
///
/// Works for any static or dynamic size. Empty and 1×1 matrices are trivially
/// symmetric; non-square matrices are not.
pub fn is_symmetric<R, C, S>(m: &Matrix<f64, R, C, S>, tol: f64) -> bool
where
    R: Dim,
    C: Dim,
    S: RawStorage<f64, R, C>,
{
    let (n, k) = m.shape();
    if n != k {
        return false;
    }
    (0..n).all(|i| (0..i).all(|j| (m[(i, j)] - m[(j, i)]).abs() <= tol))
}

/// `true` iff `m` is symmetric about its anti-diagonal:
/// `|m[i,j] - m[n-1-j, n-1-i]| <= tol` for all `i, j`.
pub fn is_persymmetric<R, C, S>(m: &Matrix<f64, R, C, S>, tol: f64) -> bool
where
    R: Dim,
    C: Dim,
    S: RawStorage<f64, R, C>,
{
    let (n, k) = m.shape();
    if n != k {
        return false;
    }
    (0..n).all(|i| (0..n).all(|j| (m[(i, j)] - m[(n - 1 - j, n - 1 - i)]).abs() <= tol))
}

/// Three-way comparison that treats values within `tol` as equal.
#[inline]
pub fn cmp_tol(a: f64, b: f64, tol: f64) -> Ordering {
    if a < b - tol {
        Ordering::Less
    } else if a > b + tol {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Lexicographic [`cmp_tol`] over two equally long slices.
pub fn lex_cmp_tol(a: &[f64], b: &[f64], tol: f64) -> Ordering {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| cmp_tol(*x, *y, tol))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Max-abs entrywise distance within `tol`.
#[inline]
pub fn approx_eq3(a: &Matrix3<f64>, b: &Matrix3<f64>, tol: f64) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tol)
}

/// Exact determinant of an integer 3×3 matrix.
pub fn det_i64(m: &Matrix3<i64>) -> i64 {
    m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
}

/// Inverse of a unimodular integer matrix; `None` if `|det| != 1`.
pub fn inverse_unimodular(m: &Matrix3<i64>) -> Option<Matrix3<i64>> {
    let det = det_i64(m);
    if det.abs() != 1 {
        return None;
    }
    let cof = |r0: usize, r1: usize, c0: usize, c1: usize| {
        m[(r0, c0)] * m[(r1, c1)] - m[(r0, c1)] * m[(r1, c0)]
    };
    // adj(m) = transpose of the cofactor matrix
    let adj = Matrix3::new(
        cof(1, 2, 1, 2),
        -cof(0, 2, 1, 2),
        cof(0, 1, 1, 2),
        -cof(1, 2, 0, 2),
        cof(0, 2, 0, 2),
        -cof(0, 1, 0, 2),
        cof(1, 2, 0, 1),
        -cof(0, 2, 0, 1),
        cof(0, 1, 0, 1),
    );
    Some(adj * det)
}

#[inline]
pub fn to_f64(m: &Matrix3<i64>) -> Matrix3<f64> {
    m.map(|x| x as f64)
}

/// Rounds every entry to the nearest integer if all of them lie within `tol`
/// of one; otherwise `None`.
pub fn round_to_integer(m: &Matrix3<f64>, tol: f64) -> Option<Matrix3<i64>> {
    if m.iter().any(|x| !x.is_finite() || (x - x.round()).abs() > tol) {
        return None;
    }
    Some(m.map(|x| x.round() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{dmatrix, matrix, DMatrix};

    #[test]
    fn symmetric_and_persymmetric_fixtures() {
        let sym = dmatrix![
            1.0, 2.0, 3.0, 4.0, 5.0;
            2.0, 6.0, 7.0, 8.0, 9.0;
            3.0, 7.0, 10.0, 11.0, 12.0;
            4.0, 8.0, 11.0, 13.0, 14.0;
            5.0, 9.0, 12.0, 14.0, 15.0
        ];
        assert!(is_symmetric(&sym, 1e-5));
        assert!(!is_persymmetric(&sym, 1e-5));

        let persym = dmatrix![
            4.0, 3.0, 2.0, 1.0;
            7.0, 6.0, 5.0, 2.0;
            9.0, 8.0, 6.0, 3.0;
            10.0, 9.0, 7.0, 4.0
        ];
        assert!(is_persymmetric(&persym, 1e-5));
        assert!(!is_symmetric(&persym, 1e-5));
    }

    #[test]
    fn predicates_respect_tolerance_and_shape() {
        let near = matrix![1.0, 2.0; 2.0 + 1e-7, 1.0];
        assert!(is_symmetric(&near, 1e-6));
        assert!(!is_symmetric(&near, 1e-8));

        let empty = DMatrix::<f64>::zeros(0, 0);
        assert!(is_symmetric(&empty, 0.0));
        assert!(is_persymmetric(&empty, 0.0));
        let one = DMatrix::<f64>::from_element(1, 1, 3.0);
        assert!(is_symmetric(&one, 0.0));
        assert!(is_persymmetric(&one, 0.0));

        let rect = DMatrix::<f64>::zeros(2, 3);
        assert!(!is_symmetric(&rect, 1.0));
        assert!(!is_persymmetric(&rect, 1.0));
    }

    #[test]
    fn integer_helpers() {
        let u = matrix![1i64, 2, 3; 0, 1, 4; 0, 0, 1];
        assert_eq!(det_i64(&u), 1);
        let inv = inverse_unimodular(&u).unwrap();
        assert_eq!(u * inv, Matrix3::identity());
        assert!(inverse_unimodular(&(u * 2)).is_none());

        let f = to_f64(&u) + Matrix3::from_element(1e-9);
        assert_eq!(round_to_integer(&f, 1e-6), Some(u));
        assert_eq!(round_to_integer(&(f * 0.5), 1e-6), None);
    }

    #[test]
    fn tolerant_ordering() {
        assert_eq!(cmp_tol(1.0, 1.0 + 1e-9, 1e-6), Ordering::Equal);
        assert_eq!(cmp_tol(1.0, 2.0, 1e-6), Ordering::Less);
        assert_eq!(
            lex_cmp_tol(&[1.0, 2.0, 3.0], &[1.0, 2.0 + 1e-9, 2.0], 1e-6),
            Ordering::Greater
        );
    }
}
