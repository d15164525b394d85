//! Upper-triangular Hermite normal forms.
//!
//! `H = [[a, b, d], [0, c, e], [0, 0, f]]` with `a·c·f = n`, `0 <= b, d < a`,
//! `0 <= e < c`. Each index-`n` sublattice of a lattice has exactly one such
//! basis relative to it (columns act on the right: `sub = lattice · H`).

use nalgebra::Matrix3;

/// All HNFs of determinant `volume` that expand only the first `dims` basis
/// vectors. Order: `a` ascending over divisors, then `c`, then `b`, `d`, `e`.
/// Empty for `volume == 0` and for volumes beyond `i64::MAX`.
pub fn hermite_normal_forms(volume: u64, dims: usize) -> Vec<Matrix3<i64>> {
    let mut out = Vec::new();
    let Ok(n) = i64::try_from(volume) else {
        return out;
    };
    if n < 1 {
        return out;
    }
    for a in (1..=n).filter(|a| n % a == 0) {
        for c in (1..=n / a).filter(|c| (n / a) % c == 0) {
            let f = n / (a * c);
            if (dims < 3 && f != 1) || (dims < 2 && c != 1) {
                continue;
            }
            let b_max = if dims >= 2 { a } else { 1 };
            let (d_max, e_max) = if dims >= 3 { (a, c) } else { (1, 1) };
            for b in 0..b_max {
                for d in 0..d_max {
                    for e in 0..e_max {
                        out.push(Matrix3::new(a, b, d, 0, c, e, 0, 0, f));
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::det_i64;

    #[test]
    fn counts_match_sublattice_numbers() {
        // Number of index-n sublattices of Z³: 1, 7, 13, 35, 31, 91.
        let counts: Vec<usize> = (1..=6).map(|n| hermite_normal_forms(n, 3).len()).collect();
        assert_eq!(counts, vec![1, 7, 13, 35, 31, 91]);
        // Z²: sigma(n).
        let counts: Vec<usize> = (1..=6).map(|n| hermite_normal_forms(n, 2).len()).collect();
        assert_eq!(counts, vec![1, 3, 4, 7, 6, 12]);
        for n in 1..=10 {
            assert_eq!(hermite_normal_forms(n, 1), vec![Matrix3::new(n as i64, 0, 0, 0, 1, 0, 0, 0, 1)]);
        }
        assert!(hermite_normal_forms(0, 3).is_empty());
        assert!(hermite_normal_forms(u64::MAX, 3).is_empty());
        assert!(hermite_normal_forms(1 << 63, 1).is_empty());
    }

    #[test]
    fn every_form_is_reduced_with_the_right_determinant() {
        for h in hermite_normal_forms(12, 3) {
            assert_eq!(det_i64(&h), 12);
            assert!(h[(0, 1)] < h[(0, 0)] && h[(0, 2)] < h[(0, 0)] && h[(1, 2)] < h[(1, 1)]);
            assert_eq!((h[(1, 0)], h[(2, 0)], h[(2, 1)]), (0, 0, 0));
        }
        // Inactive directions stay untouched in 2D.
        for h in hermite_normal_forms(6, 2) {
            assert_eq!(h.column(2), Matrix3::<i64>::identity().column(2));
        }
    }
}
