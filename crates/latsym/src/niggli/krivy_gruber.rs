//! Křivý–Gruber reduction steps A1–A8 (epsilon variant).
//!
//! Transforms act on basis columns: `new = old · M`.

use super::conditions::NiggliParams;
use crate::cfg::MAX_REDUCTION_STEPS;
use crate::lattice::LatticeError;
use crate::linalg::to_f64;
use nalgebra::{Matrix3, Vector3};

/// Returns the accumulated unimodular transform `U` so that `basis · U` is a
/// Niggli cell.
pub(super) fn reduce(basis: &Matrix3<f64>, eps: f64) -> Result<Matrix3<i64>, LatticeError> {
    let mut u = Matrix3::<i64>::identity();
    for step in 0..MAX_REDUCTION_STEPS {
        let params = NiggliParams::from_basis(&(basis * to_f64(&u)));
        match next_step(&params, eps) {
            Some(m) => u *= m,
            None => {
                tracing::trace!(steps = step, "krivy-gruber reached a fixed point");
                return Ok(u);
            }
        }
    }
    tracing::warn!(
        steps = MAX_REDUCTION_STEPS,
        "krivy-gruber reduction hit its step cap"
    );
    Err(LatticeError::NoConvergence {
        steps: MAX_REDUCTION_STEPS,
    })
}

/// First applicable step for the current parameters, or `None` at a fixed point.
fn next_step(p: &NiggliParams, eps: f64) -> Option<Matrix3<i64>> {
    let NiggliParams {
        a,
        b,
        c,
        xi,
        eta,
        zeta,
    } = *p;
    let eq = |x: f64, y: f64| (x - y).abs() <= eps;

    // A1
    if a > b + eps || (eq(a, b) && xi.abs() > eta.abs() + eps) {
        return Some(Matrix3::new(0, -1, 0, -1, 0, 0, 0, 0, -1));
    }
    // A2
    if b > c + eps || (eq(b, c) && eta.abs() > zeta.abs() + eps) {
        return Some(Matrix3::new(-1, 0, 0, 0, 0, -1, 0, -1, 0));
    }
    // A3 / A4
    if let Some(m) = sign_step(xi, eta, zeta, eps) {
        return Some(m);
    }
    // A5
    if xi.abs() > b + eps || (eq(xi, b) && 2.0 * eta < zeta - eps) || (eq(xi, -b) && zeta < -eps) {
        let s = sign(xi);
        return Some(Matrix3::new(1, 0, 0, 0, 1, -s, 0, 0, 1));
    }
    // A6
    if eta.abs() > a + eps || (eq(eta, a) && 2.0 * xi < zeta - eps) || (eq(eta, -a) && zeta < -eps)
    {
        let s = sign(eta);
        return Some(Matrix3::new(1, 0, -s, 0, 1, 0, 0, 0, 1));
    }
    // A7
    if zeta.abs() > a + eps || (eq(zeta, a) && 2.0 * xi < eta - eps) || (eq(zeta, -a) && eta < -eps)
    {
        let s = sign(zeta);
        return Some(Matrix3::new(1, -s, 0, 0, 1, 0, 0, 0, 1));
    }
    // A8
    let sum = xi + eta + zeta + a + b;
    if sum < -eps || (eq(sum, 0.0) && 2.0 * (a + eta) + zeta > eps) {
        return Some(Matrix3::new(1, 0, 1, 0, 1, 1, 0, 0, 1));
    }
    None
}

/// Sign flips bringing ξ, η, ζ to all-positive (A3) or all-non-positive (A4).
/// `None` when the signs already agree.
fn sign_step(xi: f64, eta: f64, zeta: f64, eps: f64) -> Option<Matrix3<i64>> {
    let tri = |x: f64| {
        if x > eps {
            1
        } else if x < -eps {
            -1
        } else {
            0
        }
    };
    let signs = [tri(xi), tri(eta), tri(zeta)];
    let mut flip = [1i64; 3];
    if signs.iter().product::<i64>() == 1 {
        for (f, s) in flip.iter_mut().zip(signs) {
            if s == -1 {
                *f = -1;
            }
        }
    } else {
        let mut zero_at = None;
        for (i, s) in signs.into_iter().enumerate() {
            match s {
                1 => flip[i] = -1,
                0 => zero_at = Some(i),
                _ => {}
            }
        }
        if flip.iter().product::<i64>() == -1 {
            // An odd count of positive entries leaves at least one zero to absorb it.
            flip[zero_at?] = -1;
        }
    }
    (flip != [1, 1, 1]).then(|| Matrix3::from_diagonal(&Vector3::from(flip)))
}

#[inline]
fn sign(x: f64) -> i64 {
    if x < 0.0 {
        -1
    } else {
        1
    }
}
