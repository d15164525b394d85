//! Gram parameters and the Niggli conditions.

use nalgebra::Matrix3;

/// Gram parameters `(A, B, C, ξ, η, ζ)` of a basis `(a, b, c)`:
/// `A = a·a`, `B = b·b`, `C = c·c`, `ξ = 2 b·c`, `η = 2 a·c`, `ζ = 2 a·b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NiggliParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub xi: f64,
    pub eta: f64,
    pub zeta: f64,
}

impl NiggliParams {
    pub fn from_basis(basis: &Matrix3<f64>) -> Self {
        let g = basis.transpose() * basis;
        Self {
            a: g[(0, 0)],
            b: g[(1, 1)],
            c: g[(2, 2)],
            xi: 2.0 * g[(1, 2)],
            eta: 2.0 * g[(0, 2)],
            zeta: 2.0 * g[(0, 1)],
        }
    }

    #[inline]
    pub fn as_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.xi, self.eta, self.zeta]
    }

    /// All of ξ, η, ζ strictly positive (type I cell).
    #[inline]
    pub fn is_type_one(&self, eps: f64) -> bool {
        self.xi > eps && self.eta > eps && self.zeta > eps
    }

    /// None of ξ, η, ζ positive (type II cell).
    #[inline]
    pub fn is_type_two(&self, eps: f64) -> bool {
        self.xi <= eps && self.eta <= eps && self.zeta <= eps
    }

    /// Main and special Niggli conditions, ITA §9.2.
    pub fn is_niggli(&self, eps: f64) -> bool {
        let Self {
            a,
            b,
            c,
            xi,
            eta,
            zeta,
        } = *self;
        let eq = |x: f64, y: f64| (x - y).abs() <= eps;
        let gt = |x: f64, y: f64| x > y + eps;

        if gt(a, b) || gt(b, c) {
            return false;
        }
        if eq(a, b) && gt(xi.abs(), eta.abs()) {
            return false;
        }
        if eq(b, c) && gt(eta.abs(), zeta.abs()) {
            return false;
        }
        let type_one = self.is_type_one(eps);
        if !type_one && !self.is_type_two(eps) {
            return false;
        }
        if gt(xi.abs(), b) || gt(eta.abs(), a) || gt(zeta.abs(), a) {
            return false;
        }
        if type_one {
            if eq(xi, b) && gt(zeta, 2.0 * eta) {
                return false;
            }
            if eq(eta, a) && gt(zeta, 2.0 * xi) {
                return false;
            }
            if eq(zeta, a) && gt(eta, 2.0 * xi) {
                return false;
            }
        } else {
            if eq(xi, -b) && !eq(zeta, 0.0) {
                return false;
            }
            if eq(eta, -a) && !eq(zeta, 0.0) {
                return false;
            }
            if eq(zeta, -a) && !eq(eta, 0.0) {
                return false;
            }
            let s = xi + eta + zeta + a + b;
            if s < -eps {
                return false;
            }
            if eq(s, 0.0) && gt(2.0 * (a + eta) + zeta, 0.0) {
                return false;
            }
        }
        true
    }
}

/// Tolerance on Gram parameters (squared lengths) derived from the relative
/// tolerance `tol`: `tol · V^(2/3)`, never below `tol`.
pub fn gram_tolerance(basis: &Matrix3<f64>, tol: f64) -> f64 {
    tol * basis.determinant().abs().powf(2.0 / 3.0).max(1.0)
}

/// `true` iff `basis` satisfies every Niggli condition within `tol`.
pub fn is_niggli_basis(basis: &Matrix3<f64>, tol: f64) -> bool {
    NiggliParams::from_basis(basis).is_niggli(gram_tolerance(basis, tol))
}
