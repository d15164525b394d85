//! Tolerance defaults and iteration caps.
//!
//! Policy
//! - Entry points take the tolerance explicitly; these constants are the values
//!   tests, benches, and callers reach for when they have no better estimate.
//! - Caps and internal epsilons are fixed constants. They never vary within a run.

/// Suggested tolerance for reduction, comparison, and enumeration. Basis
/// entries are compared against it directly; Gram parameters against
/// `tol · V^(2/3)` (see [`crate::niggli::gram_tolerance`]).
pub const DEFAULT_TOL: f64 = 1e-5;

/// Hard cap on Křivý–Gruber iterations before reduction reports non-convergence.
pub const MAX_REDUCTION_STEPS: usize = 1000;

/// Relative determinant threshold (against the Hadamard bound) below which a
/// basis counts as singular.
pub(crate) const SINGULAR_EPS: f64 = 1e-12;

/// Cap on the order of a group built by generator closure.
pub(crate) const MAX_GROUP_ORDER: usize = 192;
