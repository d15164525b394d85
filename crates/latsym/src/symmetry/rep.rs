//! One abstract symmetry operation in one representation space.
//!
//! A `SymOpRep` owns its payload by value and refers to its master group through
//! a [`GroupId`] handle plus `(rep_id, op_index)`. Anything that needs the group
//! (products, inverses, other representations) takes `&MasterGroup` and checks
//! the handle first, so a stale or foreign group is an error rather than a
//! dangling lookup.

use super::group::MasterGroup;
use super::types::{GroupId, Permutation, RepError, RepId, SymmetryType, UnitCellCoord};
use super::wire::SymOpRecord;
use crate::linalg::approx_eq3;
use nalgebra::{DMatrix, Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;

/// Cartesian operation `x ↦ matrix · x + tau`.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordOp {
    pub matrix: Matrix3<f64>,
    pub tau: Vector3<f64>,
}

/// Representation data. Each variant carries exactly one representation.
#[derive(Clone, Debug, PartialEq)]
pub enum RepPayload {
    Coord(CoordOp),
    Matrix(DMatrix<f64>),
    Permutation(Permutation),
    BasisPermute(Vec<UnitCellCoord>),
}

impl RepPayload {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Coord(_) => "coord",
            Self::Matrix(_) => "matrix",
            Self::Permutation(_) => "permutation",
            Self::BasisPermute(_) => "basis_permute",
        }
    }

    /// Same variant and same values; reals compared within `tol`.
    pub fn approx_eq(&self, other: &RepPayload, tol: f64) -> bool {
        match (self, other) {
            (Self::Coord(a), Self::Coord(b)) => {
                approx_eq3(&a.matrix, &b.matrix, tol) && (a.tau - b.tau).amax() <= tol
            }
            (Self::Matrix(a), Self::Matrix(b)) => {
                a.shape() == b.shape() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tol)
            }
            (Self::Permutation(a), Self::Permutation(b)) => a == b,
            (Self::BasisPermute(a), Self::BasisPermute(b)) => a == b,
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SymOpRecord", into = "SymOpRecord")]
pub struct SymOpRep {
    kind: SymmetryType,
    payload: RepPayload,
    master: Option<GroupId>,
    rep_id: Option<RepId>,
    op_index: Option<usize>,
}

impl SymOpRep {
    /// Unbound representation with an explicit classification.
    pub fn new(kind: SymmetryType, payload: RepPayload) -> Self {
        Self {
            kind,
            payload,
            master: None,
            rep_id: None,
            op_index: None,
        }
    }

    /// Cartesian operation, classified from its data.
    pub fn coord(matrix: Matrix3<f64>, tau: Vector3<f64>, tol: f64) -> Self {
        let kind = classify(&matrix, &tau, tol);
        Self::new(kind, RepPayload::Coord(CoordOp { matrix, tau }))
    }

    /// Cartesian point operation (no translation).
    pub fn point(matrix: Matrix3<f64>, tol: f64) -> Self {
        Self::coord(matrix, Vector3::zeros(), tol)
    }

    /// Dense square matrix representation. 3×3 matrices are classified as
    /// point operations; other sizes stay `Invalid` until registered.
    pub fn matrix(m: DMatrix<f64>, tol: f64) -> Result<Self, RepError> {
        if m.nrows() != m.ncols() || m.is_empty() {
            return Err(RepError::payload(format!(
                "matrix representation must be square and non-empty, got {}x{}",
                m.nrows(),
                m.ncols()
            )));
        }
        let kind = if m.nrows() == 3 {
            classify(&m.fixed_view::<3, 3>(0, 0).into_owned(), &Vector3::zeros(), tol)
        } else {
            SymmetryType::Invalid
        };
        Ok(Self::new(kind, RepPayload::Matrix(m)))
    }

    pub fn permutation(p: Permutation) -> Self {
        Self::new(SymmetryType::Invalid, RepPayload::Permutation(p))
    }

    pub fn basis_permute(sites: Vec<UnitCellCoord>) -> Self {
        Self::new(SymmetryType::Invalid, RepPayload::BasisPermute(sites))
    }

    #[inline]
    pub fn kind(&self) -> SymmetryType {
        self.kind
    }

    #[inline]
    pub fn set_kind(&mut self, kind: SymmetryType) {
        self.kind = kind;
    }

    /// Recomputes the classification from Cartesian or 3×3 matrix data. Other
    /// payloads keep their current tag.
    pub fn reclassify(&mut self, tol: f64) -> SymmetryType {
        match &self.payload {
            RepPayload::Coord(op) => self.kind = classify(&op.matrix, &op.tau, tol),
            RepPayload::Matrix(m) if m.shape() == (3, 3) => {
                self.kind = classify(&m.fixed_view::<3, 3>(0, 0).into_owned(), &Vector3::zeros(), tol)
            }
            _ => {}
        }
        self.kind
    }

    #[inline]
    pub fn payload(&self) -> &RepPayload {
        &self.payload
    }

    /// Trace of a matrix payload, or the fixed-point count of a permutation.
    pub fn character(&self) -> Option<f64> {
        match &self.payload {
            RepPayload::Coord(op) => Some(op.matrix.trace()),
            RepPayload::Matrix(m) => Some(m.trace()),
            RepPayload::Permutation(p) => Some(p.fixed_points() as f64),
            RepPayload::BasisPermute(_) => None,
        }
    }

    pub fn get_permutation(&self) -> Option<&Permutation> {
        match &self.payload {
            RepPayload::Permutation(p) => Some(p),
            _ => None,
        }
    }

    /// Dense matrix view. Cartesian operations expose their 3×3 linear part.
    pub fn get_matrix(&self) -> Option<Cow<'_, DMatrix<f64>>> {
        match &self.payload {
            RepPayload::Matrix(m) => Some(Cow::Borrowed(m)),
            RepPayload::Coord(op) => Some(Cow::Owned(DMatrix::from_column_slice(
                3,
                3,
                op.matrix.as_slice(),
            ))),
            _ => None,
        }
    }

    pub fn get_basis_permutation(&self) -> Option<&[UnitCellCoord]> {
        match &self.payload {
            RepPayload::BasisPermute(sites) => Some(sites),
            _ => None,
        }
    }

    pub fn coord_op(&self) -> Option<&CoordOp> {
        match &self.payload {
            RepPayload::Coord(op) => Some(op),
            _ => None,
        }
    }

    #[inline]
    pub fn master(&self) -> Option<GroupId> {
        self.master
    }

    #[inline]
    pub fn rep_id(&self) -> Option<RepId> {
        self.rep_id
    }

    #[inline]
    pub fn op_index(&self) -> Option<usize> {
        self.op_index
    }

    /// Bound to some master group with a set operation index.
    #[inline]
    pub fn has_valid_master(&self) -> bool {
        self.master.is_some() && self.op_index.is_some()
    }

    /// Forgets the operation index; the group handle is kept.
    #[inline]
    pub fn invalidate_index(&mut self) {
        self.op_index = None;
    }

    /// Binds to `group` at table `rep_id`, operation `op_index`.
    pub fn set_identifiers(
        &mut self,
        group: &MasterGroup,
        rep_id: RepId,
        op_index: usize,
    ) -> Result<(), RepError> {
        group.representation(rep_id)?;
        if op_index >= group.len() {
            return Err(RepError::IndexOutOfRange {
                index: op_index,
                order: group.len(),
            });
        }
        self.bind(group.id(), rep_id, op_index);
        Ok(())
    }

    /// Binds to `group` at table `rep_id`, recovering the operation index by
    /// matching this payload against the table's entries.
    pub fn set_identifiers_by_match(
        &mut self,
        group: &MasterGroup,
        rep_id: RepId,
        tol: f64,
    ) -> Result<usize, RepError> {
        let op_index = group
            .find_match(rep_id, &self.payload, tol)?
            .ok_or(RepError::NoMatch(rep_id))?;
        self.bind(group.id(), rep_id, op_index);
        Ok(op_index)
    }

    pub(crate) fn bind(&mut self, master: GroupId, rep_id: RepId, op_index: usize) {
        self.master = Some(master);
        self.rep_id = Some(rep_id);
        self.op_index = Some(op_index);
    }

    /// Position in the owning group.
    pub fn index(&self) -> Result<usize, RepError> {
        if self.master.is_none() {
            return Err(RepError::NoMaster);
        }
        self.op_index.ok_or(RepError::UnsetIndex)
    }

    /// Position of the inverse operation.
    pub fn ind_inverse(&self, group: &MasterGroup) -> Result<usize, RepError> {
        let i = self.bound_index(group)?;
        group.inverse(i)
    }

    /// Position of the product `self · other`.
    pub fn ind_prod(&self, other: &SymOpRep, group: &MasterGroup) -> Result<usize, RepError> {
        let i = self.bound_index(group)?;
        let j = other.bound_index(group)?;
        group.product(i, j)
    }

    /// Operation index after checking that `group` is the bound master.
    fn bound_index(&self, group: &MasterGroup) -> Result<usize, RepError> {
        match self.master {
            None => Err(RepError::NoMaster),
            Some(id) if id != group.id() => Err(RepError::MasterMismatch),
            Some(_) => {
                let index = self.op_index.ok_or(RepError::UnsetIndex)?;
                if index >= group.len() {
                    return Err(RepError::IndexOutOfRange {
                        index,
                        order: group.len(),
                    });
                }
                Ok(index)
            }
        }
    }

    /// This operation's entry in table `rep_id` of its master group.
    pub fn get_rep<'g>(&self, group: &'g MasterGroup, rep_id: RepId) -> Result<&'g SymOpRep, RepError> {
        let i = self.bound_index(group)?;
        group.rep(rep_id, i)
    }

    pub fn get_matrix_rep<'g>(
        &self,
        group: &'g MasterGroup,
        rep_id: RepId,
    ) -> Result<Cow<'g, DMatrix<f64>>, RepError> {
        let rep = self.get_rep(group, rep_id)?;
        rep.get_matrix().ok_or(RepError::MissingPayload {
            rep: rep_id,
            op_index: self.op_index.unwrap_or_default(),
            what: "matrix",
        })
    }

    pub fn get_permutation_rep<'g>(
        &self,
        group: &'g MasterGroup,
        rep_id: RepId,
    ) -> Result<&'g Permutation, RepError> {
        let rep = self.get_rep(group, rep_id)?;
        rep.get_permutation().ok_or(RepError::MissingPayload {
            rep: rep_id,
            op_index: self.op_index.unwrap_or_default(),
            what: "permutation",
        })
    }

    pub fn get_basis_permute_rep<'g>(
        &self,
        group: &'g MasterGroup,
        rep_id: RepId,
    ) -> Result<&'g [UnitCellCoord], RepError> {
        let rep = self.get_rep(group, rep_id)?;
        rep.get_basis_permutation().ok_or(RepError::MissingPayload {
            rep: rep_id,
            op_index: self.op_index.unwrap_or_default(),
            what: "basis permutation",
        })
    }

    /// Matrices of this operation in several tables, in the order requested.
    pub fn get_matrix_reps<'g>(
        &self,
        group: &'g MasterGroup,
        rep_ids: &[RepId],
    ) -> Result<Vec<Cow<'g, DMatrix<f64>>>, RepError> {
        rep_ids
            .iter()
            .map(|&rep_id| self.get_matrix_rep(group, rep_id))
            .collect()
    }

    /// Records `other` as this operation's representation in table `rep_id`.
    pub fn register_rep(
        &self,
        group: &mut MasterGroup,
        rep_id: RepId,
        other: SymOpRep,
    ) -> Result<(), RepError> {
        let i = self.bound_index(group)?;
        group.register_rep(rep_id, i, other)
    }

    /// Same classification and payload within `tol`; group bindings are ignored.
    pub fn approx_eq(&self, other: &SymOpRep, tol: f64) -> bool {
        self.kind == other.kind && self.payload.approx_eq(&other.payload, tol)
    }

    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Classifies a Cartesian operation `x ↦ m x + tau`.
///
/// Proper operations are identity, rotation, or screw (translation along the
/// axis). Improper ones are inversion, mirror, glide (translation in the
/// plane), or rotoinversion. Non-orthogonal input is `Invalid`.
pub(crate) fn classify(m: &Matrix3<f64>, tau: &Vector3<f64>, tol: f64) -> SymmetryType {
    let id = Matrix3::identity();
    let det = m.determinant();
    if !approx_eq3(&(m.transpose() * m), &id, tol) || (det.abs() - 1.0).abs() > tol {
        return SymmetryType::Invalid;
    }
    if det > 0.0 {
        if approx_eq3(m, &id, tol) {
            return SymmetryType::Identity;
        }
        if tau.dot(&rotation_axis(m)).abs() > tol {
            SymmetryType::Screw
        } else {
            SymmetryType::Rotation
        }
    } else {
        if approx_eq3(m, &-id, tol) {
            return SymmetryType::Inversion;
        }
        if (m.trace() - 1.0).abs() > tol {
            return SymmetryType::Rotoinversion;
        }
        // A mirror is minus a two-fold rotation about its normal.
        let normal = rotation_axis(&-m);
        if (tau - normal * tau.dot(&normal)).norm() > tol {
            SymmetryType::Glide
        } else {
            SymmetryType::Mirror
        }
    }
}

/// Unit axis of a proper rotation other than the identity.
/// `R + Rᵀ - (tr R - 1) I = 2 (1 - cos θ) n nᵀ`.
fn rotation_axis(r: &Matrix3<f64>) -> Vector3<f64> {
    let s = r + r.transpose() - Matrix3::identity() * (r.trace() - 1.0);
    s.column_iter()
        .max_by(|a, b| {
            a.norm_squared()
                .partial_cmp(&b.norm_squared())
                .unwrap_or(Ordering::Equal)
        })
        .map(|c| c.normalize())
        .unwrap_or_else(Vector3::z)
}
