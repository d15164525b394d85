//! Master group arena and point-group views.
//!
//! Invariants:
//! - Table [`RepId::COORD`] holds the Cartesian prototypes; every slot is filled.
//! - `products[i][j]` is the index of `R_i · R_j`; `inverses[i]` the index of `R_i⁻¹`.
//! - Every stored representation is bound to this group's id, its own table,
//!   and its slot index.

use super::rep::{RepPayload, SymOpRep};
use super::types::{GroupId, RepError, RepId};
use crate::cfg::MAX_GROUP_ORDER;
use crate::lattice::Lattice;
use crate::linalg::{approx_eq3, det_i64};
use nalgebra::{DMatrix, Matrix3};

/// Owns a finite group of Cartesian operations and all of their registered
/// representations.
///
/// Not `Clone`: a copy would share the handle while diverging in its tables.
#[derive(Debug)]
pub struct MasterGroup {
    id: GroupId,
    tables: Vec<Vec<Option<SymOpRep>>>,
    products: Vec<Vec<usize>>,
    inverses: Vec<usize>,
    identity: usize,
}

/// Product table, inverse table and identity index of `mats`, which must be
/// pairwise distinct and closed under products within `tol`.
fn cayley_tables(
    mats: &[Matrix3<f64>],
    tol: f64,
) -> Result<(Vec<Vec<usize>>, Vec<usize>, usize), RepError> {
    let find = |m: &Matrix3<f64>| mats.iter().position(|x| approx_eq3(x, m, tol));

    if let Some(i) = (0..mats.len()).find(|&i| find(&mats[i]) != Some(i)) {
        return Err(RepError::group(format!("operation {i} repeats an earlier one")));
    }
    let identity = find(&Matrix3::identity()).ok_or_else(|| RepError::group("missing identity"))?;
    let mut products = Vec::with_capacity(mats.len());
    for a in mats {
        let row = mats
            .iter()
            .map(|b| find(&(a * b)).ok_or_else(|| RepError::group("not closed under products")))
            .collect::<Result<Vec<_>, _>>()?;
        products.push(row);
    }
    let inverses = products
        .iter()
        .map(|row| {
            row.iter()
                .position(|&k| k == identity)
                .ok_or_else(|| RepError::group("element without inverse"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((products, inverses, identity))
}

impl MasterGroup {
    /// Builds the group from Cartesian operations. Fails if the set is empty,
    /// contains non-Cartesian payloads or repeated operations, lacks the
    /// identity, or is not closed under multiplication (compared on linear
    /// parts within `tol`).
    pub fn new(ops: Vec<SymOpRep>, tol: f64) -> Result<Self, RepError> {
        if ops.is_empty() {
            return Err(RepError::group("no operations"));
        }
        let mats = ops
            .iter()
            .map(|op| {
                op.coord_op().map(|c| c.matrix).ok_or_else(|| {
                    RepError::group(format!(
                        "prototype has a {} payload, expected coord",
                        op.payload().kind_name()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let (products, inverses, identity) = cayley_tables(&mats, tol)?;

        let id = GroupId::fresh();
        let coord = ops
            .into_iter()
            .enumerate()
            .map(|(i, mut op)| {
                op.bind(id, RepId::COORD, i);
                Some(op)
            })
            .collect();
        tracing::debug!(order = mats.len(), "built master group");
        Ok(Self {
            id,
            tables: vec![coord],
            products,
            inverses,
            identity,
        })
    }

    /// Closure of `generators` under multiplication, starting from the identity.
    pub fn generate(generators: &[Matrix3<f64>], tol: f64) -> Result<Self, RepError> {
        let mut elems = vec![Matrix3::identity()];
        let mut frontier = 0;
        while frontier < elems.len() {
            let a = elems[frontier];
            frontier += 1;
            for g in generators {
                let p = a * g;
                if !elems.iter().any(|x| approx_eq3(x, &p, tol)) {
                    if elems.len() == MAX_GROUP_ORDER {
                        return Err(RepError::group(format!(
                            "closure exceeds {MAX_GROUP_ORDER} elements"
                        )));
                    }
                    elems.push(p);
                }
            }
        }
        let ops = elems.into_iter().map(|m| SymOpRep::point(m, tol)).collect();
        Self::new(ops, tol)
    }

    #[inline]
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Group order.
    #[inline]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[inline]
    pub fn identity_index(&self) -> usize {
        self.identity
    }

    /// Cartesian prototype `i`.
    pub fn op(&self, i: usize) -> Option<&SymOpRep> {
        self.tables[0].get(i).and_then(Option::as_ref)
    }

    pub fn ops(&self) -> impl Iterator<Item = &SymOpRep> + '_ {
        self.tables[0].iter().flatten()
    }

    fn check_index(&self, index: usize) -> Result<(), RepError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(RepError::IndexOutOfRange {
                index,
                order: self.len(),
            })
        }
    }

    pub fn product(&self, i: usize, j: usize) -> Result<usize, RepError> {
        self.check_index(i)?;
        self.check_index(j)?;
        Ok(self.products[i][j])
    }

    pub fn inverse(&self, i: usize) -> Result<usize, RepError> {
        self.check_index(i)?;
        Ok(self.inverses[i])
    }

    /// Number of representation tables, including the Cartesian one.
    #[inline]
    pub fn rep_count(&self) -> usize {
        self.tables.len()
    }

    /// Allocates an empty table with one slot per operation.
    pub fn add_representation(&mut self) -> RepId {
        self.tables.push(vec![None; self.len()]);
        RepId(self.tables.len() - 1)
    }

    pub fn representation(&self, rep_id: RepId) -> Result<&[Option<SymOpRep>], RepError> {
        self.tables
            .get(rep_id.0)
            .map(Vec::as_slice)
            .ok_or(RepError::MissingTable(rep_id))
    }

    pub fn rep(&self, rep_id: RepId, op_index: usize) -> Result<&SymOpRep, RepError> {
        self.check_index(op_index)?;
        self.representation(rep_id)?[op_index]
            .as_ref()
            .ok_or(RepError::EmptySlot {
                rep: rep_id,
                op_index,
            })
    }

    /// Stores `rep` at `(rep_id, op_index)`, binding it and copying the
    /// prototype's classification. The Cartesian table is read-only.
    pub fn register_rep(
        &mut self,
        rep_id: RepId,
        op_index: usize,
        mut rep: SymOpRep,
    ) -> Result<(), RepError> {
        self.check_index(op_index)?;
        if rep_id == RepId::COORD {
            return Err(RepError::ReadOnlyTable(rep_id));
        }
        let kind = self.tables[0][op_index]
            .as_ref()
            .map(SymOpRep::kind)
            .ok_or(RepError::EmptySlot {
                rep: RepId::COORD,
                op_index,
            })?;
        let id = self.id;
        let slot = self
            .tables
            .get_mut(rep_id.0)
            .ok_or(RepError::MissingTable(rep_id))?
            .get_mut(op_index)
            .ok_or(RepError::IndexOutOfRange {
                index: op_index,
                order: self.products.len(),
            })?;
        rep.bind(id, rep_id, op_index);
        rep.set_kind(kind);
        *slot = Some(rep);
        Ok(())
    }

    /// Allocates a table and fills it with one representation per operation,
    /// in operation order.
    pub fn add_representation_from(&mut self, reps: Vec<SymOpRep>) -> Result<RepId, RepError> {
        if reps.len() != self.len() {
            return Err(RepError::payload(format!(
                "expected {} representations, got {}",
                self.len(),
                reps.len()
            )));
        }
        let rep_id = self.add_representation();
        for (i, rep) in reps.into_iter().enumerate() {
            if let Err(e) = self.register_rep(rep_id, i, rep) {
                self.tables.pop();
                return Err(e);
            }
        }
        Ok(rep_id)
    }

    /// Dense matrix table; all matrices must be square with one common size.
    pub fn add_matrix_representation(
        &mut self,
        mats: Vec<DMatrix<f64>>,
        tol: f64,
    ) -> Result<RepId, RepError> {
        let dim = mats.first().map(|m| m.nrows());
        if mats.iter().any(|m| Some(m.nrows()) != dim) {
            return Err(RepError::payload("matrix representation sizes differ"));
        }
        let reps = mats
            .into_iter()
            .map(|m| SymOpRep::matrix(m, tol))
            .collect::<Result<Vec<_>, _>>()?;
        self.add_representation_from(reps)
    }

    /// Index of the first filled slot in `rep_id` whose payload matches.
    pub fn find_match(
        &self,
        rep_id: RepId,
        payload: &RepPayload,
        tol: f64,
    ) -> Result<Option<usize>, RepError> {
        Ok(self
            .representation(rep_id)?
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|r| r.payload().approx_eq(payload, tol))))
    }
}

/// Ordered Cartesian operations sharing one master group.
#[derive(Clone, Debug)]
pub struct PointGroup {
    master: Option<GroupId>,
    ops: Vec<SymOpRep>,
    cart: Vec<Matrix3<f64>>,
}

impl PointGroup {
    /// Every operation of `master`, in master order.
    pub fn from_master(master: &MasterGroup) -> Self {
        let ops: Vec<SymOpRep> = master.ops().cloned().collect();
        let cart = ops.iter().filter_map(|op| op.coord_op().map(|c| c.matrix)).collect();
        Self {
            master: Some(master.id()),
            ops,
            cart,
        }
    }

    /// Operations `indices` of `master`; must form a subgroup.
    pub fn subgroup(master: &MasterGroup, indices: &[usize]) -> Result<Self, RepError> {
        if indices.is_empty() {
            return Err(RepError::group("empty subgroup"));
        }
        for &i in indices {
            master.check_index(i)?;
            if !indices.contains(&master.inverse(i)?) {
                return Err(RepError::group(format!("inverse of {i} missing")));
            }
            for &j in indices {
                if !indices.contains(&master.product(i, j)?) {
                    return Err(RepError::group(format!("product of {i} and {j} missing")));
                }
            }
        }
        let ops: Vec<SymOpRep> = indices.iter().filter_map(|&i| master.op(i).cloned()).collect();
        let cart = ops.iter().filter_map(|op| op.coord_op().map(|c| c.matrix)).collect();
        Ok(Self {
            master: Some(master.id()),
            ops,
            cart,
        })
    }

    /// Operations supplied by an external symmetry finder. All must share one
    /// master handle (or none) and carry Cartesian payloads. A non-empty set
    /// must be a group within `tol`: distinct, containing the identity, closed
    /// under products and inverses. The empty set is accepted as "no symmetry".
    pub fn from_ops(ops: Vec<SymOpRep>, tol: f64) -> Result<Self, RepError> {
        let master = ops.first().and_then(SymOpRep::master);
        let mut cart = Vec::with_capacity(ops.len());
        for op in &ops {
            if op.master() != master {
                return Err(RepError::MasterMismatch);
            }
            let c = op.coord_op().ok_or_else(|| {
                RepError::payload(format!(
                    "point group entries must be coord operations, got {}",
                    op.payload().kind_name()
                ))
            })?;
            cart.push(c.matrix);
        }
        if !cart.is_empty() {
            cayley_tables(&cart, tol)?;
        }
        Ok(Self { master, ops, cart })
    }

    #[inline]
    pub fn master_id(&self) -> Option<GroupId> {
        self.master
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SymOpRep> {
        self.ops.iter()
    }

    /// Cartesian matrices, parallel to [`iter`](Self::iter).
    #[inline]
    pub fn cart_matrices(&self) -> &[Matrix3<f64>] {
        &self.cart
    }

    /// `true` iff every `R · lattice` is the same point lattice as `lattice`.
    pub fn maps_lattice_onto_itself(&self, lattice: &Lattice, tol: f64) -> bool {
        self.cart.iter().all(|r| {
            lattice
                .transformed_by(r)
                .ok()
                .and_then(|image| lattice.transformation_to(&image, tol))
                .is_some_and(|t| det_i64(&t).abs() == 1)
        })
    }
}

impl<'a> IntoIterator for &'a PointGroup {
    type Item = &'a SymOpRep;
    type IntoIter = std::slice::Iter<'a, SymOpRep>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
