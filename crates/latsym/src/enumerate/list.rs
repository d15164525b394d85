use super::{check_group, EnumError, EnumParams, Supercell, SupercellEnumerator};
use crate::canonical::canonical_equivalent_lattice;
use crate::lattice::Lattice;
use crate::linalg::det_i64;
use crate::symmetry::PointGroup;

/// Symmetry-distinct superlattices of one reference lattice.
///
/// Invariants:
/// - every stored lattice is canonical under `group`;
/// - no two stored lattices have equal bases within `tol`;
/// - entries keep insertion order, so indices are stable.
#[derive(Clone, Debug)]
pub struct SupercellList<'g> {
    reference: Lattice,
    group: &'g PointGroup,
    tol: f64,
    cells: Vec<Supercell>,
}

impl<'g> SupercellList<'g> {
    pub fn new(reference: Lattice, group: &'g PointGroup, tol: f64) -> Result<Self, EnumError> {
        check_group(&reference, group, tol)?;
        Ok(Self {
            reference,
            group,
            tol,
            cells: Vec::new(),
        })
    }

    #[inline]
    pub fn reference(&self) -> &Lattice {
        &self.reference
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Supercell> {
        self.cells.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Supercell> {
        self.cells.iter()
    }

    /// Index of the entry equivalent to `lattice`, if any.
    pub fn find(&self, lattice: &Lattice) -> Result<Option<usize>, EnumError> {
        let canon = canonical_equivalent_lattice(lattice, self.group, self.tol)?;
        Ok(self.position(&canon))
    }

    /// Adds the canonical form of `lattice` unless an equivalent entry exists.
    /// Returns the index of the (new or existing) entry.
    pub fn add_supercell(&mut self, lattice: &Lattice) -> Result<usize, EnumError> {
        let canon = canonical_equivalent_lattice(lattice, self.group, self.tol)?;
        if let Some(i) = self.position(&canon) {
            return Ok(i);
        }
        let transformation = self
            .reference
            .transformation_to(&canon, self.tol)
            .ok_or(EnumError::NotASupercell)?;
        let volume = det_i64(&transformation).unsigned_abs();
        tracing::debug!(index = self.cells.len(), volume, "new supercell");
        self.cells.push(Supercell {
            lattice: canon,
            transformation,
            volume,
        });
        Ok(self.cells.len() - 1)
    }

    /// Runs the enumerator over `params` and adds everything it yields.
    /// The list's own tolerance replaces `params.tol`. Returns the number of
    /// new entries.
    #[tracing::instrument(skip(self), fields(len = self.cells.len()))]
    pub fn enumerate(&mut self, params: EnumParams) -> Result<usize, EnumError> {
        let before = self.cells.len();
        let params = params.with_tol(self.tol);
        let enumerator = SupercellEnumerator::new(self.reference.clone(), self.group, params)?;
        for cell in enumerator {
            let cell = cell?;
            if self.position(&cell.lattice).is_none() {
                self.cells.push(cell);
            }
        }
        Ok(self.cells.len() - before)
    }

    /// Adds every lattice yielded by `cells` through [`Self::add_supercell`], so
    /// cells from another reference or group are re-canonicalized here.
    /// Stops at the first error. Returns the number of new entries.
    pub fn extend_from<I>(&mut self, cells: I) -> Result<usize, EnumError>
    where
        I: IntoIterator<Item = Result<Supercell, EnumError>>,
    {
        let before = self.cells.len();
        for cell in cells {
            self.add_supercell(&cell?.lattice)?;
        }
        Ok(self.cells.len() - before)
    }

    fn position(&self, canon: &Lattice) -> Option<usize> {
        self.cells
            .iter()
            .position(|c| c.lattice.basis_eq(canon, self.tol))
    }
}

impl<'a, 'g> IntoIterator for &'a SupercellList<'g> {
    type Item = &'a Supercell;
    type IntoIter = std::slice::Iter<'a, Supercell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
