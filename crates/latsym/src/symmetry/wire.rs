//! JSON wire record for [`SymOpRep`].
//!
//! Shape: `{"symmetry_type": "rotation_op", "rep_type": "coord", "matrix": [[..],..], "tau": [..]}`.
//! Matrices are row-major arrays of rows. `character` is written for readers
//! but recomputed on load. Group bindings are not serialized.

use super::rep::{CoordOp, RepPayload, SymOpRep};
use super::types::{Permutation, RepError, SymmetryType, UnitCellCoord};
use nalgebra::{DMatrix, Matrix3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SymOpRecord {
    pub symmetry_type: SymmetryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<f64>,
    #[serde(flatten)]
    pub payload: PayloadRecord,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "rep_type", rename_all = "snake_case")]
pub enum PayloadRecord {
    Coord {
        matrix: [[f64; 3]; 3],
        tau: [f64; 3],
    },
    Matrix {
        matrix: Vec<Vec<f64>>,
    },
    Permutation {
        permutation: Permutation,
    },
    BasisPermute {
        basis_permutation: Vec<UnitCellCoord>,
    },
}

fn rows3(m: &Matrix3<f64>) -> [[f64; 3]; 3] {
    std::array::from_fn(|r| std::array::from_fn(|c| m[(r, c)]))
}

fn matrix_from_rows(rows: &[Vec<f64>]) -> Result<DMatrix<f64>, RepError> {
    let n = rows.len();
    if n == 0 {
        return Err(RepError::payload("empty matrix"));
    }
    if let Some(bad) = rows.iter().find(|row| row.len() != n) {
        return Err(RepError::payload(format!(
            "matrix must be square: {n} rows but a row of length {}",
            bad.len()
        )));
    }
    Ok(DMatrix::from_fn(n, n, |r, c| rows[r][c]))
}

impl From<SymOpRep> for SymOpRecord {
    fn from(op: SymOpRep) -> Self {
        let payload = match op.payload() {
            RepPayload::Coord(c) => PayloadRecord::Coord {
                matrix: rows3(&c.matrix),
                tau: c.tau.into(),
            },
            RepPayload::Matrix(m) => PayloadRecord::Matrix {
                matrix: m.row_iter().map(|r| r.iter().copied().collect()).collect(),
            },
            RepPayload::Permutation(p) => PayloadRecord::Permutation {
                permutation: p.clone(),
            },
            RepPayload::BasisPermute(sites) => PayloadRecord::BasisPermute {
                basis_permutation: sites.clone(),
            },
        };
        Self {
            symmetry_type: op.kind(),
            character: op.character(),
            payload,
        }
    }
}

impl TryFrom<SymOpRecord> for SymOpRep {
    type Error = RepError;

    fn try_from(record: SymOpRecord) -> Result<Self, Self::Error> {
        let payload = match record.payload {
            PayloadRecord::Coord { matrix, tau } => RepPayload::Coord(CoordOp {
                matrix: Matrix3::from_fn(|r, c| matrix[r][c]),
                tau: Vector3::from(tau),
            }),
            PayloadRecord::Matrix { matrix } => RepPayload::Matrix(matrix_from_rows(&matrix)?),
            PayloadRecord::Permutation { permutation } => RepPayload::Permutation(permutation),
            PayloadRecord::BasisPermute { basis_permutation } => {
                RepPayload::BasisPermute(basis_permutation)
            }
        };
        Ok(SymOpRep::new(record.symmetry_type, payload))
    }
}
