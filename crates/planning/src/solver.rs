//! Leontief solve: `(I - A) x = d`.

use ndarray::{Array1, Array2};

use ioplan_core::{PlanError, PlanResult};

use crate::coefficients::CoefficientMatrix;
use crate::demand::DemandVector;

/// Total production `x`, aligned to catalog order.
///
/// Negative or NaN components are not rejected here; they indicate
/// inconsistent upstream data and are surfaced in the result table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionVector(Array1<f64>);

impl ProductionVector {
    pub fn from_array(array: Array1<f64>) -> Self {
        Self(array)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.0[index]
    }

    pub fn as_array(&self) -> &Array1<f64> {
        &self.0
    }
}

/// Solve `(I - A) x = d` with a dense direct solve.
///
/// Fails with `SingularSystem` if `A` is not square, does not match the length
/// of `d`, or `(I - A)` has a zero pivot after partial pivoting. A non-finite
/// coefficient fails with `Validation`.
pub fn solve_leontief(a: &CoefficientMatrix, d: &DemandVector) -> PlanResult<ProductionVector> {
    if let Some(((i, j), v)) = a.as_array().indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(PlanError::validation(format!(
            "non-finite coefficient {v} at ({i}, {j})"
        )));
    }

    let (rows, cols) = a.shape();
    if rows != cols {
        return Err(PlanError::singular(format!(
            "coefficient matrix is not square ({rows}x{cols})"
        )));
    }
    if rows != d.len() {
        return Err(PlanError::singular(format!(
            "coefficient matrix is {rows}x{cols} but demand has {} entries",
            d.len()
        )));
    }

    let m = Array2::<f64>::eye(rows) - a.as_array();
    let x = solve_dense(m, d.as_array().clone())?;
    Ok(ProductionVector(x))
}

/// Gaussian elimination with partial pivoting. Consumes `m` and `b`.
///
/// Only an exactly zero (or non-finite) pivot is treated as singular, so a
/// large entry elsewhere in the matrix never rejects an invertible system.
fn solve_dense(mut m: Array2<f64>, mut b: Array1<f64>) -> PlanResult<Array1<f64>> {
    let n = b.len();

    for col in 0..n {
        let mut pivot_row = col;
        let mut pivot_abs = m[[col, col]].abs();
        for row in (col + 1)..n {
            let candidate = m[[row, col]].abs();
            if candidate > pivot_abs {
                pivot_row = row;
                pivot_abs = candidate;
            }
        }

        if !(pivot_abs > 0.0 && pivot_abs.is_finite()) {
            return Err(PlanError::singular(format!("zero pivot in column {col}")));
        }

        if pivot_row != col {
            for k in 0..n {
                m.swap([col, k], [pivot_row, k]);
            }
            b.swap(col, pivot_row);
        }

        let pivot = m[[col, col]];
        for row in (col + 1)..n {
            let factor = m[[row, col]] / pivot;
            if factor == 0.0 {
                continue;
            }
            m[[row, col]] = 0.0;
            for k in (col + 1)..n {
                m[[row, k]] -= factor * m[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let mut acc = b[row];
        for k in (row + 1)..n {
            let coeff = m[[row, k]];
            if coeff != 0.0 {
                acc -= coeff * x[k];
            }
        }
        x[row] = acc / m[[row, row]];
    }

    Ok(x)
}
