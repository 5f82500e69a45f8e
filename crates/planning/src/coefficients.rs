//! Technical-coefficient matrix assembly.

use std::collections::HashSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use ioplan_core::{Catalog, ItemId};

/// One sparse technical coefficient: `quantity` units of `input` are consumed
/// per unit of `output` produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    pub input: ItemId,
    pub output: ItemId,
    pub quantity: f64,
}

impl Coefficient {
    pub fn new(input: impl Into<ItemId>, output: impl Into<ItemId>, quantity: f64) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            quantity,
        }
    }
}

/// Dense technical-coefficient matrix `A`.
///
/// `A[i][j]` is the quantity of catalog item `i` consumed per unit of catalog
/// item `j` produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientMatrix(Array2<f64>);

impl CoefficientMatrix {
    /// All-zero matrix: no intermediate consumption, production equals demand.
    pub fn zeros(n: usize) -> Self {
        Self(Array2::zeros((n, n)))
    }

    /// Wrap an existing array. The solver rejects non-square arrays.
    pub fn from_array(array: Array2<f64>) -> Self {
        Self(array)
    }

    pub fn shape(&self) -> (usize, usize) {
        self.0.dim()
    }

    pub fn get(&self, input: usize, output: usize) -> f64 {
        self.0[[input, output]]
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }
}

/// Outcome of assembling `A` from sparse rows.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixBuild {
    pub matrix: CoefficientMatrix,
    /// Rows skipped because the input or output item is not in the catalog.
    pub skipped: usize,
    /// Rows that replaced an earlier value for the same (input, output) cell.
    pub overwritten: usize,
}

/// Assemble the n×n coefficient matrix for `catalog`.
///
/// Rows referencing items outside the catalog are skipped and counted, never
/// fatal. `None` means there is no coefficient source at all, which yields the
/// zero matrix. A repeated (input, output) pair keeps the last value seen.
pub fn build_coefficient_matrix(catalog: &Catalog, source: Option<&[Coefficient]>) -> MatrixBuild {
    let n = catalog.len();
    let mut matrix = Array2::<f64>::zeros((n, n));

    let Some(rows) = source else {
        tracing::info!("no coefficient source; using A = 0 (no intermediate consumption)");
        return MatrixBuild {
            matrix: CoefficientMatrix(matrix),
            skipped: 0,
            overwritten: 0,
        };
    };

    let mut skipped = 0usize;
    let mut overwritten = 0usize;
    let mut written: HashSet<(usize, usize)> = HashSet::with_capacity(rows.len());

    for row in rows {
        let (Some(i), Some(j)) = (catalog.index_of(&row.input), catalog.index_of(&row.output))
        else {
            skipped += 1;
            continue;
        };
        if !written.insert((i, j)) {
            overwritten += 1;
        }
        matrix[[i, j]] = row.quantity;
    }

    if skipped > 0 {
        tracing::warn!(
            skipped,
            "skipped coefficient rows whose input or output item is not in the catalog"
        );
    }
    if overwritten > 0 {
        tracing::warn!(
            overwritten,
            "duplicate (input, output) coefficient rows; last value wins"
        );
    }

    tracing::debug!(items = n, rows = rows.len(), skipped, "coefficient matrix assembled");

    MatrixBuild {
        matrix: CoefficientMatrix(matrix),
        skipped,
        overwritten,
    }
}
