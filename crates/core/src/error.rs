//! Planning error model.

use thiserror::Error;

use crate::id::ItemId;

/// Result type used across the planning layer.
pub type PlanResult<T> = Result<T, PlanError>;

/// Planning-level error.
///
/// Every variant is fatal for the computation that raised it: the engine
/// never returns a partially computed table. Non-fatal conditions (skipped
/// coefficient rows, missing labor data in lenient mode) are logged, not
/// returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    /// The catalog has no items, so the system has no dimension.
    #[error("catalog is empty: no items defined")]
    CatalogEmpty,

    /// Demand references identifiers that are not in the catalog.
    #[error("demand references unknown items: {}", join_ids(.0))]
    UnknownItems(Vec<ItemId>),

    /// `(I - A)` cannot be inverted.
    #[error("(I - A) is singular or not invertible: {0}; inspect the coefficient data")]
    SingularSystem(String),

    /// Strict mode: items with positive production but no known labor intensity.
    #[error("missing labor intensity (hours_per_unit = 0) for items with production > 0: {}", join_ids(.0))]
    MissingLaborData(Vec<ItemId>),

    /// Hours per worker period must be a finite positive number.
    #[error("hours per worker period must be finite and > 0, got {0}")]
    InvalidHoursPerWorker(f64),

    /// A value failed validation (e.g. malformed identifier or demand entry).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A data provider failed to supply its snapshot.
    #[error("data provider failed: {0}")]
    Provider(String),
}

impl PlanError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn singular(msg: impl Into<String>) -> Self {
        Self::SingularSystem(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Stable snake_case label, suitable for log fields and stored run records.
    pub fn kind(&self) -> &'static str {
        match self {
            PlanError::CatalogEmpty => "catalog_empty",
            PlanError::UnknownItems(_) => "unknown_item",
            PlanError::SingularSystem(_) => "singular_system",
            PlanError::MissingLaborData(_) => "missing_labor_data",
            PlanError::InvalidHoursPerWorker(_) => "invalid_hours_per_worker",
            PlanError::Validation(_) => "validation",
            PlanError::Provider(_) => "provider",
        }
    }
}

fn join_ids(ids: &[ItemId]) -> String {
    ids.iter()
        .map(ItemId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
