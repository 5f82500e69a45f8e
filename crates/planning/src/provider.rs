//! Data-provider boundary of the engine.

use std::collections::BTreeMap;

use ioplan_core::{Catalog, ItemId, PlanResult};

use crate::coefficients::Coefficient;

/// Supplies the snapshots a computation runs on.
///
/// Implementations live outside this crate (database adapters, in-memory
/// fixtures). The engine calls each method once per computation and keeps
/// nothing afterwards.
pub trait PlanDataProvider {
    /// Ordered item identifiers defining the system's dimension.
    fn list_catalog(&self) -> PlanResult<Vec<ItemId>>;

    /// Sparse technical coefficients. `None` means no coefficient source
    /// exists, which the engine treats as `A = 0`.
    fn list_coefficients(&self) -> PlanResult<Option<Vec<Coefficient>>>;

    /// Non-negative hours per unit for catalog items, already summed over any
    /// underlying activity records.
    fn list_labor_intensity(&self, catalog: &Catalog) -> PlanResult<BTreeMap<ItemId, f64>>;
}

impl<P: PlanDataProvider + ?Sized> PlanDataProvider for &P {
    fn list_catalog(&self) -> PlanResult<Vec<ItemId>> {
        (**self).list_catalog()
    }

    fn list_coefficients(&self) -> PlanResult<Option<Vec<Coefficient>>> {
        (**self).list_coefficients()
    }

    fn list_labor_intensity(&self, catalog: &Catalog) -> PlanResult<BTreeMap<ItemId, f64>> {
        (**self).list_labor_intensity(catalog)
    }
}
