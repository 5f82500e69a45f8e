//! Final-demand specification and its dense vector form.

use core::str::FromStr;
use std::collections::BTreeMap;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use ioplan_core::{Catalog, ItemId, PlanError, PlanResult};

/// Sparse final demand: quantity per item.
///
/// Keyed by `ItemId` in a `BTreeMap`, so iteration (and therefore error
/// listings and serialized output) is deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemandSpec(BTreeMap<ItemId, f64>);

impl DemandSpec {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set the demand for `item`, returning the previous quantity if any.
    pub fn insert(&mut self, item: impl Into<ItemId>, quantity: f64) -> Option<f64> {
        self.0.insert(item.into(), quantity)
    }

    pub fn with(mut self, item: impl Into<ItemId>, quantity: f64) -> Self {
        self.insert(item, quantity);
        self
    }

    pub fn get(&self, item: &ItemId) -> Option<f64> {
        self.0.get(item).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, f64)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    /// Parse `ITEM=QTY` entries. A later entry for the same item replaces an
    /// earlier one.
    pub fn parse_entries<I, S>(entries: I) -> PlanResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut spec = Self::new();
        for raw in entries {
            let entry: DemandEntry = raw.as_ref().parse()?;
            spec.insert(entry.item, entry.quantity);
        }
        Ok(spec)
    }
}

impl From<BTreeMap<ItemId, f64>> for DemandSpec {
    fn from(value: BTreeMap<ItemId, f64>) -> Self {
        Self(value)
    }
}

impl<K: Into<ItemId>> FromIterator<(K, f64)> for DemandSpec {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// A single `ITEM=QTY` demand entry.
///
/// The quantity accepts a decimal comma (`50,5` == `50.5`).
#[derive(Debug, Clone, PartialEq)]
pub struct DemandEntry {
    pub item: ItemId,
    pub quantity: f64,
}

impl FromStr for DemandEntry {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((item, quantity)) = s.split_once('=') else {
            return Err(PlanError::validation(format!(
                "invalid demand entry '{s}': expected ITEM=QTY"
            )));
        };

        let item = item
            .parse::<ItemId>()
            .map_err(|_| PlanError::validation(format!("empty item in demand entry '{s}'")))?;

        let normalized = quantity.trim().replace(',', ".");
        let quantity = normalized.parse::<f64>().map_err(|e| {
            PlanError::validation(format!("invalid quantity in demand entry '{s}': {e}"))
        })?;

        Ok(Self { item, quantity })
    }
}

/// Dense final-demand vector `d`, aligned to catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandVector(Array1<f64>);

impl DemandVector {
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

/// Densify `demand` against `catalog`.
///
/// Every key must be a catalog item; otherwise fails with `UnknownItems`
/// listing all offenders at once. Items not mentioned get demand zero.
pub fn build_demand_vector(catalog: &Catalog, demand: &DemandSpec) -> PlanResult<DemandVector> {
    let mut d = Array1::<f64>::zeros(catalog.len());
    let mut unknown: Vec<ItemId> = Vec::new();

    for (item, quantity) in demand.iter() {
        match catalog.index_of(item) {
            Some(i) => d[i] = quantity,
            None => unknown.push(item.clone()),
        }
    }

    if !unknown.is_empty() {
        return Err(PlanError::UnknownItems(unknown));
    }

    Ok(DemandVector(d))
}
