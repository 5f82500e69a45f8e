//! Labor intensity and worker-equivalent conversion.

use std::collections::BTreeMap;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use ioplan_core::{Catalog, ItemId, PlanError, PlanResult};

use crate::solver::ProductionVector;

/// How to treat items that must be produced but have no known labor intensity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingLaborPolicy {
    /// Accept and count zero hours for the item (labor is under-counted).
    #[default]
    Lenient,
    /// Fail with `MissingLaborData`.
    Strict,
}

impl MissingLaborPolicy {
    pub fn is_strict(self) -> bool {
        matches!(self, MissingLaborPolicy::Strict)
    }
}

impl From<bool> for MissingLaborPolicy {
    fn from(strict: bool) -> Self {
        if strict {
            MissingLaborPolicy::Strict
        } else {
            MissingLaborPolicy::Lenient
        }
    }
}

/// Hours required per unit produced, aligned to catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct LaborIntensity(Array1<f64>);

const MAX_LISTED: usize = 20;

impl LaborIntensity {
    /// Densify per-item hours against `catalog`.
    ///
    /// Items without an entry default to zero hours; they are reported in a
    /// single warning together with items whose hours are explicitly zero.
    /// Entries for items outside the catalog are ignored.
    pub fn from_hours(catalog: &Catalog, hours: &BTreeMap<ItemId, f64>) -> Self {
        let values: Vec<f64> = catalog
            .iter()
            .map(|item| hours.get(item).copied().unwrap_or(0.0))
            .collect();

        let missing: Vec<&str> = catalog
            .iter()
            .zip(values.iter())
            .filter(|(_, h)| **h == 0.0)
            .map(|(item, _)| item.as_str())
            .collect();

        if !missing.is_empty() {
            let shown = &missing[..missing.len().min(MAX_LISTED)];
            let suffix = if missing.len() > MAX_LISTED { " ..." } else { "" };
            tracing::warn!(
                count = missing.len(),
                "items without active labor data (hours_per_unit = 0): {}{}",
                shown.join(", "),
                suffix
            );
        }

        Self(Array1::from(values))
    }

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

/// Labor implied by a production vector.
#[derive(Debug, Clone, PartialEq)]
pub struct LaborConversion {
    /// `intensity[i] * x[i]`.
    pub hours_by_item: Array1<f64>,
    /// `hours_by_item[i] / hours_per_worker_period`.
    pub workers_by_item: Array1<f64>,
    pub total_hours: f64,
    pub total_workers: f64,
    pub hours_per_worker_period: f64,
}

/// Convert production into labor hours and worker-equivalents.
///
/// `hours_per_worker_period` must be finite and positive. Under the strict
/// policy, any item with `x > 0` and zero intensity fails the conversion.
pub fn convert_labor(
    catalog: &Catalog,
    production: &ProductionVector,
    intensity: &LaborIntensity,
    hours_per_worker_period: f64,
    policy: MissingLaborPolicy,
) -> PlanResult<LaborConversion> {
    if !(hours_per_worker_period.is_finite() && hours_per_worker_period > 0.0) {
        return Err(PlanError::InvalidHoursPerWorker(hours_per_worker_period));
    }

    let n = catalog.len();
    if production.len() != n || intensity.len() != n {
        return Err(PlanError::validation(format!(
            "labor conversion expects {n} items, got production={} intensity={}",
            production.len(),
            intensity.len()
        )));
    }

    let x = production.as_array();
    let h = intensity.as_array();

    let uncovered: Vec<ItemId> = (0..n)
        .filter(|&i| x[i] > 0.0 && h[i] == 0.0)
        .filter_map(|i| catalog.get(i).cloned())
        .collect();

    if !uncovered.is_empty() {
        if policy.is_strict() {
            return Err(PlanError::MissingLaborData(uncovered));
        }
        tracing::warn!(
            count = uncovered.len(),
            "lenient mode: items with production > 0 but no labor data count as zero hours: {:?}",
            uncovered
        );
    }

    let hours_by_item = h * x;
    let workers_by_item = &hours_by_item / hours_per_worker_period;
    let total_hours = hours_by_item.sum();
    let total_workers = total_hours / hours_per_worker_period;

    Ok(LaborConversion {
        hours_by_item,
        workers_by_item,
        total_hours,
        total_workers,
        hours_per_worker_period,
    })
}
