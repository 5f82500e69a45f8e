//! In-memory data provider for tests, fixtures and embedded use.
//!
//! Mirrors the record shapes of the relational source: a product list, an
//! optional coefficient table with an activity flag, and labor records with
//! validity windows that are summed per item.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use ioplan_core::{Catalog, ItemId, PlanError, PlanResult};
use ioplan_planning::{Coefficient, PlanDataProvider};

use crate::config::PlanningConfig;

/// Row of the coefficient table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientRecord {
    pub input: ItemId,
    pub output: ItemId,
    pub quantity: f64,
    pub active: bool,
}

impl CoefficientRecord {
    pub fn active(input: impl Into<ItemId>, output: impl Into<ItemId>, quantity: f64) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            quantity,
            active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Labor time for one activity (branch / stage) of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborRecord {
    pub item: ItemId,
    pub hours_per_unit: f64,
    pub active: bool,
    pub valid_from: NaiveDate,
    /// `None`: open-ended.
    pub valid_to: Option<NaiveDate>,
}

impl LaborRecord {
    pub fn new(item: impl Into<ItemId>, hours_per_unit: f64, valid_from: NaiveDate) -> Self {
        Self {
            item: item.into(),
            hours_per_unit,
            active: true,
            valid_from,
            valid_to: None,
        }
    }

    pub fn valid_until(mut self, date: NaiveDate) -> Self {
        self.valid_to = Some(date);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Active and within its validity window on `date` (both ends inclusive).
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.active && self.valid_from <= date && self.valid_to.is_none_or(|to| to >= date)
    }
}

/// Read-only provider over owned records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    products: Vec<ItemId>,
    /// `None`: the coefficient table does not exist.
    coefficients: Option<Vec<CoefficientRecord>>,
    labor: Vec<LaborRecord>,
    as_of: Option<NaiveDate>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider whose labor lookup uses the configured as-of date.
    pub fn for_config(config: &PlanningConfig) -> Self {
        Self {
            as_of: config.labor_as_of,
            ..Self::default()
        }
    }

    pub fn with_products<I>(mut self, products: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ItemId>,
    {
        self.products.extend(products.into_iter().map(Into::into));
        self
    }

    /// Declare the coefficient table (possibly empty) without adding rows.
    pub fn with_coefficient_table(mut self) -> Self {
        self.coefficients.get_or_insert_with(Vec::new);
        self
    }

    pub fn with_coefficient(mut self, record: CoefficientRecord) -> Self {
        self.coefficients.get_or_insert_with(Vec::new).push(record);
        self
    }

    pub fn with_labor(mut self, record: LaborRecord) -> Self {
        self.labor.push(record);
        self
    }

    pub fn with_as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }

    fn effective_date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }
}

impl PlanDataProvider for InMemoryProvider {
    /// Products sorted by identifier, duplicates removed.
    fn list_catalog(&self) -> PlanResult<Vec<ItemId>> {
        let mut items = self.products.clone();
        items.sort();
        items.dedup();
        Ok(items)
    }

    fn list_coefficients(&self) -> PlanResult<Option<Vec<Coefficient>>> {
        let Some(records) = &self.coefficients else {
            return Ok(None);
        };

        let mut out = Vec::with_capacity(records.len());
        for r in records.iter().filter(|r| r.active) {
            if !(r.quantity >= 0.0) {
                return Err(PlanError::provider(format!(
                    "coefficient {} -> {} has invalid quantity {}",
                    r.input, r.output, r.quantity
                )));
            }
            out.push(Coefficient::new(r.input.clone(), r.output.clone(), r.quantity));
        }
        Ok(Some(out))
    }

    fn list_labor_intensity(&self, catalog: &Catalog) -> PlanResult<BTreeMap<ItemId, f64>> {
        let date = self.effective_date();
        let mut hours: BTreeMap<ItemId, f64> = BTreeMap::new();

        for r in self.labor.iter().filter(|r| r.applies_on(date)) {
            if !(r.hours_per_unit >= 0.0) {
                return Err(PlanError::provider(format!(
                    "labor record for {} has invalid hours_per_unit {}",
                    r.item, r.hours_per_unit
                )));
            }
            if catalog.contains(&r.item) {
                *hours.entry(r.item.clone()).or_insert(0.0) += r.hours_per_unit;
            }
        }

        tracing::debug!(%date, items = hours.len(), "labor intensity resolved");
        Ok(hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn catalog_is_sorted_and_deduplicated() {
        let provider = InMemoryProvider::new().with_products(["TSHIRT", "MEAL", "TSHIRT"]);
        let items = provider.list_catalog().unwrap();
        assert_eq!(items, vec![ItemId::new("MEAL"), ItemId::new("TSHIRT")]);
    }

    #[test]
    fn missing_table_is_distinct_from_empty_table() {
        let none = InMemoryProvider::new();
        assert_eq!(none.list_coefficients().unwrap(), None);

        let empty = InMemoryProvider::new().with_coefficient_table();
        assert_eq!(empty.list_coefficients().unwrap(), Some(vec![]));
    }

    #[test]
    fn inactive_coefficients_are_ignored() {
        let provider = InMemoryProvider::new()
            .with_coefficient(CoefficientRecord::active("B", "A", 0.5))
            .with_coefficient(CoefficientRecord::active("C", "A", 0.9).inactive());
        let rows = provider.list_coefficients().unwrap().unwrap();
        assert_eq!(rows, vec![Coefficient::new("B", "A", 0.5)]);
    }

    #[test]
    fn negative_coefficient_is_a_provider_error() {
        let provider =
            InMemoryProvider::new().with_coefficient(CoefficientRecord::active("B", "A", -0.5));
        let err = provider.list_coefficients().unwrap_err();
        assert!(matches!(err, PlanError::Provider(_)));
    }

    #[test]
    fn labor_sums_records_valid_on_as_of_date() {
        let as_of = day(2025, 6, 1);
        let provider = InMemoryProvider::new()
            .with_products(["A", "B"])
            .with_as_of(as_of)
            .with_labor(LaborRecord::new("A", 0.25, day(2025, 1, 1)))
            .with_labor(LaborRecord::new("A", 0.5, day(2025, 1, 1)).valid_until(as_of))
            .with_labor(LaborRecord::new("A", 9.0, day(2025, 1, 1)).valid_until(day(2025, 5, 31)))
            .with_labor(LaborRecord::new("A", 9.0, day(2025, 6, 2)))
            .with_labor(LaborRecord::new("B", 9.0, day(2025, 1, 1)).inactive())
            .with_labor(LaborRecord::new("GHOST", 1.0, day(2025, 1, 1)));

        let catalog = Catalog::new(provider.list_catalog().unwrap()).unwrap();
        let hours = provider.list_labor_intensity(&catalog).unwrap();
        assert_eq!(hours.get(&ItemId::new("A")), Some(&0.75));
        assert_eq!(hours.get(&ItemId::new("B")), None);
        assert_eq!(hours.get(&ItemId::new("GHOST")), None);
    }

    #[test]
    fn for_config_uses_configured_date() {
        let cfg = PlanningConfig::default().with_labor_as_of(day(2024, 2, 29));
        let provider = InMemoryProvider::for_config(&cfg);
        assert_eq!(provider.effective_date(), day(2024, 2, 29));
    }
}
