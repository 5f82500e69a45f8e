//! Result table: one row per contributing item plus a `TOTAL` row.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use ioplan_core::{Catalog, ItemId};

use crate::demand::DemandVector;
use crate::labor::{LaborConversion, LaborIntensity};
use crate::solver::ProductionVector;

/// Identifier of the synthetic totals row.
pub const TOTAL_ROW_ID: &str = "TOTAL";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Item,
    Total,
}

/// One reporting row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub item: ItemId,
    pub kind: RowKind,
    pub demand: f64,
    pub production: f64,
    /// `None` on the `TOTAL` row, where a per-unit figure is meaningless.
    pub hours_per_unit: Option<f64>,
    pub total_hours: f64,
    pub worker_equivalents: f64,
}

impl ResultRow {
    pub fn is_total(&self) -> bool {
        self.kind == RowKind::Total
    }
}

/// Ordered result rows of one computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<ResultRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The synthetic totals row.
    pub fn total(&self) -> Option<&ResultRow> {
        self.rows.iter().find(|r| r.is_total())
    }

    /// The row for catalog item `item`, if it was kept.
    pub fn row(&self, item: &str) -> Option<&ResultRow> {
        self.rows
            .iter()
            .find(|r| !r.is_total() && r.item.as_str() == item)
    }

    /// JSON array of row objects with NaN, infinities and missing values as
    /// `null`, so the output is valid for strict JSON consumers.
    pub fn to_json_records(&self) -> JsonValue {
        JsonValue::Array(
            self.rows
                .iter()
                .map(|r| {
                    json!({
                        "item": r.item.as_str(),
                        "demand": finite_or_null(r.demand),
                        "production": finite_or_null(r.production),
                        "hours_per_unit": r.hours_per_unit.map_or(JsonValue::Null, finite_or_null),
                        "total_hours": finite_or_null(r.total_hours),
                        "worker_equivalents": finite_or_null(r.worker_equivalents),
                    })
                })
                .collect(),
        )
    }
}

fn finite_or_null(v: f64) -> JsonValue {
    if v.is_finite() { json!(v) } else { JsonValue::Null }
}

/// Build the reporting table.
///
/// Rows where both demand and production are exactly zero are dropped. The
/// `TOTAL` row sums demand and production over the kept rows and carries the
/// system-wide labor totals. Rows are stably sorted by identifier in lexical
/// order, `TOTAL` included.
pub fn aggregate(
    catalog: &Catalog,
    demand: &DemandVector,
    production: &ProductionVector,
    intensity: &LaborIntensity,
    labor: &LaborConversion,
) -> ResultTable {
    let mut rows: Vec<ResultRow> = catalog
        .iter()
        .enumerate()
        .filter(|&(i, _)| demand.get(i) != 0.0 || production.get(i) != 0.0)
        .map(|(i, item)| ResultRow {
            item: item.clone(),
            kind: RowKind::Item,
            demand: demand.get(i),
            production: production.get(i),
            hours_per_unit: Some(intensity.get(i)),
            total_hours: labor.hours_by_item[i],
            worker_equivalents: labor.workers_by_item[i],
        })
        .collect();

    let total = ResultRow {
        item: ItemId::new(TOTAL_ROW_ID),
        kind: RowKind::Total,
        demand: rows.iter().map(|r| r.demand).sum(),
        production: rows.iter().map(|r| r.production).sum(),
        hours_per_unit: None,
        total_hours: labor.total_hours,
        worker_equivalents: labor.total_workers,
    };
    rows.push(total);

    rows.sort_by(|a, b| a.item.cmp(&b.item));

    ResultTable { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    fn labor(hours: Array1<f64>, per_worker: f64) -> LaborConversion {
        let total_hours = hours.sum();
        LaborConversion {
            workers_by_item: &hours / per_worker,
            hours_by_item: hours,
            total_hours,
            total_workers: total_hours / per_worker,
            hours_per_worker_period: per_worker,
        }
    }

    fn table(items: &[&str], d: Array1<f64>, x: Array1<f64>, h: Array1<f64>) -> ResultTable {
        let catalog = Catalog::new(items.iter().copied()).unwrap();
        let conversion = labor(&h * &x, 160.0);
        aggregate(
            &catalog,
            &DemandVector::from_array(d),
            &ProductionVector::from_array(x),
            &LaborIntensity::from_array(h),
            &conversion,
        )
    }

    #[test]
    fn drops_uninvolved_items() {
        let t = table(
            &["A", "B", "C"],
            array![100.0, 0.0, 0.0],
            array![100.0, 50.0, 0.0],
            array![1.0, 2.0, 3.0],
        );
        assert!(t.row("A").is_some());
        assert!(t.row("B").is_some());
        assert!(t.row("C").is_none());
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn keeps_item_with_negative_production() {
        let t = table(&["A"], array![0.0], array![-1.0], array![1.0]);
        assert_eq!(t.row("A").map(|r| r.production), Some(-1.0));
    }

    #[test]
    fn total_row_sums_kept_rows() {
        let t = table(
            &["A", "B", "C"],
            array![100.0, 0.0, 0.0],
            array![100.0, 50.0, 0.0],
            array![1.0, 2.0, 3.0],
        );
        let total = t.total().unwrap();
        let items: Vec<&ResultRow> = t.rows().iter().filter(|r| !r.is_total()).collect();
        assert_eq!(total.demand, items.iter().map(|r| r.demand).sum::<f64>());
        assert_eq!(total.production, items.iter().map(|r| r.production).sum::<f64>());
        assert_eq!(total.total_hours, 200.0);
        assert_eq!(total.worker_equivalents, 1.25);
        assert_eq!(total.hours_per_unit, None);
    }

    #[test]
    fn total_sorts_lexically_among_items() {
        let t = table(
            &["ZINC", "APPLE", "TSHIRT", "b_lower"],
            array![1.0, 1.0, 1.0, 1.0],
            array![1.0, 1.0, 1.0, 1.0],
            array![1.0, 1.0, 1.0, 1.0],
        );
        let order: Vec<&str> = t.rows().iter().map(|r| r.item.as_str()).collect();
        assert_eq!(order, vec!["APPLE", "TOTAL", "TSHIRT", "ZINC", "b_lower"]);
    }

    #[test]
    fn only_total_when_nothing_is_involved() {
        let t = table(&["A"], array![0.0], array![0.0], array![1.0]);
        assert_eq!(t.len(), 1);
        assert!(t.rows()[0].is_total());
    }

    #[test]
    fn json_records_replace_non_finite_with_null() {
        let t = table(&["A"], array![f64::NAN], array![f64::NAN], array![1.0]);
        let records = t.to_json_records();
        let rows = records.as_array().unwrap();
        let a = rows.iter().find(|r| r["item"] == "A").unwrap();
        assert!(a["production"].is_null());
        assert_eq!(a["hours_per_unit"], json!(1.0));
        let total = rows.iter().find(|r| r["item"] == "TOTAL").unwrap();
        assert!(total["hours_per_unit"].is_null());
        assert!(serde_json::to_string(&records).is_ok());
    }
}
