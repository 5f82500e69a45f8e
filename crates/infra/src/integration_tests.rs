//! Integration tests for the full planning pipeline.
//!
//! Tests: InMemoryProvider → LeontiefEngine → ScenarioRunner → RunStore
//!
//! Verifies:
//! - A batch computes and stores every runnable scenario
//! - A failing scenario does not stop the batch
//! - Stored records carry strict JSON and totals from the `TOTAL` row

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use ioplan_core::{ItemId, PlanError};
    use ioplan_planning::{DemandSpec, LeontiefEngine};

    use crate::config::PlanningConfig;
    use crate::provider::{CoefficientRecord, InMemoryProvider, LaborRecord};
    use crate::run_store::{InMemoryRunStore, RunStore};
    use crate::scenarios::{Scenario, ScenarioError, ScenarioOutcome, ScenarioRunner, SkipReason};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn config() -> PlanningConfig {
        PlanningConfig::default().with_labor_as_of(as_of())
    }

    /// Two finished goods sharing one intermediate; a raw material with no
    /// labor data.
    fn provider(config: &PlanningConfig) -> InMemoryProvider {
        let since = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        InMemoryProvider::for_config(config)
            .with_products(["MEAL", "SAUCE", "TSHIRT", "COTTON"])
            .with_coefficient(CoefficientRecord::active("SAUCE", "MEAL", 0.2))
            .with_coefficient(CoefficientRecord::active("COTTON", "TSHIRT", 0.3))
            .with_coefficient(CoefficientRecord::active("GHOST", "MEAL", 1.0))
            .with_labor(LaborRecord::new("MEAL", 0.5, since))
            .with_labor(LaborRecord::new("MEAL", 0.25, since))
            .with_labor(LaborRecord::new("SAUCE", 1.0, since))
            .with_labor(LaborRecord::new("TSHIRT", 2.0, since))
    }

    #[test]
    fn engine_over_in_memory_provider() {
        ioplan_observability::init();
        let cfg = config();
        let provider = provider(&cfg);
        let table = LeontiefEngine::new(&provider)
            .compute(&DemandSpec::new().with("MEAL", 1000.0), 160.0, false)
            .unwrap();

        let meal = table.row("MEAL").unwrap();
        let sauce = table.row("SAUCE").unwrap();
        assert!((meal.production - 1000.0).abs() < 1e-9);
        assert!((sauce.production - 200.0).abs() < 1e-9);
        assert_eq!(meal.hours_per_unit, Some(0.75));

        let total = table.total().unwrap();
        assert!((total.total_hours - 950.0).abs() < 1e-9);
        assert!(table.row("TSHIRT").is_none());
    }

    #[test]
    fn batch_isolates_failures_and_stores_successes() {
        ioplan_observability::init();
        let cfg = config();
        let store = InMemoryRunStore::arc();
        let runner = ScenarioRunner::new(provider(&cfg), store.clone(), cfg);

        let scenarios = vec![
            Scenario::leontief(4, DemandSpec::new().with("MEAL", 100.0))
                .with_hours_per_worker(40.0),
            Scenario::leontief(1, DemandSpec::new().with("GHOST", 5.0)),
            Scenario::leontief(2, DemandSpec::new().with("TSHIRT", 10.0))
                .with_strict_missing_labor(true),
            Scenario::leontief(3, DemandSpec::new()),
            Scenario::leontief(5, DemandSpec::new().with("MEAL", 1.0)).with_pipeline("pl_other"),
            Scenario::leontief(6, DemandSpec::new().with("MEAL", 1.0)).inactive(),
            Scenario::leontief(7, DemandSpec::new().with("TSHIRT", 10.0)),
        ];

        let report = runner.run(&scenarios);

        let ids: Vec<u64> = report.scenarios.iter().map(|r| r.scenario_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(report.completed(), 2);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.skipped(), 3);

        assert_eq!(
            report.outcome(1),
            Some(&ScenarioOutcome::Failed(ScenarioError::Plan(PlanError::UnknownItems(vec![
                ItemId::new("GHOST")
            ]))))
        );
        assert_eq!(
            report.outcome(2),
            Some(&ScenarioOutcome::Failed(ScenarioError::Plan(PlanError::MissingLaborData(vec![
                ItemId::new("COTTON")
            ]))))
        );
        assert_eq!(report.outcome(3), Some(&ScenarioOutcome::Skipped(SkipReason::EmptyDemand)));
        assert_eq!(
            report.outcome(5),
            Some(&ScenarioOutcome::Skipped(SkipReason::UnsupportedPipeline(
                "pl_other".to_string()
            )))
        );
        assert_eq!(report.outcome(6), Some(&ScenarioOutcome::Skipped(SkipReason::Inactive)));

        assert_eq!(store.len(), 2);
        let runs = store.list_for_scenario(4).unwrap();
        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert_eq!(run.hours_per_worker, 40.0);
        assert!(!run.strict_missing_labor);
        assert_eq!(run.demand_json, serde_json::json!({"MEAL": 100.0}));
        // MEAL: 100 * 0.75, SAUCE: 20 * 1.0
        assert!((run.total_hours - 95.0).abs() < 1e-9);
        assert!((run.total_workers - 95.0 / 40.0).abs() < 1e-12);

        let records = run.result_json.as_array().unwrap();
        let items: Vec<&str> = records.iter().filter_map(|r| r["item"].as_str()).collect();
        assert_eq!(items, vec!["MEAL", "SAUCE", "TOTAL"]);
        assert!(records[2]["hours_per_unit"].is_null());

        // Lenient default: COTTON produced with zero hours, still stored.
        let lenient = store.list_for_scenario(7).unwrap();
        assert_eq!(lenient.len(), 1);
        assert!((lenient[0].total_hours - 20.0).abs() < 1e-9);
    }

    #[test]
    fn runners_on_separate_threads_do_not_interfere() {
        let cfg = config();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cfg = cfg.clone();
                std::thread::spawn(move || {
                    let store = Arc::new(InMemoryRunStore::new());
                    let runner = ScenarioRunner::new(provider(&cfg), store.clone(), cfg);
                    let qty = 100.0 * (i + 1) as f64;
                    let scenario = Scenario::leontief(1, DemandSpec::new().with("MEAL", qty));
                    let report = runner.run(&[scenario]);
                    assert_eq!(report.completed(), 1);
                    store.list_for_scenario(1).unwrap()[0].total_hours
                })
            })
            .collect();

        let totals: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for (i, total) in totals.iter().enumerate() {
            let expected = 0.95 * 100.0 * (i + 1) as f64;
            assert!((total - expected).abs() < 1e-9);
        }
    }
}
