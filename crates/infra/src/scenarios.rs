//! Batch runner over configured planning scenarios.
//!
//! Each scenario is computed in isolation: a failure is recorded in the
//! report and the runner moves on to the next scenario.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, info, warn};

use ioplan_core::PlanError;
use ioplan_planning::{
    DemandSpec, LeontiefEngine, MissingLaborPolicy, PlanDataProvider, PlanRequest, ResultTable,
};

use crate::config::PlanningConfig;
use crate::run_store::{PlanRun, RunId, RunStore, RunStoreError};

/// The only pipeline this runner knows how to execute.
pub const LEONTIEF_PIPELINE: &str = "pl_leontief";

/// A configured planning scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: u64,
    pub pipeline: String,
    pub active: bool,
    /// Falls back to `PlanningConfig::default_hours_per_worker`.
    pub hours_per_worker: Option<f64>,
    /// Falls back to `PlanningConfig::default_strict_missing_labor`.
    pub strict_missing_labor: Option<bool>,
    pub demand: DemandSpec,
}

impl Scenario {
    pub fn leontief(id: u64, demand: DemandSpec) -> Self {
        Self {
            id,
            pipeline: LEONTIEF_PIPELINE.to_string(),
            active: true,
            hours_per_worker: None,
            strict_missing_labor: None,
            demand,
        }
    }

    pub fn with_pipeline(mut self, pipeline: impl Into<String>) -> Self {
        self.pipeline = pipeline.into();
        self
    }

    pub fn with_hours_per_worker(mut self, hours: f64) -> Self {
        self.hours_per_worker = Some(hours);
        self
    }

    pub fn with_strict_missing_labor(mut self, strict: bool) -> Self {
        self.strict_missing_labor = Some(strict);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    Inactive,
    UnsupportedPipeline(String),
    EmptyDemand,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Store(#[from] RunStoreError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioOutcome {
    Completed {
        run_id: RunId,
        total_hours: f64,
        total_workers: f64,
    },
    Skipped(SkipReason),
    Failed(ScenarioError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub scenario_id: u64,
    pub outcome: ScenarioOutcome,
}

/// Per-scenario outcomes of one batch, in execution order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchReport {
    pub scenarios: Vec<ScenarioReport>,
}

impl BatchReport {
    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, ScenarioOutcome::Completed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ScenarioOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ScenarioOutcome::Failed(_)))
    }

    pub fn outcome(&self, scenario_id: u64) -> Option<&ScenarioOutcome> {
        self.scenarios
            .iter()
            .find(|r| r.scenario_id == scenario_id)
            .map(|r| &r.outcome)
    }

    fn count(&self, pred: impl Fn(&ScenarioOutcome) -> bool) -> usize {
        self.scenarios.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Runs scenarios against a provider and records successes in a store.
#[derive(Debug)]
pub struct ScenarioRunner<P, S> {
    provider: P,
    store: S,
    config: PlanningConfig,
}

impl<P, S> ScenarioRunner<P, S>
where
    P: PlanDataProvider,
    S: RunStore,
{
    pub fn new(provider: P, store: S, config: PlanningConfig) -> Self {
        Self {
            provider,
            store,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run every scenario in ascending id order.
    pub fn run(&self, scenarios: &[Scenario]) -> BatchReport {
        let mut ordered: Vec<&Scenario> = scenarios.iter().collect();
        ordered.sort_by_key(|s| s.id);

        if ordered.is_empty() {
            info!("no scenarios configured");
        }

        let mut report = BatchReport::default();
        for scenario in ordered {
            let outcome = self.run_one(scenario);
            report.scenarios.push(ScenarioReport {
                scenario_id: scenario.id,
                outcome,
            });
        }

        info!(
            facility = %self.config.source.database,
            completed = report.completed(),
            skipped = report.skipped(),
            failed = report.failed(),
            "scenario batch finished"
        );
        report
    }

    fn run_one(&self, scenario: &Scenario) -> ScenarioOutcome {
        if !scenario.active {
            debug!(scenario_id = scenario.id, "scenario inactive; skipping");
            return ScenarioOutcome::Skipped(SkipReason::Inactive);
        }
        if scenario.pipeline != LEONTIEF_PIPELINE {
            warn!(
                scenario_id = scenario.id,
                pipeline = %scenario.pipeline,
                "unsupported pipeline (only '{LEONTIEF_PIPELINE}'); skipping"
            );
            return ScenarioOutcome::Skipped(SkipReason::UnsupportedPipeline(
                scenario.pipeline.clone(),
            ));
        }
        if scenario.demand.is_empty() {
            warn!(scenario_id = scenario.id, "scenario has no active demand; skipping");
            return ScenarioOutcome::Skipped(SkipReason::EmptyDemand);
        }

        match self.execute(scenario) {
            Ok((run_id, total_hours, total_workers)) => {
                info!(
                    scenario_id = scenario.id,
                    %run_id,
                    total_hours,
                    total_workers,
                    "scenario stored"
                );
                ScenarioOutcome::Completed {
                    run_id,
                    total_hours,
                    total_workers,
                }
            }
            Err(err) => {
                warn!(
                    scenario_id = scenario.id,
                    error = %err,
                    "scenario failed; continuing with next"
                );
                ScenarioOutcome::Failed(err)
            }
        }
    }

    fn execute(&self, scenario: &Scenario) -> Result<(RunId, f64, f64), ScenarioError> {
        let hours = scenario
            .hours_per_worker
            .unwrap_or(self.config.default_hours_per_worker);
        let strict = scenario
            .strict_missing_labor
            .unwrap_or(self.config.default_strict_missing_labor);

        info!(
            scenario_id = scenario.id,
            hours,
            strict,
            items = scenario.demand.len(),
            "running scenario"
        );

        let request = PlanRequest::new(scenario.demand.clone())
            .with_hours_per_worker_period(hours)
            .with_missing_labor_policy(MissingLaborPolicy::from(strict));
        let table = LeontiefEngine::new(&self.provider).compute_request(&request)?;

        let (total_hours, total_workers) = totals(&table);
        let run = PlanRun {
            run_id: RunId::new(),
            scenario_id: scenario.id,
            hours_per_worker: hours,
            strict_missing_labor: strict,
            demand_json: demand_json(&scenario.demand),
            result_json: table.to_json_records(),
            total_hours,
            total_workers,
            recorded_at: Utc::now(),
        };
        let run_id = self.store.record(run)?;
        Ok((run_id, total_hours, total_workers))
    }
}

/// Totals from the `TOTAL` row, or summed over rows if it is absent.
fn totals(table: &ResultTable) -> (f64, f64) {
    match table.total() {
        Some(total) => (total.total_hours, total.worker_equivalents),
        None => (
            table.rows().iter().map(|r| r.total_hours).sum(),
            table.rows().iter().map(|r| r.worker_equivalents).sum(),
        ),
    }
}

fn demand_json(demand: &DemandSpec) -> JsonValue {
    let map: Map<String, JsonValue> = demand
        .iter()
        .map(|(item, qty)| {
            let value = serde_json::Number::from_f64(qty)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null);
            (item.to_string(), value)
        })
        .collect();
    JsonValue::Object(map)
}
