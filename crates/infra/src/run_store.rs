//! Storage of completed plan runs.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Identifier of a stored run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Time-ordered (UUIDv7) identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RunId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One successful scenario computation, ready to persist.
///
/// `demand_json` and `result_json` hold strict JSON (non-finite numbers are
/// stored as `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRun {
    pub run_id: RunId,
    pub scenario_id: u64,
    pub hours_per_worker: f64,
    pub strict_missing_labor: bool,
    pub demand_json: JsonValue,
    pub result_json: JsonValue,
    pub total_hours: f64,
    pub total_workers: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Run store abstraction.
pub trait RunStore: Send + Sync {
    /// Persist a run.
    fn record(&self, run: PlanRun) -> Result<RunId, RunStoreError>;

    /// Get a run by ID.
    fn get(&self, run_id: RunId) -> Result<Option<PlanRun>, RunStoreError>;

    /// All runs of a scenario, oldest first.
    fn list_for_scenario(&self, scenario_id: u64) -> Result<Vec<PlanRun>, RunStoreError>;
}

impl<S: RunStore + ?Sized> RunStore for Arc<S> {
    fn record(&self, run: PlanRun) -> Result<RunId, RunStoreError> {
        (**self).record(run)
    }

    fn get(&self, run_id: RunId) -> Result<Option<PlanRun>, RunStoreError> {
        (**self).get(run_id)
    }

    fn list_for_scenario(&self, scenario_id: u64) -> Result<Vec<PlanRun>, RunStoreError> {
        (**self).list_for_scenario(scenario_id)
    }
}

/// Run store error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunStoreError {
    #[error("run already exists: {0}")]
    AlreadyExists(RunId),
    #[error("storage error: {0}")]
    Storage(String),
}

/// In-memory run store for tests/dev.
#[derive(Debug)]
pub struct InMemoryRunStore {
    /// Insertion order.
    runs: RwLock<Vec<PlanRun>>,
}

impl InMemoryRunStore {
    pub fn new() -> Self {
        Self {
            runs: RwLock::new(Vec::new()),
        }
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn len(&self) -> usize {
        self.runs.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryRunStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStore for InMemoryRunStore {
    fn record(&self, run: PlanRun) -> Result<RunId, RunStoreError> {
        let mut runs = self.runs.write().unwrap();
        if runs.iter().any(|r| r.run_id == run.run_id) {
            return Err(RunStoreError::AlreadyExists(run.run_id));
        }
        let id = run.run_id;
        runs.push(run);
        Ok(id)
    }

    fn get(&self, run_id: RunId) -> Result<Option<PlanRun>, RunStoreError> {
        let runs = self.runs.read().unwrap();
        Ok(runs.iter().find(|r| r.run_id == run_id).cloned())
    }

    fn list_for_scenario(&self, scenario_id: u64) -> Result<Vec<PlanRun>, RunStoreError> {
        let runs = self.runs.read().unwrap();
        Ok(runs
            .iter()
            .filter(|r| r.scenario_id == scenario_id)
            .cloned()
            .collect())
    }
}
