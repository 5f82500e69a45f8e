//! Infrastructure layer: configuration, data providers, run storage and the
//! scenario batch runner that drives the planning engine.

pub mod config;
pub mod provider;
pub mod run_store;
pub mod scenarios;

mod integration_tests;

pub use config::{ConfigError, PlanningConfig, SourceConfig};
pub use provider::{CoefficientRecord, InMemoryProvider, LaborRecord};
pub use run_store::{InMemoryRunStore, PlanRun, RunId, RunStore, RunStoreError};
pub use scenarios::{
    BatchReport, Scenario, ScenarioError, ScenarioOutcome, ScenarioReport, ScenarioRunner,
    SkipReason, LEONTIEF_PIPELINE,
};
