//! `ioplan-planning`
//!
//! **Responsibility:** Leontief production-planning engine.
//!
//! Given a catalog, sparse technical coefficients, labor intensities and a
//! final-demand specification, computes the total production required,
//! the labor hours implied and the equivalent number of full-time workers.
//!
//! This crate is pure computation:
//! - It does not read configuration or the environment.
//! - It performs no IO; inputs are supplied through [`PlanDataProvider`]
//!   or as an already resolved [`PlanInputs`] snapshot.
//! - Every call builds its vectors and matrices from scratch.

pub mod coefficients;
pub mod demand;
pub mod engine;
pub mod labor;
pub mod provider;
pub mod report;
pub mod solver;

pub use coefficients::{build_coefficient_matrix, Coefficient, CoefficientMatrix, MatrixBuild};
pub use demand::{build_demand_vector, DemandEntry, DemandSpec, DemandVector};
pub use engine::{
    compute_plan, LeontiefEngine, PlanInputs, PlanRequest, DEFAULT_HOURS_PER_WORKER_PERIOD,
};
pub use labor::{convert_labor, LaborConversion, LaborIntensity, MissingLaborPolicy};
pub use provider::PlanDataProvider;
pub use report::{aggregate, ResultRow, ResultTable, RowKind, TOTAL_ROW_ID};
pub use solver::{solve_leontief, ProductionVector};
