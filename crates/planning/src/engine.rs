//! Engine entry points: snapshot computation and provider-backed engine.

use std::collections::BTreeMap;

use ioplan_core::{Catalog, ItemId, PlanError, PlanResult};

use crate::coefficients::{build_coefficient_matrix, Coefficient};
use crate::demand::{build_demand_vector, DemandSpec};
use crate::labor::{convert_labor, LaborIntensity, MissingLaborPolicy};
use crate::provider::PlanDataProvider;
use crate::report::{aggregate, ResultTable};
use crate::solver::solve_leontief;

/// Default hours one worker contributes per period (a 160h month).
pub const DEFAULT_HOURS_PER_WORKER_PERIOD: f64 = 160.0;

/// What to compute: final demand plus the labor conversion parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub demand: DemandSpec,
    pub hours_per_worker_period: f64,
    pub missing_labor: MissingLaborPolicy,
}

impl PlanRequest {
    pub fn new(demand: DemandSpec) -> Self {
        Self {
            demand,
            hours_per_worker_period: DEFAULT_HOURS_PER_WORKER_PERIOD,
            missing_labor: MissingLaborPolicy::Lenient,
        }
    }

    pub fn with_hours_per_worker_period(mut self, hours: f64) -> Self {
        self.hours_per_worker_period = hours;
        self
    }

    pub fn with_missing_labor_policy(mut self, policy: MissingLaborPolicy) -> Self {
        self.missing_labor = policy;
        self
    }

    pub fn strict(self) -> Self {
        self.with_missing_labor_policy(MissingLaborPolicy::Strict)
    }
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self::new(DemandSpec::new())
    }
}

/// Fully resolved provider snapshot for one computation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanInputs {
    pub catalog: Catalog,
    /// `None`: no coefficient source (A = 0).
    pub coefficients: Option<Vec<Coefficient>>,
    pub labor_hours: BTreeMap<ItemId, f64>,
}

impl PlanInputs {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            coefficients: None,
            labor_hours: BTreeMap::new(),
        }
    }

    pub fn with_coefficients(mut self, coefficients: Vec<Coefficient>) -> Self {
        self.coefficients = Some(coefficients);
        self
    }

    pub fn with_labor_hours(mut self, labor_hours: BTreeMap<ItemId, f64>) -> Self {
        self.labor_hours = labor_hours;
        self
    }

    /// Resolve every snapshot from `provider`.
    pub fn load<P: PlanDataProvider + ?Sized>(provider: &P) -> PlanResult<Self> {
        let catalog = Catalog::new(provider.list_catalog()?)?;
        let coefficients = provider.list_coefficients()?;
        let labor_hours = provider.list_labor_intensity(&catalog)?;
        Ok(Self {
            catalog,
            coefficients,
            labor_hours,
        })
    }
}

/// Compute the result table for `request` over a resolved snapshot.
///
/// Pure: the same inputs always produce a bit-identical table. Any error
/// aborts the whole computation.
///
/// An invalid `hours_per_worker_period` fails before the demand is validated
/// or the system is solved. `convert_labor` keeps its own check for callers
/// that use it directly.
pub fn compute_plan(inputs: &PlanInputs, request: &PlanRequest) -> PlanResult<ResultTable> {
    let hours_per_worker = request.hours_per_worker_period;
    if !(hours_per_worker.is_finite() && hours_per_worker > 0.0) {
        return Err(PlanError::InvalidHoursPerWorker(hours_per_worker));
    }

    let catalog = &inputs.catalog;
    let d = build_demand_vector(catalog, &request.demand)?;

    let build = build_coefficient_matrix(catalog, inputs.coefficients.as_deref());
    let x = solve_leontief(&build.matrix, &d)?;

    let intensity = LaborIntensity::from_hours(catalog, &inputs.labor_hours);
    let labor = convert_labor(catalog, &x, &intensity, hours_per_worker, request.missing_labor)?;

    let table = aggregate(catalog, &d, &x, &intensity, &labor);

    tracing::info!(
        items = catalog.len(),
        rows = table.len(),
        skipped_coefficients = build.skipped,
        total_hours = labor.total_hours,
        total_workers = labor.total_workers,
        "leontief plan computed"
    );

    Ok(table)
}

/// Provider-backed engine.
///
/// Holds only a borrowed provider; each `compute` call resolves fresh
/// snapshots and shares nothing with other calls.
#[derive(Debug)]
pub struct LeontiefEngine<'a, P: ?Sized> {
    provider: &'a P,
}

impl<'a, P: PlanDataProvider + ?Sized> LeontiefEngine<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Total production and labor for `demand`.
    pub fn compute(
        &self,
        demand: &DemandSpec,
        hours_per_worker_period: f64,
        strict_missing_labor: bool,
    ) -> PlanResult<ResultTable> {
        let request = PlanRequest::new(demand.clone())
            .with_hours_per_worker_period(hours_per_worker_period)
            .with_missing_labor_policy(strict_missing_labor.into());
        self.compute_request(&request)
    }

    pub fn compute_request(&self, request: &PlanRequest) -> PlanResult<ResultTable> {
        let inputs = PlanInputs::load(self.provider)?;
        compute_plan(&inputs, request)
    }
}
