//! Baseline-plus-ensemble runner over a [`DataSource`].

use std::collections::BTreeMap;
use std::sync::Arc;

use ceres_hazard::{HazardEvaluator, ThresholdSource};
use ceres_io::{DataSource, FetchPolicy, FetchRequest, fetch_with_policy};
use ceres_season::SeasonConfig;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::config::StatisticsConfig;
use crate::ensemble::{EnsembleResult, FailedModel, aggregate_ensemble, change_from_baseline};
use crate::error::AssessError;
use crate::output::ErrorPayload;
use crate::projection::{
    Projection, ProjectionRequest, ProjectionResult, SeasonWindow, assess_projection,
};

/// Scenario label of the observed baseline.
pub const BASELINE_SCENARIO: &str = "Historical";

/// Model label of the observed baseline.
pub const BASELINE_MODEL: &str = "Observed";

/// Scenarios run when none are given.
pub const DEFAULT_SCENARIOS: [&str; 3] = ["SSP1-2.6", "SSP2-4.5", "SSP5-8.5"];

/// Models run when none are given.
pub const DEFAULT_MODELS: [&str; 5] = [
    "ACCESS-CM2",
    "CanESM5",
    "GFDL-ESM4",
    "MIROC6",
    "MRI-ESM2-0",
];

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Range `start..=end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// Parameters of an ensemble run.
///
/// Each projection is assessed over its whole period unless a
/// [`SeasonConfig`] is set, in which case the first detected season is used.
#[derive(Debug, Clone)]
pub struct EnsembleRequest {
    pub crop: String,
    pub latitude: f64,
    pub longitude: f64,
    pub baseline: DateRange,
    pub future: DateRange,
    pub scenarios: Vec<String>,
    /// Canonical model order; results and consensus tie-breaks follow it.
    pub models: Vec<String>,
    pub season: Option<SeasonConfig>,
    pub statistics: StatisticsConfig,
    pub fetch: FetchPolicy,
}

impl EnsembleRequest {
    /// Request with the default scenarios, models and policies.
    pub fn new(
        crop: impl Into<String>,
        latitude: f64,
        longitude: f64,
        baseline: DateRange,
        future: DateRange,
    ) -> Self {
        Self {
            crop: crop.into(),
            latitude,
            longitude,
            baseline,
            future,
            scenarios: DEFAULT_SCENARIOS.iter().map(|s| s.to_string()).collect(),
            models: DEFAULT_MODELS.iter().map(|s| s.to_string()).collect(),
            season: None,
            statistics: StatisticsConfig::default(),
            fetch: FetchPolicy::default(),
        }
    }

    /// Replace the scenario list.
    pub fn with_scenarios(mut self, scenarios: Vec<String>) -> Self {
        self.scenarios = scenarios;
        self
    }

    /// Replace the model list.
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    /// Detect seasons inside each period instead of using the whole period.
    pub fn with_season_detection(mut self, config: SeasonConfig) -> Self {
        self.season = Some(config);
        self
    }

    /// Set the statistics thresholds.
    pub fn with_statistics(mut self, config: StatisticsConfig) -> Self {
        self.statistics = config;
        self
    }

    /// Set the fetch policy.
    pub fn with_fetch_policy(mut self, policy: FetchPolicy) -> Self {
        self.fetch = policy;
        self
    }

    /// Check ranges, lists and nested configurations.
    pub fn validate(&self) -> Result<(), AssessError> {
        for (name, range) in [("baseline", self.baseline), ("future", self.future)] {
            if range.start > range.end {
                return Err(AssessError::InvalidConfig {
                    reason: format!("{name} start {} is after end {}", range.start, range.end),
                });
            }
        }
        if self.scenarios.is_empty() {
            return Err(AssessError::InvalidConfig {
                reason: "at least one scenario is required".to_string(),
            });
        }
        if self.models.is_empty() {
            return Err(AssessError::InvalidConfig {
                reason: "at least one model is required".to_string(),
            });
        }
        if let Some(season) = &self.season {
            season.validate()?;
        }
        self.statistics.validate()?;
        self.fetch.validate()?;
        Ok(())
    }

    fn window(&self, range: DateRange) -> SeasonWindow {
        match &self.season {
            Some(config) => SeasonWindow::Detect(config.clone()),
            None => SeasonWindow::Explicit {
                start: range.start,
                end: range.end,
            },
        }
    }
}

/// Outcome of one scenario: an ensemble, or an error when no model succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScenarioOutcome {
    Ensemble(Box<EnsembleResult>),
    Failed(ErrorPayload),
}

/// Point of interest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Baseline period and its assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineReport {
    pub period: DateRange,
    pub results: ProjectionResult,
}

/// Future period and one outcome per scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FutureReport {
    pub period: DateRange,
    pub ensembles: BTreeMap<String, ScenarioOutcome>,
}

/// Top-level result of [`run_ensemble`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleReport {
    pub crop: String,
    pub location: Location,
    pub baseline: BaselineReport,
    pub future: FutureReport,
    pub scenarios: Vec<String>,
    pub models: Vec<String>,
}

fn assess_model(
    source: &Arc<dyn DataSource>,
    request: &EnsembleRequest,
    range: DateRange,
    scenario: &str,
    model: &str,
    evaluator: &HazardEvaluator,
    thresholds: &ThresholdSource,
) -> Result<ProjectionResult, AssessError> {
    let fetch = FetchRequest {
        latitude: request.latitude,
        longitude: request.longitude,
        start: range.start,
        end: range.end,
        scenario: scenario.to_string(),
        model: model.to_string(),
    };
    let table = fetch_with_policy(source, &fetch, &request.fetch)?;

    let projection = ProjectionRequest {
        projection: Projection {
            scenario: scenario.to_string(),
            model: model.to_string(),
        },
        latitude: request.latitude,
        window: request.window(range),
        thresholds: thresholds.clone(),
        statistics: request.statistics.clone(),
    };
    assess_projection(&table, evaluator, &projection)
}

fn run_scenario(
    source: &Arc<dyn DataSource>,
    request: &EnsembleRequest,
    scenario: &str,
    evaluator: &HazardEvaluator,
    thresholds: &ThresholdSource,
    baseline: &ProjectionResult,
) -> ScenarioOutcome {
    let _span = info_span!("scenario", scenario).entered();

    let outcomes: Vec<Result<ProjectionResult, AssessError>> = request
        .models
        .par_iter()
        .map(|model| {
            assess_model(
                source,
                request,
                request.future,
                scenario,
                model,
                evaluator,
                thresholds,
            )
        })
        .collect();

    let mut results = Vec::with_capacity(outcomes.len());
    let mut failed_models = Vec::new();
    for (model, outcome) in request.models.iter().zip(outcomes) {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => {
                warn!(model = %model, error = %e, "model skipped");
                failed_models.push(FailedModel {
                    model: model.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    info!(
        succeeded = results.len(),
        total = request.models.len(),
        "scenario complete"
    );

    match aggregate_ensemble(scenario, results) {
        Ok(mut ensemble) => {
            ensemble.change_from_baseline = Some(change_from_baseline(
                &ensemble.ensemble_statistics,
                &baseline.season_statistics,
            ));
            ensemble.failed_models = failed_models;
            ScenarioOutcome::Ensemble(Box::new(ensemble))
        }
        Err(e) => {
            warn!(error = %e, "scenario has no ensemble");
            ScenarioOutcome::Failed(ErrorPayload::from_error(&e))
        }
    }
}

/// Assess the baseline once, then every scenario across all models.
///
/// Models within a scenario run in parallel; results are kept in the order
/// of `request.models`. A failing model is logged and recorded under
/// `failed_models`; a scenario where every model fails gets an error entry.
///
/// # Errors
///
/// Returns [`AssessError::InvalidConfig`] (or a wrapped configuration
/// error) if the request does not validate, [`AssessError::Hazard`] if
/// `evaluator` has no thresholds for `request.crop`, and
/// [`AssessError::BaselineFailure`] if the baseline cannot be assessed.
pub fn run_ensemble(
    source: Arc<dyn DataSource>,
    request: &EnsembleRequest,
    evaluator: &HazardEvaluator,
) -> Result<EnsembleReport, AssessError> {
    let _span = info_span!("ensemble", crop = %request.crop).entered();
    request.validate()?;

    // Resolved once so an unknown crop fails before any fetch.
    let crop = ThresholdSource::Crop(request.crop.clone());
    let thresholds = ThresholdSource::Custom(evaluator.resolve(&crop)?.clone());

    info!(
        latitude = request.latitude,
        longitude = request.longitude,
        scenarios = request.scenarios.len(),
        models = request.models.len(),
        "starting ensemble run"
    );

    let baseline = assess_model(
        &source,
        request,
        request.baseline,
        BASELINE_SCENARIO,
        BASELINE_MODEL,
        evaluator,
        &thresholds,
    )
    .map_err(|e| AssessError::BaselineFailure {
        reason: e.to_string(),
    })?;

    let ensembles: BTreeMap<String, ScenarioOutcome> = request
        .scenarios
        .iter()
        .map(|scenario| {
            let outcome =
                run_scenario(&source, request, scenario, evaluator, &thresholds, &baseline);
            (scenario.clone(), outcome)
        })
        .collect();

    Ok(EnsembleReport {
        crop: request.crop.clone(),
        location: Location {
            latitude: request.latitude,
            longitude: request.longitude,
        },
        baseline: BaselineReport {
            period: request.baseline,
            results: baseline,
        },
        future: FutureReport {
            period: request.future,
            ensembles,
        },
        scenarios: request.scenarios.clone(),
        models: request.models.clone(),
    })
}
