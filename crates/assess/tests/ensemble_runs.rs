//! Baseline + ensemble runs against an in-memory data source.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use approx::assert_relative_eq;
use ceres_assess::{
    AssessError, BASELINE_MODEL, BASELINE_SCENARIO, DateRange, EnsembleRequest, ScenarioOutcome,
    run_ensemble,
};
use ceres_hazard::{HazardError, HazardEvaluator, StressLevel};
use ceres_io::{DailyTable, DataSource, FetchPolicy, FetchRequest, IoError};
use chrono::NaiveDate;

/// Serves one table per (scenario, model); anything else is missing.
struct MemorySource {
    tables: HashMap<(String, String), DailyTable>,
    delays: HashMap<String, Duration>,
}

impl MemorySource {
    fn new() -> Self {
        Self {
            tables: HashMap::new(),
            delays: HashMap::new(),
        }
    }

    /// 100-day table starting at `start` with `total_mm` spread evenly.
    fn with(self, scenario: &str, model: &str, start: NaiveDate, total_mm: f64) -> Self {
        self.with_precipitation(scenario, model, start, vec![total_mm / 100.0; 100])
    }

    /// 100-day table with the given daily precipitation and 28/16 °C.
    fn with_precipitation(
        self,
        scenario: &str,
        model: &str,
        start: NaiveDate,
        precip: Vec<f64>,
    ) -> Self {
        let dates: Vec<NaiveDate> = start.iter_days().take(100).collect();
        let table = DailyTable::new(
            dates,
            Some(precip),
            Some(vec![28.0; 100]),
            Some(vec![16.0; 100]),
        )
        .unwrap();
        self.with_table(scenario, model, table)
    }

    /// 100-day table without a precipitation column.
    fn with_temperature_only(self, scenario: &str, model: &str, start: NaiveDate) -> Self {
        let dates: Vec<NaiveDate> = start.iter_days().take(100).collect();
        let table =
            DailyTable::new(dates, None, Some(vec![30.0; 100]), Some(vec![18.0; 100])).unwrap();
        self.with_table(scenario, model, table)
    }

    fn with_table(mut self, scenario: &str, model: &str, table: DailyTable) -> Self {
        self.tables
            .insert((scenario.to_string(), model.to_string()), table);
        self
    }

    fn with_delay(mut self, model: &str, delay: Duration) -> Self {
        self.delays.insert(model.to_string(), delay);
        self
    }
}

impl DataSource for MemorySource {
    fn fetch(&self, request: &FetchRequest) -> Result<DailyTable, IoError> {
        if let Some(delay) = self.delays.get(&request.model) {
            thread::sleep(*delay);
        }
        self.tables
            .get(&(request.scenario.clone(), request.model.clone()))
            .map(|t| t.slice(request.start, request.end))
            .ok_or_else(|| IoError::FileNotFound {
                path: format!("{}/{}", request.scenario, request.model).into(),
            })
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn baseline_start() -> NaiveDate {
    date(1991, 3, 1)
}

fn future_start() -> NaiveDate {
    date(2045, 3, 1)
}

fn request(scenarios: &[&str], models: &[&str]) -> EnsembleRequest {
    EnsembleRequest::new(
        "Maize",
        -1.286,
        36.817,
        DateRange::new(baseline_start(), date(1991, 6, 8)),
        DateRange::new(future_start(), date(2045, 6, 8)),
    )
    .with_scenarios(scenarios.iter().map(|s| s.to_string()).collect())
    .with_models(models.iter().map(|s| s.to_string()).collect())
    .with_fetch_policy(FetchPolicy::default().with_retries(0))
}

fn evaluator() -> HazardEvaluator {
    HazardEvaluator::default()
}

/// 8 mm/day with the listed day ranges dry.
fn rain_with_gaps(gaps: &[std::ops::Range<usize>]) -> Vec<f64> {
    (0..100)
        .map(|i| if gaps.iter().any(|g| g.contains(&i)) { 0.0 } else { 8.0 })
        .collect()
}

fn ensemble(outcome: &ScenarioOutcome) -> &ceres_assess::EnsembleResult {
    match outcome {
        ScenarioOutcome::Ensemble(e) => e,
        ScenarioOutcome::Failed(p) => panic!("scenario failed: {}", p.error),
    }
}

#[test]
fn single_model_has_zero_spread() {
    let source = MemorySource::new()
        .with(BASELINE_SCENARIO, BASELINE_MODEL, baseline_start(), 600.0)
        .with("SSP2-4.5", "MIROC6", future_start(), 650.0);

    let report = run_ensemble(
        Arc::new(source),
        &request(&["SSP2-4.5"], &["MIROC6"]),
        &evaluator(),
    )
    .unwrap();

    let e = ensemble(&report.future.ensembles["SSP2-4.5"]);
    assert_eq!(e.n_models, 1);
    let p = e.ensemble_statistics.precipitation;
    assert_relative_eq!(p.mean, 650.0, epsilon = 1e-9);
    assert_relative_eq!(p.min, 650.0, epsilon = 1e-9);
    assert_relative_eq!(p.max, 650.0, epsilon = 1e-9);
    assert_eq!(p.std, 0.0);
    assert_eq!(e.ensemble_statistics.temperature.std, 0.0);
    assert_eq!(e.ensemble_statistics.dry_spell_count.std, 0.0);

    assert_eq!(e.consensus.precipitation.most_common, StressLevel::NoStress);
    assert_relative_eq!(e.consensus.precipitation.agreement_pct, 100.0);

    let change = e.change_from_baseline.unwrap();
    assert_relative_eq!(change.precipitation.absolute, 50.0, epsilon = 1e-9);
    assert_relative_eq!(change.precipitation.percent, 50.0 / 600.0 * 100.0, epsilon = 1e-9);
    assert_relative_eq!(change.temperature.absolute, 0.0, epsilon = 1e-9);
    assert_eq!(change.dry_spell_count.absolute, 0.0);
    assert_eq!(change.dry_spell_max_length.absolute, 0.0);
    assert_eq!(change.dry_spell_mean_length.absolute, 0.0);
}

#[test]
fn dry_spell_change_from_baseline() {
    let source = MemorySource::new()
        .with_precipitation(
            BASELINE_SCENARIO,
            BASELINE_MODEL,
            baseline_start(),
            rain_with_gaps(&[20..30]),
        )
        .with_precipitation(
            "SSP2-4.5",
            "MIROC6",
            future_start(),
            rain_with_gaps(&[10..20, 50..64]),
        );

    let report = run_ensemble(
        Arc::new(source),
        &request(&["SSP2-4.5"], &["MIROC6"]),
        &evaluator(),
    )
    .unwrap();

    let e = ensemble(&report.future.ensembles["SSP2-4.5"]);
    assert_relative_eq!(e.ensemble_statistics.dry_spell_count.mean, 2.0);
    let change = e.change_from_baseline.unwrap();
    assert_relative_eq!(change.dry_spell_count.absolute, 1.0);
    assert_relative_eq!(change.dry_spell_count.percent, 100.0);
    assert_relative_eq!(change.dry_spell_max_length.absolute, 4.0);
    assert_relative_eq!(change.dry_spell_max_length.percent, 40.0);
    assert_relative_eq!(change.dry_spell_mean_length.absolute, 2.0);
    assert_relative_eq!(change.dry_spell_mean_length.percent, 20.0);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json["future"]["ensembles"]["SSP2-4.5"]["change_from_baseline"]["dry_spell_count"]
            ["absolute"],
        1.0
    );
}

#[test]
fn temperature_only_model_counts_toward_ensemble() {
    let source = MemorySource::new()
        .with(BASELINE_SCENARIO, BASELINE_MODEL, baseline_start(), 600.0)
        .with("SSP2-4.5", "ACCESS-CM2", future_start(), 650.0)
        .with_temperature_only("SSP2-4.5", "CanESM5", future_start());

    let report = run_ensemble(
        Arc::new(source),
        &request(&["SSP2-4.5"], &["ACCESS-CM2", "CanESM5"]),
        &evaluator(),
    )
    .unwrap();

    let e = ensemble(&report.future.ensembles["SSP2-4.5"]);
    assert_eq!(e.n_models, 2);
    assert!(e.failed_models.is_empty());

    // Precipitation spread comes from ACCESS-CM2 alone, temperature from both.
    let p = e.ensemble_statistics.precipitation;
    assert_relative_eq!(p.mean, 650.0, epsilon = 1e-9);
    assert_eq!(p.std, 0.0);
    assert_relative_eq!(e.ensemble_statistics.temperature.mean, 23.0, epsilon = 1e-9);

    let dist = &e.consensus.precipitation.status_distribution;
    assert_eq!(dist[&StressLevel::NoStress], 1);
    assert_eq!(dist[&StressLevel::Unknown], 1);
    assert!(
        e.model_projections[1]
            .hazard_evaluation
            .precipitation
            .is_none()
    );
}

#[test]
fn unknown_crop_fails_before_fetching() {
    let source = MemorySource::new()
        .with(BASELINE_SCENARIO, BASELINE_MODEL, baseline_start(), 600.0)
        .with("SSP2-4.5", "MIROC6", future_start(), 650.0);
    let mut req = request(&["SSP2-4.5"], &["MIROC6"]);
    req.crop = "teff".to_string();

    let err = run_ensemble(Arc::new(source), &req, &evaluator()).unwrap_err();
    assert!(matches!(
        err,
        AssessError::Hazard(HazardError::UnknownCrop { .. })
    ));
}

#[test]
fn zero_baseline_gives_zero_percent() {
    let source = MemorySource::new()
        .with(BASELINE_SCENARIO, BASELINE_MODEL, baseline_start(), 0.0)
        .with("SSP1-2.6", "CanESM5", future_start(), 300.0);

    let report = run_ensemble(
        Arc::new(source),
        &request(&["SSP1-2.6"], &["CanESM5"]),
        &evaluator(),
    )
    .unwrap();

    let change = ensemble(&report.future.ensembles["SSP1-2.6"])
        .change_from_baseline
        .unwrap();
    assert_relative_eq!(change.precipitation.absolute, 300.0, epsilon = 1e-9);
    assert_eq!(change.precipitation.percent, 0.0);
}

#[test]
fn baseline_failure_aborts() {
    let source = MemorySource::new().with("SSP2-4.5", "MIROC6", future_start(), 650.0);

    let err = run_ensemble(
        Arc::new(source),
        &request(&["SSP2-4.5"], &["MIROC6"]),
        &evaluator(),
    )
    .unwrap_err();
    assert!(matches!(err, AssessError::BaselineFailure { .. }));
}

#[test]
fn failing_model_reduces_n_models() {
    let source = MemorySource::new()
        .with(BASELINE_SCENARIO, BASELINE_MODEL, baseline_start(), 600.0)
        .with("SSP5-8.5", "ACCESS-CM2", future_start(), 450.0)
        .with("SSP5-8.5", "MIROC6", future_start(), 550.0);

    let report = run_ensemble(
        Arc::new(source),
        &request(&["SSP5-8.5"], &["ACCESS-CM2", "CanESM5", "MIROC6"]),
        &evaluator(),
    )
    .unwrap();

    let e = ensemble(&report.future.ensembles["SSP5-8.5"]);
    assert_eq!(e.n_models, 2);
    assert_eq!(e.failed_models.len(), 1);
    assert_eq!(e.failed_models[0].model, "CanESM5");
    assert_relative_eq!(e.ensemble_statistics.precipitation.mean, 500.0, epsilon = 1e-9);

    let dist = &e.consensus.precipitation.status_distribution;
    assert_eq!(dist.values().sum::<usize>(), e.n_models);
    // 450 mm is moderate, 550 mm is no stress; the tie goes to the first model.
    assert_eq!(e.consensus.precipitation.most_common, StressLevel::ModerateStressLow);
    assert_relative_eq!(e.consensus.precipitation.agreement_pct, 50.0);
}

#[test]
fn scenario_without_models_is_an_error_entry() {
    let source = MemorySource::new()
        .with(BASELINE_SCENARIO, BASELINE_MODEL, baseline_start(), 600.0)
        .with("SSP2-4.5", "MIROC6", future_start(), 650.0);

    let report = run_ensemble(
        Arc::new(source),
        &request(&["SSP2-4.5", "SSP5-8.5"], &["MIROC6"]),
        &evaluator(),
    )
    .unwrap();

    assert!(matches!(
        report.future.ensembles["SSP2-4.5"],
        ScenarioOutcome::Ensemble(_)
    ));
    match &report.future.ensembles["SSP5-8.5"] {
        ScenarioOutcome::Failed(p) => assert_eq!(p.error, "no valid projections for SSP5-8.5"),
        other => panic!("expected an error entry, got {other:?}"),
    }

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json["future"]["ensembles"]["SSP5-8.5"],
        serde_json::json!({"error": "no valid projections for SSP5-8.5"})
    );
    assert_eq!(json["baseline"]["period"]["start"], "1991-03-01");
}

#[test]
fn parallel_runs_keep_model_order() {
    let models = ["ACCESS-CM2", "CanESM5", "GFDL-ESM4", "MIROC6", "MRI-ESM2-0"];
    let mut source =
        MemorySource::new().with(BASELINE_SCENARIO, BASELINE_MODEL, baseline_start(), 600.0);
    for (i, model) in models.iter().enumerate() {
        source = source
            .with("SSP2-4.5", model, future_start(), 500.0 + 10.0 * i as f64)
            // Earlier models finish last.
            .with_delay(model, Duration::from_millis(10 * (models.len() - i) as u64));
    }

    let report = run_ensemble(
        Arc::new(source),
        &request(&["SSP2-4.5"], &models),
        &evaluator(),
    )
    .unwrap();

    let e = ensemble(&report.future.ensembles["SSP2-4.5"]);
    let order: Vec<&str> = e
        .model_projections
        .iter()
        .map(|r| r.projection.model.as_str())
        .collect();
    assert_eq!(order, models);
    assert_eq!(report.models, models);
}
