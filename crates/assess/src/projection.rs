//! Single-projection assessment: window the table, summarise, classify.

use ceres_hazard::{HazardEvaluation, HazardEvaluator, ThresholdSource};
use ceres_io::DailyTable;
use ceres_season::{SeasonConfig, SeasonError, SeasonMethod, detect_seasons};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::StatisticsConfig;
use crate::error::AssessError;
use crate::statistics::{SeasonStatistics, season_statistics};

/// Which part of the table a projection is assessed over.
#[derive(Debug, Clone, PartialEq)]
pub enum SeasonWindow {
    /// Explicit dates, both inclusive.
    Explicit { start: NaiveDate, end: NaiveDate },
    /// The first season found by rainfall-based detection.
    Detect(SeasonConfig),
    /// Every row of the table.
    Period,
}

/// Scenario/model label of a projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub scenario: String,
    pub model: String,
}

/// Everything [`assess_projection`] needs besides the table and evaluator.
#[derive(Debug, Clone)]
pub struct ProjectionRequest {
    pub projection: Projection,
    pub latitude: f64,
    pub window: SeasonWindow,
    pub thresholds: ThresholdSource,
    pub statistics: StatisticsConfig,
}

/// The season window actually used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonInfo {
    pub onset_date: NaiveDate,
    pub cessation_date: NaiveDate,
    /// Inclusive day count of the window.
    pub length_days: i64,
    pub method: SeasonMethod,
}

impl SeasonInfo {
    fn new(onset_date: NaiveDate, cessation_date: NaiveDate, method: SeasonMethod) -> Self {
        Self {
            onset_date,
            cessation_date,
            length_days: (cessation_date - onset_date).num_days() + 1,
            method,
        }
    }
}

/// Statistics and hazard classification of one scenario/model pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub projection: Projection,
    pub season_info: SeasonInfo,
    pub season_statistics: SeasonStatistics,
    pub hazard_evaluation: HazardEvaluation,
}

fn insufficient(reason: impl Into<String>) -> AssessError {
    AssessError::InsufficientData {
        reason: reason.into(),
    }
}

/// Assess one projection table against crop thresholds.
///
/// Explicit and whole-period windows accept a table with only precipitation
/// or only temperatures; hazards for the missing variable are left out.
///
/// # Errors
///
/// - [`AssessError::InsufficientData`] if the table (or the requested window
///   of it) is empty, or season detection lacks one of its columns.
/// - [`AssessError::NoSeasonDetected`] if detection finds no season.
/// - [`AssessError::Hazard`] if the threshold source names an unknown crop.
/// - [`AssessError::InvalidConfig`] / [`AssessError::Season`] for invalid
///   statistics or season configuration.
pub fn assess_projection(
    table: &DailyTable,
    evaluator: &HazardEvaluator,
    request: &ProjectionRequest,
) -> Result<ProjectionResult, AssessError> {
    request.statistics.validate()?;

    let (Some(first), Some(last)) = (table.first_date(), table.last_date()) else {
        return Err(insufficient("table has no rows"));
    };

    let season_info = match &request.window {
        SeasonWindow::Explicit { start, end } => {
            SeasonInfo::new(*start, *end, SeasonMethod::UserProvided)
        }
        SeasonWindow::Period => SeasonInfo::new(first, last, SeasonMethod::Period),
        SeasonWindow::Detect(config) => {
            let analysis = match detect_seasons(table, request.latitude, config) {
                Ok(a) => a,
                Err(SeasonError::MissingVariable { name }) => {
                    return Err(insufficient(format!("season detection needs '{name}'")));
                }
                Err(e) => return Err(e.into()),
            };
            let season = analysis
                .seasons
                .first()
                .ok_or(AssessError::NoSeasonDetected)?;
            SeasonInfo::new(
                season.onset_date,
                season.cessation_date,
                SeasonMethod::RainfallBased,
            )
        }
    };

    let window = table.slice(season_info.onset_date, season_info.cessation_date);
    if window.is_empty() {
        return Err(insufficient(format!(
            "no rows between {} and {}",
            season_info.onset_date, season_info.cessation_date
        )));
    }
    debug!(
        onset = %season_info.onset_date,
        cessation = %season_info.cessation_date,
        rows = window.len(),
        method = season_info.method.as_str(),
        "season window selected"
    );

    let season_statistics = season_statistics(&window, request.latitude, &request.statistics);
    let hazard_evaluation = evaluator.evaluate(&season_statistics, &request.thresholds)?;

    info!(
        scenario = %request.projection.scenario,
        model = %request.projection.model,
        precipitation = %hazard_evaluation.precipitation_status(),
        temperature = %hazard_evaluation.temperature_status(),
        "projection assessed"
    );

    Ok(ProjectionResult {
        projection: request.projection.clone(),
        season_info,
        season_statistics,
        hazard_evaluation,
    })
}
