//! Season statistics, projection assessment and ensemble aggregation.
//!
//! # Pipeline
//!
//! ```text
//! DataSource ──fetch──► DailyTable ──window──► season_statistics ──► HazardEvaluation
//!                              │                                          │
//!                              └──────── ProjectionResult ◄───────────────┘
//!                                             │ (one per model, rayon)
//!                                             ▼
//!                     aggregate_ensemble ──► EnsembleResult ◄── change_from_baseline
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use ceres_assess::{
//!     Projection, ProjectionRequest, SeasonWindow, StatisticsConfig, assess_projection,
//! };
//! use ceres_hazard::{HazardEvaluator, StressLevel, ThresholdSource};
//! use ceres_io::DailyTable;
//! use chrono::NaiveDate;
//!
//! let dates: Vec<NaiveDate> = NaiveDate::from_ymd_opt(2045, 3, 1)
//!     .unwrap()
//!     .iter_days()
//!     .take(100)
//!     .collect();
//! let table = DailyTable::new(
//!     dates,
//!     Some(vec![6.5; 100]),
//!     Some(vec![28.0; 100]),
//!     Some(vec![16.0; 100]),
//! )
//! .unwrap();
//!
//! let request = ProjectionRequest {
//!     projection: Projection { scenario: "SSP2-4.5".into(), model: "MIROC6".into() },
//!     latitude: -1.3,
//!     window: SeasonWindow::Period,
//!     thresholds: ThresholdSource::Crop("maize".into()),
//!     statistics: StatisticsConfig::default(),
//! };
//! let result = assess_projection(&table, &HazardEvaluator::default(), &request).unwrap();
//! assert_eq!(result.hazard_evaluation.precipitation_status(), StressLevel::NoStress);
//! ```

mod climatology;
mod compare;
mod config;
mod ensemble;
mod error;
mod output;
mod period;
mod projection;
mod runner;
mod statistics;

pub use climatology::{
    AnnualStatistics, Climatology, ClimatologyPeriod, MIN_DAYS_PER_YEAR, MIN_TREND_YEARS,
    MIN_YEAR_COVERAGE, Normals, PrecipitationNormals, TemperatureNormals, Trends,
    WMO_NORMAL_YEARS, climatology,
};
pub use compare::{MetricComparison, PeriodComparison, compare_statistics};
pub use config::StatisticsConfig;
pub use ensemble::{
    Change, ChangeFromBaseline, Consensus, EnsembleConsensus, EnsembleResult, EnsembleStatistics,
    FailedModel, Spread, aggregate_ensemble, change_from_baseline,
};
pub use error::AssessError;
pub use output::{ErrorPayload, to_json};
pub use period::{DAILY_PREVIEW_ROWS, PeriodStatistics, SeasonReport, analyze_period};
pub use projection::{
    Projection, ProjectionRequest, ProjectionResult, SeasonInfo, SeasonWindow, assess_projection,
};
pub use runner::{
    BASELINE_MODEL, BASELINE_SCENARIO, BaselineReport, DEFAULT_MODELS, DEFAULT_SCENARIOS,
    DateRange, EnsembleReport, EnsembleRequest, FutureReport, Location, ScenarioOutcome,
    run_ensemble,
};
pub use statistics::{
    Et0Stats, PrecipitationStats, SeasonStatistics, TemperatureStats, season_statistics,
};
