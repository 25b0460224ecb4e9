//! Whole-period statistics with a per-season breakdown.

use ceres_balance::DerivedDailyRecord;
use ceres_io::DailyTable;
use ceres_season::{
    Season, SeasonAnalysis, SeasonConfig, SeasonError, SeasonMethod, detect_seasons,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::StatisticsConfig;
use crate::error::AssessError;
use crate::statistics::{SeasonStatistics, season_statistics};

/// Number of daily water-balance rows kept per season.
pub const DAILY_PREVIEW_ROWS: usize = 10;

/// Statistics of one detected season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonReport {
    /// 1-based position in detection order.
    pub season_number: usize,
    pub season: Season,
    pub statistics: SeasonStatistics,
    /// First [`DAILY_PREVIEW_ROWS`] days of the season's water balance.
    pub daily_water_balance: Vec<DerivedDailyRecord>,
    pub daily_records_total: usize,
}

/// Overall and per-season statistics of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodStatistics {
    pub overall: SeasonStatistics,
    pub season_analysis: SeasonAnalysis,
    pub seasons: Vec<SeasonReport>,
}

/// Summarises `table` as a whole and per detected season.
///
/// Season water balances are windows of the whole-period balance, so their
/// cumulative values keep counting from the first day of the table. A table
/// lacking a column the wet-day test needs gets the overall block and no
/// seasons.
///
/// # Errors
///
/// Returns [`AssessError::InsufficientData`] for an empty table, and
/// propagates configuration errors.
pub fn analyze_period(
    table: &DailyTable,
    latitude: f64,
    season_config: &SeasonConfig,
    config: &StatisticsConfig,
) -> Result<PeriodStatistics, AssessError> {
    config.validate()?;
    if table.is_empty() {
        return Err(AssessError::InsufficientData {
            reason: "table has no rows".to_string(),
        });
    }

    let overall = season_statistics(table, latitude, config);
    let season_analysis = match detect_seasons(table, latitude, season_config) {
        Ok(analysis) => analysis,
        Err(SeasonError::MissingVariable { name }) => {
            warn!(variable = %name, "season detection skipped");
            SeasonAnalysis::from_seasons(Vec::new(), SeasonMethod::RainfallBased)
        }
        Err(e) => return Err(e.into()),
    };
    let balance = ceres_balance::water_balance(table, latitude, config.dry_threshold());

    let seasons: Vec<SeasonReport> = season_analysis
        .seasons
        .iter()
        .enumerate()
        .map(|(i, season)| {
            let window = table.slice(season.onset_date, season.cessation_date);
            let mut statistics = season_statistics(&window, latitude, config);
            let (daily_water_balance, daily_records_total) = match &balance {
                Some(wb) => {
                    let w = wb.window(season.onset_date, season.cessation_date);
                    statistics.water_balance = Some(w.summary);
                    (w.preview(DAILY_PREVIEW_ROWS).to_vec(), w.records.len())
                }
                None => (Vec::new(), 0),
            };
            SeasonReport {
                season_number: i + 1,
                season: *season,
                statistics,
                daily_water_balance,
                daily_records_total,
            }
        })
        .collect();

    info!(days = overall.days, seasons = seasons.len(), "period analysed");

    Ok(PeriodStatistics {
        overall,
        season_analysis,
        seasons,
    })
}
