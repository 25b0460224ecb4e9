//! Season detection over a daily table.

use ceres_io::DailyTable;
use tracing::{debug, info};

use crate::config::{SeasonConfig, WetDayTest};
use crate::error::SeasonError;
use crate::scan::{classify_wet_days, scan_seasons};
use crate::season::{SeasonAnalysis, SeasonMethod};

fn missing(name: &str) -> SeasonError {
    SeasonError::MissingVariable {
        name: name.to_string(),
    }
}

/// Detects growing seasons in `table`.
///
/// The radiative wet-day test computes ET0 at `latitude` and therefore
/// needs both temperature columns; the fixed threshold only needs
/// precipitation. An empty season list is a valid result.
///
/// # Errors
///
/// Returns [`SeasonError::InvalidConfig`] if `config` does not validate, or
/// [`SeasonError::MissingVariable`] if a required column is absent.
pub fn detect_seasons(
    table: &DailyTable,
    latitude: f64,
    config: &SeasonConfig,
) -> Result<SeasonAnalysis, SeasonError> {
    config.validate()?;

    let precip = table.precipitation().ok_or_else(|| missing("precipitation"))?;
    let test = config.wet_day_test();

    let et0 = match test {
        WetDayTest::Radiative { .. } => {
            if table.max_temperature().is_none() {
                return Err(missing("max_temperature"));
            }
            if table.min_temperature().is_none() {
                return Err(missing("min_temperature"));
            }
            ceres_et0::et0_series(table, latitude).unwrap_or_default()
        }
        WetDayTest::FixedThreshold { .. } => Vec::new(),
    };

    let wet = classify_wet_days(precip, &et0, test);
    debug!(
        days = wet.len(),
        wet_days = wet.iter().filter(|&&w| w).count(),
        "classified wet days"
    );

    let seasons = scan_seasons(table.dates(), &wet, config);
    info!(
        seasons = seasons.len(),
        gap_days = config.gap_days(),
        min_season_days = config.min_season_days(),
        "season detection complete"
    );

    Ok(SeasonAnalysis::from_seasons(seasons, SeasonMethod::RainfallBased))
}
