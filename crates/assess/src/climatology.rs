//! Multi-year climatology: per-year summaries, long-term normals and
//! linear trends.

use ceres_io::DailyTable;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::StatisticsConfig;
use crate::error::AssessError;
use crate::statistics::{
    PrecipitationStats, TemperatureStats, precipitation_stats, temperature_stats,
};

/// Rows a calendar year needs before it is summarised.
pub const MIN_DAYS_PER_YEAR: usize = 300;

/// Share of the requested years that must have data.
pub const MIN_YEAR_COVERAGE: f64 = 0.8;

/// Valid years needed before trends are fitted.
pub const MIN_TREND_YEARS: usize = 10;

/// Length of a WMO standard normal period.
pub const WMO_NORMAL_YEARS: usize = 30;

/// Summary of one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnnualStatistics {
    pub year: i32,
    pub days: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<PrecipitationStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<TemperatureStats>,
}

/// Long-term precipitation normals over the valid years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrecipitationNormals {
    pub mean_annual_total_mm: f64,
    pub median_annual_total_mm: f64,
    pub std_annual_total_mm: f64,
    pub min_annual_total_mm: f64,
    pub max_annual_total_mm: f64,
    /// Mean of the annual mean daily precipitation.
    pub mean_daily_mm: f64,
    pub years_used: usize,
}

/// Long-term temperature normals over the valid years (°C).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureNormals {
    pub mean_annual_tavg: f64,
    pub mean_annual_tmax: f64,
    pub mean_annual_tmin: f64,
    pub std_annual_tavg: f64,
    pub min_annual_tavg: f64,
    pub max_annual_tavg: f64,
    pub years_used: usize,
}

/// Normals for each variable the table carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Normals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<PrecipitationNormals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<TemperatureNormals>,
}

/// Least-squares slopes of the annual values against the year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Trends {
    /// Annual total precipitation, mm per year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation_mm_per_year: Option<f64>,
    /// Annual mean temperature, °C per year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_c_per_year: Option<f64>,
}

/// Requested years and how many of them had data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClimatologyPeriod {
    pub start_year: i32,
    pub end_year: i32,
    pub n_years: usize,
    pub years_with_data: usize,
}

/// Result of [`climatology`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Climatology {
    pub period: ClimatologyPeriod,
    pub normals: Normals,
    /// Present once [`MIN_TREND_YEARS`] years have data.
    pub trends: Option<Trends>,
    pub annual_statistics: Vec<AnnualStatistics>,
    pub data_completeness_pct: f64,
    /// `true` for a 30-year period.
    pub wmo_standard: bool,
}

fn annual_statistics(
    table: &DailyTable,
    year: i32,
    config: &StatisticsConfig,
) -> Option<AnnualStatistics> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
    let rows = table.slice(start, end);
    if rows.len() < MIN_DAYS_PER_YEAR {
        debug!(year, days = rows.len(), "year skipped");
        return None;
    }

    let precipitation = rows
        .precipitation()
        .map(|p| precipitation_stats(p, config.rainy_day_mm()));
    let temperature = rows
        .max_temperature()
        .zip(rows.min_temperature())
        .map(|(tmax, tmin)| temperature_stats(tmax, tmin));
    if precipitation.is_none() && temperature.is_none() {
        return None;
    }

    Some(AnnualStatistics {
        year,
        days: rows.len(),
        precipitation,
        temperature,
    })
}

fn precipitation_normals(annual: &[AnnualStatistics]) -> Option<PrecipitationNormals> {
    let (totals, daily): (Vec<f64>, Vec<f64>) = annual
        .iter()
        .filter_map(|a| a.precipitation)
        .map(|p| (p.total_mm, p.mean_daily))
        .unzip();
    if totals.is_empty() {
        return None;
    }
    Some(PrecipitationNormals {
        mean_annual_total_mm: ceres_stats::mean(&totals),
        median_annual_total_mm: ceres_stats::median(&totals),
        std_annual_total_mm: ceres_stats::sd(&totals),
        min_annual_total_mm: ceres_stats::min(&totals).unwrap_or(0.0),
        max_annual_total_mm: ceres_stats::max(&totals).unwrap_or(0.0),
        mean_daily_mm: ceres_stats::mean(&daily),
        years_used: totals.len(),
    })
}

fn temperature_normals(annual: &[AnnualStatistics]) -> Option<TemperatureNormals> {
    let temps: Vec<TemperatureStats> = annual.iter().filter_map(|a| a.temperature).collect();
    if temps.is_empty() {
        return None;
    }
    let tavg: Vec<f64> = temps.iter().map(|t| t.mean_tavg).collect();
    let tmax: Vec<f64> = temps.iter().map(|t| t.mean_tmax).collect();
    let tmin: Vec<f64> = temps.iter().map(|t| t.mean_tmin).collect();
    Some(TemperatureNormals {
        mean_annual_tavg: ceres_stats::mean(&tavg),
        mean_annual_tmax: ceres_stats::mean(&tmax),
        mean_annual_tmin: ceres_stats::mean(&tmin),
        std_annual_tavg: ceres_stats::sd(&tavg),
        min_annual_tavg: ceres_stats::min(&tavg).unwrap_or(0.0),
        max_annual_tavg: ceres_stats::max(&tavg).unwrap_or(0.0),
        years_used: temps.len(),
    })
}

/// Slope per year for a variable present in every valid year.
fn trend(
    annual: &[AnnualStatistics],
    value: fn(&AnnualStatistics) -> Option<f64>,
) -> Option<f64> {
    let values: Vec<f64> = annual.iter().map(value).collect::<Option<_>>()?;
    let years: Vec<f64> = annual.iter().map(|a| f64::from(a.year)).collect();
    Some(ceres_stats::linear_trend(&years, &values))
}

/// Multi-year climatology of `table` over `start_year..=end_year`.
///
/// A year counts when the table has at least [`MIN_DAYS_PER_YEAR`] rows in
/// it and carries precipitation or both temperatures. Tables with only one
/// of the two are summarised for that variable alone.
///
/// # Errors
///
/// - [`AssessError::InvalidConfig`] if `end_year < start_year` or `config`
///   does not validate.
/// - [`AssessError::InsufficientData`] if fewer than [`MIN_YEAR_COVERAGE`]
///   of the requested years have data.
pub fn climatology(
    table: &DailyTable,
    start_year: i32,
    end_year: i32,
    config: &StatisticsConfig,
) -> Result<Climatology, AssessError> {
    config.validate()?;
    if end_year < start_year {
        return Err(AssessError::InvalidConfig {
            reason: format!("end year {end_year} is before start year {start_year}"),
        });
    }
    let n_years = (i64::from(end_year) - i64::from(start_year) + 1) as usize;

    let annual: Vec<AnnualStatistics> = (start_year..=end_year)
        .filter_map(|year| annual_statistics(table, year, config))
        .collect();
    if (annual.len() as f64) < n_years as f64 * MIN_YEAR_COVERAGE {
        return Err(AssessError::InsufficientData {
            reason: format!("only {}/{n_years} years available", annual.len()),
        });
    }

    let normals = Normals {
        precipitation: precipitation_normals(&annual),
        temperature: temperature_normals(&annual),
    };
    let trends = (annual.len() >= MIN_TREND_YEARS).then(|| Trends {
        precipitation_mm_per_year: trend(&annual, |a| a.precipitation.map(|p| p.total_mm)),
        temperature_c_per_year: trend(&annual, |a| a.temperature.map(|t| t.mean_tavg)),
    });

    info!(
        start_year,
        end_year,
        years_with_data = annual.len(),
        trends = trends.is_some(),
        "climatology computed"
    );

    Ok(Climatology {
        period: ClimatologyPeriod {
            start_year,
            end_year,
            n_years,
            years_with_data: annual.len(),
        },
        normals,
        trends,
        data_completeness_pct: annual.len() as f64 / n_years as f64 * 100.0,
        wmo_standard: n_years == WMO_NORMAL_YEARS,
        annual_statistics: annual,
    })
}
