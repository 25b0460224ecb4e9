//! Summary statistics of a daily table (one season or a whole period).

use ceres_balance::WaterBalanceSummary;
use ceres_hazard::HazardStatistics;
use ceres_io::DailyTable;
use ceres_spell::DrySpellSummary;
use serde::Serialize;
use tracing::debug;

use crate::config::StatisticsConfig;

/// Precipitation block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrecipitationStats {
    pub total_mm: f64,
    pub mean_daily: f64,
    pub median_daily: f64,
    pub std_daily: f64,
    pub max_daily: f64,
    pub min_daily: f64,
    /// Days above the rainy-day threshold.
    pub rainy_days: usize,
    /// Days at or below the rainy-day threshold.
    pub dry_days: usize,
    /// Total divided by the number of days.
    pub intensity: f64,
}

/// Temperature block (°C).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureStats {
    /// Mean of the daily average `(tmax + tmin) / 2`.
    pub mean_tavg: f64,
    pub mean_tmax: f64,
    pub mean_tmin: f64,
    pub max_tmax: f64,
    pub min_tmin: f64,
    pub std_tmax: f64,
    pub std_tmin: f64,
    /// Mean of `tmax - tmin`.
    pub diurnal_range: f64,
}

/// Reference evapotranspiration block (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Et0Stats {
    pub total_mm: f64,
    pub mean_daily: f64,
    pub median_daily: f64,
    pub std_daily: f64,
    pub max_daily: f64,
    pub min_daily: f64,
}

/// Summary of one season or period.
///
/// Each block is present only when the table carries its inputs:
/// precipitation for `precipitation` and `dry_spells`, both temperatures
/// for `temperature` and `et0`, all three for `water_balance`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeasonStatistics {
    pub days: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<PrecipitationStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<TemperatureStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub et0: Option<Et0Stats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_balance: Option<WaterBalanceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_spells: Option<DrySpellSummary>,
}

impl HazardStatistics for SeasonStatistics {
    fn total_precipitation(&self) -> Option<f64> {
        self.precipitation.map(|p| p.total_mm)
    }

    fn mean_temperature(&self) -> Option<f64> {
        self.temperature.map(|t| t.mean_tavg)
    }
}

impl SeasonStatistics {
    /// Flattened `(category, [(metric, value)])` view used for period
    /// comparisons. Only present blocks are listed.
    pub fn metrics(&self) -> Vec<(&'static str, Vec<(&'static str, f64)>)> {
        let mut out = Vec::new();
        if let Some(p) = self.precipitation {
            out.push((
                "precipitation",
                vec![
                    ("total_mm", p.total_mm),
                    ("mean_daily", p.mean_daily),
                    ("median_daily", p.median_daily),
                    ("std_daily", p.std_daily),
                    ("max_daily", p.max_daily),
                    ("min_daily", p.min_daily),
                    ("rainy_days", p.rainy_days as f64),
                    ("dry_days", p.dry_days as f64),
                    ("intensity", p.intensity),
                ],
            ));
        }
        if let Some(t) = self.temperature {
            out.push((
                "temperature",
                vec![
                    ("mean_tavg", t.mean_tavg),
                    ("mean_tmax", t.mean_tmax),
                    ("mean_tmin", t.mean_tmin),
                    ("max_tmax", t.max_tmax),
                    ("min_tmin", t.min_tmin),
                    ("std_tmax", t.std_tmax),
                    ("std_tmin", t.std_tmin),
                    ("diurnal_range", t.diurnal_range),
                ],
            ));
        }
        if let Some(e) = self.et0 {
            out.push((
                "et0",
                vec![
                    ("total_mm", e.total_mm),
                    ("mean_daily", e.mean_daily),
                    ("median_daily", e.median_daily),
                    ("std_daily", e.std_daily),
                    ("max_daily", e.max_daily),
                    ("min_daily", e.min_daily),
                ],
            ));
        }
        if let Some(w) = self.water_balance {
            out.push((
                "water_balance",
                vec![
                    ("total_balance", w.balance.total),
                    ("mean_daily", w.balance.mean),
                    ("cumulative_end", w.cumulative_end),
                    ("deficit_days", w.deficit_days as f64),
                    ("surplus_days", w.surplus_days as f64),
                    ("max_deficit", w.max_deficit),
                    ("max_surplus", w.max_surplus),
                    ("water_stress_ratio", w.deficit_ratio),
                ],
            ));
        }
        if let Some(s) = self.dry_spells {
            out.push((
                "dry_spells",
                vec![
                    ("count", s.count as f64),
                    ("max_length_days", s.max_length_days as f64),
                    ("mean_length_days", s.mean_length_days),
                ],
            ));
        }
        out
    }
}

pub(crate) fn precipitation_stats(precip: &[f64], rainy_day_mm: f64) -> PrecipitationStats {
    let total: f64 = precip.iter().sum();
    let rainy_days = precip.iter().filter(|&&p| p > rainy_day_mm).count();
    PrecipitationStats {
        total_mm: total,
        mean_daily: ceres_stats::mean(precip),
        median_daily: ceres_stats::median(precip),
        std_daily: ceres_stats::sd(precip),
        max_daily: ceres_stats::max(precip).unwrap_or(0.0),
        min_daily: ceres_stats::min(precip).unwrap_or(0.0),
        rainy_days,
        dry_days: precip.len() - rainy_days,
        intensity: total / precip.len() as f64,
    }
}

pub(crate) fn temperature_stats(tmax: &[f64], tmin: &[f64]) -> TemperatureStats {
    let tavg: Vec<f64> = tmax.iter().zip(tmin).map(|(hi, lo)| (hi + lo) / 2.0).collect();
    let range: Vec<f64> = tmax.iter().zip(tmin).map(|(hi, lo)| hi - lo).collect();
    TemperatureStats {
        mean_tavg: ceres_stats::mean(&tavg),
        mean_tmax: ceres_stats::mean(tmax),
        mean_tmin: ceres_stats::mean(tmin),
        max_tmax: ceres_stats::max(tmax).unwrap_or(0.0),
        min_tmin: ceres_stats::min(tmin).unwrap_or(0.0),
        std_tmax: ceres_stats::sd(tmax),
        std_tmin: ceres_stats::sd(tmin),
        diurnal_range: ceres_stats::mean(&range),
    }
}

fn et0_stats(et0: &[f64]) -> Et0Stats {
    Et0Stats {
        total_mm: et0.iter().sum(),
        mean_daily: ceres_stats::mean(et0),
        median_daily: ceres_stats::median(et0),
        std_daily: ceres_stats::sd(et0),
        max_daily: ceres_stats::max(et0).unwrap_or(0.0),
        min_daily: ceres_stats::min(et0).unwrap_or(0.0),
    }
}

/// Summarises `table` at `latitude`.
///
/// An empty table yields `days = 0` and no blocks.
pub fn season_statistics(
    table: &DailyTable,
    latitude: f64,
    config: &StatisticsConfig,
) -> SeasonStatistics {
    if table.is_empty() {
        return SeasonStatistics::default();
    }

    let precip = table.precipitation();
    let et0 = ceres_et0::et0_series(table, latitude);

    let temperature = table
        .max_temperature()
        .zip(table.min_temperature())
        .map(|(tmax, tmin)| temperature_stats(tmax, tmin));

    let water_balance = precip.zip(et0.as_deref()).map(|(p, e)| {
        ceres_balance::accumulate(table.dates(), p, e, config.dry_threshold()).summary
    });

    let dry_spells = precip.map(|p| {
        let spells = ceres_spell::detect_dry_spells(table.dates(), p, config.spells());
        ceres_spell::summarize(&spells)
    });

    let stats = SeasonStatistics {
        days: table.len(),
        precipitation: precip.map(|p| precipitation_stats(p, config.rainy_day_mm())),
        temperature,
        et0: et0.as_deref().map(et0_stats),
        water_balance,
        dry_spells,
    };
    debug!(
        days = stats.days,
        total_precipitation = ?stats.total_precipitation(),
        mean_temperature = ?stats.mean_temperature(),
        "season statistics computed"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn dates(n: usize) -> Vec<NaiveDate> {
        NaiveDate::from_ymd_opt(2020, 3, 1)
            .unwrap()
            .iter_days()
            .take(n)
            .collect()
    }

    #[test]
    fn precipitation_block() {
        let table = DailyTable::new(
            dates(5),
            Some(vec![0.0, 1.0, 2.0, 10.0, 0.5]),
            None,
            None,
        )
        .unwrap();
        let stats = season_statistics(&table, 0.0, &StatisticsConfig::default());
        let p = stats.precipitation.unwrap();

        assert_eq!(stats.days, 5);
        assert_relative_eq!(p.total_mm, 13.5);
        assert_relative_eq!(p.mean_daily, 2.7);
        assert_relative_eq!(p.median_daily, 1.0);
        assert_relative_eq!(p.max_daily, 10.0);
        assert_relative_eq!(p.min_daily, 0.0);
        assert_eq!(p.rainy_days, 2);
        assert_eq!(p.dry_days, 3);
        assert_relative_eq!(p.intensity, 2.7);

        assert!(stats.temperature.is_none());
        assert!(stats.et0.is_none());
        assert!(stats.water_balance.is_none());
        assert_eq!(stats.dry_spells.map(|s| s.count), Some(0));
    }

    #[test]
    fn temperature_block() {
        let table = DailyTable::new(
            dates(3),
            Some(vec![0.0; 3]),
            Some(vec![30.0, 32.0, 28.0]),
            Some(vec![18.0, 20.0, 16.0]),
        )
        .unwrap();
        let stats = season_statistics(&table, -1.3, &StatisticsConfig::default());
        let t = stats.temperature.unwrap();

        assert_relative_eq!(t.mean_tavg, 24.0);
        assert_relative_eq!(t.mean_tmax, 30.0);
        assert_relative_eq!(t.mean_tmin, 18.0);
        assert_relative_eq!(t.max_tmax, 32.0);
        assert_relative_eq!(t.min_tmin, 16.0);
        assert_relative_eq!(t.std_tmax, 2.0);
        assert_relative_eq!(t.diurnal_range, 12.0);
        assert_eq!(stats.mean_temperature(), Some(24.0));

        let e = stats.et0.unwrap();
        assert!(e.total_mm > 0.0);
        let wb = stats.water_balance.unwrap();
        assert_relative_eq!(wb.balance.total, -e.total_mm, epsilon = 1e-9);
        assert_eq!(wb.deficit_days, 3);
    }

    #[test]
    fn dry_spell_block() {
        let mut precip = vec![5.0; 3];
        precip.extend(vec![0.0; 10]);
        precip.extend(vec![5.0; 2]);
        let table = DailyTable::new(dates(15), Some(precip), None, None).unwrap();
        let stats = season_statistics(&table, 0.0, &StatisticsConfig::default());
        let spells = stats.dry_spells.unwrap();
        assert_eq!(spells.count, 1);
        assert_eq!(spells.max_length_days, 10);
    }

    #[test]
    fn empty_table_has_no_blocks() {
        let table = DailyTable::new(Vec::new(), Some(Vec::new()), None, None).unwrap();
        let stats = season_statistics(&table, 0.0, &StatisticsConfig::default());
        assert_eq!(stats, SeasonStatistics::default());
        assert!(stats.total_precipitation().is_none());
    }

    #[test]
    fn metrics_follow_present_blocks() {
        let table = DailyTable::new(dates(4), Some(vec![1.0, 2.0, 3.0, 4.0]), None, None).unwrap();
        let stats = season_statistics(&table, 0.0, &StatisticsConfig::default());
        let categories: Vec<&str> = stats.metrics().iter().map(|(c, _)| *c).collect();
        assert_eq!(categories, ["precipitation", "dry_spells"]);
    }
}
