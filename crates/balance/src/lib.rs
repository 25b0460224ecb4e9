//! Daily water balance accumulator.
//!
//! A single forward pass over precipitation and ET0 produces one
//! [`DerivedDailyRecord`] per day (daily balance, running cumulative balance,
//! dry-day flag) together with a [`WaterBalanceSummary`].

use ceres_io::DailyTable;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Precipitation threshold (mm) under which a day counts as dry.
pub const DEFAULT_DRY_THRESHOLD: f64 = 1.0;

/// One day of the water balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedDailyRecord {
    pub date: NaiveDate,
    /// Precipitation (mm).
    pub precipitation: f64,
    /// Reference evapotranspiration (mm).
    pub et0: f64,
    /// `precipitation - et0` (mm).
    pub water_balance: f64,
    /// Running sum of `water_balance` from the first record.
    pub cumulative_balance: f64,
    /// Precipitation below the dry threshold.
    pub is_dry: bool,
    /// Negative daily balance.
    pub water_stress: bool,
}

/// Total, mean and range of one daily variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ValueSummary {
    pub total: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl ValueSummary {
    fn from_values(values: &[f64]) -> Self {
        Self {
            total: values.iter().sum(),
            mean: ceres_stats::mean(values),
            min: ceres_stats::min(values).unwrap_or(0.0),
            max: ceres_stats::max(values).unwrap_or(0.0),
        }
    }
}

/// Aggregate view of a run of [`DerivedDailyRecord`]s.
///
/// All fields are 0 for an empty run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WaterBalanceSummary {
    pub days: usize,
    pub precipitation: ValueSummary,
    pub et0: ValueSummary,
    pub balance: ValueSummary,
    /// Cumulative balance on the first day.
    pub cumulative_start: f64,
    /// Cumulative balance on the last day.
    pub cumulative_end: f64,
    /// Days with negative balance.
    pub deficit_days: usize,
    /// Days with positive balance.
    pub surplus_days: usize,
    /// Share of deficit days (water-stress ratio).
    pub deficit_ratio: f64,
    /// Share of surplus days.
    pub surplus_ratio: f64,
    /// Most negative daily balance.
    pub max_deficit: f64,
    /// Most positive daily balance.
    pub max_surplus: f64,
}

impl WaterBalanceSummary {
    /// Summarises `records` as they are, without recomputing cumulative values.
    pub fn from_records(records: &[DerivedDailyRecord]) -> Self {
        let Some((first, last)) = records.first().zip(records.last()) else {
            return Self::default();
        };

        let precip: Vec<f64> = records.iter().map(|r| r.precipitation).collect();
        let et0: Vec<f64> = records.iter().map(|r| r.et0).collect();
        let balance: Vec<f64> = records.iter().map(|r| r.water_balance).collect();

        let days = records.len();
        let deficit_days = balance.iter().filter(|&&b| b < 0.0).count();
        let surplus_days = balance.iter().filter(|&&b| b > 0.0).count();
        let balance_summary = ValueSummary::from_values(&balance);

        Self {
            days,
            precipitation: ValueSummary::from_values(&precip),
            et0: ValueSummary::from_values(&et0),
            balance: balance_summary,
            cumulative_start: first.cumulative_balance,
            cumulative_end: last.cumulative_balance,
            deficit_days,
            surplus_days,
            deficit_ratio: deficit_days as f64 / days as f64,
            surplus_ratio: surplus_days as f64 / days as f64,
            max_deficit: balance_summary.min,
            max_surplus: balance_summary.max,
        }
    }
}

/// Derived daily records plus their summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterBalance {
    pub records: Vec<DerivedDailyRecord>,
    pub summary: WaterBalanceSummary,
}

impl WaterBalance {
    /// First `n` records (all of them when shorter).
    pub fn preview(&self, n: usize) -> &[DerivedDailyRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Records dated `start..=end`, summarised on their own.
    ///
    /// Cumulative balances keep counting from the start of the full series.
    pub fn window(&self, start: NaiveDate, end: NaiveDate) -> WaterBalance {
        let lo = self.records.partition_point(|r| r.date < start);
        let hi = self.records.partition_point(|r| r.date <= end).max(lo);
        let records = self.records[lo..hi].to_vec();
        let summary = WaterBalanceSummary::from_records(&records);
        WaterBalance { records, summary }
    }
}

/// Accumulates the daily water balance in one forward pass.
///
/// The three slices are read pairwise; if lengths differ, the shortest wins.
/// A day is dry when its precipitation is below `dry_threshold`.
pub fn accumulate(
    dates: &[NaiveDate],
    precipitation: &[f64],
    et0: &[f64],
    dry_threshold: f64,
) -> WaterBalance {
    let records: Vec<DerivedDailyRecord> = dates
        .iter()
        .zip(precipitation)
        .zip(et0)
        .scan(0.0, |cumulative, ((&date, &p), &e)| {
            let water_balance = p - e;
            *cumulative += water_balance;
            Some(DerivedDailyRecord {
                date,
                precipitation: p,
                et0: e,
                water_balance,
                cumulative_balance: *cumulative,
                is_dry: p < dry_threshold,
                water_stress: water_balance < 0.0,
            })
        })
        .collect();

    let summary = WaterBalanceSummary::from_records(&records);
    debug!(
        days = summary.days,
        cumulative_end = summary.cumulative_end,
        deficit_days = summary.deficit_days,
        "accumulated water balance"
    );
    WaterBalance { records, summary }
}

/// Water balance of a whole table.
///
/// Returns `None` when precipitation or either temperature column is
/// missing.
pub fn water_balance(table: &DailyTable, latitude: f64, dry_threshold: f64) -> Option<WaterBalance> {
    let precip = table.precipitation()?;
    let et0 = ceres_et0::et0_series(table, latitude)?;
    Some(accumulate(table.dates(), precip, &et0, dry_threshold))
}
