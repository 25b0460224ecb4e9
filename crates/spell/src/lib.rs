//! Dry-spell detection.
//!
//! A dry spell is a run of consecutive days with precipitation below a
//! threshold, at least `min_dry_days` long.

mod config;
mod error;

pub use config::DrySpellConfig;
pub use error::SpellError;

use chrono::NaiveDate;
use serde::Serialize;

/// A run of consecutive dry days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrySpell {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub length_days: usize,
}

/// Count and length statistics of a set of dry spells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DrySpellSummary {
    pub count: usize,
    pub max_length_days: usize,
    pub mean_length_days: f64,
}

/// Finds every dry spell in a daily series.
///
/// A day is dry when its precipitation is below
/// `config.precip_threshold()`. A run is closed by a non-dry day or by the
/// end of the series and kept when it lasts at least
/// `config.min_dry_days()` days. `dates` and `precipitation` are read
/// pairwise.
pub fn detect_dry_spells(
    dates: &[NaiveDate],
    precipitation: &[f64],
    config: &DrySpellConfig,
) -> Vec<DrySpell> {
    let mut spells = Vec::new();
    let mut run_start: Option<usize> = None;
    let n = dates.len().min(precipitation.len());

    let mut close = |start: usize, end: usize| {
        let length_days = end - start + 1;
        if length_days >= config.min_dry_days() {
            spells.push(DrySpell {
                start_date: dates[start],
                end_date: dates[end],
                length_days,
            });
        }
    };

    for (i, &p) in precipitation[..n].iter().enumerate() {
        let dry = p < config.precip_threshold();
        match (dry, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                close(start, i - 1);
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        close(start, n - 1);
    }

    spells
}

/// Summarises a set of dry spells. All fields are 0 when empty.
pub fn summarize(spells: &[DrySpell]) -> DrySpellSummary {
    let lengths: Vec<f64> = spells.iter().map(|s| s.length_days as f64).collect();
    DrySpellSummary {
        count: spells.len(),
        max_length_days: spells.iter().map(|s| s.length_days).max().unwrap_or(0),
        mean_length_days: ceres_stats::mean(&lengths),
    }
}
