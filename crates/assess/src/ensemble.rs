//! Ensemble aggregation across climate models and comparison with a baseline.

use std::collections::BTreeMap;

use ceres_hazard::{HazardStatistics, StressLevel};
use serde::Serialize;
use tracing::debug;

use crate::error::AssessError;
use crate::projection::ProjectionResult;
use crate::statistics::SeasonStatistics;

/// Mean, range and sample standard deviation of one variable across models.
///
/// All fields are 0 when no model provides the variable; `std` is 0 for a
/// single value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Spread {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
}

impl Spread {
    /// Spread of `values`.
    pub fn of(values: &[f64]) -> Self {
        Self {
            mean: ceres_stats::mean(values),
            min: ceres_stats::min(values).unwrap_or(0.0),
            max: ceres_stats::max(values).unwrap_or(0.0),
            std: ceres_stats::sd(values),
        }
    }
}

/// Per-variable spread across the ensemble.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EnsembleStatistics {
    /// Season total precipitation (mm).
    pub precipitation: Spread,
    /// Season mean temperature (°C).
    pub temperature: Spread,
    pub dry_spell_count: Spread,
    pub dry_spell_max_length: Spread,
    pub dry_spell_mean_length: Spread,
}

/// Agreement of the models on one variable's hazard status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Consensus {
    /// Status → number of models. Sums to the number of models.
    pub status_distribution: BTreeMap<StressLevel, usize>,
    pub most_common: StressLevel,
    /// Share of models voting for `most_common`, in percent.
    pub agreement_pct: f64,
}

impl Consensus {
    /// Consensus over `statuses`, one per model in canonical order.
    ///
    /// The most common status wins; ties go to the status seen first.
    pub fn of(statuses: &[StressLevel]) -> Self {
        let mut status_distribution = BTreeMap::new();
        for &s in statuses {
            *status_distribution.entry(s).or_insert(0) += 1;
        }
        let (most_common, count) = ceres_stats::mode(statuses)
            .map_or((StressLevel::Unknown, 0), |(&s, c)| (s, c));
        let agreement_pct = if statuses.is_empty() {
            0.0
        } else {
            count as f64 / statuses.len() as f64 * 100.0
        };
        Self {
            status_distribution,
            most_common,
            agreement_pct,
        }
    }
}

/// Consensus for each classified variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleConsensus {
    pub precipitation: Consensus,
    pub temperature: Consensus,
}

/// Difference between an ensemble mean and the baseline value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Change {
    pub absolute: f64,
    /// `absolute / baseline * 100`, or 0 when the baseline is not positive.
    pub percent: f64,
}

impl Change {
    /// Change from `baseline` to `future`.
    pub fn between(baseline: f64, future: f64) -> Self {
        let absolute = future - baseline;
        let percent = if baseline > 0.0 {
            absolute / baseline * 100.0
        } else {
            0.0
        };
        Self { absolute, percent }
    }
}

/// Ensemble means relative to the baseline season, one entry per
/// [`EnsembleStatistics`] variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChangeFromBaseline {
    pub precipitation: Change,
    pub temperature: Change,
    pub dry_spell_count: Change,
    pub dry_spell_max_length: Change,
    pub dry_spell_mean_length: Change,
}

/// A model whose projection could not be assessed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedModel {
    pub model: String,
    pub error: String,
}

/// Aggregate of one scenario across models.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleResult {
    pub scenario: String,
    pub n_models: usize,
    pub ensemble_statistics: EnsembleStatistics,
    pub consensus: EnsembleConsensus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_from_baseline: Option<ChangeFromBaseline>,
    pub model_projections: Vec<ProjectionResult>,
    pub failed_models: Vec<FailedModel>,
}

/// Folds successful projections of one scenario into an [`EnsembleResult`].
///
/// `results` must be in canonical model order; consensus ties depend on it.
/// A model without a statistic is left out of that variable's spread and
/// votes [`StressLevel::Unknown`] in its consensus.
///
/// # Errors
///
/// Returns [`AssessError::NoValidProjections`] if `results` is empty.
pub fn aggregate_ensemble(
    scenario: &str,
    results: Vec<ProjectionResult>,
) -> Result<EnsembleResult, AssessError> {
    if results.is_empty() {
        return Err(AssessError::NoValidProjections {
            scenario: scenario.to_string(),
        });
    }

    let stats: Vec<&SeasonStatistics> = results.iter().map(|r| &r.season_statistics).collect();
    let collect = |f: fn(&SeasonStatistics) -> Option<f64>| -> Vec<f64> {
        stats.iter().filter_map(|s| f(s)).collect()
    };

    let ensemble_statistics = EnsembleStatistics {
        precipitation: Spread::of(&collect(|s| s.total_precipitation())),
        temperature: Spread::of(&collect(|s| s.mean_temperature())),
        dry_spell_count: Spread::of(&collect(|s| s.dry_spells.map(|d| d.count as f64))),
        dry_spell_max_length: Spread::of(&collect(|s| {
            s.dry_spells.map(|d| d.max_length_days as f64)
        })),
        dry_spell_mean_length: Spread::of(&collect(|s| s.dry_spells.map(|d| d.mean_length_days))),
    };

    let precip_statuses: Vec<StressLevel> = results
        .iter()
        .map(|r| r.hazard_evaluation.precipitation_status())
        .collect();
    let temp_statuses: Vec<StressLevel> = results
        .iter()
        .map(|r| r.hazard_evaluation.temperature_status())
        .collect();
    let consensus = EnsembleConsensus {
        precipitation: Consensus::of(&precip_statuses),
        temperature: Consensus::of(&temp_statuses),
    };

    debug!(
        scenario,
        n_models = results.len(),
        precipitation_mean = ensemble_statistics.precipitation.mean,
        precipitation_consensus = %consensus.precipitation.most_common,
        "ensemble aggregated"
    );

    Ok(EnsembleResult {
        scenario: scenario.to_string(),
        n_models: results.len(),
        ensemble_statistics,
        consensus,
        change_from_baseline: None,
        model_projections: results,
        failed_models: Vec::new(),
    })
}

/// Change of the ensemble means from the baseline season.
///
/// A baseline statistic that is missing counts as 0.
pub fn change_from_baseline(
    stats: &EnsembleStatistics,
    baseline: &SeasonStatistics,
) -> ChangeFromBaseline {
    let spells = baseline.dry_spells.unwrap_or_default();
    ChangeFromBaseline {
        precipitation: Change::between(
            baseline.total_precipitation().unwrap_or(0.0),
            stats.precipitation.mean,
        ),
        temperature: Change::between(
            baseline.mean_temperature().unwrap_or(0.0),
            stats.temperature.mean,
        ),
        dry_spell_count: Change::between(spells.count as f64, stats.dry_spell_count.mean),
        dry_spell_max_length: Change::between(
            spells.max_length_days as f64,
            stats.dry_spell_max_length.mean,
        ),
        dry_spell_mean_length: Change::between(
            spells.mean_length_days,
            stats.dry_spell_mean_length.mean,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ceres_spell::DrySpellSummary;

    use StressLevel::*;

    #[test]
    fn spread_single_value_has_zero_std() {
        let s = Spread::of(&[650.0]);
        assert_eq!(
            s,
            Spread {
                mean: 650.0,
                min: 650.0,
                max: 650.0,
                std: 0.0
            }
        );
    }

    #[test]
    fn spread_sample_std() {
        let s = Spread::of(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_relative_eq!(s.mean, 5.0);
        assert_relative_eq!(s.std, (32.0_f64 / 7.0).sqrt());
        assert_relative_eq!(s.min, 2.0);
        assert_relative_eq!(s.max, 9.0);
    }

    #[test]
    fn spread_empty_is_zero() {
        assert_eq!(Spread::of(&[]), Spread::default());
    }

    #[test]
    fn consensus_majority() {
        let c = Consensus::of(&[NoStress, ModerateStressLow, NoStress, NoStress]);
        assert_eq!(c.most_common, NoStress);
        assert_relative_eq!(c.agreement_pct, 75.0);
        assert_eq!(c.status_distribution[&NoStress], 3);
        assert_eq!(c.status_distribution[&ModerateStressLow], 1);
    }

    #[test]
    fn consensus_tie_goes_to_first_seen() {
        let c = Consensus::of(&[SevereStressUp, NoStress, NoStress, SevereStressUp]);
        assert_eq!(c.most_common, SevereStressUp);
        assert_relative_eq!(c.agreement_pct, 50.0);
    }

    #[test]
    fn consensus_distribution_sums_to_models() {
        let statuses = [NoStress, Unknown, ModerateStressUp, Unknown, NoStress];
        let c = Consensus::of(&statuses);
        assert_eq!(c.status_distribution.values().sum::<usize>(), statuses.len());
        assert!((0.0..=100.0).contains(&c.agreement_pct));
    }

    #[test]
    fn consensus_empty() {
        let c = Consensus::of(&[]);
        assert_eq!(c.most_common, Unknown);
        assert_eq!(c.agreement_pct, 0.0);
        assert!(c.status_distribution.is_empty());
    }

    #[test]
    fn change_with_zero_baseline_has_zero_percent() {
        let c = Change::between(0.0, 300.0);
        assert_relative_eq!(c.absolute, 300.0);
        assert_eq!(c.percent, 0.0);
    }

    #[test]
    fn change_percent() {
        let c = Change::between(400.0, 500.0);
        assert_relative_eq!(c.absolute, 100.0);
        assert_relative_eq!(c.percent, 25.0);

        let c = Change::between(24.0, 21.0);
        assert_relative_eq!(c.percent, -12.5);
    }

    #[test]
    fn change_covers_dry_spells() {
        let stats = EnsembleStatistics {
            dry_spell_count: Spread::of(&[3.0, 5.0]),
            dry_spell_max_length: Spread::of(&[12.0, 18.0]),
            dry_spell_mean_length: Spread::of(&[9.0, 11.0]),
            ..Default::default()
        };
        let baseline = SeasonStatistics {
            dry_spells: Some(DrySpellSummary {
                count: 2,
                max_length_days: 10,
                mean_length_days: 8.0,
            }),
            ..Default::default()
        };
        let change = change_from_baseline(&stats, &baseline);
        assert_relative_eq!(change.dry_spell_count.absolute, 2.0);
        assert_relative_eq!(change.dry_spell_count.percent, 100.0);
        assert_relative_eq!(change.dry_spell_max_length.absolute, 5.0);
        assert_relative_eq!(change.dry_spell_mean_length.percent, 25.0);

        let change = change_from_baseline(&stats, &SeasonStatistics::default());
        assert_relative_eq!(change.dry_spell_count.absolute, 4.0);
        assert_eq!(change.dry_spell_count.percent, 0.0);
    }

    #[test]
    fn empty_ensemble_is_error() {
        let err = aggregate_ensemble("SSP5-8.5", Vec::new()).unwrap_err();
        assert!(
            matches!(err, AssessError::NoValidProjections { ref scenario } if scenario == "SSP5-8.5")
        );
    }

    #[test]
    fn status_distribution_serializes_by_name() {
        let c = Consensus::of(&[NoStress, SevereStressLow]);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["status_distribution"]["no_stress"], 1);
        assert_eq!(json["status_distribution"]["severe_stress_low"], 1);
        assert_eq!(json["most_common"], "no_stress");
    }
}
