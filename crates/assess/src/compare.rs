//! Metric-by-metric comparison of two statistics summaries.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::statistics::SeasonStatistics;

/// One metric in both periods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricComparison {
    pub current: f64,
    pub baseline: f64,
    pub difference: f64,
    /// `difference / baseline * 100`, or 0 when the baseline is 0.
    pub percent_change: f64,
}

impl MetricComparison {
    fn new(current: f64, baseline: f64) -> Self {
        let difference = current - baseline;
        let percent_change = if baseline == 0.0 {
            0.0
        } else {
            difference / baseline * 100.0
        };
        Self {
            current,
            baseline,
            difference,
            percent_change,
        }
    }
}

/// category → metric → comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub variables: BTreeMap<String, BTreeMap<String, MetricComparison>>,
}

/// Compares `current` against `baseline`.
///
/// Only categories present in both summaries are compared.
pub fn compare_statistics(
    current: &SeasonStatistics,
    baseline: &SeasonStatistics,
) -> PeriodComparison {
    let baseline_metrics = baseline.metrics();
    let mut variables = BTreeMap::new();

    for (category, metrics) in current.metrics() {
        let Some((_, base)) = baseline_metrics.iter().find(|(c, _)| *c == category) else {
            continue;
        };
        let compared: BTreeMap<String, MetricComparison> = metrics
            .iter()
            .zip(base)
            .map(|(&(name, cur), &(_, b))| (name.to_string(), MetricComparison::new(cur, b)))
            .collect();
        variables.insert(category.to_string(), compared);
    }

    PeriodComparison { variables }
}
