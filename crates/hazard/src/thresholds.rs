//! Threshold intervals, stress levels, and first-match classification.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Threshold key for season total precipitation (mm).
pub const PRECIP_VARIABLE: &str = "Total Precip";

/// Threshold key for season mean daily temperature (°C).
pub const TEMP_VARIABLE: &str = "TAVG";

/// A value range with optionally open bounds.
///
/// - lower open: matches `value < upper`
/// - upper open: matches `value > lower`
/// - both bounds: matches `lower <= value <= upper`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Interval {
    #[serde(default)]
    pub lower: Option<f64>,
    #[serde(default)]
    pub upper: Option<f64>,
}

impl Interval {
    /// Closed interval `[lower, upper]`.
    pub const fn between(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Open interval `(-inf, upper)`.
    pub const fn below(upper: f64) -> Self {
        Self {
            lower: None,
            upper: Some(upper),
        }
    }

    /// Open interval `(lower, +inf)`.
    pub const fn above(lower: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: None,
        }
    }

    /// Whether `value` falls in the interval. An interval with both bounds
    /// open matches nothing.
    pub fn contains(&self, value: f64) -> bool {
        match (self.lower, self.upper) {
            (None, Some(upper)) => value < upper,
            (Some(lower), None) => value > lower,
            (Some(lower), Some(upper)) => lower <= value && value <= upper,
            (None, None) => false,
        }
    }
}

/// Hazard classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    NoStress,
    ModerateStressLow,
    ModerateStressUp,
    SevereStressLow,
    SevereStressUp,
    /// No tier matched.
    Unknown,
}

impl StressLevel {
    /// The five tiers in evaluation order.
    pub const TIERS: [StressLevel; 5] = [
        Self::NoStress,
        Self::ModerateStressLow,
        Self::ModerateStressUp,
        Self::SevereStressLow,
        Self::SevereStressUp,
    ];

    /// Snake-case name used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoStress => "no_stress",
            Self::ModerateStressLow => "moderate_stress_low",
            Self::ModerateStressUp => "moderate_stress_up",
            Self::SevereStressLow => "severe_stress_low",
            Self::SevereStressUp => "severe_stress_up",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The five named tiers for one variable. Any tier may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableThresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_stress: Option<Interval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderate_stress_low: Option<Interval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderate_stress_up: Option<Interval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severe_stress_low: Option<Interval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severe_stress_up: Option<Interval>,
}

impl VariableThresholds {
    /// Tiers in declaration order, skipping absent ones.
    pub fn tiers(&self) -> impl Iterator<Item = (StressLevel, &Interval)> {
        [
            (StressLevel::NoStress, &self.no_stress),
            (StressLevel::ModerateStressLow, &self.moderate_stress_low),
            (StressLevel::ModerateStressUp, &self.moderate_stress_up),
            (StressLevel::SevereStressLow, &self.severe_stress_low),
            (StressLevel::SevereStressUp, &self.severe_stress_up),
        ]
        .into_iter()
        .filter_map(|(level, interval)| interval.as_ref().map(|i| (level, i)))
    }
}

/// Per-variable thresholds of one crop, keyed by variable name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CropThresholds {
    variables: BTreeMap<String, VariableThresholds>,
}

impl CropThresholds {
    /// Empty set of thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the tiers of one variable.
    pub fn with_variable(mut self, name: impl Into<String>, tiers: VariableThresholds) -> Self {
        self.variables.insert(name.into(), tiers);
        self
    }

    /// Tiers of `name`, if defined.
    pub fn variable(&self, name: &str) -> Option<&VariableThresholds> {
        self.variables.get(name)
    }

    /// All variables in name order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &VariableThresholds)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Classifies `value` against the tiers of one variable.
///
/// Tiers are tried in declaration order (no_stress, moderate_stress_low,
/// moderate_stress_up, severe_stress_low, severe_stress_up) and the first
/// match wins. Returns [`StressLevel::Unknown`] when nothing matches,
/// including for NaN.
pub fn evaluate_threshold(value: f64, thresholds: &VariableThresholds) -> StressLevel {
    thresholds
        .tiers()
        .find(|(_, interval)| interval.contains(value))
        .map_or(StressLevel::Unknown, |(level, _)| level)
}
