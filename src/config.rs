use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level Ceres configuration.
///
/// Every section is optional; command-line flags override file values.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CeresConfig {
    /// Season detection settings.
    #[serde(default)]
    pub season: SeasonToml,

    /// Dry-spell settings.
    #[serde(default)]
    pub spell: SpellToml,

    /// Summary statistics settings.
    #[serde(default)]
    pub statistics: StatisticsToml,

    /// Per-projection fetch settings.
    #[serde(default)]
    pub fetch: FetchToml,

    /// Ensemble run settings.
    #[serde(default)]
    pub ensemble: EnsembleToml,
}

impl CeresConfig {
    /// Reads `path`, or returns the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeasonToml {
    #[serde(default = "default_wet_day_test")]
    pub wet_day_test: String,
    #[serde(default = "default_et0_fraction")]
    pub et0_fraction: f64,
    #[serde(default = "default_one_mm")]
    pub wet_threshold_mm: f64,
    #[serde(default = "default_gap_days")]
    pub gap_days: usize,
    #[serde(default = "default_min_season_days")]
    pub min_season_days: i64,
}

impl Default for SeasonToml {
    fn default() -> Self {
        Self {
            wet_day_test: default_wet_day_test(),
            et0_fraction: default_et0_fraction(),
            wet_threshold_mm: default_one_mm(),
            gap_days: default_gap_days(),
            min_season_days: default_min_season_days(),
        }
    }
}

fn default_wet_day_test() -> String {
    "radiative".to_string()
}
fn default_et0_fraction() -> f64 {
    0.5
}
fn default_one_mm() -> f64 {
    1.0
}
fn default_gap_days() -> usize {
    30
}
fn default_min_season_days() -> i64 {
    30
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpellToml {
    #[serde(default = "default_one_mm")]
    pub precip_threshold: f64,
    #[serde(default = "default_min_dry_days")]
    pub min_dry_days: usize,
}

impl Default for SpellToml {
    fn default() -> Self {
        Self {
            precip_threshold: default_one_mm(),
            min_dry_days: default_min_dry_days(),
        }
    }
}

fn default_min_dry_days() -> usize {
    7
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatisticsToml {
    #[serde(default = "default_one_mm")]
    pub rainy_day_mm: f64,
    #[serde(default = "default_one_mm")]
    pub dry_threshold: f64,
}

impl Default for StatisticsToml {
    fn default() -> Self {
        Self {
            rainy_day_mm: default_one_mm(),
            dry_threshold: default_one_mm(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchToml {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for FetchToml {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    120
}
fn default_retries() -> u32 {
    2
}
fn default_backoff_ms() -> u64 {
    500
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnsembleToml {
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<String>,
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    /// Assess the first detected season instead of the whole period.
    #[serde(default)]
    pub detect_seasons: bool,
}

impl Default for EnsembleToml {
    fn default() -> Self {
        Self {
            scenarios: default_scenarios(),
            models: default_models(),
            detect_seasons: false,
        }
    }
}

fn default_scenarios() -> Vec<String> {
    ceres_assess::DEFAULT_SCENARIOS
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_models() -> Vec<String> {
    ceres_assess::DEFAULT_MODELS
        .iter()
        .map(|s| s.to_string())
        .collect()
}
