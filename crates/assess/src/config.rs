//! Statistics configuration.

use ceres_spell::DrySpellConfig;

use crate::error::AssessError;

/// Thresholds used when summarising a daily table.
///
/// Defaults: rainy day `> 1.0` mm, water-balance dry day `< 1.0` mm, and
/// the default [`DrySpellConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsConfig {
    rainy_day_mm: f64,
    dry_threshold: f64,
    spells: DrySpellConfig,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            rainy_day_mm: 1.0,
            dry_threshold: ceres_balance::DEFAULT_DRY_THRESHOLD,
            spells: DrySpellConfig::default(),
        }
    }
}

impl StatisticsConfig {
    /// Set the precipitation (mm) above which a day counts as rainy.
    pub fn with_rainy_day_mm(mut self, mm: f64) -> Self {
        self.rainy_day_mm = mm;
        self
    }

    /// Set the water-balance dry-day threshold (mm).
    pub fn with_dry_threshold(mut self, mm: f64) -> Self {
        self.dry_threshold = mm;
        self
    }

    /// Set the dry-spell parameters.
    pub fn with_spells(mut self, spells: DrySpellConfig) -> Self {
        self.spells = spells;
        self
    }

    /// Returns the rainy-day threshold.
    pub fn rainy_day_mm(&self) -> f64 {
        self.rainy_day_mm
    }

    /// Returns the water-balance dry-day threshold.
    pub fn dry_threshold(&self) -> f64 {
        self.dry_threshold
    }

    /// Returns the dry-spell parameters.
    pub fn spells(&self) -> &DrySpellConfig {
        &self.spells
    }

    /// Validate all thresholds.
    pub fn validate(&self) -> Result<(), AssessError> {
        for (name, value) in [
            ("rainy_day_mm", self.rainy_day_mm),
            ("dry_threshold", self.dry_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AssessError::InvalidConfig {
                    reason: format!("{name} must be finite and non-negative, got {value}"),
                });
            }
        }
        self.spells.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = StatisticsConfig::default();
        assert_eq!(config.rainy_day_mm(), 1.0);
        assert_eq!(config.dry_threshold(), 1.0);
        assert_eq!(config.spells().min_dry_days(), 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let config = StatisticsConfig::default().with_rainy_day_mm(-0.5);
        assert!(matches!(
            config.validate(),
            Err(AssessError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_spell_config_checked() {
        let config =
            StatisticsConfig::default().with_spells(DrySpellConfig::new().with_min_dry_days(0));
        assert!(config.validate().is_err());
    }
}
