//! Configuration for dry-spell detection.

use crate::error::SpellError;

/// Dry-spell parameters.
///
/// Defaults: `precip_threshold = 1.0` mm, `min_dry_days = 7`.
#[derive(Clone, Debug, PartialEq)]
pub struct DrySpellConfig {
    precip_threshold: f64,
    min_dry_days: usize,
}

impl DrySpellConfig {
    /// Creates a new configuration with defaults.
    pub fn new() -> Self {
        Self {
            precip_threshold: 1.0,
            min_dry_days: 7,
        }
    }

    /// Sets the precipitation (mm) below which a day is dry.
    pub fn with_precip_threshold(mut self, mm: f64) -> Self {
        self.precip_threshold = mm;
        self
    }

    /// Sets the minimum run length reported as a spell.
    pub fn with_min_dry_days(mut self, days: usize) -> Self {
        self.min_dry_days = days;
        self
    }

    /// Returns the dry-day threshold.
    pub fn precip_threshold(&self) -> f64 {
        self.precip_threshold
    }

    /// Returns the minimum spell length.
    pub fn min_dry_days(&self) -> usize {
        self.min_dry_days
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), SpellError> {
        if !self.precip_threshold.is_finite() || self.precip_threshold < 0.0 {
            return Err(SpellError::InvalidConfig {
                reason: format!(
                    "precip_threshold must be finite and non-negative, got {}",
                    self.precip_threshold
                ),
            });
        }
        if self.min_dry_days < 1 {
            return Err(SpellError::InvalidConfig {
                reason: "min_dry_days must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for DrySpellConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = DrySpellConfig::default();
        assert!((cfg.precip_threshold() - 1.0).abs() < f64::EPSILON);
        assert_eq!(cfg.min_dry_days(), 7);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn invalid_values() {
        assert!(DrySpellConfig::new().with_min_dry_days(0).validate().is_err());
        assert!(
            DrySpellConfig::new()
                .with_precip_threshold(-0.1)
                .validate()
                .is_err()
        );
        assert!(
            DrySpellConfig::new()
                .with_precip_threshold(f64::INFINITY)
                .validate()
                .is_err()
        );
    }
}
