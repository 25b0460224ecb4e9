//! Configuration for season detection.

use crate::error::SeasonError;

/// How a single day is classified as wet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WetDayTest {
    /// Wet when precipitation ≥ `et0_fraction` × ET0. Needs both temperatures.
    Radiative {
        /// Fraction of ET0 that rainfall must reach.
        et0_fraction: f64,
    },
    /// Wet when precipitation ≥ `mm`.
    FixedThreshold {
        /// Rainfall threshold in mm.
        mm: f64,
    },
}

impl WetDayTest {
    /// Radiative test with the usual half-ET0 fraction.
    pub const fn radiative() -> Self {
        Self::Radiative { et0_fraction: 0.5 }
    }

    /// Fixed 1 mm threshold.
    pub const fn fixed() -> Self {
        Self::FixedThreshold { mm: 1.0 }
    }

    /// Whether the test needs an ET0 series.
    pub fn needs_et0(&self) -> bool {
        matches!(self, Self::Radiative { .. })
    }
}

impl Default for WetDayTest {
    fn default() -> Self {
        Self::radiative()
    }
}

/// Configuration for [`detect_seasons`](crate::detect_seasons).
///
/// Defaults: radiative wet-day test (0.5 × ET0), `gap_days = 30`,
/// `min_season_days = 30`.
///
/// # Example
///
/// ```
/// use ceres_season::SeasonConfig;
///
/// let config = SeasonConfig::new().with_min_season_days(45);
/// assert_eq!(config.min_season_days(), 45);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SeasonConfig {
    wet_day_test: WetDayTest,
    gap_days: usize,
    min_season_days: i64,
}

impl SeasonConfig {
    /// Creates a new configuration with defaults.
    pub fn new() -> Self {
        Self {
            wet_day_test: WetDayTest::default(),
            gap_days: 30,
            min_season_days: 30,
        }
    }

    /// Sets the wet-day test.
    pub fn with_wet_day_test(mut self, test: WetDayTest) -> Self {
        self.wet_day_test = test;
        self
    }

    /// Sets the number of consecutive dry days that ends a season.
    pub fn with_gap_days(mut self, days: usize) -> Self {
        self.gap_days = days;
        self
    }

    /// Sets the minimum length (inclusive, in days) of a reported season.
    pub fn with_min_season_days(mut self, days: i64) -> Self {
        self.min_season_days = days;
        self
    }

    // --- Accessors ---

    /// Returns the wet-day test.
    pub fn wet_day_test(&self) -> WetDayTest {
        self.wet_day_test
    }

    /// Returns the dry-run length that ends a season.
    pub fn gap_days(&self) -> usize {
        self.gap_days
    }

    /// Returns the minimum season length.
    pub fn min_season_days(&self) -> i64 {
        self.min_season_days
    }

    /// Validates this configuration.
    ///
    /// Checks that both day counts are at least 1 and that the wet-day test
    /// parameter is finite and non-negative.
    pub fn validate(&self) -> Result<(), SeasonError> {
        if self.gap_days < 1 {
            return Err(SeasonError::InvalidConfig {
                reason: "gap_days must be at least 1".to_string(),
            });
        }
        if self.min_season_days < 1 {
            return Err(SeasonError::InvalidConfig {
                reason: format!(
                    "min_season_days must be at least 1, got {}",
                    self.min_season_days
                ),
            });
        }

        let (name, value) = match self.wet_day_test {
            WetDayTest::Radiative { et0_fraction } => ("et0_fraction", et0_fraction),
            WetDayTest::FixedThreshold { mm } => ("wet threshold", mm),
        };
        if !value.is_finite() || value < 0.0 {
            return Err(SeasonError::InvalidConfig {
                reason: format!("{name} must be finite and non-negative, got {value}"),
            });
        }

        Ok(())
    }
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self::new()
    }
}
