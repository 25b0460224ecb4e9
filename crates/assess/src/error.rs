//! Assessment error types.

use ceres_hazard::HazardError;
use ceres_io::IoError;
use ceres_season::SeasonError;
use ceres_spell::SpellError;

/// Errors that can occur while assessing projections and ensembles.
#[derive(Debug, thiserror::Error)]
pub enum AssessError {
    /// The table is empty or lacks a variable the assessment needs.
    #[error("insufficient data: {reason}")]
    InsufficientData { reason: String },

    /// Season detection found nothing and no explicit dates were given.
    #[error("no growing season detected; provide explicit season start and end dates")]
    NoSeasonDetected,

    /// The baseline projection could not be computed.
    #[error("baseline calculation failed: {reason}")]
    BaselineFailure { reason: String },

    /// Every model of a scenario failed.
    #[error("no valid projections for {scenario}")]
    NoValidProjections { scenario: String },

    /// A configuration value is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Hazard(#[from] HazardError),

    #[error(transparent)]
    Season(#[from] SeasonError),

    #[error(transparent)]
    Io(#[from] IoError),

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl From<SpellError> for AssessError {
    fn from(e: SpellError) -> Self {
        Self::InvalidConfig {
            reason: e.to_string(),
        }
    }
}
