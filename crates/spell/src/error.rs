//! Error types for the ceres-spell crate.

/// Error type for dry-spell configuration.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SpellError {
    /// Returned when the configuration is invalid.
    #[error("invalid dry-spell configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}
