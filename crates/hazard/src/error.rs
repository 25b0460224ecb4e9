//! Error types for the ceres-hazard crate.

/// Error type for all fallible operations in the ceres-hazard crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HazardError {
    /// Returned when a crop name is not in the threshold table.
    #[error("unknown crop '{crop}'; available: {}", available.join(", "))]
    UnknownCrop {
        /// The name as requested.
        crop: String,
        /// Crop names present in the table, sorted.
        available: Vec<String>,
    },

    /// Returned when a threshold table fails validation.
    #[error("invalid threshold table: {reason}")]
    InvalidTable {
        /// Description of the problem.
        reason: String,
    },
}
