//! Error types for the ceres-season crate.

/// Error type for all fallible operations in the ceres-season crate.
///
/// Finding no season is not an error; detection then returns an empty list.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SeasonError {
    /// Returned when a column required by the wet-day test is absent.
    #[error("missing variable '{name}' required for season detection")]
    MissingVariable {
        /// Name of the missing column.
        name: String,
    },

    /// Returned when the configuration is invalid.
    #[error("invalid season configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_missing_variable() {
        let e = SeasonError::MissingVariable {
            name: "min_temperature".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "missing variable 'min_temperature' required for season detection"
        );
    }

    #[test]
    fn error_invalid_config() {
        let e = SeasonError::InvalidConfig {
            reason: "gap_days must be at least 1".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid season configuration: gap_days must be at least 1"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<SeasonError>();
    }
}
