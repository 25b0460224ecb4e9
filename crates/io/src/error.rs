//! Error types for ceres-io.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;

/// Error type for all fallible operations in the ceres-io crate.
///
/// Covers file access, Parquet and CSV decoding, table validation, and the
/// failure modes of a [`DataSource`](crate::DataSource) fetch.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the Parquet or Arrow libraries.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying Parquet failure.
        reason: String,
    },

    /// Wraps an error originating from the CSV reader.
    #[error("csv error: {reason}")]
    Csv {
        /// Description of the underlying CSV failure.
        reason: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when a required column is not present in a file.
    #[error("column '{name}' not found in {}", path.display())]
    MissingColumn {
        /// Name of the missing column.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a file extension is neither `.parquet` nor `.csv`.
    #[error("unsupported table format: {}", path.display())]
    UnsupportedFormat {
        /// Path with the unrecognised extension.
        path: PathBuf,
    },

    /// Returned when a date value cannot be parsed or is out of range.
    #[error("invalid date: {reason}")]
    InvalidDate {
        /// Description of the date parsing issue.
        reason: String,
    },

    /// Returned when a requested date window contains no records.
    #[error("no records between {start} and {end}")]
    EmptyRange {
        /// First date of the requested window.
        start: NaiveDate,
        /// Last date of the requested window.
        end: NaiveDate,
    },

    /// Returned when every fetch attempt exceeded the policy timeout.
    #[error("fetch timed out after {attempts} attempt(s) of {timeout:?}")]
    Timeout {
        /// Number of attempts made.
        attempts: u32,
        /// Per-attempt timeout.
        timeout: Duration,
    },

    /// A transient failure reported by a data source (network, remote service).
    #[error("data source error: {reason}")]
    Source {
        /// Description of the source failure.
        reason: String,
    },
}

impl IoError {
    /// Whether another attempt at the same fetch may succeed.
    ///
    /// Only timeouts and source-reported failures are retried; file, format
    /// and validation errors are deterministic.
    pub fn is_retryable(&self) -> bool {
        matches!(self, IoError::Timeout { .. } | IoError::Source { .. })
    }
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv {
            reason: e.to_string(),
        }
    }
}
