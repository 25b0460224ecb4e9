//! Daily-table invariant checks.
//!
//! Each check returns a [`ValidationCollector`]; [`DailyTable::new`](crate::DailyTable::new)
//! merges them and reports every violation at once.

use chrono::NaiveDate;

use crate::error::IoError;

// ---------------------------------------------------------------------------
// ValidationCollector
// ---------------------------------------------------------------------------

/// Violation messages gathered across checks, reported as one
/// [`IoError::Validation`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    /// No violations yet.
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add one violation.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Move every message of `other` into this collector.
    pub(crate) fn extend(&mut self, other: ValidationCollector) {
        self.errors.extend(other.errors);
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// `Ok(())` when clean, otherwise one error whose `details` joins every
    /// message with `"; "`.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Check that every present column has as many values as there are dates.
pub(crate) fn validate_lengths(
    dates_len: usize,
    columns: &[(&str, Option<usize>)],
) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    for (name, len) in columns {
        if let Some(len) = len
            && *len != dates_len
        {
            c.push(format!("{name} length {len} != dates length {dates_len}"));
        }
    }

    c
}

/// Dates must be sorted without duplicates; one message per offending row.
pub(crate) fn validate_dates_increasing(dates: &[NaiveDate]) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    for (i, pair) in dates.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            c.push(format!(
                "dates not increasing at index {}: {} after {}",
                i + 1,
                pair[1],
                pair[0]
            ));
        }
    }

    c
}

/// Check that every value in a column is finite.
pub(crate) fn validate_finite(name: &str, values: &[f64]) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    for (i, &val) in values.iter().enumerate() {
        if !val.is_finite() {
            c.push(format!("non-finite {name} at index {i}: {val}"));
        }
    }

    c
}

/// Precipitation cannot be negative.
pub(crate) fn validate_precip_non_negative(precip: &[f64]) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    for (i, &val) in precip.iter().enumerate() {
        if val < 0.0 {
            c.push(format!("negative precipitation at index {i}: {val}"));
        }
    }

    c
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
