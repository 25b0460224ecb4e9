//! Daily climate table container.

use chrono::NaiveDate;

use crate::error::IoError;
use crate::validate::{self, ValidationCollector};

/// Column-oriented daily climate data at a single point.
///
/// Holds the date axis plus optional precipitation and temperature columns.
/// A table is validated once at construction and immutable afterwards;
/// [`slice`](Self::slice) returns a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTable {
    /// Date of each row, strictly increasing.
    dates: Vec<NaiveDate>,
    /// Optional daily precipitation (mm).
    precipitation: Option<Vec<f64>>,
    /// Optional daily maximum temperature (°C).
    max_temperature: Option<Vec<f64>>,
    /// Optional daily minimum temperature (°C).
    min_temperature: Option<Vec<f64>>,
}

impl DailyTable {
    /// Creates a new `DailyTable` after validating inputs.
    ///
    /// A table with `max_temperature < min_temperature` on some day is
    /// accepted; evapotranspiration treats such days as zero.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] listing every violation of:
    /// - column lengths match the date column
    /// - dates are strictly increasing
    /// - all present values are finite
    /// - precipitation is non-negative
    pub fn new(
        dates: Vec<NaiveDate>,
        precipitation: Option<Vec<f64>>,
        max_temperature: Option<Vec<f64>>,
        min_temperature: Option<Vec<f64>>,
    ) -> Result<Self, IoError> {
        let mut c = ValidationCollector::new();

        c.extend(validate::validate_lengths(
            dates.len(),
            &[
                ("precipitation", precipitation.as_ref().map(Vec::len)),
                ("max_temperature", max_temperature.as_ref().map(Vec::len)),
                ("min_temperature", min_temperature.as_ref().map(Vec::len)),
            ],
        ));
        c.extend(validate::validate_dates_increasing(&dates));

        if let Some(p) = &precipitation {
            c.extend(validate::validate_finite("precipitation", p));
            c.extend(validate::validate_precip_non_negative(p));
        }
        if let Some(t) = &max_temperature {
            c.extend(validate::validate_finite("max_temperature", t));
        }
        if let Some(t) = &min_temperature {
            c.extend(validate::validate_finite("min_temperature", t));
        }

        c.finish()?;

        Ok(Self {
            dates,
            precipitation,
            max_temperature,
            min_temperature,
        })
    }

    /// Returns the date sequence.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Returns the precipitation column, if present.
    pub fn precipitation(&self) -> Option<&[f64]> {
        self.precipitation.as_deref()
    }

    /// Returns the maximum temperature column, if present.
    pub fn max_temperature(&self) -> Option<&[f64]> {
        self.max_temperature.as_deref()
    }

    /// Returns the minimum temperature column, if present.
    pub fn min_temperature(&self) -> Option<&[f64]> {
        self.min_temperature.as_deref()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns `true` if the table contains no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// First date of the table.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// Last date of the table.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Rows whose date falls in `start..=end`, as a new table.
    ///
    /// An inverted or non-overlapping window yields an empty table.
    pub fn slice(&self, start: NaiveDate, end: NaiveDate) -> DailyTable {
        let lo = self.dates.partition_point(|d| *d < start);
        let hi = self.dates.partition_point(|d| *d <= end).max(lo);
        self.slice_rows(lo, hi)
    }

    fn slice_rows(&self, lo: usize, hi: usize) -> DailyTable {
        let cut = |col: &Option<Vec<f64>>| col.as_ref().map(|v| v[lo..hi].to_vec());
        DailyTable {
            dates: self.dates[lo..hi].to_vec(),
            precipitation: cut(&self.precipitation),
            max_temperature: cut(&self.max_temperature),
            min_temperature: cut(&self.min_temperature),
        }
    }
}
