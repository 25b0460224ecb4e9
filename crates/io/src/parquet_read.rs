//! Low-level Parquet reading and column extraction.

use std::path::Path;

use arrow::array::{Array, AsArray, RecordBatch};
use arrow::datatypes::{DataType, Date32Type, Float64Type};
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::IoError;
use crate::table::DailyTable;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_FROM_CE: i32 = 719_163;

/// Value columns recognised in a daily table file.
pub(crate) const VALUE_COLUMNS: [&str; 3] =
    ["precipitation", "max_temperature", "min_temperature"];

/// Date column name.
pub(crate) const DATE_COLUMN: &str = "date";

/// Converts a Date32 value (days since the Unix epoch) to a calendar date.
pub(crate) fn date32_to_naive(days: i32) -> Result<NaiveDate, IoError> {
    days.checked_add(UNIX_EPOCH_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| IoError::InvalidDate {
            reason: format!("Date32 value {days} out of range"),
        })
}

/// Converts a calendar date to a Date32 value.
pub(crate) fn naive_to_date32(date: NaiveDate) -> i32 {
    use chrono::Datelike;
    date.num_days_from_ce() - UNIX_EPOCH_FROM_CE
}

/// Parses an ISO `YYYY-MM-DD` date string.
pub(crate) fn parse_iso_date(s: &str) -> Result<NaiveDate, IoError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| IoError::InvalidDate {
        reason: format!("'{s}': {e}"),
    })
}

/// Reads all record batches from a Parquet file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist, or
/// [`IoError::Parquet`] if the file cannot be opened or read.
pub(crate) fn read_batches(path: &Path) -> Result<Vec<RecordBatch>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;

    let batches: Vec<RecordBatch> = reader.collect::<Result<Vec<_>, _>>()?;

    Ok(batches)
}

/// Extracts the date column of one batch. Accepts Date32 or UTF-8 strings.
fn batch_dates(batch: &RecordBatch, idx: usize) -> Result<Vec<NaiveDate>, IoError> {
    let col = batch.column(idx);
    if col.null_count() > 0 {
        return Err(IoError::Validation {
            count: col.null_count(),
            details: "null values in date column".to_string(),
        });
    }

    match col.data_type() {
        DataType::Date32 => col
            .as_primitive::<Date32Type>()
            .values()
            .iter()
            .map(|&d| date32_to_naive(d))
            .collect(),
        DataType::Utf8 => col
            .as_string::<i32>()
            .iter()
            .map(|s| parse_iso_date(s.unwrap_or_default()))
            .collect(),
        DataType::LargeUtf8 => col
            .as_string::<i64>()
            .iter()
            .map(|s| parse_iso_date(s.unwrap_or_default()))
            .collect(),
        other => Err(IoError::InvalidDate {
            reason: format!("unsupported date column type {other}"),
        }),
    }
}

/// Extracts a Float64 value column of one batch.
fn batch_values(batch: &RecordBatch, idx: usize, name: &str) -> Result<Vec<f64>, IoError> {
    let col = batch.column(idx);
    if col.data_type() != &DataType::Float64 {
        return Err(IoError::Validation {
            count: 1,
            details: format!("column '{name}' must be Float64, got {}", col.data_type()),
        });
    }
    if col.null_count() > 0 {
        return Err(IoError::Validation {
            count: col.null_count(),
            details: format!("null values in column '{name}'"),
        });
    }
    Ok(col.as_primitive::<Float64Type>().values().to_vec())
}

/// Assembles a [`DailyTable`] from the batches of one file.
///
/// Columns are located by name. `date` is required; each value column is
/// optional and must be present in every batch when present in the first.
pub(crate) fn batches_to_table(batches: &[RecordBatch], path: &Path) -> Result<DailyTable, IoError> {
    let Some(first) = batches.first() else {
        return DailyTable::new(Vec::new(), None, None, None);
    };

    let schema = first.schema();
    let date_idx = schema
        .index_of(DATE_COLUMN)
        .map_err(|_| IoError::MissingColumn {
            name: DATE_COLUMN.to_string(),
            path: path.to_path_buf(),
        })?;
    let value_idx: Vec<Option<usize>> = VALUE_COLUMNS
        .iter()
        .map(|name| schema.index_of(name).ok())
        .collect();

    let mut dates = Vec::new();
    let mut values: Vec<Option<Vec<f64>>> = value_idx
        .iter()
        .map(|idx| idx.map(|_| Vec::new()))
        .collect();

    for batch in batches {
        dates.extend(batch_dates(batch, date_idx)?);
        for ((&name, idx), out) in VALUE_COLUMNS.iter().zip(&value_idx).zip(values.iter_mut()) {
            if let (Some(idx), Some(out)) = (idx, out) {
                out.extend(batch_values(batch, *idx, name)?);
            }
        }
    }

    let [precipitation, max_temperature, min_temperature]: [Option<Vec<f64>>; 3] = values
        .try_into()
        .map_err(|_| IoError::Parquet {
            reason: "unexpected value column count".to_string(),
        })?;

    DailyTable::new(dates, precipitation, max_temperature, min_temperature)
}
