//! CSV reading for daily tables.

use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};

use crate::error::IoError;
use crate::parquet_read::{DATE_COLUMN, VALUE_COLUMNS, parse_iso_date};
use crate::table::DailyTable;

/// Parses a numeric cell, reporting its row and column on failure.
fn parse_value(raw: &str, row: usize, name: &str) -> Result<f64, IoError> {
    raw.trim().parse::<f64>().map_err(|e| IoError::Csv {
        reason: format!("row {row}, column '{name}': cannot parse '{raw}': {e}"),
    })
}

/// Reads a comma-separated daily table with a header row.
///
/// The header must contain `date`; `precipitation`, `max_temperature` and
/// `min_temperature` are optional. Other columns are ignored.
pub(crate) fn read_csv_table(path: &Path) -> Result<DailyTable, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = rdr.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h == name);

    let date_idx = position(DATE_COLUMN).ok_or_else(|| IoError::MissingColumn {
        name: DATE_COLUMN.to_string(),
        path: path.to_path_buf(),
    })?;
    let value_idx: Vec<Option<usize>> = VALUE_COLUMNS.iter().map(|&n| position(n)).collect();

    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut values: Vec<Option<Vec<f64>>> = value_idx
        .iter()
        .map(|idx| idx.map(|_| Vec::new()))
        .collect();

    for (row, record) in rdr.records().enumerate() {
        let record: StringRecord = record?;
        let cell = |idx: usize, name: &str| {
            record.get(idx).ok_or_else(|| IoError::Csv {
                reason: format!("row {row}: missing '{name}' field"),
            })
        };

        dates.push(parse_iso_date(cell(date_idx, DATE_COLUMN)?)?);
        for ((&name, idx), out) in VALUE_COLUMNS.iter().zip(&value_idx).zip(values.iter_mut()) {
            if let (Some(idx), Some(out)) = (idx, out) {
                out.push(parse_value(cell(*idx, name)?, row, name)?);
            }
        }
    }

    let mut values = values.into_iter();
    let precipitation = values.next().flatten();
    let max_temperature = values.next().flatten();
    let min_temperature = values.next().flatten();

    DailyTable::new(dates, precipitation, max_temperature, min_temperature)
}
