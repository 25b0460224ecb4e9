//! Parquet output for daily tables.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Date32Array, Float64Array, RecordBatch};
use arrow::datatypes::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tracing::debug;

use crate::error::IoError;
use crate::parquet_read::{DATE_COLUMN, naive_to_date32};
use crate::table::DailyTable;

/// Builds the Arrow schema for a table: `date` as Date32 followed by the
/// value columns the table carries.
pub(crate) fn build_schema(table: &DailyTable) -> Schema {
    let mut fields = vec![Field::new(DATE_COLUMN, DataType::Date32, false)];
    for (name, col) in value_columns(table) {
        if col.is_some() {
            fields.push(Field::new(name, DataType::Float64, false));
        }
    }
    Schema::new(fields)
}

fn value_columns(table: &DailyTable) -> [(&'static str, Option<&[f64]>); 3] {
    [
        ("precipitation", table.precipitation()),
        ("max_temperature", table.max_temperature()),
        ("min_temperature", table.min_temperature()),
    ]
}

/// Converts a [`DailyTable`] into a single Arrow [`RecordBatch`].
pub(crate) fn table_to_record_batch(
    table: &DailyTable,
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let date_col: ArrayRef = Arc::new(Date32Array::from(
        table
            .dates()
            .iter()
            .map(|d| naive_to_date32(*d))
            .collect::<Vec<i32>>(),
    ));

    let mut columns: Vec<ArrayRef> = vec![date_col];
    for (_, col) in value_columns(table) {
        if let Some(values) = col {
            columns.push(Arc::new(Float64Array::from(values.to_vec())));
        }
    }

    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Write a daily table to a Parquet file (Snappy-compressed).
///
/// The file can be read back with [`read_parquet`](crate::read_parquet).
///
/// # Errors
///
/// Returns [`IoError::Parquet`] if batch conversion or file I/O fails.
pub fn write_parquet(path: &Path, table: &DailyTable) -> Result<(), IoError> {
    let schema = build_schema(table);
    let batch = table_to_record_batch(table, &schema)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let file = std::fs::File::create(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;
    let mut writer = ArrowWriter::try_new(file, Arc::new(schema), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    debug!(path = %path.display(), rows = table.len(), "wrote parquet table");
    Ok(())
}
