//! High-level table readers.

use std::path::Path;

use tracing::{debug, info};

use crate::csv_read;
use crate::error::IoError;
use crate::parquet_read;
use crate::table::DailyTable;

/// Read a daily table from a Parquet file.
///
/// The file must contain a `date` column (Date32 or `YYYY-MM-DD` strings)
/// and may contain Float64 `precipitation`, `max_temperature` and
/// `min_temperature` columns.
///
/// # Errors
///
/// Returns [`IoError`] on missing files, missing `date` column, unsupported
/// column types, or table validation failures.
pub fn read_parquet(path: &Path) -> Result<DailyTable, IoError> {
    let batches = parquet_read::read_batches(path)?;
    debug!(path = %path.display(), batches = batches.len(), "read parquet batches");

    let table = parquet_read::batches_to_table(&batches, path)?;
    info!(path = %path.display(), rows = table.len(), "loaded parquet table");
    Ok(table)
}

/// Read a daily table from a CSV file with a header row.
///
/// # Errors
///
/// Returns [`IoError`] on missing files, malformed rows, or table
/// validation failures.
pub fn read_csv(path: &Path) -> Result<DailyTable, IoError> {
    let table = csv_read::read_csv_table(path)?;
    info!(path = %path.display(), rows = table.len(), "loaded csv table");
    Ok(table)
}

/// Read a daily table, choosing the format from the file extension.
///
/// `.parquet`/`.pq` files go to [`read_parquet`], `.csv` files to
/// [`read_csv`].
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] for any other extension.
pub fn read_table(path: &Path) -> Result<DailyTable, IoError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("parquet" | "pq") => read_parquet(path),
        Some("csv") => read_csv(path),
        _ => Err(IoError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}
