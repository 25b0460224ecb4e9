//! # ceres-io
//!
//! Daily climate tables for the ceres engine. Reads Parquet and CSV files
//! into a validated, column-oriented [`DailyTable`], writes tables back to
//! Parquet, and defines the [`DataSource`] contract through which the
//! ensemble runner obtains one table per scenario and model.

mod csv_read;
mod error;
mod parquet_read;
mod parquet_write;
mod reader;
mod source;
mod table;
mod validate;

pub use error::IoError;
pub use parquet_write::write_parquet;
pub use reader::{read_csv, read_parquet, read_table};
pub use source::{
    DataSource, DirectorySource, FetchPolicy, FetchRequest, MAX_RETRIES, fetch_with_policy,
};
pub use table::DailyTable;
