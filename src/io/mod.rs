//! I/O module
//!
//! Handles CSV parsing and output for the replay CLI.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, output serialization)
//! - `sync_reader` - Streaming CSV reader with iterator interface

pub mod csv_format;
pub mod sync_reader;

pub use csv_format::{convert_csv_record, write_accounts_csv, CsvRecord};
pub use sync_reader::SyncReader;
