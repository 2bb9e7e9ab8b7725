//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over operation records from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `LedgerResult<OperationRecord>` for each CSV row:
//!
//! ```no_run
//! use wallet_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("operations.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Replaying operation: {:?}", record),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record parsing errors are yielded as Err variants in the iterator
//! - Every row error carries the line the row starts on
//!
//! Records are read one at a time; the file is never loaded into memory.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{LedgerError, LedgerResult, OperationRecord};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Synchronous CSV reader over any byte source
#[derive(Debug)]
pub struct SyncReader<R = File> {
    reader: csv::Reader<R>,
    record: StringRecord,
}

impl SyncReader<File> {
    /// Create a new SyncReader from a file path
    ///
    /// # Errors
    ///
    /// `LedgerError::Io` if the file could not be opened
    pub fn new(path: &Path) -> LedgerResult<Self> {
        let file = File::open(path).map_err(|e| LedgerError::Io {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        Ok(Self::from_reader(file))
    }
}

impl<R: Read> SyncReader<R> {
    /// Wrap an already open source
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (trailing optional columns may be omitted)
    /// - Use an 8KB buffer for efficient I/O
    pub fn from_reader(source: R) -> Self {
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(source);

        Self {
            reader,
            record: StringRecord::new(),
        }
    }
}

impl<R: Read> Iterator for SyncReader<R> {
    type Item = LedgerResult<OperationRecord>;

    /// Get the next operation record
    ///
    /// # Returns
    ///
    /// * `Some(Ok(OperationRecord))` - Successfully parsed record
    /// * `Some(Err(LedgerError::Parse))` - Parse or conversion error with line number
    /// * `None` - End of input reached
    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => return Some(Err(LedgerError::from(e))),
        }
        // Physical line the row starts on, so quoted line breaks are counted
        let line = self.record.position().map(|pos| pos.line());

        let headers = self.reader.headers().ok();
        let result = self
            .record
            .deserialize::<CsvRecord>(headers)
            .map_err(LedgerError::from)
            .and_then(convert_csv_record);

        Some(result.map_err(|e| match e {
            LedgerError::Parse { message, .. } => LedgerError::Parse { line, message },
            other => other,
        }))
    }
}
