//! Well table collaborator
//!
//! Supplies [`WellTable`]s to the estimation core and writes filled tables
//! back out. The core never opens files itself; everything file-shaped
//! lives here. Input is CSV or a spreadsheet workbook, picked by file
//! extension in [`open_well_source`].

mod csv_source;
mod schema;
mod workbook_source;
mod writer;

pub use csv_source::{parse_well_csv, CsvWellSource};
pub use workbook_source::WorkbookWellSource;
pub use writer::{save_filled_csv, write_filled_csv, RadiusSource};

use crate::config::ColumnsConfig;
use crate::types::WellTable;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Input-shape and I/O failures of the table collaborator. All are fatal
/// for the run.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Worksheet '{sheet}' not found in workbook")]
    MissingSheet { sheet: String },

    #[error("Well table is empty (no header row)")]
    EmptyInput,

    #[error("Required column '{column}' not found in header")]
    MissingColumn { column: String },

    #[error("Line {line}: required field '{column}' is empty")]
    MissingField { line: usize, column: String },

    #[error("Line {line}: column '{column}' has invalid number '{value}'")]
    InvalidNumber {
        line: usize,
        column: String,
        value: String,
    },
}

/// Where well tables come from.
///
/// Implementations handle format parsing internally and hand back a table
/// whose rows are numbered in input order.
pub trait WellSource {
    fn load(&mut self) -> Result<WellTable, TableError>;

    /// Human-readable name for logging (e.g. the file path).
    fn source_name(&self) -> &str;
}

/// Extensions read through [`WorkbookWellSource`]; anything else is CSV.
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Pick the source for `path` by its extension (case-insensitive).
pub fn open_well_source(path: &Path, columns: ColumnsConfig) -> Box<dyn WellSource> {
    let is_workbook = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| WORKBOOK_EXTENSIONS.iter().any(|w| ext.eq_ignore_ascii_case(w)));

    if is_workbook {
        Box::new(WorkbookWellSource::new(path, columns))
    } else {
        Box::new(CsvWellSource::new(path, columns))
    }
}
