//! Spreadsheet workbooks (xlsx, xlsm, xlsb, xls, ods)
//!
//! Reads one worksheet, converts every cell to text and hands the rows to
//! the same header mapping the CSV source uses. Numeric cells keep their
//! value; error cells read as empty, which makes an error in the radius
//! column a missing radius.

use super::schema::{parse_well_records, Record};
use super::{TableError, WellSource};
use crate::config::ColumnsConfig;
use crate::types::WellTable;
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};

/// Reads a [`WellTable`] from a worksheet of a spreadsheet file.
pub struct WorkbookWellSource {
    path: PathBuf,
    name: String,
    columns: ColumnsConfig,
}

impl WorkbookWellSource {
    pub fn new(path: impl AsRef<Path>, columns: ColumnsConfig) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: path.display().to_string(),
            path,
            columns,
        }
    }

    fn read_range(&self) -> Result<(String, Range<Data>), TableError> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|source| TableError::Workbook {
            path: self.path.clone(),
            source,
        })?;

        let sheets = workbook.sheet_names();
        let sheet = match self.columns.sheet_name() {
            Some(wanted) => sheets
                .iter()
                .find(|s| s.as_str() == wanted)
                .cloned()
                .ok_or_else(|| TableError::MissingSheet {
                    sheet: wanted.to_string(),
                })?,
            None => sheets.first().cloned().ok_or(TableError::EmptyInput)?,
        };

        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|source| TableError::Workbook {
                path: self.path.clone(),
                source,
            })?;
        Ok((sheet, range))
    }
}

impl WellSource for WorkbookWellSource {
    fn load(&mut self) -> Result<WellTable, TableError> {
        let (sheet, range) = self.read_range()?;
        let table = parse_well_records(range_records(&range), &self.columns)?;
        tracing::info!(
            file = %self.name,
            sheet = %sheet,
            wells = table.len(),
            missing_radius = table.missing_count(),
            reservoirs = table.reservoirs().len(),
            "Well table loaded"
        );
        Ok(table)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

/// Worksheet rows as text records. Line numbers are the 1-based sheet row
/// numbers, so error messages match what a spreadsheet shows.
fn range_records(range: &Range<Data>) -> Vec<Record> {
    let first_row = range.start().map_or(0, |(row, _)| row as usize);
    range
        .rows()
        .enumerate()
        .map(|(i, row)| Record {
            line: first_row + i + 1,
            fields: row.iter().map(cell_text).collect(),
        })
        .collect()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Empty | Data::Error(_) => String::new(),
        other => other.to_string(),
    }
}
