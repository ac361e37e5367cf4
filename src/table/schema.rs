//! Header mapping and cell parsing shared by every well source
//!
//! Sources only split their input into records of text cells; turning a
//! record into a [`Well`] happens here so CSV and workbook input accept
//! exactly the same tables.

use super::TableError;
use crate::config::ColumnsConfig;
use crate::types::{GroupKey, Well, WellTable};

/// One input row as text cells, tagged with its 1-based line/row number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Record {
    pub line: usize,
    pub fields: Vec<String>,
}

impl Record {
    fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.trim().is_empty())
    }

    fn field(&self, idx: usize) -> &str {
        self.fields.get(idx).map_or("", |s| s.trim())
    }
}

/// Column indices resolved from the header row.
struct ColumnIndex {
    well: usize,
    x: usize,
    y: usize,
    radius: usize,
    reservoir: usize,
    tank: Option<usize>,
}

impl ColumnIndex {
    fn from_header(header: &Record, columns: &ColumnsConfig) -> Result<Self, TableError> {
        let find = |name: &str| -> Result<usize, TableError> {
            header
                .fields
                .iter()
                .position(|h| {
                    h.trim_start_matches('\u{feff}')
                        .trim()
                        .eq_ignore_ascii_case(name.trim())
                })
                .ok_or_else(|| TableError::MissingColumn {
                    column: name.to_string(),
                })
        };

        Ok(Self {
            well: find(&columns.well)?,
            x: find(&columns.x)?,
            y: find(&columns.y)?,
            radius: find(&columns.radius)?,
            reservoir: find(&columns.reservoir)?,
            tank: columns.tank_column().map(find).transpose()?,
        })
    }
}

/// Build a well table from raw records.
///
/// Blank records are ignored everywhere. The first `columns.skip_rows`
/// non-blank records are dropped, the next one is the header. Rows are
/// numbered from 0 in input order.
pub(super) fn parse_well_records(
    records: impl IntoIterator<Item = Record>,
    columns: &ColumnsConfig,
) -> Result<WellTable, TableError> {
    let mut records = records.into_iter().filter(|r| !r.is_blank()).skip(columns.skip_rows);

    let header = records.next().ok_or(TableError::EmptyInput)?;
    let index = ColumnIndex::from_header(&header, columns)?;

    let mut wells = Vec::new();
    for record in records {
        let name = record.field(index.well);
        if name.is_empty() {
            return Err(TableError::MissingField {
                line: record.line,
                column: columns.well.clone(),
            });
        }
        let x = parse_coordinate(record.field(index.x), record.line, &columns.x)?;
        let y = parse_coordinate(record.field(index.y), record.line, &columns.y)?;
        let radius = parse_radius(record.field(index.radius), record.line, &columns.radius)?;
        let tank = index.tank.map_or("", |idx| record.field(idx));
        let group = GroupKey::new(record.field(index.reservoir), tank);

        wells.push(Well::new(wells.len(), name, x, y, radius, group));
    }

    Ok(WellTable::new(wells))
}

fn parse_coordinate(value: &str, line: usize, column: &str) -> Result<f64, TableError> {
    if value.is_empty() {
        return Err(TableError::MissingField {
            line,
            column: column.to_string(),
        });
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(TableError::InvalidNumber {
            line,
            column: column.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_radius(value: &str, line: usize, column: &str) -> Result<Option<f64>, TableError> {
    if is_missing_marker(value) {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(TableError::InvalidNumber {
            line,
            column: column.to_string(),
            value: value.to_string(),
        }),
    }
}

fn is_missing_marker(value: &str) -> bool {
    value.is_empty()
        || value.eq_ignore_ascii_case("nan")
        || value.eq_ignore_ascii_case("null")
        || value == "-"
}
