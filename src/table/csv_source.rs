//! CSV export of the well spreadsheet
//!
//! Columns are located by header name (case-insensitive, see
//! [`ColumnsConfig`]); other columns are ignored. A radius cell that is
//! empty, `nan`, `null` or `-` is a missing radius. Quoted cells may hold
//! commas, doubled quotes and line breaks.

use super::schema::{parse_well_records, Record};
use super::{TableError, WellSource};
use crate::config::ColumnsConfig;
use crate::types::WellTable;
use std::path::{Path, PathBuf};

/// Reads a [`WellTable`] from a CSV file.
pub struct CsvWellSource {
    path: PathBuf,
    name: String,
    columns: ColumnsConfig,
}

impl CsvWellSource {
    pub fn new(path: impl AsRef<Path>, columns: ColumnsConfig) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: path.display().to_string(),
            path,
            columns,
        }
    }
}

impl WellSource for CsvWellSource {
    fn load(&mut self) -> Result<WellTable, TableError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| TableError::Io {
            path: self.path.clone(),
            source,
        })?;
        let table = parse_well_csv(&contents, &self.columns)?;
        tracing::info!(
            file = %self.name,
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

/// Parse CSV text into a well table. Rows are numbered from 0 in input
/// order, blank lines excluded; error line numbers are 1-based and point at
/// the line a record starts on.
pub fn parse_well_csv(contents: &str, columns: &ColumnsConfig) -> Result<WellTable, TableError> {
    parse_well_records(csv_records(contents), columns)
}

/// Split CSV text into records, respecting quoted fields.
/// A line break inside quotes belongs to the field, not the record.
fn csv_records(contents: &str) -> Vec<Record> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut start_line = 1;
    let mut chars = contents.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' if in_quotes => {
                current.push('\n');
                line += 1;
            }
            '\n' => {
                fields.push(std::mem::take(&mut current));
                records.push(Record {
                    line: start_line,
                    fields: std::mem::take(&mut fields),
                });
                line += 1;
                start_line = line;
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() || !fields.is_empty() {
        fields.push(current);
        records.push(Record {
            line: start_line,
            fields,
        });
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GroupKey, RowId};

    const SAMPLE: &str = "\
Well name,X,Y,Rad (m),Res_Name,Res_Number/Tank
P-01,1000,2000,150,Talang Akar,1
P-02,1400,2000,,Talang Akar,1
P-03,1000,2500,nan,Baturaja,2
";

    fn fields(contents: &str) -> Vec<Vec<String>> {
        csv_records(contents).into_iter().map(|r| r.fields).collect()
    }

    #[test]
    fn test_csv_records_quoted() {
        assert_eq!(fields(r#"a,"b,c",d"#), vec![vec!["a", "b,c", "d"]]);
        assert_eq!(fields(r#""say ""hi""",x"#), vec![vec![r#"say "hi""#, "x"]]);
        assert_eq!(fields("a,,"), vec![vec!["a", "", ""]]);
        assert!(csv_records("").is_empty());
    }

    #[test]
    fn test_csv_records_line_break_inside_quotes() {
        let records = csv_records("h1,h2\r\n\"P-01\nsidetrack\",7\r\nP-02,8\r\n");
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].fields, vec!["P-01\nsidetrack", "7"]);
        assert_eq!(records[1].line, 2);
        assert_eq!(records[2].line, 4);
    }

    #[test]
    fn test_parse_sample() {
        let table = parse_well_csv(SAMPLE, &ColumnsConfig::default()).unwrap();
        assert_eq!(table.len(), 3);
        let p1 = table.get(RowId(0)).unwrap();
        assert_eq!(p1.name, "P-01");
        assert_eq!(p1.radius, Some(150.0));
        assert_eq!(p1.group, GroupKey::new("Talang Akar", "1"));
        assert_eq!(table.get(RowId(1)).unwrap().radius, None);
        assert_eq!(table.get(RowId(2)).unwrap().radius, None);
    }

    #[test]
    fn test_multiline_well_name() {
        let csv = "Well name,X,Y,Rad (m),Res_Name,Res_Number/Tank\n\
                   \"P-01\nsidetrack\",0,0,100,R,1\n\
                   P-02,0,,100,R,1\n";
        let err = parse_well_csv(csv, &ColumnsConfig::default()).unwrap_err();
        // P-02 starts on line 4 because P-01's name spans two lines
        assert!(matches!(err, TableError::MissingField { line: 4, ref column } if column == "Y"));

        let ok = parse_well_csv(
            "Well name,X,Y,Rad (m),Res_Name,Res_Number/Tank\n\"P-01\nsidetrack\",0,0,100,R,1\n",
            &ColumnsConfig::default(),
        )
        .unwrap();
        assert_eq!(ok.get(RowId(0)).unwrap().name, "P-01\nsidetrack");
    }

    #[test]
    fn test_header_match_is_case_insensitive() {
        let csv = "\u{feff}WELL NAME,x,y,rad (m),res_name,res_number/tank\nA,0,0,10,R,1\n";
        let table = parse_well_csv(csv, &ColumnsConfig::default()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_column_is_error() {
        let csv = "Well name,X,Rad (m),Res_Name,Res_Number/Tank\nA,0,10,R,1\n";
        let err = parse_well_csv(csv, &ColumnsConfig::default()).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn { ref column } if column == "Y"));
    }

    #[test]
    fn test_empty_coordinate_is_error() {
        let csv = "Well name,X,Y,Rad (m),Res_Name,Res_Number/Tank\nA,0,,10,R,1\n";
        let err = parse_well_csv(csv, &ColumnsConfig::default()).unwrap_err();
        assert!(matches!(err, TableError::MissingField { line: 2, .. }));
    }

    #[test]
    fn test_bad_radius_is_error() {
        let csv = "Well name,X,Y,Rad (m),Res_Name,Res_Number/Tank\nA,0,0,wide,R,1\n";
        let err = parse_well_csv(csv, &ColumnsConfig::default()).unwrap_err();
        assert!(matches!(err, TableError::InvalidNumber { ref value, .. } if value == "wide"));
    }

    #[test]
    fn test_reservoir_only_schema() {
        let columns = ColumnsConfig {
            reservoir: "Surface".to_string(),
            tank: String::new(),
            ..ColumnsConfig::default()
        };
        let csv = "Surface,Well name,X,Y,Rad (m)\nSJD-02,W-1,5,5,-\n";
        let table = parse_well_csv(csv, &columns).unwrap();
        let w = table.get(RowId(0)).unwrap();
        assert_eq!(w.group, GroupKey::reservoir_only("SJD-02"));
        assert!(w.is_missing_radius());
    }

    #[test]
    fn test_title_row_above_header() {
        let csv = "\
Drainage Radius SJD_02,,,,
Surface,Well name,X,Y,Rad (m)
SJD-02,W-1,5,5,120
SJD-02,W-2,50,5,
";
        let mut columns = ColumnsConfig {
            reservoir: "Surface".to_string(),
            tank: String::new(),
            ..ColumnsConfig::default()
        };
        assert!(matches!(
            parse_well_csv(csv, &columns),
            Err(TableError::MissingColumn { .. })
        ));

        columns.skip_rows = 1;
        let table = parse_well_csv(csv, &columns).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(RowId(0)).unwrap().radius, Some(120.0));
        assert!(table.get(RowId(1)).unwrap().is_missing_radius());
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            parse_well_csv("\n\n", &ColumnsConfig::default()),
            Err(TableError::EmptyInput)
        ));
    }
}
