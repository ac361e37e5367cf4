//! CSV table integration
//!
//! Load a well table from disk, fill it and write it back, then check the
//! written file parses again with every radius present.

use drainage_radius::config::ColumnsConfig;
use drainage_radius::estimation::{fill, Estimator, EstimatorParams};
use drainage_radius::table::{
    open_well_source, parse_well_csv, save_filled_csv, CsvWellSource, TableError, WellSource,
};
use drainage_radius::types::RowId;
use std::io::Write;

const FIELD_CSV: &str = "\
Well name,Field,X,Y,Rad (m),Res_Name,Res_Number/Tank
P-01,Rimau,1000,2000,150,Talang Akar,1
P-02,Rimau,1400,2000,,Talang Akar,1
P-03,Rimau,1000,2600,210,Talang Akar,1
P-04,Rimau,5000,5000,nan,Baturaja,2

P-05,Rimau,5200,5000,180,Baturaja,2
";

fn write_temp_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn load_fill_write_reload() {
    let input = write_temp_csv(FIELD_CSV);
    let columns = ColumnsConfig::default();

    let mut source = CsvWellSource::new(input.path(), columns.clone());
    let table = source.load().unwrap();
    assert_eq!(table.len(), 5);
    assert_eq!(table.missing_count(), 2);
    assert_eq!(source.source_name(), input.path().display().to_string());

    let outcome = fill(&table, Estimator::Mean, &EstimatorParams::default()).unwrap();
    assert_eq!(outcome.updates.get(&RowId(1)), Some(&180.0));
    assert_eq!(outcome.updates.get(&RowId(3)), Some(&180.0));

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("wells_filled.csv");
    save_filled_csv(&output, &table, &outcome, &columns).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.lines().next().unwrap().ends_with(",radius_source,flag"));
    let reloaded = parse_well_csv(&written, &columns).unwrap();
    assert_eq!(reloaded.len(), 5);
    assert_eq!(reloaded.missing_count(), 0);
    assert_eq!(reloaded.get(RowId(0)).unwrap().radius, Some(150.0));
    assert_eq!(reloaded.get(RowId(1)).unwrap().radius, Some(180.0));
}

#[test]
fn reservoir_only_table_groups_by_surface() {
    let csv = "\
Surface,Well name,X,Y,Rad (m)
SJD-01,W-1,0,0,120
SJD-01,W-2,100,0,
SJD-02,W-3,110,0,
";
    let columns = ColumnsConfig {
        reservoir: "Surface".to_string(),
        tank: String::new(),
        ..ColumnsConfig::default()
    };
    let input = write_temp_csv(csv);
    let table = CsvWellSource::new(input.path(), columns).load().unwrap();

    let outcome = fill(&table, Estimator::Packing, &EstimatorParams::default()).unwrap();
    assert_eq!(outcome.groups.len(), 2);
    // W-3 is alone under SJD-02 even though W-2 is 10 m away
    assert!(outcome.diagnostic(RowId(2)).unwrap().outcome.is_fallback());
    assert_eq!(outcome.updates[&RowId(2)], 200.0);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = CsvWellSource::new(dir.path().join("absent.csv"), ColumnsConfig::default());
    assert!(matches!(source.load(), Err(TableError::Io { .. })));
}

#[test]
fn bad_coordinate_reports_line_number() {
    let input = write_temp_csv(
        "Well name,X,Y,Rad (m),Res_Name,Res_Number/Tank\nA,0,0,10,R,1\nB,east,0,10,R,1\n",
    );
    let err = CsvWellSource::new(input.path(), ColumnsConfig::default()).load().unwrap_err();
    assert!(
        matches!(err, TableError::InvalidNumber { line: 3, ref value, .. } if value == "east"),
        "got {err}"
    );
}

#[test]
fn title_row_export_loads_with_skip_rows() {
    let csv = "\
Drainage Radius SJD_02,,,,
Surface,Well name,X,Y,Rad (m)
SJD-02,W-1,0,0,120
SJD-02,W-2,300,0,
SJD-02,W-3,0,300,140
";
    let input = write_temp_csv(csv);
    let mut columns = ColumnsConfig {
        reservoir: "Surface".to_string(),
        tank: String::new(),
        ..ColumnsConfig::default()
    };

    let err = open_well_source(input.path(), columns.clone()).load().unwrap_err();
    assert!(
        matches!(err, TableError::MissingColumn { ref column } if column == "Well name"),
        "got {err}"
    );

    columns.skip_rows = 1;
    let table = open_well_source(input.path(), columns).load().unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.missing_count(), 1);

    let outcome = fill(&table, Estimator::Mean, &EstimatorParams::default()).unwrap();
    assert_eq!(outcome.updates[&RowId(1)], 130.0);
}

#[test]
fn quoted_line_break_stays_in_well_name() {
    let input = write_temp_csv(
        "Well name,X,Y,Rad (m),Res_Name,Res_Number/Tank\n\
         \"P-01\nsidetrack\",0,0,100,R,1\n\
         P-02,10,0,,R,1\n",
    );
    let table = CsvWellSource::new(input.path(), ColumnsConfig::default()).load().unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(RowId(0)).unwrap().name, "P-01\nsidetrack");
    assert!(table.get(RowId(1)).unwrap().is_missing_radius());
}
