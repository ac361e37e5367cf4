//! Filled well table output
//!
//! Writes the mapped columns back under their configured header names plus
//! two audit columns: `radius_source` and `flag`.

use super::TableError;
use crate::config::ColumnsConfig;
use crate::estimation::FillOutcome;
use crate::types::{Well, WellTable};
use std::io::Write;
use std::path::Path;

/// Where a row's radius came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusSource {
    /// Present in the input
    Known,
    /// Computed from neighbors
    Estimated,
    /// Default radius, no neighbor data
    Fallback,
    /// Still missing (row not covered by the fill)
    Missing,
}

impl RadiusSource {
    pub fn classify(well: &Well, original: Option<&Well>, outcome: &FillOutcome) -> Self {
        if original.is_some_and(|w| w.radius.is_some()) {
            return Self::Known;
        }
        match outcome.diagnostic(well.row) {
            Some(d) if d.outcome.is_fallback() => Self::Fallback,
            Some(_) => Self::Estimated,
            None if well.radius.is_some() => Self::Known,
            None => Self::Missing,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Known => "known",
            Self::Estimated => "estimated",
            Self::Fallback => "fallback",
            Self::Missing => "missing",
        }
    }
}

/// Write `original` with `outcome` applied as CSV.
pub fn write_filled_csv<W: Write>(
    mut out: W,
    original: &WellTable,
    outcome: &FillOutcome,
    columns: &ColumnsConfig,
) -> std::io::Result<()> {
    let mut header = vec![
        columns.well.as_str(),
        columns.x.as_str(),
        columns.y.as_str(),
        columns.radius.as_str(),
        columns.reservoir.as_str(),
    ];
    if let Some(tank) = columns.tank_column() {
        header.push(tank);
    }
    header.extend(["radius_source", "flag"]);
    writeln!(out, "{}", header.iter().map(|h| csv_escape(h)).collect::<Vec<_>>().join(","))?;

    let filled = outcome.apply(original);
    for well in filled.wells() {
        let source = RadiusSource::classify(well, original.get(well.row), outcome);
        let flag = outcome
            .diagnostic(well.row)
            .and_then(|d| d.outcome.flag())
            .unwrap_or("");

        let mut fields = vec![
            csv_escape(&well.name),
            well.position.x.to_string(),
            well.position.y.to_string(),
            well.radius.map(|r| r.to_string()).unwrap_or_default(),
            csv_escape(&well.group.reservoir),
        ];
        if columns.tank_column().is_some() {
            fields.push(csv_escape(&well.group.tank));
        }
        fields.push(source.as_str().to_string());
        fields.push(flag.to_string());
        writeln!(out, "{}", fields.join(","))?;
    }

    out.flush()
}

/// Write the filled table to `path`.
pub fn save_filled_csv(
    path: &Path,
    original: &WellTable,
    outcome: &FillOutcome,
    columns: &ColumnsConfig,
) -> Result<(), TableError> {
    let io_err = |source| TableError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::create(path).map_err(io_err)?;
    write_filled_csv(std::io::BufWriter::new(file), original, outcome, columns).map_err(io_err)?;
    tracing::info!(path = %path.display(), wells = original.len(), "Filled well table written");
    Ok(())
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
