//! drainage-radius: missing drainage radius estimation
//!
//! Fills in missing well drainage radii from neighboring wells that share a
//! (reservoir, tank) key. Each group is an independent drainage system.
//!
//! ## Architecture
//!
//! - **Estimation**: distance metrics, neighbor ranking, edge distances and
//!   the three estimation policies (mean, weighted, packing)
//! - **Table**: CSV or workbook well tables in, filled CSV out
//! - **Render**: per-group SVG drainage maps
//! - **Report**: JSON audit trail of every estimate

pub mod config;
pub mod types;
pub mod estimation;
pub mod table;
pub mod render;
pub mod report;

// Re-export configuration
pub use config::{ConfigError, DrainageConfig};

// Re-export domain types
pub use types::{
    EstimateDiagnostic, EstimateOutcome, GroupKey, GroupSummary, Point, RowId, Well, WellGroup,
    WellTable,
};

// Re-export the estimation entry points
pub use estimation::{
    fill, partition_groups, DistanceMetric, EstimationError, Estimator, EstimatorParams,
    FillOutcome,
};

// Re-export collaborators
pub use report::FillReport;
pub use table::{open_well_source, CsvWellSource, TableError, WellSource, WorkbookWellSource};
