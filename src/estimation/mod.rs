//! Drainage Radius Estimation
//!
//! Fills missing drainage radii from spatially nearby wells of the same
//! reservoir/tank group.
//!
//! ## Pipeline
//!
//! 1. [`orchestrator::partition_groups`] splits the table by (reservoir, tank)
//! 2. [`ranker::rank_neighbors`] orders known-radius wells by distance, or
//!    [`edge_distance::EdgeDistanceTable`] orders all wells by distance to
//!    their circle boundary
//! 3. One [`Estimator`] policy turns the ranked neighbors into a radius
//! 4. [`orchestrator::fill`] returns the estimates keyed by row, with a
//!    diagnostic record per well
//!
//! Estimation is single-pass: only radii present in the input are ever
//! used as neighbor values.

pub mod metric;
pub mod ranker;
pub mod edge_distance;
pub mod estimators;
pub mod orchestrator;

pub use edge_distance::{EdgeDistanceEntry, EdgeDistanceTable};
pub use estimators::{
    inverse_distance_weighted, neighbor_mean, packing_constrained, Estimator, EstimatorParams,
    RadiusEstimate,
};
pub use metric::{distance, DistanceMetric};
pub use orchestrator::{fill, partition_groups, FillOutcome};
pub use ranker::{nearest_neighbors, rank_neighbors, NeighborCandidate};

use crate::types::RowId;
use thiserror::Error;

/// Errors raised by the estimation core.
#[derive(Debug, Error)]
pub enum EstimationError {
    #[error("Unsupported distance metric '{0}' (expected 'manhattan' or 'euclidean')")]
    UnsupportedMetric(String),

    #[error("Unsupported estimator '{0}' (expected 'mean', 'weighted' or 'packing')")]
    UnsupportedEstimator(String),

    #[error("Invalid well '{well}' at row {row}: {reason}")]
    InvalidWell {
        row: RowId,
        well: String,
        reason: String,
    },

    #[error("Invalid estimator parameters: {0}")]
    InvalidParams(String),
}
