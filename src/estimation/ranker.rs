//! Neighbor ranking by center distance

use super::DistanceMetric;
use crate::types::{RowId, Well};
use serde::{Deserialize, Serialize};

/// A known-radius neighbor of a target well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborCandidate {
    pub distance: f64,
    /// The neighbor's known radius
    pub value: f64,
    pub row: RowId,
    pub well: String,
}

/// Rank every other well with a known radius by distance to `target`,
/// nearest first.
///
/// The target is excluded by row identity, so a different well sharing its
/// coordinates still qualifies (at distance zero). Wells with a missing
/// radius never qualify. Ties keep input order (`sort_by` is stable).
pub fn rank_neighbors(
    target: &Well,
    wells: &[Well],
    metric: DistanceMetric,
) -> Vec<NeighborCandidate> {
    let mut candidates: Vec<NeighborCandidate> = wells
        .iter()
        .filter(|w| w.row != target.row)
        .filter_map(|w| {
            w.radius.map(|value| NeighborCandidate {
                distance: metric.distance(target.position, w.position),
                value,
                row: w.row,
                well: w.name.clone(),
            })
        })
        .collect();

    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    candidates
}

/// [`rank_neighbors`] truncated to the `n_closest` nearest candidates.
pub fn nearest_neighbors(
    target: &Well,
    wells: &[Well],
    metric: DistanceMetric,
    n_closest: usize,
) -> Vec<NeighborCandidate> {
    let mut ranked = rank_neighbors(target, wells, metric);
    ranked.truncate(n_closest);
    ranked
}
