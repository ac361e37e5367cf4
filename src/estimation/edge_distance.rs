//! Distances from each well to its neighbors' circle boundaries
//!
//! The edge distance from A to B subtracts B's radius, so the table is
//! directional: A→B and B→A differ whenever the two radii differ. Entries
//! are built for every well in a group, known radius or not.

use super::DistanceMetric;
use crate::types::{RowId, Well};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Distance from a source well to one neighbor's drainage circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDistanceEntry {
    pub row: RowId,
    pub neighbor: String,
    pub center_distance: f64,
    pub neighbor_radius: Option<f64>,
    /// `center_distance - neighbor_radius`, or `center_distance` when the
    /// neighbor's radius is unknown. Negative when the source sits inside
    /// the neighbor's circle.
    pub edge_distance: f64,
}

impl EdgeDistanceEntry {
    pub fn between(source: &Well, neighbor: &Well, metric: DistanceMetric) -> Self {
        let center_distance = metric.distance(source.position, neighbor.position);
        let edge_distance = match neighbor.radius {
            Some(r) => center_distance - r,
            None => center_distance,
        };
        Self {
            row: neighbor.row,
            neighbor: neighbor.name.clone(),
            center_distance,
            neighbor_radius: neighbor.radius,
            edge_distance,
        }
    }
}

/// Per-source ranked edge distances for one group.
#[derive(Debug, Clone, Default)]
pub struct EdgeDistanceTable {
    entries: BTreeMap<RowId, Vec<EdgeDistanceEntry>>,
}

impl EdgeDistanceTable {
    /// Build the table for all `wells`, keeping the `n_closest` entries per
    /// source in ascending edge distance (ties in input order).
    pub fn build(wells: &[Well], metric: DistanceMetric, n_closest: usize) -> Self {
        let mut entries = BTreeMap::new();

        for source in wells {
            let mut ranked: Vec<EdgeDistanceEntry> = wells
                .iter()
                .filter(|w| w.row != source.row)
                .map(|w| EdgeDistanceEntry::between(source, w, metric))
                .collect();
            ranked.sort_by(|a, b| a.edge_distance.total_cmp(&b.edge_distance));
            ranked.truncate(n_closest);
            entries.insert(source.row, ranked);
        }

        Self { entries }
    }

    /// Entries for `row`, `None` when the well was not part of the build.
    pub fn get(&self, row: RowId) -> Option<&[EdgeDistanceEntry]> {
        self.entries.get(&row).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RowId, &[EdgeDistanceEntry])> {
        self.entries.iter().map(|(row, e)| (*row, e.as_slice()))
    }
}
