//! Group-wise fill of missing radii
//!
//! Groups are independent drainage systems: a well is only ever estimated
//! from other wells sharing its (reservoir, tank) key. The result is an
//! explicit `RowId -> radius` map; the caller's table is never mutated.

use super::{
    inverse_distance_weighted, nearest_neighbors, neighbor_mean, packing_constrained,
    EdgeDistanceTable, EstimationError, Estimator, EstimatorParams, RadiusEstimate,
};
use crate::types::{
    EstimateDiagnostic, GroupKey, GroupStatus, GroupSummary, RowId, Well, WellGroup, WellTable,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, trace, warn};

/// Result of one fill pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillOutcome {
    pub estimator: Estimator,
    pub params: EstimatorParams,
    /// Estimated radius per row that was missing one
    pub updates: BTreeMap<RowId, f64>,
    /// One record per estimated row, in processing order
    pub diagnostics: Vec<EstimateDiagnostic>,
    /// One summary per non-empty group, in processing order
    pub groups: Vec<GroupSummary>,
}

impl FillOutcome {
    /// Copy of `table` with every update merged in by row identity.
    pub fn apply(&self, table: &WellTable) -> WellTable {
        let wells = table
            .wells()
            .iter()
            .map(|w| {
                let mut well = w.clone();
                if let Some(radius) = self.updates.get(&w.row) {
                    well.radius = Some(*radius);
                }
                well
            })
            .collect();
        WellTable::new(wells)
    }

    pub fn diagnostic(&self, row: RowId) -> Option<&EstimateDiagnostic> {
        self.diagnostics.iter().find(|d| d.row == row)
    }

    pub fn estimated_count(&self) -> usize {
        self.updates.len()
    }

    pub fn fallback_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.outcome.is_fallback()).count()
    }

    pub fn overlap_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.outcome.is_overlap()).count()
    }
}

/// Split the table into (reservoir, tank) groups.
///
/// Keys are every combination of the distinct reservoirs and distinct tanks
/// present in the table, in first-appearance order; combinations matching
/// no row are skipped.
pub fn partition_groups(table: &WellTable) -> Vec<WellGroup> {
    let mut groups = Vec::new();

    for reservoir in table.reservoirs() {
        for tank in table.tanks() {
            let wells: Vec<Well> = table
                .wells()
                .iter()
                .filter(|w| w.group.reservoir == reservoir && w.group.tank == tank)
                .cloned()
                .collect();

            if wells.is_empty() {
                trace!(reservoir, tank, "No wells for key combination, skipping");
                continue;
            }
            groups.push(WellGroup::new(GroupKey::new(reservoir, tank), wells));
        }
    }

    groups
}

/// Fill every missing radius in `table` with `estimator`.
///
/// All wells are validated up front; the first invalid row aborts the run.
pub fn fill(
    table: &WellTable,
    estimator: Estimator,
    params: &EstimatorParams,
) -> Result<FillOutcome, EstimationError> {
    params.validate()?;
    for well in table.wells() {
        validate_well(well)?;
    }

    let mut outcome = FillOutcome {
        estimator,
        params: *params,
        updates: BTreeMap::new(),
        diagnostics: Vec::new(),
        groups: Vec::new(),
    };

    for group in partition_groups(table) {
        let missing = group.missing_count();
        let status = if missing == 0 {
            trace!(group = %group.key, wells = group.len(), "No missing radius, passing through");
            GroupStatus::Complete
        } else {
            info!(
                group = %group.key,
                wells = group.len(),
                missing,
                estimator = %estimator,
                metric = %params.metric,
                "Processing group"
            );
            for name in group.duplicate_names() {
                warn!(group = %group.key, well = name, "Duplicate well name in group");
            }
            for diagnostic in estimate_group(&group, estimator, params) {
                outcome.updates.insert(diagnostic.row, diagnostic.radius);
                outcome.diagnostics.push(diagnostic);
            }
            GroupStatus::Filled
        };

        outcome.groups.push(GroupSummary {
            key: group.key.clone(),
            wells: group.len(),
            missing,
            status,
        });
    }

    info!(
        estimated = outcome.estimated_count(),
        fallbacks = outcome.fallback_count(),
        overlaps = outcome.overlap_count(),
        groups = outcome.groups.len(),
        "Fill complete"
    );

    Ok(outcome)
}

fn estimate_group(
    group: &WellGroup,
    estimator: Estimator,
    params: &EstimatorParams,
) -> Vec<EstimateDiagnostic> {
    // built from the original radii only; estimates never feed back in
    let edge_table = (estimator == Estimator::Packing)
        .then(|| EdgeDistanceTable::build(&group.wells, params.metric, params.n_closest));

    group
        .wells
        .iter()
        .filter(|w| w.is_missing_radius())
        .map(|target| {
            let estimate = match estimator {
                Estimator::Mean => neighbor_mean(
                    &nearest_neighbors(target, &group.wells, params.metric, params.n_closest),
                    params,
                ),
                Estimator::Weighted => inverse_distance_weighted(
                    &nearest_neighbors(target, &group.wells, params.metric, params.n_closest),
                    params,
                ),
                Estimator::Packing => {
                    packing_constrained(edge_table.as_ref().and_then(|t| t.get(target.row)), params)
                }
            };
            log_estimate(target, &estimate);

            EstimateDiagnostic {
                row: target.row,
                well: target.name.clone(),
                group: group.key.clone(),
                estimator,
                radius: estimate.radius,
                outcome: estimate.outcome,
                contributions: estimate.contributions,
            }
        })
        .collect()
}

fn log_estimate(target: &Well, estimate: &RadiusEstimate) {
    use crate::types::EstimateOutcome;

    match &estimate.outcome {
        EstimateOutcome::Interpolated { neighbors } => {
            let names: Vec<&str> = estimate.contributions.iter().map(|c| c.well.as_str()).collect();
            info!(
                well = %target.name,
                radius = format!("{:.1}", estimate.radius),
                neighbors,
                from = %names.join(", "),
                "Radius interpolated"
            );
        }
        EstimateOutcome::Limited { neighbor, edge_distance } => {
            info!(
                well = %target.name,
                radius = format!("{:.1}", estimate.radius),
                limited_by = %neighbor,
                edge_distance = format!("{edge_distance:.1}"),
                "Radius limited by neighbor"
            );
        }
        EstimateOutcome::OverlapClamped { neighbor, unclamped_radius } => {
            warn!(
                well = %target.name,
                radius = format!("{:.1}", estimate.radius),
                available = format!("{unclamped_radius:.1}"),
                limited_by = %neighbor,
                "Limited space, using minimum radius (may overlap)"
            );
        }
        EstimateOutcome::NoNeighbors => {
            warn!(
                well = %target.name,
                radius = estimate.radius,
                "No neighbors, using default radius"
            );
        }
        EstimateOutcome::NoConstraint => {
            warn!(
                well = %target.name,
                radius = estimate.radius,
                "No edge constraint available, using default radius"
            );
        }
    }

    for c in &estimate.contributions {
        debug!(
            well = %target.name,
            neighbor = %c.well,
            neighbor_radius = ?c.radius,
            distance = c.distance,
            edge_distance = ?c.edge_distance,
            weight = ?c.weight,
            "Neighbor contribution"
        );
    }
}

fn validate_well(well: &Well) -> Result<(), EstimationError> {
    let invalid = |reason: String| EstimationError::InvalidWell {
        row: well.row,
        well: well.name.clone(),
        reason,
    };

    if well.name.trim().is_empty() {
        return Err(invalid("well name is empty".to_string()));
    }
    if !well.position.is_finite() {
        return Err(invalid(format!(
            "position ({}, {}) is not finite",
            well.position.x, well.position.y
        )));
    }
    if let Some(r) = well.radius {
        if !r.is_finite() || r <= 0.0 {
            return Err(invalid(format!("radius {r} must be a positive finite number")));
        }
    }
    Ok(())
}
