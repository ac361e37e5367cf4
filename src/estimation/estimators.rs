//! Radius estimation policies
//!
//! Three interchangeable policies, each producing one radius plus the
//! neighbor contributions behind it:
//!
//! - **Mean**: arithmetic mean of the `n_closest` known radii
//! - **Weighted**: inverse-distance weighted mean, `w = 1 / (d + 1)`
//! - **Packing**: largest radius that does not reach the nearest neighbor
//!   circle boundary, floored at `min_radius`

use super::{
    rank_neighbors, DistanceMetric, EdgeDistanceEntry, EdgeDistanceTable, EstimationError,
    NeighborCandidate,
};
use crate::config::defaults;
use crate::types::{EstimateOutcome, NeighborContribution, Well};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Policy selection
// ============================================================================

/// Which estimation policy fills missing radii.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Estimator {
    /// Plain mean of the nearest known radii
    #[default]
    #[serde(alias = "average")]
    Mean,
    /// Inverse-distance weighted mean of the nearest known radii
    #[serde(alias = "idw")]
    Weighted,
    /// Maximum non-overlapping radius from edge distances
    Packing,
}

impl Estimator {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Weighted => "weighted",
            Self::Packing => "packing",
        }
    }

    /// Estimate the radius of `target` against the other `wells` of its group.
    ///
    /// Convenience for one-off estimates; the packing policy builds a fresh
    /// edge-distance table on every call. [`super::fill`] builds it once
    /// per group instead.
    pub fn estimate(
        self,
        target: &Well,
        wells: &[Well],
        params: &EstimatorParams,
    ) -> RadiusEstimate {
        match self {
            Self::Mean => neighbor_mean(&rank_neighbors(target, wells, params.metric), params),
            Self::Weighted => {
                inverse_distance_weighted(&rank_neighbors(target, wells, params.metric), params)
            }
            Self::Packing => {
                let table = EdgeDistanceTable::build(wells, params.metric, params.n_closest);
                packing_constrained(table.get(target.row), params)
            }
        }
    }
}

impl std::fmt::Display for Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Estimator {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean" | "average" => Ok(Self::Mean),
            "weighted" | "idw" => Ok(Self::Weighted),
            "packing" => Ok(Self::Packing),
            _ => Err(EstimationError::UnsupportedEstimator(s.to_string())),
        }
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// Plain-value parameters shared by all policies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorParams {
    pub metric: DistanceMetric,
    /// Neighbor truncation window
    pub n_closest: usize,
    /// Gap left between packing circles (0 = circles may touch)
    pub safety_buffer: f64,
    /// Radius assigned when no neighbor data exists
    pub default_radius: f64,
    /// Floor for the packing radius
    pub min_radius: f64,
}

impl Default for EstimatorParams {
    fn default() -> Self {
        Self {
            metric: DistanceMetric::default(),
            n_closest: defaults::N_CLOSEST,
            safety_buffer: defaults::SAFETY_BUFFER,
            default_radius: defaults::DEFAULT_RADIUS,
            min_radius: defaults::MIN_RADIUS,
        }
    }
}

impl EstimatorParams {
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_n_closest(mut self, n: usize) -> Self {
        self.n_closest = n;
        self
    }

    pub fn with_safety_buffer(mut self, buffer: f64) -> Self {
        self.safety_buffer = buffer;
        self
    }

    pub fn with_default_radius(mut self, radius: f64) -> Self {
        self.default_radius = radius;
        self
    }

    pub fn with_min_radius(mut self, radius: f64) -> Self {
        self.min_radius = radius;
        self
    }

    /// Every out-of-range parameter, one message each, keyed by field name.
    pub fn range_errors(&self) -> Vec<String> {
        let mut errors: Vec<String> = Vec::new();

        if self.n_closest == 0 {
            errors.push("n_closest must be > 0".to_string());
        }
        if !self.default_radius.is_finite() || self.default_radius <= 0.0 {
            errors.push(format!(
                "default_radius = {} must be a positive finite number",
                self.default_radius
            ));
        }
        if !self.min_radius.is_finite() || self.min_radius < 0.0 {
            errors.push(format!(
                "min_radius = {} must be a finite number >= 0",
                self.min_radius
            ));
        }
        if !self.safety_buffer.is_finite() || self.safety_buffer < 0.0 {
            errors.push(format!(
                "safety_buffer = {} must be a finite number >= 0",
                self.safety_buffer
            ));
        }

        errors
    }

    pub fn validate(&self) -> Result<(), EstimationError> {
        let errors = self.range_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(EstimationError::InvalidParams(errors.join("; ")))
        }
    }
}

// ============================================================================
// Estimates
// ============================================================================

/// One estimated radius with its justification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadiusEstimate {
    pub radius: f64,
    pub outcome: EstimateOutcome,
    pub contributions: Vec<NeighborContribution>,
}

impl RadiusEstimate {
    fn fallback(params: &EstimatorParams, outcome: EstimateOutcome) -> Self {
        Self {
            radius: params.default_radius,
            outcome,
            contributions: Vec::new(),
        }
    }
}

/// Arithmetic mean of the first `n_closest` neighbor radii.
///
/// `neighbors` is expected in ranked order (see [`rank_neighbors`]).
/// Returns `default_radius` with [`EstimateOutcome::NoNeighbors`] when the
/// list is empty.
pub fn neighbor_mean(neighbors: &[NeighborCandidate], params: &EstimatorParams) -> RadiusEstimate {
    let closest = &neighbors[..neighbors.len().min(params.n_closest)];
    if closest.is_empty() {
        return RadiusEstimate::fallback(params, EstimateOutcome::NoNeighbors);
    }

    let radius = closest.iter().map(|c| c.value).sum::<f64>() / closest.len() as f64;
    let contributions = closest
        .iter()
        .map(|c| NeighborContribution {
            row: c.row,
            well: c.well.clone(),
            radius: Some(c.value),
            distance: c.distance,
            edge_distance: None,
            weight: None,
        })
        .collect();

    RadiusEstimate {
        radius,
        outcome: EstimateOutcome::Interpolated {
            neighbors: closest.len(),
        },
        contributions,
    }
}

/// Inverse-distance weighted mean of the first `n_closest` neighbor radii.
///
/// Weight is `1 / (distance + 1)`; the offset keeps a zero-distance
/// neighbor finite at the cost of flattening influence at short range.
pub fn inverse_distance_weighted(
    neighbors: &[NeighborCandidate],
    params: &EstimatorParams,
) -> RadiusEstimate {
    let closest = &neighbors[..neighbors.len().min(params.n_closest)];
    if closest.is_empty() {
        return RadiusEstimate::fallback(params, EstimateOutcome::NoNeighbors);
    }

    let weights: Vec<f64> = closest.iter().map(|c| 1.0 / (c.distance + 1.0)).collect();
    let weight_sum: f64 = weights.iter().sum();
    let weighted: f64 = closest.iter().zip(&weights).map(|(c, w)| c.value * w).sum();

    let contributions = closest
        .iter()
        .zip(&weights)
        .map(|(c, w)| NeighborContribution {
            row: c.row,
            well: c.well.clone(),
            radius: Some(c.value),
            distance: c.distance,
            edge_distance: None,
            weight: Some(*w),
        })
        .collect();

    RadiusEstimate {
        radius: weighted / weight_sum,
        outcome: EstimateOutcome::Interpolated {
            neighbors: closest.len(),
        },
        contributions,
    }
}

/// Largest radius that stays clear of the nearest neighbor circle.
///
/// `entries` are the target's edge-distance entries from an
/// [`EdgeDistanceTable`]; `None` means the target was not in the table.
/// The limiting neighbor is the one with the smallest edge distance among
/// the first `n_closest` entries; `radius = max(edge - safety_buffer,
/// min_radius)`. Raising the value to `min_radius` is reported as
/// [`EstimateOutcome::OverlapClamped`].
pub fn packing_constrained(
    entries: Option<&[EdgeDistanceEntry]>,
    params: &EstimatorParams,
) -> RadiusEstimate {
    let Some(entries) = entries else {
        return RadiusEstimate::fallback(params, EstimateOutcome::NoConstraint);
    };
    if entries.is_empty() {
        return RadiusEstimate::fallback(params, EstimateOutcome::NoNeighbors);
    }

    let window = &entries[..entries.len().min(params.n_closest)];
    let limiting = window
        .iter()
        .filter(|e| e.edge_distance.is_finite())
        .fold(None::<&EdgeDistanceEntry>, |best, e| match best {
            Some(b) if b.edge_distance <= e.edge_distance => Some(b),
            _ => Some(e),
        });
    let Some(limiting) = limiting else {
        return RadiusEstimate::fallback(params, EstimateOutcome::NoConstraint);
    };

    let candidate = limiting.edge_distance - params.safety_buffer;
    let radius = candidate.max(params.min_radius);
    let outcome = if candidate < params.min_radius {
        EstimateOutcome::OverlapClamped {
            neighbor: limiting.neighbor.clone(),
            unclamped_radius: candidate,
        }
    } else {
        EstimateOutcome::Limited {
            neighbor: limiting.neighbor.clone(),
            edge_distance: limiting.edge_distance,
        }
    };

    let contributions = window
        .iter()
        .map(|e| NeighborContribution {
            row: e.row,
            well: e.neighbor.clone(),
            radius: e.neighbor_radius,
            distance: e.center_distance,
            edge_distance: Some(e.edge_distance),
            weight: None,
        })
        .collect();

    RadiusEstimate {
        radius,
        outcome,
        contributions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GroupKey, RowId};

    fn candidate(row: usize, distance: f64, value: f64) -> NeighborCandidate {
        NeighborCandidate {
            distance,
            value,
            row: RowId(row),
            well: format!("W-{row}"),
        }
    }

    fn entry(row: usize, center: f64, radius: Option<f64>) -> EdgeDistanceEntry {
        EdgeDistanceEntry {
            row: RowId(row),
            neighbor: format!("W-{row}"),
            center_distance: center,
            neighbor_radius: radius,
            edge_distance: center - radius.unwrap_or(0.0),
        }
    }

    #[test]
    fn test_mean_of_four_nearest() {
        let neighbors = vec![
            candidate(1, 1.0, 100.0),
            candidate(2, 2.0, 200.0),
            candidate(3, 3.0, 300.0),
            candidate(4, 4.0, 400.0),
            candidate(5, 5.0, 5000.0),
        ];
        let est = neighbor_mean(&neighbors, &EstimatorParams::default());
        assert!((est.radius - 250.0).abs() < 1e-9, "got {}", est.radius);
        assert_eq!(est.outcome, EstimateOutcome::Interpolated { neighbors: 4 });
        assert_eq!(est.contributions.len(), 4);
    }

    #[test]
    fn test_mean_empty_falls_back_to_default() {
        let params = EstimatorParams::default().with_default_radius(175.0);
        let est = neighbor_mean(&[], &params);
        assert_eq!(est.radius, 175.0);
        assert_eq!(est.outcome, EstimateOutcome::NoNeighbors);
        assert!(est.contributions.is_empty());
    }

    #[test]
    fn test_weighted_mean() {
        let neighbors = vec![candidate(1, 0.0, 100.0), candidate(2, 1.0, 200.0)];
        let est = inverse_distance_weighted(&neighbors, &EstimatorParams::default());
        assert!((est.radius - 400.0 / 3.0).abs() < 1e-9, "got {}", est.radius);
        assert_eq!(est.contributions[0].weight, Some(1.0));
        assert_eq!(est.contributions[1].weight, Some(0.5));
    }

    #[test]
    fn test_weighted_empty_falls_back_to_default() {
        let est = inverse_distance_weighted(&[], &EstimatorParams::default());
        assert_eq!(est.radius, defaults::DEFAULT_RADIUS);
        assert!(est.outcome.is_fallback());
    }

    #[test]
    fn test_packing_limited_by_nearest_edge() {
        let entries = vec![entry(1, 300.0, Some(120.0)), entry(2, 260.0, None)];
        let params = EstimatorParams::default().with_safety_buffer(10.0);
        let est = packing_constrained(Some(&entries), &params);
        assert_eq!(est.radius, 170.0);
        assert_eq!(
            est.outcome,
            EstimateOutcome::Limited {
                neighbor: "W-1".to_string(),
                edge_distance: 180.0
            }
        );
        assert_eq!(est.contributions.len(), 2);
    }

    #[test]
    fn test_packing_clamps_to_min_radius_with_overlap() {
        let entries = vec![entry(1, 100.0, Some(80.0))];
        let est = packing_constrained(Some(&entries), &EstimatorParams::default());
        assert_eq!(est.radius, defaults::MIN_RADIUS);
        assert!(est.outcome.is_overlap());
        if let EstimateOutcome::OverlapClamped { unclamped_radius, .. } = est.outcome {
            assert_eq!(unclamped_radius, 20.0);
        }
    }

    #[test]
    fn test_packing_negative_edge_distance_clamps() {
        // target sits inside the neighbor's circle
        let entries = vec![entry(1, 40.0, Some(150.0))];
        let est = packing_constrained(Some(&entries), &EstimatorParams::default());
        assert_eq!(est.radius, 50.0);
        assert!(est.outcome.is_overlap());
    }

    #[test]
    fn test_packing_without_entries() {
        let params = EstimatorParams::default();
        let isolated = packing_constrained(Some(&[]), &params);
        assert_eq!(isolated.radius, 200.0);
        assert_eq!(isolated.outcome, EstimateOutcome::NoNeighbors);

        let unknown = packing_constrained(None, &params);
        assert_eq!(unknown.radius, 200.0);
        assert_eq!(unknown.outcome, EstimateOutcome::NoConstraint);
    }

    #[test]
    fn test_estimate_dispatch_on_singleton() {
        let solo = Well::new(0, "Solo", 1.0, 2.0, None, GroupKey::new("R", "1"));
        let wells = vec![solo.clone()];
        for estimator in [Estimator::Mean, Estimator::Weighted, Estimator::Packing] {
            let est = estimator.estimate(&solo, &wells, &EstimatorParams::default());
            assert_eq!(est.radius, 200.0, "{estimator}");
            assert_eq!(est.outcome, EstimateOutcome::NoNeighbors, "{estimator}");
        }
    }

    #[test]
    fn test_parse_estimator_names() {
        assert_eq!("IDW".parse::<Estimator>().unwrap(), Estimator::Weighted);
        assert_eq!("average".parse::<Estimator>().unwrap(), Estimator::Mean);
        assert!(matches!(
            "kriging".parse::<Estimator>(),
            Err(EstimationError::UnsupportedEstimator(_))
        ));
    }

    #[test]
    fn test_params_validation() {
        assert!(EstimatorParams::default().validate().is_ok());
        let bad = EstimatorParams::default()
            .with_n_closest(0)
            .with_safety_buffer(-1.0)
            .with_default_radius(f64::NAN);
        let err = bad.validate().unwrap_err().to_string();
        assert!(err.contains("n_closest"));
        assert!(err.contains("safety_buffer"));
        assert!(err.contains("default_radius"));
    }
}
