//! Structured estimation diagnostics
//!
//! Every estimated radius comes with a record of which neighbors were used
//! and how the value was reached. Fallback and overlap conditions are
//! carried as distinct outcomes so they never look like clean estimates
//! downstream.

use super::{GroupKey, RowId};
use crate::estimation::Estimator;
use serde::{Deserialize, Serialize};

/// One neighbor's contribution to an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborContribution {
    pub row: RowId,
    pub well: String,
    /// Neighbor's own radius (`None` only for packing entries against a
    /// neighbor that is itself missing one)
    pub radius: Option<f64>,
    /// Center-to-center distance
    pub distance: f64,
    /// Distance to the neighbor's circle boundary (packing only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_distance: Option<f64>,
    /// Inverse-distance weight (weighted estimator only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// How an estimated radius was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimateOutcome {
    /// Averaged from `neighbors` known radii
    Interpolated { neighbors: usize },
    /// Packing radius fits between the well and its limiting neighbor
    Limited { neighbor: String, edge_distance: f64 },
    /// Packing radius was raised to the floor; the circle may overlap `neighbor`
    OverlapClamped {
        neighbor: String,
        unclamped_radius: f64,
    },
    /// No qualifying neighbor in the group; default radius assigned
    NoNeighbors,
    /// Well absent from the edge-distance table; default radius assigned
    NoConstraint,
}

impl EstimateOutcome {
    /// True when the value is the configured default rather than a computation.
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::NoNeighbors | Self::NoConstraint)
    }

    pub const fn is_overlap(&self) -> bool {
        matches!(self, Self::OverlapClamped { .. })
    }

    /// Short flag for tabular output, `None` for clean estimates.
    pub const fn flag(&self) -> Option<&'static str> {
        match self {
            Self::OverlapClamped { .. } => Some("overlap"),
            Self::NoNeighbors => Some("no_neighbors"),
            Self::NoConstraint => Some("no_constraint"),
            Self::Interpolated { .. } | Self::Limited { .. } => None,
        }
    }
}

/// Per-well audit record produced by the fill operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateDiagnostic {
    pub row: RowId,
    pub well: String,
    pub group: GroupKey,
    pub estimator: Estimator,
    pub radius: f64,
    pub outcome: EstimateOutcome,
    pub contributions: Vec<NeighborContribution>,
}

/// What happened to a group during a fill pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    /// No missing radius; passed through unchanged
    Complete,
    /// One or more radii estimated
    Filled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub key: GroupKey,
    pub wells: usize,
    pub missing: usize,
    pub status: GroupStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_flags() {
        assert!(EstimateOutcome::NoNeighbors.is_fallback());
        assert!(EstimateOutcome::NoConstraint.is_fallback());
        let clamped = EstimateOutcome::OverlapClamped {
            neighbor: "W-2".to_string(),
            unclamped_radius: 12.0,
        };
        assert!(clamped.is_overlap());
        assert!(!clamped.is_fallback());
        assert_eq!(clamped.flag(), Some("overlap"));
        assert_eq!(EstimateOutcome::Interpolated { neighbors: 4 }.flag(), None);
    }

    #[test]
    fn test_outcome_serializes_with_kind_tag() {
        let json = serde_json::to_string(&EstimateOutcome::Limited {
            neighbor: "W-7".to_string(),
            edge_distance: 140.0,
        })
        .unwrap();
        assert!(json.contains("\"kind\":\"limited\""), "got {json}");
        assert!(json.contains("\"neighbor\":\"W-7\""));
    }
}
