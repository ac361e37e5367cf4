//! Planar distance metrics

use super::EstimationError;
use crate::types::Point;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Distance function used for every neighbor computation in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// |dx| + |dy|
    #[default]
    Manhattan,
    /// sqrt(dx² + dy²)
    #[serde(alias = "euclidian")]
    Euclidean,
}

impl DistanceMetric {
    pub fn distance(self, a: Point, b: Point) -> f64 {
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        match self {
            Self::Manhattan => dx.abs() + dy.abs(),
            Self::Euclidean => (dx * dx + dy * dy).sqrt(),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manhattan => "manhattan",
            Self::Euclidean => "euclidean",
        }
    }
}

/// Free-function form of [`DistanceMetric::distance`].
pub fn distance(a: Point, b: Point, metric: DistanceMetric) -> f64 {
    metric.distance(a, b)
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manhattan" => Ok(Self::Manhattan),
            // the misspelling appears in older run scripts
            "euclidean" | "euclidian" => Ok(Self::Euclidean),
            _ => Err(EstimationError::UnsupportedMetric(s.to_string())),
        }
    }
}
