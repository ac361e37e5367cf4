//! Well records: position, optional drainage radius, group keys

use serde::{Deserialize, Serialize};

// ============================================================================
// Geometry
// ============================================================================

/// Planar well position in map units (the same units as the radius).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ============================================================================
// Identity
// ============================================================================

/// Position of a row in the source well table.
///
/// Write-back always goes through the row identity, never the well name,
/// so duplicate names in a table cannot clobber each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub usize);

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// (reservoir, tank) partition key.
///
/// An empty tank means the table is grouped by reservoir alone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub reservoir: String,
    #[serde(default)]
    pub tank: String,
}

impl GroupKey {
    pub fn new(reservoir: impl Into<String>, tank: impl Into<String>) -> Self {
        Self {
            reservoir: reservoir.into(),
            tank: tank.into(),
        }
    }

    /// Key for tables that carry no tank column.
    pub fn reservoir_only(reservoir: impl Into<String>) -> Self {
        Self::new(reservoir, String::new())
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.tank.is_empty() {
            write!(f, "{}", self.reservoir)
        } else {
            write!(f, "{} - Tank {}", self.reservoir, self.tank)
        }
    }
}

// ============================================================================
// Well
// ============================================================================

/// A single well row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Well {
    /// Row identity in the source table
    pub row: RowId,
    /// Well name (unique within a group)
    pub name: String,
    /// Surface position
    pub position: Point,
    /// Drainage radius, `None` when the source value is missing
    pub radius: Option<f64>,
    /// Reservoir / tank partition
    pub group: GroupKey,
}

impl Well {
    pub fn new(
        row: usize,
        name: impl Into<String>,
        x: f64,
        y: f64,
        radius: Option<f64>,
        group: GroupKey,
    ) -> Self {
        Self {
            row: RowId(row),
            name: name.into(),
            position: Point::new(x, y),
            radius,
            group,
        }
    }

    pub const fn is_missing_radius(&self) -> bool {
        self.radius.is_none()
    }
}

// ============================================================================
// Groups and tables
// ============================================================================

/// Wells sharing one (reservoir, tank) key, in table order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellGroup {
    pub key: GroupKey,
    pub wells: Vec<Well>,
}

impl WellGroup {
    pub fn new(key: GroupKey, wells: Vec<Well>) -> Self {
        Self { key, wells }
    }

    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }

    /// Number of wells whose radius is missing.
    pub fn missing_count(&self) -> usize {
        self.wells.iter().filter(|w| w.is_missing_radius()).count()
    }

    /// True when no well in the group needs an estimate.
    pub fn is_complete(&self) -> bool {
        self.wells.iter().all(|w| !w.is_missing_radius())
    }

    /// Names that appear more than once in the group.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut duplicates = Vec::new();
        for well in &self.wells {
            if !seen.insert(well.name.as_str()) && !duplicates.contains(&well.name.as_str()) {
                duplicates.push(well.name.as_str());
            }
        }
        duplicates
    }
}

/// The full well table handed over by the table collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WellTable {
    wells: Vec<Well>,
}

impl WellTable {
    pub fn new(wells: Vec<Well>) -> Self {
        Self { wells }
    }

    pub fn wells(&self) -> &[Well] {
        &self.wells
    }

    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }

    pub fn get(&self, row: RowId) -> Option<&Well> {
        self.wells.iter().find(|w| w.row == row)
    }

    pub fn missing_count(&self) -> usize {
        self.wells.iter().filter(|w| w.is_missing_radius()).count()
    }

    /// Distinct reservoir identifiers in order of first appearance.
    pub fn reservoirs(&self) -> Vec<&str> {
        distinct(self.wells.iter().map(|w| w.group.reservoir.as_str()))
    }

    /// Distinct tank identifiers in order of first appearance.
    pub fn tanks(&self) -> Vec<&str> {
        distinct(self.wells.iter().map(|w| w.group.tank.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}
