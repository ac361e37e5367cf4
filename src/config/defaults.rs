//! Documented default values.
//!
//! These only seed `Default` impls and serde defaults; every value is
//! overridable through [`super::DrainageConfig`] or `EstimatorParams`.

// ============================================================================
// Estimation
// ============================================================================

/// Neighbor truncation window.
pub const N_CLOSEST: usize = 4;

/// Gap subtracted from the packing radius (0 = circles may touch).
pub const SAFETY_BUFFER: f64 = 0.0;

/// Radius assigned when a well has no usable neighbors (map units, m).
pub const DEFAULT_RADIUS: f64 = 200.0;

/// Floor for the packing radius (m).
pub const MIN_RADIUS: f64 = 50.0;

// ============================================================================
// Well table columns
// ============================================================================

pub const COLUMN_WELL: &str = "Well name";
pub const COLUMN_X: &str = "X";
pub const COLUMN_Y: &str = "Y";
pub const COLUMN_RADIUS: &str = "Rad (m)";
pub const COLUMN_RESERVOIR: &str = "Res_Name";
pub const COLUMN_TANK: &str = "Res_Number/Tank";

/// Rows skipped above the header; sheets exported with a title line use 1.
pub const SKIP_ROWS: usize = 0;

// ============================================================================
// Rendering
// ============================================================================

/// SVG canvas width in pixels; height follows the data aspect ratio.
pub const RENDER_WIDTH_PX: u32 = 1000;

/// Margin around the circles as a fraction of the data extent.
pub const RENDER_PADDING: f64 = 0.05;
