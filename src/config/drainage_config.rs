//! Drainage Configuration - estimation, column and rendering settings as TOML
//!
//! Each struct implements `Default` with the documented defaults, so a
//! missing file or a partial file behaves exactly like the built-in values.

use super::defaults;
use crate::estimation::{DistanceMetric, Estimator, EstimatorParams};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a fill run.
///
/// Load with `DrainageConfig::load()` which searches:
/// 1. `$DRAINAGE_CONFIG` env var
/// 2. `./drainage.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrainageConfig {
    /// Estimator policy and parameters
    #[serde(default)]
    pub estimation: EstimationConfig,

    /// Well table header names
    #[serde(default)]
    pub columns: ColumnsConfig,

    /// Drainage map output
    #[serde(default)]
    pub render: RenderConfig,
}

impl DrainageConfig {
    /// Load configuration using the standard search order:
    /// 1. `$DRAINAGE_CONFIG` environment variable
    /// 2. `./drainage.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("DRAINAGE_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded drainage config from DRAINAGE_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(
                            path = %p.display(),
                            error = %e,
                            "Failed to load config from DRAINAGE_CONFIG, falling back"
                        );
                    }
                }
            } else {
                warn!(path = %path, "DRAINAGE_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("drainage.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded drainage config from ./drainage.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./drainage.toml, using defaults");
                }
            }
        }

        info!("No drainage.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, err) => ConfigError::Parse(path.to_path_buf(), err),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are logged as warnings and never fail the parse.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Drainage config saved");
        Ok(())
    }

    /// Validate all values.
    ///
    /// Rules:
    /// - `n_closest` must be > 0
    /// - `default_radius` must be > 0; `min_radius` and `safety_buffer` >= 0
    /// - Every float must be finite
    /// - Column names for well, x and y must be non-empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (errors, warnings) = super::validation::validate_ranges(self);
        for w in &warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Estimation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimationConfig {
    /// "mean", "weighted" or "packing"
    #[serde(default)]
    pub estimator: Estimator,

    /// "manhattan" or "euclidean"
    #[serde(default)]
    pub metric: DistanceMetric,

    /// Number of nearest neighbors considered
    #[serde(default = "default_n_closest")]
    pub n_closest: usize,

    /// Gap between packing circles (m)
    #[serde(default = "default_safety_buffer")]
    pub safety_buffer: f64,

    /// Radius used when no neighbor data exists (m)
    #[serde(default = "default_default_radius")]
    pub default_radius: f64,

    /// Floor for packing radii (m)
    #[serde(default = "default_min_radius")]
    pub min_radius: f64,
}

fn default_n_closest() -> usize {
    defaults::N_CLOSEST
}

fn default_safety_buffer() -> f64 {
    defaults::SAFETY_BUFFER
}

fn default_default_radius() -> f64 {
    defaults::DEFAULT_RADIUS
}

fn default_min_radius() -> f64 {
    defaults::MIN_RADIUS
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            estimator: Estimator::default(),
            metric: DistanceMetric::default(),
            n_closest: default_n_closest(),
            safety_buffer: default_safety_buffer(),
            default_radius: default_default_radius(),
            min_radius: default_min_radius(),
        }
    }
}

impl EstimationConfig {
    /// Plain-value parameters for the estimation core.
    pub fn params(&self) -> EstimatorParams {
        EstimatorParams {
            metric: self.metric,
            n_closest: self.n_closest,
            safety_buffer: self.safety_buffer,
            default_radius: self.default_radius,
            min_radius: self.min_radius,
        }
    }
}

// ============================================================================
// Columns
// ============================================================================

/// Header names of the well table. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default = "default_column_well")]
    pub well: String,
    #[serde(default = "default_column_x")]
    pub x: String,
    #[serde(default = "default_column_y")]
    pub y: String,
    #[serde(default = "default_column_radius")]
    pub radius: String,
    #[serde(default = "default_column_reservoir")]
    pub reservoir: String,
    /// Empty string: no tank column, group by reservoir only
    #[serde(default = "default_column_tank")]
    pub tank: String,
    /// Non-blank rows above the header (e.g. a sheet title) to skip
    #[serde(default = "default_skip_rows")]
    pub skip_rows: usize,
    /// Worksheet for workbook input; empty string: first sheet
    #[serde(default)]
    pub sheet: String,
}

fn default_column_well() -> String {
    defaults::COLUMN_WELL.to_string()
}

fn default_column_x() -> String {
    defaults::COLUMN_X.to_string()
}

fn default_column_y() -> String {
    defaults::COLUMN_Y.to_string()
}

fn default_column_radius() -> String {
    defaults::COLUMN_RADIUS.to_string()
}

fn default_column_reservoir() -> String {
    defaults::COLUMN_RESERVOIR.to_string()
}

fn default_column_tank() -> String {
    defaults::COLUMN_TANK.to_string()
}

fn default_skip_rows() -> usize {
    defaults::SKIP_ROWS
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            well: default_column_well(),
            x: default_column_x(),
            y: default_column_y(),
            radius: default_column_radius(),
            reservoir: default_column_reservoir(),
            tank: default_column_tank(),
            skip_rows: default_skip_rows(),
            sheet: String::new(),
        }
    }
}

impl ColumnsConfig {
    /// Tank column name, `None` when grouping by reservoir only.
    pub fn tank_column(&self) -> Option<&str> {
        let t = self.tank.trim();
        (!t.is_empty()).then_some(t)
    }

    /// Worksheet name, `None` for the first sheet of the workbook.
    pub fn sheet_name(&self) -> Option<&str> {
        let s = self.sheet.trim();
        (!s.is_empty()).then_some(s)
    }
}

// ============================================================================
// Rendering
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Write drainage maps when an output directory is given
    #[serde(default = "default_render_enabled")]
    pub enabled: bool,

    /// Canvas width (px)
    #[serde(default = "default_width_px")]
    pub width_px: u32,

    /// Margin as a fraction of the data extent, in [0, 1)
    #[serde(default = "default_padding")]
    pub padding: f64,
}

fn default_render_enabled() -> bool {
    true
}

fn default_width_px() -> u32 {
    defaults::RENDER_WIDTH_PX
}

fn default_padding() -> f64 {
    defaults::RENDER_PADDING
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: default_render_enabled(),
            width_px: default_width_px(),
            padding: default_padding(),
        }
    }
}
