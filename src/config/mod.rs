//! Drainage Configuration Module
//!
//! Estimation parameters, well-table column names and rendering options
//! loaded from TOML, with every value defaulting to the documented
//! constants in [`defaults`].
//!
//! ## Loading Order
//!
//! 1. `DRAINAGE_CONFIG` environment variable (path to TOML file)
//! 2. `drainage.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The estimation core never reads configuration itself; callers turn the
//! loaded config into plain [`crate::estimation::EstimatorParams`]:
//!
//! ```ignore
//! let config = DrainageConfig::load();
//! let params = config.estimation.params();
//! let outcome = estimation::fill(&table, config.estimation.estimator, &params)?;
//! ```

mod drainage_config;
pub mod defaults;
pub mod validation;

pub use drainage_config::*;
