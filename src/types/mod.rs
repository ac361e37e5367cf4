//! Shared data structures for drainage radius estimation
//!
//! - `well`: wells, their positions and the (reservoir, tank) grouping keys
//! - `diagnostics`: structured per-well and per-group records produced by
//!   the estimators, kept so reports and renderers can flag fallbacks and
//!   overlaps instead of treating every value as a clean computation

mod well;
mod diagnostics;

pub use well::*;
pub use diagnostics::*;
