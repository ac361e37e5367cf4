//! JSON run report
//!
//! Audit trail for one fill pass: input, settings, per-group summaries and
//! every estimate diagnostic.

use crate::estimation::{Estimator, EstimatorParams, FillOutcome};
use crate::types::{EstimateDiagnostic, GroupSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillReport {
    pub generated_at: DateTime<Utc>,
    pub input: String,
    pub estimator: Estimator,
    pub params: EstimatorParams,
    pub totals: ReportTotals,
    pub groups: Vec<GroupSummary>,
    pub diagnostics: Vec<EstimateDiagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTotals {
    pub wells: usize,
    pub estimated: usize,
    pub fallbacks: usize,
    pub overlaps: usize,
}

impl FillReport {
    pub fn new(input: &str, wells: usize, outcome: &FillOutcome) -> Self {
        Self {
            generated_at: Utc::now(),
            input: input.to_string(),
            estimator: outcome.estimator,
            params: outcome.params,
            totals: ReportTotals {
                wells,
                estimated: outcome.estimated_count(),
                fallbacks: outcome.fallback_count(),
                overlaps: outcome.overlap_count(),
            },
            groups: outcome.groups.clone(),
            diagnostics: outcome.diagnostics.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), diagnostics = self.diagnostics.len(), "Fill report written");
        Ok(())
    }
}
