//! Config validation: unknown-key detection with Levenshtein suggestions
//! and range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Unknown keys never fail a load.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, ", did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for DrainageConfig.
///
/// Maintained by hand to match the structs in drainage_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [estimation]
        "estimation",
        "estimation.estimator",
        "estimation.metric",
        "estimation.n_closest",
        "estimation.safety_buffer",
        "estimation.default_radius",
        "estimation.min_radius",
        // [columns]
        "columns",
        "columns.well",
        "columns.x",
        "columns.y",
        "columns.radius",
        "columns.reservoir",
        "columns.tank",
        "columns.skip_rows",
        "columns.sheet",
        // [render]
        "render",
        "render.enabled",
        "render.width_px",
        "render.padding",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for &k in known {
        let dist = levenshtein(unknown, k);
        if dist > 3 {
            continue;
        }
        // ties resolved alphabetically so suggestions are stable across runs
        let better = match best {
            None => true,
            Some((b, best_dist)) => dist < best_dist || (dist == best_dist && k < b),
        };
        if better {
            best = Some((k, dist));
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

/// Validate value ranges on a parsed DrainageConfig.
///
/// Returns (errors, warnings). Errors are values the estimators cannot work
/// with; warnings are legal but suspicious.
pub fn validate_ranges(config: &super::DrainageConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let e = &config.estimation;
    errors.extend(
        e.params()
            .range_errors()
            .into_iter()
            .map(|msg| format!("estimation.{msg}")),
    );

    let c = &config.columns;
    for (name, value) in [
        ("well", &c.well),
        ("x", &c.x),
        ("y", &c.y),
        ("radius", &c.radius),
        ("reservoir", &c.reservoir),
    ] {
        if value.trim().is_empty() {
            errors.push(format!("columns.{name} must not be empty"));
        }
    }

    let r = &config.render;
    if r.width_px == 0 {
        errors.push("render.width_px must be > 0".to_string());
    }
    if !(0.0..1.0).contains(&r.padding) {
        errors.push(format!("render.padding = {} must be in [0, 1)", r.padding));
    }

    // Legal, but the fallback is then smaller than the packing floor
    if e.min_radius.is_finite() && e.default_radius.is_finite() && e.min_radius > e.default_radius {
        warnings.push(ValidationWarning {
            field: "estimation.min_radius".to_string(),
            message: format!(
                "min_radius ({:.1}) is larger than default_radius ({:.1})",
                e.min_radius, e.default_radius
            ),
            suggestion: None,
        });
    }

    // One neighbor makes mean/weighted a nearest-neighbor copy
    if e.n_closest == 1 {
        warnings.push(ValidationWarning {
            field: "estimation.n_closest".to_string(),
            message: "n_closest = 1 copies the nearest radius without averaging".to_string(),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
