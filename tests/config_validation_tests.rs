//! Config Validation Tests
//!
//! Typo detection and range validation for drainage.toml, exercised
//! independently from the estimation pipeline.

use drainage_radius::config::validation::{
    known_config_keys, suggest_correction, validate_ranges, validate_unknown_keys,
};
use drainage_radius::config::{ConfigError, DrainageConfig};
use drainage_radius::estimation::{DistanceMetric, Estimator};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_estimation_key_warns_with_suggestion() {
    let toml_str = r#"
[estimation]
n_closet = 6
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("n_closet"));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("estimation.n_closest"));
}

#[test]
fn typo_in_columns_section_warns() {
    let toml_str = r#"
[columns]
reservior = "Surface"
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].suggestion.as_deref(), Some("columns.reservoir"));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[estimation]
estimator = "packing"
metric = "manhattan"
n_closest = 4
safety_buffer = 10.0
default_radius = 200.0
min_radius = 50.0

[columns]
well = "Well name"
x = "X"
y = "Y"
radius = "Rad (m)"
reservoir = "Res_Name"
tank = "Res_Number/Tank"

[render]
enabled = true
width_px = 1200
padding = 0.1
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings.is_empty(), "Expected 0 warnings, got: {:?}", warnings);
}

#[test]
fn unknown_section_warns() {
    let toml_str = r#"
[plotting]
dpi = 300
"#;
    let warnings = validate_unknown_keys(toml_str);
    // section and its key are both unknown
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().any(|w| w.field == "plotting"));
}

#[test]
fn multiple_typos_all_warned() {
    let toml_str = r#"
[estimation]
metrc = "euclidean"
min_radus = 40.0

[render]
widht_px = 800
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 3);
    assert!(warnings.iter().all(|w| w.suggestion.is_some()));
}

#[test]
fn empty_toml_produces_zero_warnings() {
    assert!(validate_unknown_keys("").is_empty());
}

#[test]
fn known_keys_set_is_complete() {
    // every key of the serialized default config must be known
    let toml_str = DrainageConfig::default().to_toml().expect("Default config should serialize");
    let warnings = validate_unknown_keys(&toml_str);
    assert!(
        warnings.is_empty(),
        "Default config serialization should produce 0 unknown-key warnings, got: {:?}",
        warnings.iter().map(|w| &w.field).collect::<Vec<_>>()
    );
}

#[test]
fn suggest_correction_finds_close_match() {
    let known = known_config_keys();
    let s = suggest_correction("estimation.default_raduis", &known);
    assert_eq!(s.as_deref(), Some("estimation.default_radius"));
}

#[test]
fn suggest_correction_returns_none_for_garbage() {
    let known = known_config_keys();
    assert!(suggest_correction("zzz_completely_invalid_xyz_12345", &known).is_none());
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn zero_n_closest_is_error() {
    let mut config = DrainageConfig::default();
    config.estimation.n_closest = 0;
    let (errors, _) = validate_ranges(&config);
    assert!(errors.iter().any(|e| e.contains("n_closest")));
}

#[test]
fn negative_min_radius_is_error() {
    let mut config = DrainageConfig::default();
    config.estimation.min_radius = -1.0;
    let (errors, _) = validate_ranges(&config);
    assert!(errors.iter().any(|e| e.contains("min_radius")));
}

#[test]
fn zero_default_radius_is_error() {
    let mut config = DrainageConfig::default();
    config.estimation.default_radius = 0.0;
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
}

#[test]
fn n_closest_one_is_warning() {
    let mut config = DrainageConfig::default();
    config.estimation.n_closest = 1;
    let (errors, warnings) = validate_ranges(&config);
    assert!(errors.is_empty());
    assert!(warnings.iter().any(|w| w.field == "estimation.n_closest"));
}

#[test]
fn empty_tank_column_is_allowed() {
    let mut config = DrainageConfig::default();
    config.columns.tank = String::new();
    let (errors, _) = validate_ranges(&config);
    assert!(errors.is_empty());
    assert_eq!(config.columns.tank_column(), None);
}

#[test]
fn all_defaults_pass_validation() {
    let (errors, warnings) = validate_ranges(&DrainageConfig::default());
    assert!(errors.is_empty(), "Default config has errors: {:?}", errors);
    assert!(warnings.is_empty(), "Default config has warnings: {:?}", warnings);
}

// ============================================================================
// Parsing and Round-Trip
// ============================================================================

#[test]
fn config_roundtrip_preserves_values() {
    let mut config = DrainageConfig::default();
    config.estimation.estimator = Estimator::Packing;
    config.estimation.metric = DistanceMetric::Euclidean;
    config.estimation.safety_buffer = 12.5;
    config.columns.reservoir = "Surface".to_string();

    let toml_str = config.to_toml().expect("serialize");
    let parsed = DrainageConfig::from_toml_str(&toml_str).expect("parse back");
    assert_eq!(parsed, config);
}

#[test]
fn partial_config_fills_defaults() {
    let config = DrainageConfig::from_toml_str(
        r#"
[estimation]
estimator = "weighted"
"#,
    )
    .expect("partial config should parse");
    assert_eq!(config.estimation.estimator, Estimator::Weighted);
    assert_eq!(config.estimation.metric, DistanceMetric::Manhattan);
    assert_eq!(config.estimation.n_closest, 4);
    assert_eq!(config.columns, DrainageConfig::default().columns);
}

#[test]
fn misspelled_metric_alias_is_accepted() {
    let config = DrainageConfig::from_toml_str(
        r#"
[estimation]
metric = "euclidian"
"#,
    )
    .expect("alias should parse");
    assert_eq!(config.estimation.metric, DistanceMetric::Euclidean);
}

#[test]
fn unsupported_metric_is_rejected() {
    let err = DrainageConfig::from_toml_str(
        r#"
[estimation]
metric = "chebyshev"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Parse(..)));
}

#[test]
fn unsupported_estimator_is_rejected() {
    let err = DrainageConfig::from_toml_str(
        r#"
[estimation]
estimator = "kriging"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Parse(..)));
}

#[test]
fn invalid_range_fails_from_toml() {
    let err = DrainageConfig::from_toml_str(
        r#"
[render]
padding = 2.0
"#,
    )
    .unwrap_err();
    match err {
        ConfigError::Validation(errors) => {
            assert!(errors.iter().any(|e| e.contains("render.padding")));
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn load_from_file_reports_path_on_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drainage.toml");
    std::fs::write(&path, "[estimation\nbroken").unwrap();
    match DrainageConfig::load_from_file(&path) {
        Err(ConfigError::Parse(p, _)) => assert_eq!(p, path),
        other => panic!("expected parse error, got {:?}", other),
    }
}
