//! drainage-radius - fill missing well drainage radii
//!
//! Reads a well table, estimates every missing radius from same-group
//! neighbors and writes the filled table, an optional JSON report and
//! optional SVG drainage maps.
//!
//! # Usage
//!
//! ```bash
//! # Mean of the 4 nearest radii (config/defaults)
//! drainage-radius --input wells.csv
//!
//! # Workbook input, sheet and title row set in drainage.toml [columns]
//! drainage-radius --input SJD_02.xlsx
//!
//! # Packing estimator, euclidean distances, maps before and after
//! drainage-radius --input wells.csv --estimator packing --metric euclidean \
//!     --maps-dir maps --before-maps --report fill_report.json
//! ```
//!
//! # Environment Variables
//!
//! - `DRAINAGE_CONFIG`: Path to a TOML config (default: ./drainage.toml)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use drainage_radius::config::DrainageConfig;
use drainage_radius::estimation::{self, DistanceMetric, Estimator};
use drainage_radius::render::{self, SvgMapRenderer};
use drainage_radius::report::FillReport;
use drainage_radius::table;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "drainage-radius")]
#[command(about = "Estimate missing well drainage radii by reservoir and tank")]
#[command(version)]
struct CliArgs {
    /// Well table: CSV, or a workbook (.xlsx, .xlsm, .xlsb, .xls, .ods)
    #[arg(short, long)]
    input: PathBuf,

    /// TOML config file (overrides DRAINAGE_CONFIG and ./drainage.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Estimation policy: mean, weighted or packing
    #[arg(long)]
    estimator: Option<Estimator>,

    /// Distance metric: manhattan or euclidean
    #[arg(long)]
    metric: Option<DistanceMetric>,

    /// Filled CSV path. Defaults to <input stem>_filled.csv next to the input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a JSON report of every estimate to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Directory for per-group SVG drainage maps
    #[arg(long, value_name = "DIR")]
    maps_dir: Option<PathBuf>,

    /// Also draw the groups before filling (requires --maps-dir)
    #[arg(long, requires = "maps_dir")]
    before_maps: bool,
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "wells".to_string());
    input.with_file_name(format!("{stem}_filled.csv"))
}

fn load_config(args: &CliArgs) -> Result<DrainageConfig> {
    let mut config = match &args.config {
        Some(path) => DrainageConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DrainageConfig::load(),
    };

    if let Some(estimator) = args.estimator {
        config.estimation.estimator = estimator;
    }
    if let Some(metric) = args.metric {
        config.estimation.metric = metric;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    info!(
        input = %args.input.display(),
        estimator = %config.estimation.estimator,
        metric = %config.estimation.metric,
        n_closest = config.estimation.n_closest,
        "Starting drainage radius fill"
    );

    // Load
    let mut source = table::open_well_source(&args.input, config.columns.clone());
    let wells = source
        .load()
        .with_context(|| format!("Failed to read well table {}", source.source_name()))?;
    if wells.is_empty() {
        warn!("Well table has no rows, nothing to fill");
    }

    let maps_enabled = config.render.enabled && args.maps_dir.is_some();
    if args.maps_dir.is_some() && !config.render.enabled {
        warn!("Map rendering disabled in config, ignoring --maps-dir");
    }

    if maps_enabled && args.before_maps {
        if let Some(dir) = &args.maps_dir {
            let mut renderer = SvgMapRenderer::new(dir, &config.render).with_suffix("before");
            render::render_all(&mut renderer, &wells, None).context("Failed to render maps")?;
        }
    }

    // Fill
    let params = config.estimation.params();
    let outcome = estimation::fill(&wells, config.estimation.estimator, &params)
        .context("Estimation failed")?;

    // Write
    let output = args.output.clone().unwrap_or_else(|| default_output_path(&args.input));
    table::save_filled_csv(&output, &wells, &outcome, &config.columns)
        .context("Failed to write filled table")?;

    if let Some(path) = &args.report {
        FillReport::new(source.source_name(), wells.len(), &outcome)
            .save(path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
    }

    if maps_enabled {
        if let Some(dir) = &args.maps_dir {
            let mut renderer = SvgMapRenderer::new(dir, &config.render);
            render::render_all(&mut renderer, &wells, Some(&outcome))
                .context("Failed to render maps")?;
        }
    }

    info!(
        output = %output.display(),
        estimated = outcome.estimated_count(),
        fallbacks = outcome.fallback_count(),
        overlaps = outcome.overlap_count(),
        "Done"
    );
    Ok(())
}
