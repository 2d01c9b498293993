//! Ecomdash - single-page e-commerce sales report
//!
//! A CLI tool that loads a pre-aggregated order dataset, computes five
//! summary views and renders them as an HTML, Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing dataset, missing column, bad config, etc.)
//!   2 - --strict was set and at least one view had insufficient data

mod analysis;
mod cli;
mod config;
mod dataset;
mod error;
mod models;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::Config;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so its verbosity applies
    let (mut config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };
    init_logging(level);

    info!("Ecomdash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match config_source {
        ConfigSource::File(ref path) => info!("Loaded config from {}", path.display()),
        ConfigSource::Defaults => debug!("No config file found, using defaults"),
        ConfigSource::DefaultsAfterError(ref e) => warn!("Failed to load config: {}", e),
    }

    match run_report(&args, &config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Report failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .ecomdash.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  .ecomdash.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .ecomdash.toml")?;

    println!("✅ Created .ecomdash.toml with default settings.");
    println!("   Edit it to set the dataset path, sidebar details and colours.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run one render: load, aggregate, build and write. Returns exit code (0 or 2).
fn run_report(args: &Args, config: &Config) -> Result<i32> {
    let start_time = Instant::now();

    // Step 1: Load the dataset. Load and schema failures abort the render.
    let data_path = config.dataset_path();
    if !args.quiet {
        println!("📥 Loading dataset: {}", data_path.display());
    }

    let mut load_options = dataset::LoadOptions::from(&config.dataset);
    load_options.show_progress = !args.quiet;

    let dataset = dataset::load_dataset(&data_path, &load_options)
        .with_context(|| format!("Failed to load dataset {}", data_path.display()))?;

    // Step 2: Aggregate every view independently
    if !args.quiet {
        println!(
            "🔬 Computing {} views from {} records...",
            models::ViewKind::ALL.len(),
            dataset.len()
        );
    }
    let analysis = analysis::analyze(&dataset);
    let unavailable = analysis.unavailable_views();

    // Step 3: Build the report
    let duration = start_time.elapsed().as_secs_f64();
    let report = report::build_report(&dataset, &analysis, config, duration);

    // Step 4: Render and save
    let output = match args.format {
        OutputFormat::Html => report::generate_html_report(&report),
        OutputFormat::Markdown => report::generate_markdown_report(&report),
        OutputFormat::Json => report::generate_json_report(&report)?,
    };

    let output_path = config.output_path();
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;
    info!("Report written to {}", output_path.display());

    // Print summary
    if !args.quiet {
        println!("\n📊 Report Summary:");
        println!("   Records: {}", report.metadata.records);
        println!("   Views rendered: {}", report.metadata.views_rendered);
        for view in &unavailable {
            println!("   ⚠️  Insufficient data for the {} view", view);
        }
        println!("   Duration: {:.2}s", report.metadata.duration_seconds);
        println!("\n✅ Report saved to: {}", output_path.display());
    }

    if args.strict && !unavailable.is_empty() {
        eprintln!(
            "\n⛔ {} view(s) had insufficient data. Failing (exit code 2).",
            unavailable.len()
        );
        return Ok(2);
    }

    Ok(0)
}

/// Where the configuration came from.
enum ConfigSource {
    File(PathBuf),
    Defaults,
    DefaultsAfterError(String),
}

/// Load configuration from file or use defaults.
///
/// An explicit `--config` must load. A broken `.ecomdash.toml` in the
/// working directory falls back to defaults with a warning.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::File(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((
            config,
            ConfigSource::File(PathBuf::from(config::CONFIG_FILE_NAME)),
        )),
        Ok(None) => Ok((Config::default(), ConfigSource::Defaults)),
        Err(e) => Ok((
            Config::default(),
            ConfigSource::DefaultsAfterError(format!("{:#}", e)),
        )),
    }
}
