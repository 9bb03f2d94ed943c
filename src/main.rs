//! Penguin Stats - grouped statistics over the Palmer penguins dataset
//!
//! A CLI tool that reads a penguin measurement CSV and reports the
//! average bill length per species and island, and the percentage of
//! each species' males and females above the species average body mass.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable input, bad config, invalid arguments)

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod source;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::Config;
use models::{AnalysisReport, ReportMetadata};
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

    // Config is loaded before logging so it can raise the log level
    let (mut config, config_note) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(args.log_level_with(config.general.verbose));

    info!("Penguin Stats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match config_note {
        ConfigNote::Loaded(origin) => info!("Loaded config from {}", origin),
        ConfigNote::Defaults => debug!("No config file found, using defaults"),
        ConfigNote::Invalid(e) => warn!("Failed to load config: {:#}", e),
    }

    if let Err(e) = run(&args, &config) {
        error!("Analysis failed: {:#}", e);
        eprintln!("\nError: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .penguin-stats.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            config::CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", config::CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging at `level`.
///
/// Logs go to stderr so stdout only carries the report.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the dataset, run both analyses and emit the report.
fn run(args: &Args, config: &Config) -> Result<()> {
    let start_time = Instant::now();

    let input = config.input.path.clone();
    info!("Reading records from {}", input.display());

    let records = source::read_records(&input, source::SourceOptions::from(&config.input))
        .with_context(|| format!("Failed to load dataset from {}", input.display()))?;
    info!("Loaded {} penguin records", records.len());

    if args.dry_run {
        return handle_dry_run(&records);
    }

    if records.is_empty() {
        warn!("Dataset has no records; reports will be empty");
    }

    let (bill_lengths, body_mass) = analysis::analyze(&records);
    let species_count = analysis::compute_species_avg_body_mass(&records).len();
    info!(
        "Computed {} bill length groups and {} body mass groups",
        bill_lengths.len(),
        body_mass.len()
    );

    let report = AnalysisReport {
        metadata: ReportMetadata {
            source: input.display().to_string(),
            analysis_date: Utc::now(),
            records_loaded: records.len(),
            species_count,
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        bill_lengths,
        body_mass,
    };

    let output = report::render_report(&report, config.report.format)?;

    match &config.report.output {
        Some(path) => {
            report::write_report(&output, path)?;
            info!("Report saved to {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Handle --dry-run: show what was loaded and exit.
fn handle_dry_run(records: &[models::Record]) -> Result<()> {
    println!("Loaded {} penguin records.", records.len());

    match records.first() {
        Some(first) => {
            println!("First record example:");
            println!("{}", first);
        }
        None => println!("The dataset has no records."),
    }

    Ok(())
}

/// How the configuration was obtained, reported once logging is up.
enum ConfigNote {
    Loaded(String),
    Defaults,
    Invalid(anyhow::Error),
}

/// Load configuration from file or use defaults.
///
/// An explicit `--config` must load; a broken default file only warns.
fn load_config(args: &Args) -> Result<(Config, ConfigNote)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigNote::Loaded(config_path.display().to_string())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((
            config,
            ConfigNote::Loaded(config::CONFIG_FILE_NAME.to_string()),
        )),
        Ok(None) => Ok((Config::default(), ConfigNote::Defaults)),
        Err(e) => Ok((Config::default(), ConfigNote::Invalid(e))),
    }
}
