//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Penguin Stats - grouped statistics over the Palmer penguins dataset
///
/// Reports the average bill length per species and island, and the share
/// of each species' males and females heavier than the species average.
///
/// Examples:
///   penguin-stats penguins.csv
///   penguin-stats penguins.csv --format markdown --output summary.md
///   penguin-stats penguins.tsv --delimiter '\t' --format json
///   penguin-stats penguins.csv --dry-run
///   penguin-stats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset to analyze (CSV with a header row)
    ///
    /// Defaults to the config file's input path, or penguins.csv.
    #[arg(value_name = "FILE", env = "PENGUIN_STATS_INPUT")]
    pub input: Option<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (text, markdown, json, csv)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Field delimiter of the input file
    ///
    /// Use '\t' for tab-separated input.
    #[arg(short, long, value_name = "CHAR", value_parser = parse_delimiter)]
    pub delimiter: Option<char>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .penguin-stats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: load the dataset and show the first record without analyzing
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .penguin-stats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text, one result record per line (default)
    #[default]
    Text,
    /// Markdown tables
    Markdown,
    /// JSON document
    Json,
    /// CSV sections
    Csv,
}

fn parse_delimiter(s: &str) -> Result<char, String> {
    match s {
        "\\t" | "tab" => Ok('\t'),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c),
                _ => Err("Delimiter must be a single ASCII character".to_string()),
            }
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.dry_run && self.output.is_some() {
            return Err("--output has no effect with --dry-run".to_string());
        }

        if let Some(ref input) = self.input {
            if input.is_dir() {
                return Err(format!("Input path is a directory: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` comes from the config file; `--quiet` always wins.
    pub fn log_level_with(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_args() -> Args {
        Args {
            input: None,
            output: None,
            format: None,
            delimiter: None,
            config: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_full_command_line() {
        let args = Args::try_parse_from([
            "penguin-stats",
            "data.csv",
            "--format",
            "markdown",
            "--output",
            "out.md",
            "-d",
            ";",
        ])
        .unwrap();

        assert_eq!(args.input, Some(PathBuf::from("data.csv")));
        assert_eq!(args.format, Some(OutputFormat::Markdown));
        assert_eq!(args.output, Some(PathBuf::from("out.md")));
        assert_eq!(args.delimiter, Some(';'));
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(","), Ok(','));
        assert_eq!(parse_delimiter("\\t"), Ok('\t'));
        assert_eq!(parse_delimiter("tab"), Ok('\t'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("§").is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_dry_run_with_output() {
        let mut args = make_args();
        args.dry_run = true;
        args.output = Some(PathBuf::from("out.txt"));
        assert!(args.validate().is_err());

        args.output = None;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_input_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = make_args();
        args.input = Some(dir.path().to_path_buf());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.init_config = true;
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level_with(false), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level_with(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level_with(false), tracing::Level::ERROR);
    }

    #[test]
    fn test_config_verbose_raises_level() {
        let mut args = make_args();
        assert_eq!(args.log_level_with(true), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(args.log_level_with(true), tracing::Level::ERROR);
    }
}
