//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::ChartKind;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Wastedash - waste-characterization survey dashboard
///
/// Loads the survey table from the hosted database, aggregates the
/// weights into the 15 waste categories and renders a chart report.
///
/// Examples:
///   wastedash
///   wastedash --location "Zona Sur" --chart pie --format html
///   wastedash --demo --chart-svg chart.svg
///   wastedash --list-locations
///   wastedash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Location to report on ("all" for every location)
    #[arg(short, long, value_name = "NAME")]
    pub location: Option<String>,

    /// Chart style (bar, pie, line)
    #[arg(long, value_name = "KIND")]
    pub chart: Option<ChartKind>,

    /// Output format (markdown, html, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Output file path for the report
    ///
    /// Defaults to waste_report.<ext> for the selected format
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also write the chart as a standalone SVG file
    #[arg(long, value_name = "FILE")]
    pub chart_svg: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .wastedash.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project URL of the hosted database
    #[arg(long, value_name = "URL", env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// Public (anon) API key of the hosted database
    #[arg(long, value_name = "KEY", env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    pub supabase_key: Option<String>,

    /// Table to query
    #[arg(long, value_name = "TABLE")]
    pub table: Option<String>,

    /// Maximum number of rows to fetch
    #[arg(long, value_name = "COUNT")]
    pub limit: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Use the built-in demo dataset instead of querying the database
    #[arg(long)]
    pub demo: bool,

    /// Fail instead of substituting fallback data when the query fails
    #[arg(long)]
    pub no_fallback: bool,

    /// Print the available locations and exit
    #[arg(long)]
    pub list_locations: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .wastedash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// Standalone HTML page with the chart inline
    Html,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// File extension for reports in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Location selection, with "all" and blank input meaning no filter.
    ///
    /// Any other value is matched against `lugar` exactly.
    pub fn location_filter(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| {
            !l.trim().is_empty() && !l.eq_ignore_ascii_case(crate::analysis::ALL_LOCATIONS)
        })
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.supabase_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Database URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.limit == Some(0) {
            return Err("Limit must be at least 1".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
