//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.wastedash.toml` files.

use crate::cli::OutputFormat;
use crate::models::ChartKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".wastedash.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Data source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report output path. Derived from the report format when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Hosted database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Project URL of the hosted database. Without it the demo dataset is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Public (anon) API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,

    /// Table holding the survey rows.
    #[serde(default = "default_table")]
    pub table: String,

    /// Maximum rows requested.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Substitute the fallback dataset when the query fails.
    #[serde(default = "default_true")]
    pub fallback_on_error: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            table: default_table(),
            limit: default_limit(),
            timeout_seconds: default_timeout(),
            fallback_on_error: true,
        }
    }
}

fn default_table() -> String {
    "caracterizacion_desechos_daule".to_string()
}

fn default_limit() -> usize {
    100
}

fn default_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

/// Chart rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Chart style.
    #[serde(default)]
    pub kind: ChartKind,

    /// SVG width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// SVG height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            kind: ChartKind::default(),
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    400
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Report title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Include the per-category subcategory tables.
    #[serde(default = "default_true")]
    pub include_details: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            title: default_title(),
            include_details: true,
        }
    }
}

fn default_title() -> String {
    "Caracterización de Desechos Sólidos - Cantón Daule".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.wastedash.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence, but only where a value was given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.supabase_url {
            self.source.url = Some(url.clone());
        }
        if let Some(ref key) = args.supabase_key {
            self.source.anon_key = Some(key.clone());
        }
        if let Some(ref table) = args.table {
            self.source.table = table.clone();
        }
        if let Some(limit) = args.limit {
            self.source.limit = limit;
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }
        if args.no_fallback {
            self.source.fallback_on_error = false;
        }

        if let Some(kind) = args.chart {
            self.chart.kind = kind;
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(ref output) = args.output {
            self.general.output = Some(output.display().to_string());
        }
    }

    /// Effective report path: the configured one, or `waste_report.<ext>`.
    pub fn output_path(&self) -> PathBuf {
        match self.general.output {
            Some(ref output) => PathBuf::from(output),
            None => PathBuf::from(format!("waste_report.{}", self.report.format.extension())),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source.table, "caracterizacion_desechos_daule");
        assert_eq!(config.source.limit, 100);
        assert!(config.source.url.is_none());
        assert!(config.source.fallback_on_error);
        assert_eq!(config.chart.kind, ChartKind::Bar);
        assert_eq!(config.output_path(), PathBuf::from("waste_report.md"));
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "daule.html"

[source]
url = "https://example.supabase.co"
anon_key = "public-key"
limit = 500

[chart]
kind = "pie"
width = 640

[report]
format = "html"
include_details = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.output_path(), PathBuf::from("daule.html"));
        assert_eq!(
            config.source.url.as_deref(),
            Some("https://example.supabase.co")
        );
        assert_eq!(config.source.limit, 500);
        assert_eq!(config.source.table, "caracterizacion_desechos_daule");
        assert_eq!(config.chart.kind, ChartKind::Pie);
        assert_eq!(config.chart.width, 640);
        assert_eq!(config.chart.height, 400);
        assert_eq!(config.report.format, OutputFormat::Html);
        assert!(!config.report.include_details);
    }

    #[test]
    fn test_merge_with_args() {
        use clap::Parser;

        let mut config = Config::default();
        config.source.table = "from_file".to_string();
        config.source.limit = 250;

        let args = crate::cli::Args::try_parse_from([
            "wastedash",
            "--supabase-url",
            "https://demo.supabase.co",
            "--limit",
            "20",
            "--chart",
            "line",
            "--no-fallback",
        ])
        .unwrap();
        config.merge_with_args(&args);

        assert_eq!(config.source.url.as_deref(), Some("https://demo.supabase.co"));
        assert_eq!(config.source.limit, 20);
        assert_eq!(config.source.table, "from_file");
        assert!(!config.source.fallback_on_error);
        assert_eq!(config.chart.kind, ChartKind::Line);
        assert_eq!(config.report.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_output_path_follows_format() {
        let mut config = Config::default();
        config.report.format = OutputFormat::Json;
        assert_eq!(config.output_path(), PathBuf::from("waste_report.json"));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[source]\ntable = \"otra_tabla\"\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.source.table, "otra_tabla");

        std::fs::write(dir.path().join(CONFIG_FILE), "[source\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[source]"));
        assert!(toml_str.contains("[chart]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.source.limit, 100);
    }
}
