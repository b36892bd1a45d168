//! Survey data sources.
//!
//! Rows come from the hosted database when one is configured. Without a
//! database URL the demo dataset is used, and a failed query falls back to
//! a small substitute dataset unless that is disabled.

pub mod samples;
pub mod supabase;

pub use samples::{demo_rows, fallback_rows};
pub use supabase::SupabaseClient;

use crate::config::SourceConfig;
use crate::models::{DataOrigin, RawRow};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{info, warn};

/// Rows loaded for one data-load cycle.
#[derive(Debug, Clone)]
pub struct LoadedRows {
    pub rows: Vec<RawRow>,
    pub origin: DataOrigin,
}

impl LoadedRows {
    fn new(rows: Vec<RawRow>, origin: DataOrigin) -> Self {
        Self { rows, origin }
    }
}

/// Load the survey rows according to the source settings.
pub async fn load_rows(
    config: &SourceConfig,
    force_demo: bool,
    show_progress: bool,
) -> Result<LoadedRows> {
    let has_url = config.url.as_deref().is_some_and(|u| !u.trim().is_empty());

    if force_demo || !has_url {
        info!("Using demo dataset (no database configured)");
        return Ok(LoadedRows::new(demo_rows(), DataOrigin::Demo));
    }

    let client = SupabaseClient::new(config).context("Failed to create database client")?;

    let spinner = show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Loading {}...", config.table));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let result = client.fetch_rows(&config.table, config.limit).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match result {
        Ok(rows) => {
            info!("Loaded {} rows from {}", rows.len(), config.table);
            Ok(LoadedRows::new(rows, DataOrigin::Live))
        }
        Err(e) if config.fallback_on_error => {
            warn!("Failed to load rows: {}. Using fallback dataset.", e);
            Ok(LoadedRows::new(fallback_rows(), DataOrigin::Fallback))
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load table {}", config.table)),
    }
}
