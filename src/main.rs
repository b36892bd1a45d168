//! Wastedash - waste-characterization survey dashboard
//!
//! A CLI tool that loads the waste-characterization survey table,
//! aggregates it into the 15 waste categories and renders chart reports.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, config, query failure, etc.)

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod source;
mod taxonomy;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use models::{DataOrigin, Report, ReportMetadata};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
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

    // Initialize logging
    init_logging(&args);

    info!("Wastedash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_dashboard(args).await {
        error!("Dashboard failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .wastedash.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Set [source] url and anon_key to query the database.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run one load → filter → aggregate → render cycle.
async fn run_dashboard(args: Args) -> Result<()> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Step 1: Load the survey rows
    if !args.quiet {
        println!("📥 Loading survey data: {}", config.source.table);
    }
    let loaded = source::load_rows(&config.source, args.demo, !args.quiet).await?;
    let locations = analysis::unique_locations(&loaded.rows);

    if args.list_locations {
        println!("\n📍 {} locations available:", locations.len());
        for location in &locations {
            println!("   {}", location);
        }
        return Ok(());
    }

    // Step 2: Apply the location filter
    let selection = args.location_filter();
    if let Some(location) = selection {
        if !locations.iter().any(|l| l == location) {
            warn!("Location '{}' not found in the loaded rows", location);
        }
    }
    let rows = analysis::filter_by_location(&loaded.rows, selection);
    info!("{} of {} rows selected", rows.len(), loaded.rows.len());

    // Step 3: Aggregate and plan the axis
    let taxonomy = taxonomy::categories();
    let stats = analysis::survey_stats(&rows, taxonomy);
    let summary = analysis::aggregate(&rows, taxonomy);
    let scale = analysis::plan_scale(summary.max_value());
    debug!(
        "Axis ceiling {} every {} for max {}",
        scale.ceiling,
        scale.tick_interval,
        summary.max_value()
    );

    let source = match loaded.origin {
        DataOrigin::Live => config.source.url.clone().unwrap_or_default(),
        DataOrigin::Demo => "built-in demo data".to_string(),
        DataOrigin::Fallback => "built-in fallback data".to_string(),
    };

    let report = Report {
        metadata: ReportMetadata {
            title: config.report.title.clone(),
            generated_at: Utc::now(),
            source,
            table: config.source.table.clone(),
            location: selection.map(String::from),
            origin: loaded.origin,
            rows_loaded: loaded.rows.len(),
        },
        stats,
        percentages: analysis::percentages(&summary),
        scale,
        chart_kind: config.chart.kind,
        locations,
        summary,
    };

    // Step 4: Render and save
    let chart_svg = report::render_chart(
        &report.summary,
        &report.scale,
        report.chart_kind,
        config.chart.width,
        config.chart.height,
    );

    let include_details = config.report.include_details;
    let output = match config.report.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, include_details),
        OutputFormat::Html => report::generate_html_report(&report, &chart_svg, include_details),
    };

    let output_path = config.output_path();
    report::write_report(&output_path, &output)?;

    if let Some(ref svg_path) = args.chart_svg {
        report::write_report(svg_path, &chart_svg)?;
        info!("Chart written to {}", svg_path.display());
    }

    // Print summary
    if !args.quiet {
        println!("\n📊 Summary:");
        println!(
            "   Location: {}",
            selection.unwrap_or("All locations")
        );
        println!("   Surveys: {}", report.stats.total_surveys);
        println!("   Total waste: {:.2} kg", report.stats.total_kg);
        println!(
            "   Average per survey: {:.2} kg",
            report.stats.average_per_survey
        );
        println!(
            "   Categories charted: {}",
            report.summary.category_labels.len()
        );
        println!(
            "   Data: {} {}",
            report.metadata.origin.emoji(),
            report.metadata.origin
        );
        println!("   Duration: {:.2}s", start_time.elapsed().as_secs_f64());
        println!("\n✅ Report saved to: {}", output_path.display());
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
