//! Report generation.
//!
//! This module turns a dashboard [`Report`] into Markdown, a standalone
//! HTML page with the chart inline, or JSON.

use crate::analysis::percentage;
use crate::models::{CategoryDetail, Report, ReportMetadata, Summary, SurveyStats};
use crate::report::chart::escape_xml;
use anyhow::{Context, Result};
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, include_details: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", report.metadata.title));
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_stats_section(&report.stats));
    output.push_str(&generate_category_section(report));

    if include_details {
        output.push_str(&generate_details_section(&report.summary));
    }

    output.push_str(&generate_status_section(&report.metadata));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!("- **Table:** `{}`\n", metadata.table));
    section.push_str(&format!(
        "- **Location:** {}\n",
        metadata.location.as_deref().unwrap_or("All locations")
    ));
    section.push_str(&format!("- **Rows Loaded:** {}\n", metadata.rows_loaded));
    section.push('\n');

    section
}

/// Generate the headline numbers.
fn generate_stats_section(stats: &SurveyStats) -> String {
    let mut section = String::new();

    section.push_str("## Overview\n\n");
    section.push_str("| Surveys | Locations | Total Waste | Average per Survey |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {:.2} kg | {:.2} kg |\n\n",
        stats.total_surveys, stats.total_locations, stats.total_kg, stats.average_per_survey
    ));

    section
}

/// Generate the category table that mirrors the chart.
fn generate_category_section(report: &Report) -> String {
    let mut section = String::new();
    let summary = &report.summary;

    section.push_str("## Waste by Category\n\n");

    if summary.is_empty() {
        section.push_str("No waste was recorded for this selection.\n\n");
        return section;
    }

    section.push_str(&format!(
        "*Chart: {} | Axis: 0 to {} every {}*\n\n",
        report.chart_kind, report.scale.ceiling, report.scale.tick_interval
    ));
    section.push_str("| Category | Weight (kg) | Share |\n");
    section.push_str("|:---|---:|---:|\n");

    for ((label, value), pct) in summary
        .category_labels
        .iter()
        .zip(&summary.values)
        .zip(&report.percentages)
    {
        section.push_str(&format!("| {} | {:.2} | {:.1}% |\n", label, value, pct));
    }
    let charted_share: f64 = report.percentages.iter().sum();
    section.push_str(&format!(
        "| **Total** | **{:.2}** | **{:.1}%** |\n\n",
        summary.grand_total, charted_share
    ));

    section
}

/// Generate the per-category subcategory tables.
fn generate_details_section(summary: &Summary) -> String {
    if summary.details.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Category Details\n\n");

    for detail in &summary.details {
        section.push_str(&generate_detail_block(detail));
    }

    section
}

/// Generate the table for one category.
fn generate_detail_block(detail: &CategoryDetail) -> String {
    let mut block = String::new();

    block.push_str(&format!(
        "### {} ({:.2} kg)\n\n",
        detail.category_name, detail.total
    ));
    block.push_str("| Subcategory | Weight (kg) | Share of Category |\n");
    block.push_str("|:---|---:|---:|\n");

    for sub in &detail.subcategory_totals {
        block.push_str(&format!(
            "| {} | {:.2} | {:.1}% |\n",
            sub.name,
            sub.value,
            percentage(sub.value, detail.total)
        ));
    }
    block.push('\n');

    block
}

/// Generate the data-origin status line.
fn generate_status_section(metadata: &ReportMetadata) -> String {
    format!(
        "## Data Status\n\n{} **{}** - {}\n\n",
        metadata.origin.emoji(),
        metadata.origin,
        metadata.origin.status_message(metadata.rows_loaded)
    )
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by wastedash*\n".to_string()
}

/// Generate a standalone HTML page with the chart inline.
pub fn generate_html_report(report: &Report, chart_svg: &str, include_details: bool) -> String {
    let metadata = &report.metadata;
    let stats = &report.stats;
    let mut body = String::new();

    body.push_str(&format!(
        "<div class=\"card\"><div class=\"card-title\">Overview</div><div class=\"cards\">\
<div class=\"stat\"><span>Surveys</span><b>{}</b></div>\
<div class=\"stat\"><span>Locations</span><b>{}</b></div>\
<div class=\"stat\"><span>Total Waste</span><b>{:.2} kg</b></div>\
<div class=\"stat\"><span>Average per Survey</span><b>{:.2} kg</b></div>\
</div></div>\n",
        stats.total_surveys, stats.total_locations, stats.total_kg, stats.average_per_survey
    ));

    body.push_str("<div class=\"card\"><div class=\"card-title\">Waste by Category</div>\n");
    body.push_str(chart_svg);
    body.push_str("</div>\n");

    if include_details && !report.summary.details.is_empty() {
        body.push_str("<div class=\"card\"><div class=\"card-title\">Category Details</div>\n");
        body.push_str("<table><tr><th>Category</th><th>Subcategory</th><th>Weight (kg)</th></tr>\n");
        for detail in &report.summary.details {
            body.push_str(&format!(
                "<tr class=\"total\"><td>{}</td><td></td><td>{:.2}</td></tr>\n",
                escape_xml(&detail.category_name),
                detail.total
            ));
            for sub in &detail.subcategory_totals {
                body.push_str(&format!(
                    "<tr><td></td><td>{}</td><td>{:.2}</td></tr>\n",
                    escape_xml(&sub.name),
                    sub.value
                ));
            }
        }
        body.push_str("</table></div>\n");
    }

    body.push_str(&format!(
        "<div class=\"card\"><div class=\"card-title\">Data Status</div><p>{} <b>{}</b> - {}</p>\
<p class=\"muted\">Location: {} | Table: {} | Generated: {}</p></div>\n",
        metadata.origin.emoji(),
        metadata.origin,
        escape_xml(&metadata.origin.status_message(metadata.rows_loaded)),
        escape_xml(metadata.location.as_deref().unwrap_or("All locations")),
        escape_xml(&metadata.table),
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    ));

    format!(
        r##"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: Inter, "Segoe UI", Roboto, Arial, sans-serif; background: #f0fdfa; color: #1e293b; padding: 20px; }}
main {{ max-width: 1100px; margin: 0 auto; }}
.card {{ background: white; border-radius: 12px; padding: 24px; margin-bottom: 24px; border: 1px solid #e2e8f0; }}
.card-title {{ color: #0f766e; font-size: 18px; font-weight: 600; margin-bottom: 16px; border-bottom: 1px solid #e2e8f0; padding-bottom: 12px; }}
.cards {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 16px; }}
.stat span {{ display: block; font-size: 13px; color: #64748b; }}
.stat b {{ font-size: 26px; color: #0f766e; }}
table {{ width: 100%; border-collapse: collapse; }}
th, td {{ padding: 6px 10px; border-bottom: 1px solid #e2e8f0; text-align: left; }}
tr.total td {{ font-weight: 600; }}
.muted {{ color: #64748b; font-size: 13px; }}
</style>
</head>
<body>
<main>
<h1>{title}</h1>
{body}</main>
</body>
</html>
"##,
        title = escape_xml(&metadata.title),
        body = body,
    )
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered content to a file.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
