//! Report rendering: SVG charts and Markdown/HTML/JSON documents.

pub mod chart;
pub mod generator;

pub use chart::render_chart;
pub use generator::{
    generate_html_report, generate_json_report, generate_markdown_report, write_report,
};
