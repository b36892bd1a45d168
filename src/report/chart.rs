//! SVG chart rendering.
//!
//! Bar and line charts use the planned axis scale for their y axis. Pie
//! charts split the grand total by category share.

use crate::analysis::percentage;
use crate::models::{AxisScale, ChartKind, Summary};
use std::f64::consts::PI;
use std::fmt::Write;

const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 90.0;

/// Most labelled grid lines drawn on the y axis.
const MAX_GRID_LINES: usize = 15;

const PALETTE: [&str; 15] = [
    "#0f766e", "#10b981", "#f59e0b", "#3b82f6", "#ef4444", "#8b5cf6", "#14b8a6", "#f97316",
    "#6366f1", "#84cc16", "#ec4899", "#a16207", "#0ea5e9", "#64748b", "#dc2626",
];

/// Plot area inside the margins.
struct Plot {
    width: f64,
    height: f64,
    inner_width: f64,
    inner_height: f64,
}

impl Plot {
    fn new(width: u32, height: u32) -> Self {
        let width = f64::from(width.max(200));
        let height = f64::from(height.max(200));
        Self {
            width,
            height,
            inner_width: width - MARGIN_LEFT - MARGIN_RIGHT,
            inner_height: height - MARGIN_TOP - MARGIN_BOTTOM,
        }
    }

    fn y(&self, value: f64, scale: &AxisScale) -> f64 {
        let ratio = (value / scale.ceiling).clamp(0.0, 1.0);
        MARGIN_TOP + self.inner_height * (1.0 - ratio)
    }

    fn slot(&self, count: usize) -> f64 {
        self.inner_width / count.max(1) as f64
    }

    fn slot_center(&self, index: usize, count: usize) -> f64 {
        MARGIN_LEFT + self.slot(count) * (index as f64 + 0.5)
    }
}

/// Render the summary as an SVG document.
pub fn render_chart(
    summary: &Summary,
    scale: &AxisScale,
    kind: ChartKind,
    width: u32,
    height: u32,
) -> String {
    let plot = Plot::new(width, height);

    if summary.is_empty() {
        return render_placeholder(&plot);
    }

    let body = match kind {
        ChartKind::Bar => render_bars(summary, scale, &plot),
        ChartKind::Line => render_line(summary, scale, &plot),
        ChartKind::Pie => render_pie(summary, &plot),
    };

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="Inter, Segoe UI, Arial, sans-serif">
  <rect width="{w}" height="{h}" fill="white"/>
  <text x="{cx}" y="24" text-anchor="middle" font-size="15" font-weight="600" fill="#0f766e">Waste by category (kg)</text>
{body}</svg>
"##,
        w = plot.width,
        h = plot.height,
        cx = plot.width / 2.0,
        body = body,
    )
}

fn render_placeholder(plot: &Plot) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="Inter, Segoe UI, Arial, sans-serif">
  <rect width="{w}" height="{h}" fill="#f8fafc" stroke="#e2e8f0"/>
  <text x="{cx}" y="{cy}" text-anchor="middle" font-size="14" fill="#64748b">No data available</text>
</svg>
"##,
        w = plot.width,
        h = plot.height,
        cx = plot.width / 2.0,
        cy = plot.height / 2.0,
    )
}

/// Y axis with grid lines at every tick, thinned out to at most
/// `MAX_GRID_LINES` steps when the scale has more ticks than that.
fn render_axis(scale: &AxisScale, plot: &Plot) -> String {
    let mut out = String::new();
    let right = MARGIN_LEFT + plot.inner_width;
    let bottom = MARGIN_TOP + plot.inner_height;
    let tick_count = scale.tick_count();
    let stride = tick_count.div_ceil(MAX_GRID_LINES).max(1);
    let step = if tick_count > 0 {
        scale.ceiling / tick_count as f64
    } else {
        scale.tick_interval
    };

    for i in (0..=tick_count).step_by(stride) {
        let value = i as f64 * step;
        let y = plot.y(value, scale);
        let _ = writeln!(
            out,
            r##"  <line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{right}" y2="{y:.1}" stroke="#e5e7eb" stroke-width="1"/>
  <text x="{lx}" y="{ty:.1}" text-anchor="end" font-size="11" fill="#6b7280">{label}</text>"##,
            lx = MARGIN_LEFT - 8.0,
            ty = y + 4.0,
            label = format_tick(value),
        );
    }

    let _ = writeln!(
        out,
        r##"  <line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{bottom}" stroke="#94a3b8" stroke-width="1.5"/>
  <line x1="{MARGIN_LEFT}" y1="{bottom}" x2="{right}" y2="{bottom}" stroke="#94a3b8" stroke-width="1.5"/>"##,
    );

    out
}

/// Rotated category labels under each slot.
fn render_x_labels(labels: &[String], plot: &Plot) -> String {
    let mut out = String::new();
    let y = MARGIN_TOP + plot.inner_height + 14.0;

    for (i, label) in labels.iter().enumerate() {
        let x = plot.slot_center(i, labels.len());
        let _ = writeln!(
            out,
            r##"  <text x="{x:.1}" y="{y:.1}" text-anchor="end" font-size="11" fill="#334155" transform="rotate(-35, {x:.1}, {y:.1})">{}</text>"##,
            escape_xml(label),
        );
    }

    out
}

fn render_bars(summary: &Summary, scale: &AxisScale, plot: &Plot) -> String {
    let mut out = render_axis(scale, plot);
    let count = summary.values.len();
    let bar_width = plot.slot(count) * 0.7;
    let bottom = MARGIN_TOP + plot.inner_height;

    for (i, value) in summary.values.iter().enumerate() {
        let x = plot.slot_center(i, count) - bar_width / 2.0;
        let y = plot.y(*value, scale);
        let pct = percentage(*value, summary.grand_total);

        let _ = writeln!(
            out,
            r##"  <rect x="{x:.1}" y="{y:.1}" width="{bar_width:.1}" height="{bh:.1}" fill="{color}" opacity="0.85"/>
  <text x="{cx:.1}" y="{ly:.1}" text-anchor="middle" font-size="10" fill="#1e293b">{value:.1} ({pct:.1}%)</text>"##,
            bh = bottom - y,
            color = PALETTE[i % PALETTE.len()],
            cx = x + bar_width / 2.0,
            ly = y - 6.0,
        );
    }

    out.push_str(&render_x_labels(&summary.category_labels, plot));
    out
}

fn render_line(summary: &Summary, scale: &AxisScale, plot: &Plot) -> String {
    let mut out = render_axis(scale, plot);
    let count = summary.values.len();

    let points: Vec<(f64, f64)> = summary
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| (plot.slot_center(i, count), plot.y(*v, scale)))
        .collect();

    let path = points
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<_>>()
        .join(" ");

    let _ = writeln!(
        out,
        r##"  <polyline points="{path}" fill="none" stroke="#0f766e" stroke-width="2.5"/>"##,
    );

    for ((x, y), value) in points.iter().zip(&summary.values) {
        let pct = percentage(*value, summary.grand_total);
        let _ = writeln!(
            out,
            r##"  <circle cx="{x:.1}" cy="{y:.1}" r="4" fill="#10b981" stroke="white" stroke-width="1.5"/>
  <text x="{x:.1}" y="{ly:.1}" text-anchor="middle" font-size="10" fill="#1e293b">{value:.1} ({pct:.1}%)</text>"##,
            ly = y - 10.0,
        );
    }

    out.push_str(&render_x_labels(&summary.category_labels, plot));
    out
}

fn render_pie(summary: &Summary, plot: &Plot) -> String {
    let mut out = String::new();
    let legend_width = 190.0;
    let radius = ((plot.width - legend_width).min(plot.height - MARGIN_TOP) / 2.0 - 20.0).max(20.0);
    let cx = (plot.width - legend_width) / 2.0;
    let cy = MARGIN_TOP + (plot.height - MARGIN_TOP) / 2.0;

    let mut start = -PI / 2.0;

    for (i, value) in summary.values.iter().enumerate() {
        let pct = percentage(*value, summary.grand_total);
        let sweep = pct / 100.0 * 2.0 * PI;
        let color = PALETTE[i % PALETTE.len()];

        if pct >= 99.999 {
            let _ = writeln!(
                out,
                r##"  <circle cx="{cx:.1}" cy="{cy:.1}" r="{radius:.1}" fill="{color}" stroke="white" stroke-width="1.5"/>"##,
            );
        } else {
            let end = start + sweep;
            let (x1, y1) = (cx + radius * start.cos(), cy + radius * start.sin());
            let (x2, y2) = (cx + radius * end.cos(), cy + radius * end.sin());
            let large_arc = if sweep > PI { 1 } else { 0 };

            let _ = writeln!(
                out,
                r##"  <path d="M {cx:.1} {cy:.1} L {x1:.1} {y1:.1} A {radius:.1} {radius:.1} 0 {large_arc} 1 {x2:.1} {y2:.1} Z" fill="{color}" stroke="white" stroke-width="1.5"/>"##,
            );
        }

        start += sweep;
    }

    let legend_x = plot.width - legend_width + 10.0;
    for (i, (label, value)) in summary
        .category_labels
        .iter()
        .zip(&summary.values)
        .enumerate()
    {
        let y = MARGIN_TOP + 10.0 + i as f64 * 20.0;
        let _ = writeln!(
            out,
            r##"  <rect x="{legend_x:.1}" y="{y:.1}" width="12" height="12" fill="{color}"/>
  <text x="{tx:.1}" y="{ty:.1}" font-size="11" fill="#334155">{label} ({pct:.1}%)</text>"##,
            color = PALETTE[i % PALETTE.len()],
            tx = legend_x + 18.0,
            ty = y + 10.0,
            label = escape_xml(label),
            pct = percentage(*value, summary.grand_total),
        );
    }

    out
}

/// Tick label: whole numbers without decimals.
fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Escape text for use inside SVG/HTML elements.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{aggregate, plan_scale};
    use crate::models::RawRow;
    use crate::source::demo_rows;
    use crate::taxonomy::categories;

    fn demo_summary() -> (Summary, AxisScale) {
        let summary = aggregate(&demo_rows(), categories());
        let scale = plan_scale(summary.max_value());
        (summary, scale)
    }

    #[test]
    fn test_bar_chart() {
        let (summary, scale) = demo_summary();
        let svg = render_chart(&summary, &scale, ChartKind::Bar, 800, 400);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<rect x=").count(), 3);
        assert!(svg.contains("M. ORGÁNICA"));
        assert!(svg.contains("75.0 (78.9%)"));
        // axis labels up to the planned ceiling
        assert!(svg.contains(&format!(">{}<", scale.ceiling as i64)));
    }

    #[test]
    fn test_line_chart() {
        let (summary, scale) = demo_summary();
        let svg = render_chart(&summary, &scale, ChartKind::Line, 800, 400);

        assert!(svg.contains("<polyline"));
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn test_pie_chart() {
        let (summary, scale) = demo_summary();
        let svg = render_chart(&summary, &scale, ChartKind::Pie, 800, 400);

        assert_eq!(svg.matches("<path").count(), 3);
        assert!(svg.contains("PAPEL/CARTÓN (14.7%)"));
    }

    #[test]
    fn test_pie_single_category_is_full_circle() {
        let summary = Summary {
            category_labels: vec!["METAL".to_string()],
            values: vec![4.0],
            grand_total: 4.0,
            details: vec![],
        };
        let svg = render_chart(&summary, &plan_scale(4.0), ChartKind::Pie, 600, 400);

        assert!(svg.contains("<circle"));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn test_empty_summary_placeholder() {
        let svg = render_chart(&Summary::default(), &plan_scale(0.0), ChartKind::Bar, 800, 400);
        assert!(svg.contains("No data available"));
    }

    #[test]
    fn test_huge_value_keeps_axis_small() {
        let row = RawRow::new(1, "Zona Sur", &[]);
        let mut rows = vec![row];
        rows[0]
            .fields
            .insert("maderas_kg".to_string(), serde_json::json!("1e300"));
        let summary = aggregate(&rows, categories());
        let scale = plan_scale(summary.max_value());
        assert_eq!(scale.tick_interval, 5000.0);

        let svg = render_chart(&summary, &scale, ChartKind::Bar, 800, 400);
        assert!(svg.matches("stroke=\"#e5e7eb\"").count() <= MAX_GRID_LINES + 1);
        assert!(svg.len() < 20_000);
    }

    #[test]
    fn test_large_scale_thins_grid_lines() {
        let summary = Summary {
            category_labels: vec!["MADERAS".to_string()],
            values: vec![1e9],
            grand_total: 1e9,
            details: vec![],
        };
        let scale = plan_scale(1e9);
        let svg = render_chart(&summary, &scale, ChartKind::Line, 800, 400);

        let grid_lines = svg.matches("stroke=\"#e5e7eb\"").count();
        assert!(grid_lines > 1);
        assert!(grid_lines <= MAX_GRID_LINES + 1);
    }

    #[test]
    fn test_small_scale_draws_every_tick() {
        let (summary, scale) = demo_summary();
        let svg = render_chart(&summary, &scale, ChartKind::Bar, 800, 400);
        assert_eq!(
            svg.matches("stroke=\"#e5e7eb\"").count(),
            scale.tick_count() + 1
        );
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(1.1e9), "1100000000");
        assert_eq!(format_tick(50.0), "50");
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(2.5), "2.5");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("A & B <c>"), "A &amp; B &lt;c&gt;");
        assert_eq!(escape_xml("\"q\" 'a'"), "&quot;q&quot; &#39;a&#39;");
    }
}
