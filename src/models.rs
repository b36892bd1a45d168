//! Data models for the waste dashboard.
//!
//! This module contains the raw survey row as it arrives from the
//! database, the aggregation results built from it, and the report that
//! wraps everything for rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One survey record from the characterization table.
///
/// Every column other than `id` and `lugar` is kept in `fields`, so rows
/// carry whatever numeric columns the table has without a fixed schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// Row identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    /// Location where the survey was taken.
    #[serde(default)]
    pub lugar: Option<String>,
    /// Remaining columns, keyed by column name.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawRow {
    /// Creates a row from `(field, kg)` pairs.
    pub fn new(id: i64, lugar: &str, values: &[(&str, f64)]) -> Self {
        let fields = values
            .iter()
            .map(|(key, kg)| (key.to_string(), Value::from(*kg)))
            .collect();

        Self {
            id,
            lugar: Some(lugar.to_string()),
            fields,
        }
    }

    /// Returns the numeric value of a field, or 0 when missing or unparseable.
    pub fn value(&self, field_key: &str) -> f64 {
        self.fields.get(field_key).map(parse_number).unwrap_or(0.0)
    }

    /// Returns the location, treating an empty string as absent.
    pub fn location(&self) -> Option<&str> {
        self.lugar.as_deref().filter(|l| !l.is_empty())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Converts a loosely typed JSON value into a weight.
///
/// Numbers pass through (negatives included). Strings are read up to the
/// longest numeric prefix, so `"12.5 kg"` is 12.5. Anything else, and any
/// non-finite result, is 0.
pub fn parse_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_lenient(s),
        _ => None,
    };

    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn parse_lenient(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();

    let mut i = 0;
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => {
                seen_digit = true;
                i += 1;
                end = i;
            }
            b'.' if !seen_dot && !seen_exp => {
                seen_dot = true;
                i += 1;
                if seen_digit {
                    end = i;
                }
            }
            b'e' | b'E' if seen_digit && !seen_exp => {
                let mut j = i + 1;
                if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
                    j += 1;
                }
                if !matches!(bytes.get(j), Some(b'0'..=b'9')) {
                    break;
                }
                seen_exp = true;
                i = j;
            }
            _ => break,
        }
    }

    if !seen_digit {
        return None;
    }

    s[..end].parse::<f64>().ok()
}

/// Total for one subcategory field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubcategoryTotal {
    pub name: String,
    pub value: f64,
}

/// Per-category breakdown shown in the detail table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDetail {
    /// Canonical (unabbreviated) category name.
    pub category_name: String,
    /// Sum of every subcategory field of this category.
    pub total: f64,
    /// Subcategories with a positive total, in taxonomy order.
    pub subcategory_totals: Vec<SubcategoryTotal>,
}

/// Chart-ready aggregation of a row collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Short labels of categories with a positive total.
    pub category_labels: Vec<String>,
    /// Totals parallel to `category_labels`.
    pub values: Vec<f64>,
    /// Sum of every category total.
    pub grand_total: f64,
    /// Breakdown of every category with any positive weight.
    pub details: Vec<CategoryDetail>,
}

impl Summary {
    /// Returns true when nothing is left to chart.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest charted value, or 0 when empty.
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// Numeric axis of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisScale {
    /// Axis maximum.
    pub ceiling: f64,
    /// Distance between ticks.
    pub tick_interval: f64,
}

impl AxisScale {
    /// Number of tick steps between 0 and the ceiling.
    ///
    /// Saturates at `u32::MAX` and is 0 for a degenerate scale.
    pub fn tick_count(&self) -> usize {
        let steps = (self.ceiling / self.tick_interval).round();
        if steps.is_finite() && steps > 0.0 {
            steps.min(f64::from(u32::MAX)) as usize
        } else {
            0
        }
    }
}

/// Headline numbers shown above the chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyStats {
    /// Number of surveys in the set.
    pub total_surveys: usize,
    /// Distinct locations in the set.
    pub total_locations: usize,
    /// Sum of every taxonomy field over every survey.
    pub total_kg: f64,
    /// `total_kg / total_surveys`, 0 without surveys.
    pub average_per_survey: f64,
}

/// Where the loaded rows came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    /// Fetched from the database.
    Live,
    /// Built-in development dataset (no database configured).
    Demo,
    /// Substitute dataset after a failed fetch.
    Fallback,
}

impl fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataOrigin::Live => write!(f, "Live"),
            DataOrigin::Demo => write!(f, "Demo"),
            DataOrigin::Fallback => write!(f, "Fallback"),
        }
    }
}

impl DataOrigin {
    /// Returns an emoji status light for the origin.
    pub fn emoji(&self) -> &'static str {
        match self {
            DataOrigin::Live => "🟢",
            DataOrigin::Demo => "🟡",
            DataOrigin::Fallback => "🟠",
        }
    }

    /// One-line status message for the report.
    pub fn status_message(&self, rows: usize) -> String {
        match self {
            DataOrigin::Live => format!("Connected to the database. {} rows loaded.", rows),
            DataOrigin::Demo => {
                "Using demonstration data. Set SUPABASE_URL and SUPABASE_ANON_KEY to connect."
                    .to_string()
            }
            DataOrigin::Fallback => format!(
                "The database query failed. Showing {} fallback rows instead.",
                rows
            ),
        }
    }
}

/// Chart style for the category totals.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Vertical bars (default)
    #[default]
    Bar,
    /// Pie with percentage slices
    Pie,
    /// Line through the category totals
    Line,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Bar => write!(f, "bar"),
            ChartKind::Pie => write!(f, "pie"),
            ChartKind::Line => write!(f, "line"),
        }
    }
}

/// Metadata about the generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report title.
    pub title: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Database URL, or a note for built-in data.
    pub source: String,
    /// Queried table.
    pub table: String,
    /// Selected location, `None` for all locations.
    pub location: Option<String>,
    /// Where the rows came from.
    pub origin: DataOrigin,
    /// Rows loaded before filtering.
    pub rows_loaded: usize,
}

/// The complete dashboard report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub stats: SurveyStats,
    pub summary: Summary,
    pub scale: AxisScale,
    pub chart_kind: ChartKind,
    /// Share of the grand total for each charted value.
    pub percentages: Vec<f64>,
    /// Every location available for filtering.
    pub locations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_number_numbers() {
        assert_eq!(parse_number(&json!(10)), 10.0);
        assert_eq!(parse_number(&json!(2.5)), 2.5);
        assert_eq!(parse_number(&json!(-4)), -4.0);
    }

    #[test]
    fn test_parse_number_strings() {
        assert_eq!(parse_number(&json!("12.5")), 12.5);
        assert_eq!(parse_number(&json!("  7")), 7.0);
        assert_eq!(parse_number(&json!("12.5kg")), 12.5);
        assert_eq!(parse_number(&json!(".5")), 0.5);
        assert_eq!(parse_number(&json!("3e2")), 300.0);
        assert_eq!(parse_number(&json!("3e")), 3.0);
        assert_eq!(parse_number(&json!("-1.5")), -1.5);
    }

    #[test]
    fn test_parse_number_garbage_is_zero() {
        assert_eq!(parse_number(&json!("abc")), 0.0);
        assert_eq!(parse_number(&json!("")), 0.0);
        assert_eq!(parse_number(&json!(".")), 0.0);
        assert_eq!(parse_number(&json!("Infinity")), 0.0);
        assert_eq!(parse_number(&json!("1e999")), 0.0);
        assert_eq!(parse_number(&json!(null)), 0.0);
        assert_eq!(parse_number(&json!(true)), 0.0);
        assert_eq!(parse_number(&json!([1, 2])), 0.0);
        assert_eq!(parse_number(&json!({"kg": 3})), 0.0);
    }

    #[test]
    fn test_raw_row_deserialize() {
        let row: RawRow = serde_json::from_value(json!({
            "id": 7,
            "lugar": "Zona Sur",
            "papel_blanco_kg": 5,
            "carton_kg": "2.5",
            "bolsas_kg": null
        }))
        .unwrap();

        assert_eq!(row.id, 7);
        assert_eq!(row.location(), Some("Zona Sur"));
        assert_eq!(row.value("papel_blanco_kg"), 5.0);
        assert_eq!(row.value("carton_kg"), 2.5);
        assert_eq!(row.value("bolsas_kg"), 0.0);
        assert_eq!(row.value("missing_kg"), 0.0);
        assert!(!row.fields.contains_key("id"));
    }

    #[test]
    fn test_raw_row_missing_location() {
        let row: RawRow = serde_json::from_value(json!({ "id": 1, "lugar": "" })).unwrap();
        assert_eq!(row.location(), None);

        let row: RawRow = serde_json::from_value(json!({ "id": 2 })).unwrap();
        assert_eq!(row.lugar, None);
    }

    #[test]
    fn test_summary_max_value() {
        let summary = Summary {
            category_labels: vec!["A".to_string(), "B".to_string()],
            values: vec![3.0, 9.5],
            grand_total: 12.5,
            details: vec![],
        };
        assert_eq!(summary.max_value(), 9.5);
        assert_eq!(Summary::default().max_value(), 0.0);
        assert!(Summary::default().is_empty());
    }

    #[test]
    fn test_axis_tick_count() {
        let scale = AxisScale {
            ceiling: 600.0,
            tick_interval: 50.0,
        };
        assert_eq!(scale.tick_count(), 12);
    }

    #[test]
    fn test_axis_tick_count_is_bounded() {
        let huge = AxisScale {
            ceiling: 1e300,
            tick_interval: 5000.0,
        };
        assert_eq!(huge.tick_count(), u32::MAX as usize);

        let degenerate = AxisScale {
            ceiling: 10.0,
            tick_interval: 0.0,
        };
        assert_eq!(degenerate.tick_count(), 0);
    }

    #[test]
    fn test_raw_row_null_id() {
        let rows: Vec<RawRow> = serde_json::from_value(json!([
            { "id": null, "lugar": "Zona Sur", "papel_blanco_kg": 2 },
            { "id": 7, "lugar": "Barrio Norte" }
        ]))
        .unwrap();
        assert_eq!(rows[0].id, 0);
        assert_eq!(rows[0].value("papel_blanco_kg"), 2.0);
        assert_eq!(rows[1].id, 7);
    }

    #[test]
    fn test_data_origin_status() {
        assert_eq!(DataOrigin::Live.emoji(), "🟢");
        assert!(DataOrigin::Live.status_message(42).contains("42 rows"));
        assert!(DataOrigin::Demo.status_message(3).contains("demonstration"));
        assert_eq!(DataOrigin::Fallback.to_string(), "Fallback");
    }
}
