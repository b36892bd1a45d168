//! Category aggregation and survey statistics.
//!
//! This module reduces survey rows into per-category and per-subcategory
//! weight totals for a taxonomy, plus the filtering and headline numbers
//! the dashboard shows around the chart.

use crate::models::{CategoryDetail, RawRow, SubcategoryTotal, Summary, SurveyStats};
use crate::taxonomy::{abbreviate, field_keys, Category};
use std::borrow::Borrow;
use std::collections::BTreeSet;

/// Location selection that keeps every row.
pub const ALL_LOCATIONS: &str = "all";

/// Aggregate survey rows into chart labels, values and a detail breakdown.
///
/// Categories and subcategories keep taxonomy order. Only positive totals
/// reach the chart arrays, while `grand_total` sums every category total.
pub fn aggregate<R: Borrow<RawRow>>(rows: &[R], taxonomy: &[Category]) -> Summary {
    let mut summary = Summary::default();

    for category in taxonomy {
        let subtotals: Vec<f64> = category
            .subcategories
            .iter()
            .map(|sub| rows.iter().map(|r| as_row(r).value(sub.field_key)).sum())
            .collect();
        let total: f64 = subtotals.iter().sum();

        summary.grand_total += total;

        let has_positive_sub = subtotals.iter().any(|v| *v > 0.0);
        if total <= 0.0 && !has_positive_sub {
            continue;
        }

        let subcategory_totals = category
            .subcategories
            .iter()
            .zip(&subtotals)
            .filter(|(_, value)| **value > 0.0)
            .map(|(sub, value)| SubcategoryTotal {
                name: sub.display_name.to_string(),
                value: *value,
            })
            .collect();

        summary.details.push(CategoryDetail {
            category_name: category.name.to_string(),
            total,
            subcategory_totals,
        });
    }

    for detail in summary.details.iter().filter(|d| d.total > 0.0) {
        summary
            .category_labels
            .push(abbreviate(&detail.category_name).to_string());
        summary.values.push(detail.total);
    }

    summary
}

/// Keep the rows taken at the selected location.
///
/// `None` and `"all"` (any case) select every row.
pub fn filter_by_location<'a>(rows: &'a [RawRow], selection: Option<&str>) -> Vec<&'a RawRow> {
    match selection {
        None => rows.iter().collect(),
        Some(s) if s.eq_ignore_ascii_case(ALL_LOCATIONS) => rows.iter().collect(),
        Some(location) => rows
            .iter()
            .filter(|r| r.lugar.as_deref() == Some(location))
            .collect(),
    }
}

/// Distinct non-empty locations, sorted.
pub fn unique_locations<R: Borrow<RawRow>>(rows: &[R]) -> Vec<String> {
    rows.iter()
        .filter_map(|r| as_row(r).location())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

/// Compute the headline numbers for a set of surveys.
pub fn survey_stats<R: Borrow<RawRow>>(rows: &[R], taxonomy: &[Category]) -> SurveyStats {
    let total_kg: f64 = rows
        .iter()
        .map(|r| {
            let row = as_row(r);
            field_keys(taxonomy).map(|key| row.value(key)).sum::<f64>()
        })
        .sum();

    let total_surveys = rows.len();
    let average_per_survey = if total_surveys > 0 {
        total_kg / total_surveys as f64
    } else {
        0.0
    };

    SurveyStats {
        total_surveys,
        total_locations: unique_locations(rows).len(),
        total_kg,
        average_per_survey,
    }
}

fn as_row<R: Borrow<RawRow>>(r: &R) -> &RawRow {
    r.borrow()
}

/// Share of `grand_total` as a percentage, 0 for an empty total.
pub fn percentage(value: f64, grand_total: f64) -> f64 {
    if grand_total == 0.0 {
        0.0
    } else {
        value / grand_total * 100.0
    }
}

/// Percentages for every charted value of a summary.
pub fn percentages(summary: &Summary) -> Vec<f64> {
    summary
        .values
        .iter()
        .map(|v| percentage(*v, summary.grand_total))
        .collect()
}
