//! Descriptive statistics for numeric table columns
//!
//! Uses trueno::Vector for SIMD mean/stddev/min/max and aprender's
//! DescriptiveStats for quantiles (R-7 method).

use crate::table::{column_label, Table};
use anyhow::{Context, Result};
use aprender::stats::DescriptiveStats;
use serde::Serialize;
use trueno::Vector;

/// Summary of one numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f32,
    /// Population standard deviation (divides by n)
    pub stddev: f32,
    pub min: f32,
    pub q1: f32,
    pub median: f32,
    pub q3: f32,
    pub max: f32,
}

/// Summarize a sample
///
/// Values are narrowed to `f32` for trueno, so magnitudes beyond `f32::MAX`
/// (about 3.4e38) become infinite and precision drops to about seven
/// significant digits.
pub fn summarize(column: impl Into<String>, values: &[f64]) -> Result<ColumnSummary> {
    if values.is_empty() {
        anyhow::bail!("Cannot summarize an empty column");
    }

    let data: Vec<f32> = values.iter().map(|&v| v as f32).collect();
    let v = Vector::from_slice(&data);
    let stats = DescriptiveStats::new(&v);

    let q1 = stats
        .quantile(0.25)
        .map_err(|e| anyhow::anyhow!("Failed to compute first quartile: {}", e))?;
    let median = stats
        .quantile(0.5)
        .map_err(|e| anyhow::anyhow!("Failed to compute median: {}", e))?;
    let q3 = stats
        .quantile(0.75)
        .map_err(|e| anyhow::anyhow!("Failed to compute third quartile: {}", e))?;

    Ok(ColumnSummary {
        column: column.into(),
        count: data.len(),
        mean: v.mean().context("Failed to compute mean")?,
        stddev: v.stddev().unwrap_or(0.0),
        min: v.min().context("Failed to compute min")?,
        q1,
        median,
        q3,
        max: v.max().context("Failed to compute max")?,
    })
}

/// Summaries for every numeric column of the table, left to right
pub fn describe_table(table: &Table) -> Result<Vec<ColumnSummary>> {
    table
        .numeric_columns()
        .into_iter()
        .map(|col| summarize(column_label(col), &table.numeric_column(col)))
        .collect()
}

/// Plain-text rendering, one line per column
///
/// The spread column is the population standard deviation, headed
/// `pop std` so it is not mistaken for the sample (n-1) form.
pub fn to_report_string(summaries: &[ColumnSummary]) -> String {
    let mut report = String::new();
    report.push_str(&format!(
        "{:<8} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
        "column", "count", "mean", "pop std", "min", "25%", "50%", "75%", "max"
    ));
    for s in summaries {
        report.push_str(&format!(
            "{:<8} {:>6} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3}\n",
            s.column, s.count, s.mean, s.stddev, s.min, s.q1, s.median, s.q3, s.max
        ));
    }
    report
}
