//! JSON rendering of an analysis report

use super::Report;
use crate::analysis::{AnalysisResult, NormalityVerdict};
use crate::describe::ColumnSummary;
use crate::table::Cell;
use anyhow::{Context, Result};
use serde::Serialize;

/// Chart status; SVG bodies are left out of the JSON form
#[derive(Debug, Clone, Serialize)]
pub struct JsonChart {
    pub name: String,
    pub rendered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport<'a> {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    pub title: &'a str,
    pub analysis: &'a str,
    /// Raw table; empty cells are `null`
    pub table: &'a [Vec<Cell>],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normality: Option<&'a NormalityVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptives: Option<&'a [ColumnSummary]>,
    pub result: &'a AnalysisResult,
    pub charts: Vec<JsonChart>,
}

impl<'a> JsonReport<'a> {
    pub fn new(report: &'a Report) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "sad-json-v1".to_string(),
            title: &report.title,
            analysis: &report.analysis,
            table: report.table.rows(),
            normality: report.verdict.as_ref(),
            descriptives: (!report.descriptives.is_empty()).then_some(&report.descriptives[..]),
            result: &report.result,
            charts: report
                .charts
                .iter()
                .map(|c| JsonChart {
                    name: c.name.clone(),
                    rendered: c.svg.is_ok(),
                    error: c.svg.as_ref().err().map(|e| e.to_string()),
                })
                .collect(),
        }
    }
}

/// Pretty-printed JSON document
pub fn to_json(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(&JsonReport::new(report)).context("Failed to serialize report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{execute, AnalysisKind};
    use crate::table::Table;

    #[test]
    fn test_json_report_fields() {
        let table = Table::from_tsv("1\t2\n2\t4.5\n\t6\n4\t8\n").unwrap();
        let result = execute(AnalysisKind::Regression, &table).unwrap();
        let report = Report::new(table, "Regression", result);

        let json: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();
        assert_eq!(json["format"], "sad-json-v1");
        assert_eq!(json["analysis"], "Regression");
        assert_eq!(json["table"][0][0], 1.0);
        assert!(json["table"][2][0].is_null());
        assert_eq!(json["result"]["kind"], "regression");
        assert_eq!(json["result"]["coefficients"][0]["name"], "const");
        assert!(json.get("normality").is_none());
        assert!(json.get("descriptives").is_none());
    }

    #[test]
    fn test_json_chart_errors() {
        let table = Table::from_tsv("x\ty\n").unwrap();
        let report = Report::new(
            table,
            "Median test",
            AnalysisResult::Placeholder {
                message: "pending".to_string(),
            },
        )
        .with_charts(&crate::config::ReportConfig::default());

        let json: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();
        assert_eq!(json["charts"][0]["rendered"], false);
        assert_eq!(json["charts"][0]["error"], "no numeric data to plot");
        assert_eq!(json["result"]["message"], "pending");
    }
}
