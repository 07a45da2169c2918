//! Analysis report assembly and export
//!
//! A [`Report`] collects everything produced for one analysis run: the raw
//! table, the normality verdict, descriptive statistics, the analysis result
//! and the two charts. It renders to HTML (default) or JSON and is written to
//! a single file.

mod html;
mod json;

pub use html::to_html;
pub use json::{to_json, JsonChart, JsonReport};

use crate::analysis::{AnalysisKind, AnalysisResult, NormalityVerdict};
use crate::charts::{box_plot_svg, histogram_svg, ChartError};
use crate::config::{ReportConfig, ReportFormat};
use crate::describe::{describe_table, ColumnSummary};
use crate::table::Table;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// A rendered chart, or the reason it could not be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub name: String,
    pub svg: Result<String, ChartError>,
}

impl Chart {
    /// Note shown in place of a chart that failed to render
    pub fn failure_note(&self) -> Option<String> {
        self.svg
            .as_ref()
            .err()
            .map(|e| format!("Failed to create {}: {}", self.name, e))
    }
}

/// Everything that goes into one saved report
#[derive(Debug, Clone)]
pub struct Report {
    pub title: String,
    pub analysis: String,
    pub table: Table,
    pub verdict: Option<NormalityVerdict>,
    pub descriptives: Vec<ColumnSummary>,
    pub result: AnalysisResult,
    pub charts: Vec<Chart>,
}

impl Report {
    /// Minimal report: heading, raw data and result
    pub fn new(table: Table, analysis: impl Into<String>, result: AnalysisResult) -> Self {
        let analysis = analysis.into();
        Self {
            title: format!("{}: {}", ReportConfig::default().title, analysis),
            analysis,
            table,
            verdict: None,
            descriptives: Vec::new(),
            result,
            charts: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = format!("{}: {}", title, self.analysis);
        self
    }

    pub fn with_verdict(mut self, verdict: NormalityVerdict) -> Self {
        self.verdict = Some(verdict);
        self
    }

    /// Add descriptive statistics for the numeric columns
    pub fn with_descriptives(mut self) -> Self {
        match describe_table(&self.table) {
            Ok(summaries) => self.descriptives = summaries,
            Err(e) => tracing::warn!("Failed to compute descriptive statistics: {}", e),
        }
        self
    }

    /// Render the box plot and the histogram
    ///
    /// A chart that fails is kept with its error so the report can show a
    /// note in its place.
    pub fn with_charts(mut self, config: &ReportConfig) -> Self {
        let size = (config.chart_width, config.chart_height);
        self.charts = vec![
            Chart {
                name: "box plot".to_string(),
                svg: box_plot_svg(&self.table, size),
            },
            Chart {
                name: "histogram".to_string(),
                svg: histogram_svg(&self.table, config.histogram_bins, size),
            },
        ];
        for note in self.charts.iter().filter_map(Chart::failure_note) {
            tracing::warn!("{}", note);
        }
        self
    }

    /// Assemble a complete report for an executed analysis
    pub fn build(
        table: &Table,
        kind: AnalysisKind,
        verdict: NormalityVerdict,
        result: AnalysisResult,
        config: &ReportConfig,
    ) -> Self {
        Report::new(table.clone(), kind.label(), result)
            .with_title(&config.title)
            .with_verdict(verdict)
            .with_descriptives()
            .with_charts(config)
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Html => Ok(to_html(self)),
            ReportFormat::Json => to_json(self),
        }
    }

    /// Write the report to `path`
    pub fn save<P: AsRef<Path>>(&self, path: P, format: ReportFormat) -> Result<()> {
        let path = path.as_ref();
        let content = self.render(format)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        tracing::info!(format = format.extension(), "report saved to {}", path.display());
        Ok(())
    }
}
