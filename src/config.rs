// Tool configuration loaded from TOML
//
// Only presentation and grid defaults live here. The normality threshold is
// a fixed constant of the analysis module and cannot be configured.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Output format of the saved report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Self-contained HTML document with inline SVG charts
    #[default]
    Html,
    /// Machine-readable JSON
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        }
    }
}

/// Defaults for newly created tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub default_rows: usize,
    pub default_columns: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_rows: 10,
            default_columns: 10,
        }
    }
}

/// Report layout and chart sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Heading prefix, followed by the analysis label
    pub title: String,
    pub chart_width: u32,
    pub chart_height: u32,
    /// Equal-width bins in the histogram
    pub histogram_bins: usize,
    pub format: ReportFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Data analysis report".to_string(),
            chart_width: 640,
            chart_height: 480,
            histogram_bins: 10,
            format: ReportFormat::Html,
        }
    }
}

/// Complete configuration file
///
/// # Example
/// ```
/// use sad::config::SadConfig;
///
/// let config = SadConfig::default();
/// assert_eq!(config.table.default_rows, 10);
/// assert_eq!(config.report.histogram_bins, 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SadConfig {
    pub table: TableConfig,
    pub report: ReportConfig,
}

impl SadConfig {
    /// Load configuration from a TOML file
    ///
    /// Missing sections and keys take their default values.
    ///
    /// # Example TOML
    /// ```toml
    /// [table]
    /// default_rows = 20
    ///
    /// [report]
    /// title = "Lab results"
    /// format = "json"
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: SadConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the file if one was given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_toml(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.table.default_rows == 0 || self.table.default_columns == 0 {
            return Err(format!(
                "table defaults must be at least 1x1, got {}x{}",
                self.table.default_rows, self.table.default_columns
            ));
        }

        if self.report.chart_width < 100 || self.report.chart_height < 100 {
            return Err(format!(
                "chart size must be at least 100x100, got {}x{}",
                self.report.chart_width, self.report.chart_height
            ));
        }

        if self.report.histogram_bins == 0 {
            return Err("histogram_bins must be >= 1".to_string());
        }

        Ok(())
    }
}
