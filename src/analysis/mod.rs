// Normality-gated statistical analysis
//
// Workflow:
// 1. Pick the first numeric column of the table and run Shapiro-Wilk on it
// 2. p > 0.05 offers the parametric menu (variance analysis, regression),
//    otherwise the non-parametric menu (median test, Wilcoxon test)
// 3. Execute the chosen analysis against the whole table
//
// The numerical work is delegated: linregress fits the OLS models (including
// the dummy-coded one-way ANOVA) and statrs supplies the F distribution.
// The non-parametric options are flagged placeholders and return a fixed
// message instead of a computed result.

mod anova;
mod dispatcher;
mod executor;
mod ols;

pub use anova::{one_way_anova, AnovaRow, AnovaTable, GroupSummary};
pub use dispatcher::{
    assess_normality, assess_normality_with, NormalityVerdict, MIN_NORMALITY_SAMPLES,
    NORMALITY_ALPHA,
};
pub use executor::{execute, placeholder_message};
pub use ols::{simple_regression, Coefficient, RegressionSummary};

use crate::normality::NormalityError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Analyses a user can pick after the normality check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    /// One-way analysis of variance
    #[value(name = "variance")]
    VarianceAnalysis,
    /// Simple linear regression (OLS)
    Regression,
    /// Mood's median test (not yet implemented)
    #[value(name = "median")]
    MedianTest,
    /// Wilcoxon test (not yet implemented)
    #[value(name = "wilcoxon")]
    WilcoxonTest,
}

impl AnalysisKind {
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisKind::VarianceAnalysis => "Variance analysis",
            AnalysisKind::Regression => "Regression",
            AnalysisKind::MedianTest => "Median test",
            AnalysisKind::WilcoxonTest => "Wilcoxon test",
        }
    }

    /// Whether executing this analysis produces a computed result
    pub fn is_implemented(&self) -> bool {
        matches!(
            self,
            AnalysisKind::VarianceAnalysis | AnalysisKind::Regression
        )
    }

    /// Family whose menu offers this analysis
    pub fn family(&self) -> Family {
        match self {
            AnalysisKind::VarianceAnalysis | AnalysisKind::Regression => Family::Parametric,
            AnalysisKind::MedianTest | AnalysisKind::WilcoxonTest => Family::NonParametric,
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Test family selected by the normality verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Parametric,
    NonParametric,
}

impl Family {
    /// Menu offered for this family; the first entry is the default choice
    pub fn options(&self) -> &'static [AnalysisKind] {
        match self {
            Family::Parametric => &[AnalysisKind::VarianceAnalysis, AnalysisKind::Regression],
            Family::NonParametric => &[AnalysisKind::MedianTest, AnalysisKind::WilcoxonTest],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Family::Parametric => "parametric",
            Family::NonParametric => "non-parametric",
        }
    }
}

/// Failures of the normality check or of an analysis
///
/// Every variant carries a message fit to show the user as-is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("The table has no numeric data to analyze")]
    NoNumericData,

    #[error("Not enough data for analysis: at least {needed} values are required, found {found}")]
    InsufficientData { needed: usize, found: usize },

    #[error("Not enough columns for {analysis}: at least {needed} are required, found {found}")]
    InsufficientColumns {
        analysis: &'static str,
        needed: usize,
        found: usize,
    },

    #[error("No column is available to use as a factor for variance analysis")]
    NoFactorColumn,

    #[error("Variance analysis needs at least 2 groups in the factor column, found {0}")]
    TooFewGroups(usize),

    #[error("'{kind}' is not offered for {family} data")]
    NotOffered {
        kind: AnalysisKind,
        family: &'static str,
    },

    #[error("Normality test failed: {0}")]
    Normality(#[from] NormalityError),

    #[error("Model fitting failed: {0}")]
    ModelFit(String),
}

impl From<linregress::Error> for AnalysisError {
    fn from(e: linregress::Error) -> Self {
        AnalysisError::ModelFit(e.to_string())
    }
}

/// Outcome of an executed analysis, passed through to the report unchanged
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisResult {
    Anova(AnovaTable),
    Regression(RegressionSummary),
    Placeholder { message: String },
}

impl AnalysisResult {
    /// Plain-text dump for reports and the terminal
    pub fn to_report_string(&self) -> String {
        match self {
            AnalysisResult::Anova(table) => table.to_report_string(),
            AnalysisResult::Regression(summary) => summary.to_report_string(),
            AnalysisResult::Placeholder { message } => format!("{}\n", message),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, AnalysisResult::Placeholder { .. })
    }
}

#[cfg(test)]
mod tests;
