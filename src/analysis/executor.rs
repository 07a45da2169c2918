// Runs the analysis the user picked from the offered menu

use crate::analysis::{one_way_anova, simple_regression};
use crate::analysis::{AnalysisError, AnalysisKind, AnalysisResult};
use crate::table::Table;

/// Fixed text returned for analyses that have no implementation yet
pub fn placeholder_message(kind: AnalysisKind) -> String {
    format!("Analysis '{}' is not yet implemented.", kind.label())
}

/// Execute an analysis against the whole table
///
/// Analyses without an implementation never fail; they yield
/// [`AnalysisResult::Placeholder`].
///
/// # Example
/// ```
/// use sad::analysis::{execute, AnalysisKind, AnalysisResult};
/// use sad::table::Table;
///
/// let table = Table::from_tsv("1\n2\n").unwrap();
/// let result = execute(AnalysisKind::WilcoxonTest, &table).unwrap();
/// assert!(matches!(result, AnalysisResult::Placeholder { .. }));
/// ```
pub fn execute(kind: AnalysisKind, table: &Table) -> Result<AnalysisResult, AnalysisError> {
    tracing::info!(analysis = kind.label(), "running analysis");

    match kind {
        AnalysisKind::VarianceAnalysis => one_way_anova(table).map(AnalysisResult::Anova),
        AnalysisKind::Regression => simple_regression(table).map(AnalysisResult::Regression),
        AnalysisKind::MedianTest | AnalysisKind::WilcoxonTest => {
            tracing::warn!(analysis = kind.label(), "analysis is not yet implemented");
            Ok(AnalysisResult::Placeholder {
                message: placeholder_message(kind),
            })
        }
    }
}
