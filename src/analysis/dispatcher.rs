// Normality-gated choice of the analysis family
//
// The first numeric column stands in for the whole table: its Shapiro-Wilk
// p-value decides which menu of analyses the user is offered.

use crate::analysis::{AnalysisError, AnalysisKind, Family};
use crate::normality::{shapiro_wilk, NormalityError, ShapiroWilk};
use crate::table::{column_label, Table};
use serde::Serialize;

/// Significance level of the normality check (fixed, not configurable)
pub const NORMALITY_ALPHA: f64 = 0.05;

/// Non-missing values the tested column needs before the test is run
pub const MIN_NORMALITY_SAMPLES: usize = 3;

/// Outcome of the normality check: which column was tested and what is offered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalityVerdict {
    /// Index of the tested column
    pub column: usize,
    /// Non-missing values in the tested column
    pub sample_size: usize,
    pub test: ShapiroWilk,
    pub family: Family,
    /// Menu offered to the user, default first
    pub options: Vec<AnalysisKind>,
}

impl NormalityVerdict {
    pub fn is_normal(&self) -> bool {
        self.family == Family::Parametric
    }

    /// Resolve the user's choice against the offered menu
    ///
    /// `None` takes the first offered option.
    pub fn choose(&self, requested: Option<AnalysisKind>) -> Result<AnalysisKind, AnalysisError> {
        match requested {
            None => self.options.first().copied().ok_or(AnalysisError::NotOffered {
                kind: self.family.options()[0],
                family: self.family.label(),
            }),
            Some(kind) if self.options.contains(&kind) => Ok(kind),
            Some(kind) => Err(AnalysisError::NotOffered {
                kind,
                family: self.family.label(),
            }),
        }
    }

    /// One-line summary, e.g. "Data is normally distributed (p=0.412 > 0.05)"
    pub fn summary(&self) -> String {
        if self.is_normal() {
            format!(
                "Data is normally distributed (p={:.3} > {})",
                self.test.pvalue, NORMALITY_ALPHA
            )
        } else {
            format!(
                "Data is not normally distributed (p={:.3} <= {})",
                self.test.pvalue, NORMALITY_ALPHA
            )
        }
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("{}\n\n", self.summary()));
        report.push_str(&format!(
            "Tested column: {} ({} values)\n",
            column_label(self.column),
            self.sample_size
        ));
        report.push_str(&format!(
            "Shapiro-Wilk: W={:.4}, p={:.4}\n",
            self.test.statistic, self.test.pvalue
        ));
        report.push_str(&format!("\nAvailable {} analyses:\n", self.family.label()));
        for (i, kind) in self.options.iter().enumerate() {
            let default = if i == 0 { " (default)" } else { "" };
            let pending = if kind.is_implemented() {
                ""
            } else {
                " [not yet implemented]"
            };
            report.push_str(&format!("  - {}{}{}\n", kind.label(), default, pending));
        }
        report
    }
}

/// Run the normality check on the first numeric column of the table
///
/// # Example
/// ```
/// use sad::analysis::{assess_normality, Family};
/// use sad::table::Table;
///
/// let table = Table::from_tsv("4.8\n5.1\n5.0\n4.9\n5.2\n5.0\n").unwrap();
/// let verdict = assess_normality(&table).unwrap();
/// assert_eq!(verdict.family, Family::Parametric);
/// ```
pub fn assess_normality(table: &Table) -> Result<NormalityVerdict, AnalysisError> {
    assess_normality_with(table, shapiro_wilk)
}

/// [`assess_normality`] with the normality test supplied by the caller
///
/// The test is only invoked once the column has enough values.
pub fn assess_normality_with<F>(table: &Table, test: F) -> Result<NormalityVerdict, AnalysisError>
where
    F: FnOnce(&[f64]) -> Result<ShapiroWilk, NormalityError>,
{
    let column = table
        .first_numeric_column()
        .ok_or(AnalysisError::NoNumericData)?;
    let values = table.numeric_column(column);

    if values.len() < MIN_NORMALITY_SAMPLES {
        return Err(AnalysisError::InsufficientData {
            needed: MIN_NORMALITY_SAMPLES,
            found: values.len(),
        });
    }

    let result = test(&values)?;
    let family = if result.pvalue > NORMALITY_ALPHA {
        Family::Parametric
    } else {
        Family::NonParametric
    };

    tracing::info!(
        column = %column_label(column),
        n = values.len(),
        w = result.statistic,
        p = result.pvalue,
        family = family.label(),
        "normality check"
    );

    Ok(NormalityVerdict {
        column,
        sample_size: values.len(),
        test: result,
        family,
        options: family.options().to_vec(),
    })
}
