// One-way analysis of variance
//
// The model is fitted as an OLS regression of the response on dummy-coded
// factor levels (first level as baseline). The factor sum of squares is the
// part of the total variation the dummies explain; F is tested against the
// Fisher-Snedecor distribution.

use crate::analysis::AnalysisError;
use crate::table::{column_label, Table};
use linregress::{FormulaRegressionBuilder, RegressionDataBuilder};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use std::collections::BTreeMap;

/// One line of the ANOVA table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaRow {
    pub source: String,
    pub sum_sq: f64,
    pub df: usize,
    /// Absent for the residual row
    pub f_statistic: Option<f64>,
    pub p_value: Option<f64>,
}

/// Size and mean of one factor level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub label: String,
    pub n: usize,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaTable {
    pub response: String,
    pub factor: String,
    /// Observations used in the fit
    pub n: usize,
    /// Factor row first, residual row last
    pub rows: Vec<AnovaRow>,
    pub groups: Vec<GroupSummary>,
}

impl AnovaTable {
    /// Sum of the degrees of freedom over all rows (n - 1)
    pub fn df_total(&self) -> usize {
        self.rows.iter().map(|r| r.df).sum()
    }

    pub fn factor_row(&self) -> Option<&AnovaRow> {
        self.rows.first()
    }

    pub fn to_report_string(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!(
            "One-way ANOVA: {} ~ C({})  (n={})\n\n",
            self.response, self.factor, self.n
        ));
        report.push_str(&format!(
            "{:<16} {:>14} {:>6} {:>12} {:>12}\n",
            "", "sum_sq", "df", "F", "PR(>F)"
        ));
        for row in &self.rows {
            let f = row
                .f_statistic
                .map(|v| format!("{:.6}", v))
                .unwrap_or_else(|| "NaN".to_string());
            let p = row
                .p_value
                .map(|v| format!("{:.6}", v))
                .unwrap_or_else(|| "NaN".to_string());
            report.push_str(&format!(
                "{:<16} {:>14.6} {:>6} {:>12} {:>12}\n",
                row.source, row.sum_sq, row.df, f, p
            ));
        }

        report.push_str("\nGroups:\n");
        for group in &self.groups {
            report.push_str(&format!(
                "  {:<14} n={:<5} mean={:.4}\n",
                group.label, group.n, group.mean
            ));
        }
        report
    }
}

/// Pick the factor column: the first other column holding text, else the
/// first other column with any values (used as category labels)
fn factor_column(table: &Table, response: usize) -> Option<usize> {
    let others = || (0..table.column_count()).filter(move |&c| c != response);
    others()
        .find(|&c| table.has_text(c))
        .or_else(|| others().find(|&c| table.column_cells(c).any(|cell| !cell.is_empty())))
}

/// Fit a one-way ANOVA of the first numeric column on a factor column
pub fn one_way_anova(table: &Table) -> Result<AnovaTable, AnalysisError> {
    if table.column_count() < 2 {
        return Err(AnalysisError::InsufficientColumns {
            analysis: "variance analysis",
            needed: 2,
            found: table.column_count(),
        });
    }

    let response = table
        .first_numeric_column()
        .ok_or(AnalysisError::NoNumericData)?;
    let factor = factor_column(table, response).ok_or(AnalysisError::NoFactorColumn)?;

    // Level label -> response values, levels in sorted order
    let mut levels: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in table.rows() {
        let Some(value) = row[response].as_number() else {
            continue;
        };
        let level = &row[factor];
        if level.is_empty() {
            continue;
        }
        levels.entry(level.to_raw()).or_default().push(value);
    }

    let k = levels.len();
    if k < 2 {
        return Err(AnalysisError::TooFewGroups(k));
    }
    let n: usize = levels.values().map(Vec::len).sum();
    if n <= k {
        return Err(AnalysisError::InsufficientData {
            needed: k + 1,
            found: n,
        });
    }

    let y: Vec<f64> = levels.values().flatten().copied().collect();
    let grand_mean = y.iter().sum::<f64>() / n as f64;
    let total_ss: f64 = y.iter().map(|v| (v - grand_mean).powi(2)).sum();
    if total_ss == 0.0 {
        return Err(AnalysisError::ModelFit(
            "response column has no variance".to_string(),
        ));
    }

    // Dummy columns for every level but the first
    let sizes: Vec<usize> = levels.values().map(Vec::len).collect();
    let mut columns: Vec<(String, Vec<f64>)> = vec![("y".to_string(), y)];
    let mut regressors = Vec::with_capacity(k - 1);
    for level in 1..k {
        let name = format!("level{}", level);
        let dummy = sizes
            .iter()
            .enumerate()
            .flat_map(|(j, &size)| {
                let indicator = if j == level { 1.0 } else { 0.0 };
                std::iter::repeat(indicator).take(size)
            })
            .collect();
        regressors.push(name.clone());
        columns.push((name, dummy));
    }

    let data = RegressionDataBuilder::new().build_from(columns)?;
    let model = FormulaRegressionBuilder::new()
        .data(&data)
        .data_columns("y", regressors)
        .fit()?;

    let residual_ss = model.ssr().max(0.0);
    let factor_ss = (total_ss - residual_ss).max(0.0);
    let df_factor = k - 1;
    let df_resid = n - k;

    let f_statistic = if residual_ss > 0.0 {
        (factor_ss / df_factor as f64) / (residual_ss / df_resid as f64)
    } else {
        f64::INFINITY
    };
    let distribution = FisherSnedecor::new(df_factor as f64, df_resid as f64)
        .map_err(|e| AnalysisError::ModelFit(e.to_string()))?;
    let p_value = distribution.sf(f_statistic);

    tracing::debug!(
        n,
        groups = k,
        factor_ss,
        residual_ss,
        f_statistic,
        p_value,
        "one-way ANOVA"
    );

    let factor_label = column_label(factor);
    let groups = levels
        .iter()
        .map(|(label, values)| GroupSummary {
            label: label.clone(),
            n: values.len(),
            mean: values.iter().sum::<f64>() / values.len() as f64,
        })
        .collect();

    Ok(AnovaTable {
        response: column_label(response),
        factor: factor_label.clone(),
        n,
        rows: vec![
            AnovaRow {
                source: format!("C({})", factor_label),
                sum_sq: factor_ss,
                df: df_factor,
                f_statistic: Some(f_statistic),
                p_value: Some(p_value),
            },
            AnovaRow {
                source: "Residual".to_string(),
                sum_sq: residual_ss,
                df: df_resid,
                f_statistic: None,
                p_value: None,
            },
        ],
        groups,
    })
}
