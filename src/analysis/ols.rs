// Simple linear regression: first numeric column on the second, with intercept

use crate::analysis::AnalysisError;
use crate::table::{column_label, Table};
use linregress::{FormulaRegressionBuilder, RegressionDataBuilder};
use serde::Serialize;

const MIN_OBSERVATIONS: usize = 3;

/// Estimate and inference for one model term
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_value: f64,
    pub p_value: f64,
}

/// Fitted OLS model with its summary statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionSummary {
    pub response: String,
    pub predictor: String,
    /// Complete observations used in the fit
    pub n: usize,
    pub df_model: usize,
    pub df_resid: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_pvalue: f64,
    /// Intercept (`const`) first, then the predictor
    pub coefficients: Vec<Coefficient>,
}

impl RegressionSummary {
    pub fn intercept(&self) -> &Coefficient {
        &self.coefficients[0]
    }

    pub fn slope(&self) -> &Coefficient {
        &self.coefficients[1]
    }

    pub fn to_report_string(&self) -> String {
        let rule = "=".repeat(72);
        let thin = "-".repeat(72);
        let mut report = String::new();

        report.push_str("OLS Regression Results\n");
        report.push_str(&format!("{}\n", rule));
        report.push_str(&format!(
            "{:<18}{:>16}    {:<18}{:>16.4}\n",
            "Dep. Variable:", self.response, "R-squared:", self.r_squared
        ));
        report.push_str(&format!(
            "{:<18}{:>16}    {:<18}{:>16.4}\n",
            "Model:", "OLS", "Adj. R-squared:", self.adj_r_squared
        ));
        report.push_str(&format!(
            "{:<18}{:>16}    {:<18}{:>16.4}\n",
            "No. Observations:", self.n, "F-statistic:", self.f_statistic
        ));
        report.push_str(&format!(
            "{:<18}{:>16}    {:<18}{:>16.4e}\n",
            "Df Residuals:", self.df_resid, "Prob (F-statistic):", self.f_pvalue
        ));
        report.push_str(&format!("{:<18}{:>16}\n", "Df Model:", self.df_model));
        report.push_str(&format!("{}\n", rule));
        report.push_str(&format!(
            "{:<12} {:>13} {:>13} {:>13} {:>13}\n",
            "", "coef", "std err", "t", "P>|t|"
        ));
        report.push_str(&format!("{}\n", thin));
        for c in &self.coefficients {
            report.push_str(&format!(
                "{:<12} {:>13} {:>13} {:>13} {:>13}\n",
                c.name,
                stat_cell(c.estimate, 4),
                stat_cell(c.std_error, 4),
                stat_cell(c.t_value, 3),
                stat_cell(c.p_value, 3)
            ));
        }
        report.push_str(&format!("{}\n", rule));
        report
    }
}

/// Fixed-point when it fits a 13-character column, scientific otherwise
fn stat_cell(value: f64, decimals: usize) -> String {
    let magnitude = value.abs();
    if !value.is_finite() || magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        format!("{:.*}", decimals, value)
    } else {
        format!("{:.*e}", decimals, value)
    }
}

fn has_spread(values: &[f64]) -> bool {
    values.windows(2).any(|w| w[0] != w[1])
}

/// Regress the first numeric column on the second numeric column
///
/// Only rows where both columns hold a number are used.
pub fn simple_regression(table: &Table) -> Result<RegressionSummary, AnalysisError> {
    let numeric = table.numeric_columns();
    if numeric.len() < 2 {
        return Err(AnalysisError::InsufficientColumns {
            analysis: "regression",
            needed: 2,
            found: numeric.len(),
        });
    }
    let (y_col, x_col) = (numeric[0], numeric[1]);

    let (y, x): (Vec<f64>, Vec<f64>) = table
        .rows()
        .iter()
        .filter_map(|row| Some((row[y_col].as_number()?, row[x_col].as_number()?)))
        .unzip();

    let n = y.len();
    if n < MIN_OBSERVATIONS {
        return Err(AnalysisError::InsufficientData {
            needed: MIN_OBSERVATIONS,
            found: n,
        });
    }
    if !has_spread(&x) {
        return Err(AnalysisError::ModelFit(format!(
            "predictor {} has no variance",
            column_label(x_col)
        )));
    }
    if !has_spread(&y) {
        return Err(AnalysisError::ModelFit(format!(
            "response {} has no variance",
            column_label(y_col)
        )));
    }

    let data = RegressionDataBuilder::new().build_from(vec![("y", y), ("x", x)])?;
    let model = FormulaRegressionBuilder::new()
        .data(&data)
        .data_columns("y", ["x"])
        .fit()?;

    let predictor = column_label(x_col);
    let names = ["const".to_string(), predictor.clone()];
    let coefficients: Vec<Coefficient> = names
        .into_iter()
        .zip(model.parameters())
        .zip(model.se())
        .zip(model.p_values())
        .map(|(((name, &estimate), &std_error), &p_value)| Coefficient {
            name,
            estimate,
            std_error,
            t_value: estimate / std_error,
            p_value,
        })
        .collect();

    if coefficients.len() != 2 {
        return Err(AnalysisError::ModelFit(format!(
            "expected 2 coefficients, got {}",
            coefficients.len()
        )));
    }

    // One predictor: the overall F test is the slope's t test squared
    let slope = &coefficients[1];
    let f_statistic = slope.t_value * slope.t_value;
    let f_pvalue = slope.p_value;
    let r_squared = model.rsquared().clamp(0.0, 1.0);

    tracing::debug!(n, r_squared, f_statistic, f_pvalue, "OLS regression");

    Ok(RegressionSummary {
        response: column_label(y_col),
        predictor,
        n,
        df_model: 1,
        df_resid: n - 2,
        r_squared,
        adj_r_squared: model.rsquared_adj(),
        f_statistic,
        f_pvalue,
        coefficients,
    })
}
