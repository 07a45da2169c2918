// Scenario tests for the normality gate and the analyses behind it
//
// Tables are built the way a user would type them: a numeric response in the
// first column, group labels or a second measurement next to it.

use super::*;
use crate::normality::shapiro_wilk;
use crate::table::{Cell, Table};
use statrs::distribution::{ContinuousCDF, Normal};

/// Expected normal order statistics, a sample that looks textbook normal
fn normal_scores(n: usize) -> Vec<f64> {
    let normal = Normal::standard();
    (1..=n)
        .map(|i| 20.0 + 3.0 * normal.inverse_cdf((i as f64 - 0.375) / (n as f64 + 0.25)))
        .collect()
}

/// Exponential quantiles, heavily right-skewed
fn skewed_scores(n: usize) -> Vec<f64> {
    (1..=n)
        .map(|i| -(1.0 - (i as f64 - 0.5) / n as f64).ln())
        .collect()
}

fn table_with_groups(values: &[f64], labels: &[&str]) -> Table {
    let rows = values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            vec![
                Cell::Number(v),
                Cell::Text(labels[i % labels.len()].to_string()),
            ]
        })
        .collect();
    Table::from_rows(rows).unwrap()
}

fn two_column_table(y: &[f64], x: &[f64]) -> Table {
    let rows = y
        .iter()
        .zip(x)
        .map(|(&a, &b)| vec![Cell::Number(a), Cell::Number(b)])
        .collect();
    Table::from_rows(rows).unwrap()
}

// ---------------------------------------------------------------------------
// Normality gate
// ---------------------------------------------------------------------------

#[test]
fn test_normal_column_offers_parametric_menu() {
    let table = table_with_groups(&normal_scores(20), &["control", "treated"]);
    let verdict = assess_normality(&table).unwrap();

    assert!(verdict.test.pvalue > NORMALITY_ALPHA);
    assert_eq!(verdict.family, Family::Parametric);
    assert_eq!(
        verdict.options,
        vec![AnalysisKind::VarianceAnalysis, AnalysisKind::Regression]
    );
    assert_eq!(verdict.column, 0);
    assert_eq!(verdict.sample_size, 20);
    assert!(verdict.is_normal());
}

#[test]
fn test_skewed_column_offers_non_parametric_menu() {
    let table = table_with_groups(&skewed_scores(40), &["a", "b"]);
    let verdict = assess_normality(&table).unwrap();

    assert!(verdict.test.pvalue <= NORMALITY_ALPHA);
    assert_eq!(verdict.family, Family::NonParametric);
    assert_eq!(
        verdict.options,
        vec![AnalysisKind::MedianTest, AnalysisKind::WilcoxonTest]
    );
}

#[test]
fn test_too_few_values_skips_normality_test() {
    // Two numbers and a blank cell
    let table = Table::from_tsv("1.5\n\n2.5\n").unwrap();
    let mut invoked = false;

    let result = assess_normality_with(&table, |sample| {
        invoked = true;
        shapiro_wilk(sample)
    });

    assert_eq!(
        result,
        Err(AnalysisError::InsufficientData {
            needed: MIN_NORMALITY_SAMPLES,
            found: 2
        })
    );
    assert!(!invoked, "normality test must not run on fewer than 3 values");
}

#[test]
fn test_no_numeric_column() {
    let table = Table::from_tsv("alpha\tbeta\ngamma\tdelta\n").unwrap();
    assert_eq!(
        assess_normality(&table),
        Err(AnalysisError::NoNumericData)
    );
}

#[test]
fn test_first_numeric_column_is_tested() {
    let table = Table::from_tsv("a\t1\t100\nb\t2\t300\nc\t3\t200\nd\t4\t900\n").unwrap();
    let mut seen = Vec::new();
    let verdict = assess_normality_with(&table, |sample| {
        seen = sample.to_vec();
        shapiro_wilk(sample)
    })
    .unwrap();

    assert_eq!(verdict.column, 1);
    assert_eq!(seen, vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_numeric_text_is_coerced() {
    let rows = vec![
        vec![Cell::Text("1.0".to_string())],
        vec![Cell::Text("2.0".to_string())],
        vec![Cell::Number(3.0)],
    ];
    let table = Table::from_rows(rows).unwrap();
    let verdict = assess_normality(&table).unwrap();
    assert_eq!(verdict.sample_size, 3);
}

#[test]
fn test_zero_filled_grid_is_parametric() {
    let table = Table::new(10, 10).unwrap();
    let verdict = assess_normality(&table).unwrap();
    assert_eq!(verdict.family, Family::Parametric);
}

#[test]
fn test_choose_defaults_to_first_option() {
    let table = table_with_groups(&normal_scores(12), &["a", "b"]);
    let verdict = assess_normality(&table).unwrap();

    assert_eq!(verdict.choose(None), Ok(AnalysisKind::VarianceAnalysis));
    assert_eq!(
        verdict.choose(Some(AnalysisKind::Regression)),
        Ok(AnalysisKind::Regression)
    );
    assert_eq!(
        verdict.choose(Some(AnalysisKind::WilcoxonTest)),
        Err(AnalysisError::NotOffered {
            kind: AnalysisKind::WilcoxonTest,
            family: "parametric"
        })
    );
}

#[test]
fn test_verdict_report_lists_menu() {
    let table = table_with_groups(&skewed_scores(40), &["a", "b"]);
    let report = assess_normality(&table).unwrap().to_report_string();

    assert!(report.contains("Data is not normally distributed"));
    assert!(report.contains("Shapiro-Wilk: W="));
    assert!(report.contains("Median test (default) [not yet implemented]"));
    assert!(report.contains("Wilcoxon test"));
}

// ---------------------------------------------------------------------------
// Variance analysis
// ---------------------------------------------------------------------------

/// Two groups with a clear difference in means
///
/// a = [1, 2, 3], b = [4, 5, 6]
/// SS_between = 13.5, SS_within = 4, F(1, 4) = 13.5, p ≈ 0.021
#[test]
fn test_anova_two_groups_matches_hand_computation() {
    let table = Table::from_tsv("1\ta\n2\ta\n3\ta\n4\tb\n5\tb\n6\tb\n").unwrap();
    let anova = one_way_anova(&table).unwrap();

    assert_eq!(anova.n, 6);
    assert_eq!(anova.rows.len(), 2);

    let factor = anova.factor_row().unwrap();
    assert_eq!(factor.source, "C(Col 2)");
    assert_eq!(factor.df, 1);
    assert!((factor.sum_sq - 13.5).abs() < 1e-9);
    let f = factor.f_statistic.unwrap();
    assert!((f - 13.5).abs() < 1e-9);
    let p = factor.p_value.unwrap();
    assert!(p > 0.01 && p < 0.03, "p-value {}", p);

    let residual = &anova.rows[1];
    assert_eq!(residual.source, "Residual");
    assert_eq!(residual.df, 4);
    assert!((residual.sum_sq - 4.0).abs() < 1e-9);
    assert!(residual.f_statistic.is_none());
    assert!(residual.p_value.is_none());

    assert_eq!(anova.groups.len(), 2);
    assert_eq!(anova.groups[0].label, "a");
    assert!((anova.groups[1].mean - 5.0).abs() < 1e-12);
}

#[test]
fn test_anova_degrees_of_freedom_sum_to_n_minus_one() {
    let values = normal_scores(15);
    let table = table_with_groups(&values, &["low", "mid", "high"]);
    let anova = one_way_anova(&table).unwrap();

    assert_eq!(anova.groups.len(), 3);
    assert_eq!(anova.df_total(), anova.n - 1);
    assert_eq!(anova.n, 15);
}

#[test]
fn test_anova_drops_incomplete_rows() {
    let table = Table::from_tsv("1\ta\n2\t\n\tb\n4\tb\n5\tb\n3\ta\n").unwrap();
    let anova = one_way_anova(&table).unwrap();
    assert_eq!(anova.n, 4);
    assert_eq!(anova.df_total(), 3);
}

#[test]
fn test_anova_identical_groups_not_significant() {
    let table = Table::from_tsv("1\tx\n2\tx\n3\tx\n1\ty\n2\ty\n3\ty\n").unwrap();
    let anova = one_way_anova(&table).unwrap();
    let factor = anova.factor_row().unwrap();
    assert!(factor.sum_sq.abs() < 1e-9);
    assert!(factor.p_value.unwrap() > 0.99);
}

#[test]
fn test_anova_numeric_factor_used_as_labels() {
    let table = Table::from_tsv("10\t1\n12\t1\n20\t2\n22\t2\n").unwrap();
    let anova = one_way_anova(&table).unwrap();
    assert_eq!(anova.factor, "Col 2");
    let labels: Vec<&str> = anova.groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["1", "2"]);
}

#[test]
fn test_anova_requires_two_columns() {
    let table = Table::from_tsv("1\n2\n3\n").unwrap();
    assert!(matches!(
        one_way_anova(&table),
        Err(AnalysisError::InsufficientColumns { found: 1, .. })
    ));
}

#[test]
fn test_anova_requires_factor_values() {
    let table = Table::from_tsv("1\t\n2\t\n3\t\n").unwrap();
    assert_eq!(one_way_anova(&table), Err(AnalysisError::NoFactorColumn));
}

#[test]
fn test_anova_requires_two_groups() {
    let table = Table::from_tsv("1\tsame\n2\tsame\n3\tsame\n").unwrap();
    assert_eq!(one_way_anova(&table), Err(AnalysisError::TooFewGroups(1)));
}

#[test]
fn test_anova_requires_more_observations_than_groups() {
    let table = Table::from_tsv("1\ta\n2\tb\n").unwrap();
    assert_eq!(
        one_way_anova(&table),
        Err(AnalysisError::InsufficientData {
            needed: 3,
            found: 2
        })
    );
}

#[test]
fn test_anova_report_string() {
    let table = Table::from_tsv("1\ta\n2\ta\n3\ta\n4\tb\n5\tb\n6\tb\n").unwrap();
    let report = one_way_anova(&table).unwrap().to_report_string();
    assert!(report.contains("sum_sq"));
    assert!(report.contains("PR(>F)"));
    assert!(report.contains("C(Col 2)"));
    assert!(report.contains("Residual"));
}

// ---------------------------------------------------------------------------
// Regression
// ---------------------------------------------------------------------------

#[test]
fn test_regression_recovers_linear_trend() {
    let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let y = [3.1, 4.9, 7.2, 8.8, 11.1, 13.0];
    let summary = simple_regression(&two_column_table(&y, &x)).unwrap();

    assert_eq!(summary.coefficients.len(), 2);
    assert_eq!(summary.intercept().name, "const");
    assert_eq!(summary.slope().name, "Col 2");
    assert!((summary.slope().estimate - 2.0).abs() < 0.2);
    assert!((summary.intercept().estimate - 1.0).abs() < 0.5);
    assert!(summary.slope().p_value < 0.001);

    assert!((0.0..=1.0).contains(&summary.r_squared));
    assert!(summary.r_squared > 0.99);
    assert_eq!(summary.n, 6);
    assert_eq!(summary.df_model, 1);
    assert_eq!(summary.df_resid, 4);

    let t = summary.slope().t_value;
    assert!((summary.f_statistic - t * t).abs() < 1e-6 * summary.f_statistic);
}

#[test]
fn test_regression_r_squared_in_unit_interval_for_noise() {
    let y = [5.0, 3.0, 8.0, 1.0, 7.0, 2.0, 6.0, 4.0];
    let x = [2.0, 7.0, 1.0, 8.0, 3.0, 6.0, 5.0, 4.0];
    let summary = simple_regression(&two_column_table(&y, &x)).unwrap();
    assert_eq!(summary.coefficients.len(), 2);
    assert!((0.0..=1.0).contains(&summary.r_squared));
}

#[test]
fn test_regression_skips_text_columns_and_incomplete_rows() {
    let table = Table::from_tsv("2\tx\t1\n4\ty\t2\n\tz\t3\n8\tw\t4\n10\tv\t\n12\tu\t6\n").unwrap();
    let summary = simple_regression(&table).unwrap();
    assert_eq!(summary.response, "Col 1");
    assert_eq!(summary.predictor, "Col 3");
    assert_eq!(summary.n, 4);
}

#[test]
fn test_regression_requires_two_numeric_columns() {
    let table = Table::from_tsv("1\ta\n2\tb\n3\tc\n").unwrap();
    assert_eq!(
        simple_regression(&table),
        Err(AnalysisError::InsufficientColumns {
            analysis: "regression",
            needed: 2,
            found: 1
        })
    );
}

#[test]
fn test_regression_requires_three_complete_rows() {
    let table = Table::from_tsv("1\t2\n3\t\n5\t6\n").unwrap();
    assert_eq!(
        simple_regression(&table),
        Err(AnalysisError::InsufficientData {
            needed: 3,
            found: 2
        })
    );
}

#[test]
fn test_regression_constant_predictor_is_model_error() {
    let table = two_column_table(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]);
    assert!(matches!(
        simple_regression(&table),
        Err(AnalysisError::ModelFit(_))
    ));
}

#[test]
fn test_regression_report_string() {
    let x = [1.0, 2.0, 3.0, 4.0, 5.0];
    let y = [2.2, 3.9, 6.1, 8.0, 9.8];
    let report = simple_regression(&two_column_table(&y, &x))
        .unwrap()
        .to_report_string();
    assert!(report.contains("OLS Regression Results"));
    assert!(report.contains("R-squared:"));
    assert!(report.contains("const"));
    assert!(report.contains("P>|t|"));
}

#[test]
fn test_regression_report_keeps_columns_apart_for_exact_fit() {
    let coefficient = |name: &str, estimate: f64, std_error: f64| Coefficient {
        name: name.to_string(),
        estimate,
        std_error,
        t_value: estimate / std_error,
        p_value: 0.0,
    };
    let summary = RegressionSummary {
        response: "Col 1".to_string(),
        predictor: "Col 2".to_string(),
        n: 5,
        df_model: 1,
        df_resid: 3,
        r_squared: 1.0,
        adj_r_squared: 1.0,
        f_statistic: 3.6e30,
        f_pvalue: 0.0,
        coefficients: vec![
            coefficient("const", 1.0, 1.057_754_370_045_5e-15),
            coefficient("Col 2", 2.0, 3.2e-16),
        ],
    };

    let report = summary.to_report_string();
    for name in ["const", "Col 2"] {
        let line = report
            .lines()
            .find(|l| l.starts_with(name))
            .unwrap_or_else(|| panic!("no row for {}", name));
        let fields: Vec<&str> = line[name.len()..].split_whitespace().collect();
        assert_eq!(fields.len(), 4, "fields run together in {:?}", line);
        assert!(fields[1].contains('e'), "tiny std err should be scientific: {}", line);
    }
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

#[test]
fn test_unimplemented_analyses_return_placeholder() {
    // Even a table nothing could be computed from
    let table = Table::from_tsv("only text\n").unwrap();
    for kind in [AnalysisKind::MedianTest, AnalysisKind::WilcoxonTest] {
        let result = execute(kind, &table).unwrap();
        assert!(result.is_placeholder());
        assert_eq!(
            result.to_report_string().trim_end(),
            format!("Analysis '{}' is not yet implemented.", kind.label())
        );
    }
}

#[test]
fn test_execute_dispatches_to_analysis() {
    let table = Table::from_tsv("1\ta\n2\ta\n3\ta\n4\tb\n5\tb\n6\tb\n").unwrap();
    assert!(matches!(
        execute(AnalysisKind::VarianceAnalysis, &table),
        Ok(AnalysisResult::Anova(_))
    ));

    let table = two_column_table(&[1.0, 2.5, 2.9, 4.2], &[1.0, 2.0, 3.0, 4.0]);
    assert!(matches!(
        execute(AnalysisKind::Regression, &table),
        Ok(AnalysisResult::Regression(_))
    ));
}

#[test]
fn test_execute_propagates_failures() {
    let table = Table::from_tsv("1\n2\n3\n").unwrap();
    assert!(execute(AnalysisKind::Regression, &table).is_err());
    assert!(execute(AnalysisKind::VarianceAnalysis, &table).is_err());
}

#[test]
fn test_full_workflow_default_choice() {
    let table = table_with_groups(&normal_scores(18), &["a", "b", "c"]);
    let verdict = assess_normality(&table).unwrap();
    let kind = verdict.choose(None).unwrap();
    let result = execute(kind, &table).unwrap();

    match result {
        AnalysisResult::Anova(anova) => assert_eq!(anova.df_total(), 17),
        other => panic!("expected ANOVA, got {:?}", other),
    }
}

#[test]
fn test_result_serializes_with_kind_tag() {
    let result = AnalysisResult::Placeholder {
        message: placeholder_message(AnalysisKind::MedianTest),
    };
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["kind"], "placeholder");
    assert_eq!(json["message"], "Analysis 'Median test' is not yet implemented.");
}

#[test]
fn test_error_messages_are_user_facing() {
    let err = AnalysisError::InsufficientData {
        needed: 3,
        found: 1,
    };
    assert_eq!(
        err.to_string(),
        "Not enough data for analysis: at least 3 values are required, found 1"
    );
    assert_eq!(
        AnalysisError::NoNumericData.to_string(),
        "The table has no numeric data to analyze"
    );
}
