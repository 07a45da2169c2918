//! Property-based tests for the core workflow
//!
//! Covers:
//! 1. Shapiro-Wilk statistic and p-value ranges
//! 2. Normality gate routing and its input requirements
//! 3. ANOVA degrees of freedom
//! 4. Regression coefficient count and R² range
//! 5. Placeholder analyses never failing
//! 6. Clipboard parsing and table TSV persistence, blank rows included

use proptest::prelude::*;
use sad::analysis::{
    assess_normality, execute, one_way_anova, simple_regression, AnalysisError, AnalysisKind,
    Family, NORMALITY_ALPHA,
};
use sad::clipboard::{paste, parse_block};
use sad::normality::shapiro_wilk;
use sad::table::{Cell, Table};

fn column_table(values: &[f64]) -> Table {
    Table::from_rows(values.iter().map(|&v| vec![Cell::Number(v)]).collect()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_shapiro_wilk_ranges(sample in prop::collection::vec(-1000.0f64..1000.0, 3..200)) {
        let result = shapiro_wilk(&sample).unwrap();
        prop_assert!(result.statistic > 0.0 && result.statistic <= 1.0);
        prop_assert!((0.0..=1.0).contains(&result.pvalue));
        prop_assert_eq!(result.n, sample.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_gate_routes_on_pvalue(sample in prop::collection::vec(-100.0f64..100.0, 3..60)) {
        let verdict = assess_normality(&column_table(&sample)).unwrap();
        let expected = if verdict.test.pvalue > NORMALITY_ALPHA {
            Family::Parametric
        } else {
            Family::NonParametric
        };
        prop_assert_eq!(verdict.family, expected);
        prop_assert_eq!(verdict.options.as_slice(), expected.options());
    }

    #[test]
    fn prop_gate_requires_three_values(sample in prop::collection::vec(-100.0f64..100.0, 0..3)) {
        // Pad with blanks so the table always has a row
        let mut rows: Vec<Vec<Cell>> = sample.iter().map(|&v| vec![Cell::Number(v)]).collect();
        rows.push(vec![Cell::Empty]);
        let table = Table::from_rows(rows).unwrap();

        let err = assess_normality(&table).unwrap_err();
        if sample.is_empty() {
            prop_assert_eq!(err, AnalysisError::NoNumericData);
        } else {
            prop_assert_eq!(err, AnalysisError::InsufficientData { needed: 3, found: sample.len() });
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_anova_df_sums_to_n_minus_one(
        values in prop::collection::vec(-50.0f64..50.0, 6..40),
        groups in 2usize..4,
    ) {
        let rows = values
            .iter()
            .enumerate()
            .map(|(i, &v)| vec![Cell::Number(v), Cell::Text(format!("g{}", i % groups))])
            .collect();
        let table = Table::from_rows(rows).unwrap();

        let anova = one_way_anova(&table).unwrap();
        prop_assert_eq!(anova.n, values.len());
        prop_assert_eq!(anova.df_total(), values.len() - 1);
        let p = anova.factor_row().unwrap().p_value.unwrap();
        prop_assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn prop_regression_shape(
        y in prop::collection::vec(-50.0f64..50.0, 3..40),
        slope in -5.0f64..5.0,
    ) {
        // Distinct predictor values keep the design matrix full rank
        let rows = y
            .iter()
            .enumerate()
            .map(|(i, &v)| vec![Cell::Number(v + slope * i as f64), Cell::Number(i as f64)])
            .collect();
        let table = Table::from_rows(rows).unwrap();

        match simple_regression(&table) {
            Ok(summary) => {
                prop_assert_eq!(summary.coefficients.len(), 2);
                prop_assert!((0.0..=1.0).contains(&summary.r_squared));
                prop_assert_eq!(summary.df_resid, y.len() - 2);
            }
            // A constant response has nothing to explain
            Err(AnalysisError::ModelFit(_)) => {}
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_placeholder_never_fails(tsv in "[a-z0-9\t\n.]{1,60}") {
        let Ok(table) = Table::from_tsv(&tsv) else {
            return Ok(());
        };
        for kind in [AnalysisKind::MedianTest, AnalysisKind::WilcoxonTest] {
            let result = execute(kind, &table).unwrap();
            prop_assert!(result.is_placeholder());
        }
    }

    #[test]
    fn prop_parse_block_is_rectangular(text in "[a-z0-9 \t\r\n.-]{0,80}") {
        if let Ok(block) = parse_block(&text) {
            prop_assert!(block.rows() >= 1);
            prop_assert!(block.cells().iter().all(|r| r.len() == block.columns()));
        }
    }

    #[test]
    fn prop_paste_without_grow_never_resizes(
        rows in 1usize..6,
        cols in 1usize..6,
        row in 0usize..6,
        col in 0usize..6,
    ) {
        let mut table = Table::new(rows, cols).unwrap();
        let block = parse_block("1\t2\n3\t4").unwrap();
        let fits = row + 2 <= rows && col + 2 <= cols;

        let result = paste(&mut table, &block, row, col, false);
        prop_assert_eq!(result.is_ok(), fits);
        prop_assert_eq!((table.row_count(), table.column_count()), (rows, cols));
    }

    #[test]
    fn prop_tsv_round_trip_preserves_cells(
        columns in 1usize..5,
        values in prop::collection::vec(
            prop::collection::vec(prop::option::of(-1.0e6f64..1.0e6), 5),
            1..8,
        ),
    ) {
        // None stands for a blank cell, so whole rows can be blank
        let rows: Vec<Vec<Cell>> = values
            .iter()
            .map(|r| {
                r.iter()
                    .take(columns)
                    .map(|v| v.map_or(Cell::Empty, Cell::Number))
                    .collect()
            })
            .collect();
        let table = Table::from_rows(rows).unwrap();
        let reloaded = Table::from_tsv(&table.to_tsv()).unwrap();
        prop_assert_eq!(reloaded.row_count(), table.row_count());
        prop_assert_eq!(reloaded, table);
    }

    #[test]
    fn prop_single_column_blank_rows_survive(
        blanks in prop::collection::vec(any::<bool>(), 1..10),
    ) {
        let rows: Vec<Vec<Cell>> = blanks
            .iter()
            .map(|&blank| vec![if blank { Cell::Empty } else { Cell::Number(1.0) }])
            .collect();
        let table = Table::from_rows(rows).unwrap();
        let reloaded = Table::from_tsv(&table.to_tsv()).unwrap();
        prop_assert_eq!(reloaded, table);
    }
}
