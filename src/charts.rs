//! SVG charts embedded in the report
//!
//! Two charts are drawn with plotters' SVG backend: a box plot with one box
//! per numeric column and a histogram of the first column. Both render to an
//! in-memory string so the report can inline them.

use crate::table::{column_label, Table};
use plotters::prelude::*;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("no numeric data to plot")]
    NoNumericData,

    #[error("drawing failed: {0}")]
    Drawing(String),
}

fn drawing<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Drawing(e.to_string())
}

/// One histogram bar: `[lower, upper)` and the number of values inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Split values into `bins` equal-width bins spanning their range
///
/// The last bin includes its upper edge. A constant sample gets a unit-wide
/// range centred on the value.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() {
        return Vec::new();
    }
    let bins = bins.max(1);
    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if hi - lo <= 0.0 {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lower: lo + width * i as f64,
            upper: lo + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Box plot of every numeric column, rendered as an SVG document
pub fn box_plot_svg(table: &Table, size: (u32, u32)) -> Result<String, ChartError> {
    let columns: Vec<(String, Vec<f64>)> = table
        .numeric_columns()
        .into_iter()
        .map(|c| (column_label(c), table.numeric_column(c)))
        .collect();
    if columns.is_empty() {
        return Err(ChartError::NoNumericData);
    }

    let quartiles: Vec<Quartiles> = columns
        .iter()
        .map(|(_, v)| Quartiles::new(v.as_slice()))
        .collect();
    let (lo, hi) = columns
        .iter()
        .flat_map(|(_, v)| v.iter().map(|&x| x as f32))
        .chain(quartiles.iter().flat_map(|q| q.values()))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let pad = ((hi - lo) * 0.1).max(0.5);
    let count = columns.len() as u32;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Box plot", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d((0u32..count).into_segmented(), (lo - pad)..(hi + pad))
            .map_err(drawing)?;

        let labels: Vec<String> = columns.iter().map(|(label, _)| label.clone()).collect();
        let formatter = |v: &SegmentValue<u32>| match v {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                labels.get(*i as usize).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(columns.len() + 1)
            .x_label_formatter(&formatter)
            .y_desc("Value")
            .draw()
            .map_err(drawing)?;

        chart
            .draw_series(quartiles.iter().enumerate().map(|(i, q)| {
                Boxplot::new_vertical(SegmentValue::CenterOf(i as u32), q)
                    .width(30)
                    .whisker_width(0.5)
                    .style(&BLUE)
            }))
            .map_err(drawing)?;

        root.present().map_err(drawing)?;
    }

    tracing::debug!(columns = columns.len(), "rendered box plot");
    Ok(svg)
}

/// Histogram of the first column, rendered as an SVG document
pub fn histogram_svg(table: &Table, bins: usize, size: (u32, u32)) -> Result<String, ChartError> {
    let values = table.numeric_column(0);
    if values.is_empty() {
        return Err(ChartError::NoNumericData);
    }

    let bars = histogram_bins(&values, bins);
    let x_range = match (bars.first(), bars.last()) {
        (Some(first), Some(last)) => first.lower..last.upper,
        _ => return Err(ChartError::NoNumericData),
    };
    let max_count = bars.iter().map(|b| b.count).max().unwrap_or(1) as f64;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Histogram of {}", column_label(0)), ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, 0.0..max_count * 1.1)
            .map_err(drawing)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(column_label(0))
            .y_desc("Count")
            .draw()
            .map_err(drawing)?;

        chart
            .draw_series(bars.iter().map(|b| {
                Rectangle::new(
                    [(b.lower, 0.0), (b.upper, b.count as f64)],
                    BLUE.mix(0.5).filled(),
                )
            }))
            .map_err(drawing)?;

        root.present().map_err(drawing)?;
    }

    tracing::debug!(values = values.len(), bins, "rendered histogram");
    Ok(svg)
}
