//! In-memory data grid backing the analysis workflow
//!
//! The grid is a rectangular block of cells addressed by ordinal position.
//! Cells hold either a number, free text, or nothing. Column identity is just
//! the column index; display labels are `Col N` / `Row N` (1-based).
//!
//! Tables persist as tab-separated text, the same format the clipboard uses.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised by grid operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Cell ({row}, {col}) is outside the {rows}x{cols} table")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Cannot remove the last remaining row")]
    LastRow,

    #[error("Cannot remove the last remaining column")]
    LastColumn,

    #[error("Table must have at least one row and one column (got {rows}x{cols})")]
    ZeroSize { rows: usize, cols: usize },

    #[error("Table text contains no rows")]
    Empty,
}

/// A single grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Cell {
    /// Interpret raw user input as a cell value
    ///
    /// Blank input and `NaN` are missing values. Finite numbers become
    /// `Number`; everything else is kept as text. Tabs and newlines are
    /// flattened to spaces so the cell survives a TSV round trip.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            Ok(v) if v.is_nan() => Cell::Empty,
            _ => Cell::Text(trimmed.replace(['\t', '\n', '\r'], " ")),
        }
    }

    /// Numeric value of the cell, coercing numeric-looking text
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            Cell::Empty => None,
        }
    }

    /// True for text that cannot be coerced to a number
    pub fn is_text(&self) -> bool {
        matches!(self, Cell::Text(_)) && self.as_number().is_none()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Raw text as written to a TSV file
    pub fn to_raw(&self) -> String {
        match self {
            Cell::Number(v) => v.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Empty => String::new(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => write!(f, "NaN"),
            other => write!(f, "{}", other.to_raw()),
        }
    }
}

/// Label shown for a column index (`Col 1`, `Col 2`, ...)
pub fn column_label(col: usize) -> String {
    format!("Col {}", col + 1)
}

/// Label shown for a row index (`Row 1`, `Row 2`, ...)
pub fn row_label(row: usize) -> String {
    format!("Row {}", row + 1)
}

/// Rectangular grid of cells
///
/// Always holds at least one row and one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    rows: Vec<Vec<Cell>>,
    #[serde(skip)]
    columns: usize,
}

impl Table {
    /// Create a zero-filled table
    pub fn new(rows: usize, columns: usize) -> Result<Self, TableError> {
        if rows == 0 || columns == 0 {
            return Err(TableError::ZeroSize {
                rows,
                cols: columns,
            });
        }
        Ok(Self {
            rows: vec![vec![Cell::Number(0.0); columns]; rows],
            columns,
        })
    }

    /// Build a table from parsed rows, padding ragged rows with empty cells
    pub fn from_rows(mut rows: Vec<Vec<Cell>>) -> Result<Self, TableError> {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if rows.is_empty() || columns == 0 {
            return Err(TableError::Empty);
        }
        for row in &mut rows {
            row.resize(columns, Cell::Empty);
        }
        Ok(Self { rows, columns })
    }

    /// Parse tab-separated text (one row per line)
    ///
    /// Only the final line ending is dropped. Every other line is a row, so a
    /// blank line reads back as a row of empty cells.
    pub fn from_tsv(text: &str) -> Result<Self, TableError> {
        if text.is_empty() {
            return Err(TableError::Empty);
        }
        let body = text.strip_suffix('\n').unwrap_or(text);
        let body = body.strip_suffix('\r').unwrap_or(body);
        Self::from_rows(parse_rows(body))
    }

    /// Serialize as tab-separated text with a trailing newline
    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(Cell::to_raw).collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out
    }

    /// Load a table file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read table file: {}", path.display()))?;
        let table = Self::from_tsv(&content)
            .with_context(|| format!("Failed to parse table file: {}", path.display()))?;
        tracing::debug!(
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded table from {}",
            path.display()
        );
        Ok(table)
    }

    /// Write the table file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_tsv())
            .with_context(|| format!("Failed to write table file: {}", path.display()))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<(), TableError> {
        if row >= self.rows.len() || col >= self.columns {
            return Err(TableError::OutOfBounds {
                row,
                col,
                rows: self.rows.len(),
                cols: self.columns,
            });
        }
        Ok(())
    }

    pub fn get(&self, row: usize, col: usize) -> Result<&Cell, TableError> {
        self.check_bounds(row, col)?;
        Ok(&self.rows[row][col])
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), TableError> {
        self.check_bounds(row, col)?;
        self.rows[row][col] = cell;
        Ok(())
    }

    /// Store raw user input, parsed with [`Cell::parse`]
    pub fn set_text(&mut self, row: usize, col: usize, raw: &str) -> Result<(), TableError> {
        self.set(row, col, Cell::parse(raw))
    }

    /// Append a zero-filled row
    pub fn add_row(&mut self) {
        self.rows.push(vec![Cell::Number(0.0); self.columns]);
    }

    /// Drop the last row
    pub fn remove_row(&mut self) -> Result<(), TableError> {
        if self.rows.len() <= 1 {
            return Err(TableError::LastRow);
        }
        self.rows.pop();
        Ok(())
    }

    /// Append a zero-filled column
    pub fn add_column(&mut self) {
        for row in &mut self.rows {
            row.push(Cell::Number(0.0));
        }
        self.columns += 1;
    }

    /// Drop the last column
    pub fn remove_column(&mut self) -> Result<(), TableError> {
        if self.columns <= 1 {
            return Err(TableError::LastColumn);
        }
        for row in &mut self.rows {
            row.pop();
        }
        self.columns -= 1;
        Ok(())
    }

    /// Grow (never shrink) the table to at least `rows` x `columns`
    pub fn ensure_size(&mut self, rows: usize, columns: usize) {
        while self.columns < columns {
            self.add_column();
        }
        while self.rows.len() < rows {
            self.add_row();
        }
    }

    /// Iterate over the cells of one column, top to bottom
    pub fn column_cells(&self, col: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(move |row| row.get(col))
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Coerced numeric values of a column with missing values dropped
    pub fn numeric_column(&self, col: usize) -> Vec<f64> {
        self.column_cells(col).filter_map(Cell::as_number).collect()
    }

    /// A column is numeric when at least one cell coerces to a number
    pub fn is_numeric_column(&self, col: usize) -> bool {
        self.column_cells(col).any(|c| c.as_number().is_some())
    }

    /// A column holds text when at least one cell cannot be coerced
    pub fn has_text(&self, col: usize) -> bool {
        self.column_cells(col).any(Cell::is_text)
    }

    /// Indexes of all numeric columns, left to right
    pub fn numeric_columns(&self) -> Vec<usize> {
        (0..self.columns)
            .filter(|&c| self.is_numeric_column(c))
            .collect()
    }

    pub fn first_numeric_column(&self) -> Option<usize> {
        (0..self.columns).find(|&c| self.is_numeric_column(c))
    }
}

/// Split tab/newline-delimited text into rows of parsed cells
pub(crate) fn parse_rows(text: &str) -> Vec<Vec<Cell>> {
    text.split('\n')
        .map(|line| {
            line.trim_end_matches('\r')
                .split('\t')
                .map(Cell::parse)
                .collect()
        })
        .collect()
}

impl fmt::Display for Table {
    /// Right-aligned textual dump with `Col N` headers and `Row N` labels
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<String> = (0..self.columns).map(column_label).collect();
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();

        let label_width = row_label(self.rows.len().saturating_sub(1)).len();
        let widths: Vec<usize> = (0..self.columns)
            .map(|c| {
                cells
                    .iter()
                    .map(|row| row[c].chars().count())
                    .chain(std::iter::once(headers[c].len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:label_width$}", "")?;
        for (header, width) in headers.iter().zip(&widths) {
            write!(f, "  {:>width$}", header, width = width)?;
        }
        writeln!(f)?;

        for (r, row) in cells.iter().enumerate() {
            write!(f, "{:<label_width$}", row_label(r))?;
            for (value, width) in row.iter().zip(&widths) {
                write!(f, "  {:>width$}", value, width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
