//! Clipboard-style block transfer for the grid
//!
//! Pasted text is tab-separated columns and newline-separated rows, the
//! format spreadsheets put on the clipboard. A parsed block is written into
//! the table with its top-left corner at a target cell.

use crate::table::{parse_rows, Cell, Table, TableError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClipboardError {
    #[error("Clipboard text is empty")]
    Empty,

    #[error(
        "Pasted block of {block_rows}x{block_cols} at ({row}, {col}) does not fit the {rows}x{cols} table"
    )]
    OutOfBounds {
        block_rows: usize,
        block_cols: usize,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Rectangular block of parsed cells
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    cells: Vec<Vec<Cell>>,
    columns: usize,
}

impl Block {
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cells(&self) -> &[Vec<Cell>] {
        &self.cells
    }
}

/// Parse clipboard text into a block
///
/// Surrounding whitespace is stripped first, then the text is split on
/// newlines and tabs. Short rows are padded with empty cells.
pub fn parse_block(text: &str) -> Result<Block, ClipboardError> {
    let body = text.trim();
    if body.is_empty() {
        return Err(ClipboardError::Empty);
    }

    let mut cells = parse_rows(body);
    let columns = cells.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut cells {
        row.resize(columns, Cell::Empty);
    }

    Ok(Block { cells, columns })
}

/// Write a block into the table with its top-left corner at (`row`, `col`)
///
/// With `grow` the table is extended to fit the block; otherwise a block
/// that runs past the edge is rejected and the table is left untouched.
pub fn paste(
    table: &mut Table,
    block: &Block,
    row: usize,
    col: usize,
    grow: bool,
) -> Result<(), ClipboardError> {
    let out_of_bounds = ClipboardError::OutOfBounds {
        block_rows: block.rows(),
        block_cols: block.columns(),
        row,
        col,
        rows: table.row_count(),
        cols: table.column_count(),
    };
    let (Some(needed_rows), Some(needed_cols)) = (
        row.checked_add(block.rows()),
        col.checked_add(block.columns()),
    ) else {
        return Err(out_of_bounds);
    };

    if grow {
        table.ensure_size(needed_rows, needed_cols);
    } else if needed_rows > table.row_count() || needed_cols > table.column_count() {
        return Err(out_of_bounds);
    }

    for (r, cells) in block.cells().iter().enumerate() {
        for (c, cell) in cells.iter().enumerate() {
            table.set(row + r, col + c, cell.clone())?;
        }
    }

    tracing::debug!(
        rows = block.rows(),
        columns = block.columns(),
        row,
        col,
        "pasted block"
    );
    Ok(())
}

/// Text of a single cell, as it would be copied to the clipboard
pub fn copy_cell(table: &Table, row: usize, col: usize) -> Result<String, ClipboardError> {
    Ok(table.get(row, col)?.to_raw())
}
