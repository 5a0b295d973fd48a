#![forbid(unsafe_code)]

//! Pluggable precondition checking for table operations.
//!
//! Every public [`Table`] operation calls the matching [`TableValidator`]
//! method before touching any state; a validator that returns an error
//! aborts the call with nothing mutated, attached, or detached. The table
//! never substitutes its own validation logic — the default method bodies
//! here ARE the standard capacity/range/width checks, and a concrete
//! validator overrides individual methods to layer domain rules on top
//! (raising [`CollectionError::Validation`] or
//! [`CollectionError::InvalidItem`]).
//!
//! [`Table`]: crate::table::Table

use gridlist_core::{CollectionError, Result};

use crate::table::TableRow;

/// A read-only snapshot of a table's dimensions and capacity bounds, passed
/// to every validator method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDims {
    /// Current number of rows.
    pub row_count: usize,
    /// Current (tracked) number of columns.
    pub column_count: usize,
    /// Row-dimension capacity window.
    pub min_rows: usize,
    /// Row-dimension capacity ceiling.
    pub max_rows: usize,
    /// Column-dimension capacity floor.
    pub min_columns: usize,
    /// Column-dimension capacity ceiling.
    pub max_columns: usize,
}

fn check_index(what: &'static str, value: usize, len: usize) -> Result<()> {
    if value >= len {
        return Err(CollectionError::range(
            what,
            value,
            0,
            len.saturating_sub(1),
        ));
    }
    Ok(())
}

fn check_insert_index(what: &'static str, value: usize, len: usize) -> Result<()> {
    if value > len {
        return Err(CollectionError::range(what, value, 0, len));
    }
    Ok(())
}

fn check_window(index: usize, count: usize, len: usize) -> Result<()> {
    check_insert_index("index", index, len)?;
    let end = index
        .checked_add(count)
        .ok_or_else(|| CollectionError::range("count", count, 0, len))?;
    if end > len {
        return Err(CollectionError::range("count", count, 0, len - index));
    }
    Ok(())
}

fn check_length(what: &'static str, value: usize, min: usize, max: usize) -> Result<()> {
    if value < min || value > max {
        return Err(CollectionError::range(what, value, min, max));
    }
    Ok(())
}

/// Row widths must be uniform; returns the shared width (or `None` for an
/// empty batch).
fn uniform_width<R: TableRow>(rows: &[R]) -> Result<Option<usize>> {
    let mut widths = rows.iter().map(|r| r.items().len());
    let Some(first) = widths.next() else {
        return Ok(None);
    };
    for w in widths {
        if w != first {
            return Err(CollectionError::InvalidItem(format!(
                "row width {w} differs from {first}"
            )));
        }
    }
    Ok(Some(first))
}

/// Check incoming rows against the table: uniform width, matching the
/// current column count when rows exist, within column bounds when the
/// table is empty (the empty table adopts the incoming width).
fn check_row_widths<R: TableRow>(dims: TableDims, rows: &[R]) -> Result<()> {
    let Some(width) = uniform_width(rows)? else {
        return Ok(());
    };
    if dims.row_count == 0 {
        check_length("row width", width, dims.min_columns, dims.max_columns)
    } else if width != dims.column_count {
        Err(CollectionError::InvalidItem(format!(
            "row width {width} != column count {}",
            dims.column_count
        )))
    } else {
        Ok(())
    }
}

fn check_column_heights<T>(dims: TableDims, columns: &[Vec<T>]) -> Result<()> {
    for col in columns {
        if col.len() != dims.row_count {
            return Err(CollectionError::InvalidItem(format!(
                "column height {} != row count {}",
                col.len(),
                dims.row_count
            )));
        }
    }
    Ok(())
}

/// Precondition strategy with one method per table operation family.
///
/// Default bodies implement the standard checks; override to add domain
/// rules. All methods are pure: return `Ok(())` or an error, mutate nothing.
pub trait TableValidator<R: TableRow> {
    /// Read of `count` rows starting at `index`.
    fn get_row(&self, dims: TableDims, index: usize, count: usize) -> Result<()> {
        check_window(index, count, dims.row_count)
    }

    /// Read of `count` columns starting at `index`.
    fn get_column(&self, dims: TableDims, index: usize, count: usize) -> Result<()> {
        check_window(index, count, dims.column_count)
    }

    /// Read of one cell.
    fn get_item(&self, dims: TableDims, row: usize, column: usize) -> Result<()> {
        check_index("row", row, dims.row_count)?;
        check_index("column", column, dims.column_count)
    }

    /// In-place replacement of rows starting at `index`.
    fn set_row(&self, dims: TableDims, index: usize, rows: &[R]) -> Result<()> {
        check_window(index, rows.len(), dims.row_count)?;
        check_row_widths(dims, rows)
    }

    /// In-place replacement of columns starting at `index`.
    fn set_column(&self, dims: TableDims, index: usize, columns: &[Vec<R::Item>]) -> Result<()> {
        check_window(index, columns.len(), dims.column_count)?;
        check_column_heights(dims, columns)
    }

    /// Replacement of one cell.
    fn set_item(&self, dims: TableDims, row: usize, column: usize, item: &R::Item) -> Result<()> {
        let _ = item;
        check_index("row", row, dims.row_count)?;
        check_index("column", column, dims.column_count)
    }

    /// Insertion of rows at `index` (`index == row_count` appends).
    fn insert_row(&self, dims: TableDims, index: usize, rows: &[R]) -> Result<()> {
        check_insert_index("index", index, dims.row_count)?;
        check_length(
            "row count",
            dims.row_count + rows.len(),
            dims.min_rows,
            dims.max_rows,
        )?;
        check_row_widths(dims, rows)
    }

    /// Insertion of columns at `index`.
    fn insert_column(&self, dims: TableDims, index: usize, columns: &[Vec<R::Item>]) -> Result<()> {
        check_insert_index("index", index, dims.column_count)?;
        check_length(
            "column count",
            dims.column_count + columns.len(),
            dims.min_columns,
            dims.max_columns,
        )?;
        check_column_heights(dims, columns)
    }

    /// Replace-then-append of rows starting at `index`.
    fn overwrite_row(&self, dims: TableDims, index: usize, rows: &[R]) -> Result<()> {
        check_insert_index("index", index, dims.row_count)?;
        let resulting = dims.row_count.max(index + rows.len());
        check_length("row count", resulting, dims.min_rows, dims.max_rows)?;
        check_row_widths(dims, rows)
    }

    /// Replace-then-append of columns starting at `index`.
    fn overwrite_column(
        &self,
        dims: TableDims,
        index: usize,
        columns: &[Vec<R::Item>],
    ) -> Result<()> {
        check_insert_index("index", index, dims.column_count)?;
        let resulting = dims.column_count.max(index + columns.len());
        check_length("column count", resulting, dims.min_columns, dims.max_columns)?;
        check_column_heights(dims, columns)
    }

    /// Relocation of a block of rows.
    fn move_row(&self, dims: TableDims, old_index: usize, new_index: usize, count: usize) -> Result<()> {
        check_window(old_index, count, dims.row_count)?;
        check_window(new_index, count, dims.row_count)
    }

    /// Relocation of a block of columns.
    fn move_column(
        &self,
        dims: TableDims,
        old_index: usize,
        new_index: usize,
        count: usize,
    ) -> Result<()> {
        check_window(old_index, count, dims.column_count)?;
        check_window(new_index, count, dims.column_count)
    }

    /// Removal of rows.
    fn remove_row(&self, dims: TableDims, index: usize, count: usize) -> Result<()> {
        check_window(index, count, dims.row_count)?;
        check_length(
            "row count",
            dims.row_count - count,
            dims.min_rows,
            dims.max_rows,
        )
    }

    /// Removal of columns.
    fn remove_column(&self, dims: TableDims, index: usize, count: usize) -> Result<()> {
        check_window(index, count, dims.column_count)?;
        check_length(
            "column count",
            dims.column_count - count,
            dims.min_columns,
            dims.max_columns,
        )
    }

    /// Resize of both dimensions.
    fn adjust_length(&self, dims: TableDims, row_length: usize, column_length: usize) -> Result<()> {
        check_length("row count", row_length, dims.min_rows, dims.max_rows)?;
        check_length(
            "column count",
            column_length,
            dims.min_columns,
            dims.max_columns,
        )
    }

    /// Wholesale replacement of the row set.
    fn reset(&self, dims: TableDims, rows: &[R]) -> Result<()> {
        check_length("row count", rows.len(), dims.min_rows, dims.max_rows)?;
        if let Some(width) = uniform_width(rows)? {
            check_length("row width", width, dims.min_columns, dims.max_columns)?;
        }
        Ok(())
    }

    /// Reset to minimum-capacity default content.
    fn clear(&self, dims: TableDims) -> Result<()> {
        let _ = dims;
        Ok(())
    }
}

/// The default validator: exactly the standard capacity/range/width checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapacityValidator;

impl<R: TableRow> TableValidator<R> for CapacityValidator {}
