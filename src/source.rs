//! Data source abstraction.
//!
//! The grid never owns cell data; it pulls displayable values on demand
//! while filling a materialized row. Implementations are synchronous and
//! side-effect free. The row axis has no upper bound known to the core.

use crate::error::Result;

/// Supplies cell values for the grid.
pub trait DataSource {
    /// Number of columns per row. Read once at construction and assumed
    /// stable for the lifetime of the manager.
    fn number_of_columns(&self) -> usize;

    /// Displayable value for one cell.
    ///
    /// # Errors
    /// A failure here is scoped to the single cell: the caller blanks the
    /// cell, records the failure, and continues with the rest of the row.
    fn get_item(&self, row: u64, col: usize) -> Result<String>;
}

impl<T: DataSource + ?Sized> DataSource for &T {
    fn number_of_columns(&self) -> usize {
        (**self).number_of_columns()
    }

    fn get_item(&self, row: u64, col: usize) -> Result<String> {
        (**self).get_item(row, col)
    }
}
