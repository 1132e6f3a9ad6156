use crate::error::CellGridError;
use crate::settings::ViewSettings;

/// A virtualized grid of integer cells that the edit session and selection operate on.
///
/// Implemented by [`ByteStore`](crate::ByteStore) (typed view over a byte buffer) and
/// [`SheetStore`](crate::SheetStore) (fixed spreadsheet with derived totals).
pub trait CellGrid {
    /// Number of rows shown by the grid, including any reserved rows
    fn rows(&self) -> usize;

    /// Number of columns shown by the grid, including any reserved columns
    fn cols(&self) -> usize;

    /// Value of the cell, `None` if there is no data at (row, col)
    fn cell(&self, row: usize, col: usize) -> Option<i64>;

    /// Write the value into the cell.
    ///
    /// # Errors
    /// Returns an error if the cell is out of range or cannot be written.
    fn set_cell(&mut self, row: usize, col: usize, value: i64) -> Result<(), CellGridError>;

    /// Check if the cell accepts edits
    fn is_editable(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_some()
    }

    /// Rows and columns that hold user data (reserved rows/columns excluded)
    fn data_bounds(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// Adjust the requested view settings to what the grid supports
    fn constrain(&self, settings: ViewSettings) -> ViewSettings {
        settings
    }

    /// Re-slice the underlying data according to the view settings
    ///
    /// # Errors
    /// Returns an error if the data cannot be shaped under the new settings.
    fn reinterpret(&mut self, settings: &ViewSettings) -> Result<(), CellGridError>;

    /// Text of the row header
    fn row_label(&self, row: usize) -> String;

    /// Text of the column header
    fn col_label(&self, col: usize) -> String;

    /// Check if the cell differs from the loaded data
    fn is_modified(&self, row: usize, col: usize) -> bool;

    /// Check if any cell differs from the loaded data
    fn has_modifications(&self) -> bool;

    /// Restore all modified cells to their loaded values
    fn restore(&mut self);
}
