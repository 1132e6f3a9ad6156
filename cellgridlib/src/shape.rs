//! The `shape` module derives the number of rows and columns of a byte grid from the
//! buffer length and the element width ("auto-shape").

use crate::error::{CellGridError, CellGridErrorKind};
use tracing::trace;

/// Preferred row widths in bytes, in order of preference
pub const ROW_BYTES_CANDIDATES: [usize; 3] = [200, 416, 640];
/// Row width used when no candidate divides the buffer length
pub const FALLBACK_ROW_BYTES: usize = 32;

/// Pick the row width in bytes for a buffer: the first candidate that divides
/// `count` evenly, otherwise [`FALLBACK_ROW_BYTES`].
///
/// # Example
/// ```
/// use cellgridlib::auto_width;
///
/// assert_eq!(auto_width(2000), 200);
/// assert_eq!(auto_width(832), 416);
/// assert_eq!(auto_width(1280), 640);
/// assert_eq!(auto_width(100), 32);
/// ```
#[must_use]
pub fn auto_width(count: usize) -> usize {
    ROW_BYTES_CANDIDATES
        .into_iter()
        .find(|candidate| count.is_multiple_of(*candidate))
        .unwrap_or(FALLBACK_ROW_BYTES)
}

/// Derived layout of a byte grid. Never persisted, always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridShape {
    /// Number of rows, the last one may be partially filled
    pub rows: usize,
    /// Number of cells per row
    pub cols: usize,
    /// Bytes per cell (element width)
    pub bytes_per_col: usize,
    /// Bytes covered by one row (`cols * bytes_per_col`)
    pub row_bytes: usize,
}

impl GridShape {
    /// Compute the grid shape for `count` bytes cut into cells of `bytes_per_col` bytes.
    ///
    /// The row width comes from [`auto_width`]. When the element width does not divide it
    /// (3-byte cells), the row covers the largest whole number of cells that fit.
    ///
    /// # Errors
    /// Returns an error if the element width leaves no columns (or is zero).
    ///
    /// # Example
    /// ```
    /// use cellgridlib::GridShape;
    ///
    /// let shape = GridShape::reshape(1000, 2).unwrap();
    ///
    /// assert_eq!(shape.bytes_per_col, 2);
    /// assert_eq!(shape.row_bytes, 200);
    /// assert_eq!(shape.cols, 100);
    /// assert_eq!(shape.rows, 5);
    /// ```
    pub fn reshape(count: usize, bytes_per_col: usize) -> Result<Self, CellGridError> {
        let degenerate = || {
            CellGridError::ShapeError(CellGridErrorKind::DegenerateShape {
                count,
                bytes_per_col,
            })
        };

        if bytes_per_col == 0 {
            return Err(degenerate());
        }

        let cols = auto_width(count) / bytes_per_col;
        if cols == 0 {
            return Err(degenerate());
        }

        let row_bytes = cols * bytes_per_col;
        let rows = count.div_ceil(row_bytes);

        trace!(count, bytes_per_col, rows, cols, "reshaped grid");

        Ok(Self {
            rows,
            cols,
            bytes_per_col,
            row_bytes,
        })
    }

    /// Byte offset of the cell, regardless of whether the buffer reaches it
    #[must_use]
    pub const fn offset_of(&self, row: usize, col: usize) -> usize {
        (row * self.cols + col) * self.bytes_per_col
    }

    /// Check if (row, col) lies inside the shape
    #[must_use]
    pub const fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }
}
