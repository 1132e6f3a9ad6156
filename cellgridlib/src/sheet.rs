//! The `sheet` module provides [`SheetStore`], a fixed-size spreadsheet of signed 32-bit
//! integers with a derived totals row and totals column.

use crate::codec;
use crate::error::{CellGridError, CellGridErrorKind};
use crate::grid::CellGrid;
use crate::settings::{Base, ElementWidth, ViewSettings};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Number of data rows (the totals row comes after them)
pub const MAX_ROWS: usize = 100;
/// Number of data columns (the totals column comes after them)
pub const MAX_COLS: usize = 100;

const TOTAL_LABEL: &str = "TOTAL";

#[derive(Debug, Clone)]
pub struct SheetStore {
    /// Path of the CSV the sheet was loaded from (empty for new sheets)
    pub filepath: PathBuf,
    /// Row-major data values
    values: Vec<i32>,
    /// Original values of the edited cells keyed by index
    modified: BTreeMap<usize, i32>,
}

impl Default for SheetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetStore {
    /// Creates a sheet where the cell at (row, col) holds `col + row * 100`.
    ///
    /// # Examples
    /// ```
    /// use cellgridlib::{CellGrid, SheetStore};
    ///
    /// let sheet = SheetStore::new();
    /// assert_eq!(sheet.cell(1, 2), Some(102));
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn new() -> Self {
        Self {
            filepath: PathBuf::new(),
            values: (0..MAX_ROWS * MAX_COLS).map(|i| i as i32).collect(),
            modified: BTreeMap::new(),
        }
    }

    const fn index(row: usize, col: usize) -> usize {
        row * MAX_COLS + col
    }

    /// Stored value of a data cell
    #[must_use]
    pub fn value(&self, row: usize, col: usize) -> Option<i32> {
        (row < MAX_ROWS && col < MAX_COLS).then(|| self.values[Self::index(row, col)])
    }

    /// Sum of column `col` over all data rows
    #[must_use]
    pub fn sum_rows(&self, col: usize) -> i64 {
        (0..MAX_ROWS)
            .map(|row| i64::from(self.values[Self::index(row, col)]))
            .sum()
    }

    /// Sum of row `row` over all data columns
    #[must_use]
    pub fn sum_cols(&self, row: usize) -> i64 {
        let start = Self::index(row, 0);
        self.values[start..start + MAX_COLS]
            .iter()
            .map(|&v| i64::from(v))
            .sum()
    }

    /// Sum of every data cell
    #[must_use]
    pub fn sum_all(&self) -> i64 {
        self.values.iter().map(|&v| i64::from(v)).sum()
    }

    /// Replaces the data area with the contents of a CSV file.
    ///
    /// Fields are parsed as decimal. Missing cells become 0 and fields outside the data
    /// area are ignored.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or is not valid CSV.
    /// The previous values are kept in that case.
    #[allow(clippy::cast_possible_truncation)]
    pub fn load_csv<P: AsRef<Path>>(&mut self, filepath: P) -> Result<(), CellGridError> {
        let load_err = |err: csv::Error| CellGridError::LoadError(err.into());

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&filepath)
            .map_err(load_err)?;

        let mut values = vec![0i32; MAX_ROWS * MAX_COLS];
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(load_err)?;
            if row >= MAX_ROWS {
                continue;
            }
            for (col, field) in record.iter().take(MAX_COLS).enumerate() {
                values[Self::index(row, col)] = codec::parse(field.trim(), Base::Decimal) as i32;
            }
        }

        debug!(path = %filepath.as_ref().display(), "read sheet");
        self.values = values;
        self.modified.clear();
        self.filepath = filepath.as_ref().to_path_buf();
        Ok(())
    }

    /// Writes the data area (totals excluded) as CSV.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn save_csv<P: AsRef<Path>>(&self, filepath: P) -> Result<(), CellGridError> {
        let save_err = |err: csv::Error| CellGridError::SaveError(err.into());

        if let Some(parent) = filepath.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|err| CellGridError::SaveError(err.into()))?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&filepath)
            .map_err(save_err)?;

        for row in self.values.chunks(MAX_COLS) {
            writer
                .write_record(row.iter().map(ToString::to_string))
                .map_err(save_err)?;
        }
        writer
            .flush()
            .map_err(|err| CellGridError::SaveError(err.into()))?;

        debug!(path = %filepath.as_ref().display(), "wrote sheet");
        Ok(())
    }

    /// Writes the sheet back to the file it was loaded from.
    ///
    /// # Errors
    /// Returns an error if there is no file path or the file cannot be written.
    pub fn save(&self) -> Result<(), CellGridError> {
        if self.filepath.as_os_str().is_empty() {
            return Err(CellGridError::SaveError(CellGridErrorKind::NoFilePath));
        }
        self.save_csv(&self.filepath)
    }
}

/// Spreadsheet column name: `A..Z`, then two letters
fn column_name(n: usize) -> String {
    let letter = |i: usize| char::from(b'A' + u8::try_from(i % 26).unwrap_or(0));
    if n < 26 {
        letter(n).to_string()
    } else {
        format!("{}{}", letter(n / 26 - 1), letter(n % 26))
    }
}

impl CellGrid for SheetStore {
    fn rows(&self) -> usize {
        MAX_ROWS + 1
    }

    fn cols(&self) -> usize {
        MAX_COLS + 1
    }

    fn cell(&self, row: usize, col: usize) -> Option<i64> {
        match (row, col) {
            (MAX_ROWS, MAX_COLS) => Some(self.sum_all()),
            (MAX_ROWS, c) if c < MAX_COLS => Some(self.sum_rows(c)),
            (r, MAX_COLS) if r < MAX_ROWS => Some(self.sum_cols(r)),
            (r, c) => self.value(r, c).map(i64::from),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn set_cell(&mut self, row: usize, col: usize, value: i64) -> Result<(), CellGridError> {
        if row > MAX_ROWS || col > MAX_COLS {
            return Err(CellGridError::UpdateError(CellGridErrorKind::InvalidCell(
                row, col,
            )));
        }
        if row == MAX_ROWS || col == MAX_COLS {
            return Err(CellGridError::UpdateError(
                CellGridErrorKind::ReadOnlyCell(row, col),
            ));
        }

        let idx = Self::index(row, col);
        let prev = self.values[idx];
        let value = value as i32;
        if prev != value {
            match self.modified.get(&idx) {
                Some(&orig) if orig == value => {
                    self.modified.remove(&idx);
                }
                Some(_) => {}
                None => {
                    self.modified.insert(idx, prev);
                }
            }
            self.values[idx] = value;
        }
        Ok(())
    }

    fn is_editable(&self, row: usize, col: usize) -> bool {
        row < MAX_ROWS && col < MAX_COLS
    }

    fn data_bounds(&self) -> (usize, usize) {
        (MAX_ROWS, MAX_COLS)
    }

    /// Cells are always signed 32-bit, only the base can change
    fn constrain(&self, settings: ViewSettings) -> ViewSettings {
        settings.with_width(ElementWidth::Long).with_signed(true)
    }

    fn reinterpret(&mut self, _settings: &ViewSettings) -> Result<(), CellGridError> {
        Ok(())
    }

    fn row_label(&self, row: usize) -> String {
        if row == MAX_ROWS {
            TOTAL_LABEL.to_string()
        } else {
            (row + 1).to_string()
        }
    }

    fn col_label(&self, col: usize) -> String {
        if col == MAX_COLS {
            TOTAL_LABEL.to_string()
        } else {
            column_name(col)
        }
    }

    fn is_modified(&self, row: usize, col: usize) -> bool {
        self.is_editable(row, col) && self.modified.contains_key(&Self::index(row, col))
    }

    fn has_modifications(&self) -> bool {
        !self.modified.is_empty()
    }

    fn restore(&mut self) {
        for (&idx, &orig_value) in &self.modified {
            self.values[idx] = orig_value;
        }
        self.modified.clear();
    }
}
