//! The `error` module defines the [`CellGridError`] enum that describes the errors that
//! can occur when loading, saving, shaping, or editing a cell grid.
//! It contains two pieces of information:
//! 1. When the error occurs, e.g., during loading a file or updating a cell.
//! 2. What kind of error was encountered (via [`CellGridErrorKind`] enum).
//!
//! There is no parse error: malformed numeric input degrades to a partial parse.

use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellGridError {
    LoadError(CellGridErrorKind),
    SaveError(CellGridErrorKind),
    UpdateError(CellGridErrorKind),
    ShapeError(CellGridErrorKind),
}

impl CellGridError {
    /// Kind of the underlying error
    #[must_use]
    pub const fn kind(&self) -> &CellGridErrorKind {
        match self {
            Self::LoadError(kind)
            | Self::SaveError(kind)
            | Self::UpdateError(kind)
            | Self::ShapeError(kind) => kind,
        }
    }
}

impl fmt::Display for CellGridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadError(base_err) => {
                write!(f, "Error encountered during file loading:\n{base_err}")
            }
            Self::SaveError(base_err) => {
                write!(f, "Error encountered during file saving:\n{base_err}")
            }
            Self::UpdateError(base_err) => {
                write!(f, "Error encountered during update of cell data:\n{base_err}")
            }
            Self::ShapeError(base_err) => {
                write!(f, "Error encountered during grid shaping:\n{base_err}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellGridErrorKind {
    /// File could not be opened, read, created, or written
    Io(String),
    /// Fewer bytes were read than the file length reported
    ShortRead { expected: usize, actual: usize },
    /// File is larger than the address space can hold
    TooLarge { size: u64 },
    /// Document has no file path to save to
    NoFilePath,
    /// CSV content could not be read or written
    Csv(String),
    /// Cell is outside of the grid or past the end of the data
    InvalidCell(usize, usize),
    /// Cell holds a derived value and cannot be written
    ReadOnlyCell(usize, usize),
    /// Element width leaves no columns for the chosen row width
    DegenerateShape { count: usize, bytes_per_col: usize },
}

impl fmt::Display for CellGridErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => {
                write!(f, "{msg}")
            }
            Self::ShortRead { expected, actual } => {
                write!(f, "Can't read {expected} bytes, got {actual}")
            }
            Self::TooLarge { size } => {
                write!(f, "File of {size} bytes is too large to load")
            }
            Self::NoFilePath => {
                write!(f, "No file path to save to")
            }
            Self::Csv(msg) => {
                write!(f, "Invalid CSV content: {msg}")
            }
            Self::InvalidCell(row, col) => {
                write!(f, "No cell data at row {row}, column {col}")
            }
            Self::ReadOnlyCell(row, col) => {
                write!(f, "Cell at row {row}, column {col} is read-only")
            }
            Self::DegenerateShape {
                count,
                bytes_per_col,
            } => {
                write!(
                    f,
                    "Cannot shape {count} bytes into columns of {bytes_per_col} byte(s)"
                )
            }
        }
    }
}

impl From<std::io::Error> for CellGridErrorKind {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<csv::Error> for CellGridErrorKind {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl Error for CellGridError {}
impl Error for CellGridErrorKind {}
