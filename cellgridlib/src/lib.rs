//! # `cellgridlib`
//!
//! `cellgridlib` is the core of a grid editor that edits integer cells in place through a
//! single overlay text input. It backs two kinds of documents:
//! - A byte-level hex view of a flat buffer (via [`ByteStore`]), where the same bytes can be
//!   reinterpreted as 1, 2, 3 or 4 byte cells, signed or unsigned.
//! - A fixed 100 x 100 spreadsheet (via [`SheetStore`]) with a derived totals row and column.
//!
//! The library provides:
//! - Number formatting and parsing in base 8, 10 and 16 (see [`codec`]).
//! - Automatic grid shaping from the buffer length (see [`GridShape`]).
//! - The edit session state machine (see [`EditSession`]) and input dispatch
//!   (see [`GridDocument`]).
//! - Rectangular selection with a tab/newline export (see [`SelectionRegion`]).
//! - Error handling with [`CellGridError`].
//!
//! ## Example
//!
//! ```
//! use cellgridlib::{ByteStore, GridDocument, GridInput, GridKey, HitTarget, ViewSettings};
//!
//! let settings = ViewSettings::hex_default();
//! let mut store = ByteStore::new();
//! store.load_bytes(vec![0u8; 1000], &settings).unwrap();
//!
//! let mut doc = GridDocument::new(store, settings).unwrap();
//! doc.handle(GridInput::Press(HitTarget::Cell { row: 0, col: 1 })).unwrap();
//! doc.handle(GridInput::Key(GridKey::Char('7'))).unwrap();
//! doc.handle(GridInput::Key(GridKey::Enter)).unwrap();
//!
//! assert_eq!(doc.display_cell(0, 1).as_deref(), Some("0007"));
//! ```

pub mod codec;
mod document;
mod edit;
mod error;
mod grid;
mod input;
mod selection;
mod settings;
mod shape;
mod sheet;
mod store;

// Public APIs
pub use document::{GridDocument, Outcome};
pub use edit::{CellEdit, EditSession};
pub use error::{CellGridError, CellGridErrorKind};
pub use grid::CellGrid;
pub use input::{Direction, GridInput, GridKey, HitTarget};
pub use selection::SelectionRegion;
pub use settings::{Base, ElementWidth, Endianness, ViewSettings};
pub use shape::{FALLBACK_ROW_BYTES, GridShape, ROW_BYTES_CANDIDATES, auto_width};
pub use sheet::{MAX_COLS, MAX_ROWS, SheetStore};
pub use store::ByteStore;
