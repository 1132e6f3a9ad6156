//! The `document` module ties a [`CellGrid`] to its view settings, edit session, and
//! selection, and drives them from host-independent [`GridInput`] events.

use crate::codec;
use crate::edit::{CellEdit, EditSession};
use crate::error::CellGridError;
use crate::grid::CellGrid;
use crate::input::{Direction, GridInput, GridKey, HitTarget};
use crate::selection::SelectionRegion;
use crate::settings::{Base, ElementWidth, Endianness, ViewSettings};

/// What the host should do after an input was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed
    Ignored,
    /// State changed, repaint
    Redraw,
    /// Close the program
    Quit,
}

#[derive(Debug, Clone)]
pub struct GridDocument<G: CellGrid> {
    grid: G,
    settings: ViewSettings,
    session: EditSession,
    selection: SelectionRegion,
    /// Was the pointer pressed on a cell (drags extend the selection)
    dragging: bool,
}

impl<G: CellGrid> GridDocument<G> {
    /// Wrap the grid, constraining and applying the requested view settings.
    ///
    /// # Errors
    /// Returns an error if the grid cannot be shaped under the settings.
    pub fn new(mut grid: G, settings: ViewSettings) -> Result<Self, CellGridError> {
        let settings = grid.constrain(settings);
        grid.reinterpret(&settings)?;

        Ok(Self {
            grid,
            settings,
            session: EditSession::default(),
            selection: SelectionRegion::default(),
            dragging: false,
        })
    }

    #[must_use]
    pub const fn grid(&self) -> &G {
        &self.grid
    }

    #[must_use]
    pub const fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionRegion {
        &self.selection
    }

    /// Cell that keyboard-started edits and arrow keys act on
    #[must_use]
    pub const fn cursor(&self) -> (usize, usize) {
        self.selection.anchor()
    }

    /// Cell being edited, if any
    #[must_use]
    pub const fn editing(&self) -> Option<&CellEdit> {
        self.session.cell()
    }

    /// Overlay input text for hosts that edit it in place
    pub fn edit_buffer_mut(&mut self) -> Option<&mut String> {
        self.session.buffer_mut()
    }

    /// Maximum characters of a cell under the current settings
    #[must_use]
    pub const fn col_chars(&self) -> usize {
        codec::col_chars(&self.settings)
    }

    /// Formatted value of the cell, `None` if there is no data
    #[must_use]
    pub fn display_cell(&self, row: usize, col: usize) -> Option<String> {
        self.grid
            .cell(row, col)
            .map(|value| codec::format(value, &self.settings))
    }

    /// Commit the active edit, if any.
    ///
    /// # Errors
    /// Returns an error if the grid rejects the typed value.
    pub fn commit(&mut self) -> Result<Option<(usize, usize)>, CellGridError> {
        self.session.commit(&mut self.grid, &self.settings)
    }

    /// Commit any edit, then run `f` on the grid (load, restore, ...) and clamp the
    /// selection into the resulting shape.
    ///
    /// # Errors
    /// Returns the commit error or the error produced by `f`.
    pub fn update_grid<R, F>(&mut self, f: F) -> Result<R, CellGridError>
    where
        F: FnOnce(&mut G, &ViewSettings) -> Result<R, CellGridError>,
    {
        self.commit()?;
        let res = f(&mut self.grid, &self.settings);
        self.clamp_selection();
        res
    }

    /// Restore all modified cells to their loaded values.
    ///
    /// # Errors
    /// Returns an error if committing the active edit fails.
    pub fn restore(&mut self) -> Result<(), CellGridError> {
        self.update_grid(|grid, _| {
            grid.restore();
            Ok(())
        })
    }

    /// Apply new view settings: commit, reinterpret and reshape, then clamp the
    /// selection and cursor into the new shape.
    ///
    /// # Errors
    /// Returns an error if the grid cannot be shaped under the settings. The previous
    /// settings stay in effect in that case.
    pub fn set_settings(&mut self, settings: ViewSettings) -> Result<(), CellGridError> {
        self.commit()?;

        let settings = self.grid.constrain(settings);
        self.grid.reinterpret(&settings)?;
        self.settings = settings;
        self.clamp_selection();
        Ok(())
    }

    /// # Errors
    /// See [`Self::set_settings`].
    pub fn set_width(&mut self, width: ElementWidth) -> Result<(), CellGridError> {
        self.set_settings(self.settings.with_width(width))
    }

    /// # Errors
    /// See [`Self::set_settings`].
    pub fn set_base(&mut self, base: Base) -> Result<(), CellGridError> {
        self.set_settings(self.settings.with_base(base))
    }

    /// # Errors
    /// See [`Self::set_settings`].
    pub fn toggle_signed(&mut self) -> Result<(), CellGridError> {
        self.set_settings(self.settings.with_signed(!self.settings.signed))
    }

    /// # Errors
    /// See [`Self::set_settings`].
    pub fn set_endianness(&mut self, endianness: Endianness) -> Result<(), CellGridError> {
        self.set_settings(self.settings.with_endianness(endianness))
    }

    fn clamp_selection(&mut self) {
        let (rows, cols) = (self.grid.rows(), self.grid.cols());
        if rows == 0 || cols == 0 {
            self.selection = SelectionRegion::default();
            return;
        }

        self.selection = self.selection.clamped(rows, cols).unwrap_or_else(|| {
            let (row, col) = self.selection.anchor();
            SelectionRegion::at(row.min(rows - 1), col.min(cols - 1))
        });
    }

    fn in_grid(&self, row: usize, col: usize) -> bool {
        row < self.grid.rows() && col < self.grid.cols()
    }

    /// Selection as tab/newline text, cut to the data area (totals are never exported)
    #[must_use]
    pub fn copy_selection(&self) -> Option<String> {
        let (rows, cols) = self.grid.data_bounds();
        self.selection
            .clamped(rows, cols)
            .map(|sel| sel.serialize(|row, col| self.display_cell(row, col).unwrap_or_default()))
    }

    /// Write tab/newline separated text into the grid starting at the top-left selected
    /// cell. Empty fields and cells that cannot be edited are skipped.
    /// Returns the number of cells written.
    ///
    /// # Errors
    /// Returns an error if committing the active edit or writing a cell fails.
    pub fn paste(&mut self, text: &str) -> Result<usize, CellGridError> {
        self.commit()?;

        let (top, left) = (self.selection.top, self.selection.left);
        let mut written = 0;
        for (dr, line) in text.lines().enumerate() {
            for (dc, field) in line.split('\t').enumerate() {
                let (row, col) = (top + dr, left + dc);
                if field.trim().is_empty() || !self.grid.is_editable(row, col) {
                    continue;
                }
                let value = codec::parse(field, self.settings.base);
                self.grid.set_cell(row, col, value)?;
                written += 1;
            }
        }
        Ok(written)
    }

    /// Drive the edit session and selection from one input event.
    ///
    /// # Errors
    /// Returns an error if committing an edit fails. The session is idle afterwards.
    pub fn handle(&mut self, input: GridInput) -> Result<Outcome, CellGridError> {
        match input {
            GridInput::Press(HitTarget::Cell { row, col }) if self.in_grid(row, col) => {
                self.session.commit(&mut self.grid, &self.settings)?;
                self.selection.collapse(row, col);
                self.dragging = true;
                // Totals and partial cells are selected but not edited
                self.session
                    .begin(&mut self.grid, row, col, &self.settings)?;
                Ok(Outcome::Redraw)
            }
            GridInput::Press(_) => {
                self.dragging = false;
                let committed = self.commit()?;
                Ok(if committed.is_some() {
                    Outcome::Redraw
                } else {
                    Outcome::Ignored
                })
            }
            GridInput::Drag(HitTarget::Cell { row, col })
                if self.dragging && self.in_grid(row, col) =>
            {
                let mut extended = self.selection;
                extended.extend_to(row, col);
                if extended == self.selection {
                    return Ok(Outcome::Ignored);
                }
                self.commit()?;
                self.selection = extended;
                Ok(Outcome::Redraw)
            }
            GridInput::Drag(_) => Ok(Outcome::Ignored),
            GridInput::Key(key) => self.handle_key(key),
        }
    }

    fn handle_key(&mut self, key: GridKey) -> Result<Outcome, CellGridError> {
        match key {
            GridKey::Escape => {
                self.commit()?;
                Ok(Outcome::Quit)
            }
            GridKey::Enter => {
                if self.session.is_editing() {
                    self.commit()?;
                    return Ok(Outcome::Redraw);
                }
                let (row, col) = self.cursor();
                let began = self
                    .session
                    .begin(&mut self.grid, row, col, &self.settings)?;
                Ok(if began {
                    Outcome::Redraw
                } else {
                    Outcome::Ignored
                })
            }
            GridKey::Char(ch) => {
                let limit = self.col_chars();
                if self.session.type_char(ch, limit) {
                    return Ok(Outcome::Redraw);
                }
                if !codec::is_edit_start_char(ch, self.settings.base) {
                    return Ok(Outcome::Ignored);
                }

                let (row, col) = self.cursor();
                if self
                    .session
                    .begin(&mut self.grid, row, col, &self.settings)?
                {
                    self.session.type_char(ch, limit);
                    return Ok(Outcome::Redraw);
                }
                Ok(Outcome::Ignored)
            }
            GridKey::Backspace => Ok(if self.session.backspace() {
                Outcome::Redraw
            } else {
                Outcome::Ignored
            }),
            GridKey::Arrow(direction) => self.move_cursor(|(row, col), (rows, cols)| {
                match direction {
                    Direction::Up => (row.saturating_sub(1), col),
                    Direction::Down => ((row + 1).min(rows - 1), col),
                    Direction::Left => (row, col.saturating_sub(1)),
                    Direction::Right => (row, (col + 1).min(cols - 1)),
                }
            }),
            GridKey::Tab { backward } => self.move_cursor(|(row, col), (rows, cols)| {
                let index = row * cols + col;
                let index = if backward {
                    index.saturating_sub(1)
                } else {
                    (index + 1).min(rows * cols - 1)
                };
                (index / cols, index % cols)
            }),
        }
    }

    /// Commit, then collapse the selection onto the cell picked by `step` from the
    /// cursor and the grid size
    fn move_cursor<F>(&mut self, step: F) -> Result<Outcome, CellGridError>
    where
        F: FnOnce((usize, usize), (usize, usize)) -> (usize, usize),
    {
        self.commit()?;
        let (rows, cols) = (self.grid.rows(), self.grid.cols());
        if rows == 0 || cols == 0 {
            return Ok(Outcome::Ignored);
        }

        let (row, col) = step(self.cursor(), (rows, cols));
        self.selection.collapse(row, col);
        self.dragging = false;
        Ok(Outcome::Redraw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{MAX_COLS, MAX_ROWS, SheetStore};
    use crate::store::ByteStore;

    fn hex_doc(len: usize) -> GridDocument<ByteStore> {
        let mut store = ByteStore::new();
        assert!(
            store
                .load_bytes(vec![0; len], &ViewSettings::hex_default())
                .is_ok()
        );
        let Ok(doc) = GridDocument::new(store, ViewSettings::hex_default()) else {
            panic!("document expected");
        };
        doc
    }

    fn sheet_doc() -> GridDocument<SheetStore> {
        let Ok(doc) = GridDocument::new(SheetStore::new(), ViewSettings::sheet_default()) else {
            panic!("document expected");
        };
        doc
    }

    fn press(row: usize, col: usize) -> GridInput {
        GridInput::Press(HitTarget::Cell { row, col })
    }

    fn key(ch: char) -> GridInput {
        GridInput::Key(GridKey::Char(ch))
    }

    #[test]
    fn test_press_type_enter() {
        // Arrange
        let mut doc = hex_doc(1000);
        assert!(doc.update_grid(|g, _| g.set_cell(2, 3, 0x1A)).is_ok());

        // Act
        let pressed = doc.handle(press(2, 3));
        let seeded = doc.editing().map(|e| e.buffer.clone());
        let _ = doc.handle(key('2'));
        let _ = doc.handle(key('B'));
        let entered = doc.handle(GridInput::Key(GridKey::Enter));

        // Assert
        assert_eq!(pressed, Ok(Outcome::Redraw));
        assert_eq!(seeded.as_deref(), Some("001A"));
        assert_eq!(entered, Ok(Outcome::Redraw));
        assert_eq!(doc.grid().cell(2, 3), Some(0x2B));
        assert_eq!(doc.display_cell(2, 3).as_deref(), Some("002B"));
        assert!(doc.editing().is_none());
    }

    #[test]
    fn test_typing_starts_edit_on_cursor() {
        // Arrange
        let mut doc = hex_doc(1000);
        let _ = doc.handle(GridInput::Key(GridKey::Arrow(Direction::Right)));

        // Act
        let ignored = doc.handle(key('g'));
        let started = doc.handle(key('f'));
        let _ = doc.handle(GridInput::Key(GridKey::Enter));

        // Assert
        assert_eq!(ignored, Ok(Outcome::Ignored));
        assert_eq!(started, Ok(Outcome::Redraw));
        assert_eq!(doc.grid().cell(0, 1), Some(0xF));
    }

    #[test]
    fn test_enter_begins_edit_on_cursor() {
        // Arrange
        let mut doc = sheet_doc();

        // Act
        let res = doc.handle(GridInput::Key(GridKey::Enter));

        // Assert
        assert_eq!(res, Ok(Outcome::Redraw));
        assert_eq!(doc.editing().map(|e| e.buffer.as_str()), Some("0"));
    }

    #[test]
    fn test_escape_commits_then_quits() {
        // Arrange
        let mut doc = sheet_doc();
        let _ = doc.handle(press(1, 1));
        let _ = doc.handle(key('4'));
        let _ = doc.handle(key('2'));

        // Act
        let res = doc.handle(GridInput::Key(GridKey::Escape));

        // Assert
        assert_eq!(res, Ok(Outcome::Quit));
        assert_eq!(doc.grid().cell(1, 1), Some(42));
    }

    #[test]
    fn test_header_press_commits() {
        // Arrange
        let mut doc = sheet_doc();
        let _ = doc.handle(press(0, 0));
        let _ = doc.handle(key('9'));

        // Act
        let res = doc.handle(GridInput::Press(HitTarget::ColHeader(3)));
        let again = doc.handle(GridInput::Press(HitTarget::DeadZone));

        // Assert
        assert_eq!(res, Ok(Outcome::Redraw));
        assert_eq!(again, Ok(Outcome::Ignored));
        assert_eq!(doc.grid().cell(0, 0), Some(9));
    }

    #[test]
    fn test_totals_press_selects_without_edit() {
        // Arrange
        let mut doc = sheet_doc();

        // Act
        let res = doc.handle(press(MAX_ROWS, 2));

        // Assert
        assert_eq!(res, Ok(Outcome::Redraw));
        assert!(doc.editing().is_none());
        assert_eq!(doc.cursor(), (MAX_ROWS, 2));
        assert_eq!(doc.handle(key('1')), Ok(Outcome::Ignored));
    }

    #[test]
    fn test_drag_extends_selection() {
        // Arrange
        let mut doc = sheet_doc();
        let _ = doc.handle(press(3, 3));

        // Act
        let res = doc.handle(GridInput::Drag(HitTarget::Cell { row: 1, col: 5 }));

        // Assert
        assert_eq!(res, Ok(Outcome::Redraw));
        assert!(doc.editing().is_none());
        let sel = doc.selection();
        assert_eq!((sel.top, sel.left, sel.bottom, sel.right), (1, 3, 3, 5));
    }

    #[test]
    fn test_drag_without_press_is_ignored() {
        let mut doc = sheet_doc();
        let _ = doc.handle(GridInput::Press(HitTarget::DeadZone));
        assert_eq!(
            doc.handle(GridInput::Drag(HitTarget::Cell { row: 1, col: 1 })),
            Ok(Outcome::Ignored)
        );
    }

    #[test]
    fn test_copy_selection() {
        // Arrange
        let mut doc = sheet_doc();
        let _ = doc.handle(press(0, 0));
        let _ = doc.handle(GridInput::Drag(HitTarget::Cell { row: 1, col: 1 }));

        // Act
        let text = doc.copy_selection();

        // Assert
        assert_eq!(text.as_deref(), Some("0\t1\n100\t101\n"));
    }

    #[test]
    fn test_copy_excludes_totals() {
        // Arrange
        let mut doc = sheet_doc();
        let _ = doc.handle(press(MAX_ROWS - 1, MAX_COLS - 1));
        let _ = doc.handle(GridInput::Drag(HitTarget::Cell {
            row: MAX_ROWS,
            col: MAX_COLS,
        }));

        // Act
        let text = doc.copy_selection();
        let _ = doc.handle(press(MAX_ROWS, MAX_COLS));
        let only_totals = doc.copy_selection();

        // Assert
        assert_eq!(text.as_deref(), Some("9999\n"));
        assert_eq!(only_totals, None);
    }

    #[test]
    fn test_paste() {
        // Arrange
        let mut doc = hex_doc(1000);
        let _ = doc.handle(press(1, 98));
        let _ = doc.commit();

        // Act: the third column falls off the grid
        let res = doc.paste("1\t2\t3\n\tFF\n");

        // Assert
        assert_eq!(res, Ok(3));
        assert_eq!(doc.grid().cell(1, 98), Some(1));
        assert_eq!(doc.grid().cell(1, 99), Some(2));
        assert_eq!(doc.grid().cell(2, 98), Some(0));
        assert_eq!(doc.grid().cell(2, 99), Some(0xFF));
    }

    #[test]
    fn test_paste_skips_totals() {
        // Arrange
        let mut doc = sheet_doc();
        let _ = doc.handle(press(0, MAX_COLS - 1));

        // Act
        let res = doc.paste("7\t8\n");

        // Assert
        assert_eq!(res, Ok(1));
        assert_eq!(doc.grid().cell(0, MAX_COLS - 1), Some(7));
    }

    #[test]
    fn test_set_width_clamps_cursor() {
        // Arrange: 1000 bytes as bytes -> 5 x 200
        let mut doc = hex_doc(1000);
        assert!(doc.set_width(ElementWidth::Byte).is_ok());
        let _ = doc.handle(press(4, 150));

        // Act: 1000 bytes as longs -> 5 x 50
        let res = doc.set_width(ElementWidth::Long);

        // Assert
        assert!(res.is_ok());
        assert!(doc.editing().is_none());
        assert_eq!(doc.cursor(), (4, 49));
        assert_eq!(doc.col_chars(), 8);
    }

    #[test]
    fn test_set_settings_commits_edit() {
        // Arrange
        let mut doc = hex_doc(1000);
        let _ = doc.handle(press(0, 0));
        let _ = doc.handle(key('1'));
        let _ = doc.handle(key('0'));

        // Act
        let res = doc.set_base(Base::Decimal);

        // Assert
        assert!(res.is_ok());
        assert_eq!(doc.display_cell(0, 0).as_deref(), Some("16"));
    }

    #[test]
    fn test_sheet_ignores_width_and_sign() {
        // Arrange
        let mut doc = sheet_doc();

        // Act
        let res1 = doc.set_width(ElementWidth::Byte);
        let res2 = doc.toggle_signed();

        // Assert
        assert!(res1.is_ok() && res2.is_ok());
        assert_eq!(doc.settings().width, ElementWidth::Long);
        assert!(doc.settings().signed);
    }

    #[test]
    fn test_tab_wraps_between_rows() {
        // Arrange: 1000 bytes of words is 5 rows of 100 cells
        let mut doc = hex_doc(1000);
        let _ = doc.handle(GridInput::Press(HitTarget::Cell { row: 0, col: 99 }));
        let _ = doc.handle(GridInput::Key(GridKey::Char('5')));

        // Act
        let forward = doc.handle(GridInput::Key(GridKey::Tab { backward: false }));
        let after_tab = doc.cursor();
        let _ = doc.handle(GridInput::Key(GridKey::Tab { backward: true }));
        let after_back = doc.cursor();

        // Assert
        assert_eq!(forward, Ok(Outcome::Redraw));
        assert_eq!(after_tab, (1, 0));
        assert_eq!(after_back, (0, 99));
        assert!(doc.editing().is_none());
        assert_eq!(doc.display_cell(0, 99).as_deref(), Some("0005"));
    }

    #[test]
    fn test_tab_stops_at_grid_ends() {
        // Arrange
        let mut doc = hex_doc(1000);

        // Act
        let _ = doc.handle(GridInput::Key(GridKey::Tab { backward: true }));
        let start = doc.cursor();
        let _ = doc.handle(GridInput::Press(HitTarget::Cell { row: 4, col: 99 }));
        let _ = doc.handle(GridInput::Key(GridKey::Tab { backward: false }));

        // Assert
        assert_eq!(start, (0, 0));
        assert_eq!(doc.cursor(), (4, 99));
    }

    #[test]
    fn test_arrows_stay_in_grid() {
        // Arrange
        let mut doc = hex_doc(1000);

        // Act
        let _ = doc.handle(GridInput::Key(GridKey::Arrow(Direction::Up)));
        let _ = doc.handle(GridInput::Key(GridKey::Arrow(Direction::Left)));
        let top_left = doc.cursor();
        for _ in 0..10 {
            let _ = doc.handle(GridInput::Key(GridKey::Arrow(Direction::Down)));
        }

        // Assert
        assert_eq!(top_left, (0, 0));
        assert_eq!(doc.cursor(), (4, 0));
    }

    #[test]
    fn test_restore() {
        // Arrange
        let mut doc = hex_doc(1000);
        let _ = doc.handle(press(0, 0));
        let _ = doc.handle(key('7'));

        // Act
        let res = doc.restore();

        // Assert
        assert!(res.is_ok());
        assert_eq!(doc.grid().cell(0, 0), Some(0));
        assert!(!doc.grid().has_modifications());
    }
}
