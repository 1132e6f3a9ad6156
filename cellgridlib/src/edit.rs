use crate::codec;
use crate::error::CellGridError;
use crate::grid::CellGrid;
use crate::settings::ViewSettings;
use tracing::debug;

/// Text being typed into one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEdit {
    pub row: usize,
    pub col: usize,
    /// Text of the overlay input
    pub buffer: String,
    /// Is the whole buffer selected (next typed char replaces it)
    pub selected_all: bool,
}

/// At most one cell is edited at a time. Every exit from `Editing` commits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditSession {
    #[default]
    Idle,
    Editing(CellEdit),
}

impl EditSession {
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    /// Cell being edited
    #[must_use]
    pub const fn cell(&self) -> Option<&CellEdit> {
        match self {
            Self::Idle => None,
            Self::Editing(edit) => Some(edit),
        }
    }

    /// Start editing the cell, seeding the buffer with its formatted value.
    /// Any active edit is committed first.
    ///
    /// Returns `false` if the cell is not editable.
    ///
    /// # Errors
    /// Returns an error if committing the previous edit fails.
    pub fn begin<G: CellGrid + ?Sized>(
        &mut self,
        grid: &mut G,
        row: usize,
        col: usize,
        settings: &ViewSettings,
    ) -> Result<bool, CellGridError> {
        self.commit(grid, settings)?;

        if !grid.is_editable(row, col) {
            return Ok(false);
        }
        let Some(value) = grid.cell(row, col) else {
            return Ok(false);
        };

        debug!(row, col, value, "edit begin");
        *self = Self::Editing(CellEdit {
            row,
            col,
            buffer: codec::format(value, settings),
            selected_all: true,
        });
        Ok(true)
    }

    /// Feed a typed character into the buffer, keeping at most `limit` characters.
    /// Returns `false` when idle.
    pub fn type_char(&mut self, ch: char, limit: usize) -> bool {
        let Self::Editing(edit) = self else {
            return false;
        };

        if edit.selected_all {
            edit.buffer.clear();
            edit.selected_all = false;
        }
        if edit.buffer.chars().count() < limit {
            edit.buffer.push(ch);
        }
        true
    }

    pub fn backspace(&mut self) -> bool {
        let Self::Editing(edit) = self else {
            return false;
        };

        if edit.selected_all {
            edit.buffer.clear();
            edit.selected_all = false;
        } else {
            edit.buffer.pop();
        }
        true
    }

    /// Text of the overlay input for hosts that edit it directly.
    /// The host takes over cursor and selection handling from here on.
    pub fn buffer_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::Idle => None,
            Self::Editing(edit) => {
                edit.selected_all = false;
                Some(&mut edit.buffer)
            }
        }
    }

    /// Parse the buffer, write it into the cell and return to `Idle`.
    /// Returns the committed cell, `None` if nothing was being edited.
    ///
    /// # Errors
    /// Returns an error if the grid rejects the value. The session is idle afterwards.
    pub fn commit<G: CellGrid + ?Sized>(
        &mut self,
        grid: &mut G,
        settings: &ViewSettings,
    ) -> Result<Option<(usize, usize)>, CellGridError> {
        let Self::Editing(edit) = std::mem::take(self) else {
            return Ok(None);
        };

        let value = codec::parse(&edit.buffer, settings.base);
        debug!(row = edit.row, col = edit.col, value, "edit commit");
        grid.set_cell(edit.row, edit.col, value)?;
        Ok(Some((edit.row, edit.col)))
    }
}
