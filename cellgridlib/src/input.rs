//! Host-independent pointer and keyboard input fed to
//! [`GridDocument::handle`](crate::GridDocument::handle).

/// Part of the grid under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Cell { row: usize, col: usize },
    RowHeader(usize),
    ColHeader(usize),
    /// Outside of any cell or header
    DeadZone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKey {
    Escape,
    Enter,
    Backspace,
    Char(char),
    Arrow(Direction),
    /// Next cell in reading order, previous one when `backward` (Shift+Tab).
    /// Wraps between the end of one row and the start of the next.
    Tab { backward: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridInput {
    /// Pointer pressed
    Press(HitTarget),
    /// Pointer moved while held down
    Drag(HitTarget),
    Key(GridKey),
}
