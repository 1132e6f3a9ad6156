/// Rectangular block of selected cells. Bounds are inclusive and always normalized
/// (`top <= bottom`, `left <= right`); the anchor is the cell the selection started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionRegion {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
    /// Cell the selection is extended from
    anchor: (usize, usize),
}

impl SelectionRegion {
    /// Single-cell selection
    #[must_use]
    pub const fn at(row: usize, col: usize) -> Self {
        Self {
            top: row,
            left: col,
            bottom: row,
            right: col,
            anchor: (row, col),
        }
    }

    /// Select the block between two corners given in any order
    pub fn set(&mut self, top: usize, left: usize, bottom: usize, right: usize) {
        self.top = top.min(bottom);
        self.bottom = top.max(bottom);
        self.left = left.min(right);
        self.right = left.max(right);
        self.anchor = (top, left);
    }

    /// Reset to the single cell
    pub const fn collapse(&mut self, row: usize, col: usize) {
        *self = Self::at(row, col);
    }

    /// Extend from the anchor to the cell
    pub fn extend_to(&mut self, row: usize, col: usize) {
        let (anchor_row, anchor_col) = self.anchor;
        self.set(anchor_row, anchor_col, row, col);
    }

    #[must_use]
    pub const fn anchor(&self) -> (usize, usize) {
        self.anchor
    }

    #[must_use]
    pub const fn contains(&self, row: usize, col: usize) -> bool {
        self.top <= row && row <= self.bottom && self.left <= col && col <= self.right
    }

    /// Check if the row header should be marked
    #[must_use]
    pub const fn is_row_selected(&self, row: usize) -> bool {
        self.top <= row && row <= self.bottom
    }

    /// Check if the column header should be marked
    #[must_use]
    pub const fn is_col_selected(&self, col: usize) -> bool {
        self.left <= col && col <= self.right
    }

    /// Selection cut to the first `rows` x `cols` cells, `None` if nothing remains
    #[must_use]
    pub fn clamped(&self, rows: usize, cols: usize) -> Option<Self> {
        if rows == 0 || cols == 0 || self.top >= rows || self.left >= cols {
            return None;
        }
        Some(Self {
            top: self.top,
            left: self.left,
            bottom: self.bottom.min(rows - 1),
            right: self.right.min(cols - 1),
            anchor: (self.anchor.0.min(rows - 1), self.anchor.1.min(cols - 1)),
        })
    }

    /// Selected cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (left, right) = (self.left, self.right);
        (self.top..=self.bottom).flat_map(move |row| (left..=right).map(move |col| (row, col)))
    }

    /// Selection as text: cells separated by tabs, every row terminated by a newline.
    ///
    /// # Example
    /// ```
    /// use cellgridlib::SelectionRegion;
    ///
    /// let mut selection = SelectionRegion::default();
    /// selection.set(0, 0, 1, 1);
    ///
    /// let text = selection.serialize(|row, col| (row * 2 + col + 1).to_string());
    /// assert_eq!(text, "1\t2\n3\t4\n");
    /// ```
    pub fn serialize<F: FnMut(usize, usize) -> String>(&self, mut format_cell: F) -> String {
        let mut out = String::new();
        for row in self.top..=self.bottom {
            for col in self.left..=self.right {
                out.push_str(&format_cell(row, col));
                out.push(if col == self.right { '\n' } else { '\t' });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_normalizes() {
        // Arrange
        let mut sel = SelectionRegion::default();

        // Act
        sel.set(5, 7, 2, 3);

        // Assert
        assert_eq!((sel.top, sel.left, sel.bottom, sel.right), (2, 3, 5, 7));
        assert_eq!(sel.anchor(), (5, 7));
    }

    #[test]
    fn test_extend_from_anchor() {
        // Arrange
        let mut sel = SelectionRegion::at(4, 4);

        // Act
        sel.extend_to(6, 2);
        sel.extend_to(1, 5);

        // Assert
        assert_eq!((sel.top, sel.left, sel.bottom, sel.right), (1, 4, 4, 5));
        assert_eq!(sel.anchor(), (4, 4));
    }

    #[test]
    fn test_contains_and_headers() {
        let mut sel = SelectionRegion::default();
        sel.set(1, 1, 2, 3);

        assert!(sel.contains(1, 1));
        assert!(sel.contains(2, 3));
        assert!(!sel.contains(0, 1));
        assert!(!sel.contains(2, 4));
        assert!(sel.is_row_selected(2));
        assert!(!sel.is_row_selected(3));
        assert!(sel.is_col_selected(3));
        assert!(!sel.is_col_selected(0));
    }

    #[test]
    fn test_serialize_2x2() {
        // Arrange
        let values = [[1, 2], [3, 4]];
        let mut sel = SelectionRegion::default();
        sel.set(0, 0, 1, 1);

        // Act
        let text = sel.serialize(|r, c| values[r][c].to_string());

        // Assert
        assert_eq!(text, "1\t2\n3\t4\n");
    }

    #[test]
    fn test_serialize_single_cell() {
        let sel = SelectionRegion::at(3, 3);
        assert_eq!(sel.serialize(|_, _| "FF".to_string()), "FF\n");
    }

    #[test]
    fn test_cells_row_major() {
        let mut sel = SelectionRegion::default();
        sel.set(0, 1, 1, 2);
        let cells: Vec<_> = sel.cells().collect();
        assert_eq!(cells, vec![(0, 1), (0, 2), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_clamped() {
        // Arrange
        let mut sel = SelectionRegion::default();
        sel.set(98, 98, 100, 100);

        // Act
        let clamped = sel.clamped(100, 100);
        let outside = SelectionRegion::at(100, 0).clamped(100, 100);

        // Assert
        assert_eq!(
            clamped.map(|s| (s.top, s.left, s.bottom, s.right)),
            Some((98, 98, 99, 99))
        );
        assert_eq!(outside, None);
        assert_eq!(sel.clamped(0, 0), None);
    }
}
