//! The `store` module provides the [`ByteStore`] struct, a typed view over a flat byte
//! buffer for the hex editor.
//!
//! The buffer is never typed at allocation time. Every read and write slices the bytes
//! according to the view settings of the last [`CellGrid::reinterpret`] call, so switching
//! the element width changes how many logical cells exist and which bytes form each cell.

use crate::error::{CellGridError, CellGridErrorKind};
use crate::grid::CellGrid;
use crate::settings::{Endianness, ViewSettings};
use crate::shape::GridShape;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Rows and columns of the buffer created by [`ByteStore::new_word_buffer`]
const NEW_BUFFER_ROWS: usize = 100;
const NEW_BUFFER_COLS: usize = 100;

#[derive(Debug, Clone)]
pub struct ByteStore {
    /// Path of the file the buffer was loaded from (empty for new buffers)
    pub filepath: PathBuf,
    /// Raw data, its length is fixed at load time
    bytes: Vec<u8>,
    /// Settings the bytes are currently interpreted with
    layout: ViewSettings,
    /// Derived rows/cols for the current element width
    shape: GridShape,
    /// Tracks the modified bytes by storing addresses and original values before modification
    modified: BTreeMap<usize, u8>,
}

impl Default for ByteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteStore {
    /// Creates an empty `ByteStore`.
    ///
    /// # Examples
    /// ```
    /// use cellgridlib::ByteStore;
    ///
    /// let store = ByteStore::new();
    /// assert!(store.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        let layout = ViewSettings::hex_default();
        Self {
            filepath: PathBuf::new(),
            bytes: Vec::new(),
            layout,
            shape: GridShape {
                rows: 0,
                cols: 100,
                bytes_per_col: 2,
                row_bytes: 200,
            },
            modified: BTreeMap::new(),
        }
    }

    /// Creates a 100 x 100 buffer of unsigned little-endian 16-bit words where the cell at
    /// (row, col) holds `col + row * 100`.
    ///
    /// # Examples
    /// ```
    /// use cellgridlib::{ByteStore, CellGrid};
    ///
    /// let store = ByteStore::new_word_buffer();
    /// assert_eq!(store.len(), 20_000);
    /// assert_eq!(store.cell(2, 3), Some(203));
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new_word_buffer() -> Self {
        let bytes = (0..NEW_BUFFER_ROWS * NEW_BUFFER_COLS)
            .flat_map(|i| (i as u16).to_le_bytes())
            .collect::<Vec<u8>>();

        // 20000 bytes of words -> 200-byte rows -> 100 columns
        let shape = GridShape {
            rows: NEW_BUFFER_ROWS,
            cols: NEW_BUFFER_COLS,
            bytes_per_col: 2,
            row_bytes: NEW_BUFFER_COLS * 2,
        };

        Self {
            bytes,
            shape,
            ..Self::new()
        }
    }

    /// Number of bytes in the buffer
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw contents of the buffer
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Current grid shape
    #[must_use]
    pub const fn shape(&self) -> GridShape {
        self.shape
    }

    /// Settings the buffer is currently interpreted with
    #[must_use]
    pub const fn layout(&self) -> &ViewSettings {
        &self.layout
    }

    /// Replaces the buffer with the provided bytes and reshapes the grid.
    /// The previous buffer is released and change tracking is reset.
    ///
    /// # Errors
    /// Returns an error if the bytes cannot be shaped under the settings.
    /// The previous buffer is kept in that case.
    ///
    /// # Example
    /// ```
    /// use cellgridlib::{ByteStore, ViewSettings};
    ///
    /// let mut store = ByteStore::new();
    /// store.load_bytes(vec![0u8; 1000], &ViewSettings::hex_default()).unwrap();
    ///
    /// assert_eq!(store.shape().cols, 100);
    /// assert_eq!(store.shape().rows, 5);
    /// ```
    pub fn load_bytes(
        &mut self,
        data: Vec<u8>,
        settings: &ViewSettings,
    ) -> Result<(), CellGridError> {
        let shape = GridShape::reshape(data.len(), settings.width.bytes())?;

        self.bytes = data;

        self.modified.clear();
        self.layout = *settings;
        self.shape = shape;
        Ok(())
    }

    /// Fills the `ByteStore` with the whole contents of the provided file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or fully read.
    /// The previous buffer is kept in that case.
    pub fn load_file<P: AsRef<Path>>(
        &mut self,
        filepath: P,
        settings: &ViewSettings,
    ) -> Result<(), CellGridError> {
        let data = read_whole_file(filepath.as_ref())?;
        debug!(path = %filepath.as_ref().display(), bytes = data.len(), "read file");

        self.load_bytes(data, settings)?;
        self.filepath = filepath.as_ref().to_path_buf();
        Ok(())
    }

    /// Writes the whole buffer to the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or fully written.
    pub fn save_file<P: AsRef<Path>>(&self, filepath: P) -> Result<(), CellGridError> {
        let save_err = |err: std::io::Error| CellGridError::SaveError(err.into());

        // Ensure the parent directory exists
        if let Some(parent) = filepath.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(save_err)?;
        }

        let file = File::create(&filepath).map_err(save_err)?;
        self.write_to(std::io::BufWriter::new(file), filepath.as_ref())
    }

    /// Write and flush the whole buffer. `path` is only used for logging.
    fn write_to<W: Write>(&self, mut writer: W, path: &Path) -> Result<(), CellGridError> {
        if let Err(err) = writer.write_all(&self.bytes).and_then(|()| writer.flush()) {
            warn!(path = %path.display(), %err, "short write");
            return Err(CellGridError::SaveError(err.into()));
        }

        debug!(path = %path.display(), bytes = self.bytes.len(), "wrote file");
        Ok(())
    }

    /// Writes the buffer back to the file it was loaded from.
    ///
    /// # Errors
    /// Returns an error if there is no file path or the file cannot be written.
    pub fn save(&self) -> Result<(), CellGridError> {
        if self.filepath.as_os_str().is_empty() {
            return Err(CellGridError::SaveError(CellGridErrorKind::NoFilePath));
        }
        self.save_file(&self.filepath)
    }

    /// Byte offset of the cell if the whole cell lies within the buffer
    fn cell_offset(&self, row: usize, col: usize) -> Option<usize> {
        if !self.shape.contains(row, col) {
            return None;
        }
        let offset = self.shape.offset_of(row, col);
        (offset + self.layout.width.bytes() <= self.bytes.len()).then_some(offset)
    }

    /// Read the cell at (row, col) under the current width, signedness and endianness.
    /// Returns `None` for cells outside the grid or past the end of the buffer.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        let offset = self.cell_offset(row, col)?;
        let width = self.layout.width.bytes();
        let slice = &self.bytes[offset..offset + width];

        let raw = match self.layout.endianness {
            Endianness::Little => slice
                .iter()
                .rev()
                .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)),
            Endianness::Big => slice.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)),
        };

        if self.layout.signed {
            // Sign-extend from the element width
            let shift = 64 - width * 8;
            Some(((raw << shift) as i64) >> shift)
        } else {
            Some(raw as i64)
        }
    }

    /// Write the value into the cell at (row, col), truncated to the element width.
    ///
    /// # Errors
    /// Returns an error if the cell is outside the grid or not fully backed by the buffer.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set(&mut self, row: usize, col: usize, value: i64) -> Result<(), CellGridError> {
        let offset = self
            .cell_offset(row, col)
            .ok_or(CellGridError::UpdateError(CellGridErrorKind::InvalidCell(
                row, col,
            )))?;
        let width = self.layout.width.bytes();
        let raw = value as u64;

        for i in 0..width {
            let byte = (raw >> (8 * i)) as u8;
            let addr = match self.layout.endianness {
                Endianness::Little => offset + i,
                Endianness::Big => offset + width - 1 - i,
            };
            self.write_byte(addr, byte);
        }
        Ok(())
    }

    /// Update a byte and keep track of its original value
    fn write_byte(&mut self, addr: usize, value: u8) {
        let prev = self.bytes[addr];
        if prev == value {
            return;
        }

        match self.modified.get(&addr) {
            // Changed back to the original value
            Some(&orig) if orig == value => {
                self.modified.remove(&addr);
            }
            Some(_) => {}
            None => {
                self.modified.insert(addr, prev);
            }
        }
        self.bytes[addr] = value;
    }
}

fn read_whole_file(path: &Path) -> Result<Vec<u8>, CellGridError> {
    let load_err = |err: std::io::Error| CellGridError::LoadError(err.into());

    let file = File::open(path).map_err(load_err)?;
    let size = file.metadata().map_err(load_err)?.len();
    let expected = usize::try_from(size)
        .map_err(|_| CellGridError::LoadError(CellGridErrorKind::TooLarge { size }))?;

    read_exact_len(file, expected, path)
}

/// Read everything from `reader`, failing unless exactly `expected` bytes arrive.
/// `path` is only used for logging.
fn read_exact_len<R: Read>(
    mut reader: R,
    expected: usize,
    path: &Path,
) -> Result<Vec<u8>, CellGridError> {
    let mut data = Vec::with_capacity(expected);
    let actual = reader
        .read_to_end(&mut data)
        .map_err(|err| CellGridError::LoadError(err.into()))?;

    if actual != expected {
        warn!(path = %path.display(), expected, actual, "short read");
        return Err(CellGridError::LoadError(CellGridErrorKind::ShortRead {
            expected,
            actual,
        }));
    }
    Ok(data)
}

impl CellGrid for ByteStore {
    fn rows(&self) -> usize {
        self.shape.rows
    }

    fn cols(&self) -> usize {
        self.shape.cols
    }

    fn cell(&self, row: usize, col: usize) -> Option<i64> {
        self.get(row, col)
    }

    fn set_cell(&mut self, row: usize, col: usize, value: i64) -> Result<(), CellGridError> {
        self.set(row, col, value)
    }

    fn reinterpret(&mut self, settings: &ViewSettings) -> Result<(), CellGridError> {
        self.shape = GridShape::reshape(self.bytes.len(), settings.width.bytes())?;
        self.layout = *settings;
        Ok(())
    }

    fn row_label(&self, row: usize) -> String {
        format!("{:08X}", row * self.shape.row_bytes)
    }

    fn col_label(&self, col: usize) -> String {
        format!("{:02X}", col * self.shape.bytes_per_col)
    }

    fn is_modified(&self, row: usize, col: usize) -> bool {
        self.cell_offset(row, col).is_some_and(|offset| {
            self.modified
                .range(offset..offset + self.layout.width.bytes())
                .next()
                .is_some()
        })
    }

    fn has_modifications(&self) -> bool {
        !self.modified.is_empty()
    }

    /// Restore all modified bytes to their original values
    fn restore(&mut self) {
        for (&addr, &orig_value) in &self.modified {
            self.bytes[addr] = orig_value;
        }
        self.modified.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ElementWidth;

    fn store_with(bytes: Vec<u8>, settings: ViewSettings) -> ByteStore {
        let mut store = ByteStore::new();
        assert!(store.load_bytes(bytes, &settings).is_ok());
        store
    }

    #[test]
    fn test_load_bytes_reshapes() {
        // Arrange
        let settings = ViewSettings::hex_default();

        // Act
        let store = store_with(vec![0; 1000], settings);

        // Assert
        assert_eq!(
            store.shape(),
            GridShape {
                rows: 5,
                cols: 100,
                bytes_per_col: 2,
                row_bytes: 200,
            }
        );
        assert_eq!(store.rows(), 5);
        assert_eq!(store.cols(), 100);
    }

    #[test]
    fn test_get_little_and_big_endian() {
        // Arrange
        let bytes = vec![0x34, 0x12, 0x78, 0x56];
        let little = store_with(bytes.clone(), ViewSettings::hex_default());
        let big = store_with(
            bytes,
            ViewSettings::hex_default().with_endianness(Endianness::Big),
        );

        // Act & Assert
        assert_eq!(little.get(0, 0), Some(0x1234));
        assert_eq!(little.get(0, 1), Some(0x5678));
        assert_eq!(big.get(0, 0), Some(0x3412));
        assert_eq!(big.get(0, 1), Some(0x7856));
    }

    #[test]
    fn test_get_signed_extends_sign() {
        // Arrange
        let settings = ViewSettings::hex_default().with_signed(true);
        let store = store_with(vec![0xFE, 0xFF, 0xFF, 0x7F], settings);

        // Act & Assert
        assert_eq!(store.get(0, 0), Some(-2));
        assert_eq!(store.get(0, 1), Some(0x7FFF));
    }

    #[test]
    fn test_three_byte_cells() {
        // Arrange
        let settings = ViewSettings::hex_default().with_width(ElementWidth::Three);
        let mut store = store_with(vec![0x01, 0x02, 0x03, 0xFF, 0xFF, 0xFF], settings);

        // Act
        let first = store.get(0, 0);
        let res = store.set(0, 1, 0x00AB_CDEF);

        // Assert
        assert_eq!(first, Some(0x0003_0201));
        assert!(res.is_ok());
        assert_eq!(store.bytes(), &[0x01, 0x02, 0x03, 0xEF, 0xCD, 0xAB]);
    }

    #[test]
    fn test_reinterpret_changes_cell_count() {
        // Arrange
        let mut store = store_with(vec![0x11, 0x22, 0x33, 0x44], ViewSettings::hex_default());
        assert_eq!(store.get(0, 1), Some(0x4433));

        // Act
        let res = store.reinterpret(&ViewSettings::hex_default().with_width(ElementWidth::Byte));

        // Assert
        assert!(res.is_ok());
        assert_eq!(store.shape().cols, 32);
        assert_eq!(store.get(0, 1), Some(0x22));
        assert_eq!(store.get(0, 3), Some(0x44));
        assert_eq!(store.get(0, 4), None);
    }

    #[test]
    fn test_trailing_partial_cell_is_guarded() {
        // Arrange: 5 bytes as words -> third cell has only one byte
        let mut store = store_with(vec![1, 0, 2, 0, 3], ViewSettings::hex_default());

        // Act
        let partial = store.get(0, 2);
        let res = store.set(0, 2, 0x7777);

        // Assert
        assert_eq!(partial, None);
        assert!(!store.is_editable(0, 2));
        assert_eq!(
            res,
            Err(CellGridError::UpdateError(CellGridErrorKind::InvalidCell(
                0, 2
            )))
        );
        assert_eq!(store.bytes(), &[1, 0, 2, 0, 3]);
    }

    #[test]
    fn test_out_of_range_cell() {
        let mut store = store_with(vec![0; 1000], ViewSettings::hex_default());
        assert_eq!(store.get(5, 0), None);
        assert_eq!(store.get(0, 100), None);
        assert!(store.set(99, 99, 1).is_err());
    }

    #[test]
    fn test_set_truncates_to_width() {
        // Arrange
        let settings = ViewSettings::hex_default().with_width(ElementWidth::Byte);
        let mut store = store_with(vec![0; 4], settings);

        // Act
        let res = store.set(0, 0, 0x1FF);

        // Assert
        assert!(res.is_ok());
        assert_eq!(store.bytes(), &[0xFF, 0, 0, 0]);
    }

    #[test]
    fn test_modified_and_restore() {
        // Arrange
        let mut store = store_with(vec![0x1A, 0x00, 0x00, 0x00], ViewSettings::hex_default());

        // Act
        let res = store.set(0, 0, 0x2B);

        // Assert
        assert!(res.is_ok());
        assert!(store.is_modified(0, 0));
        assert!(!store.is_modified(0, 1));
        assert!(store.has_modifications());

        // Act
        store.restore();

        // Assert
        assert_eq!(store.get(0, 0), Some(0x1A));
        assert!(!store.has_modifications());
    }

    #[test]
    fn test_setting_original_value_clears_modification() {
        // Arrange
        let mut store = store_with(vec![0x10, 0x00], ViewSettings::hex_default());

        // Act
        let res1 = store.set(0, 0, 0x20);
        let res2 = store.set(0, 0, 0x10);

        // Assert
        assert!(res1.is_ok() && res2.is_ok());
        assert!(!store.has_modifications());
    }

    #[test]
    fn test_new_word_buffer() {
        // Arrange & Act
        let store = ByteStore::new_word_buffer();

        // Assert
        assert_eq!(store.shape(), GridShape::reshape(20_000, 2).unwrap_or_default());
        assert_eq!(store.get(0, 0), Some(0));
        assert_eq!(store.get(0, 99), Some(99));
        assert_eq!(store.get(99, 99), Some(9999));
    }

    #[test]
    fn test_headers() {
        // Arrange
        let store = store_with(vec![0; 1000], ViewSettings::hex_default());

        // Act & Assert
        assert_eq!(store.row_label(0), "00000000");
        assert_eq!(store.row_label(3), "00000258");
        assert_eq!(store.col_label(5), "0A");
    }

    #[test]
    fn test_load_file_missing_keeps_buffer() {
        // Arrange
        let mut store = store_with(vec![7; 10], ViewSettings::hex_default());

        // Act
        let res = store.load_file("does/not/exist.bin", &ViewSettings::hex_default());

        // Assert
        assert!(matches!(
            res,
            Err(CellGridError::LoadError(CellGridErrorKind::Io(_)))
        ));
        assert_eq!(store.bytes(), &[7; 10]);
    }

    /// Writer that accepts a fixed number of bytes and then stops
    struct FullDisk {
        room: usize,
    }

    impl Write for FullDisk {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.room);
            self.room -= n;
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_read_short_data_is_rejected() {
        // Arrange
        let path = Path::new("short.bin");

        // Act
        let res = read_exact_len(&[1u8, 2, 3][..], 8, path);

        // Assert
        assert_eq!(
            res,
            Err(CellGridError::LoadError(CellGridErrorKind::ShortRead {
                expected: 8,
                actual: 3,
            }))
        );
        assert_eq!(read_exact_len(&[1u8, 2, 3][..], 3, path), Ok(vec![1, 2, 3]));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_load_file_length_mismatch_keeps_buffer() {
        // Arrange: procfs reports a length of 0 but has content
        let mut store = store_with(vec![7; 10], ViewSettings::hex_default());

        // Act
        let res = store.load_file("/proc/self/status", &ViewSettings::hex_default());

        // Assert
        assert!(matches!(
            res,
            Err(CellGridError::LoadError(CellGridErrorKind::ShortRead { expected: 0, .. }))
        ));
        assert_eq!(store.bytes(), &[7; 10]);
        assert!(store.filepath.as_os_str().is_empty());
    }

    #[test]
    fn test_short_write_is_an_error() {
        // Arrange
        let mut store = store_with(vec![7; 10], ViewSettings::hex_default());
        assert!(store.set(0, 0, 0x0102).is_ok());

        // Act
        let res = store.write_to(FullDisk { room: 4 }, Path::new("full.bin"));

        // Assert
        assert!(matches!(
            res,
            Err(CellGridError::SaveError(CellGridErrorKind::Io(_)))
        ));
        assert_eq!(store.bytes()[..2], [0x02, 0x01]);
        assert_eq!(store.bytes()[2..], [7; 8]);
        assert!(store.has_modifications());
        assert!(store.write_to(FullDisk { room: 10 }, Path::new("full.bin")).is_ok());
    }

    #[test]
    fn test_save_without_path() {
        let store = ByteStore::new_word_buffer();
        assert_eq!(
            store.save(),
            Err(CellGridError::SaveError(CellGridErrorKind::NoFilePath))
        );
    }
}
