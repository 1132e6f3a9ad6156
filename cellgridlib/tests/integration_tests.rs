use cellgridlib::{
    Base, ByteStore, CellGrid, CellGridError, CellGridErrorKind, ElementWidth, Endianness,
    GridDocument, GridInput, GridKey, HitTarget, MAX_COLS, MAX_ROWS, SheetStore, ViewSettings,
    codec,
};
use rand::Rng;
use std::fs;

fn random_bytes(len: usize) -> Vec<u8> {
    rand::rng()
        .sample_iter(rand::distr::StandardUniform)
        .take(len)
        .collect()
}

#[test]
fn test_load_and_save_file() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("in.bin");
    let output_path = dir.path().join("nested/out.bin");
    let data = random_bytes(4096);
    fs::write(&input_path, &data).unwrap();

    // Act
    let mut store = ByteStore::new();
    let loaded = store.load_file(&input_path, &ViewSettings::hex_default());
    let saved = store.save_file(&output_path);

    // Assert
    assert!(loaded.is_ok());
    assert!(saved.is_ok());
    assert_eq!(store.filepath, input_path);
    assert_eq!(fs::read(&output_path).unwrap(), data);
}

#[test]
fn test_edit_and_save_back() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");
    fs::write(&path, vec![0u8; 1000]).unwrap();
    let mut store = ByteStore::new();
    assert!(store.load_file(&path, &ViewSettings::hex_default()).is_ok());
    let mut doc = GridDocument::new(store, ViewSettings::hex_default()).unwrap();

    // Act
    let _ = doc.handle(GridInput::Press(HitTarget::Cell { row: 0, col: 0 }));
    for ch in "BEEF".chars() {
        let _ = doc.handle(GridInput::Key(GridKey::Char(ch)));
    }
    let _ = doc.handle(GridInput::Key(GridKey::Enter));
    let res = doc.update_grid(|grid, _| grid.save());

    // Assert
    assert!(res.is_ok());
    let written = fs::read(&path).unwrap();
    assert_eq!(&written[..2], &[0xEF, 0xBE]);
    assert_eq!(written.len(), 1000);
}

#[test]
fn test_failed_load_keeps_document() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let mut doc = GridDocument::new(ByteStore::new_word_buffer(), ViewSettings::hex_default())
        .unwrap();

    // Act
    let missing = dir.path().join("missing.bin");
    let res = doc.update_grid(|grid, settings| grid.load_file(&missing, settings));

    // Assert
    assert!(matches!(
        res,
        Err(CellGridError::LoadError(CellGridErrorKind::Io(_)))
    ));
    assert_eq!(doc.grid().len(), 20_000);
    assert_eq!(doc.grid().cell(1, 1), Some(101));
}

#[test]
fn test_load_reshapes_and_clamps_cursor() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.bin");
    fs::write(&path, random_bytes(64)).unwrap();
    let mut doc = GridDocument::new(ByteStore::new_word_buffer(), ViewSettings::hex_default())
        .unwrap();
    let _ = doc.handle(GridInput::Press(HitTarget::Cell { row: 50, col: 50 }));

    // Act
    let res = doc.update_grid(|grid, settings| grid.load_file(&path, settings));

    // Assert: 64 bytes -> 32-byte rows -> 2 x 16 words
    assert!(res.is_ok());
    assert_eq!((doc.grid().rows(), doc.grid().cols()), (2, 16));
    assert_eq!(doc.cursor(), (1, 15));
}

#[test]
fn test_width_change_round_trip_preserves_bytes() {
    // Arrange
    let data = random_bytes(2000);
    let mut store = ByteStore::new();
    assert!(store.load_bytes(data.clone(), &ViewSettings::hex_default()).is_ok());
    let mut doc = GridDocument::new(store, ViewSettings::hex_default()).unwrap();

    // Act
    for width in ElementWidth::ALL {
        assert!(doc.set_width(width).is_ok());
        assert!(doc.set_endianness(Endianness::Big).is_ok());
        assert!(doc.set_base(Base::Octal).is_ok());
    }

    // Assert
    assert_eq!(doc.grid().bytes(), data.as_slice());
    assert!(!doc.grid().has_modifications());
}

#[test]
fn test_random_cells_format_and_parse_back() {
    // Arrange
    let data = random_bytes(1280);
    for width in ElementWidth::ALL {
        for base in [Base::Octal, Base::Hex] {
            for signed in [false, true] {
                let settings = ViewSettings::hex_default()
                    .with_width(width)
                    .with_base(base)
                    .with_signed(signed);
                let mut store = ByteStore::new();
                assert!(store.load_bytes(data.clone(), &settings).is_ok());

                // Act & Assert
                for row in 0..store.rows() {
                    for col in 0..store.cols() {
                        if let Some(value) = store.cell(row, col) {
                            let text = codec::format(value, &settings);
                            assert_eq!(codec::parse(&text, base), value, "{text}");
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn test_sheet_csv_through_document() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sheet.csv");
    let mut doc = GridDocument::new(SheetStore::new(), ViewSettings::sheet_default()).unwrap();
    let _ = doc.handle(GridInput::Press(HitTarget::Cell { row: 0, col: 0 }));
    let _ = doc.handle(GridInput::Key(GridKey::Char('-')));
    let _ = doc.handle(GridInput::Key(GridKey::Char('5')));

    // Act
    let saved = doc.update_grid(|grid, _| grid.save_csv(&path));
    let mut loaded = SheetStore::new();
    let res = loaded.load_csv(&path);

    // Assert
    assert!(saved.is_ok());
    assert!(res.is_ok());
    assert_eq!(loaded.cell(0, 0), Some(-5));
    assert_eq!(loaded.cell(MAX_ROWS, MAX_COLS), doc.grid().cell(MAX_ROWS, MAX_COLS));
    assert_eq!(
        fs::read_to_string(&path).unwrap().lines().count(),
        MAX_ROWS
    );
}

#[test]
fn test_copy_then_paste_elsewhere() {
    // Arrange
    let mut doc = GridDocument::new(SheetStore::new(), ViewSettings::sheet_default()).unwrap();
    let _ = doc.handle(GridInput::Press(HitTarget::Cell { row: 0, col: 0 }));
    let _ = doc.handle(GridInput::Drag(HitTarget::Cell { row: 1, col: 2 }));
    let text = doc.copy_selection().unwrap();

    // Act
    let _ = doc.handle(GridInput::Press(HitTarget::Cell { row: 10, col: 10 }));
    let written = doc.paste(&text);

    // Assert
    assert_eq!(written, Ok(6));
    assert_eq!(doc.grid().cell(10, 10), Some(0));
    assert_eq!(doc.grid().cell(11, 12), Some(102));
}
