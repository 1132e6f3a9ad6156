use crate::app::{Document, GridApp};
use crate::ui_centralpanel::GridView;
use cellgridlib::{
    ByteStore, CellGridError, CellGridErrorKind, GridDocument, SheetStore, ViewSettings,
};
use std::path::Path;
use tracing::info;

/// Check if the file should be opened as a spreadsheet
fn is_csv(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || "Untitled".to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

impl GridApp {
    /// Replace the open document and reset the view state
    fn set_document(&mut self, document: Document, name: String) {
        self.document = Some(document);
        self.name = name;
        self.view = GridView::default();
    }

    fn report(&self, err: &CellGridError) {
        self.error.borrow_mut().replace(err.to_string());
    }

    /// Settings a newly opened document starts with. The base in use carries over.
    fn startup_settings(&self, sheet: bool) -> ViewSettings {
        let defaults = if sheet {
            ViewSettings::sheet_default()
        } else {
            self.hex_settings
        };
        self.document
            .as_ref()
            .map_or(defaults, |doc| defaults.with_base(doc.settings().base))
    }

    /// Load a file from disk and show it. CSV files (or any file when `sheet` is set)
    /// open as a spreadsheet, everything else as raw bytes.
    /// On failure the current document stays open and the error is shown.
    pub(crate) fn load_file(&mut self, path: &Path, sheet: bool) {
        let sheet = sheet || is_csv(path);
        let settings = self.startup_settings(sheet);

        let res = if sheet {
            let mut store = SheetStore::new();
            store
                .load_csv(path)
                .and_then(|()| GridDocument::new(store, settings))
                .map(Document::Sheet)
        } else {
            let mut store = ByteStore::new();
            store
                .load_file(path, &settings)
                .and_then(|()| GridDocument::new(store, settings))
                .map(Document::Hex)
        };

        match res {
            Ok(document) => {
                info!(path = %path.display(), sheet, "opened");
                self.set_document(document, display_name(path));
            }
            Err(err) => self.report(&err),
        }
    }

    /// File/New: a word buffer holding `col + row * 100`
    pub(crate) fn new_hex(&mut self) {
        match Document::new_hex(self.startup_settings(false)) {
            Ok(document) => self.set_document(document, "Untitled".to_string()),
            Err(err) => self.report(&err),
        }
    }

    pub(crate) fn new_sheet(&mut self) {
        match Document::new_sheet(self.startup_settings(true)) {
            Ok(document) => self.set_document(document, "Untitled.csv".to_string()),
            Err(err) => self.report(&err),
        }
    }

    /// Write the document back to its file. Asks for a path if it has none.
    pub(crate) fn save(&mut self) {
        let Some(document) = &mut self.document else {
            return;
        };

        let res = match document {
            Document::Hex(doc) => doc.update_grid(|grid, _| grid.save()),
            Document::Sheet(doc) => doc.update_grid(|grid, _| grid.save()),
        };

        match res {
            Ok(()) => {}
            Err(CellGridError::SaveError(CellGridErrorKind::NoFilePath)) => {
                if let Some(path) = self.pick_save_path() {
                    self.save_as(&path);
                }
            }
            Err(err) => self.report(&err),
        }
    }

    /// Write the document to a new path and keep editing that file
    pub(crate) fn save_as(&mut self, path: &Path) {
        let Some(document) = &mut self.document else {
            return;
        };

        let res = match document {
            Document::Hex(doc) => doc.update_grid(|grid, _| {
                grid.save_file(path)?;
                grid.filepath = path.to_path_buf();
                Ok(())
            }),
            Document::Sheet(doc) => doc.update_grid(|grid, _| {
                grid.save_csv(path)?;
                grid.filepath = path.to_path_buf();
                Ok(())
            }),
        };

        match res {
            Ok(()) => self.name = display_name(path),
            Err(err) => self.report(&err),
        }
    }

    pub(crate) fn pick_save_path(&self) -> Option<std::path::PathBuf> {
        let is_sheet = self.document.as_ref().is_some_and(Document::is_sheet);

        let mut path = rfd::FileDialog::new()
            .set_title("Save As")
            .set_file_name(self.name.clone())
            .save_file()?;

        if is_sheet && path.extension().is_none() {
            path.set_extension("csv");
        }
        Some(path)
    }
}
