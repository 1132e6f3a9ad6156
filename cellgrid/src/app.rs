use crate::events::EventState;
use crate::ui_centralpanel::GridView;
use crate::ui_popup::Popup;
use cellgridlib::{
    ByteStore, CellGrid, CellGridError, ElementWidth, GridDocument, SheetStore, ViewSettings,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub mod colors {
    use eframe::egui::Color32;

    pub const LIGHT_BLUE: Color32 = Color32::from_rgba_premultiplied(33, 81, 109, 20);
    pub const MUD: Color32 = Color32::from_rgba_premultiplied(54, 44, 19, 20);
    pub const GRAY_120: Color32 = Color32::from_gray(120);
    pub const GRAY_160: Color32 = Color32::from_gray(160);
    pub const GRAY_210: Color32 = Color32::from_gray(210);
    pub const HEADER_BG: Color32 = Color32::from_gray(40);
    pub const SHADOW: Color32 = Color32::from_black_alpha(150);
}

/// The grid being edited
pub enum Document {
    /// Raw bytes shown as typed cells
    Hex(GridDocument<ByteStore>),
    /// Fixed spreadsheet with totals
    Sheet(GridDocument<SheetStore>),
}

impl Document {
    /// New 100 x 100 buffer of words. Keeps the base, resets width and sign.
    pub(crate) fn new_hex(settings: ViewSettings) -> Result<Self, CellGridError> {
        let settings = settings
            .with_width(ElementWidth::Word)
            .with_signed(false);
        GridDocument::new(ByteStore::new_word_buffer(), settings).map(Self::Hex)
    }

    pub(crate) fn new_sheet(settings: ViewSettings) -> Result<Self, CellGridError> {
        GridDocument::new(SheetStore::new(), settings).map(Self::Sheet)
    }

    pub(crate) const fn settings(&self) -> &ViewSettings {
        match self {
            Self::Hex(doc) => doc.settings(),
            Self::Sheet(doc) => doc.settings(),
        }
    }

    pub(crate) fn set_settings(&mut self, settings: ViewSettings) -> Result<(), CellGridError> {
        match self {
            Self::Hex(doc) => doc.set_settings(settings),
            Self::Sheet(doc) => doc.set_settings(settings),
        }
    }

    pub(crate) fn filepath(&self) -> &Path {
        match self {
            Self::Hex(doc) => &doc.grid().filepath,
            Self::Sheet(doc) => &doc.grid().filepath,
        }
    }

    pub(crate) const fn is_sheet(&self) -> bool {
        matches!(self, Self::Sheet(_))
    }

    pub(crate) fn has_modifications(&self) -> bool {
        match self {
            Self::Hex(doc) => doc.grid().has_modifications(),
            Self::Sheet(doc) => doc.grid().has_modifications(),
        }
    }

    pub(crate) fn copy_selection(&self) -> Option<String> {
        match self {
            Self::Hex(doc) => doc.copy_selection(),
            Self::Sheet(doc) => doc.copy_selection(),
        }
    }

    pub(crate) fn restore(&mut self) -> Result<(), CellGridError> {
        match self {
            Self::Hex(doc) => doc.restore(),
            Self::Sheet(doc) => doc.restore(),
        }
    }

    /// Row and column header labels of the cursor cell
    pub(crate) fn cursor_labels(&self) -> (String, String) {
        fn labels<G: CellGrid>(doc: &GridDocument<G>) -> (String, String) {
            let (row, col) = doc.cursor();
            (doc.grid().row_label(row), doc.grid().col_label(col))
        }

        match self {
            Self::Hex(doc) => labels(doc),
            Self::Sheet(doc) => labels(doc),
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        match self {
            Self::Hex(doc) => doc.editing().is_some(),
            Self::Sheet(doc) => doc.editing().is_some(),
        }
    }
}

/// Settings taken from the command line
pub struct StartupOptions {
    pub path: Option<PathBuf>,
    pub sheet: bool,
    pub settings: ViewSettings,
}

pub struct GridApp {
    /// Name of the document (aka filename)
    pub name: String,
    /// Document shown in the central panel. If `None`, nothing is open.
    pub document: Option<Document>,
    /// Per-document UI state of the grid view (scrolling, overlay focus)
    pub view: GridView,
    /// View settings new hex documents start with
    pub hex_settings: ViewSettings,
    /// Pop up handler
    pub popup: Popup,
    /// Close the window at the end of the frame
    pub quit_requested: bool,

    // -- Shared UI states
    /// Per-frame state of user inputs
    pub events: Rc<RefCell<EventState>>,
    /// Errors during loading, editing, or saving a document
    pub error: Rc<RefCell<Option<String>>>,
}

impl GridApp {
    pub(crate) fn new(startup: StartupOptions) -> Self {
        let mut app = Self {
            name: "Untitled".to_string(),
            document: None,
            view: GridView::default(),
            hex_settings: startup.settings,
            popup: Popup::default(),
            quit_requested: false,
            events: Rc::new(RefCell::new(EventState::default())),
            error: Rc::new(RefCell::new(None)),
        };

        match startup.path {
            Some(path) => app.load_file(&path, startup.sheet),
            None if startup.sheet => app.new_sheet(),
            None => app.new_hex(),
        }
        app
    }
}
