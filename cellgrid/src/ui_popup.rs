use crate::app::{GridApp, colors};
use crate::events::collect_ui_events;
use eframe::egui;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PopupType {
    Error,
    About,
}

impl PopupType {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::About => "About",
        }
    }
}

/// Modal window shown on top of the grid. While one is open the grid gets no input.
#[derive(Default)]
pub struct Popup {
    pub(crate) active: bool,
    pub(crate) ptype: Option<PopupType>,
}

impl Popup {
    pub const fn open(&mut self, ptype: PopupType) {
        self.active = true;
        self.ptype = Some(ptype);
    }

    pub const fn clear(&mut self) {
        self.active = false;
        self.ptype = None;
    }
}

const ABOUT_TEXT: &str = "Click a cell and type to edit it. Enter commits the edit, \
arrow keys and Tab move the cursor, and Escape commits and quits.\n\n\
Raw files are shown as cells of 1 to 4 bytes in octal, decimal, or hex. \
CSV files open as a 100 x 100 spreadsheet with row and column totals.";

impl GridApp {
    /// Grey out the app and swallow its input for this frame
    fn block_background(&self, ctx: &egui::Context) {
        let content_rect = ctx.content_rect();

        egui::Area::new(egui::Id::from("modal_blocker"))
            .order(egui::Order::Background)
            .fixed_pos(content_rect.left_top())
            .show(ctx, |ui| {
                ui.allocate_rect(content_rect, egui::Sense::click());
                *self.events.borrow_mut() = collect_ui_events(ui);
            });

        ctx.layer_painter(egui::LayerId::new(
            egui::Order::Background,
            egui::Id::new("modal_bg"),
        ))
        .rect_filled(content_rect, 0.0, colors::SHADOW);
    }

    /// Error message with an OK button. Returns true when confirmed.
    fn error_contents(&self, ui: &mut egui::Ui) -> bool {
        let message = self.error.borrow().clone().unwrap_or_default();
        ui.label(message);
        ui.add_space(10.0);

        let confirmed = ui.button(" OK ").clicked();
        confirmed || self.events.borrow().enter_pressed
    }

    fn about_contents(ui: &mut egui::Ui) {
        ui.add_space(5.0);
        ui.heading("CellGrid");
        ui.label("Grid editor for raw bytes and small spreadsheets");

        ui.separator();
        ui.label(ABOUT_TEXT);
        ui.separator();

        ui.label(
            egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                .color(colors::GRAY_160),
        );
        ui.add_space(5.0);
    }

    /// Show the active pop-up. Closing it (window button, OK, Enter, or Escape) also
    /// clears the pending error.
    pub(crate) fn show_popup(&mut self, ctx: &egui::Context) {
        self.block_background(ctx);

        let Some(ptype) = self.popup.ptype else {
            self.popup.clear();
            return;
        };

        let mut window_open = true;
        let mut confirmed = false;
        egui::Window::new(ptype.title())
            .open(&mut window_open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| match ptype {
                PopupType::Error => confirmed = self.error_contents(ui),
                PopupType::About => Self::about_contents(ui),
            });

        let escaped = self.events.borrow().escape_pressed;
        if confirmed || escaped || !window_open {
            self.error.borrow_mut().take();
            self.popup.clear();
        }
    }
}
