use crate::app::GridApp;
use eframe::egui;

impl GridApp {
    /// Handle drag and drop events:
    /// - If a file is dropped, open it (CSV files as a spreadsheet).
    /// - If a file is dragged over the window, display a message.
    /// - If the popup is shown, do not handle drag and drop events.
    pub(crate) fn handle_drag_and_drop(&mut self, ctx: &egui::Context) {
        if self.popup.active {
            return;
        }

        // Overwrite the central panel with a message when file is dragged over
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        if hovering {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.heading("Drop file to open");
                });
            });
        }

        // Only the first dropped file is opened, there is one document at a time
        let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(|f| f.path.clone()));
        if let Some(path) = dropped {
            self.load_file(&path, false);
        }
    }
}
