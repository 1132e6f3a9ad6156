use crate::app::{GridApp, colors};
use cellgridlib::Endianness;
use eframe::egui;

impl GridApp {
    /// Bottom bar with the document name, view settings, and cursor position
    pub(crate) fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("statusbar").show(ctx, |ui| {
            ui.add_space(2.0);

            let Some(document) = &self.document else {
                ui.label(egui::RichText::new("No document").color(colors::GRAY_120));
                ui.add_space(2.0);
                return;
            };

            ui.horizontal(|ui| {
                // Show the filepath on hover
                let filepath = document.filepath().to_string_lossy().into_owned();
                let response = ui.add(egui::Label::new(&self.name).sense(egui::Sense::hover()));
                if !filepath.is_empty() {
                    response.on_hover_text(&filepath);
                }

                if document.has_modifications() {
                    ui.label(egui::RichText::new("modified").color(colors::GRAY_210).strong());
                }

                ui.separator();

                let settings = document.settings();
                if document.is_sheet() {
                    ui.label("Spreadsheet");
                } else {
                    let sign = if settings.signed { "signed" } else { "unsigned" };
                    let order = match settings.endianness {
                        Endianness::Little => "LE",
                        Endianness::Big => "BE",
                    };
                    ui.label(format!("{} {sign} {order}", settings.width.label()));
                }
                ui.separator();
                ui.label(settings.base.label());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (row, col) = document.cursor_labels();
                    ui.label(egui::RichText::new(format!("{row} : {col}")).monospace());
                    if document.is_editing() {
                        ui.label(egui::RichText::new("editing").color(colors::GRAY_160));
                    }
                });
            });

            ui.add_space(2.0);
        });
    }
}
