use crate::app::{Document, GridApp};
use crate::ui_popup::PopupType;
use cellgridlib::{Base, ElementWidth, Endianness, ViewSettings};
use eframe::egui;

impl GridApp {
    /// Apply new view settings to the open document
    fn apply_settings(&mut self, settings: ViewSettings) {
        let Some(document) = &mut self.document else {
            return;
        };

        match document.set_settings(settings) {
            Ok(()) => {
                // New hex documents keep the last hex view
                if !document.is_sheet() {
                    self.hex_settings = *document.settings();
                }
            }
            Err(err) => {
                self.error.borrow_mut().replace(err.to_string());
            }
        }
    }

    fn copy_to_clipboard(&self, ctx: &egui::Context) {
        if let Some(text) = self.document.as_ref().and_then(Document::copy_selection) {
            ctx.copy_text(text);
        }
    }

    /// Displays the top menu bar with File, Edit, View, and About buttons
    pub(crate) fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menubar").show(ctx, |ui| {
            ui.add_space(3.0);

            egui::MenuBar::new().ui(ui, |ui| {
                ui.horizontal(|ui| {
                    self.show_file_menu(ui);
                    self.show_edit_menu(ui);
                    self.show_view_menu(ui);

                    // ABOUT BUTTON
                    if ui.button("About").clicked() {
                        self.popup.open(PopupType::About);
                    }
                });
            });

            ui.add_space(2.0);
        });
    }

    fn show_file_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("File", |ui| {
            // NEW BUTTONS
            if ui.button("New hex buffer").clicked() {
                self.new_hex();
            }
            if ui.button("New spreadsheet").clicked() {
                self.new_sheet();
            }

            ui.separator();

            // OPEN BUTTON
            if ui.button("Open file...").clicked()
                && let Some(path) = rfd::FileDialog::new().set_title("Open File").pick_file()
            {
                self.load_file(&path, false);
            }
            if ui.button("Open as spreadsheet...").clicked()
                && let Some(path) = rfd::FileDialog::new()
                    .set_title("Open Spreadsheet")
                    .add_filter("CSV", &["csv"])
                    .pick_file()
            {
                self.load_file(&path, true);
            }

            ui.separator();

            // SAVE BUTTONS
            if ui
                .add_enabled(self.document.is_some(), egui::Button::new("Save"))
                .clicked()
            {
                self.save();
            }
            if ui
                .add_enabled(self.document.is_some(), egui::Button::new("Save as..."))
                .clicked()
                && let Some(path) = self.pick_save_path()
            {
                self.save_as(&path);
            }

            ui.separator();

            // QUIT BUTTON
            if ui.button("Quit").clicked() {
                self.quit_requested = true;
            }
        });
    }

    fn show_edit_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("Edit", |ui| {
            let has_document = self.document.is_some();

            // COPY BUTTON
            if ui
                .add_enabled(has_document, egui::Button::new("Copy"))
                .clicked()
            {
                self.copy_to_clipboard(ui.ctx());
            }

            // PASTE BUTTON: request the clipboard, the grid receives it as a paste event
            if ui
                .add_enabled(has_document, egui::Button::new("Paste"))
                .clicked()
            {
                ui.ctx()
                    .send_viewport_cmd(egui::ViewportCommand::RequestPaste);
            }

            ui.separator();

            // RESTORE BUTTON
            let modified = self
                .document
                .as_ref()
                .is_some_and(Document::has_modifications);
            if ui
                .add_enabled(modified, egui::Button::new("Restore changes"))
                .clicked()
                && let Some(document) = &mut self.document
                && let Err(err) = document.restore()
            {
                self.error.borrow_mut().replace(err.to_string());
            }
        });
    }

    fn show_view_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("View", |ui| {
            let Some(document) = &self.document else {
                ui.label("No document open");
                return;
            };
            let current = *document.settings();
            let is_sheet = document.is_sheet();
            let mut selected = current;

            // Spreadsheet cells are always signed 32-bit
            ui.add_enabled_ui(!is_sheet, |ui| {
                ui.label("Cell width:");
                ui.add_space(3.0);
                for width in ElementWidth::ALL {
                    ui.radio_value(&mut selected.width, width, width_label(width));
                    ui.add_space(1.0);
                }

                ui.separator();
                ui.checkbox(&mut selected.signed, "Signed");
            });

            ui.separator();
            ui.label("Base:");
            ui.add_space(3.0);
            for base in Base::ALL {
                ui.radio_value(&mut selected.base, base, base.label());
                ui.add_space(1.0);
            }

            ui.separator();
            ui.add_enabled_ui(!is_sheet, |ui| {
                ui.label("Byte order:");
                ui.add_space(3.0);
                ui.radio_value(&mut selected.endianness, Endianness::Little, "Little endian");
                ui.add_space(1.0);
                ui.radio_value(&mut selected.endianness, Endianness::Big, "Big endian");
            });

            if selected != current {
                self.apply_settings(selected);
            }
        });
    }
}

fn width_label(width: ElementWidth) -> String {
    format!("{} ({} bytes)", width.label(), width.bytes())
}
