use crate::app::{Document, GridApp, colors};
use crate::events::{EventState, collect_ui_events};
use crate::ui_scrollarea::{StepScrollArea, Viewport};
use cellgridlib::{CellGrid, CellGridError, GridDocument, GridInput, GridKey, HitTarget, Outcome};
use eframe::egui;
use egui::text::{CCursor, CCursorRange};

const ROW_HEIGHT: f32 = 18.0;

/// UI state of the grid view that outlives a frame
#[derive(Default)]
pub struct GridView {
    /// Cell whose overlay input already took focus
    focused_edit: Option<(usize, usize)>,
    /// Scroll the cursor (or edited cell) into view on the next frame
    follow_cursor: bool,
}

/// Screen geometry of the visible cells
struct CellLayout {
    origin: egui::Pos2,
    cell: egui::Vec2,
    header: egui::Vec2,
    viewport: Viewport,
}

impl CellLayout {
    #[allow(clippy::cast_precision_loss)]
    fn cell_rect(&self, row: usize, col: usize) -> egui::Rect {
        let x = self.header.x + (col - self.viewport.cols.start) as f32 * self.cell.x;
        let y = self.header.y + (row - self.viewport.rows.start) as f32 * self.cell.y;
        egui::Rect::from_min_size(self.origin + egui::vec2(x, y), self.cell)
    }

    #[allow(clippy::cast_precision_loss)]
    fn col_header_rect(&self, col: usize) -> egui::Rect {
        let x = self.header.x + (col - self.viewport.cols.start) as f32 * self.cell.x;
        egui::Rect::from_min_size(
            self.origin + egui::vec2(x, 0.0),
            egui::vec2(self.cell.x, self.header.y),
        )
    }

    #[allow(clippy::cast_precision_loss)]
    fn row_header_rect(&self, row: usize) -> egui::Rect {
        let y = self.header.y + (row - self.viewport.rows.start) as f32 * self.cell.y;
        egui::Rect::from_min_size(
            self.origin + egui::vec2(0.0, y),
            egui::vec2(self.header.x, self.cell.y),
        )
    }

    fn is_visible(&self, row: usize, col: usize) -> bool {
        self.viewport.rows.contains(&row) && self.viewport.cols.contains(&col)
    }

    /// Map a pointer position to the part of the grid under it
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn hit(&self, pos: egui::Pos2) -> HitTarget {
        let rel = pos - self.origin;
        let col = (rel.x >= self.header.x)
            .then(|| self.viewport.cols.start + ((rel.x - self.header.x) / self.cell.x) as usize)
            .filter(|col| self.viewport.cols.contains(col));
        let row = (rel.y >= self.header.y)
            .then(|| self.viewport.rows.start + ((rel.y - self.header.y) / self.cell.y) as usize)
            .filter(|row| self.viewport.rows.contains(row));

        let in_col_header = rel.y < self.header.y;
        let in_row_header = rel.x < self.header.x;

        match (row, col) {
            (Some(row), Some(col)) => HitTarget::Cell { row, col },
            (None, Some(col)) if in_col_header => HitTarget::ColHeader(col),
            (Some(row), None) if in_row_header => HitTarget::RowHeader(row),
            _ => HitTarget::DeadZone,
        }
    }
}

impl GridApp {
    /// Displays the central panel with the grid of the open document
    pub(crate) fn show_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            // Collect input events once per frame and store in the app state
            *self.events.borrow_mut() = collect_ui_events(ui);
            let events = self.events.borrow().clone();

            let Some(document) = &mut self.document else {
                ui.centered_and_justified(|ui| {
                    ui.label("Drop a file or use 'File' > 'New' to start editing!");
                });
                return;
            };

            let res = match document {
                Document::Hex(doc) => self.view.show(ui, doc, &events),
                Document::Sheet(doc) => self.view.show(ui, doc, &events),
            };

            match res {
                Ok(Outcome::Quit) => self.quit_requested = true,
                Ok(_) => {}
                Err(err) => {
                    self.error.borrow_mut().replace(err.to_string());
                }
            }
        });
    }
}

impl GridView {
    fn show<G: CellGrid>(
        &mut self,
        ui: &mut egui::Ui,
        doc: &mut GridDocument<G>,
        events: &EventState,
    ) -> Result<Outcome, CellGridError> {
        // Keyboard input first, the overlay input is drawn after it
        for key in &events.keys {
            // While editing the overlay handles typing and cursor movement itself
            let editing = doc.editing().is_some();
            if editing && matches!(key, GridKey::Char(_) | GridKey::Backspace | GridKey::Arrow(_))
            {
                continue;
            }

            match doc.handle(GridInput::Key(*key))? {
                Outcome::Quit => return Ok(Outcome::Quit),
                Outcome::Redraw => self.follow_cursor = true,
                Outcome::Ignored => {}
            }
        }

        // Clipboard shortcuts act on the selection when no cell is being edited
        if doc.editing().is_none() {
            if events.copy
                && let Some(text) = doc.copy_selection()
            {
                ui.ctx().copy_text(text);
            }
            if let Some(text) = &events.paste {
                doc.paste(text)?;
            }
        }

        let font = egui::FontId::monospace(12.0);
        let char_width = ui
            .painter()
            .layout_no_wrap("0".to_string(), font.clone(), egui::Color32::WHITE)
            .size()
            .x;

        // Size cells by the widest value and header text
        let grid = doc.grid();
        let (rows, cols) = (grid.rows(), grid.cols());
        let col_label_chars = grid.col_label(cols.saturating_sub(1)).len();
        let row_label_chars = grid
            .row_label(rows.saturating_sub(1))
            .len()
            .max(grid.row_label(0).len());
        let cell_chars = doc.col_chars().max(col_label_chars).max(2);

        #[allow(clippy::cast_precision_loss)]
        let cell_size = egui::vec2(cell_chars as f32 * char_width + 10.0, ROW_HEIGHT);
        #[allow(clippy::cast_precision_loss)]
        let header_size = egui::vec2(row_label_chars as f32 * char_width + 14.0, ROW_HEIGHT);

        let target = self.follow_cursor.then(|| {
            doc.editing()
                .map_or_else(|| doc.cursor(), |edit| (edit.row, edit.col))
        });
        self.follow_cursor = false;

        StepScrollArea::new(ui.make_persistent_id("grid_scroll"))
            .with_target_cell(target)
            .show_cells(ui, cell_size, header_size, (rows, cols), |ui, viewport| {
                let layout = CellLayout {
                    origin: viewport.rect.min,
                    cell: cell_size,
                    header: header_size,
                    viewport,
                };
                self.draw_grid(ui, doc, events, &layout, &font)
            })
    }

    fn draw_grid<G: CellGrid>(
        &mut self,
        ui: &mut egui::Ui,
        doc: &mut GridDocument<G>,
        events: &EventState,
        layout: &CellLayout,
        font: &egui::FontId,
    ) -> Result<Outcome, CellGridError> {
        // Pointer input. Widgets on top (overlay input, menus) take the pointer first.
        let response = ui.interact(
            layout.viewport.rect,
            ui.id().with("cells"),
            egui::Sense::click_and_drag(),
        );
        if (response.hovered() || response.dragged())
            && let Some(pos) = events.pointer_hover
            && layout.viewport.rect.contains(pos)
        {
            let hit = layout.hit(pos);
            if events.pointer_pressed {
                doc.handle(GridInput::Press(hit))?;
            } else if events.pointer_down {
                doc.handle(GridInput::Drag(hit))?;
            }
        }

        Self::draw_headers(ui, doc, layout, font);
        Self::draw_cells(ui, doc, layout, font);
        self.draw_overlay(ui, doc, layout, font)?;

        Ok(Outcome::Redraw)
    }

    fn draw_headers<G: CellGrid>(
        ui: &egui::Ui,
        doc: &GridDocument<G>,
        layout: &CellLayout,
        font: &egui::FontId,
    ) {
        let painter = ui.painter();
        let selection = doc.selection();

        for col in layout.viewport.cols.clone() {
            let rect = layout.col_header_rect(col);
            painter.rect_filled(rect, 0.0, colors::HEADER_BG);
            if selection.is_col_selected(col) {
                painter.rect_filled(rect, 0.0, colors::LIGHT_BLUE);
            }
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                doc.grid().col_label(col),
                font.clone(),
                colors::GRAY_160,
            );
        }

        for row in layout.viewport.rows.clone() {
            let rect = layout.row_header_rect(row);
            painter.rect_filled(rect, 0.0, colors::HEADER_BG);
            if selection.is_row_selected(row) {
                painter.rect_filled(rect, 0.0, colors::LIGHT_BLUE);
            }
            painter.text(
                rect.left_center() + egui::vec2(6.0, 0.0),
                egui::Align2::LEFT_CENTER,
                doc.grid().row_label(row),
                font.clone(),
                colors::GRAY_160,
            );
        }
    }

    fn draw_cells<G: CellGrid>(
        ui: &egui::Ui,
        doc: &GridDocument<G>,
        layout: &CellLayout,
        font: &egui::FontId,
    ) {
        let painter = ui.painter();
        let grid = doc.grid();
        let selection = doc.selection();
        let editing = doc.editing().map(|edit| (edit.row, edit.col));

        for row in layout.viewport.rows.clone() {
            for col in layout.viewport.cols.clone() {
                let rect = layout.cell_rect(row, col);

                // Selected (1st prio) or modified (2nd prio)
                if selection.contains(row, col) {
                    painter.rect_filled(rect, 0.0, colors::LIGHT_BLUE);
                } else if grid.is_modified(row, col) {
                    painter.rect_filled(rect, 0.0, colors::MUD);
                }

                // The overlay input shows the edited value
                if editing == Some((row, col)) {
                    continue;
                }

                let (text, color) = match doc.display_cell(row, col) {
                    Some(text) if grid.is_editable(row, col) => {
                        // Change color of every other column for better readability
                        let color = if col % 2 == 0 {
                            colors::GRAY_210
                        } else {
                            colors::GRAY_160
                        };
                        (text, color)
                    }
                    // Read-only derived cells (totals)
                    Some(text) => (text, ui.visuals().strong_text_color()),
                    None => ("--".to_string(), colors::GRAY_120),
                };

                painter.text(
                    rect.right_center() - egui::vec2(5.0, 0.0),
                    egui::Align2::RIGHT_CENTER,
                    text,
                    font.clone(),
                    color,
                );
            }
        }

        // Outline the cursor cell
        let (row, col) = doc.cursor();
        if layout.is_visible(row, col) {
            painter.rect_stroke(
                layout.cell_rect(row, col),
                0.0,
                ui.visuals().selection.stroke,
                egui::StrokeKind::Inside,
            );
        }
    }

    /// Put the overlay input over the edited cell. It takes focus on its first frame
    /// and commits the edit when it loses focus.
    fn draw_overlay<G: CellGrid>(
        &mut self,
        ui: &mut egui::Ui,
        doc: &mut GridDocument<G>,
        layout: &CellLayout,
        font: &egui::FontId,
    ) -> Result<(), CellGridError> {
        let Some(edit) = doc.editing() else {
            self.focused_edit = None;
            return Ok(());
        };
        let (row, col, select_all) = (edit.row, edit.col, edit.selected_all);

        // Scrolling the edited cell out of view ends the edit
        if !layout.is_visible(row, col) {
            self.focused_edit = None;
            doc.commit()?;
            return Ok(());
        }

        let rect = layout.cell_rect(row, col);
        let limit = doc.col_chars();
        let id = ui.make_persistent_id(("cell_edit", row, col));
        let first_frame = self.focused_edit != Some((row, col));

        let Some(buffer) = doc.edit_buffer_mut() else {
            return Ok(());
        };
        let len = buffer.chars().count();

        ui.painter()
            .rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);
        let response = ui.put(
            rect,
            egui::TextEdit::singleline(buffer)
                .id(id)
                .font(font.clone())
                .char_limit(limit)
                .frame(false)
                .margin(egui::Margin::symmetric(4, 1))
                .horizontal_align(egui::Align::Max)
                .desired_width(rect.width()),
        );

        if first_frame {
            response.request_focus();

            // Select the seeded value, or put the cursor after a typed first char
            if let Some(mut state) = egui::TextEdit::load_state(ui.ctx(), id) {
                let end = CCursor::new(len);
                let range = if select_all {
                    CCursorRange::two(CCursor::new(0), end)
                } else {
                    CCursorRange::one(end)
                };
                state.cursor.set_char_range(Some(range));
                state.store(ui.ctx(), id);
            }
            self.focused_edit = Some((row, col));
        } else if response.lost_focus() {
            self.focused_edit = None;
            doc.commit()?;
        }
        Ok(())
    }
}
