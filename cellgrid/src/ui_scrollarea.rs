use eframe::egui;
use std::ops::Range;

/// Width of the strip reserved for each scrollbar
const BAR_STRIP: f32 = 14.0;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Axis {
    Vertical,
    Horizontal,
}

/// Visible part of the grid handed to the content closure
pub struct Viewport {
    /// Area where headers and cells are drawn (scrollbars excluded)
    pub rect: egui::Rect,
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

/// Custom scroll area that scrolls in discrete steps: one row vertically, one column
/// horizontally
pub struct StepScrollArea {
    id: egui::Id,
    target_cell: Option<(usize, usize)>,
}

impl StepScrollArea {
    pub const fn new(id: egui::Id) -> Self {
        Self {
            id,
            target_cell: None,
        }
    }

    /// Scroll just enough for the cell to become visible
    pub const fn with_target_cell(mut self, cell: Option<(usize, usize)>) -> Self {
        self.target_cell = cell;
        self
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn show_cells<R>(
        self,
        ui: &mut egui::Ui,
        cell_size: egui::Vec2,
        header_size: egui::Vec2,
        (total_rows, total_cols): (usize, usize),
        add_contents: impl FnOnce(&mut egui::Ui, Viewport) -> R,
    ) -> R {
        // Allocate the full available space
        let (rect, _response) =
            ui.allocate_at_least(ui.available_size(), egui::Sense::hover());
        let content_rect = egui::Rect::from_min_max(
            rect.min,
            egui::pos2(rect.right() - BAR_STRIP, rect.bottom() - BAR_STRIP),
        );

        // Get / set scroll state
        let (mut top_row, mut left_col): (usize, usize) =
            ui.data_mut(|d| *d.get_temp_mut_or_default(self.id));

        // Make discrete scroll logic (one row/col is a scroll step).
        // Add threshold to ignore small drifts.
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
        if scroll_delta.y.abs() > 0.4 {
            let row_delta = if scroll_delta.y > 0.0 { -1 } else { 1 };
            top_row = top_row.saturating_add_signed(row_delta);
        }
        if scroll_delta.x.abs() > 0.4 {
            let col_delta = if scroll_delta.x > 0.0 { -1 } else { 1 };
            left_col = left_col.saturating_add_signed(col_delta);
        }

        // Make view boundary
        let visible_rows = ((content_rect.height() - header_size.y) / cell_size.y)
            .floor()
            .max(0.0) as usize;
        let visible_cols = ((content_rect.width() - header_size.x) / cell_size.x)
            .floor()
            .max(0.0) as usize;

        if let Some((row, col)) = self.target_cell {
            top_row = scroll_into_view(top_row, row, visible_rows);
            left_col = scroll_into_view(left_col, col, visible_cols);
        }

        // Allow 1 empty row at the bottom
        top_row = top_row.min(total_rows.saturating_sub(visible_rows.saturating_sub(1)));
        left_col = left_col.min(total_cols.saturating_sub(visible_cols));

        ui.data_mut(|d| d.insert_temp(self.id, (top_row, left_col)));

        // Draw custom scrollbars
        draw_custom_scrollbar(
            ui,
            rect,
            Axis::Vertical,
            (top_row, total_rows, visible_rows),
            self.id,
        );
        draw_custom_scrollbar(
            ui,
            rect,
            Axis::Horizontal,
            (left_col, total_cols, visible_cols),
            self.id,
        );

        // Render content
        let mut child_ui = ui.new_child(
            egui::UiBuilder::new()
                .max_rect(content_rect)
                .layout(egui::Layout::top_down(egui::Align::Min)),
        );
        child_ui.set_clip_rect(content_rect);

        let viewport = Viewport {
            rect: content_rect,
            rows: top_row..(top_row + visible_rows).min(total_rows),
            cols: left_col..(left_col + visible_cols).min(total_cols),
        };
        add_contents(&mut child_ui, viewport)
    }
}

/// First visible index after scrolling `target` into a window of `visible` items
const fn scroll_into_view(first: usize, target: usize, visible: usize) -> usize {
    if visible == 0 || target < first {
        target
    } else if target >= first + visible {
        target + 1 - visible
    } else {
        first
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
/// Draw a custom scrollbar along the right (vertical) or bottom (horizontal) edge
fn draw_custom_scrollbar(
    ui: &egui::Ui,
    rect: egui::Rect,
    axis: Axis,
    (first, total, visible): (usize, usize, usize),
    id: egui::Id,
) {
    if total <= visible {
        return;
    }
    let bar_id = id.with(if axis == Axis::Vertical { "v" } else { "h" });

    // Setup layout & margins
    let margin = 4.0;
    let end_margin = 12.0; // keep clear of the other bar
    let strip_rect = match axis {
        Axis::Vertical => egui::Rect::from_min_max(
            egui::pos2(rect.right() - BAR_STRIP, rect.top() + margin),
            egui::pos2(rect.right() - 2.0, rect.bottom() - end_margin - BAR_STRIP),
        ),
        Axis::Horizontal => egui::Rect::from_min_max(
            egui::pos2(rect.left() + margin, rect.bottom() - BAR_STRIP),
            egui::pos2(rect.right() - end_margin - BAR_STRIP, rect.bottom() - 2.0),
        ),
    };

    // Animation logic (for shrinking / expanding)
    let is_hovered = ui.rect_contains_pointer(strip_rect);
    let expansion = ui.ctx().animate_bool(bar_id.with("anim"), is_hovered);
    let bar_width = egui::lerp(4.0..=10.0, expansion);
    let bar_rect = match axis {
        Axis::Vertical => strip_rect.with_min_x(strip_rect.right() - bar_width),
        Axis::Horizontal => strip_rect.with_min_y(strip_rect.bottom() - bar_width),
    };
    let track_len = match axis {
        Axis::Vertical => bar_rect.height(),
        Axis::Horizontal => bar_rect.width(),
    };

    // Handle size follows the visible share. Set a limit for how small it gets.
    let max_first = total.saturating_sub(visible);
    let handle_len = ((visible as f32 / total as f32) * track_len).max(20.0);

    // Travel range is the track length minus the handle length
    let travel_range = track_len - handle_len;
    let progress = (first as f32 / max_first as f32).min(1.0);
    let handle_offset = progress * travel_range;

    // Track scrollbar interactions
    let response = ui.interact(bar_rect, bar_id.with("bar"), egui::Sense::click_and_drag());
    if (response.clicked() || response.dragged())
        && let Some(pointer_pos) = ui.input(|i| i.pointer.hover_pos())
    {
        // Center the handle on the pointer for a better feel
        let along = match axis {
            Axis::Vertical => pointer_pos.y - bar_rect.top(),
            Axis::Horizontal => pointer_pos.x - bar_rect.left(),
        } - handle_len / 2.0;
        let t = (along / travel_range).clamp(0.0, 1.0);

        let new_first = (t * max_first as f32).round() as usize;
        ui.data_mut(|d| {
            let state: &mut (usize, usize) = d.get_temp_mut_or_default(id);
            match axis {
                Axis::Vertical => state.0 = new_first,
                Axis::Horizontal => state.1 = new_first,
            }
        });
    }

    // Paint the track
    let track_color = ui.visuals().extreme_bg_color;
    ui.painter()
        .rect_filled(bar_rect, 2.0, track_color.gamma_multiply(expansion));

    // Paint the handle
    let handle_rect = match axis {
        Axis::Vertical => egui::Rect::from_min_size(
            egui::pos2(bar_rect.left(), bar_rect.top() + handle_offset),
            egui::vec2(bar_width, handle_len),
        ),
        Axis::Horizontal => egui::Rect::from_min_size(
            egui::pos2(bar_rect.left() + handle_offset, bar_rect.top()),
            egui::vec2(handle_len, bar_width),
        ),
    };
    let handle_color = if response.dragged() {
        ui.visuals().widgets.active.bg_fill
    } else if is_hovered {
        ui.visuals().widgets.hovered.bg_fill
    } else {
        ui.visuals().widgets.inactive.bg_fill
    };

    ui.painter().rect_filled(handle_rect, 2.0, handle_color);
}
