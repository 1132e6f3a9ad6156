use cellgridlib::{Direction, GridKey};
use eframe::egui;

#[derive(Default, Clone)]
pub struct EventState {
    /// Grid keys pressed this frame, in order
    pub(crate) keys: Vec<GridKey>,
    pub(crate) pointer_pressed: bool,
    pub(crate) pointer_down: bool,
    pub(crate) pointer_hover: Option<egui::Pos2>,
    pub(crate) escape_pressed: bool,
    pub(crate) enter_pressed: bool,
    /// Copy shortcut was used
    pub(crate) copy: bool,
    /// Text of the paste shortcut
    pub(crate) paste: Option<String>,
}

/// Helper for mapping egui keys to grid keys
const fn key_to_grid_key(key: egui::Key) -> Option<GridKey> {
    Some(match key {
        egui::Key::Escape => GridKey::Escape,
        egui::Key::Enter => GridKey::Enter,
        egui::Key::Backspace => GridKey::Backspace,
        egui::Key::ArrowUp => GridKey::Arrow(Direction::Up),
        egui::Key::ArrowDown => GridKey::Arrow(Direction::Down),
        egui::Key::ArrowLeft => GridKey::Arrow(Direction::Left),
        egui::Key::ArrowRight => GridKey::Arrow(Direction::Right),
        _ => return None,
    })
}

/// Collect events once per frame and return an aggregated state
pub fn collect_ui_events(ui: &egui::Ui) -> EventState {
    ui.input(|i| {
        let mut state = EventState {
            pointer_pressed: i.pointer.primary_pressed(),
            pointer_down: i.pointer.primary_down(),
            pointer_hover: i.pointer.hover_pos(),
            ..Default::default()
        };

        for event in &i.events {
            match event {
                egui::Event::Key {
                    key: egui::Key::Tab,
                    pressed: true,
                    modifiers,
                    ..
                } => state.keys.push(GridKey::Tab {
                    backward: modifiers.shift,
                }),
                egui::Event::Key {
                    key, pressed: true, ..
                } => {
                    if let Some(grid_key) = key_to_grid_key(*key) {
                        state.keys.push(grid_key);
                    }
                }
                // Typed characters (already layout and shift aware)
                egui::Event::Text(text) => {
                    state.keys.extend(text.chars().map(GridKey::Char));
                }
                egui::Event::Copy => state.copy = true,
                egui::Event::Paste(text) => state.paste = Some(text.clone()),
                _ => {}
            }
        }

        // Direct query for Escape / Enter pressed this frame
        state.escape_pressed = i.key_pressed(egui::Key::Escape);
        state.enter_pressed = i.key_pressed(egui::Key::Enter);

        state
    })
}
