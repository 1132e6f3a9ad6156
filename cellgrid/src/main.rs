#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
// Tell OS to hide the console window when running.
// This attribute is only applied if the target OS is Windows.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod events;
mod loader;
mod ui_centralpanel;
mod ui_filedrop;
mod ui_menubar;
mod ui_popup;
mod ui_scrollarea;
mod ui_statusbar;

use crate::ui_popup::PopupType;
use app::{GridApp, StartupOptions};
use cellgridlib::{Base, ElementWidth, Endianness, ViewSettings};
use clap::Parser;
use eframe::egui;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Hex grid and spreadsheet editor
#[derive(Parser)]
#[command(name = "cellgrid", version, about)]
struct Args {
    /// File to open (raw bytes, or a CSV spreadsheet)
    path: Option<PathBuf>,
    /// Open the file (or a new document) as a spreadsheet
    #[arg(long)]
    sheet: bool,
    /// Bytes per cell (1 to 4)
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=4))]
    width: u8,
    /// Numeric base (8, 10 or 16)
    #[arg(long, default_value = "16", value_parser = ["8", "10", "16"])]
    base: String,
    /// Interpret cells as signed
    #[arg(long)]
    signed: bool,
    /// Read multi-byte cells as big endian
    #[arg(long)]
    big_endian: bool,
}

impl Args {
    fn startup_options(self) -> StartupOptions {
        let base = self
            .base
            .parse()
            .ok()
            .and_then(Base::from_radix)
            .unwrap_or_default();
        let endianness = if self.big_endian {
            Endianness::Big
        } else {
            Endianness::Little
        };

        let settings = ViewSettings::hex_default()
            .with_width(ElementWidth::from_bytes(usize::from(self.width)).unwrap_or_default())
            .with_base(base)
            .with_signed(self.signed)
            .with_endianness(endianness);

        StartupOptions {
            path: self.path,
            sheet: self.sheet,
            settings,
        }
    }
}

/// Install the console subscriber. `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_filter(filter),
        )
        .init();
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    init_tracing();

    let startup = args.startup_options();
    let options = eframe::NativeOptions {
        vsync: true,
        viewport: egui::ViewportBuilder::default()
            .with_resizable(true)
            .with_inner_size([1280.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "CellGrid",
        options,
        Box::new(|_cc| Ok(Box::new(GridApp::new(startup)))),
    )
}

impl eframe::App for GridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        #[cfg(debug_assertions)]
        {
            // Track FPS
            let dt = ctx.input(|i| i.stable_dt);
            let fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };
            tracing::trace!(fps, "frame");
        }

        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);

        if self.error.borrow().is_some() {
            self.popup.open(PopupType::Error);
        }

        self.handle_drag_and_drop(ctx);

        // While a popup is shown the grid gets no input
        if self.popup.active {
            self.show_popup(ctx);
        } else {
            self.show_central_panel(ctx);
        }

        if self.quit_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}
