use cellgridlib::{Base, ByteStore, CellGrid, ElementWidth, Endianness, ViewSettings, codec};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

/// Inspect and edit raw files as grids of integer cells
#[derive(Parser)]
#[command(name = "gridcli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show size and grid shape of a file
    Info {
        input: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Print the cells of a file
    Dump {
        input: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
        /// Row range to print, e.g. `0:10` (end exclusive)
        #[arg(long)]
        rows: Option<String>,
    },
    /// Write one cell and save the result to a new file
    Set {
        input: PathBuf,
        output: PathBuf,
        row: usize,
        col: usize,
        /// Value in the selected base
        #[arg(allow_hyphen_values = true)]
        value: String,
        #[command(flatten)]
        view: ViewArgs,
    },
}

/// How the bytes are cut into cells and displayed
#[derive(Args, Clone, Copy)]
struct ViewArgs {
    /// Bytes per cell (1 to 4)
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=4))]
    width: u8,
    /// Numeric base (8, 10 or 16)
    #[arg(long, default_value_t = 16)]
    base: u32,
    /// Interpret cells as signed
    #[arg(long)]
    signed: bool,
    /// Read multi-byte cells as big endian
    #[arg(long)]
    big_endian: bool,
}

impl ViewArgs {
    fn settings(self) -> Result<ViewSettings, Box<dyn std::error::Error>> {
        let width = ElementWidth::from_bytes(usize::from(self.width))
            .ok_or_else(|| format!("Invalid width: {}", self.width))?;
        let base = Base::from_radix(self.base).ok_or_else(|| format!("Invalid base: {}", self.base))?;
        let endianness = if self.big_endian {
            Endianness::Big
        } else {
            Endianness::Little
        };

        Ok(ViewSettings::hex_default()
            .with_width(width)
            .with_base(base)
            .with_signed(self.signed)
            .with_endianness(endianness))
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_dispatch(cli.command) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_dispatch(cmd: Command) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Command::Info { input, view } => {
            let abs_path = validate_exists(&input)?;
            run_info(&abs_path, &view.settings()?)
        }
        Command::Dump { input, view, rows } => {
            let abs_path = validate_exists(&input)?;
            let range = rows.as_deref().map(parse_row_range).transpose()?;
            run_dump(&abs_path, &view.settings()?, range)
        }
        Command::Set {
            input,
            output,
            row,
            col,
            value,
            view,
        } => {
            let abs_path = validate_exists(&input)?;
            run_set(&abs_path, &output, (row, col), &value, &view.settings()?)
        }
    }
}

fn run_info(path: &Path, settings: &ViewSettings) -> Result<(), Box<dyn std::error::Error>> {
    let store = load(path, settings)?;
    let shape = store.shape();

    println!("File Path:   {}", path.display());
    println!("Data Size:   {} bytes", format_with_commas(store.len()));
    println!("Cell Width:  {} bytes", shape.bytes_per_col);
    println!("Row Width:   {} bytes", shape.row_bytes);
    println!("Grid:        {} rows x {} cols", shape.rows, shape.cols);
    Ok(())
}

fn run_dump(
    path: &Path,
    settings: &ViewSettings,
    rows: Option<(usize, usize)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = load(path, settings)?;
    let width = codec::col_chars(settings);
    let (start, end) = rows.unwrap_or((0, store.rows()));

    // Column header, aligned with the 8-char row labels
    let header = (0..store.cols())
        .map(|col| format!("{:>width$}", store.col_label(col)))
        .collect::<Vec<_>>()
        .join(" ");
    println!("{:8}  {header}", "");

    for row in start..end.min(store.rows()) {
        let cells = (0..store.cols())
            .map(|col| {
                let text = store
                    .cell(row, col)
                    .map_or_else(|| "--".to_string(), |v| codec::format(v, settings));
                format!("{text:>width$}")
            })
            .collect::<Vec<_>>()
            .join(" ");
        println!("{}: {cells}", store.row_label(row));
    }
    Ok(())
}

fn run_set(
    in_path: &Path,
    out_path: &Path,
    (row, col): (usize, usize),
    value: &str,
    settings: &ViewSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = load(in_path, settings)?;
    let parsed = codec::parse(value, settings.base);
    store.set(row, col, parsed)?;
    store.save_file(out_path)?;

    // Validate output file was written
    let out_abs_path = validate_exists(out_path)?;

    println!(
        "Set ({row}, {col}) to {} -> {}",
        store
            .get(row, col)
            .map_or_else(String::new, |v| codec::format(v, settings)),
        out_abs_path.display()
    );
    Ok(())
}

// =============================== HELPER FUNCTIONS ===============================

fn load(path: &Path, settings: &ViewSettings) -> Result<ByteStore, Box<dyn std::error::Error>> {
    let mut store = ByteStore::new();
    store.load_file(path, settings)?;
    Ok(store)
}

fn format_with_commas(n: usize) -> String {
    let s = n.to_string();
    s.as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse `start:end` into a row range
fn parse_row_range(s: &str) -> Result<(usize, usize), Box<dyn std::error::Error>> {
    let (start, end) = s
        .split_once(':')
        .ok_or_else(|| format!("Invalid row range: {s}"))?;
    let start = if start.is_empty() { 0 } else { start.trim().parse()? };
    let end = if end.is_empty() {
        usize::MAX
    } else {
        end.trim().parse()?
    };
    if start > end {
        return Err(format!("Invalid row range: {s}").into());
    }
    Ok((start, end))
}

/// Validate that a path exists and is a file. Returns absolute path.
fn validate_exists(path: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }
    if !path.is_file() {
        return Err(format!("Path is not a file: {}", path.display()).into());
    }
    Ok(std::fs::canonicalize(path)?)
}
