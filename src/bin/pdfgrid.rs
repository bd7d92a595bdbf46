//! CLI binary for pdfgrid.
//!
//! A thin shim over the library crate that maps CLI flags to `TileConfig`
//! and prints progress and the merged-file summary. With no flags it runs the
//! fixed default layout: `./pdf` → `./20in1_out` → `./merged`.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfgrid::{
    run_batch_with_default_engine, BatchProgressCallback, BatchReport, MergedFile,
    ProgressCallback, TileConfig, TiledDocument,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: a document bar on stderr, plain progress lines on
/// stdout. Lines are printed through `ProgressBar::suspend` so the bar is
/// never torn by stdout output.
struct CliProgressCallback {
    bar: Option<ProgressBar>,
    pages_per_sheet: usize,
}

impl CliProgressCallback {
    fn new(show_bar: bool, pages_per_sheet: usize) -> Arc<Self> {
        let bar = show_bar.then(|| {
            let bar = ProgressBar::new(0);
            let style = ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} PDFs  \
                 ⏱ {elapsed_precise}  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(style);
            bar.set_prefix("Tiling");
            bar
        });
        Arc::new(Self {
            bar,
            pages_per_sheet,
        })
    }

    fn say(&self, line: String) {
        match &self.bar {
            Some(bar) => bar.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_documents: usize) {
        if total_documents == 0 {
            if let Some(bar) = &self.bar {
                bar.finish_and_clear();
            }
            return;
        }
        if let Some(bar) = &self.bar {
            bar.set_length(total_documents as u64);
            bar.enable_steady_tick(Duration::from_millis(80));
        }
        self.say(format!(
            "Found {} PDF{}, tiling…",
            total_documents,
            if total_documents == 1 { "" } else { "s" }
        ));
    }

    fn on_document_start(&self, _index: usize, _total: usize, source: &Path) {
        let name = file_name(source);
        if let Some(bar) = &self.bar {
            bar.set_message(name.clone());
        }
        self.say(format!("[{}→1] {}", self.pages_per_sheet, name));
    }

    fn on_document_complete(&self, _index: usize, _total: usize, tiled: &TiledDocument) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
        tracing::debug!(
            "{} pages → {} sheets",
            tiled.source_pages,
            tiled.sheets
        );
    }

    fn on_merge_start(&self, _tiled_count: usize, threshold_bytes: u64) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
        self.say(format!(
            "Tiling done, merging into ~{} MB parts…",
            threshold_bytes / 1024 / 1024
        ));
    }

    fn on_merge_file_written(&self, merged: &MergedFile) {
        tracing::debug!(
            "{} ← {} documents",
            merged.path.display(),
            merged.members.len()
        );
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Default run: ./pdf/*.pdf → ./20in1_out/*_4x5.pdf → ./merged/merged_partNNN.pdf
  pdfgrid

  # 3x4 grid at 200 DPI, 50 MB parts
  pdfgrid --cols 3 --rows 4 --dpi 200 --target-mb 50

  # Different folders
  pdfgrid --source-dir ~/scans --merge-dir ~/print

  # Machine-readable report
  pdfgrid --json > report.json

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to an existing libpdfium (file or directory)
  PDFGRID_*         Every flag has an env alias, e.g. PDFGRID_DPI=200
  RUST_LOG          Overrides the log filter (logs go to stderr)
"#;

/// Tile PDF pages onto grid sheets and merge the results into size-bounded PDFs.
#[derive(Parser, Debug)]
#[command(
    name = "pdfgrid",
    version,
    about = "Tile PDF pages onto grid sheets and merge the results into size-bounded PDFs",
    long_about = "Rasterises every page of every PDF in the source directory, pastes \
cols×rows pages onto each A4 sheet, writes one tiled PDF per source, then concatenates \
the tiled PDFs into numbered parts of roughly --target-mb each.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory scanned (non-recursively) for *.pdf.
    #[arg(long, env = "PDFGRID_SOURCE_DIR", default_value = "./pdf")]
    source_dir: PathBuf,

    /// Output directory for tiled PDFs [default: ./{pages-per-sheet}in1_out].
    #[arg(long, env = "PDFGRID_TILED_DIR")]
    tiled_dir: Option<PathBuf>,

    /// Output directory for merged parts.
    #[arg(long, env = "PDFGRID_MERGE_DIR", default_value = "./merged")]
    merge_dir: PathBuf,

    /// Grid columns per sheet.
    #[arg(long, env = "PDFGRID_COLS", default_value_t = 4,
          value_parser = clap::value_parser!(u32).range(1..))]
    cols: u32,

    /// Grid rows per sheet.
    #[arg(long, env = "PDFGRID_ROWS", default_value_t = 5,
          value_parser = clap::value_parser!(u32).range(1..))]
    rows: u32,

    /// Source pages per chunk [default: cols × rows].
    #[arg(long, env = "PDFGRID_PAGES_PER_SHEET")]
    pages_per_sheet: Option<usize>,

    /// Rasterisation DPI (72–600).
    #[arg(long, env = "PDFGRID_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Sheet width in pixels.
    #[arg(long, env = "PDFGRID_SHEET_WIDTH", default_value_t = pdfgrid::config::A4_WIDTH_PX)]
    sheet_width: u32,

    /// Sheet height in pixels.
    #[arg(long, env = "PDFGRID_SHEET_HEIGHT", default_value_t = pdfgrid::config::A4_HEIGHT_PX)]
    sheet_height: u32,

    /// Target size of each merged part, in MB.
    #[arg(long, env = "PDFGRID_TARGET_MB", default_value_t = 20)]
    target_mb: u64,

    /// PDF user password applied to every source.
    #[arg(long, env = "PDFGRID_PASSWORD")]
    password: Option<String>,

    /// Path to the pdfium library (file or directory).
    #[arg(long, env = "PDFGRID_PDFIUM_LIB")]
    pdfium_lib: Option<PathBuf>,

    /// Print the batch report as JSON instead of the text summary.
    #[arg(long, env = "PDFGRID_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDFGRID_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFGRID_VERBOSE")]
    verbose: bool,

    /// Suppress progress lines; only the summary and errors are printed.
    #[arg(short, long, env = "PDFGRID_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO logs would tear the progress bar, so they are only shown without it.
    let show_progress = !cli.quiet && !cli.json;
    let show_bar = show_progress && !cli.no_progress;
    let filter = log_filter(cli.verbose, cli.quiet, show_bar);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli, show_progress, show_bar)?;

    // ── Run ──────────────────────────────────────────────────────────────
    // pdfium is bound only after discovery finds something to tile.
    let report = run_batch_with_default_engine(&config).context("Batch failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
        return Ok(());
    }

    print_summary(&report, &config);
    Ok(())
}

/// Default tracing filter when `RUST_LOG` is unset.
fn log_filter(verbose: bool, quiet: bool, show_bar: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet || show_bar {
        "error"
    } else {
        "info"
    }
}

/// Map CLI args to `TileConfig`.
fn build_config(cli: &Cli, show_progress: bool, show_bar: bool) -> Result<TileConfig> {
    let mut builder = TileConfig::builder()
        .source_dir(&cli.source_dir)
        .merge_dir(&cli.merge_dir)
        .grid(cli.cols, cli.rows)
        .dpi(cli.dpi)
        .sheet_size(cli.sheet_width, cli.sheet_height)
        .target_mb(cli.target_mb);

    if let Some(ref dir) = cli.tiled_dir {
        builder = builder.tiled_dir(dir);
    }
    if let Some(n) = cli.pages_per_sheet {
        builder = builder.pages_per_sheet(n);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(lib);
    }

    if show_progress {
        let pages_per_sheet = cli
            .pages_per_sheet
            .unwrap_or(cli.cols as usize * cli.rows as usize);
        let cb = CliProgressCallback::new(show_bar, pages_per_sheet);
        builder = builder.progress_callback(cb as ProgressCallback);
    }

    builder.build().context("Invalid configuration")
}

/// Final stdout summary: one line per merged part with its size in MB.
fn print_summary(report: &BatchReport, config: &TileConfig) {
    if report.is_empty() {
        println!("No PDF files found in {}", config.source_dir.display());
        return;
    }

    println!(
        "{} Done! {} PDFs → {} sheets → {} merged files:",
        green("✔"),
        report.stats.documents,
        report.stats.sheets,
        bold(&report.merged.len().to_string())
    );
    for part in &report.merged {
        println!("  {}  {:.1} MB", part.file_name(), part.size_mb());
    }
    eprintln!(
        "{}",
        dim(&format!("   {}ms total", report.stats.total_duration_ms))
    );
}
