//! # pdfgrid
//!
//! Tile PDF pages onto grid sheets ("n-up") and merge the results into
//! size-bounded PDF parts, for printing or archiving large collections with
//! fewer pages and fewer files.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ./pdf/*.pdf
//!  │
//!  ├─ 1. Input    list *.pdf (flat, case-insensitive), check %PDF magic
//!  ├─ 2. Render   rasterise every page via pdfium at dpi/72 scale
//!  ├─ 3. Compose  paste cols×rows pages per white sheet, blanks as padding
//!  ├─ 4. Encode   one image-only PDF per source → ./20in1_out/{stem}_4x5.pdf
//!  └─ 5. Merge    greedy size-bounded concat → ./merged/merged_part000.pdf …
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfgrid::{run_batch_with_default_engine, TileConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TileConfig::builder()
//!         .source_dir("./scans")
//!         .grid(3, 4)
//!         .target_mb(50)
//!         .build()?;
//!     let report = run_batch_with_default_engine(&config)?;
//!     for part in &report.merged {
//!         println!("{}  {:.1} MB", part.file_name(), part.size_mb());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfgrid` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! pdfium itself is loaded at run time; see [`engine::bind_pdfium`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{run_batch, run_batch_with_default_engine};
pub use config::{TileConfig, TileConfigBuilder};
pub use document::{plan_sheets, tile_document};
pub use engine::bind_pdfium;
pub use error::PdfGridError;
pub use output::{BatchReport, BatchStats, MergedFile, TiledDocument};
pub use pipeline::merge::{plan_merge_groups, MergeGroup, SizedDocument};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
