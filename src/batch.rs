//! Batch entry points: discover → tile each document → merge.
//!
//! The run is strictly sequential. Each document is fully tiled and written
//! before the next one is opened, and merging starts only once every document
//! is tiled. The first error aborts the run; files already written stay on
//! disk.

use crate::config::TileConfig;
use crate::document::tile_document;
use crate::engine::bind_pdfium;
use crate::error::PdfGridError;
use crate::output::{BatchReport, BatchStats};
use crate::pipeline::{input, merge};
use pdfium_render::prelude::Pdfium;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Run the whole batch with an already-bound pdfium.
///
/// # Returns
/// The report of everything written. When the source directory holds no PDFs
/// the report is empty ([`BatchReport::is_empty`]) and no directories are
/// created.
pub fn run_batch(pdfium: &Pdfium, config: &TileConfig) -> Result<BatchReport, PdfGridError> {
    let total_start = Instant::now();
    let sources = start_batch(config)?;
    if sources.is_empty() {
        return Ok(finish_empty(config));
    }
    tile_and_merge(pdfium, config, sources, total_start)
}

/// Discover sources, then bind pdfium from `config.pdfium_lib_path` (or the
/// usual fallbacks) and run.
///
/// pdfium is only bound once there is something to tile, so an empty source
/// directory succeeds even on a machine without the library.
pub fn run_batch_with_default_engine(config: &TileConfig) -> Result<BatchReport, PdfGridError> {
    let total_start = Instant::now();
    let sources = start_batch(config)?;
    if sources.is_empty() {
        return Ok(finish_empty(config));
    }
    let pdfium = bind_pdfium(config.pdfium_lib_path.as_deref())?;
    tile_and_merge(&pdfium, config, sources, total_start)
}

fn start_batch(config: &TileConfig) -> Result<Vec<PathBuf>, PdfGridError> {
    let sources = input::discover_pdfs(&config.source_dir)?;
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(sources.len());
    }
    Ok(sources)
}

fn finish_empty(config: &TileConfig) -> BatchReport {
    info!("No PDFs found in {}", config.source_dir.display());
    let report = BatchReport::default();
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(&report);
    }
    report
}

fn tile_and_merge(
    pdfium: &Pdfium,
    config: &TileConfig,
    sources: Vec<PathBuf>,
    total_start: Instant,
) -> Result<BatchReport, PdfGridError> {
    let total = sources.len();
    info!(
        "Tiling {} PDFs onto {}x{} sheets",
        total, config.cols, config.rows
    );

    // ── Tile ─────────────────────────────────────────────────────────────
    let tile_start = Instant::now();
    let tiled_dir = config.tiled_dir();
    let mut tiled = Vec::with_capacity(total);
    for (index, source) in sources.iter().enumerate() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_document_start(index, total, source);
        }
        let doc = tile_document(pdfium, source, &tiled_dir, config)?;
        if let Some(ref cb) = config.progress_callback {
            cb.on_document_complete(index, total, &doc);
        }
        tiled.push(doc);
    }
    let tile_duration_ms = tile_start.elapsed().as_millis() as u64;

    // ── Merge ────────────────────────────────────────────────────────────
    let merge_start = Instant::now();
    let threshold = config.target_bytes();
    if let Some(ref cb) = config.progress_callback {
        cb.on_merge_start(tiled.len(), threshold);
    }
    let tiled_paths: Vec<PathBuf> = tiled.iter().map(|t| t.path.clone()).collect();
    let merged = merge::merge_by_size(pdfium, &tiled_paths, &config.merge_dir, threshold, |m| {
        if let Some(ref cb) = config.progress_callback {
            cb.on_merge_file_written(m);
        }
    })?;
    let merge_duration_ms = merge_start.elapsed().as_millis() as u64;

    let stats = BatchStats {
        documents: tiled.len(),
        source_pages: tiled.iter().map(|t| t.source_pages).sum(),
        sheets: tiled.iter().map(|t| t.sheets).sum(),
        merged_files: merged.len(),
        tile_duration_ms,
        merge_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Batch complete: {} documents, {} sheets, {} parts, {}ms",
        stats.documents, stats.sheets, stats.merged_files, stats.total_duration_ms
    );

    let report = BatchReport {
        documents_found: total,
        tiled,
        merged,
        stats,
    };
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(&report);
    }
    Ok(report)
}
