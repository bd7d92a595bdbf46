//! Per-document pipeline: one source PDF in, one tiled PDF out.
//!
//! Pages are split in two levels. First into chunks of `pages_per_sheet`
//! source pages (the last chunk padded with blanks), then each chunk into
//! groups of exactly `cols × rows` cells (each group padded on its own). With
//! the default `pages_per_sheet = cols × rows` every chunk is exactly one
//! group, so a document of `N` pages yields `ceil(N / (cols × rows))` sheets.

use crate::config::TileConfig;
use crate::error::PdfGridError;
use crate::output::TiledDocument;
use crate::pipeline::compose::{compose_sheet, Cell};
use crate::pipeline::{encode, input, render};
use pdfium_render::prelude::Pdfium;
use std::path::Path;
use tracing::{debug, info};

/// Layout of one sheet: `Some(page_index)` or `None` for a blank cell.
pub type SheetPlan = Vec<Option<usize>>;

/// Plan the sheets for a document of `page_count` pages.
///
/// Every returned plan has exactly `cells_per_sheet` entries, and page
/// indices appear once each, in order.
pub fn plan_sheets(
    page_count: usize,
    pages_per_sheet: usize,
    cells_per_sheet: usize,
) -> Vec<SheetPlan> {
    let mut plans = Vec::new();
    if pages_per_sheet == 0 || cells_per_sheet == 0 {
        return plans;
    }

    for chunk_start in (0..page_count).step_by(pages_per_sheet) {
        let chunk_end = (chunk_start + pages_per_sheet).min(page_count);
        let mut chunk: Vec<Option<usize>> = (chunk_start..chunk_end).map(Some).collect();
        chunk.resize(pages_per_sheet, None);

        for group in chunk.chunks(cells_per_sheet) {
            let mut plan = group.to_vec();
            plan.resize(cells_per_sheet, None);
            plans.push(plan);
        }
    }

    plans
}

/// Run rasterise → compose → encode for `source`, writing into `out_dir`.
///
/// The output is `{out_dir}/{stem}_{cols}x{rows}.pdf`; `out_dir` is created
/// if missing.
pub fn tile_document(
    pdfium: &Pdfium,
    source: &Path,
    out_dir: &Path,
    config: &TileConfig,
) -> Result<TiledDocument, PdfGridError> {
    input::validate_pdf(source)?;

    let pages = render::render_pages(
        pdfium,
        source,
        config.render_scale(),
        config.password.as_deref(),
    )?;
    if pages.is_empty() {
        return Err(PdfGridError::EmptyDocument {
            path: source.to_path_buf(),
        });
    }

    let plans = plan_sheets(
        pages.len(),
        config.pages_per_sheet(),
        config.cells_per_sheet(),
    );
    debug!(
        "{}: {} pages → {} sheets",
        source.display(),
        pages.len(),
        plans.len()
    );

    let sheets = plans
        .iter()
        .map(|plan| {
            let cells: Vec<Cell<'_>> = plan
                .iter()
                .map(|slot| match slot {
                    Some(idx) => Cell::Page(&pages[*idx]),
                    None => Cell::Blank,
                })
                .collect();
            compose_sheet(&cells, config)
        })
        .collect::<Result<Vec<_>, _>>()?;
    let source_pages = pages.len();
    drop(pages);

    std::fs::create_dir_all(out_dir).map_err(|e| PdfGridError::OutputWriteFailed {
        path: out_dir.to_path_buf(),
        source: e,
    })?;

    let out_path = out_dir.join(config.tiled_file_name(source));
    let sheet_count = sheets.len();
    encode::encode_sheets(pdfium, sheets, &out_path, config.output_resolution)?;

    let bytes = std::fs::metadata(&out_path)
        .map(|m| m.len())
        .map_err(|e| PdfGridError::OutputWriteFailed {
            path: out_path.clone(),
            source: e,
        })?;

    info!(
        "Tiled {} → {} ({} pages on {} sheets, {} bytes)",
        source.display(),
        out_path.display(),
        source_pages,
        sheet_count,
        bytes
    );

    Ok(TiledDocument {
        source: source.to_path_buf(),
        path: out_path,
        source_pages,
        sheets: sheet_count,
        bytes,
    })
}
