//! Result types returned by a batch run.

use serde::Serialize;
use std::path::PathBuf;

/// One tiled PDF written for one source PDF.
#[derive(Debug, Clone, Serialize)]
pub struct TiledDocument {
    /// The source PDF this was built from.
    pub source: PathBuf,
    /// Where the tiled PDF was written.
    pub path: PathBuf,
    /// Pages in the source document.
    pub source_pages: usize,
    /// Sheets (= pages) in the tiled document.
    pub sheets: usize,
    /// Size of the written file in bytes.
    pub bytes: u64,
}

/// One merged part written by the size-bounded merger.
#[derive(Debug, Clone, Serialize)]
pub struct MergedFile {
    /// Output path, e.g. `merged/merged_part000.pdf`.
    pub path: PathBuf,
    /// Tiled documents concatenated into this part, in order.
    pub members: Vec<PathBuf>,
    /// Summed size of the members, which is what the threshold is checked against.
    pub input_bytes: u64,
    /// Size of the written file in bytes.
    pub bytes: u64,
}

impl MergedFile {
    /// Output size in MiB, for the summary listing.
    pub fn size_mb(&self) -> f64 {
        self.bytes as f64 / 1024.0 / 1024.0
    }

    /// Output file name without directory.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Timing and counters for a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchStats {
    pub documents: usize,
    pub source_pages: usize,
    pub sheets: usize,
    pub merged_files: usize,
    pub tile_duration_ms: u64,
    pub merge_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Everything one batch run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Source PDFs found in the source directory.
    pub documents_found: usize,
    /// Tiled documents, in discovery order.
    pub tiled: Vec<TiledDocument>,
    /// Merged parts, in flush order.
    pub merged: Vec<MergedFile>,
    pub stats: BatchStats,
}

impl BatchReport {
    /// `true` when the source directory held no PDFs and nothing was written.
    pub fn is_empty(&self) -> bool {
        self.documents_found == 0
    }
}
