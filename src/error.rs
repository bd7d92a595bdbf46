//! Error types for the pdfgrid library.
//!
//! A single fatal error type, [`PdfGridError`], covers every failure. A batch
//! run is one-shot over trusted local files: the first error aborts it and
//! outputs already written stay on disk. There is no page- or document-level
//! recovery, so no separate non-fatal error type exists.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// All errors returned by the pdfgrid library.
#[derive(Debug, Error)]
pub enum PdfGridError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The source directory is missing or cannot be listed.
    #[error("Cannot read source directory '{path}': {source}")]
    SourceDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Any other I/O failure while inspecting an input file.
    #[error("Cannot read '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page} of '{path}': {detail}")]
    RasterisationFailed {
        path: PathBuf,
        page: usize,
        detail: String,
    },

    // ── Precondition errors ───────────────────────────────────────────────
    /// The compositor was handed a cell list that does not fill the grid.
    ///
    /// Callers pad short batches with blank cells before compositing; this
    /// error means that contract was broken.
    #[error("Sheet needs exactly {expected} cells, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },

    /// There is nothing to encode: the source had no pages.
    #[error("PDF '{path}' has no pages to tile")]
    EmptyDocument { path: PathBuf },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write an output file or directory.
    #[error("Failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// pdfium failed while building or saving a tiled document.
    #[error("Failed to encode sheets into '{path}': {detail}")]
    EncodeFailed { path: PathBuf, detail: String },

    /// pdfium failed while concatenating documents.
    #[error("Failed to merge into '{path}': {detail}")]
    MergeFailed { path: PathBuf, detail: String },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Place libpdfium (pdfium.dll on Windows) next to the binary.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium, or pass --pdfium-lib.\n\
  • Install a build from https://github.com/bblanchon/pdfium-binaries/releases\n"
    )]
    PdfiumBindingFailed(String),
}

impl PdfGridError {
    /// Classify an I/O error raised while reading `path`.
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            ErrorKind::NotFound => PdfGridError::FileNotFound { path },
            ErrorKind::PermissionDenied => PdfGridError::PermissionDenied { path },
            _ => PdfGridError::Unreadable { path, source },
        }
    }
}
