//! Input discovery: list the source PDFs and sanity-check each one.
//!
//! Discovery is a flat scan of one directory. Sub-directories are ignored and
//! the extension match is case-insensitive, so `Scan.PDF` is picked up while
//! `notes.txt` and `archive/old.pdf` are not. Results are sorted so the run
//! order (and therefore merge grouping) is stable across platforms.

use crate::error::PdfGridError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// List every `*.pdf` file directly under `dir`, sorted by path.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>, PdfGridError> {
    let unreadable = |source| PdfGridError::SourceDirUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();
        if path.is_file() && has_pdf_extension(&path) {
            found.push(path);
        }
    }
    found.sort();

    debug!("Discovered {} PDFs in {}", found.len(), dir.display());
    Ok(found)
}

/// Check if the path ends in `.pdf`, ignoring case.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Validate that `path` exists, is readable, and starts with `%PDF`.
pub fn validate_pdf(path: &Path) -> Result<(), PdfGridError> {
    if !path.exists() {
        return Err(PdfGridError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(PdfGridError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) => return Err(PdfGridError::from_io(path, e)),
    }

    Ok(())
}
