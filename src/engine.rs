//! Binding to the pdfium shared library.
//!
//! `pdfium-render` loads pdfium dynamically at run time. We try, in order:
//!
//! 1. an explicit path (the library file itself, or a directory holding it);
//! 2. `PDFIUM_LIB_PATH`;
//! 3. the current directory;
//! 4. the system library search path.
//!
//! One [`Pdfium`] is bound per run and borrowed by every stage.

use crate::error::PdfGridError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an existing pdfium library file or directory.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind pdfium, preferring `lib_path` when given.
pub fn bind_pdfium(lib_path: Option<&Path>) -> Result<Pdfium, PdfGridError> {
    let mut attempts: Vec<String> = Vec::new();

    for candidate in candidate_paths(lib_path) {
        match Pdfium::bind_to_library(&candidate) {
            Ok(bindings) => {
                debug!("Bound pdfium from {}", candidate.display());
                return Ok(Pdfium::new(bindings));
            }
            Err(e) => attempts.push(format!("{}: {}", candidate.display(), e)),
        }
    }

    match Pdfium::bind_to_system_library() {
        Ok(bindings) => {
            debug!("Bound pdfium from the system library path");
            Ok(Pdfium::new(bindings))
        }
        Err(e) => {
            attempts.push(format!("system library: {}", e));
            Err(PdfGridError::PdfiumBindingFailed(attempts.join("; ")))
        }
    }
}

/// Library files to try before the system search path, most specific first.
fn candidate_paths(lib_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(p) = lib_path {
        candidates.push(resolve_library_file(p));
    }
    if let Ok(env_path) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        if !env_path.is_empty() {
            candidates.push(resolve_library_file(Path::new(&env_path)));
        }
    }
    candidates.push(PathBuf::from(Pdfium::pdfium_platform_library_name_at_path(
        "./",
    )));

    candidates.dedup();
    candidates
}

/// A directory resolves to the platform library name inside it.
fn resolve_library_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        PathBuf::from(Pdfium::pdfium_platform_library_name_at_path(path))
    } else {
        path.to_path_buf()
    }
}
