//! Pipeline stages for tiling and merging PDFs.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own and the PDF backend stays confined to the stages that
//! actually touch PDF bytes.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ compose ──▶ encode ──▶ merge
//! (scan)    (pdfium)   (image)     (pdfium)   (pdfium)
//! ```
//!
//! 1. [`input`]   — list `*.pdf` in the source directory, check magic bytes
//! 2. [`render`]  — rasterise every page at `dpi / 72` scale
//! 3. [`compose`] — paste `cols × rows` pages onto one white sheet
//! 4. [`encode`]  — write the sheets as an image-only PDF
//! 5. [`merge`]   — concatenate tiled PDFs into size-bounded parts

pub mod compose;
pub mod encode;
pub mod input;
pub mod merge;
pub mod render;
