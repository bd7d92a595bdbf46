//! Progress-callback trait for batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::TileConfigBuilder::progress_callback`] to receive events
//! as the batch tiles each document and writes each merged part.
//!
//! # Example
//!
//! ```rust
//! use pdfgrid::{BatchProgressCallback, TileConfig};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     started: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_document_start(&self, index: usize, total: usize, source: &Path) {
//!         self.started.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} {}", index + 1, total, source.display());
//!     }
//! }
//!
//! let config = TileConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { started: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::{BatchReport, MergedFile, TiledDocument};
use std::path::Path;
use std::sync::Arc;

/// Called by the batch driver as it works through the run.
///
/// Every method has a no-op default so callers only override what they care
/// about. The batch is sequential, so calls never overlap, but the trait is
/// `Send + Sync` so a config can be shared with other threads.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after discovery, before any document is tiled.
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called before a source document is rasterised.
    ///
    /// `index` is 0-based.
    fn on_document_start(&self, index: usize, total: usize, source: &Path) {
        let _ = (index, total, source);
    }

    /// Called after the tiled document has been written to disk.
    fn on_document_complete(&self, index: usize, total: usize, tiled: &TiledDocument) {
        let _ = (index, total, tiled);
    }

    /// Called once before the first merged part is written.
    fn on_merge_start(&self, tiled_count: usize, threshold_bytes: u64) {
        let _ = (tiled_count, threshold_bytes);
    }

    /// Called after each merged part has been written.
    fn on_merge_file_written(&self, merged: &MergedFile) {
        let _ = merged;
    }

    /// Called once at the very end of a successful run.
    fn on_batch_complete(&self, report: &BatchReport) {
        let _ = report;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::TileConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
