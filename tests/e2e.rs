//! End-to-end integration tests for pdfgrid.
//!
//! These tests need a real pdfium library. They are gated behind the
//! `E2E_ENABLED` environment variable so they do not run in CI unless
//! explicitly requested. Fixture PDFs are generated on the fly through
//! pdfium, so no sample files are required.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=/path/to/libpdfium.so cargo test --test e2e -- --nocapture

use pdfgrid::pipeline::merge::concatenate;
use pdfgrid::{
    bind_pdfium, run_batch, tile_document, BatchProgressCallback, MergedFile, NoopProgressCallback,
    PdfGridError, TileConfig, TiledDocument,
};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless E2E_ENABLED is set and pdfium can be bound.
macro_rules! e2e_pdfium_or_skip {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        match bind_pdfium(None) {
            Ok(p) => p,
            Err(e) => {
                println!("SKIP — pdfium unavailable: {e}");
                return;
            }
        }
    }};
}

/// Write a PDF with `pages` empty pages of `width_pt` points wide (A-series ratio).
fn write_fixture(pdfium: &Pdfium, path: &Path, pages: usize, width_pt: f32) {
    let mut doc = pdfium.create_new_pdf().expect("new document");
    for _ in 0..pages {
        doc.pages_mut()
            .create_page_at_end(PdfPagePaperSize::from_points(
                PdfPoints::new(width_pt),
                PdfPoints::new(width_pt * 1.414),
            ))
            .expect("new page");
    }
    doc.save_to_file(path).expect("save fixture");
}

fn page_count(pdfium: &Pdfium, path: &Path) -> usize {
    pdfium
        .load_pdf_from_file(path, None)
        .expect("load output")
        .pages()
        .len() as usize
}

fn page_widths(pdfium: &Pdfium, path: &Path) -> Vec<f32> {
    let doc = pdfium.load_pdf_from_file(path, None).expect("load output");
    doc.pages().iter().map(|p| p.width().value).collect()
}

/// A small, fast config rooted in `root`.
fn small_config(root: &Path) -> pdfgrid::TileConfigBuilder {
    TileConfig::builder()
        .source_dir(root.join("pdf"))
        .tiled_dir(root.join("tiled"))
        .merge_dir(root.join("merged"))
        .dpi(72)
        .sheet_size(400, 560)
}

// ── Per-document pipeline ────────────────────────────────────────────────────

#[test]
fn test_seventeen_pages_fit_one_default_sheet() {
    let pdfium = e2e_pdfium_or_skip!();
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("report.pdf");
    write_fixture(&pdfium, &source, 17, 200.0);

    let config = TileConfig::builder().dpi(72).build().unwrap();
    let out_dir = tmp.path().join("20in1_out");
    let tiled = tile_document(&pdfium, &source, &out_dir, &config).expect("tile");

    assert_eq!(tiled.source_pages, 17);
    assert_eq!(tiled.sheets, 1);
    assert_eq!(tiled.path, out_dir.join("report_4x5.pdf"));
    assert!(tiled.bytes > 0);
    // A JPEG sheet of 2480x3508 is far below its 26 MB raw bitmap.
    assert!(tiled.bytes < 5 * 1024 * 1024, "{} bytes", tiled.bytes);
    assert_eq!(page_count(&pdfium, &tiled.path), 1);

    // one point per pixel at the default output resolution
    let doc = pdfium.load_pdf_from_file(&tiled.path, None).unwrap();
    let page = doc.pages().get(0).unwrap();
    assert!((page.width().value - 2480.0).abs() < 1.0);
    assert!((page.height().value - 3508.0).abs() < 1.0);
}

#[test]
fn test_sheet_count_is_ceiling() {
    let pdfium = e2e_pdfium_or_skip!();
    let tmp = TempDir::new().unwrap();
    let config = small_config(tmp.path()).grid(2, 2).build().unwrap();

    for (pages, expected) in [(1usize, 1usize), (4, 1), (5, 2), (45, 12)] {
        let source = tmp.path().join(format!("doc{pages}.pdf"));
        write_fixture(&pdfium, &source, pages, 100.0);
        let tiled = tile_document(&pdfium, &source, &tmp.path().join("tiled"), &config).unwrap();
        assert_eq!(tiled.sheets, expected, "{pages} pages");
        assert_eq!(page_count(&pdfium, &tiled.path), expected, "{pages} pages");
    }
}

#[test]
fn test_non_pdf_aborts_with_not_a_pdf() {
    let pdfium = e2e_pdfium_or_skip!();
    let tmp = TempDir::new().unwrap();
    let fake = tmp.path().join("fake.pdf");
    std::fs::write(&fake, b"GIF89a not a pdf").unwrap();

    let config = small_config(tmp.path()).build().unwrap();
    let err = tile_document(&pdfium, &fake, &tmp.path().join("tiled"), &config).unwrap_err();
    assert!(matches!(err, PdfGridError::NotAPdf { .. }), "got {err:?}");
}

// ── Merger ───────────────────────────────────────────────────────────────────

#[test]
fn test_concatenate_preserves_document_and_page_order() {
    let pdfium = e2e_pdfium_or_skip!();
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a.pdf");
    let b = tmp.path().join("b.pdf");
    write_fixture(&pdfium, &a, 2, 100.0);
    write_fixture(&pdfium, &b, 3, 300.0);

    let out = tmp.path().join("merged_part000.pdf");
    concatenate(&pdfium, &[a, b], &out).expect("concatenate");

    let widths: Vec<u32> = page_widths(&pdfium, &out)
        .into_iter()
        .map(|w| w.round() as u32)
        .collect();
    assert_eq!(widths, vec![100, 100, 300, 300, 300]);
    assert!(!tmp.path().join("merged_part000.pdf.tmp").exists());
}

// ── Whole batch ──────────────────────────────────────────────────────────────

#[test]
fn test_empty_source_dir_writes_nothing() {
    let pdfium = e2e_pdfium_or_skip!();
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join("pdf")).unwrap();
    std::fs::write(tmp.path().join("pdf/readme.txt"), b"no pdfs here").unwrap();

    let config = small_config(tmp.path()).build().unwrap();
    let report = run_batch(&pdfium, &config).expect("empty run succeeds");

    assert!(report.is_empty());
    assert!(report.tiled.is_empty());
    assert!(report.merged.is_empty());
    assert!(!tmp.path().join("tiled").exists());
    assert!(!tmp.path().join("merged").exists());
}

#[derive(Default)]
struct RecordingCallback {
    events: Mutex<Vec<String>>,
    merged: AtomicUsize,
}

impl BatchProgressCallback for RecordingCallback {
    fn on_batch_start(&self, total_documents: usize) {
        self.events.lock().unwrap().push(format!("start {total_documents}"));
    }

    fn on_document_start(&self, index: usize, total: usize, source: &Path) {
        let name = source.file_name().unwrap().to_string_lossy().into_owned();
        self.events
            .lock()
            .unwrap()
            .push(format!("doc {}/{} {}", index + 1, total, name));
    }

    fn on_document_complete(&self, _index: usize, _total: usize, tiled: &TiledDocument) {
        self.events
            .lock()
            .unwrap()
            .push(format!("tiled {}", tiled.sheets));
    }

    fn on_merge_file_written(&self, _merged: &MergedFile) {
        self.merged.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_full_batch_tiles_then_merges_in_discovery_order() {
    let pdfium = e2e_pdfium_or_skip!();
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("pdf");
    std::fs::create_dir(&src).unwrap();
    write_fixture(&pdfium, &src.join("c.pdf"), 9, 100.0);
    write_fixture(&pdfium, &src.join("A.PDF"), 3, 100.0);
    write_fixture(&pdfium, &src.join("b.pdf"), 5, 100.0);

    let recorder = Arc::new(RecordingCallback::default());
    let config = small_config(tmp.path())
        .grid(2, 2)
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    let report = run_batch(&pdfium, &config).expect("batch");

    assert_eq!(report.documents_found, 3);
    let names: Vec<String> = report
        .tiled
        .iter()
        .map(|t| t.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["A_2x2.pdf", "b_2x2.pdf", "c_2x2.pdf"]);
    assert_eq!(
        report.tiled.iter().map(|t| t.sheets).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    // Every tiled document lands in exactly one part, in order.
    let members: Vec<PathBuf> = report
        .merged
        .iter()
        .flat_map(|m| m.members.clone())
        .collect();
    let tiled_paths: Vec<PathBuf> = report.tiled.iter().map(|t| t.path.clone()).collect();
    assert_eq!(members, tiled_paths);

    let merged_pages: usize = report
        .merged
        .iter()
        .map(|m| page_count(&pdfium, &m.path))
        .sum();
    assert_eq!(merged_pages, 6);

    for (i, m) in report.merged.iter().enumerate() {
        assert_eq!(m.file_name(), format!("merged_part{:03}.pdf", i));
        assert!(m.path.starts_with(tmp.path().join("merged")));
    }

    let events = recorder.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "start 3",
            "doc 1/3 A.PDF",
            "tiled 1",
            "doc 2/3 b.pdf",
            "tiled 2",
            "doc 3/3 c.pdf",
            "tiled 3",
        ]
    );
    assert_eq!(recorder.merged.load(Ordering::SeqCst), report.merged.len());
}

#[test]
fn test_batch_aborts_on_first_bad_document() {
    let pdfium = e2e_pdfium_or_skip!();
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("pdf");
    std::fs::create_dir(&src).unwrap();
    write_fixture(&pdfium, &src.join("a.pdf"), 2, 100.0);
    std::fs::write(src.join("b.pdf"), b"garbage").unwrap();
    write_fixture(&pdfium, &src.join("c.pdf"), 2, 100.0);

    let config = small_config(tmp.path()).build().unwrap();
    let err = run_batch(&pdfium, &config).unwrap_err();
    assert!(matches!(err, PdfGridError::NotAPdf { .. }), "got {err:?}");

    // a.pdf finished before the failure and stays on disk; nothing merged.
    assert!(tmp.path().join("tiled/a_4x5.pdf").exists());
    assert!(!tmp.path().join("tiled/c_4x5.pdf").exists());
    assert!(!tmp.path().join("merged").exists());
}

// ── Trait bounds (no pdfium) ─────────────────────────────────────────────────

#[test]
fn test_noop_callback_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<NoopProgressCallback>();
    assert_send_sync::<RecordingCallback>();
}

#[test]
fn test_config_is_cloneable_with_callback() {
    let config = TileConfig::builder()
        .progress_callback(Arc::new(NoopProgressCallback))
        .build()
        .unwrap();
    let cloned = config.clone();
    assert!(cloned.progress_callback.is_some());
    assert_eq!(cloned.pages_per_sheet(), 20);
}
