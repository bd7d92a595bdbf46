//! Sheet encoding: `RgbImage` sheets → one image-only PDF.
//!
//! Each sheet becomes one page whose size follows the sheet's pixel size at
//! `output_resolution` pixels per inch (72 ⇒ one point per pixel). The page
//! carries a single full-bleed JPEG image object; no text layer, no metadata.
//! Sheets are JPEG-compressed at [`JPEG_QUALITY`] so tiled files stay small
//! enough for the size-bounded merge.

use crate::error::PdfGridError;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use pdfium_render::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// JPEG quality used for every sheet.
pub const JPEG_QUALITY: u8 = 95;

/// Write `sheets` to `output_path`, one page per sheet, in order.
pub fn encode_sheets(
    pdfium: &Pdfium,
    sheets: Vec<RgbImage>,
    output_path: &Path,
    output_resolution: f32,
) -> Result<(), PdfGridError> {
    if sheets.is_empty() {
        return Err(PdfGridError::EmptyDocument {
            path: output_path.to_path_buf(),
        });
    }

    let failed = |e: PdfiumError| PdfGridError::EncodeFailed {
        path: output_path.to_path_buf(),
        detail: format!("{:?}", e),
    };

    let sheet_count = sheets.len();
    let mut document = pdfium.create_new_pdf().map_err(failed)?;

    for (idx, sheet) in sheets.into_iter().enumerate() {
        let (width, height) = page_size_points(sheet.width(), sheet.height(), output_resolution);
        let jpeg = encode_jpeg(&sheet, output_path)?;
        let jpeg_bytes = jpeg.len();
        drop(sheet);

        // An image object spans the unit square until scaled to the page.
        let mut object = PdfPageImageObject::new_from_jpeg_reader(&document, Cursor::new(jpeg))
            .map_err(failed)?;
        object.scale(width.value, height.value).map_err(failed)?;

        let mut page = document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::from_points(width, height))
            .map_err(failed)?;
        page.objects_mut()
            .add_image_object(object)
            .map_err(failed)?;

        debug!(
            "Encoded sheet {} → {:.1}x{:.1} pt page ({} byte JPEG)",
            idx + 1,
            width.value,
            height.value,
            jpeg_bytes
        );
    }

    document.save_to_file(output_path).map_err(failed)?;
    info!(
        "Wrote {} ({} sheets)",
        output_path.display(),
        sheet_count
    );
    Ok(())
}

/// Compress one sheet to JPEG at [`JPEG_QUALITY`].
pub fn encode_jpeg(sheet: &RgbImage, output_path: &Path) -> Result<Vec<u8>, PdfGridError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
        .encode_image(sheet)
        .map_err(|e| PdfGridError::EncodeFailed {
            path: output_path.to_path_buf(),
            detail: format!("JPEG: {}", e),
        })?;
    Ok(buf)
}

/// PDF page size for a `width × height` px sheet at `resolution` px/inch.
pub fn page_size_points(width: u32, height: u32, resolution: f32) -> (PdfPoints, PdfPoints) {
    let scale = 72.0 / resolution;
    (
        PdfPoints::new(width as f32 * scale),
        PdfPoints::new(height as f32 * scale),
    )
}
