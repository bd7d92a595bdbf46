//! PDF rasterisation: render every page of a document to `DynamicImage`.
//!
//! All pages are rendered with one uniform scale of `dpi / 72`, since PDF
//! user space is 72 units per inch. Page order in the output matches page
//! order in the file.

use crate::error::PdfGridError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Rasterise all pages of `pdf_path`, scaled by `scale` (see
/// [`TileConfig::render_scale`](crate::config::TileConfig::render_scale)).
///
/// The document handle is dropped before this returns, on success or error.
pub fn render_pages(
    pdfium: &Pdfium,
    pdf_path: &Path,
    scale: f32,
    password: Option<&str>,
) -> Result<Vec<DynamicImage>, PdfGridError> {
    let document = open_document(pdfium, pdf_path, password)?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} ({} pages)", pdf_path.display(), total_pages);

    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);

    let mut images = Vec::with_capacity(total_pages);
    for (idx, page) in pages.iter().enumerate() {
        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            PdfGridError::RasterisationFailed {
                path: pdf_path.to_path_buf(),
                page: idx + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );
        images.push(image);
    }

    Ok(images)
}

/// Open a PDF, mapping pdfium's load error onto the password/corrupt variants.
pub fn open_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, PdfGridError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                PdfGridError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                PdfGridError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            PdfGridError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}
