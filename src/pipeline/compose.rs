//! Sheet composition: paste a grid of page images onto one fixed-size canvas.
//!
//! ```text
//!  sheet_width
//! ┌────┬────┬────┬────┐─ ─
//! │ 0  │ 1  │ 2  │ 3  │    cell_h = sheet_height / rows
//! ├────┼────┼────┼────┤
//! │ 4  │ 5  │ 6  │ 7  │    idx → (idx % cols, idx / cols)
//! ├────┼────┼────┼────┤
//! │ …  │    │    │    │
//! └────┴────┴────┴────┘
//!   cell_w = sheet_width / cols
//! ```
//!
//! The integer-division remainder on the right and bottom edges is left
//! white.

use crate::config::TileConfig;
use crate::error::PdfGridError;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use tracing::debug;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Content of one grid cell.
#[derive(Debug, Clone, Copy)]
pub enum Cell<'a> {
    /// A rasterised source page.
    Page(&'a DynamicImage),
    /// Padding for a short batch; the white background shows through.
    Blank,
}

/// Compose exactly `cols × rows` cells into one sheet.
///
/// Pages larger than their cell are shrunk with Lanczos3, keeping aspect
/// ratio; smaller pages keep their size. Each page is centred in its cell.
pub fn compose_sheet(cells: &[Cell<'_>], config: &TileConfig) -> Result<RgbImage, PdfGridError> {
    let expected = config.cells_per_sheet();
    if cells.len() != expected {
        return Err(PdfGridError::CellCountMismatch {
            expected,
            actual: cells.len(),
        });
    }

    let (cell_w, cell_h) = config.cell_size();
    let cols = config.cols as usize;
    let mut sheet = RgbImage::from_pixel(config.sheet_width, config.sheet_height, WHITE);

    for (idx, cell) in cells.iter().enumerate() {
        let Cell::Page(page) = cell else {
            continue;
        };

        let fitted = fit_into_cell(page, cell_w, cell_h);
        let col = (idx % cols) as u32;
        let row = (idx / cols) as u32;
        let (x, y) = cell_origin(col, row, cell_w, cell_h, fitted.width(), fitted.height());

        imageops::replace(&mut sheet, &fitted, x as i64, y as i64);
    }

    debug!(
        "Composed {}x{} sheet ({} cells of {}x{} px)",
        sheet.width(),
        sheet.height(),
        expected,
        cell_w,
        cell_h
    );
    Ok(sheet)
}

/// Shrink `page` to fit within `cell_w × cell_h`; never enlarges.
fn fit_into_cell(page: &DynamicImage, cell_w: u32, cell_h: u32) -> RgbImage {
    let (w, h) = page.dimensions();
    if w > cell_w || h > cell_h {
        page.resize(cell_w, cell_h, FilterType::Lanczos3).to_rgb8()
    } else {
        page.to_rgb8()
    }
}

/// Top-left corner for an image of `w × h` centred in cell (`col`, `row`).
pub fn cell_origin(col: u32, row: u32, cell_w: u32, cell_h: u32, w: u32, h: u32) -> (u32, u32) {
    let offset_x = cell_w.saturating_sub(w) / 2;
    let offset_y = cell_h.saturating_sub(h) / 2;
    (col * cell_w + offset_x, row * cell_h + offset_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(rgb)))
    }

    fn grid(cols: u32, rows: u32, w: u32, h: u32) -> TileConfig {
        TileConfig::builder()
            .grid(cols, rows)
            .sheet_size(w, h)
            .build()
            .unwrap()
    }

    fn is_reddish(p: &Rgb<u8>) -> bool {
        p.0[0] > 200 && p.0[1] < 60 && p.0[2] < 60
    }

    #[test]
    fn wrong_cell_count_is_rejected() {
        let config = grid(2, 2, 100, 100);
        let img = solid(10, 10, [0, 0, 0]);
        let cells = vec![Cell::Page(&img); 3];
        match compose_sheet(&cells, &config) {
            Err(PdfGridError::CellCountMismatch { expected, actual }) => {
                assert_eq!((expected, actual), (4, 3));
            }
            other => panic!("expected CellCountMismatch, got {other:?}"),
        }

        let too_many = vec![Cell::Blank; 5];
        assert!(compose_sheet(&too_many, &config).is_err());
    }

    #[test]
    fn sheet_size_is_fixed_regardless_of_inputs() {
        let config = grid(2, 2, 100, 140);
        let huge = solid(1000, 300, [0, 0, 0]);
        let tiny = solid(3, 7, [0, 0, 0]);
        let cells = [Cell::Page(&huge), Cell::Page(&tiny), Cell::Blank, Cell::Page(&huge)];

        let sheet = compose_sheet(&cells, &config).unwrap();
        assert_eq!(sheet.dimensions(), (100, 140));
    }

    #[test]
    fn all_blank_sheet_is_white() {
        let config = grid(4, 5, 80, 100);
        let sheet = compose_sheet(&[Cell::Blank; 20], &config).unwrap();
        assert!(sheet.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn small_page_is_centred_in_its_cell() {
        let config = grid(2, 2, 100, 100);
        let red = solid(20, 10, [255, 0, 0]);
        let cells = [Cell::Blank, Cell::Blank, Cell::Blank, Cell::Page(&red)];

        let sheet = compose_sheet(&cells, &config).unwrap();
        // cell (1, 1) starts at (50, 50); offsets (15, 20)
        assert_eq!(*sheet.get_pixel(65, 70), Rgb([255, 0, 0]));
        assert_eq!(*sheet.get_pixel(84, 79), Rgb([255, 0, 0]));
        assert_eq!(*sheet.get_pixel(64, 70), WHITE);
        assert_eq!(*sheet.get_pixel(85, 70), WHITE);
        assert_eq!(*sheet.get_pixel(65, 69), WHITE);
        assert_eq!(*sheet.get_pixel(65, 80), WHITE);
        // other cells untouched
        assert_eq!(*sheet.get_pixel(15, 20), WHITE);
    }

    #[test]
    fn placement_is_row_major() {
        let config = grid(3, 2, 90, 60);
        let pages: Vec<DynamicImage> = (0..6).map(|i| solid(30, 30, [i * 40, 0, 0])).collect();
        let cells: Vec<Cell> = pages.iter().map(Cell::Page).collect();

        let sheet = compose_sheet(&cells, &config).unwrap();
        for idx in 0..6u32 {
            let (col, row) = (idx % 3, idx / 3);
            let px = sheet.get_pixel(col * 30 + 15, row * 30 + 15);
            assert_eq!(px.0[0], (idx * 40) as u8, "cell {idx} at ({col}, {row})");
        }
    }

    #[test]
    fn oversized_page_shrinks_keeping_aspect() {
        let config = grid(2, 2, 100, 100);
        let wide = solid(200, 100, [255, 0, 0]);
        let cells = [Cell::Page(&wide), Cell::Blank, Cell::Blank, Cell::Blank];

        let sheet = compose_sheet(&cells, &config).unwrap();
        // 200x100 → 50x25, centred vertically at y = 12
        assert!(is_reddish(sheet.get_pixel(25, 24)));
        assert!(is_reddish(sheet.get_pixel(0, 13)));
        assert_eq!(*sheet.get_pixel(25, 5), WHITE);
        assert_eq!(*sheet.get_pixel(25, 45), WHITE);
        // nothing spills into the neighbouring cell
        assert_eq!(*sheet.get_pixel(55, 24), WHITE);
    }

    #[test]
    fn rounding_remainder_stays_white() {
        let config = grid(3, 3, 100, 100);
        let black = solid(33, 33, [0, 0, 0]);
        let cells = vec![Cell::Page(&black); 9];

        let sheet = compose_sheet(&cells, &config).unwrap();
        assert_eq!(*sheet.get_pixel(98, 98), Rgb([0, 0, 0]));
        assert_eq!(*sheet.get_pixel(99, 50), WHITE);
        assert_eq!(*sheet.get_pixel(50, 99), WHITE);
    }

    #[test]
    fn cell_origin_centres_with_floor() {
        assert_eq!(cell_origin(0, 0, 620, 701, 620, 600), (0, 50));
        assert_eq!(cell_origin(1, 2, 620, 701, 301, 701), (620 + 159, 1402));
        // an image larger than the cell starts at the cell corner
        assert_eq!(cell_origin(1, 1, 10, 10, 20, 20), (10, 10));
    }
}
