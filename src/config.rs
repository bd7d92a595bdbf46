//! Configuration types for a tiling + merge batch run.
//!
//! All batch behaviour is controlled through [`TileConfig`], built via its
//! [`TileConfigBuilder`]. Every stage receives the config by reference; no
//! parameter lives in module-level state, so tests can run several
//! differently-shaped grids side by side.

use crate::error::PdfGridError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::{Path, PathBuf};

/// Width of a portrait A4 sheet rendered at 300 DPI, in pixels.
pub const A4_WIDTH_PX: u32 = 2480;
/// Height of a portrait A4 sheet rendered at 300 DPI, in pixels.
pub const A4_HEIGHT_PX: u32 = 3508;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Configuration for one batch run.
///
/// Built via [`TileConfig::builder()`] or using [`TileConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfgrid::TileConfig;
///
/// let config = TileConfig::builder()
///     .grid(3, 4)
///     .dpi(200)
///     .target_mb(50)
///     .build()
///     .unwrap();
/// assert_eq!(config.pages_per_sheet(), 12);
/// ```
#[derive(Clone)]
pub struct TileConfig {
    /// Grid columns per sheet. Default: 4.
    pub cols: u32,

    /// Grid rows per sheet. Default: 5.
    pub rows: u32,

    /// Source pages consumed per chunk. `None` means `cols × rows`.
    ///
    /// Each chunk is padded to this size, then split into grid-sized groups
    /// that are padded on their own. With the default the inner split is a
    /// single group per chunk.
    pub pages_per_sheet: Option<usize>,

    /// Rasterisation DPI. Range: 72–600. Default: 300.
    ///
    /// Pages are scaled by `dpi / 72` before being shrunk into their cell, so
    /// this mostly trades run time against how crisp small cells look.
    pub dpi: u32,

    /// Sheet canvas width in pixels. Default: 2480 (A4 portrait @ 300 DPI).
    pub sheet_width: u32,

    /// Sheet canvas height in pixels. Default: 3508 (A4 portrait @ 300 DPI).
    pub sheet_height: u32,

    /// Pixels per inch used when sizing an encoded sheet page. Default: 72.0.
    ///
    /// At 72 one pixel maps to one PDF point.
    pub output_resolution: f32,

    /// Target size of each merged output file, in MiB. Default: 20.
    pub target_mb: u64,

    /// Directory scanned (non-recursively) for `*.pdf`. Default: `./pdf`.
    pub source_dir: PathBuf,

    /// Where tiled documents go. `None` means `./{pages_per_sheet}in1_out`.
    pub tiled_dir: Option<PathBuf>,

    /// Where merged parts go. Default: `./merged`.
    pub merge_dir: PathBuf,

    /// PDF user password applied when opening every source.
    pub password: Option<String>,

    /// Explicit pdfium library location (file or directory).
    pub pdfium_lib_path: Option<PathBuf>,

    /// Progress events receiver. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            cols: 4,
            rows: 5,
            pages_per_sheet: None,
            dpi: 300,
            sheet_width: A4_WIDTH_PX,
            sheet_height: A4_HEIGHT_PX,
            output_resolution: 72.0,
            target_mb: 20,
            source_dir: PathBuf::from("./pdf"),
            tiled_dir: None,
            merge_dir: PathBuf::from("./merged"),
            password: None,
            pdfium_lib_path: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for TileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileConfig")
            .field("cols", &self.cols)
            .field("rows", &self.rows)
            .field("pages_per_sheet", &self.pages_per_sheet())
            .field("dpi", &self.dpi)
            .field("sheet_width", &self.sheet_width)
            .field("sheet_height", &self.sheet_height)
            .field("output_resolution", &self.output_resolution)
            .field("target_mb", &self.target_mb)
            .field("source_dir", &self.source_dir)
            .field("tiled_dir", &self.tiled_dir())
            .field("merge_dir", &self.merge_dir)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl TileConfig {
    /// Create a new builder for `TileConfig`.
    pub fn builder() -> TileConfigBuilder {
        TileConfigBuilder {
            config: Self::default(),
        }
    }

    /// Number of cells on one sheet (`cols × rows`).
    pub fn cells_per_sheet(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Source pages per chunk; falls back to the grid size.
    pub fn pages_per_sheet(&self) -> usize {
        self.pages_per_sheet
            .unwrap_or_else(|| self.cells_per_sheet())
    }

    /// Cell size in pixels. Integer division: the remainder stays blank.
    pub fn cell_size(&self) -> (u32, u32) {
        (self.sheet_width / self.cols, self.sheet_height / self.rows)
    }

    /// Rasterisation scale relative to the 72-DPI PDF user space.
    pub fn render_scale(&self) -> f32 {
        self.dpi as f32 / 72.0
    }

    /// Merge threshold in bytes.
    pub fn target_bytes(&self) -> u64 {
        self.target_mb.saturating_mul(BYTES_PER_MB)
    }

    /// Resolved tiled-output directory.
    pub fn tiled_dir(&self) -> PathBuf {
        self.tiled_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("./{}in1_out", self.pages_per_sheet())))
    }

    /// File name for the tiled version of `source`: `{stem}_{cols}x{rows}.pdf`.
    pub fn tiled_file_name(&self, source: &Path) -> String {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        format!("{}_{}x{}.pdf", stem, self.cols, self.rows)
    }
}

/// Builder for [`TileConfig`].
#[derive(Debug)]
pub struct TileConfigBuilder {
    config: TileConfig,
}

impl TileConfigBuilder {
    pub fn grid(mut self, cols: u32, rows: u32) -> Self {
        self.config.cols = cols;
        self.config.rows = rows;
        self
    }

    pub fn pages_per_sheet(mut self, n: usize) -> Self {
        self.config.pages_per_sheet = Some(n);
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn sheet_size(mut self, width: u32, height: u32) -> Self {
        self.config.sheet_width = width;
        self.config.sheet_height = height;
        self
    }

    pub fn output_resolution(mut self, ppi: f32) -> Self {
        self.config.output_resolution = ppi;
        self
    }

    pub fn target_mb(mut self, mb: u64) -> Self {
        self.config.target_mb = mb;
        self
    }

    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.source_dir = dir.into();
        self
    }

    pub fn tiled_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.tiled_dir = Some(dir.into());
        self
    }

    pub fn merge_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.merge_dir = dir.into();
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<TileConfig, PdfGridError> {
        let c = &self.config;
        if c.cols == 0 || c.rows == 0 {
            return Err(PdfGridError::InvalidConfig(format!(
                "Grid must be at least 1x1, got {}x{}",
                c.cols, c.rows
            )));
        }
        if c.pages_per_sheet == Some(0) {
            return Err(PdfGridError::InvalidConfig(
                "Pages per sheet must be ≥ 1".into(),
            ));
        }
        if c.dpi < 72 || c.dpi > 600 {
            return Err(PdfGridError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.sheet_width < c.cols || c.sheet_height < c.rows {
            return Err(PdfGridError::InvalidConfig(format!(
                "Sheet {}x{} px is too small for a {}x{} grid",
                c.sheet_width, c.sheet_height, c.cols, c.rows
            )));
        }
        if !(c.output_resolution.is_finite() && c.output_resolution > 0.0) {
            return Err(PdfGridError::InvalidConfig(format!(
                "Output resolution must be > 0, got {}",
                c.output_resolution
            )));
        }
        if c.target_mb == 0 {
            return Err(PdfGridError::InvalidConfig(
                "Target merge size must be ≥ 1 MB".into(),
            ));
        }
        Ok(self.config)
    }
}
