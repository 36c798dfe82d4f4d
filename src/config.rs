//! Configuration for a folder scan.
//!
//! All run behaviour is controlled through [`ScanConfig`], built via its
//! [`ScanConfigBuilder`]. The knobs are few on purpose: the rasterisation zoom,
//! where the two reports go, and how large the thumbnails are drawn.

use crate::error::QrScanError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Default spreadsheet file name, relative to the working directory.
pub const DEFAULT_SPREADSHEET: &str = "qr_code_data.xlsx";

/// Default PDF report file name, relative to the working directory.
pub const DEFAULT_DOCUMENT: &str = "qr_code_report.pdf";

/// Configuration for a scan-and-report run.
///
/// # Example
/// ```rust
/// use edgequake_pdfqr::ScanConfig;
///
/// let config = ScanConfig::builder()
///     .zoom(1.7)
///     .build()
///     .unwrap();
/// assert_eq!(config.spreadsheet_path.to_str(), Some("qr_code_data.xlsx"));
/// ```
#[derive(Clone)]
pub struct ScanConfig {
    /// Multiplier applied to each page's native size (PDF points) before
    /// rasterising. Default: 1.0, i.e. 72 px per inch.
    ///
    /// Small QR codes need more pixels per module to survive the sharpen and
    /// threshold steps; the CLI renders at 1.7.
    pub zoom: f32,

    /// Where the spreadsheet is written. Default: `qr_code_data.xlsx`.
    pub spreadsheet_path: PathBuf,

    /// Where the PDF report is written. Default: `qr_code_report.pdf`.
    pub document_path: PathBuf,

    /// Edge length of each thumbnail in the PDF report, in points. Default: 72 (1 inch).
    pub thumbnail_size_pt: f32,

    /// Optional progress callback for scan events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            spreadsheet_path: PathBuf::from(DEFAULT_SPREADSHEET),
            document_path: PathBuf::from(DEFAULT_DOCUMENT),
            thumbnail_size_pt: 72.0,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ScanConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanConfig")
            .field("zoom", &self.zoom)
            .field("spreadsheet_path", &self.spreadsheet_path)
            .field("document_path", &self.document_path)
            .field("thumbnail_size_pt", &self.thumbnail_size_pt)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ScanProgressCallback>"),
            )
            .finish()
    }
}

impl ScanConfig {
    /// Create a new builder for `ScanConfig`.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ScanConfig`].
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl fmt::Debug for ScanConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ScanConfigBuilder {
    pub fn zoom(mut self, zoom: f32) -> Self {
        self.config.zoom = zoom;
        self
    }

    pub fn spreadsheet_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.spreadsheet_path = path.into();
        self
    }

    pub fn document_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.document_path = path.into();
        self
    }

    pub fn thumbnail_size_pt(mut self, size: f32) -> Self {
        self.config.thumbnail_size_pt = size;
        self
    }

    /// Write both reports into `dir`, keeping their default file names.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.config.spreadsheet_path = dir.join(DEFAULT_SPREADSHEET);
        self.config.document_path = dir.join(DEFAULT_DOCUMENT);
        self
    }

    /// Register a callback that receives scan events.
    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ScanConfig, QrScanError> {
        let c = &self.config;
        if !c.zoom.is_finite() || c.zoom <= 0.0 {
            return Err(QrScanError::InvalidConfig(format!(
                "zoom must be a positive number, got {}",
                c.zoom
            )));
        }
        // A thumbnail plus cell padding has to fit inside the 648 pt usable height.
        if !c.thumbnail_size_pt.is_finite()
            || c.thumbnail_size_pt <= 0.0
            || c.thumbnail_size_pt > 300.0
        {
            return Err(QrScanError::InvalidConfig(format!(
                "thumbnail size must be in (0, 300] points, got {}",
                c.thumbnail_size_pt
            )));
        }
        if c.spreadsheet_path == c.document_path {
            return Err(QrScanError::InvalidConfig(format!(
                "spreadsheet and document would both be written to '{}'",
                c.spreadsheet_path.display()
            )));
        }
        Ok(self.config)
    }
}
