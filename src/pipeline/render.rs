//! PDF rasterisation: open a document and render its pages one at a time.
//!
//! Pages are produced lazily through [`PageStream`], so only one rendered page
//! is alive at a time no matter how long the document is. The stream is
//! finite, ordered, and cannot be restarted. Open the file again to rescan it.
//!
//! The PDF is validated and fully loaded in [`PageRasterizer::open`]. A
//! missing, non-PDF, corrupt or encrypted file fails there, before a single
//! page is handed to the detector.

use super::input::validate_pdf;
use crate::error::QrScanError;
use crate::output::PageImage;
use pdfium_render::prelude::*;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Lazy, finite sequence of rendered pages in page order.
pub type PageStream<'a> = Box<dyn Iterator<Item = Result<PageImage, QrScanError>> + 'a>;

/// Opens a PDF and yields its pages as RGB images.
pub trait PageRasterizer {
    /// Open `pdf_path` and prepare to render every page at `zoom` × its
    /// native size (1 PDF point = 1 pixel at zoom 1.0).
    fn open(&self, pdf_path: &Path, zoom: f32) -> Result<PageStream<'_>, QrScanError>;
}

/// Bind to the pdfium shared library.
///
/// `PDFIUM_LIB_PATH` may name the library file itself or the directory that
/// contains it; otherwise the system library search path is used.
pub fn bind_pdfium() -> Result<Pdfium, QrScanError> {
    let bindings = match std::env::var_os("PDFIUM_LIB_PATH") {
        Some(raw) if !raw.is_empty() => {
            let configured = PathBuf::from(raw);
            let lib = if configured.is_dir() {
                configured.join(Pdfium::pdfium_platform_library_name())
            } else {
                configured
            };
            debug!("Binding pdfium from {}", lib.display());
            Pdfium::bind_to_library(lib.as_path()).map_err(|e| {
                QrScanError::PdfiumBindingFailed(format!("{}: {}", lib.display(), e))
            })?
        }
        _ => Pdfium::bind_to_system_library()
            .map_err(|e| QrScanError::PdfiumBindingFailed(e.to_string()))?,
    };
    Ok(Pdfium::new(bindings))
}

/// [`PageRasterizer`] backed by pdfium-render.
///
/// The library is bound on the first [`PageRasterizer::open`], so a folder
/// without PDFs never needs pdfium at all.
#[derive(Default)]
pub struct PdfiumRasterizer {
    pdfium: OnceCell<Pdfium>,
}

impl PdfiumRasterizer {
    /// Bind to pdfium (see [`bind_pdfium`]) when the first PDF is opened.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an already-bound pdfium instance.
    pub fn with_pdfium(pdfium: Pdfium) -> Self {
        Self {
            pdfium: OnceCell::from(pdfium),
        }
    }

    fn pdfium(&self) -> Result<&Pdfium, QrScanError> {
        if let Some(pdfium) = self.pdfium.get() {
            return Ok(pdfium);
        }
        let bound = bind_pdfium()?;
        Ok(self.pdfium.get_or_init(|| bound))
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn open(&self, pdf_path: &Path, zoom: f32) -> Result<PageStream<'_>, QrScanError> {
        validate_pdf(pdf_path)?;

        let document = self
            .pdfium()?
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| {
                let err_str = format!("{:?}", e);
                if err_str.contains("Password") || err_str.contains("password") {
                    QrScanError::PasswordRequired {
                        path: pdf_path.to_path_buf(),
                    }
                } else {
                    QrScanError::CorruptPdf {
                        path: pdf_path.to_path_buf(),
                        detail: err_str,
                    }
                }
            })?;

        let total = document.pages().len();
        info!("PDF loaded: {} ({} pages)", pdf_path.display(), total);

        Ok(Box::new(PdfiumPages {
            path: pdf_path.to_path_buf(),
            document,
            render_config: PdfRenderConfig::new().scale_page_by_factor(zoom),
            next_index: 0,
            total,
        }))
    }
}

/// Page iterator over an open pdfium document.
struct PdfiumPages<'a> {
    path: PathBuf,
    document: PdfDocument<'a>,
    render_config: PdfRenderConfig,
    next_index: u16,
    total: u16,
}

impl PdfiumPages<'_> {
    fn render(&self, index: u16) -> Result<PageImage, QrScanError> {
        let page_number = index as usize + 1;
        let failed = |e: PdfiumError| QrScanError::RasterisationFailed {
            path: self.path.clone(),
            page: page_number,
            detail: format!("{:?}", e),
        };

        let page = self.document.pages().get(index).map_err(failed)?;
        let bitmap = page.render_with_config(&self.render_config).map_err(failed)?;

        // pdfium renders BGRA onto a white page; dropping alpha flattens it.
        let pixels = bitmap.as_image().into_rgb8();
        debug!(
            "Rendered page {} → {}x{} px",
            page_number,
            pixels.width(),
            pixels.height()
        );

        Ok(PageImage {
            page_number,
            pixels,
        })
    }
}

impl Iterator for PdfiumPages<'_> {
    type Item = Result<PageImage, QrScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.total {
            return None;
        }
        let index = self.next_index;
        self.next_index += 1;

        let result = self.render(index);
        if result.is_err() {
            // A page that fails to render ends the stream.
            self.next_index = self.total;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total - self.next_index) as usize;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_does_not_bind() {
        let rasterizer = PdfiumRasterizer::new();
        assert!(rasterizer.pdfium.get().is_none());
    }

    #[test]
    fn non_pdf_is_rejected_before_binding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.pdf");
        std::fs::write(&path, b"PK\x03\x04").unwrap();

        let rasterizer = PdfiumRasterizer::new();
        let err = rasterizer.open(&path, 1.0).err().expect("open must fail");
        assert!(matches!(err, QrScanError::NotAPdf { .. }), "got {err}");
        assert!(rasterizer.pdfium.get().is_none());
    }
}
