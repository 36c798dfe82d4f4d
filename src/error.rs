//! Error types for the edgequake-pdfqr library.
//!
//! A single fatal error type, [`QrScanError`], covers everything that stops a
//! run: an unusable input folder, a PDF that cannot be opened or rendered, or
//! a report that cannot be written.
//!
//! A page on which no QR code can be decoded is *not* an error. The detector
//! simply returns no codes for it and the scan moves on, so there is no
//! page-level error type.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdfqr library.
#[derive(Debug, Error)]
pub enum QrScanError {
    // ── Folder errors ─────────────────────────────────────────────────────
    /// The folder to scan does not exist.
    #[error("Folder not found: '{path}'\nCheck the path exists and is readable.")]
    FolderNotFound { path: PathBuf },

    /// The path given as the folder to scan is a file.
    #[error("'{path}' is not a directory\nPass the folder that contains the PDF files.")]
    NotADirectory { path: PathBuf },

    /// The folder exists but its entries could not be listed.
    #[error("Failed to read folder '{path}': {source}")]
    FolderUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Input errors ──────────────────────────────────────────────────────
    /// A PDF listed in the folder vanished before it could be opened.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file has a `.pdf` name but does not start with the PDF magic bytes.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: Vec<u8> },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password; encrypted documents are not scanned.
    #[error("PDF '{path}' is encrypted and requires a password.\nDecrypt it first, e.g. qpdf --decrypt input.pdf output.pdf")]
    PasswordRequired { path: PathBuf },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page} of '{path}': {detail}")]
    RasterisationFailed {
        path: PathBuf,
        page: usize,
        detail: String,
    },

    // ── Image errors ──────────────────────────────────────────────────────
    /// A cropped QR thumbnail could not be encoded or decoded as PNG.
    #[error("Thumbnail encoding failed for a code in '{file}': {detail}")]
    ThumbnailFailed { file: String, detail: String },

    // ── Report errors ─────────────────────────────────────────────────────
    /// The spreadsheet encoder rejected the data.
    #[error("Failed to build spreadsheet '{path}': {detail}")]
    SpreadsheetFailed { path: PathBuf, detail: String },

    /// The PDF report could not be assembled.
    #[error("Failed to build PDF report '{path}': {detail}")]
    DocumentFailed { path: PathBuf, detail: String },

    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium (https://github.com/bblanchon/pdfium-binaries/releases)\n\
and either put it on the system library path or set\n\
PDFIUM_LIB_PATH=/path/to/libpdfium (or the directory that contains it).\n"
    )]
    PdfiumBindingFailed(String),
}

impl QrScanError {
    /// Map an I/O error raised while opening `path` to the matching input error.
    pub(crate) fn from_open_error(path: PathBuf, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => QrScanError::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => QrScanError::PermissionDenied { path },
            _ => QrScanError::CorruptPdf {
                path,
                detail: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn not_a_pdf_display_names_path() {
        let e = QrScanError::NotAPdf {
            path: PathBuf::from("/scans/invoice.pdf"),
            magic: b"PK\x03\x04".to_vec(),
        };
        let msg = e.to_string();
        assert!(msg.contains("/scans/invoice.pdf"), "got: {msg}");
    }

    #[test]
    fn rasterisation_display_names_page_and_file() {
        let e = QrScanError::RasterisationFailed {
            path: PathBuf::from("labels.pdf"),
            page: 3,
            detail: "bitmap allocation failed".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 3"));
        assert!(msg.contains("labels.pdf"));
    }

    #[test]
    fn output_write_failed_keeps_source() {
        use std::error::Error as _;
        let e = QrScanError::OutputWriteFailed {
            path: PathBuf::from("qr_code_data.xlsx"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("qr_code_data.xlsx"));
    }

    #[test]
    fn open_error_mapping() {
        let p = PathBuf::from("a.pdf");
        let not_found = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            QrScanError::from_open_error(p.clone(), &not_found),
            QrScanError::FileNotFound { .. }
        ));
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "no");
        assert!(matches!(
            QrScanError::from_open_error(p, &denied),
            QrScanError::PermissionDenied { .. }
        ));
    }
}
