//! Report emission: the `.xlsx` spreadsheet and the tabular PDF.
//!
//! Both reports are rendered fully in memory and then written with an atomic
//! temp-file-and-rename, so a failed run never leaves a half-written report at
//! the destination path.

pub mod document;
pub mod metrics;
pub mod spreadsheet;
pub mod staging;

use crate::error::QrScanError;
use crate::output::ReportRecord;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Writes the two report artifacts for a finished scan.
pub trait ReportWriter {
    /// Write the spreadsheet (File, Tag, QR Code) to `path`.
    fn write_spreadsheet(&self, records: &[ReportRecord], path: &Path) -> Result<(), QrScanError>;

    /// Write the PDF table with thumbnails to `path`.
    fn write_document(&self, records: &[ReportRecord], path: &Path) -> Result<(), QrScanError>;
}

/// Default [`ReportWriter`] producing real files on disk.
#[derive(Debug, Clone, Copy)]
pub struct FileReportWriter {
    thumbnail_size_pt: f32,
}

impl FileReportWriter {
    /// `thumbnail_size_pt` is the edge of the square image cell in points.
    pub fn new(thumbnail_size_pt: f32) -> Self {
        Self { thumbnail_size_pt }
    }
}

impl ReportWriter for FileReportWriter {
    fn write_spreadsheet(&self, records: &[ReportRecord], path: &Path) -> Result<(), QrScanError> {
        let bytes = spreadsheet::render_spreadsheet(records).map_err(|e| QrScanError::SpreadsheetFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        write_atomic(path, &bytes)
    }

    fn write_document(&self, records: &[ReportRecord], path: &Path) -> Result<(), QrScanError> {
        let staging = staging::ThumbnailStaging::new().map_err(|e| QrScanError::DocumentFailed {
            path: path.to_path_buf(),
            detail: format!("creating thumbnail staging directory: {e}"),
        })?;
        let bytes = document::render_document(records, self.thumbnail_size_pt, &staging, path)?;
        write_atomic(path, &bytes)
    }
}

/// Write `bytes` to `path` through a temp file in the same directory.
///
/// Parent directories are created as needed. An existing file at `path` is
/// replaced only once the new content is complete.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), QrScanError> {
    let write_err = |e: std::io::Error| QrScanError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/report.bin");

        write_atomic(&path, b"first").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"first");

        write_atomic(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");

        // Only the target file remains, no temp leftovers.
        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn atomic_write_into_a_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let err = write_atomic(&blocker.join("report.pdf"), b"data").unwrap_err();
        assert!(matches!(err, QrScanError::OutputWriteFailed { .. }));
    }

    #[test]
    fn file_writer_produces_both_reports() {
        let dir = tempfile::tempdir().unwrap();
        let xlsx = dir.path().join("data.xlsx");
        let pdf = dir.path().join("report.pdf");
        let writer = FileReportWriter::new(72.0);

        writer.write_spreadsheet(&[], &xlsx).unwrap();
        writer.write_document(&[], &pdf).unwrap();

        assert!(std::fs::read(&xlsx).unwrap().starts_with(b"PK"));
        assert!(std::fs::read(&pdf).unwrap().starts_with(b"%PDF"));
    }
}
