//! Records produced by a scan and the summary returned to callers.
//!
//! Everything here is transient: built while the folder is walked, handed to
//! the report writers, then dropped. Only the two report files outlive a run.

use crate::pipeline::tag::extract_tag;
use image::RgbImage;
use std::path::PathBuf;

/// One rasterised PDF page.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// 1-indexed page number within its document.
    pub page_number: usize,
    /// Page pixels, alpha already stripped.
    pub pixels: RgbImage,
}

/// Axis-aligned bounding box of a code, in page-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeRect {
    pub top: u32,
    pub left: u32,
    pub width: u32,
    pub height: u32,
}

impl CodeRect {
    /// Bounding box of a set of corner points, clamped to a `width × height`
    /// image. Never returns a zero-sized rectangle for a non-empty image.
    pub fn from_corners(corners: &[(i32, i32)], width: u32, height: u32) -> Self {
        let max_x = width.saturating_sub(1) as i64;
        let max_y = height.saturating_sub(1) as i64;
        let clamp_x = |v: i32| (v as i64).clamp(0, max_x) as u32;
        let clamp_y = |v: i32| (v as i64).clamp(0, max_y) as u32;

        let left = corners.iter().map(|c| clamp_x(c.0)).min().unwrap_or(0);
        let right = corners.iter().map(|c| clamp_x(c.0)).max().unwrap_or(0);
        let top = corners.iter().map(|c| clamp_y(c.1)).min().unwrap_or(0);
        let bottom = corners.iter().map(|c| clamp_y(c.1)).max().unwrap_or(0);

        Self {
            top,
            left,
            width: right - left + 1,
            height: bottom - top + 1,
        }
    }
}

/// A decoded QR code found on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedCode {
    pub rect: CodeRect,
    pub payload: String,
}

/// The unit of information written to both reports.
///
/// `tag` is always derived from `payload`; there is no way to set it
/// independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRecord {
    source_file: String,
    tag: String,
    payload: String,
    thumbnail_png: Vec<u8>,
}

impl ReportRecord {
    pub fn new(
        source_file: impl Into<String>,
        payload: impl Into<String>,
        thumbnail_png: Vec<u8>,
    ) -> Self {
        let payload = payload.into();
        Self {
            source_file: source_file.into(),
            tag: extract_tag(&payload).to_string(),
            payload,
            thumbnail_png,
        }
    }

    /// File name (not path) of the PDF the code was found in.
    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// PNG-encoded crop of the code region.
    pub fn thumbnail_png(&self) -> &[u8] {
        &self.thumbnail_png
    }
}

/// Counters collected while walking the folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// PDF files opened and fully rasterised.
    pub pdf_files: usize,
    /// Pages rasterised across all files.
    pub pages: usize,
    /// Codes decoded (equals the number of records).
    pub codes: usize,
    /// Folder entries ignored (sub-folders, non-PDF names).
    pub skipped_entries: usize,
}

/// Result of walking a folder: the ordered records plus counters.
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    /// Records in discovery order: file order × page order × detection order.
    pub records: Vec<ReportRecord>,
    pub stats: ScanStats,
}

/// What a complete run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub stats: ScanStats,
    pub spreadsheet_path: PathBuf,
    pub document_path: PathBuf,
}
