//! # edgequake-pdfqr
//!
//! Find QR codes in a folder of PDF documents and report them as a
//! spreadsheet and a tabular PDF.
//!
//! ## Why this crate?
//!
//! Label sheets, shipping manifests and inventory printouts often arrive as
//! PDFs where the QR codes are small, slightly blurred, or printed on a tinted
//! background. Each page is rasterised, sharpened and binarised with a local
//! (adaptive) threshold before decoding, which recovers codes that a plain
//! global threshold loses.
//!
//! ## Pipeline Overview
//!
//! ```text
//! folder
//!  │
//!  ├─ 1. Input    list *.pdf entries in name order, check %PDF magic
//!  ├─ 2. Render   rasterise pages lazily via pdfium at the chosen zoom
//!  ├─ 3. Enhance  grayscale → 3×3 sharpen → adaptive Gaussian threshold
//!  ├─ 4. Detect   locate and decode every QR symbol on the page
//!  ├─ 5. Record   tag from the payload + PNG thumbnail of the code region
//!  └─ 6. Report   qr_code_data.xlsx and qr_code_report.pdf, written atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdfqr::{run, ScanConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScanConfig::builder().zoom(1.7).build()?;
//!     let summary = run(Path::new("./labels"), &config)?;
//!     eprintln!(
//!         "{} codes in {} files",
//!         summary.stats.codes, summary.stats.pdf_files
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Tags
//!
//! The tag of a payload is the second-to-last `/`-separated segment:
//! `warehouse/zoneA/item42` → `zoneA`, `a/b` → `a`, `plain` → empty.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfqr` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! edgequake-pdfqr = { version = "0.1", default-features = false }
//! ```
//!
//! ## PDFium
//!
//! Rendering needs a pdfium shared library at runtime. Set `PDFIUM_LIB_PATH`
//! to the library file or its directory, or install it on the system library
//! path.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod scan;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ScanConfig, ScanConfigBuilder, DEFAULT_DOCUMENT, DEFAULT_SPREADSHEET};
pub use error::QrScanError;
pub use output::{CodeRect, DetectedCode, PageImage, ReportRecord, RunSummary, ScanOutput, ScanStats};
pub use pipeline::detect::{CodeDetector, QrDetector};
pub use pipeline::render::{PageRasterizer, PageStream, PdfiumRasterizer};
pub use pipeline::tag::extract_tag;
pub use progress::{NoopProgressCallback, ProgressCallback, ScanProgressCallback};
pub use report::{FileReportWriter, ReportWriter};
pub use scan::{run, run_with, scan_folder};
