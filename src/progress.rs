//! Progress-callback trait for scan events.
//!
//! Inject an [`Arc<dyn ScanProgressCallback>`] via
//! [`crate::config::ScanConfigBuilder::progress_callback`] to be told which
//! file is being scanned, every code as soon as it is decoded, and every
//! report once it is on disk. The `pdfqr` binary uses it to drive its progress
//! bar and to print the `QR Code found in …` lines.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdfqr::{ScanConfig, ScanProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CodeCounter {
//!     found: AtomicUsize,
//! }
//!
//! impl ScanProgressCallback for CodeCounter {
//!     fn on_code_found(&self, file: &str, payload: &str) {
//!         self.found.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{file}: {payload}");
//!     }
//! }
//!
//! let counter = Arc::new(CodeCounter { found: AtomicUsize::new(0) });
//! let config = ScanConfig::builder()
//!     .progress_callback(counter as Arc<dyn ScanProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the scan driver as it walks the folder.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Calls arrive sequentially from the scanning thread.
pub trait ScanProgressCallback: Send + Sync {
    /// Called once, after the folder has been listed.
    ///
    /// # Arguments
    /// * `total_files` : number of PDF files that will be scanned
    fn on_scan_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called before a PDF is opened.
    ///
    /// # Arguments
    /// * `file`  : file name of the PDF
    /// * `index` : 1-indexed position in the scan order
    /// * `total` : number of PDF files in the folder
    fn on_file_start(&self, file: &str, index: usize, total: usize) {
        let _ = (file, index, total);
    }

    /// Called for every decoded code, in discovery order.
    fn on_code_found(&self, file: &str, payload: &str) {
        let _ = (file, payload);
    }

    /// Called after the last page of a PDF has been scanned.
    ///
    /// # Arguments
    /// * `pages` : pages rasterised in this file
    /// * `codes` : codes decoded in this file
    fn on_file_complete(&self, file: &str, pages: usize, codes: usize) {
        let _ = (file, pages, codes);
    }

    /// Called once per report file, after it has been written.
    fn on_report_written(&self, path: &Path) {
        let _ = path;
    }

    /// Called once after every file has been scanned, before reports are written.
    fn on_scan_complete(&self, files: usize, codes: usize) {
        let _ = (files, codes);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ScanProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ScanConfig`].
pub type ProgressCallback = Arc<dyn ScanProgressCallback>;
