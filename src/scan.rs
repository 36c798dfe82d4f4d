//! Scan driver: folder → pages → codes → records → reports.
//!
//! [`scan_folder`] walks the folder and collects records, [`run_with`] adds the
//! report-writing step, and [`run`] wires in the default pdfium rasteriser,
//! QR detector and file writers.

use crate::config::ScanConfig;
use crate::error::QrScanError;
use crate::output::{ReportRecord, RunSummary, ScanOutput};
use crate::pipeline::detect::{CodeDetector, QrDetector};
use crate::pipeline::encode::encode_thumbnail;
use crate::pipeline::input::{display_name, list_pdf_files};
use crate::pipeline::render::{PageRasterizer, PdfiumRasterizer};
use crate::report::{FileReportWriter, ReportWriter};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Scan every PDF in `folder` and return the records in discovery order.
///
/// Files are visited in file-name order, pages in page order and codes in the
/// order the detector reports them. The first file that cannot be opened or
/// rasterised aborts the scan.
pub fn scan_folder<R, D>(
    folder: &Path,
    config: &ScanConfig,
    rasterizer: &R,
    detector: &D,
) -> Result<ScanOutput, QrScanError>
where
    R: PageRasterizer + ?Sized,
    D: CodeDetector + ?Sized,
{
    let start = Instant::now();
    let cb = config.progress_callback.as_ref();

    // ── Step 1: List the folder ──────────────────────────────────────────
    let listing = list_pdf_files(folder)?;
    let total = listing.pdfs.len();
    info!("Found {} PDF file(s) in {}", total, folder.display());
    if let Some(cb) = cb {
        cb.on_scan_start(total);
    }

    let mut output = ScanOutput::default();
    output.stats.skipped_entries = listing.skipped;

    for (i, path) in listing.pdfs.iter().enumerate() {
        let file = display_name(path);
        if let Some(cb) = cb {
            cb.on_file_start(&file, i + 1, total);
        }
        debug!("Scanning {} ({}/{})", file, i + 1, total);

        // ── Step 2: Rasterise pages one at a time ────────────────────────
        let mut pages = 0;
        let mut codes = 0;
        for page in rasterizer.open(path, config.zoom)? {
            let page = page?;
            pages += 1;

            // ── Step 3: Detect and decode ────────────────────────────────
            for code in detector.detect(&page.pixels) {
                info!("QR Code found in {}: {}", file, code.payload);
                if let Some(cb) = cb {
                    cb.on_code_found(&file, &code.payload);
                }

                // ── Step 4: Crop the thumbnail ───────────────────────────
                let thumbnail = encode_thumbnail(&page.pixels, &code.rect).map_err(|e| {
                    QrScanError::ThumbnailFailed {
                        file: file.clone(),
                        detail: format!("page {}: {e}", page.page_number),
                    }
                })?;
                output
                    .records
                    .push(ReportRecord::new(file.clone(), code.payload, thumbnail));
                codes += 1;
            }
        }

        debug!("{}: {} page(s), {} code(s)", file, pages, codes);
        output.stats.pdf_files += 1;
        output.stats.pages += pages;
        output.stats.codes += codes;
        if let Some(cb) = cb {
            cb.on_file_complete(&file, pages, codes);
        }
    }

    info!(
        "Scanned {} file(s), {} page(s), found {} code(s) in {}ms",
        output.stats.pdf_files,
        output.stats.pages,
        output.stats.codes,
        start.elapsed().as_millis()
    );
    if let Some(cb) = cb {
        cb.on_scan_complete(output.stats.pdf_files, output.stats.codes);
    }
    Ok(output)
}

/// Scan `folder` and write both reports with the given components.
///
/// The spreadsheet is written before the PDF report. Nothing is written if the
/// scan fails.
pub fn run_with<R, D, W>(
    folder: &Path,
    config: &ScanConfig,
    rasterizer: &R,
    detector: &D,
    writer: &W,
) -> Result<RunSummary, QrScanError>
where
    R: PageRasterizer + ?Sized,
    D: CodeDetector + ?Sized,
    W: ReportWriter + ?Sized,
{
    let ScanOutput { records, stats } = scan_folder(folder, config, rasterizer, detector)?;

    // ── Step 5: Emit reports ─────────────────────────────────────────────
    let written = |path: &Path| {
        info!("{} report generated", path.display());
        if let Some(cb) = &config.progress_callback {
            cb.on_report_written(path);
        }
    };
    writer.write_spreadsheet(&records, &config.spreadsheet_path)?;
    written(&config.spreadsheet_path);
    writer.write_document(&records, &config.document_path)?;
    written(&config.document_path);

    Ok(RunSummary {
        stats,
        spreadsheet_path: config.spreadsheet_path.clone(),
        document_path: config.document_path.clone(),
    })
}

/// Scan `folder` with pdfium and the QR detector, then write both reports.
///
/// pdfium is only loaded once there is a PDF to open, so an empty folder
/// produces header-only reports even where the library is missing.
///
/// # Example
/// ```rust,no_run
/// use edgequake_pdfqr::{run, ScanConfig};
/// use std::path::Path;
///
/// let config = ScanConfig::builder().zoom(1.7).build()?;
/// let summary = run(Path::new("./labels"), &config)?;
/// println!("{} codes", summary.stats.codes);
/// # Ok::<(), edgequake_pdfqr::QrScanError>(())
/// ```
pub fn run(folder: &Path, config: &ScanConfig) -> Result<RunSummary, QrScanError> {
    let rasterizer = PdfiumRasterizer::new();
    let detector = QrDetector::new();
    let writer = FileReportWriter::new(config.thumbnail_size_pt);
    run_with(folder, config, &rasterizer, &detector, &writer)
}
