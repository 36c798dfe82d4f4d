//! CLI binary for edgequake-pdfqr.
//!
//! A thin shim over the library crate: scan one folder, print every code as it
//! is found, and write `qr_code_data.xlsx` and `qr_code_report.pdf` into the
//! current directory.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdfqr::{run, ProgressCallback, ScanConfig, ScanProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Rasterisation zoom used for every page.
const ZOOM: f32 = 1.7;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Prints the per-code and per-report lines, and drives a progress bar over
/// files when one is shown.
struct CliProgressCallback {
    /// `None` with `--no-progress`; lines then go straight to stdout.
    bar: Option<ProgressBar>,
}

impl CliProgressCallback {
    fn new(show_bar: bool) -> Arc<Self> {
        let bar = show_bar.then(|| {
            let bar = ProgressBar::new(0);
            let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(spinner_style);
            bar.set_prefix("Preparing");
            bar.set_message("Listing folder…");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        Arc::new(Self { bar })
    }

    /// Print `line` to stdout without tearing the bar.
    fn say(&self, line: String) {
        match &self.bar {
            Some(bar) => bar.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }
}

impl ScanProgressCallback for CliProgressCallback {
    fn on_scan_start(&self, total_files: usize) {
        let Some(bar) = &self.bar else { return };
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_length(total_files as u64);
        bar.set_style(progress_style);
        bar.set_prefix("Scanning");
        bar.set_message("");
        bar.reset_eta();
    }

    fn on_file_start(&self, file: &str, _index: usize, _total: usize) {
        if let Some(bar) = &self.bar {
            bar.set_message(file.to_string());
        }
    }

    fn on_code_found(&self, file: &str, payload: &str) {
        self.say(format!("QR Code found in {file}: {payload}"));
    }

    fn on_file_complete(&self, _file: &str, _pages: usize, _codes: usize) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn on_scan_complete(&self, _files: usize, _codes: usize) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    fn on_report_written(&self, path: &Path) {
        self.say(format!("{} report generated", path.display()));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Scan a folder of label sheets
  pdfqr ./labels

  # Plain output, no progress bar (e.g. in CI logs)
  pdfqr --no-progress ./labels

OUTPUT:
  qr_code_data.xlsx     one row per code: PDF File, Tag, QR Code
  qr_code_report.pdf    the same table with a 1-inch image of each code

  Both files are written to the current directory and replaced if present.
  The tag is the second-to-last '/'-separated part of the payload
  (warehouse/zoneA/item42 → zoneA).

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH       Path to libpdfium, or the directory containing it
  RUST_LOG              Override the log filter (e.g. edgequake_pdfqr=debug)

SETUP:
  Rendering needs the pdfium shared library. Download a build from
  https://github.com/bblanchon/pdfium-binaries/releases and either install it
  on the library path or point PDFIUM_LIB_PATH at it.
"#;

/// Find QR codes in a folder of PDFs and write spreadsheet and PDF reports.
#[derive(Parser, Debug)]
#[command(
    name = "pdfqr",
    version,
    about = "Find QR codes in a folder of PDFs and write spreadsheet and PDF reports",
    long_about = "Rasterise every page of every PDF in FOLDER, enhance it for decoding, \
and collect each QR code found. Results are written to qr_code_data.xlsx and \
qr_code_report.pdf in the current directory.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Folder containing the PDF files to scan.
    folder: PathBuf,

    /// Disable progress bar.
    #[arg(long, env = "PDFQR_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFQR_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFQR_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar and the printed lines carry everything the user needs.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ScanConfig::builder().zoom(ZOOM);
    if !cli.quiet {
        let cb = CliProgressCallback::new(show_progress);
        builder = builder.progress_callback(cb as ProgressCallback);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run scan ─────────────────────────────────────────────────────────
    let start = Instant::now();
    let summary = run(&cli.folder, &config)
        .with_context(|| format!("Failed to scan '{}'", cli.folder.display()))?;

    if !cli.quiet {
        let stats = &summary.stats;
        eprintln!(
            "{}  {} codes  {} files  {} pages  {}",
            if stats.codes > 0 { green("✔") } else { cyan("◆") },
            bold(&stats.codes.to_string()),
            stats.pdf_files,
            stats.pages,
            dim(&format!("{:.1}s", start.elapsed().as_secs_f64())),
        );
    }

    Ok(())
}
