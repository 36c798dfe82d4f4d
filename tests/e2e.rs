//! End-to-end integration tests for edgequake-pdfqr.
//!
//! These tests render real PDFs through pdfium, so they need the pdfium shared
//! library. They are gated behind the `E2E_ENABLED` environment variable so
//! they do not run in CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=/path/to/pdfium cargo test --test e2e -- --nocapture

use calamine::{Reader, Xlsx};
use edgequake_pdfqr::{run, QrScanError, ScanConfig};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use qrcode::{Color, QrCode};
use std::io::Write;
use std::path::Path;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless E2E_ENABLED is set.
macro_rules! e2e_skip_unless_enabled {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("edgequake_pdfqr=debug"))
            .with_test_writer()
            .try_init();
    }};
}

const MODULE_PX: u32 = 8;
const QUIET_MODULES: u32 = 4;

/// RGB pixels of a QR symbol for `payload`, with quiet zone.
fn qr_pixels(payload: &str) -> (u32, Vec<u8>) {
    let code = QrCode::new(payload.as_bytes()).unwrap();
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let side = (modules + 2 * QUIET_MODULES) * MODULE_PX;

    let mut rgb = vec![255u8; (side * side * 3) as usize];
    for y in 0..side {
        for x in 0..side {
            let mx = (x / MODULE_PX) as i64 - QUIET_MODULES as i64;
            let my = (y / MODULE_PX) as i64 - QUIET_MODULES as i64;
            if mx < 0 || my < 0 || mx >= modules as i64 || my >= modules as i64 {
                continue;
            }
            if colors[(my as u32 * modules + mx as u32) as usize] == Color::Dark {
                let i = ((y * side + x) * 3) as usize;
                rgb[i..i + 3].copy_from_slice(&[0, 0, 0]);
            }
        }
    }
    (side, rgb)
}

/// Write a PDF whose pages each show the QR codes listed for them.
///
/// Every code is drawn 2 pt per module, stacked down the left side of a
/// US-Letter page.
fn write_pdf(path: &Path, pages: &[&[&str]]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();

    for payloads in pages {
        let mut ops = Vec::new();
        let mut xobjects = lopdf::Dictionary::new();
        let mut top = 720.0f32;
        for (i, payload) in payloads.iter().enumerate() {
            let (side, rgb) = qr_pixels(payload);
            let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
            enc.write_all(&rgb).unwrap();
            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => side as i64,
                    "Height" => side as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "FlateDecode",
                },
                enc.finish().unwrap(),
            ));
            let name = format!("Q{i}");
            xobjects.set(name.clone(), image_id);

            let size = (side / MODULE_PX) as f32 * 2.0;
            top -= size + 36.0;
            ops.push(Operation::new("q", vec![]));
            ops.push(Operation::new(
                "cm",
                vec![size.into(), 0.into(), 0.into(), size.into(), 72.into(), top.into()],
            ));
            ops.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
            ops.push(Operation::new("Q", vec![]));
        }

        let content = Content { operations: ops }.encode().unwrap();
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => dictionary! { "XObject" => xobjects },
            "Contents" => content_id,
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

fn sheet_rows(path: &Path) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = calamine::open_workbook(path).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    range
        .rows()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn config_into(out: &Path) -> ScanConfig {
    ScanConfig::builder().zoom(1.7).output_dir(out).build().unwrap()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn test_single_label_sheet() {
    e2e_skip_unless_enabled!();
    let folder = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_pdf(&folder.path().join("labels.pdf"), &[&["warehouse/zoneA/item42"]]);

    let summary = run(folder.path(), &config_into(out.path())).expect("run succeeds");
    assert_eq!(summary.stats.pdf_files, 1);
    assert_eq!(summary.stats.pages, 1);
    assert_eq!(summary.stats.codes, 1);

    let rows = sheet_rows(&summary.spreadsheet_path);
    assert_eq!(
        rows[1],
        vec!["labels.pdf", "zoneA", "warehouse/zoneA/item42"]
    );

    let report = Document::load(&summary.document_path).unwrap();
    assert_eq!(report.get_pages().len(), 1);
}

#[test]
fn test_multi_page_multi_file() {
    e2e_skip_unless_enabled!();
    let folder = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_pdf(&folder.path().join("a.pdf"), &[&["dock/north/pallet1"], &[]]);
    write_pdf(&folder.path().join("b.pdf"), &[&["plain-id"]]);
    std::fs::write(folder.path().join("readme.txt"), b"not scanned").unwrap();

    let summary = run(folder.path(), &config_into(out.path())).expect("run succeeds");
    assert_eq!(summary.stats.pdf_files, 2);
    assert_eq!(summary.stats.pages, 3);
    assert_eq!(summary.stats.skipped_entries, 1);

    let rows = sheet_rows(&summary.spreadsheet_path);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1], vec!["a.pdf", "north", "dock/north/pallet1"]);
    assert_eq!(rows[2], vec!["b.pdf", "", "plain-id"]);
}

#[test]
fn test_not_a_pdf_is_rejected() {
    e2e_skip_unless_enabled!();
    let folder = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    std::fs::write(folder.path().join("fake.pdf"), b"PK\x03\x04 zip archive").unwrap();

    let err = run(folder.path(), &config_into(out.path())).unwrap_err();
    assert!(matches!(err, QrScanError::NotAPdf { .. }), "got {err}");
    assert!(!out.path().join("qr_code_data.xlsx").exists());
}

#[test]
fn test_truncated_pdf_is_corrupt() {
    e2e_skip_unless_enabled!();
    let folder = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    std::fs::write(folder.path().join("cut.pdf"), b"%PDF-1.4\n1 0 obj\n<<").unwrap();

    let err = run(folder.path(), &config_into(out.path())).unwrap_err();
    assert!(matches!(err, QrScanError::CorruptPdf { .. }), "got {err}");
}
