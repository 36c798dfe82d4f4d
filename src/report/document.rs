//! PDF report: a styled table with one row per code and an embedded thumbnail.
//!
//! The document is laid out by hand on US-Letter pages with 1 inch margins and
//! written with lopdf using the standard Helvetica faces. The table flows over
//! as many pages as needed and the header row is repeated at the top of each.
//!
//! ```text
//! ┌──────────┬───────┬───────────────────┬──────────┐
//! │ PDF File │  Tag  │      QR Code      │ QR Image │   grey / white-smoke, bold 12
//! ├──────────┼───────┼───────────────────┼──────────┤
//! │  a.pdf   │ zoneA │ warehouse/zoneA/… │  ▣ 1in   │   beige / black, regular 10
//! └──────────┴───────┴───────────────────┴──────────┘
//! ```

use super::metrics::{ellipsize, encoded_width, wrap, Face};
use super::staging::ThumbnailStaging;
use crate::error::QrScanError;
use crate::output::ReportRecord;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Column titles of the PDF table.
pub const HEADERS: [&str; 4] = ["PDF File", "Tag", "QR Code", "QR Image"];

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;

const PAD_X: f32 = 6.0;
const PAD_TOP: f32 = 3.0;
const PAD_BOTTOM: f32 = 3.0;
const HEADER_PAD_BOTTOM: f32 = 12.0;
const LEADING: f32 = 1.2;
const GRID_WIDTH: f32 = 1.0;

const HEADER_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;

type Color = (f32, f32, f32);
const HEADER_BACKGROUND: Color = (0.502, 0.502, 0.502);
const HEADER_TEXT: Color = (0.961, 0.961, 0.961);
const BODY_BACKGROUND: Color = (0.961, 0.961, 0.863);
const BODY_TEXT: Color = (0.0, 0.0, 0.0);
const GRID: Color = (0.0, 0.0, 0.0);

/// Share of the text width given to the File, Tag and QR Code columns.
const TEXT_COLUMN_SHARES: [f32; 3] = [0.30, 0.18, 0.52];

/// Column geometry derived from the thumbnail size.
#[derive(Debug, Clone, Copy)]
struct Columns {
    widths: [f32; 4],
    thumbnail: f32,
}

impl Columns {
    fn new(thumbnail: f32) -> Self {
        let image_col = thumbnail + 2.0 * PAD_X;
        let text_total = (PAGE_WIDTH - 2.0 * MARGIN - image_col).max(3.0 * 2.0 * PAD_X);
        let w = |i: usize| text_total * TEXT_COLUMN_SHARES[i];
        Self {
            widths: [w(0), w(1), w(2), image_col],
            thumbnail,
        }
    }

    fn left(&self, col: usize) -> f32 {
        MARGIN + self.widths[..col].iter().sum::<f32>()
    }

    fn table_width(&self) -> f32 {
        self.widths.iter().sum()
    }

    fn text_width(&self, col: usize) -> f32 {
        (self.widths[col] - 2.0 * PAD_X).max(1.0)
    }
}

/// A wrapped table row ready to be drawn.
struct Row {
    cells: Vec<Vec<Vec<u8>>>,
    height: f32,
}

/// Operations and image resources of the page being filled.
struct PageCanvas {
    ops: Vec<Operation>,
    images: Vec<(String, ObjectId)>,
}

impl PageCanvas {
    fn new() -> Self {
        Self {
            ops: Vec::new(),
            images: Vec::new(),
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.ops.push(Operation::new("rg", vec![color.0.into(), color.1.into(), color.2.into()]));
        self.ops.push(Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()]));
        self.ops.push(Operation::new("f", vec![]));
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ops.push(Operation::new("RG", vec![GRID.0.into(), GRID.1.into(), GRID.2.into()]));
        self.ops.push(Operation::new("w", vec![GRID_WIDTH.into()]));
        self.ops.push(Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()]));
        self.ops.push(Operation::new("S", vec![]));
    }

    fn text(&mut self, face: Face, size: f32, color: Color, x: f32, y: f32, encoded: &[u8]) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new("Tf", vec![face.resource_name().into(), size.into()]));
        self.ops.push(Operation::new("rg", vec![color.0.into(), color.1.into(), color.2.into()]));
        self.ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        self.ops.push(Operation::new("Tj", vec![Object::string_literal(encoded.to_vec())]));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn image(&mut self, id: ObjectId, x: f32, y: f32, size: f32) {
        let name = format!("Im{}", self.images.len());
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![size.into(), 0.into(), 0.into(), size.into(), x.into(), y.into()],
        ));
        self.ops.push(Operation::new("Do", vec![Object::Name(name.clone().into_bytes())]));
        self.ops.push(Operation::new("Q", vec![]));
        self.images.push((name, id));
    }
}

/// Incrementally lays out the table and collects finished pages.
struct TableWriter<'a> {
    doc: Document,
    pages_id: ObjectId,
    font_ids: [(Face, ObjectId); 2],
    columns: Columns,
    path: &'a Path,
    page_ids: Vec<ObjectId>,
    canvas: PageCanvas,
    cursor: f32,
    header: Row,
    max_body_lines: usize,
}

impl<'a> TableWriter<'a> {
    fn new(path: &'a Path, thumbnail: f32) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_ids = [Face::Regular, Face::Bold].map(|face| {
            let id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            (face, id)
        });

        let columns = Columns::new(thumbnail);
        let header = Self::layout_header(&columns);
        let body_room = PAGE_HEIGHT - 2.0 * MARGIN - header.height - PAD_TOP - PAD_BOTTOM;
        let max_body_lines = ((body_room / (BODY_SIZE * LEADING)).floor() as usize).max(1);

        Self {
            doc,
            pages_id,
            font_ids,
            columns,
            path,
            page_ids: Vec::new(),
            canvas: PageCanvas::new(),
            cursor: PAGE_HEIGHT - MARGIN,
            header,
            max_body_lines,
        }
    }

    fn layout_header(columns: &Columns) -> Row {
        let cells: Vec<Vec<Vec<u8>>> = HEADERS
            .iter()
            .enumerate()
            .map(|(col, title)| wrap(Face::Bold, HEADER_SIZE, title, columns.text_width(col)))
            .collect();
        let lines = cells.iter().map(Vec::len).max().unwrap_or(1);
        Row {
            cells,
            height: PAD_TOP + lines as f32 * HEADER_SIZE * LEADING + HEADER_PAD_BOTTOM,
        }
    }

    fn layout_body(&self, record: &ReportRecord) -> Row {
        let texts = [record.source_file(), record.tag(), record.payload()];
        let cells: Vec<Vec<Vec<u8>>> = texts
            .iter()
            .enumerate()
            .map(|(col, text)| {
                let max_width = self.columns.text_width(col);
                let mut lines = wrap(Face::Regular, BODY_SIZE, text, max_width);
                if lines.len() > self.max_body_lines {
                    lines.truncate(self.max_body_lines);
                    if let Some(last) = lines.last_mut() {
                        *last = ellipsize(Face::Regular, BODY_SIZE, last, max_width);
                    }
                }
                lines
            })
            .collect();
        let lines = cells.iter().map(Vec::len).max().unwrap_or(1);
        let content = (lines as f32 * BODY_SIZE * LEADING).max(self.columns.thumbnail);
        Row {
            cells,
            height: PAD_TOP + content + PAD_BOTTOM,
        }
    }

    fn failed(&self, detail: impl Into<String>) -> QrScanError {
        QrScanError::DocumentFailed {
            path: self.path.to_path_buf(),
            detail: detail.into(),
        }
    }

    /// Draw background, text and grid of one row whose top edge is at `top`.
    #[allow(clippy::too_many_arguments)]
    fn draw_row(&mut self, row: &Row, top: f32, face: Face, size: f32, bg: Color, fg: Color, pad_bottom: f32) {
        let bottom = top - row.height;
        let table_width = self.columns.table_width();
        self.canvas.fill_rect(MARGIN, bottom, table_width, row.height, bg);

        let leading = size * LEADING;
        let content_top = top - PAD_TOP;
        let content_height = row.height - PAD_TOP - pad_bottom;
        for (col, lines) in row.cells.iter().enumerate() {
            let block = lines.len() as f32 * leading;
            let block_top = content_top - (content_height - block).max(0.0) / 2.0;
            for (i, line) in lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let width = encoded_width(face, size, line);
                let x = self.columns.left(col) + (self.columns.widths[col] - width) / 2.0;
                // Baseline sits a little below the middle of the line box.
                let baseline = block_top - i as f32 * leading - leading / 2.0 - size * 0.35;
                self.canvas.text(face, size, fg, x, baseline, line);
            }
        }

        for col in 0..self.columns.widths.len() {
            self.canvas
                .stroke_rect(self.columns.left(col), bottom, self.columns.widths[col], row.height);
        }
    }

    fn draw_header(&mut self) {
        let header = std::mem::replace(
            &mut self.header,
            Row {
                cells: Vec::new(),
                height: 0.0,
            },
        );
        let top = self.cursor;
        self.draw_row(
            &header,
            top,
            Face::Bold,
            HEADER_SIZE,
            HEADER_BACKGROUND,
            HEADER_TEXT,
            HEADER_PAD_BOTTOM,
        );
        self.cursor -= header.height;
        self.header = header;
    }

    fn add_row(&mut self, record: &ReportRecord, staging: &ThumbnailStaging) -> Result<(), QrScanError> {
        let row = self.layout_body(record);
        if self.cursor - row.height < MARGIN {
            self.finish_page()?;
            self.draw_header();
        }

        // The staged file is deleted as soon as its pixels are loaded.
        let thumbnail = {
            let staged = staging.stage(record.thumbnail_png()).map_err(|e| QrScanError::ThumbnailFailed {
                file: record.source_file().to_string(),
                detail: format!("staging: {e}"),
            })?;
            staged.load().map_err(|e| QrScanError::ThumbnailFailed {
                file: record.source_file().to_string(),
                detail: e.to_string(),
            })?
        };
        let image_id = self.add_image(&thumbnail)?;

        let top = self.cursor;
        self.draw_row(&row, top, Face::Regular, BODY_SIZE, BODY_BACKGROUND, BODY_TEXT, PAD_BOTTOM);

        let size = self.columns.thumbnail;
        let x = self.columns.left(3) + PAD_X;
        let y = top - row.height + (row.height - size) / 2.0;
        self.canvas.image(image_id, x, y, size);

        self.cursor -= row.height;
        Ok(())
    }

    fn add_image(&mut self, rgb: &RgbImage) -> Result<ObjectId, QrScanError> {
        let (width, height) = rgb.dimensions();
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(rgb.as_raw())
            .map_err(|e| self.failed(format!("compressing thumbnail: {e}")))?;
        let data = encoder
            .finish()
            .map_err(|e| self.failed(format!("compressing thumbnail: {e}")))?;

        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            data,
        );
        Ok(self.doc.add_object(stream))
    }

    fn finish_page(&mut self) -> Result<(), QrScanError> {
        let canvas = std::mem::replace(&mut self.canvas, PageCanvas::new());
        let content = Content {
            operations: canvas.ops,
        }
        .encode()
        .map_err(|e| self.failed(format!("encoding page content: {e}")))?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, content));

        let mut fonts = lopdf::Dictionary::new();
        for (face, id) in self.font_ids {
            fonts.set(face.resource_name(), id);
        }
        let mut xobjects = lopdf::Dictionary::new();
        for (name, id) in canvas.images {
            xobjects.set(name, id);
        }

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            "Resources" => dictionary! {
                "Font" => fonts,
                "XObject" => xobjects,
            },
            "Contents" => content_id,
        });
        self.page_ids.push(page_id);
        self.cursor = PAGE_HEIGHT - MARGIN;
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>, QrScanError> {
        self.finish_page()?;

        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        let info_id = self.doc.add_object(dictionary! {
            "Title" => Object::string_literal("QR Code Report"),
            "Producer" => Object::string_literal(concat!("edgequake-pdfqr ", env!("CARGO_PKG_VERSION"))),
        });
        self.doc.trailer.set("Info", info_id);

        let mut buf = Vec::new();
        self.doc
            .save_to(&mut buf)
            .map_err(|e| QrScanError::DocumentFailed {
                path: self.path.to_path_buf(),
                detail: e.to_string(),
            })?;
        debug!("PDF report: {} pages, {} bytes", self.page_ids.len(), buf.len());
        Ok(buf)
    }
}

/// Lay out `records` as a table and return the PDF bytes.
///
/// `path` is only used in error messages. Thumbnails pass through `staging`
/// one file at a time.
pub fn render_document(
    records: &[ReportRecord],
    thumbnail_size: f32,
    staging: &ThumbnailStaging,
    path: &Path,
) -> Result<Vec<u8>, QrScanError> {
    let mut table = TableWriter::new(path, thumbnail_size);
    table.draw_header();
    for record in records {
        table.add_row(record, staging)?;
    }
    table.finish()
}
