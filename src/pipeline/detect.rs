//! QR code detection: enhanced page image → decoded codes with bounding boxes.
//!
//! Detection runs on the binarised output of [`super::enhance`]. rqrr locates
//! every QR grid from its finder patterns and decodes each one. A grid that is
//! found but cannot be decoded is logged and dropped. A damaged code is a
//! detection miss, not a failure of the run.

use super::enhance::enhance;
use crate::output::{CodeRect, DetectedCode};
use image::RgbImage;
use tracing::debug;

/// Finds and decodes barcodes on one rendered page.
///
/// Implementations return an empty vector for pages without a decodable code.
pub trait CodeDetector {
    fn detect(&self, page: &RgbImage) -> Vec<DetectedCode>;
}

/// Production detector: sharpen + adaptive threshold, then rqrr.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrDetector;

impl QrDetector {
    pub fn new() -> Self {
        Self
    }
}

impl CodeDetector for QrDetector {
    fn detect(&self, page: &RgbImage) -> Vec<DetectedCode> {
        let binary = enhance(page);
        let (width, height) = binary.dimensions();

        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
                binary.get_pixel(x as u32, y as u32)[0]
            });
        let grids = prepared.detect_grids();
        debug!("Located {} QR grid(s) on {}x{} page", grids.len(), width, height);

        grids
            .into_iter()
            .filter_map(|grid| {
                let corners: Vec<(i32, i32)> = grid.bounds.iter().map(|p| (p.x, p.y)).collect();
                match grid.decode() {
                    Ok((_meta, payload)) => Some(DetectedCode {
                        rect: CodeRect::from_corners(&corners, width, height),
                        payload,
                    }),
                    Err(e) => {
                        debug!("QR grid at {:?} could not be decoded: {:?}", corners, e);
                        None
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use qrcode::{Color, QrCode};

    /// Draw `payload` as a QR code with `module` px per module at `(x0, y0)`
    /// on a white `w × h` page.
    fn page_with_qr(payload: &str, module: u32, x0: u32, y0: u32, w: u32, h: u32) -> RgbImage {
        let code = QrCode::new(payload.as_bytes()).expect("payload fits in a QR code");
        let size = code.width() as u32;
        let colors = code.to_colors();
        let mut page = RgbImage::from_pixel(w, h, Rgb([255, 255, 255]));
        for (i, color) in colors.iter().enumerate() {
            if *color != Color::Dark {
                continue;
            }
            let mx = i as u32 % size;
            let my = i as u32 / size;
            for dy in 0..module {
                for dx in 0..module {
                    page.put_pixel(x0 + mx * module + dx, y0 + my * module + dy, Rgb([0, 0, 0]));
                }
            }
        }
        page
    }

    #[test]
    fn decodes_single_code_with_tight_rect() {
        let page = page_with_qr("warehouse/zoneA/item42", 3, 60, 40, 300, 260);
        let codes = QrDetector::new().detect(&page);

        assert_eq!(codes.len(), 1, "codes: {codes:?}");
        assert_eq!(codes[0].payload, "warehouse/zoneA/item42");

        let rect = codes[0].rect;
        // The bounding box sits around the drawn symbol, give or take a module.
        assert!(rect.left >= 55 && rect.left <= 65, "rect: {rect:?}");
        assert!(rect.top >= 35 && rect.top <= 45, "rect: {rect:?}");
        assert!(rect.width >= 60 && rect.height >= 60, "rect: {rect:?}");
        assert!(rect.left + rect.width <= 300 && rect.top + rect.height <= 260);
    }

    #[test]
    fn decodes_two_codes_on_one_page() {
        let mut page = page_with_qr("bay/1/left", 3, 30, 30, 400, 200);
        let right = page_with_qr("bay/2/right", 3, 230, 30, 400, 200);
        for (x, y, p) in right.enumerate_pixels() {
            if p[0] == 0 {
                page.put_pixel(x, y, *p);
            }
        }

        let mut payloads: Vec<String> = QrDetector::new()
            .detect(&page)
            .into_iter()
            .map(|c| c.payload)
            .collect();
        payloads.sort();
        assert_eq!(payloads, vec!["bay/1/left", "bay/2/right"]);
    }

    #[test]
    fn blank_page_yields_nothing() {
        let page = RgbImage::from_pixel(200, 200, Rgb([255, 255, 255]));
        assert!(QrDetector::new().detect(&page).is_empty());
    }

    #[test]
    fn noise_page_yields_nothing() {
        let page = RgbImage::from_fn(160, 120, |x, y| {
            if (x / 7 + y / 5) % 3 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        assert!(QrDetector::new().detect(&page).is_empty());
    }
}
