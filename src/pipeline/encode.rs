//! Thumbnail encoding: crop a detected code out of its page and PNG-encode it.
//!
//! The crop is taken from the rendered page, not from the binarised image, so
//! the report shows the code as it appears in the PDF. PNG keeps module edges
//! crisp; JPEG ringing around black/white edges makes thumbnails look smudged.

use crate::output::CodeRect;
use image::{imageops, DynamicImage, RgbImage};
use std::io::Cursor;
use tracing::{debug, warn};

/// Crop `rect` out of `page` and encode the region as PNG.
///
/// The rectangle is clamped to the page; an empty intersection falls back to
/// a 1 × 1 crop at the nearest valid pixel.
pub fn encode_thumbnail(page: &RgbImage, rect: &CodeRect) -> Result<Vec<u8>, image::ImageError> {
    let (page_w, page_h) = page.dimensions();
    let left = rect.left.min(page_w.saturating_sub(1));
    let top = rect.top.min(page_h.saturating_sub(1));
    let width = rect.width.min(page_w - left).max(1);
    let height = rect.height.min(page_h - top).max(1);
    if (width, height) != (rect.width, rect.height) {
        warn!(
            "Code rectangle {:?} exceeds {}x{} page; cropping to {}x{}",
            rect, page_w, page_h, width, height
        );
    }

    let crop = imageops::crop_imm(page, left, top, width, height).to_image();

    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(crop).write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    debug!("Encoded {}x{} thumbnail → {} bytes PNG", width, height, buf.len());

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn page() -> RgbImage {
        RgbImage::from_fn(100, 80, |x, y| {
            if x >= 20 && x < 50 && y >= 10 && y < 40 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        })
    }

    #[test]
    fn crops_requested_region() {
        let rect = CodeRect {
            top: 10,
            left: 20,
            width: 30,
            height: 30,
        };
        let png = encode_thumbnail(&page(), &rect).expect("encode should succeed");
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (30, 30));
        assert!(decoded.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn clamps_rect_overhanging_the_page() {
        let rect = CodeRect {
            top: 70,
            left: 90,
            width: 40,
            height: 40,
        };
        let png = encode_thumbnail(&page(), &rect).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (10, 10));
    }

    #[test]
    fn rect_outside_page_still_encodes() {
        let rect = CodeRect {
            top: 500,
            left: 500,
            width: 0,
            height: 0,
        };
        let png = encode_thumbnail(&page(), &rect).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1, 1));
    }
}
