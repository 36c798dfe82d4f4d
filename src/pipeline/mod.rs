//! Pipeline stages for scanning PDFs for QR codes.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own and the rendering or decoding backend can be swapped
//! behind its trait without touching the scan driver.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ enhance ──▶ detect ──▶ encode + tag
//! (folder)  (pdfium)   (binarise)  (rqrr)    (thumbnail PNG, tag)
//! ```
//!
//! 1. [`input`]: list the folder's `.pdf` files in a stable order and check
//!    their magic bytes
//! 2. [`render`]: rasterise pages lazily at the configured zoom
//! 3. [`enhance`]: grayscale, sharpen, adaptive Gaussian threshold
//! 4. [`detect`]: locate and decode every QR code on the binarised page
//! 5. [`encode`]: crop each code from the rendered page into a PNG
//! 6. [`tag`]: derive the tag from a decoded payload

pub mod detect;
pub mod encode;
pub mod enhance;
pub mod input;
pub mod render;
pub mod tag;
