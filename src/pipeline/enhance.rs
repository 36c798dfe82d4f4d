//! Image enhancement ahead of QR decoding.
//!
//! Rendered PDF pages often carry QR codes at low contrast or with
//! anti-aliased module edges. A fixed three-step pipeline turns the page into
//! a clean black-and-white image:
//!
//! ```text
//! RGB ──▶ luma ──▶ sharpen (3×3, centre 9 / ring −1) ──▶ adaptive Gaussian threshold
//! ```
//!
//! The threshold is local: each pixel is compared with the Gaussian-weighted
//! mean of its 11 × 11 neighbourhood minus a small offset, so uneven page
//! backgrounds do not swallow the code.
//!
//! The same locality hollows out any dark area wider than the block: the
//! interior of a large module ends up brighter than its own local mean and
//! turns white. Modules must stay well under the block size after rendering.
//! At about 10 px per module and above, codes stop decoding, so raising the
//! zoom does not help with large codes.

use image::{imageops, GrayImage, Luma, RgbImage};
use imageproc::filter::{filter3x3, separable_filter_equal};

/// Sharpening kernel, row-major.
pub const SHARPEN_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0];

/// Neighbourhood edge length used for the local threshold.
pub const THRESHOLD_BLOCK_SIZE: usize = 11;

/// Subtracted from the local mean before comparing.
pub const THRESHOLD_OFFSET: f32 = 2.0;

/// Run the full enhancement pipeline on a rendered page.
pub fn enhance(page: &RgbImage) -> GrayImage {
    let gray = imageops::grayscale(page);
    let sharpened = sharpen(&gray);
    adaptive_gaussian_threshold(&sharpened, THRESHOLD_BLOCK_SIZE, THRESHOLD_OFFSET)
}

/// Apply [`SHARPEN_KERNEL`], saturating to the `u8` range.
///
/// Out-of-image taps read the nearest edge pixel, so a uniform page stays
/// uniform right up to its border.
pub fn sharpen(gray: &GrayImage) -> GrayImage {
    filter3x3::<_, f32, u8>(gray, &SHARPEN_KERNEL)
}

/// Normalised 1-D Gaussian kernel of odd length `size`.
///
/// σ follows the usual block-size rule `0.3 · ((size − 1) / 2 − 1) + 0.8`,
/// which gives σ = 2 for an 11-pixel block.
pub fn gaussian_kernel(size: usize) -> Vec<f32> {
    let size = size.max(1) | 1;
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let half = (size / 2) as f32;
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - half;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Binarise `gray`: a pixel becomes white when it is brighter than the
/// Gaussian-weighted mean of its `block_size` neighbourhood minus `offset`,
/// black otherwise. Borders replicate the edge pixels.
pub fn adaptive_gaussian_threshold(gray: &GrayImage, block_size: usize, offset: f32) -> GrayImage {
    let kernel = gaussian_kernel(block_size);
    let mean = separable_filter_equal(gray, &kernel);

    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let value = gray.get_pixel(x, y)[0] as f32;
        let local = mean.get_pixel(x, y)[0] as f32;
        if value > local - offset {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}
