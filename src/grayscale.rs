//! Desaturation of decoded RGBA pixels into a single luma plane.
//!
//! Runs once per loaded image; the resulting [`GrayImage`] is cached by the
//! caller and fed to every subsequent LUT application.

use image::{GrayImage, RgbaImage};

use crate::error::{Result, check_len};

/// ITU-R BT.601 luma weights.
pub const LUMA_R: f64 = 0.299;
pub const LUMA_G: f64 = 0.587;
pub const LUMA_B: f64 = 0.114;

/// Gamma-encoded BT.601 luma of one pixel, rounded to the nearest integer.
#[inline(always)]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64;
    y.round().clamp(0.0, 255.0) as u8
}

/// Convert an RGBA image to its luma plane. Alpha is ignored.
pub fn extract_grayscale(rgba: &RgbaImage) -> GrayImage {
    let (w, h) = rgba.dimensions();
    let mut gray = GrayImage::new(w, h);
    let out: &mut [u8] = &mut gray;
    for (dst, px) in out.iter_mut().zip(rgba.as_raw().chunks_exact(4)) {
        *dst = luma(px[0], px[1], px[2]);
    }
    tracing::debug!(width = w, height = h, "Extracted grayscale plane");
    gray
}

/// Same as [`extract_grayscale`] for a bare `R,G,B,A` byte slice, as handed
/// over from a canvas `ImageData`.
pub fn extract_grayscale_raw(data: &[u8], width: u32, height: u32) -> Result<GrayImage> {
    check_len(data.len(), width, height, 4)?;
    let mut gray = GrayImage::new(width, height);
    let out: &mut [u8] = &mut gray;
    for (dst, px) in out.iter_mut().zip(data.chunks_exact(4)) {
        *dst = luma(px[0], px[1], px[2]);
    }
    Ok(gray)
}

/// Copy the alpha channel out into its own plane. Must happen before the
/// same buffer is overwritten by a posterization pass.
pub fn capture_alpha(rgba: &RgbaImage) -> GrayImage {
    let (w, h) = rgba.dimensions();
    let mut alpha = GrayImage::new(w, h);
    let out: &mut [u8] = &mut alpha;
    for (dst, px) in out.iter_mut().zip(rgba.as_raw().chunks_exact(4)) {
        *dst = px[3];
    }
    alpha
}
