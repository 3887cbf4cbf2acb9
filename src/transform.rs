//! Applying a [`Lut`] to a cached luma plane.
//!
//! Two explicit variants: the main canvas wants opaque output, icon-style
//! overlays keep the alpha they were drawn with.

use image::{GrayImage, RgbaImage};

use crate::error::{Result, StudyError};
use crate::grayscale::{capture_alpha, luma};
use crate::lut::Lut;

/// Posterize a luma plane into an opaque RGBA image of the same size.
pub fn apply_opaque(gray: &GrayImage, lut: &Lut) -> RgbaImage {
    let (w, h) = gray.dimensions();
    let mut out = RgbaImage::new(w, h);
    let dst: &mut [u8] = &mut out;
    for (px, &g) in dst.chunks_exact_mut(4).zip(gray.as_raw()) {
        let v = lut[g as usize];
        px.copy_from_slice(&[v, v, v, 255]);
    }
    out
}

/// Posterize a luma plane, taking alpha from a plane captured earlier.
pub fn apply_preserving_alpha(gray: &GrayImage, alpha: &GrayImage, lut: &Lut) -> Result<RgbaImage> {
    let (w, h) = gray.dimensions();
    let (aw, ah) = alpha.dimensions();
    if (w, h) != (aw, ah) {
        return Err(StudyError::DimensionMismatch {
            width: w,
            height: h,
            alpha_width: aw,
            alpha_height: ah,
        });
    }

    let mut out = RgbaImage::new(w, h);
    let dst: &mut [u8] = &mut out;
    for ((px, &g), &a) in dst
        .chunks_exact_mut(4)
        .zip(gray.as_raw())
        .zip(alpha.as_raw())
    {
        let v = lut[g as usize];
        px.copy_from_slice(&[v, v, v, a]);
    }
    Ok(out)
}

/// Posterize an RGBA buffer in place, keeping each pixel's alpha.
///
/// Used for small overlays such as the favicon glyph, where transparent
/// regions must stay transparent after quantization.
pub fn posterize_in_place(rgba: &mut RgbaImage, lut: &Lut) {
    let alpha = capture_alpha(rgba);
    let buf: &mut [u8] = rgba;
    for (px, &a) in buf.chunks_exact_mut(4).zip(alpha.as_raw()) {
        let v = lut[luma(px[0], px[1], px[2]) as usize];
        px.copy_from_slice(&[v, v, v, a]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grayscale::extract_grayscale;
    use crate::lut::build_lut;
    use crate::params::{Contrast, Levels};
    use image::{Luma, Rgba};

    fn ramp() -> GrayImage {
        GrayImage::from_fn(16, 16, |x, y| Luma([(y * 16 + x) as u8]))
    }

    #[test]
    fn single_pixel_lookup() {
        let gray = GrayImage::from_pixel(1, 1, Luma([76]));
        let mut lut = [0u8; 256];
        lut[76] = 128;
        assert_eq!(apply_opaque(&gray, &lut).as_raw(), &vec![128, 128, 128, 255]);
    }

    #[test]
    fn opaque_output_keeps_dimensions() {
        let gray = GrayImage::new(7, 3);
        let out = apply_opaque(&gray, &build_lut(Levels::FIVE, Contrast::NEUTRAL));
        assert_eq!(out.dimensions(), (7, 3));
        assert_eq!(out.as_raw().len(), 7 * 3 * 4);
        assert!(out.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn repeated_application_is_stable() {
        let gray = ramp();
        let lut = build_lut(Levels::NINE, Contrast::new(35).unwrap());
        assert_eq!(apply_opaque(&gray, &lut), apply_opaque(&gray, &lut));
    }

    #[test]
    fn full_ramp_yields_exactly_levels_tones() {
        let gray = ramp();
        for levels in Levels::PRESETS {
            let out = apply_opaque(&gray, &build_lut(levels, Contrast::NEUTRAL));
            let mut tones: Vec<u8> = out.pixels().map(|p| p.0[0]).collect();
            tones.sort_unstable();
            tones.dedup();
            assert_eq!(tones.len(), levels.get() as usize);
        }
    }

    #[test]
    fn alpha_preserving_variant_keeps_transparency() {
        let gray = GrayImage::from_pixel(2, 1, Luma([200]));
        let alpha = GrayImage::from_fn(2, 1, |x, _| Luma([if x == 0 { 0 } else { 180 }]));
        let out = apply_preserving_alpha(&gray, &alpha, &build_lut(Levels::THREE, Contrast::NEUTRAL)).unwrap();
        assert_eq!(out.get_pixel(0, 0), &Rgba([255, 255, 255, 0]));
        assert_eq!(out.get_pixel(1, 0), &Rgba([255, 255, 255, 180]));
    }

    #[test]
    fn alpha_plane_must_match() {
        let gray = GrayImage::new(2, 2);
        let alpha = GrayImage::new(2, 1);
        let lut = build_lut(Levels::THREE, Contrast::NEUTRAL);
        assert!(matches!(
            apply_preserving_alpha(&gray, &alpha, &lut),
            Err(StudyError::DimensionMismatch { alpha_height: 1, .. })
        ));
    }

    #[test]
    fn in_place_matches_two_step_path() {
        let icon = RgbaImage::from_fn(8, 8, |x, y| {
            Rgba([(x * 32) as u8, (y * 32) as u8, 90, if (x + y) % 3 == 0 { 0 } else { 255 }])
        });
        let lut = build_lut(Levels::FIVE, Contrast::new(-20).unwrap());

        let expected = apply_preserving_alpha(&extract_grayscale(&icon), &capture_alpha(&icon), &lut).unwrap();

        let mut in_place = icon.clone();
        posterize_in_place(&mut in_place, &lut);
        assert_eq!(in_place, expected);
    }
}
