//! 256-entry lookup table mapping an input gray value to its final
//! posterized tone.
//!
//! The table is rebuilt from scratch on every parameter change. That costs
//! 256 iterations no matter how large the image is, and turns the per-pixel
//! work into a single indexed load.

use crate::params::{Contrast, Levels, ProcessingParams};

pub const LUT_SIZE: usize = 256;

/// Posterization table, indexed by gray value.
pub type Lut = [u8; LUT_SIZE];

/// Mid-gray pivot of the contrast curve.
const PIVOT: f64 = 128.0;

/// Slope of the contrast curve around [`PIVOT`].
///
/// `259 (c + 255) / (255 (259 - c))`; the denominator stays at 159 or more
/// over the whole slider range.
#[inline]
pub fn contrast_factor(contrast: Contrast) -> f64 {
    let c = contrast.get() as f64;
    259.0 * (c + 255.0) / (255.0 * (259.0 - c))
}

/// Push `value` away from (or toward) mid-gray. Neutral contrast returns the
/// input bit-for-bit. The result is not clamped.
#[inline]
pub fn apply_contrast(value: f64, contrast: Contrast) -> f64 {
    if contrast.is_neutral() {
        return value;
    }
    contrast_factor(contrast) * (value - PIVOT) + PIVOT
}

/// Snap a continuous intensity to the nearest of `levels` evenly spaced
/// tones. Level 0 is always 0 and the top level is always 255.
#[inline]
pub fn quantize(value: f64, levels: Levels) -> u8 {
    let step = levels.step();
    let value = value.clamp(0.0, 255.0);
    ((value / step).round() * step).round().clamp(0.0, 255.0) as u8
}

/// Build the table for one `(levels, contrast)` snapshot.
pub fn build_lut(levels: Levels, contrast: Contrast) -> Lut {
    let mut lut = [0u8; LUT_SIZE];
    for (i, entry) in lut.iter_mut().enumerate() {
        let adjusted = apply_contrast(i as f64, contrast).clamp(0.0, 255.0);
        *entry = quantize(adjusted, levels);
    }
    tracing::trace!(
        levels = levels.get(),
        contrast = contrast.get(),
        "Built posterization LUT"
    );
    lut
}

#[inline]
pub fn build_lut_for(params: ProcessingParams) -> Lut {
    build_lut(params.levels, params.contrast)
}

/// Every tone `levels` can produce, darkest first.
pub fn tone_ladder(levels: Levels) -> Vec<u8> {
    let step = levels.step();
    (0..levels.get())
        .map(|k| (k as f64 * step).round().clamp(0.0, 255.0) as u8)
        .collect()
}

/// Distinct tones a table actually emits, darkest first. Strong negative
/// contrast can collapse several levels into one.
pub fn tones_in_use(lut: &Lut) -> Vec<u8> {
    let mut seen = [false; LUT_SIZE];
    for &v in lut {
        seen[v as usize] = true;
    }
    seen.iter()
        .enumerate()
        .filter(|&(_, &hit)| hit)
        .map(|(tone, _)| tone as u8)
        .collect()
}
