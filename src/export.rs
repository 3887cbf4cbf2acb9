//! Codec and legend helpers for the host: decoding uploads, encoding the
//! finished study as PNG, and describing the tones in use.

use image::{ImageFormat, RgbaImage};
use palette::Srgb;

use crate::error::{Result, StudyError};
use crate::lut::{build_lut_for, tones_in_use};
use crate::params::ProcessingParams;
use crate::session::StudyImage;

/// Decode any format the `image` crate understands into RGBA8.
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory(bytes).map_err(StudyError::Decode)?;
    Ok(img.to_rgba8())
}

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut cursor = std::io::Cursor::new(&mut buf);
        img.write_to(&mut cursor, ImageFormat::Png)
            .map_err(StudyError::Encode)?;
    }
    Ok(buf)
}

/// Decode, posterize and re-encode in one go. Returns PNG bytes.
pub fn posterize_bytes(input: &[u8], params: ProcessingParams) -> Result<Vec<u8>> {
    let study = StudyImage::decode(input)?;
    encode_png(&study.render(params))
}

/// Gray swatches for the tones the current settings actually produce.
pub fn tone_swatches(params: ProcessingParams) -> Vec<Srgb<u8>> {
    tones_in_use(&build_lut_for(params))
        .into_iter()
        .map(|v| Srgb::new(v, v, v))
        .collect()
}

pub fn swatch_hex(swatches: &[Srgb<u8>]) -> Vec<String> {
    swatches
        .iter()
        .map(|c| format!("{:02X}{:02X}{:02X}", c.red, c.green, c.blue))
        .collect()
}
