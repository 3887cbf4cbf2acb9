//! Posterized grayscale "value studies" for the browser and the command line.
//!
//! An image is desaturated once into a cached luma plane. Every slider change
//! then only rebuilds a 256-entry lookup table and runs one table lookup per
//! pixel, which keeps re-rendering cheap during a continuous drag.

use js_sys::Array;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod export;
pub mod grayscale;
pub mod lut;
pub mod params;
pub mod session;
pub mod transform;

pub use error::StudyError;
pub use export::{decode_rgba, encode_png, posterize_bytes, swatch_hex, tone_swatches};
pub use grayscale::{capture_alpha, extract_grayscale, extract_grayscale_raw, luma};
pub use lut::{Lut, build_lut, build_lut_for, tone_ladder, tones_in_use};
pub use params::{Contrast, Levels, ProcessingParams};
pub use session::{RenderQueue, Session, StudyImage};
pub use transform::{apply_opaque, apply_preserving_alpha, posterize_in_place};

use image::{GrayImage, RgbaImage};

fn js_err(e: StudyError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn plane(data: Vec<u8>, width: u32, height: u32) -> Result<GrayImage, JsValue> {
    error::check_len(data.len(), width, height, 1).map_err(js_err)?;
    GrayImage::from_raw(width, height, data).ok_or_else(|| JsValue::from_str("Failed to rebuild gray plane"))
}

fn lut_from_slice(lut: &[u8]) -> Result<Lut, JsValue> {
    lut.try_into()
        .map_err(|_| JsValue::from_str(&format!("LUT must have 256 entries, got {}", lut.len())))
}

// ------------------------------------------------------------
// Stateless pipeline steps
// ------------------------------------------------------------

/// Luma plane (one byte per pixel) of canvas `ImageData` bytes.
#[wasm_bindgen(js_name = extractGrayscale)]
pub fn extract_grayscale_js(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    let gray = extract_grayscale_raw(data, width, height).map_err(js_err)?;
    Ok(gray.into_raw())
}

#[wasm_bindgen(js_name = buildLut)]
pub fn build_lut_js(levels: u32, contrast: i32) -> Result<Vec<u8>, JsValue> {
    let params = ProcessingParams::new(levels, contrast).map_err(js_err)?;
    Ok(build_lut_for(params).to_vec())
}

/// Opaque RGBA output, ready for `putImageData`.
#[wasm_bindgen(js_name = applyLut)]
pub fn apply_lut_js(gray: Vec<u8>, lut: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    let gray = plane(gray, width, height)?;
    let lut = lut_from_slice(lut)?;
    Ok(apply_opaque(&gray, &lut).into_raw())
}

#[wasm_bindgen(js_name = applyLutPreservingAlpha)]
pub fn apply_lut_preserving_alpha_js(
    gray: Vec<u8>,
    alpha: Vec<u8>,
    lut: &[u8],
    width: u32,
    height: u32,
) -> Result<Vec<u8>, JsValue> {
    let gray = plane(gray, width, height)?;
    let alpha = plane(alpha, width, height)?;
    let lut = lut_from_slice(lut)?;
    let out = apply_preserving_alpha(&gray, &alpha, &lut).map_err(js_err)?;
    Ok(out.into_raw())
}

/// Posterize a small RGBA glyph (favicon and the like), keeping transparency.
#[wasm_bindgen(js_name = posterizeIcon)]
pub fn posterize_icon_js(
    rgba: Vec<u8>,
    width: u32,
    height: u32,
    levels: u32,
    contrast: i32,
) -> Result<Vec<u8>, JsValue> {
    let params = ProcessingParams::new(levels, contrast).map_err(js_err)?;
    error::check_len(rgba.len(), width, height, 4).map_err(js_err)?;
    let mut icon = RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| JsValue::from_str("Failed to rebuild icon buffer"))?;
    posterize_in_place(&mut icon, &build_lut_for(params));
    Ok(icon.into_raw())
}

// ------------------------------------------------------------
// Interactive session
// ------------------------------------------------------------

/// One loaded image plus its pending render request.
#[wasm_bindgen]
pub struct ValueStudy {
    session: Session,
}

#[wasm_bindgen]
impl ValueStudy {
    /// Decode an uploaded file and cache its grayscale plane.
    #[wasm_bindgen(constructor)]
    pub fn new(input: &[u8]) -> Result<ValueStudy, JsValue> {
        let image = StudyImage::decode(input).map_err(js_err)?;
        let mut session = Session::new();
        session.load(image);
        Ok(ValueStudy { session })
    }

    /// Replace the current image, keeping the last slider settings.
    pub fn load(&mut self, input: &[u8]) -> Result<(), JsValue> {
        let image = StudyImage::decode(input).map_err(js_err)?;
        self.session.load(image);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.session.image().map_or(0, StudyImage::width)
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.session.image().map_or(0, StudyImage::height)
    }

    /// Queue a render; a request still waiting is superseded.
    pub fn request(&mut self, levels: u32, contrast: i32) -> Result<(), JsValue> {
        let params = ProcessingParams::new(levels, contrast).map_err(js_err)?;
        self.session.request(params);
        Ok(())
    }

    /// Call once per animation frame. Returns RGBA bytes when a request was
    /// waiting, `undefined` otherwise.
    #[wasm_bindgen(js_name = renderPending)]
    pub fn render_pending(&mut self) -> Option<Vec<u8>> {
        self.session.render_pending().map(RgbaImage::into_raw)
    }

    pub fn render(&mut self, levels: u32, contrast: i32) -> Result<Vec<u8>, JsValue> {
        let params = ProcessingParams::new(levels, contrast).map_err(js_err)?;
        self.session
            .render_now(params)
            .map(RgbaImage::into_raw)
            .ok_or_else(|| JsValue::from_str("No image loaded"))
    }

    /// PNG bytes of the study at the given settings, for download.
    #[wasm_bindgen(js_name = exportPng)]
    pub fn export_png(&self, levels: u32, contrast: i32) -> Result<Vec<u8>, JsValue> {
        let params = ProcessingParams::new(levels, contrast).map_err(js_err)?;
        let image = self
            .session
            .image()
            .ok_or_else(|| JsValue::from_str("No image loaded"))?;
        encode_png(&image.render(params)).map_err(js_err)
    }

    /// Hex strings (`RRGGBB`) of the tones the settings produce.
    pub fn tones(&self, levels: u32, contrast: i32) -> Result<Array, JsValue> {
        let params = ProcessingParams::new(levels, contrast).map_err(js_err)?;
        let out = Array::new();
        for hex in swatch_hex(&tone_swatches(params)) {
            out.push(&JsValue::from_str(&hex));
        }
        Ok(out)
    }
}
