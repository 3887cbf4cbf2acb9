//! State the interactive front end keeps between slider events: the cached
//! luma plane of the current image and a single pending render request.

use image::{GrayImage, RgbaImage};

use crate::error::Result;
use crate::export::decode_rgba;
use crate::grayscale::extract_grayscale;
use crate::lut::build_lut_for;
use crate::params::ProcessingParams;
use crate::transform::apply_opaque;

/// A loaded image reduced to what the study needs: its luma plane.
///
/// Replaced wholesale when a new image is loaded, never patched.
#[derive(Clone, Debug)]
pub struct StudyImage {
    gray: GrayImage,
}

impl StudyImage {
    pub fn from_rgba(rgba: &RgbaImage) -> Self {
        Self {
            gray: extract_grayscale(rgba),
        }
    }

    pub fn from_gray(gray: GrayImage) -> Self {
        Self { gray }
    }

    /// Decode an encoded image file (PNG, JPEG, ...) and cache its luma.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let rgba = decode_rgba(bytes)?;
        Ok(Self::from_rgba(&rgba))
    }

    pub fn gray(&self) -> &GrayImage {
        &self.gray
    }

    pub fn width(&self) -> u32 {
        self.gray.width()
    }

    pub fn height(&self) -> u32 {
        self.gray.height()
    }

    /// Rebuild the LUT for `params` and apply it to the cached plane.
    pub fn render(&self, params: ProcessingParams) -> RgbaImage {
        let lut = build_lut_for(params);
        tracing::trace!(
            levels = params.levels.get(),
            contrast = params.contrast.get(),
            width = self.width(),
            height = self.height(),
            "Rendering value study"
        );
        apply_opaque(&self.gray, &lut)
    }
}

/// Depth-one queue of render requests: the latest request wins and any
/// request still waiting is dropped.
#[derive(Debug, Default)]
pub struct RenderQueue {
    pending: Option<ProcessingParams>,
    superseded: u64,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `params`, replacing whatever was waiting. Returns `true` if an
    /// older request was dropped.
    pub fn request(&mut self, params: ProcessingParams) -> bool {
        let dropped = self.pending.replace(params).is_some();
        if dropped {
            self.superseded += 1;
            tracing::debug!(total = self.superseded, "Superseded pending render");
        }
        dropped
    }

    pub fn take(&mut self) -> Option<ProcessingParams> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// How many requests were dropped unrendered since creation.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}

/// One interactive session: the current image plus the render queue.
///
/// The host calls [`Session::request`] on every slider event and
/// [`Session::render_pending`] once per display frame.
#[derive(Debug, Default)]
pub struct Session {
    image: Option<StudyImage>,
    queue: RenderQueue,
    last: Option<ProcessingParams>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new image. A request still waiting carries over to the new
    /// image; with nothing pending, the last rendered parameters are requeued
    /// so the new image shows up with the current slider settings.
    pub fn load(&mut self, image: StudyImage) {
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "Loaded image into session"
        );
        self.image = Some(image);
        if let Some(params) = self.queue.take().or(self.last) {
            self.queue.request(params);
        }
    }

    pub fn image(&self) -> Option<&StudyImage> {
        self.image.as_ref()
    }

    pub fn request(&mut self, params: ProcessingParams) -> bool {
        self.queue.request(params)
    }

    pub fn queue(&self) -> &RenderQueue {
        &self.queue
    }

    /// Render the most recent request, if any. Without a loaded image the
    /// request stays queued.
    pub fn render_pending(&mut self) -> Option<RgbaImage> {
        let image = self.image.as_ref()?;
        let params = self.queue.take()?;
        self.last = Some(params);
        Some(image.render(params))
    }

    /// Render immediately, bypassing the queue.
    pub fn render_now(&mut self, params: ProcessingParams) -> Option<RgbaImage> {
        let image = self.image.as_ref()?;
        self.queue.clear();
        self.last = Some(params);
        Some(image.render(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lut::build_lut;
    use crate::params::{Contrast, Levels};
    use image::{Luma, Rgba};

    fn params(levels: u32, contrast: i32) -> ProcessingParams {
        ProcessingParams::new(levels, contrast).unwrap()
    }

    fn gradient() -> StudyImage {
        StudyImage::from_gray(GrayImage::from_fn(256, 1, |x, _| Luma([x as u8])))
    }

    #[test]
    fn queue_keeps_only_latest() {
        let mut q = RenderQueue::new();
        assert!(!q.request(params(3, 0)));
        assert!(q.request(params(5, 10)));
        assert!(q.request(params(9, 20)));
        assert_eq!(q.superseded(), 2);
        assert_eq!(q.take(), Some(params(9, 20)));
        assert_eq!(q.take(), None);
        assert!(!q.is_pending());
    }

    #[test]
    fn render_uses_cached_plane() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let image = StudyImage::from_rgba(&rgba);
        assert_eq!(image.gray().as_raw(), &vec![76; 4]);

        let out = image.render(params(3, 0));
        assert_eq!(out.dimensions(), (2, 2));
        assert!(out.pixels().all(|p| *p == Rgba([128, 128, 128, 255])));
    }

    #[test]
    fn session_renders_once_per_burst() {
        let mut session = Session::new();
        session.load(gradient());
        for c in -10..=10 {
            session.request(params(5, c));
        }
        let frame = session.render_pending().unwrap();
        let lut = build_lut(Levels::FIVE, Contrast::new(10).unwrap());
        assert_eq!(frame.get_pixel(200, 0).0[0], lut[200]);
        assert!(session.render_pending().is_none());
        assert_eq!(session.queue().superseded(), 20);
    }

    #[test]
    fn request_waits_for_an_image() {
        let mut session = Session::new();
        session.request(params(3, 0));
        assert!(session.render_pending().is_none());
        assert!(session.queue().is_pending());
        session.load(gradient());
        let frame = session.render_pending().unwrap();
        let lut = build_lut(Levels::THREE, Contrast::NEUTRAL);
        assert_eq!(frame.get_pixel(100, 0).0[0], lut[100]);
        assert!(session.render_pending().is_none());
    }

    #[test]
    fn reload_keeps_newer_pending_request() {
        let mut session = Session::new();
        session.load(gradient());
        session.render_now(params(9, 40)).unwrap();
        session.request(params(3, 0));

        session.load(StudyImage::from_gray(GrayImage::from_pixel(1, 1, Luma([100]))));
        let frame = session.render_pending().unwrap();
        assert_eq!(frame.get_pixel(0, 0).0[0], 128);
        assert!(session.render_pending().is_none());
    }

    #[test]
    fn reload_rerenders_with_last_settings() {
        let mut session = Session::new();
        session.load(gradient());
        session.render_now(params(9, 40)).unwrap();

        session.load(StudyImage::from_gray(GrayImage::from_pixel(3, 3, Luma([128]))));
        let frame = session.render_pending().unwrap();
        assert_eq!(frame.dimensions(), (3, 3));
        let lut = build_lut(Levels::NINE, Contrast::new(40).unwrap());
        assert_eq!(frame.get_pixel(1, 1).0[0], lut[128]);
    }
}
