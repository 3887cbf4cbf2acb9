use crate::error::{Result, StudyError};

/// Number of tonal levels the study is posterized to.
///
/// The UI only offers [`Levels::PRESETS`], but any count in `2..=256` yields
/// a valid, strictly increasing tone ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Levels(u32);

impl Levels {
    pub const THREE: Levels = Levels(3);
    pub const FIVE: Levels = Levels(5);
    pub const NINE: Levels = Levels(9);
    pub const PRESETS: [Levels; 3] = [Levels::THREE, Levels::FIVE, Levels::NINE];

    pub fn new(levels: u32) -> Result<Self> {
        if (2..=256).contains(&levels) {
            Ok(Levels(levels))
        } else {
            Err(StudyError::InvalidLevels(levels))
        }
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Distance between adjacent tones on the 0..=255 scale.
    #[inline]
    pub fn step(self) -> f64 {
        255.0 / (self.0 - 1) as f64
    }
}

/// Contrast slider position, `-100..=100`. Zero leaves tones untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Contrast(i32);

impl Contrast {
    pub const NEUTRAL: Contrast = Contrast(0);
    pub const MIN: i32 = -100;
    pub const MAX: i32 = 100;

    pub fn new(contrast: i32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&contrast) {
            Ok(Contrast(contrast))
        } else {
            Err(StudyError::InvalidContrast(contrast))
        }
    }

    #[inline]
    pub fn get(self) -> i32 {
        self.0
    }

    #[inline]
    pub fn is_neutral(self) -> bool {
        self.0 == 0
    }
}

/// Snapshot of the two sliders, consumed by one LUT build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProcessingParams {
    pub levels: Levels,
    pub contrast: Contrast,
}

impl ProcessingParams {
    pub fn new(levels: u32, contrast: i32) -> Result<Self> {
        Ok(Self {
            levels: Levels::new(levels)?,
            contrast: Contrast::new(contrast)?,
        })
    }
}

impl Default for ProcessingParams {
    fn default() -> Self {
        Self {
            levels: Levels::FIVE,
            contrast: Contrast::NEUTRAL,
        }
    }
}
