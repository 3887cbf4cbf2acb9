//! Error type shared by the library and its wasm entry points.

/// Everything that can go wrong at the edges of the value-study pipeline.
///
/// The pixel math itself is total; these variants only come from validating
/// caller input (parameters, buffer sizes) or from the image codec.
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    #[error("levels must be between 2 and 256, got {0}")]
    InvalidLevels(u32),

    #[error("contrast must be between -100 and 100, got {0}")]
    InvalidContrast(i32),

    #[error("buffer holds {actual} bytes but a {width}x{height} image needs {expected}")]
    BufferLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("alpha plane is {alpha_width}x{alpha_height} but the image is {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        alpha_width: u32,
        alpha_height: u32,
    },

    #[error("unable to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("PNG encode error: {0}")]
    Encode(#[source] image::ImageError),
}

pub type Result<T> = std::result::Result<T, StudyError>;

/// Check that `len` bytes make up exactly `width * height` pixels of
/// `channels` bytes each. Dimensions whose byte count overflows `usize`
/// never match.
pub(crate) fn check_len(len: usize, width: u32, height: u32, channels: usize) -> Result<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels))
        .unwrap_or(usize::MAX);
    if len != expected {
        return Err(StudyError::BufferLength {
            width,
            height,
            expected,
            actual: len,
        });
    }
    Ok(())
}
