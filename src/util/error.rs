//! Error types for imagewithin.

use thiserror::Error;

/// Result alias for imagewithin operations.
pub type ImageWithinResult<T> = std::result::Result<T, ImageWithinError>;

/// Errors that can occur while preparing or running a search.
///
/// Expected search outcomes (no match, index out of range, missing inputs)
/// are reported through [`crate::SearchResult`], not through this type.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ImageWithinError {
    /// Width or height is zero, or the pixel count overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the declared geometry requires.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A region of interest does not fit inside the image.
    #[error(
        "roi ({x}, {y}, {width}x{height}) out of bounds for {img_width}x{img_height} image"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Interleaved buffer length does not match `width * height * channels`.
    #[error("expected {expected} channels, buffer holds {got} samples per pixel")]
    InvalidChannels { expected: usize, got: usize },
    /// Acceptance threshold outside `(0, 1]` or not a number.
    #[error("threshold must lie in (0, 1], got {0}")]
    InvalidThreshold(String),
    /// Scale factor is not finite or not strictly positive.
    #[error("scale factor must be finite and > 0, got {0}")]
    InvalidScale(f32),
    /// The scale priority list is empty.
    #[error("scale plan must contain at least one factor")]
    EmptyScalePlan,
    /// The template does not fit inside the base image at the scale under test.
    #[error(
        "template {tpl_width}x{tpl_height} does not fit inside {img_width}x{img_height} image"
    )]
    ScaleIncompatible {
        tpl_width: usize,
        tpl_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Request identifier cannot be used as a directory name.
    #[error("invalid request id {0:?}")]
    InvalidRequestId(String),
    /// Creating or writing the per-request working directory failed.
    #[error("workspace error: {reason}")]
    Workspace { reason: String },
    /// Image decoding or encoding failed.
    #[error("image i/o failed: {reason}")]
    ImageIo { reason: String },
}
