//! Convenience helpers for loading and saving images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{OwnedImage, RgbImage};
use crate::util::{ImageWithinError, ImageWithinResult};
use std::path::Path;

fn io_error(err: image::ImageError) -> ImageWithinError {
    ImageWithinError::ImageIo {
        reason: err.to_string(),
    }
}

/// Creates an owned RGB image from a dynamic image, dropping any alpha channel.
pub fn rgb_from_dynamic_image(img: &image::DynamicImage) -> ImageWithinResult<RgbImage> {
    let rgb = img.to_rgb8();
    let width = rgb.width() as usize;
    let height = rgb.height() as usize;
    RgbImage::new(rgb.into_raw(), width, height)
}

/// Loads an image from disk and converts it to an owned RGB image.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> ImageWithinResult<RgbImage> {
    let img = image::open(path).map_err(io_error)?;
    rgb_from_dynamic_image(&img)
}

/// Loads an image from disk and converts it to grayscale with BT.601 weights.
///
/// The conversion goes through [`RgbImage::to_gray`] so that base and
/// template are reduced to grayscale the same way.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> ImageWithinResult<OwnedImage> {
    let img = image::open(path).map_err(io_error)?;
    if let image::DynamicImage::ImageLuma8(gray) = img {
        let width = gray.width() as usize;
        let height = gray.height() as usize;
        return OwnedImage::new(gray.into_raw(), width, height);
    }
    Ok(rgb_from_dynamic_image(&img)?.to_gray())
}

/// Writes an RGB image; the format is chosen from the file extension.
pub fn save_rgb_image<P: AsRef<Path>>(img: &RgbImage, path: P) -> ImageWithinResult<()> {
    let buffer = image::RgbImage::from_raw(
        img.width() as u32,
        img.height() as u32,
        img.data().to_vec(),
    )
    .ok_or(ImageWithinError::InvalidDimensions {
        width: img.width(),
        height: img.height(),
    })?;
    buffer.save(path).map_err(io_error)
}

/// Writes a grayscale image; the format is chosen from the file extension.
pub fn save_gray_image<P: AsRef<Path>>(img: &OwnedImage, path: P) -> ImageWithinResult<()> {
    let width = img.width();
    let height = img.height();
    let buffer = image::GrayImage::from_raw(width as u32, height as u32, img.data().to_vec())
        .ok_or(ImageWithinError::InvalidDimensions { width, height })?;
    buffer.save(path).map_err(io_error)
}
