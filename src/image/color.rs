//! Owned interleaved RGB image used for loading and annotating the base image.

use crate::image::OwnedImage;
use crate::util::math::luma_bt601;
use crate::util::{ImageWithinError, ImageWithinResult};

/// A single RGB sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Outline colour used to highlight a resolved match.
    pub const GREEN: Rgb = Rgb([0, 255, 0]);
}

/// Owned contiguous RGB image with interleaved channels.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl RgbImage {
    /// Wraps a row-major interleaved buffer of exactly `width * height * 3` samples.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> ImageWithinResult<Self> {
        if width == 0 || height == 0 {
            return Err(ImageWithinError::InvalidDimensions { width, height });
        }
        let pixels = width
            .checked_mul(height)
            .ok_or(ImageWithinError::InvalidDimensions { width, height })?;
        let needed = pixels
            .checked_mul(3)
            .ok_or(ImageWithinError::InvalidDimensions { width, height })?;
        if data.len() == needed {
            return Ok(Self {
                data,
                width,
                height,
            });
        }
        if data.len() % pixels == 0 {
            return Err(ImageWithinError::InvalidChannels {
                expected: 3,
                got: data.len() / pixels,
            });
        }
        Err(ImageWithinError::BufferTooSmall {
            needed,
            got: data.len(),
        })
    }

    /// Expands a grayscale image into three identical channels.
    pub fn from_gray(gray: &OwnedImage) -> Self {
        let mut data = Vec::with_capacity(gray.data().len() * 3);
        for &value in gray.data() {
            data.extend_from_slice(&[value, value, value]);
        }
        Self {
            data,
            width: gray.width(),
            height: gray.height(),
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the interleaved sample buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 3;
        Some(Rgb([self.data[idx], self.data[idx + 1], self.data[idx + 2]]))
    }

    /// Writes a pixel; coordinates outside the image are ignored.
    pub fn put_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) * 3;
        self.data[idx..idx + 3].copy_from_slice(&color.0);
    }

    /// Converts to grayscale using BT.601 luma weights.
    pub fn to_gray(&self) -> OwnedImage {
        let data: Vec<u8> = self
            .data
            .chunks_exact(3)
            .map(|px| luma_bt601(px[0], px[1], px[2]))
            .collect();
        OwnedImage {
            data,
            width: self.width,
            height: self.height,
        }
    }

    /// Draws a rectangle outline with corners `(x, y)` and `(x + width, y + height)`.
    ///
    /// Additional thickness layers grow inwards. Pixels falling outside the
    /// image are clipped.
    pub fn draw_rect_outline(
        &mut self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        color: Rgb,
        thickness: usize,
    ) {
        if width == 0 || height == 0 {
            return;
        }
        let right_edge = x.saturating_add(width);
        let bottom_edge = y.saturating_add(height);
        for layer in 0..thickness {
            let left = x.saturating_add(layer);
            let top = y.saturating_add(layer);
            let right = right_edge.saturating_sub(layer);
            let bottom = bottom_edge.saturating_sub(layer);
            if left > right || top > bottom {
                break;
            }
            let clip_right = right.min(self.width.saturating_sub(1));
            let clip_bottom = bottom.min(self.height.saturating_sub(1));
            for px in left..=clip_right {
                self.put_pixel(px, top, color);
                self.put_pixel(px, bottom, color);
            }
            for py in top..=clip_bottom {
                self.put_pixel(left, py, color);
                self.put_pixel(right, py, color);
            }
        }
    }
}
