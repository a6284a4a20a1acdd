//! Template storage, resampling, and planning utilities.

use crate::image::resize::resize_u8_bilinear;
use crate::image::{ImageView, OwnedImage};
use crate::util::ImageWithinResult;

mod plan;

pub use plan::TemplatePlan;

/// Owned template image in contiguous grayscale format.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    img: OwnedImage,
}

impl Template {
    /// Creates a template from a contiguous grayscale buffer.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> ImageWithinResult<Self> {
        let img = OwnedImage::new(data, width, height)?;
        Ok(Self { img })
    }

    /// Wraps an already validated grayscale image.
    pub fn from_image(img: OwnedImage) -> Self {
        Self { img }
    }

    /// Returns a borrowed view of the template data.
    pub fn view(&self) -> ImageView<'_, u8> {
        self.img.view()
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.img.width()
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.img.height()
    }

    /// Returns the underlying grayscale image.
    pub fn image(&self) -> &OwnedImage {
        &self.img
    }

    /// Returns a copy resampled uniformly by `factor`.
    pub fn scaled(&self, factor: f32) -> ImageWithinResult<Template> {
        let img = resize_u8_bilinear(self.view(), factor)?;
        Ok(Self { img })
    }

    /// Returns `true` when the template fits inside a `width x height` image.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.width() <= width && self.height() <= height
    }
}
