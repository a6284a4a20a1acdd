//! Correlation kernel implementations.
//!
//! A kernel turns a grayscale base image and a template plan into a
//! [`CorrelationSurface`]: one score per valid top-left placement.

use crate::image::ImageView;
use crate::template::{Template, TemplatePlan};
use crate::util::ImageWithinResult;

pub mod scalar;
mod surface;

pub use surface::CorrelationSurface;

/// Kernel trait for scoring and dense scan operations.
pub trait Kernel {
    type Plan;

    /// Computes the score at a single placement (top-left coordinates).
    ///
    /// Returns `None` when the placement does not fit inside the image.
    fn score_at(image: ImageView<'_, u8>, plan: &Self::Plan, x: usize, y: usize) -> Option<f32>;

    /// Scores every valid placement and returns the full surface.
    ///
    /// Fails with `ScaleIncompatible` when the template is larger than the
    /// image in either dimension.
    fn correlate(
        image: ImageView<'_, u8>,
        plan: &Self::Plan,
    ) -> ImageWithinResult<CorrelationSurface>;
}

/// Computes the normalized cross-correlation surface of `template` over `image`.
pub fn correlate(
    image: ImageView<'_, u8>,
    template: &Template,
) -> ImageWithinResult<CorrelationSurface> {
    let plan = TemplatePlan::from_view(template.view())?;
    <scalar::NccScalar as Kernel>::correlate(image, &plan)
}
