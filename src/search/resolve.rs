//! Index-based selection of a match and annotation of the base image.

use crate::candidate::MatchSet;
use crate::image::{Rgb, RgbImage};
use crate::kernel::CorrelationSurface;
use crate::search::{Resolution, SearchResult};
use crate::trace::trace_event;
use crate::util::{ImageWithinError, ImageWithinResult};

const OUTLINE_THICKNESS: usize = 2;

/// Picks the match at `index` and outlines it on a copy of `base`.
///
/// `surface` must be the surface `matches` was extracted from, and
/// `template_size` the `(width, height)` of the template that produced it.
/// Accuracy is the surface score at the match scaled to a percentage, without
/// clamping.
pub fn resolve_index(
    matches: &MatchSet,
    surface: &CorrelationSurface,
    base: &RgbImage,
    template_size: (usize, usize),
    scale: f32,
    index: usize,
) -> ImageWithinResult<SearchResult> {
    let Some(selected) = matches.get(index) else {
        trace_event!(
            "index_out_of_range",
            index = index,
            available = matches.len()
        );
        return Ok(SearchResult::IndexOutOfRange {
            index,
            available: matches.len(),
        });
    };

    let (template_width, template_height) = template_size;
    let score = surface
        .get(selected.x, selected.y)
        .ok_or(ImageWithinError::RoiOutOfBounds {
            x: selected.x,
            y: selected.y,
            width: template_width,
            height: template_height,
            img_width: base.width(),
            img_height: base.height(),
        })?;
    let accuracy = score * 100.0;

    let mut annotated = base.clone();
    annotated.draw_rect_outline(
        selected.x,
        selected.y,
        template_width,
        template_height,
        Rgb::GREEN,
        OUTLINE_THICKNESS,
    );

    trace_event!(
        "resolved",
        x = selected.x,
        y = selected.y,
        accuracy = accuracy,
        scale = scale
    );
    Ok(SearchResult::Resolved(Resolution {
        x: selected.x,
        y: selected.y,
        accuracy,
        scale,
        template_width,
        template_height,
        annotated,
    }))
}
