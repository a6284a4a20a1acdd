//! Bilinear resampling of grayscale `u8` images.
//!
//! Destination pixel centres are mapped back to the source with
//! `src = (dst + 0.5) / factor - 0.5`, clamped to the valid range, and
//! interpolated bilinearly. Output dimensions are `round(len * factor)` with a
//! minimum of one pixel. A factor of exactly `1.0` reproduces the input.

use crate::image::{ImageView, OwnedImage};
use crate::util::math::{round_to_u8, scaled_len};
use crate::util::{ImageWithinError, ImageWithinResult};

/// Resizes `src` uniformly by `factor` using bilinear interpolation.
pub fn resize_u8_bilinear(src: ImageView<'_, u8>, factor: f32) -> ImageWithinResult<OwnedImage> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(ImageWithinError::InvalidScale(factor));
    }

    let src_width = src.width();
    let src_height = src.height();
    let dst_width = scaled_len(src_width, factor);
    let dst_height = scaled_len(src_height, factor);
    let len = dst_width
        .checked_mul(dst_height)
        .ok_or(ImageWithinError::InvalidDimensions {
            width: dst_width,
            height: dst_height,
        })?;

    let inv = 1.0 / factor;
    let max_x = (src_width - 1) as f32;
    let max_y = (src_height - 1) as f32;
    let x_taps: Vec<(usize, usize, f32)> = (0..dst_width)
        .map(|dx| source_taps((dx as f32 + 0.5) * inv - 0.5, max_x, src_width))
        .collect();

    let mut out = Vec::with_capacity(len);
    for dy in 0..dst_height {
        let (y0, y1, fy) = source_taps((dy as f32 + 0.5) * inv - 0.5, max_y, src_height);
        let row0 = src.row(y0).ok_or(ImageWithinError::BufferTooSmall {
            needed: y0.saturating_mul(src.stride()).saturating_add(src_width),
            got: src.as_slice().len(),
        })?;
        let row1 = src.row(y1).ok_or(ImageWithinError::BufferTooSmall {
            needed: y1.saturating_mul(src.stride()).saturating_add(src_width),
            got: src.as_slice().len(),
        })?;
        for &(x0, x1, fx) in &x_taps {
            let a = row0[x0] as f32;
            let b = row0[x1] as f32;
            let c = row1[x0] as f32;
            let d = row1[x1] as f32;
            let top = a + (b - a) * fx;
            let bottom = c + (d - c) * fx;
            out.push(round_to_u8(top + (bottom - top) * fy));
        }
    }

    OwnedImage::new(out, dst_width, dst_height)
}

fn source_taps(coord: f32, max: f32, len: usize) -> (usize, usize, f32) {
    let coord = coord.clamp(0.0, max);
    let lo = coord.floor() as usize;
    let hi = (lo + 1).min(len - 1);
    (lo, hi, coord - lo as f32)
}
