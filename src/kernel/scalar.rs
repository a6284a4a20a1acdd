//! Scalar reference kernel for normalized cross-correlation.
//!
//! For a window `I` and template `T` of `n` pixels the score is
//! `sum((T - mean_T) * I) / sqrt(var_T * var_I)` where `var_X` is the sum of
//! squared deviations. Window sums are accumulated as exact integers, so flat
//! windows are recognised without a tolerance.
//!
//! Flat patches have no defined correlation. If both the template and the
//! window are flat the score is `1.0` for equal intensity and `0.0` otherwise;
//! if only one of them is flat the score is `0.0`.

use crate::image::ImageView;
use crate::kernel::{CorrelationSurface, Kernel};
use crate::template::TemplatePlan;
use crate::util::{ImageWithinError, ImageWithinResult};

/// Scalar NCC kernel over grayscale `u8` images.
pub struct NccScalar;

impl NccScalar {
    fn window_score(image: ImageView<'_, u8>, tpl: &TemplatePlan, x: usize, y: usize) -> f32 {
        let tpl_width = tpl.width();
        let t_prime = tpl.zero_mean();

        let mut dot = 0.0f64;
        let mut sum_i = 0u64;
        let mut sum_i2 = 0u64;
        for ty in 0..tpl.height() {
            let img_row = image.row(y + ty).expect("row within bounds for scan");
            let window = &img_row[x..x + tpl_width];
            let tpl_row = &t_prime[ty * tpl_width..(ty + 1) * tpl_width];
            for (&value, &t) in window.iter().zip(tpl_row) {
                let v = u64::from(value);
                dot += t * value as f64;
                sum_i += v;
                sum_i2 += v * v;
            }
        }

        let n = tpl.len();
        let centered = n as u128 * u128::from(sum_i2) - u128::from(sum_i) * u128::from(sum_i);
        let var_i = centered as f64 / n as f64;

        match (tpl.is_flat(), var_i == 0.0) {
            (true, true) => {
                if sum_i == tpl.sum() {
                    1.0
                } else {
                    0.0
                }
            }
            (true, false) | (false, true) => 0.0,
            (false, false) => {
                let score = dot / (tpl.var_t() * var_i).sqrt();
                if score.is_finite() {
                    // Rounding can push a perfect match marginally past 1.
                    score.clamp(-1.0, 1.0) as f32
                } else {
                    0.0
                }
            }
        }
    }
}

impl Kernel for NccScalar {
    type Plan = TemplatePlan;

    fn score_at(image: ImageView<'_, u8>, tpl: &Self::Plan, x: usize, y: usize) -> Option<f32> {
        let img_width = image.width();
        let img_height = image.height();
        if img_width < tpl.width() || img_height < tpl.height() {
            return None;
        }
        if x > img_width - tpl.width() || y > img_height - tpl.height() {
            return None;
        }
        Some(Self::window_score(image, tpl, x, y))
    }

    fn correlate(
        image: ImageView<'_, u8>,
        tpl: &Self::Plan,
    ) -> ImageWithinResult<CorrelationSurface> {
        let img_width = image.width();
        let img_height = image.height();
        let tpl_width = tpl.width();
        let tpl_height = tpl.height();
        if img_width < tpl_width || img_height < tpl_height {
            return Err(ImageWithinError::ScaleIncompatible {
                tpl_width,
                tpl_height,
                img_width,
                img_height,
            });
        }

        let out_width = img_width - tpl_width + 1;
        let out_height = img_height - tpl_height + 1;
        let mut scores = Vec::with_capacity(out_width * out_height);
        for y in 0..out_height {
            for x in 0..out_width {
                scores.push(Self::window_score(image, tpl, x, y));
            }
        }

        CorrelationSurface::from_scores(scores, out_width, out_height)
    }
}
