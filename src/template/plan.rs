//! Template plan precomputation for normalized cross-correlation.

use crate::image::ImageView;
use crate::util::{ImageWithinError, ImageWithinResult};

/// Precomputed statistics and zero-mean buffer for template matching.
///
/// Sums are kept as exact integers so a flat (zero-variance) template is
/// detected without a floating-point tolerance.
#[derive(Clone, Debug)]
pub struct TemplatePlan {
    width: usize,
    height: usize,
    sum: u64,
    var_t: f64,
    zero_mean: Vec<f64>,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    pub fn from_view(tpl: ImageView<'_, u8>) -> ImageWithinResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(ImageWithinError::InvalidDimensions { width, height })?;

        let mut sum = 0u64;
        let mut sum_sq = 0u64;
        for y in 0..height {
            let row = row_or_err(tpl, y)?;
            for &value in row {
                let v = u64::from(value);
                sum += v;
                sum_sq += v * v;
            }
        }

        let n = count as u128;
        let centered = n * u128::from(sum_sq) - u128::from(sum) * u128::from(sum);
        let var_t = centered as f64 / count as f64;
        let mean = sum as f64 / count as f64;

        let mut zero_mean = Vec::with_capacity(count);
        for y in 0..height {
            let row = row_or_err(tpl, y)?;
            zero_mean.extend(row.iter().map(|&value| f64::from(value) - mean));
        }

        Ok(Self {
            width,
            height,
            sum,
            var_t,
            zero_mean,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of template pixels.
    pub fn len(&self) -> usize {
        self.zero_mean.len()
    }

    /// Always `false`; zero-sized templates are rejected on construction.
    pub fn is_empty(&self) -> bool {
        self.zero_mean.is_empty()
    }

    /// Returns the exact intensity sum of the template.
    pub fn sum(&self) -> u64 {
        self.sum
    }

    /// Returns the sum of squared deviations from the mean.
    pub fn var_t(&self) -> f64 {
        self.var_t
    }

    /// Returns `true` when every template pixel has the same intensity.
    pub fn is_flat(&self) -> bool {
        self.var_t == 0.0
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn zero_mean(&self) -> &[f64] {
        &self.zero_mean
    }
}

fn row_or_err(view: ImageView<'_, u8>, y: usize) -> ImageWithinResult<&[u8]> {
    view.row(y).ok_or(ImageWithinError::BufferTooSmall {
        needed: (y + 1)
            .checked_mul(view.stride())
            .unwrap_or(usize::MAX),
        got: view.as_slice().len(),
    })
}
