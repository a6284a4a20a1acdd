//! Dense correlation score grid.

use crate::image::ImageView;
use crate::util::{ImageWithinError, ImageWithinResult};

/// Row-major grid of correlation scores, one per template placement.
///
/// Cell `(x, y)` scores the base-image window whose top-left corner is
/// `(x, y)`. Every value lies in `[-1, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationSurface {
    scores: Vec<f32>,
    width: usize,
    height: usize,
}

impl CorrelationSurface {
    pub(crate) fn from_scores(
        scores: Vec<f32>,
        width: usize,
        height: usize,
    ) -> ImageWithinResult<Self> {
        if width == 0 || height == 0 {
            return Err(ImageWithinError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(ImageWithinError::InvalidDimensions { width, height })?;
        if scores.len() != needed {
            return Err(ImageWithinError::BufferTooSmall {
                needed,
                got: scores.len(),
            });
        }
        Ok(Self {
            scores,
            width,
            height,
        })
    }

    /// Returns the number of horizontal placements.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of vertical placements.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the score for the placement at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.scores.get(y * self.width + x).copied()
    }

    /// Returns the scores in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.scores
    }

    /// Returns a borrowed 2D view of the scores.
    pub fn view(&self) -> ImageView<'_, f32> {
        ImageView::from_slice(&self.scores, self.width, self.height)
            .expect("surface geometry is validated on construction")
    }

    /// Returns the highest-scoring placement as `(x, y, score)`.
    ///
    /// Ties keep the first placement in row-major order.
    pub fn best(&self) -> (usize, usize, f32) {
        let mut best = (0, 0, f32::NEG_INFINITY);
        for (idx, &score) in self.scores.iter().enumerate() {
            if score > best.2 {
                best = (idx % self.width, idx / self.width, score);
            }
        }
        best
    }
}
