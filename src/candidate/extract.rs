//! Thresholding of correlation surfaces into match sets.

use crate::candidate::{Match, MatchSet};
use crate::kernel::CorrelationSurface;

/// Returns every placement whose score is at least `threshold`.
///
/// Cells are visited in row-major order and the result is sorted by ascending
/// `x`. Neighbouring placements above the threshold are all reported; see
/// [`crate::candidate::nms::suppress_adjacent`] for an optional merge step.
pub fn extract_matches(surface: &CorrelationSurface, threshold: f32) -> MatchSet {
    let width = surface.width();
    let matches = surface
        .as_slice()
        .iter()
        .enumerate()
        .filter(|&(_, &score)| score >= threshold)
        .map(|(idx, _)| Match {
            x: idx % width,
            y: idx / width,
        })
        .collect();
    MatchSet::new(matches)
}

#[cfg(test)]
mod tests {
    use super::extract_matches;
    use crate::candidate::Match;
    use crate::kernel::CorrelationSurface;

    #[test]
    fn keeps_cells_at_or_above_threshold() {
        #[rustfmt::skip]
        let scores = vec![
            0.10, 0.95, 0.20, 0.90,
            0.91, 0.30, 0.89, 0.40,
            0.00, 1.00, -0.5, 0.10,
        ];
        let surface = CorrelationSurface::from_scores(scores, 4, 3).unwrap();
        let set = extract_matches(&surface, 0.9);
        let got: Vec<_> = set.iter().map(|m| (m.x, m.y)).collect();
        assert_eq!(got, vec![(0, 1), (1, 0), (1, 2), (3, 0)]);
    }

    #[test]
    fn adjacent_detections_are_not_merged() {
        let scores = vec![0.95, 0.97, 0.96, 0.1];
        let surface = CorrelationSurface::from_scores(scores, 4, 1).unwrap();
        let set = extract_matches(&surface, 0.9);
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(2), Some(Match { x: 2, y: 0 }));
    }

    #[test]
    fn empty_when_nothing_reaches_threshold() {
        let surface = CorrelationSurface::from_scores(vec![0.5; 6], 3, 2).unwrap();
        assert!(extract_matches(&surface, 0.9).is_empty());
    }
}
