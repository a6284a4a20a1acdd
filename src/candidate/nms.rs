//! Optional non-maximum suppression over an extracted match set.

use crate::candidate::{Match, MatchSet};
use crate::kernel::CorrelationSurface;

/// Merges detections that lie within `radius` of a stronger one.
///
/// Matches are visited by descending score (ties by ascending `y`, then `x`)
/// and kept if they are farther than `radius` in Chebyshev distance from all
/// previously kept matches. The survivors are returned as a new left-to-right
/// [`MatchSet`]; the input set is left untouched.
pub fn suppress_adjacent(set: &MatchSet, surface: &CorrelationSurface, radius: usize) -> MatchSet {
    if radius == 0 {
        return set.clone();
    }

    let mut ranked: Vec<(Match, f32)> = set
        .iter()
        .map(|&m| (m, surface.get(m.x, m.y).unwrap_or(f32::NEG_INFINITY)))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| a.0.y.cmp(&b.0.y))
            .then_with(|| a.0.x.cmp(&b.0.x))
    });

    let mut kept: Vec<Match> = Vec::new();
    'outer: for (candidate, _) in ranked {
        for kept_match in kept.iter() {
            let dx = candidate.x.abs_diff(kept_match.x);
            let dy = candidate.y.abs_diff(kept_match.y);
            if dx.max(dy) <= radius {
                continue 'outer;
            }
        }
        kept.push(candidate);
    }

    MatchSet::new(kept)
}

#[cfg(test)]
mod tests {
    use super::suppress_adjacent;
    use crate::candidate::extract::extract_matches;
    use crate::candidate::Match;
    use crate::kernel::CorrelationSurface;

    #[test]
    fn keeps_strongest_of_each_cluster() {
        #[rustfmt::skip]
        let scores = vec![
            0.92, 0.99, 0.93, 0.0, 0.0, 0.0, 0.91,
            0.90, 0.94, 0.0,  0.0, 0.0, 0.0, 0.95,
        ];
        let surface = CorrelationSurface::from_scores(scores, 7, 2).unwrap();
        let raw = extract_matches(&surface, 0.9);
        assert_eq!(raw.len(), 7);

        let merged = suppress_adjacent(&raw, &surface, 2);
        assert_eq!(
            merged.as_slice(),
            &[Match { x: 1, y: 0 }, Match { x: 6, y: 1 }]
        );
        assert_eq!(raw.len(), 7);
    }

    #[test]
    fn zero_radius_is_identity() {
        let surface = CorrelationSurface::from_scores(vec![0.95, 0.96], 2, 1).unwrap();
        let raw = extract_matches(&surface, 0.9);
        assert_eq!(suppress_adjacent(&raw, &surface, 0), raw);
    }
}
