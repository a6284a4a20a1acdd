//! Candidate extraction and ordering.
//!
//! A [`MatchSet`] is the ordered list of placements whose correlation met the
//! acceptance threshold. Sets are sorted left-to-right once, on construction,
//! and never reordered afterwards.

pub(crate) mod extract;
pub(crate) mod nms;

use std::slice;

/// Top-left corner of a window whose score met the threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Match {
    /// X coordinate (column) of the window's top-left corner.
    pub x: usize,
    /// Y coordinate (row) of the window's top-left corner.
    pub y: usize,
}

/// Matches ordered by ascending `x`, ties broken by ascending `y`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchSet {
    matches: Vec<Match>,
}

impl MatchSet {
    /// Builds a set from matches in any order.
    pub fn new(mut matches: Vec<Match>) -> Self {
        matches.sort_by_key(|m| (m.x, m.y));
        Self { matches }
    }

    /// Returns the number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Returns `true` when no placement met the threshold.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Returns the match at `index` in left-to-right order.
    pub fn get(&self, index: usize) -> Option<Match> {
        self.matches.get(index).copied()
    }

    /// Returns the matches as a slice.
    pub fn as_slice(&self) -> &[Match] {
        &self.matches
    }

    /// Iterates over the matches in order.
    pub fn iter(&self) -> slice::Iter<'_, Match> {
        self.matches.iter()
    }

    /// Keeps at most the first `limit` matches.
    pub fn truncated(mut self, limit: usize) -> Self {
        self.matches.truncate(limit);
        self
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a Match;
    type IntoIter = slice::Iter<'a, Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Match, MatchSet};

    #[test]
    fn new_orders_by_x_then_y() {
        let set = MatchSet::new(vec![
            Match { x: 9, y: 1 },
            Match { x: 2, y: 7 },
            Match { x: 2, y: 3 },
            Match { x: 5, y: 0 },
        ]);
        let xs: Vec<_> = set.iter().map(|m| (m.x, m.y)).collect();
        assert_eq!(xs, vec![(2, 3), (2, 7), (5, 0), (9, 1)]);
    }

    #[test]
    fn truncated_keeps_leftmost_prefix() {
        let set = MatchSet::new((0..8).rev().map(|x| Match { x, y: 0 }).collect());
        let capped = set.truncated(5);
        assert_eq!(capped.len(), 5);
        assert_eq!(capped.get(4), Some(Match { x: 4, y: 0 }));
        assert_eq!(capped.get(5), None);
    }
}
