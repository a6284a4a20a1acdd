//! Search policy: native pass, scaled fallback, and index resolution.
//!
//! A search first correlates the template at its original size. Only when
//! that yields no match does it walk the configured scale list, stopping at
//! the first factor that produces matches. Results from different passes or
//! different factors are never combined.

mod orchestrator;
mod planner;
mod resolve;
#[cfg(feature = "image-io")]
mod workspace;

pub use orchestrator::{ArtifactSink, DiscardArtifacts, SearchOutcome, Searcher};
#[cfg(feature = "image-io")]
pub use orchestrator::FileSearch;
pub use planner::{ScaleAttempt, SearchPhase, SearchReport};
pub use resolve::resolve_index;
#[cfg(feature = "image-io")]
pub use workspace::RequestWorkspace;

use crate::image::RgbImage;
use crate::template::Template;
use crate::util::{ImageWithinError, ImageWithinResult};

/// Acceptance threshold used when none is configured.
pub const DEFAULT_THRESHOLD: f32 = 0.9;

/// Template scale factors tried by the fallback pass, in priority order.
pub const DEFAULT_SCALES: [f32; 8] = [2.0, 1.0, 0.9, 0.7, 0.8, 0.6, 0.5, 0.2];

/// Cap on the number of matches kept by the fallback pass.
pub const DEFAULT_MAX_MATCHES_AFTER_FALLBACK: usize = 5;

/// Environment variable that overrides the acceptance threshold.
pub const THRESHOLD_ENV: &str = "IMG_MATCH_THRESHOLD";

/// Search configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Minimum correlation for a placement to count as a match, in `(0, 1]`.
    pub threshold: f32,
    /// Fallback scale factors, evaluated in the given order (not sorted).
    pub scales: Vec<f32>,
    /// Maximum matches kept after a successful fallback scale.
    ///
    /// The native pass is never truncated.
    pub max_matches_after_fallback: Option<usize>,
    /// Chebyshev radius for optional non-maximum suppression.
    ///
    /// `None` reports every placement above the threshold.
    pub suppression_radius: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            scales: DEFAULT_SCALES.to_vec(),
            max_matches_after_fallback: Some(DEFAULT_MAX_MATCHES_AFTER_FALLBACK),
            suppression_radius: None,
        }
    }
}

impl SearchConfig {
    /// Default configuration with the threshold taken from `IMG_MATCH_THRESHOLD`.
    pub fn from_env() -> ImageWithinResult<Self> {
        let value = std::env::var(THRESHOLD_ENV).ok();
        Self::default().with_threshold_override(value.as_deref())
    }

    /// Replaces the threshold with a parsed textual value, if one is given.
    ///
    /// Blank values are treated as unset.
    pub fn with_threshold_override(mut self, value: Option<&str>) -> ImageWithinResult<Self> {
        if let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) {
            self.threshold = raw
                .parse::<f32>()
                .map_err(|_| ImageWithinError::InvalidThreshold(raw.to_owned()))?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Checks the threshold range and the scale list.
    pub fn validate(&self) -> ImageWithinResult<()> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(ImageWithinError::InvalidThreshold(
                self.threshold.to_string(),
            ));
        }
        if self.scales.is_empty() {
            return Err(ImageWithinError::EmptyScalePlan);
        }
        if let Some(&bad) = self
            .scales
            .iter()
            .find(|scale| !scale.is_finite() || **scale <= 0.0)
        {
            return Err(ImageWithinError::InvalidScale(bad));
        }
        Ok(())
    }
}

/// Per-request context threaded through every search call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestContext {
    request_id: String,
}

impl RequestContext {
    /// Creates a context for the given request identifier.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Context for callers that do not track requests.
    pub fn anonymous() -> Self {
        Self::new("-")
    }

    /// Returns the request identifier.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}

/// A resolved match with its accuracy and annotated base image.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    /// X coordinate of the match's top-left corner in the base image.
    pub x: usize,
    /// Y coordinate of the match's top-left corner in the base image.
    pub y: usize,
    /// Correlation score at the match, as a percentage.
    pub accuracy: f32,
    /// Template scale factor that produced the match (`1.0` for the native pass).
    pub scale: f32,
    /// Width of the template at that scale.
    pub template_width: usize,
    /// Height of the template at that scale.
    pub template_height: usize,
    /// Copy of the base image with the match outlined.
    pub annotated: RgbImage,
}

/// Terminal outcome of one search request.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchResult {
    /// A match exists at the requested index.
    Resolved(Resolution),
    /// Native and fallback passes found nothing above the threshold.
    NoMatch,
    /// Matches exist, but fewer than `index + 1` of them.
    IndexOutOfRange { index: usize, available: usize },
    /// The base or template image could not be found.
    ImagesMissing,
}

impl SearchResult {
    /// Human-readable status line for the outcome.
    pub fn message(&self) -> String {
        match self {
            SearchResult::Resolved(res) => format!(
                "element found at ({}, {}) with accuracy {:.5}%",
                res.x, res.y, res.accuracy
            ),
            SearchResult::NoMatch => "No matches found".to_owned(),
            SearchResult::IndexOutOfRange { .. } => {
                "Matching element found but Index out of range".to_owned()
            }
            SearchResult::ImagesMissing => "Images not found on the local filesystem".to_owned(),
        }
    }

    /// Returns the resolution when the search succeeded.
    pub fn resolution(&self) -> Option<&Resolution> {
        match self {
            SearchResult::Resolved(res) => Some(res),
            _ => None,
        }
    }

    /// Returns `true` for `NoMatch` and `ImagesMissing`.
    pub fn is_failure(&self) -> bool {
        matches!(self, SearchResult::NoMatch | SearchResult::ImagesMissing)
    }
}

/// Searches `base` for `template` and resolves the match at `index`.
///
/// Uses the default scale list and fallback cap with the given threshold.
pub fn search(
    base: &RgbImage,
    template: &Template,
    index: usize,
    threshold: f32,
) -> ImageWithinResult<SearchResult> {
    let cfg = SearchConfig {
        threshold,
        ..SearchConfig::default()
    };
    let searcher = Searcher::new(cfg)?;
    let outcome = searcher.search(base, template, index, &RequestContext::anonymous())?;
    Ok(outcome.result)
}

#[cfg(test)]
mod tests {
    use super::{SearchConfig, SearchResult, DEFAULT_SCALES};
    use crate::util::ImageWithinError;

    #[test]
    fn default_config_uses_priority_order() {
        let cfg = SearchConfig::default();
        assert_eq!(cfg.threshold, 0.9);
        assert_eq!(cfg.scales, vec![2.0, 1.0, 0.9, 0.7, 0.8, 0.6, 0.5, 0.2]);
        assert_eq!(cfg.scales, DEFAULT_SCALES.to_vec());
        assert_eq!(cfg.max_matches_after_fallback, Some(5));
        assert_eq!(cfg.suppression_radius, None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn threshold_override_parses_and_validates() {
        let cfg = SearchConfig::default()
            .with_threshold_override(Some(" 0.75 "))
            .unwrap();
        assert_eq!(cfg.threshold, 0.75);

        let unset = SearchConfig::default().with_threshold_override(None).unwrap();
        assert_eq!(unset.threshold, 0.9);
        let blank = SearchConfig::default().with_threshold_override(Some("")).unwrap();
        assert_eq!(blank.threshold, 0.9);

        assert_eq!(
            SearchConfig::default()
                .with_threshold_override(Some("high"))
                .unwrap_err(),
            ImageWithinError::InvalidThreshold("high".to_owned())
        );
        assert!(SearchConfig::default()
            .with_threshold_override(Some("1.5"))
            .is_err());
    }

    #[test]
    fn validate_rejects_bad_threshold_and_scales() {
        let zero = SearchConfig {
            threshold: 0.0,
            ..SearchConfig::default()
        };
        assert!(matches!(
            zero.validate(),
            Err(ImageWithinError::InvalidThreshold(_))
        ));

        let nan = SearchConfig {
            threshold: f32::NAN,
            ..SearchConfig::default()
        };
        assert!(nan.validate().is_err());

        let empty = SearchConfig {
            scales: Vec::new(),
            ..SearchConfig::default()
        };
        assert_eq!(empty.validate(), Err(ImageWithinError::EmptyScalePlan));

        let negative = SearchConfig {
            scales: vec![1.0, -0.5],
            ..SearchConfig::default()
        };
        assert_eq!(negative.validate(), Err(ImageWithinError::InvalidScale(-0.5)));
    }

    #[test]
    fn failure_and_informational_outcomes_are_distinct() {
        let no_match = SearchResult::NoMatch;
        let out_of_range = SearchResult::IndexOutOfRange {
            index: 5,
            available: 2,
        };
        assert_ne!(no_match, out_of_range);
        assert!(no_match.is_failure());
        assert!(!out_of_range.is_failure());
        assert_eq!(
            out_of_range.message(),
            "Matching element found but Index out of range"
        );
        assert_eq!(no_match.message(), "No matches found");
    }
}
