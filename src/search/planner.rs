//! Native pass and scaled fallback over the configured scale list.

use crate::candidate::extract::extract_matches;
use crate::candidate::nms::suppress_adjacent;
use crate::candidate::MatchSet;
use crate::image::ImageView;
use crate::kernel::{correlate, CorrelationSurface};
use crate::search::SearchConfig;
use crate::template::Template;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::math::scaled_len;
use crate::util::{ImageWithinError, ImageWithinResult};

/// Which pass of the search produced an attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchPhase {
    /// Template at its original size.
    Native,
    /// Template resampled by one of the configured fallback factors.
    Fallback,
}

/// Record of one correlation attempt at a single scale.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleAttempt {
    /// Pass the attempt belongs to.
    pub phase: SearchPhase,
    /// Template scale factor.
    pub scale: f32,
    /// Template width after resampling.
    pub template_width: usize,
    /// Template height after resampling.
    pub template_height: usize,
    /// Matches found; always empty for a skipped attempt.
    pub matches: MatchSet,
    /// The template did not fit inside the base image at this scale.
    pub skipped: bool,
}

impl ScaleAttempt {
    /// Returns `true` when this attempt ended the search.
    pub fn accepted(&self) -> bool {
        !self.skipped && !self.matches.is_empty()
    }
}

/// Ordered log of the attempts made by one search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchReport {
    attempts: Vec<ScaleAttempt>,
}

impl SearchReport {
    /// Returns every attempt in evaluation order.
    pub fn attempts(&self) -> &[ScaleAttempt] {
        &self.attempts
    }

    /// Returns the attempt whose matches were used, if any.
    pub fn winner(&self) -> Option<&ScaleAttempt> {
        self.attempts.iter().find(|attempt| attempt.accepted())
    }

    /// Returns the fallback factors that were considered, skipped ones included.
    pub fn fallback_scales(&self) -> Vec<f32> {
        self.attempts
            .iter()
            .filter(|attempt| attempt.phase == SearchPhase::Fallback)
            .map(|attempt| attempt.scale)
            .collect()
    }
}

/// Receives intermediate artifacts produced while the fallback pass runs.
pub trait ArtifactSink {
    /// Called with each resampled template that fits inside the base image.
    fn scaled_template(&mut self, scale: f32, template: &Template) -> ImageWithinResult<()>;
}

/// Sink that drops every artifact.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardArtifacts;

impl ArtifactSink for DiscardArtifacts {
    fn scaled_template(&mut self, _scale: f32, _template: &Template) -> ImageWithinResult<()> {
        Ok(())
    }
}

/// Matches selected by a pass together with what is needed to resolve them.
pub(crate) struct Winner {
    pub(crate) scale: f32,
    pub(crate) template: Template,
    pub(crate) surface: CorrelationSurface,
    pub(crate) matches: MatchSet,
}

/// Correlates the template at its original size.
pub(crate) fn run_native(
    base: ImageView<'_, u8>,
    template: &Template,
    cfg: &SearchConfig,
    report: &mut SearchReport,
) -> ImageWithinResult<Option<Winner>> {
    let _span = trace_span!("native_pass").entered();
    let winner = attempt(base, template.clone(), 1.0, SearchPhase::Native, cfg, report)?;
    trace_event!(
        "native_matches",
        count = winner.as_ref().map_or(0, |w| w.matches.len())
    );
    if let Some(winner) = &winner {
        log_matches(&winner.matches);
    }
    Ok(winner)
}

/// Walks the scale list in order and stops at the first factor with matches.
///
/// A factor whose resampled template would not fit inside the base image is
/// logged as skipped without resampling.
pub(crate) fn run_fallback(
    base: ImageView<'_, u8>,
    template: &Template,
    cfg: &SearchConfig,
    sink: &mut dyn ArtifactSink,
    report: &mut SearchReport,
) -> ImageWithinResult<Option<Winner>> {
    let _span = trace_span!("fallback_pass", scales = cfg.scales.len()).entered();
    for &scale in &cfg.scales {
        trace_event!("checking_scale", scale = scale);
        let tpl_width = scaled_len(template.width(), scale);
        let tpl_height = scaled_len(template.height(), scale);
        if tpl_width > base.width() || tpl_height > base.height() {
            trace_warn!(
                "scale_skipped",
                scale = scale,
                tpl_width = tpl_width,
                tpl_height = tpl_height
            );
            report.attempts.push(ScaleAttempt {
                phase: SearchPhase::Fallback,
                scale,
                template_width: tpl_width,
                template_height: tpl_height,
                matches: MatchSet::default(),
                skipped: true,
            });
            continue;
        }

        let scaled = template.scaled(scale)?;
        sink.scaled_template(scale, &scaled)?;
        if let Some(winner) = attempt(base, scaled, scale, SearchPhase::Fallback, cfg, report)? {
            trace_event!(
                "fallback_matches",
                scale = scale,
                count = winner.matches.len()
            );
            log_matches(&winner.matches);
            return Ok(Some(winner));
        }
    }
    Ok(None)
}

fn log_matches(matches: &MatchSet) {
    for (index, m) in matches.iter().enumerate() {
        trace_event!("match_found", index = index, x = m.x, y = m.y);
    }
}

fn attempt(
    base: ImageView<'_, u8>,
    template: Template,
    scale: f32,
    phase: SearchPhase,
    cfg: &SearchConfig,
    report: &mut SearchReport,
) -> ImageWithinResult<Option<Winner>> {
    let mut record = ScaleAttempt {
        phase,
        scale,
        template_width: template.width(),
        template_height: template.height(),
        matches: MatchSet::default(),
        skipped: false,
    };

    let surface = match correlate(base, &template) {
        Ok(surface) => surface,
        Err(ImageWithinError::ScaleIncompatible {
            tpl_width,
            tpl_height,
            ..
        }) => {
            trace_warn!(
                "scale_skipped",
                scale = scale,
                tpl_width = tpl_width,
                tpl_height = tpl_height
            );
            record.skipped = true;
            report.attempts.push(record);
            return Ok(None);
        }
        Err(err) => return Err(err),
    };

    let mut matches = extract_matches(&surface, cfg.threshold);
    if let Some(radius) = cfg.suppression_radius {
        matches = suppress_adjacent(&matches, &surface, radius);
    }
    if phase == SearchPhase::Fallback {
        if let Some(limit) = cfg.max_matches_after_fallback {
            matches = matches.truncated(limit);
        }
    }

    record.matches = matches.clone();
    report.attempts.push(record);
    if matches.is_empty() {
        return Ok(None);
    }

    Ok(Some(Winner {
        scale,
        template,
        surface,
        matches,
    }))
}
