//! Request-level state machine tying the passes and the resolver together.
//!
//! `CheckInputs -> NativeSearch -> {Resolved | ScaledSearch} -> {Resolved | NoMatch}`,
//! with `CheckInputs -> ImagesMissing` as an early exit for file-based
//! requests. Resolution may also end in `IndexOutOfRange`.

use crate::image::RgbImage;
use crate::search::planner::{run_fallback, run_native, Winner};
use crate::search::resolve::resolve_index;
use crate::search::{RequestContext, SearchConfig, SearchReport, SearchResult};
use crate::template::Template;
use crate::trace::{trace_event, trace_span};
use crate::util::ImageWithinResult;
use std::path::PathBuf;

pub use crate::search::planner::{ArtifactSink, DiscardArtifacts};

#[cfg(feature = "image-io")]
use crate::image::io::{load_gray_image, load_rgb_image, save_rgb_image};
#[cfg(feature = "image-io")]
use crate::search::workspace::RequestWorkspace;
#[cfg(feature = "image-io")]
use std::path::Path;

/// Result of one request together with the attempts that led to it.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    /// Terminal outcome.
    pub result: SearchResult,
    /// Attempts made, in evaluation order.
    pub report: SearchReport,
    /// Per-request directory kept on disk with the resampled templates.
    pub intermediates: Option<PathBuf>,
}

/// Runs searches with a fixed, validated configuration.
///
/// A `Searcher` holds no per-request state and can be shared across threads.
#[derive(Clone, Debug)]
pub struct Searcher {
    cfg: SearchConfig,
}

impl Searcher {
    /// Creates a searcher after validating `cfg`.
    pub fn new(cfg: SearchConfig) -> ImageWithinResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.cfg
    }

    /// Searches an already decoded base image for `template`.
    pub fn search(
        &self,
        base: &RgbImage,
        template: &Template,
        index: usize,
        ctx: &RequestContext,
    ) -> ImageWithinResult<SearchOutcome> {
        self.search_with_sink(base, template, index, ctx, &mut DiscardArtifacts)
    }

    /// Like [`Searcher::search`], handing intermediate templates to `sink`.
    pub fn search_with_sink(
        &self,
        base: &RgbImage,
        template: &Template,
        index: usize,
        ctx: &RequestContext,
        sink: &mut dyn ArtifactSink,
    ) -> ImageWithinResult<SearchOutcome> {
        let _span = trace_span!(
            "search",
            request_id = ctx.request_id(),
            index = index,
            threshold = self.cfg.threshold
        )
        .entered();

        let gray = base.to_gray();
        let mut report = SearchReport::default();

        let winner = match run_native(gray.view(), template, &self.cfg, &mut report)? {
            Some(winner) => Some(winner),
            None => {
                trace_event!("native_empty", fallback_scales = self.cfg.scales.len());
                run_fallback(gray.view(), template, &self.cfg, sink, &mut report)?
            }
        };

        let result = match winner {
            Some(Winner {
                scale,
                template,
                surface,
                matches,
            }) => resolve_index(
                &matches,
                &surface,
                base,
                (template.width(), template.height()),
                scale,
                index,
            )?,
            None => {
                trace_event!("no_match", attempts = report.attempts().len());
                SearchResult::NoMatch
            }
        };

        Ok(SearchOutcome {
            result,
            report,
            intermediates: None,
        })
    }
}

/// File-based search request.
#[cfg(feature = "image-io")]
#[derive(Clone, Copy, Debug)]
pub struct FileSearch<'a> {
    /// Path of the image to search in.
    pub base: &'a Path,
    /// Path of the image to search for.
    pub template: &'a Path,
    /// Zero-based index into the left-to-right match list.
    pub index: usize,
    /// Where the annotated base image is written on success.
    pub output: &'a Path,
    /// Root under which a per-request directory for intermediates is created.
    pub workspace_root: Option<&'a Path>,
    /// Keep the per-request directory after the search finishes.
    pub keep_intermediates: bool,
}

#[cfg(feature = "image-io")]
impl Searcher {
    /// Loads both images from disk, searches, and writes the annotated result.
    ///
    /// A missing input yields `ImagesMissing`; a file that exists but cannot be
    /// decoded is an error.
    pub fn search_files(
        &self,
        request: &FileSearch<'_>,
        ctx: &RequestContext,
    ) -> ImageWithinResult<SearchOutcome> {
        if !request.base.is_file() || !request.template.is_file() {
            trace_event!(
                "images_missing",
                request_id = ctx.request_id(),
                base_exists = request.base.is_file(),
                template_exists = request.template.is_file()
            );
            return Ok(SearchOutcome {
                result: SearchResult::ImagesMissing,
                report: SearchReport::default(),
                intermediates: None,
            });
        }

        let base = load_rgb_image(request.base)?;
        let template = Template::from_image(load_gray_image(request.template)?);

        let outcome = match request.workspace_root {
            Some(root) => {
                let mut workspace = RequestWorkspace::create(root, ctx.request_id())?;
                if request.keep_intermediates {
                    workspace.persist();
                }
                let mut outcome =
                    self.search_with_sink(&base, &template, request.index, ctx, &mut workspace)?;
                if request.keep_intermediates {
                    outcome.intermediates = Some(workspace.path().to_path_buf());
                }
                outcome
            }
            None => self.search(&base, &template, request.index, ctx)?,
        };

        if let SearchResult::Resolved(res) = &outcome.result {
            save_rgb_image(&res.annotated, request.output)?;
        }
        Ok(outcome)
    }
}
