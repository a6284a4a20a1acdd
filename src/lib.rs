//! ImageWithin locates a small template image inside a larger base image.
//!
//! Matching uses normalized cross-correlation at the template's native size
//! first. When nothing reaches the acceptance threshold, the template is
//! resampled through a fixed, ordered list of scale factors and the first
//! factor that yields matches wins. Matches are ordered left to right and the
//! caller picks one by index; the result carries its coordinates, accuracy,
//! and a copy of the base image with the match outlined.
//!
//! File loading and saving is available with the default `image-io`
//! feature; structured logging with the optional `tracing` feature.

mod candidate;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod search;
pub mod template;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use image::io;
pub use image::{ImageView, OwnedImage, Rgb, RgbImage};
pub use kernel::CorrelationSurface;
pub use candidate::{Match, MatchSet};
pub use search::{
    search, RequestContext, Resolution, ScaleAttempt, SearchConfig, SearchOutcome, SearchPhase,
    SearchReport, SearchResult, Searcher,
};
#[cfg(feature = "image-io")]
pub use search::{FileSearch, RequestWorkspace};
pub use template::Template;
pub use util::{ImageWithinError, ImageWithinResult};
