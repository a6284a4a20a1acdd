//! Low-level building blocks for custom matching pipelines.
//!
//! These expose the correlation kernel, threshold extraction, suppression,
//! and resolution steps individually. Most users should prefer
//! [`crate::Searcher`] or [`crate::search()`].

pub use crate::candidate::extract::extract_matches;
pub use crate::candidate::nms::suppress_adjacent;
pub use crate::image::resize::resize_u8_bilinear;
pub use crate::kernel::scalar::NccScalar;
pub use crate::kernel::{correlate, Kernel};
pub use crate::search::{resolve_index, ArtifactSink, DiscardArtifacts};
pub use crate::template::TemplatePlan;
