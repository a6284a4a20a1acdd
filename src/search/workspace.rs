//! Per-request scratch directory for intermediate artifacts.
//!
//! Each workspace gets `<root>/<request_id>-<uuid>/`, so concurrent requests
//! never share intermediate file names, even when they reuse an identifier. The directory is removed when the
//! workspace is dropped unless [`RequestWorkspace::persist`] was called.

use crate::image::io::save_gray_image;
use crate::search::planner::ArtifactSink;
use crate::template::Template;
use crate::trace::trace_event;
use crate::util::{ImageWithinError, ImageWithinResult};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Scoped working directory owned by a single request.
#[derive(Debug)]
pub struct RequestWorkspace {
    dir: PathBuf,
    keep: bool,
}

impl RequestWorkspace {
    /// Creates a fresh `<root>/<request_id>-<uuid>/` directory.
    ///
    /// The identifier must be a single path component made of ASCII
    /// alphanumerics, `-`, `_`, or `.`.
    pub fn create(root: &Path, request_id: &str) -> ImageWithinResult<Self> {
        let valid = !request_id.is_empty()
            && request_id != "."
            && request_id != ".."
            && request_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(ImageWithinError::InvalidRequestId(request_id.to_owned()));
        }

        let dir = root.join(format!("{request_id}-{}", Uuid::new_v4().simple()));
        fs::create_dir_all(&dir).map_err(|err| ImageWithinError::Workspace {
            reason: format!("{}: {err}", dir.display()),
        })?;
        Ok(Self { dir, keep: false })
    }

    /// Returns the directory path.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Keeps the directory on disk after the workspace is dropped.
    pub fn persist(&mut self) {
        self.keep = true;
    }

    /// Path used for the template resampled by `scale`.
    pub fn template_path(&self, scale: f32) -> PathBuf {
        self.dir.join(format!("scale-{scale}-template.png"))
    }
}

impl ArtifactSink for RequestWorkspace {
    fn scaled_template(&mut self, scale: f32, template: &Template) -> ImageWithinResult<()> {
        let path = self.template_path(scale);
        save_gray_image(template.image(), &path)?;
        trace_event!("scaled_template_saved", scale = scale);
        Ok(())
    }
}

impl Drop for RequestWorkspace {
    fn drop(&mut self) {
        if !self.keep {
            // Removal failures are ignored.
            let _ = fs::remove_dir_all(&self.dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RequestWorkspace;
    use crate::search::planner::ArtifactSink;
    use crate::template::Template;
    use crate::util::ImageWithinError;
    use std::path::PathBuf;

    fn scratch_root(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("imagewithin-ws-{name}-{}", std::process::id()))
    }

    #[test]
    fn directory_is_removed_on_drop() {
        let root = scratch_root("drop");
        let dir = {
            let mut ws = RequestWorkspace::create(&root, "req-a").unwrap();
            let tpl = Template::new(vec![1, 2, 3, 4], 2, 2).unwrap();
            ws.scaled_template(0.7, &tpl).unwrap();
            assert!(ws.template_path(0.7).is_file());
            assert!(ws.template_path(0.7).ends_with("scale-0.7-template.png"));
            ws.path().to_path_buf()
        };
        assert!(!dir.exists());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn persisted_directory_survives_drop() {
        let root = scratch_root("keep");
        let dir = {
            let mut ws = RequestWorkspace::create(&root, "req-b").unwrap();
            ws.persist();
            ws.path().to_path_buf()
        };
        assert!(dir.is_dir());
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn same_request_id_gets_separate_directories() {
        let root = scratch_root("shared");
        let tpl = Template::new(vec![1, 2, 3, 4], 2, 2).unwrap();
        let mut first = RequestWorkspace::create(&root, "-").unwrap();
        let mut second = RequestWorkspace::create(&root, "-").unwrap();
        assert_ne!(first.path(), second.path());
        assert!(first.path().starts_with(&root));

        first.scaled_template(0.5, &tpl).unwrap();
        second.scaled_template(0.5, &tpl).unwrap();
        let second_file = second.template_path(0.5);
        drop(first);
        assert!(second_file.is_file());
        drop(second);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn rejects_path_like_request_ids() {
        let root = scratch_root("reject");
        for bad in ["", "..", "a/b", "a\\b"] {
            assert_eq!(
                RequestWorkspace::create(&root, bad).unwrap_err(),
                ImageWithinError::InvalidRequestId(bad.to_owned())
            );
        }
    }
}
