use std::path::{Path, PathBuf};

use uuid::Uuid;

/// The app-owned directory attached images are copied into, under the
/// data directory.
pub const IMAGE_DIR: &str = "coffee_images";

/// Convenience wrapper for image path generation.
#[derive(Clone, Debug)]
pub struct ImagePaths {
    /// Directory all attached images live in.
    root: PathBuf,
}

impl ImagePaths {
    /// Create a new instance rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ImagePaths { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The stable path for a record's image with the given extension.
    pub fn image(&self, id: &Uuid, extension: &str) -> PathBuf {
        self.root.join(format!("{}.{}", id, extension))
    }

    /// Whether a URI refers to a file this directory owns. Inline
    /// references and foreign paths are not ours to touch.
    pub fn owns(&self, uri: &str) -> bool {
        Path::new(uri).parent() == Some(self.root.as_path())
    }
}
