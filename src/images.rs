use std::path::Path;

use futures::future::{BoxFuture, FutureExt};
use uuid::Uuid;

use crate::errors::ImageError;
use crate::images::format::ImageFormat;
use crate::paths::ImagePaths;
use crate::record::ImageSource;

pub mod format;
pub mod passthrough;

/// Resolves transient image references into durable, record-scoped
/// ones, and releases them when the owning record goes away.
///
/// Adapter failures must never block record creation: the store
/// converts any `attach` error into the "no image" sentinel.
pub trait ImageStore: Send + Sync {
    /// Persists the referenced image for the given record and returns
    /// the stable reference to store on it.
    fn attach(&self, id: &Uuid, source: &ImageSource) -> BoxFuture<Result<String, ImageError>>;

    /// Releases a previously attached image. Tolerates references that
    /// are already gone.
    fn release(&self, uri: &str) -> BoxFuture<Result<(), ImageError>>;
}

/// The device image store: copies picked files into the app-owned
/// image directory under a name derived from the record ID.
pub struct DirectoryImages {
    paths: ImagePaths,
}

impl DirectoryImages {
    /// Creates a new instance over the given directory layout.
    pub fn new(paths: ImagePaths) -> Self {
        DirectoryImages { paths }
    }
}

impl ImageStore for DirectoryImages {
    fn attach(&self, id: &Uuid, source: &ImageSource) -> BoxFuture<Result<String, ImageError>> {
        copy_into(self.paths.clone(), *id, source.clone()).boxed()
    }

    fn release(&self, uri: &str) -> BoxFuture<Result<(), ImageError>> {
        remove_owned(uri.to_owned(), self.paths.owns(uri)).boxed()
    }
}

async fn copy_into(
    paths: ImagePaths,
    id: Uuid,
    source: ImageSource,
) -> Result<String, ImageError> {
    let path = match source {
        // inline data never touches the filesystem; it lives inside the record
        ImageSource::Encoded(encoded) => return Ok(encoded),
        ImageSource::File(path) => path,
    };

    let data = tokio::fs::read(&path)
        .await
        .map_err(|source| ImageError::SourceUnreadable { source })?;

    let extension = extension_for(&path, &data)?;
    let destination = paths.image(&id, &extension);

    tokio::fs::create_dir_all(paths.root())
        .await
        .map_err(|source| ImageError::CopyFailed { source })?;
    tokio::fs::write(&destination, &data)
        .await
        .map_err(|source| ImageError::CopyFailed { source })?;

    Ok(destination.to_string_lossy().into_owned())
}

/// The stored filename keeps the source's extension where it has one
/// and falls back to sniffing the bytes otherwise.
fn extension_for(path: &Path, data: &[u8]) -> Result<String, ImageError> {
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        return Ok(extension.to_ascii_lowercase());
    }

    ImageFormat::sniff(data)
        .map(|format| format.extension().to_owned())
        .ok_or(ImageError::UnrecognizedImageFormat)
}

async fn remove_owned(uri: String, owned: bool) -> Result<(), ImageError> {
    if !owned {
        return Ok(());
    }

    match tokio::fs::remove_file(&uri).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ImageError::ReleaseFailed { source }),
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{DirectoryImages, ImageStore};
    use crate::errors::ImageError;
    use crate::paths::ImagePaths;
    use crate::record::ImageSource;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n0000";

    fn store_in(dir: &tempfile::TempDir) -> DirectoryImages {
        DirectoryImages::new(ImagePaths::new(dir.path().join("coffee_images")))
    }

    #[tokio::test]
    async fn picked_files_are_copied_under_the_record_id() {
        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("photo.PNG");
        std::fs::write(&source_path, PNG_MAGIC).unwrap();

        let images = store_in(&dir);
        let id = Uuid::new_v4();

        let uri = images
            .attach(&id, &ImageSource::File(source_path))
            .await
            .expect("attach");

        assert!(uri.ends_with(&format!("{}.png", id)), "got {}", uri);
        assert_eq!(std::fs::read(&uri).unwrap(), PNG_MAGIC);
    }

    #[tokio::test]
    async fn extensionless_sources_are_sniffed() {
        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("picked");
        std::fs::write(&source_path, PNG_MAGIC).unwrap();

        let images = store_in(&dir);
        let id = Uuid::new_v4();

        let uri = images
            .attach(&id, &ImageSource::File(source_path))
            .await
            .expect("attach");

        assert!(uri.ends_with(&format!("{}.png", id)), "got {}", uri);
    }

    #[tokio::test]
    async fn unreadable_sources_fail_without_touching_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let images = store_in(&dir);

        let result = images
            .attach(
                &Uuid::new_v4(),
                &ImageSource::File(dir.path().join("no-such-photo.jpg")),
            )
            .await;

        match result {
            Err(ImageError::SourceUnreadable { .. }) => {}
            other => panic!("expected SourceUnreadable, got {:?}", other),
        }
        assert!(!dir.path().join("coffee_images").exists());
    }

    #[tokio::test]
    async fn inline_sources_pass_straight_through() {
        let dir = tempfile::tempdir().unwrap();
        let images = store_in(&dir);

        let uri = images
            .attach(
                &Uuid::new_v4(),
                &ImageSource::Encoded("data:image/png;base64,AAAA".to_owned()),
            )
            .await
            .expect("attach");

        assert_eq!(uri, "data:image/png;base64,AAAA");
    }

    #[tokio::test]
    async fn release_removes_owned_files_and_tolerates_missing_ones() {
        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("photo.jpg");
        std::fs::write(&source_path, &[0xff, 0xd8, 0xff, 0xe0]).unwrap();

        let images = store_in(&dir);
        let id = Uuid::new_v4();
        let uri = images
            .attach(&id, &ImageSource::File(source_path))
            .await
            .expect("attach");

        images.release(&uri).await.expect("release");
        assert!(!std::path::Path::new(&uri).exists());

        // releasing again is a no-op
        images.release(&uri).await.expect("release again");
    }

    #[tokio::test]
    async fn release_leaves_foreign_paths_alone() {
        let dir = tempfile::tempdir().unwrap();
        let foreign = dir.path().join("keep.png");
        std::fs::write(&foreign, PNG_MAGIC).unwrap();

        let images = store_in(&dir);
        images
            .release(foreign.to_str().unwrap())
            .await
            .expect("release");

        assert!(foreign.exists());
    }
}
