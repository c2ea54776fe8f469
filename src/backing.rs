use std::io;
use std::path::PathBuf;

use futures::future::{BoxFuture, FutureExt};
use tokio::task;

use crate::errors::StoreError;

pub mod memory;

/// One serialized collection value in one fixed location. The store
/// reads and replaces it wholesale; there is no per-record addressing
/// at this layer.
pub trait Backing: Send + Sync {
    /// Loads the raw collection value. `None` means the store has never
    /// been written, as opposed to a read failure.
    fn load(&self) -> BoxFuture<Result<Option<String>, StoreError>>;

    /// Replaces the raw collection value as one unit.
    fn save(&self, raw: String) -> BoxFuture<Result<(), StoreError>>;
}

/// The on-device backing: a single JSON file, replaced atomically on
/// every write.
pub struct FileBacking {
    path: PathBuf,
}

impl FileBacking {
    /// Creates a new instance persisting to the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileBacking { path: path.into() }
    }
}

impl Backing for FileBacking {
    fn load(&self) -> BoxFuture<Result<Option<String>, StoreError>> {
        load_file(self.path.clone()).boxed()
    }

    fn save(&self, raw: String) -> BoxFuture<Result<(), StoreError>> {
        save_file(self.path.clone(), raw).boxed()
    }
}

async fn load_file(path: PathBuf) -> Result<Option<String>, StoreError> {
    match tokio::fs::read_to_string(&path).await {
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Backing { source }),
    }
}

async fn save_file(path: PathBuf, raw: String) -> Result<(), StoreError> {
    let parent = match path.parent() {
        Some(parent) => parent.to_owned(),
        None => {
            let source = io::Error::new(
                io::ErrorKind::InvalidInput,
                "backing file has no parent directory",
            );
            return Err(StoreError::Backing { source });
        }
    };

    tokio::fs::create_dir_all(&parent)
        .await
        .map_err(|source| StoreError::Backing { source })?;

    // the write goes through a sibling temporary file and a rename, so
    // an interrupted write leaves the previous collection intact
    task::spawn_blocking(move || -> Result<(), io::Error> {
        use std::io::Write;

        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new_in(&parent)?;
        file.write_all(raw.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|e| e.error)?;

        Ok(())
    })
    .await
    .expect("join blocking write")
    .map_err(|source| StoreError::Backing { source })
}
