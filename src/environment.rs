use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use log::Logger;

use crate::backing::{memory::MemoryBacking, Backing, FileBacking};
use crate::images::{passthrough::PassthroughImages, DirectoryImages, ImageStore};
use crate::paths::{ImagePaths, IMAGE_DIR};

/// The file the collection lives in under the data directory (device)
/// or the namespace key it lives under (browser).
pub const COLLECTION_KEY: &str = "journal.json";

/// Everything the store needs, constructed once at application start
/// and handed to consumers explicitly.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub backing: Arc<dyn Backing>,
    pub images: Arc<dyn ImageStore>,
    pub config: Config,
}

impl Environment {
    /// Creates a new instance from already-selected adapters.
    pub fn new(
        logger: Arc<Logger>,
        backing: Arc<dyn Backing>,
        images: Arc<dyn ImageStore>,
        config: Config,
    ) -> Self {
        Self {
            logger,
            backing,
            images,
            config,
        }
    }

    /// Selects the backing and image adapters for the configured
    /// platform. The selection is fixed for the life of the process.
    pub fn from_config(logger: Arc<Logger>, config: Config) -> Self {
        let (backing, images): (Arc<dyn Backing>, Arc<dyn ImageStore>) = match config.storage {
            StorageKind::Device => (
                Arc::new(FileBacking::new(config.data_dir.join(COLLECTION_KEY))),
                Arc::new(DirectoryImages::new(ImagePaths::new(
                    config.data_dir.join(IMAGE_DIR),
                ))),
            ),
            StorageKind::Browser => (
                Arc::new(MemoryBacking::new(COLLECTION_KEY)),
                Arc::new(PassthroughImages::new()),
            ),
        };

        Environment::new(logger, backing, images, config)
    }
}

/// Which adapter pair to run on, decided by the host platform.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StorageKind {
    /// A native device: structured file store and filesystem images.
    Device,

    /// A browser session: key-value namespace and pass-through images.
    Browser,
}

impl FromStr for StorageKind {
    type Err = ParseStorageKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "device" => Ok(StorageKind::Device),
            "browser" => Ok(StorageKind::Browser),
            _ => Err(ParseStorageKindError),
        }
    }
}

#[derive(Debug)]
pub struct ParseStorageKindError;

#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) storage: StorageKind,
    pub(crate) data_dir: PathBuf,
}

impl Config {
    pub fn new(storage: StorageKind, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            data_dir: data_dir.into(),
        }
    }

    pub fn storage(&self) -> StorageKind {
        self.storage
    }
}
