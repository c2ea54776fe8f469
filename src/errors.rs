use std::io;

use thiserror::Error;

/// Enumerates high-level errors returned by the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Represents a failure of the backing storage itself.
    #[error("backing storage error")]
    Backing { source: io::Error },

    /// Represents a persisted collection value that could not be decoded.
    #[error("malformed collection data")]
    MalformedCollection { source: serde_json::Error },

    /// Represents a collection envelope written by a schema this build
    /// does not understand.
    #[error("unsupported collection schema {0}")]
    UnsupportedSchema(u32),

    /// Represents a failure to serialize the collection for writing.
    #[error("could not serialize collection")]
    Serialize { source: serde_json::Error },
}

/// Enumerates errors returned by the image adapters.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Represents a source reference that could not be read.
    #[error("could not read image source")]
    SourceUnreadable { source: io::Error },

    /// Represents a failure to copy the image into the app-owned
    /// directory.
    #[error("could not copy image into storage")]
    CopyFailed { source: io::Error },

    /// Represents image data in no recognized container format.
    #[error("unrecognized image format")]
    UnrecognizedImageFormat,

    /// Represents a source kind this adapter cannot persist.
    #[error("unsupported image source")]
    UnsupportedSource,

    /// Represents a failure to remove a previously attached image.
    #[error("could not release image")]
    ReleaseFailed { source: io::Error },
}
