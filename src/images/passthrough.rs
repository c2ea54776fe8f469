use futures::future::{BoxFuture, FutureExt};
use mime::Mime;
use url::Url;
use uuid::Uuid;

use crate::errors::ImageError;
use crate::images::ImageStore;
use crate::record::ImageSource;

/// The browser image store: inline-encoded images and URLs are already
/// as durable as this layer can make them, so they pass through
/// unchanged. The key-value layer underneath persists whatever the
/// record carries.
#[derive(Default)]
pub struct PassthroughImages;

impl PassthroughImages {
    pub fn new() -> Self {
        PassthroughImages
    }
}

impl ImageStore for PassthroughImages {
    fn attach(&self, _id: &Uuid, source: &ImageSource) -> BoxFuture<Result<String, ImageError>> {
        let result = match source {
            ImageSource::Encoded(encoded) => pass_through(encoded),
            // the browser layer has no way to copy device files
            ImageSource::File(_) => Err(ImageError::UnsupportedSource),
        };

        async move { result }.boxed()
    }

    fn release(&self, _uri: &str) -> BoxFuture<Result<(), ImageError>> {
        async move { Ok(()) }.boxed()
    }
}

/// Returns the reference unchanged once it looks like something a
/// record can carry: a `data:` URI with an image media type, or a URL.
fn pass_through(encoded: &str) -> Result<String, ImageError> {
    if let Some(rest) = encoded.strip_prefix("data:") {
        let media_type = rest.split(|c| c == ';' || c == ',').next().unwrap_or("");
        let parsed: Mime = media_type
            .parse()
            .map_err(|_| ImageError::UnrecognizedImageFormat)?;

        if parsed.type_() != mime::IMAGE {
            return Err(ImageError::UnrecognizedImageFormat);
        }

        return Ok(encoded.to_owned());
    }

    Url::parse(encoded)
        .map(|_| encoded.to_owned())
        .map_err(|_| ImageError::UnsupportedSource)
}
