//! Image source port: retrieve raw image bytes from a URL.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::MockupError;

/// A request to fetch one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRequest {
    /// The URL extracted from the `/mockup` command.
    pub url: String,
}

/// An HTTP response as received, before any validation.
///
/// Carries everything an upstream retry policy needs: status, declared
/// content type and the body length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedImage {
    /// Final URL after redirects.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Declared `Content-Type`, if the server sent one.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Response body.
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl FetchedImage {
    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Boxed future type returned by [`ImageFetcher::fetch`].
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<FetchedImage, MockupError>> + Send + 'a>>;

/// Retrieves image bytes over the network.
///
/// Implementations fail only on transport problems (connection, timeout);
/// status and content checks belong to the caller.
pub trait ImageFetcher: Send + Sync {
    /// Fetch the resource at `request.url`.
    fn fetch(&self, request: &FetchRequest) -> FetchFuture<'_>;
}

/// Serde helper for serializing `Vec<u8>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as base64 string.
    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    /// Deserialize base64 string to bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(&s)
            .map_err(serde::de::Error::custom)
    }
}
