//! Replaying adapter for the `ImageFetcher` port.

use std::sync::{Arc, Mutex};

use crate::cassette::replayer::CassetteReplayer;
use crate::error::MockupError;
use crate::ports::image_source::{FetchFuture, FetchRequest, ImageFetcher};

/// Serves recorded fetch results from a cassette; never touches the network.
pub struct ReplayingImageFetcher {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingImageFetcher {
    /// Create a replaying fetcher backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl ImageFetcher for ReplayingImageFetcher {
    fn fetch(&self, request: &FetchRequest) -> FetchFuture<'_> {
        let url = request.url.clone();
        let outcome = self
            .replayer
            .lock()
            .map_err(|e| format!("Replayer lock poisoned: {e}"))
            .and_then(|mut guard| guard.next_outcome(&url));
        Box::pin(async move { outcome.map_err(MockupError::Config)?.into_result(&url) })
    }
}
