//! Recording adapter for the `ImageFetcher` port.

use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::cassette::format::Outcome;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::image_source::{FetchFuture, FetchRequest, ImageFetcher};

/// Records every fetch while delegating to an inner implementation.
pub struct RecordingImageFetcher {
    inner: Box<dyn ImageFetcher>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingImageFetcher {
    /// Creates a new recording fetcher wrapping the given implementation.
    pub fn new(inner: Box<dyn ImageFetcher>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ImageFetcher for RecordingImageFetcher {
    fn fetch(&self, request: &FetchRequest) -> FetchFuture<'_> {
        let request = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.fetch(&request).await;
            match recorder.lock() {
                Ok(mut guard) => guard.record(request.url.clone(), Outcome::from_result(&result)),
                Err(e) => warn!(error = %e, "recorder lock poisoned; fetch not recorded"),
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MockupError;

    struct Failing;

    impl ImageFetcher for Failing {
        fn fetch(&self, request: &FetchRequest) -> FetchFuture<'_> {
            let url = request.url.clone();
            Box::pin(async move {
                Err(MockupError::Network {
                    url,
                    status: None,
                    timed_out: true,
                    message: "slow".into(),
                })
            })
        }
    }

    #[tokio::test]
    async fn failures_are_recorded_and_passed_through() {
        let dir = std::env::temp_dir().join("mockup_recording_fetcher_test");
        let path = dir.join("image_fetcher.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "t", "abc")));
        let fetcher = RecordingImageFetcher::new(Box::new(Failing), Arc::clone(&recorder));

        let request = FetchRequest {
            url: "https://x/slow.png".into(),
        };
        let err = fetcher.fetch(&request).await.unwrap_err();
        assert!(matches!(err, MockupError::Network { timed_out: true, .. }));
        drop(fetcher);

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("https://x/slow.png"));
        assert!(content.contains("timed_out: true"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
