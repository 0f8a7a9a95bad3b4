//! Service context that bundles all port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::adapters::live::file::FileSink;
use crate::adapters::live::github::{GitHubCommentSink, GitHubTarget};
use crate::adapters::live::http::HttpImageFetcher;
use crate::adapters::recording::image_fetcher::RecordingImageFetcher;
use crate::adapters::replaying::image_fetcher::ReplayingImageFetcher;
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::Config;
use crate::error::MockupError;
use crate::ports::{ImageFetcher, ResultSink};

/// Bundles all port trait objects into a single context.
pub struct ServiceContext {
    /// Image source port.
    pub fetcher: Box<dyn ImageFetcher>,
    /// Result sink port.
    pub sink: Box<dyn ResultSink>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder
            .finish()
            .map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Create a live context: HTTP fetcher plus the requested sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or posting is
    /// requested without GitHub credentials.
    pub fn live(config: &Config, timeout: Duration, post: bool) -> Result<Self, MockupError> {
        let fetcher = Box::new(HttpImageFetcher::new(&config.fetch.user_agent, timeout)?);
        Ok(Self {
            fetcher,
            sink: sink(config, post, timeout)?,
        })
    }

    /// Create a recording context that wraps the live fetcher with a recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the live context cannot be created.
    pub fn recording(
        config: &Config,
        timeout: Duration,
        post: bool,
    ) -> Result<(Self, RecordingSession), MockupError> {
        let live_ctx = Self::live(config, timeout, post)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = PathBuf::from(".mockup/cassettes").join(&timestamp);

        let commit = get_commit_hash();
        let path = output_dir.join("image_fetcher.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-image_fetcher"),
            &commit,
        )));

        let fetcher = RecordingImageFetcher::new(live_ctx.fetcher, Arc::clone(&recorder));

        let ctx = Self {
            fetcher: Box::new(fetcher),
            sink: live_ctx.sink,
        };
        let session = RecordingSession { recorder };

        Ok((ctx, session))
    }

    /// Create a replaying context: fetches come from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded or the sink
    /// cannot be created.
    pub fn replaying(
        path: &Path,
        config: &Config,
        timeout: Duration,
        post: bool,
    ) -> Result<Self, MockupError> {
        let replayer = load_cassette(path)
            .map_err(|e| MockupError::Config(format!("Failed to load cassette: {e}")))?;
        let fetcher = Box::new(ReplayingImageFetcher::new(Arc::new(Mutex::new(replayer))));
        Ok(Self {
            fetcher,
            sink: sink(config, post, timeout)?,
        })
    }
}

/// Pick the sink: GitHub comments when posting, local file otherwise.
///
/// `timeout` bounds each GitHub API request.
fn sink(
    config: &Config,
    post: bool,
    timeout: Duration,
) -> Result<Box<dyn ResultSink>, MockupError> {
    if !post {
        return Ok(Box::new(FileSink));
    }
    let token = config.github_token().ok_or(MockupError::MissingCredential {
        what: "GitHub token".into(),
        env_var: "GITHUB_TOKEN".into(),
    })?;
    let repository = config.github_repository().ok_or(MockupError::MissingCredential {
        what: "GitHub repository".into(),
        env_var: "GITHUB_REPOSITORY".into(),
    })?;
    let target = GitHubTarget {
        api_base: config.github.api_base.clone(),
        repository,
        token,
        image_base_url: config.github.image_base_url.clone(),
    };
    Ok(Box::new(GitHubCommentSink::new(target, timeout)?))
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
