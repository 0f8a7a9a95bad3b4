//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::adapters::live::github::GITHUB_API_BASE;
use crate::adapters::live::http::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Image download settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Frame template settings.
    #[serde(default)]
    pub template: TemplateConfig,

    /// Result file settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Comment delivery settings.
    #[serde(default)]
    pub github: GitHubConfig,
}

/// Image download settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// `User-Agent` sent with the download.
    pub user_agent: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl FetchConfig {
    /// The configured timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Frame template settings.
#[derive(Debug, Default, Deserialize)]
pub struct TemplateConfig {
    /// Primary template location, tried before the built-in fallbacks.
    pub path: Option<PathBuf>,
}

/// Result file settings.
#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Where the PNG is written.
    pub path: Option<String>,
}

/// Comment delivery settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// REST API base URL.
    pub api_base: String,
    /// `owner/repo` to comment on.
    pub repository: Option<String>,
    /// API token.
    pub token: Option<String>,
    /// Public base URL the result PNG is published under.
    pub image_base_url: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: GITHUB_API_BASE.to_string(),
            repository: None,
            token: None,
            image_base_url: None,
        }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// fetch timeout is zero.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
        if config.fetch.timeout_secs == 0 {
            return Err(format!(
                "fetch.timeout_secs must be positive in {}",
                path.display()
            ));
        }
        Ok(config)
    }

    /// Get the GitHub token, preferring environment variable.
    #[must_use]
    pub fn github_token(&self) -> Option<String> {
        std::env::var("GITHUB_TOKEN")
            .ok()
            .or_else(|| self.github.token.clone())
    }

    /// Get the target repository, preferring environment variable.
    #[must_use]
    pub fn github_repository(&self) -> Option<String> {
        std::env::var("GITHUB_REPOSITORY")
            .ok()
            .or_else(|| self.github.repository.clone())
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `MOCKUP_CONFIG` environment variable
/// 3. `~/.config/phone-mockup/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("MOCKUP_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

/// Default config path: `~/.config/phone-mockup/config.toml`.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/phone-mockup/config.toml")
    } else {
        PathBuf::from("phone-mockup.toml")
    }
}
