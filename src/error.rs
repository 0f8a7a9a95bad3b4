//! Unified error type for the mockup pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a mockup invocation.
#[derive(Debug, Error)]
pub enum MockupError {
    /// The input text carries no `/mockup <url>` command.
    #[error("No /mockup command with an http(s) URL found in the message")]
    CommandNotFound,

    /// The image could not be retrieved: transport failure, timeout or non-2xx status.
    #[error("Network error fetching {url}{}: {message}", status_suffix(.status))]
    Network {
        /// The requested URL.
        url: String,
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Whether the request was aborted by the fetch timeout.
        timed_out: bool,
        /// Transport or server message.
        message: String,
    },

    /// The response is not a usable image.
    #[error("Not an image at {url} (Content-Type: {}, {byte_len} bytes): {reason}", or_none(.content_type))]
    NotAnImage {
        /// The requested URL.
        url: String,
        /// The declared content type, if any.
        content_type: Option<String>,
        /// Size of the response body.
        byte_len: usize,
        /// Why the body was rejected.
        reason: String,
    },

    /// No readable template exists at any candidate location.
    #[error("Mockup template not found. Paths tried: {}", display_paths(.tried))]
    TemplateMissing {
        /// Every candidate path, in lookup order.
        tried: Vec<PathBuf>,
    },

    /// The template does not match the configured phone dimensions.
    #[error("Template {} is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}", .path.display())]
    TemplateSize {
        /// The template that was loaded.
        path: PathBuf,
        /// Expected width.
        expected_width: u32,
        /// Expected height.
        expected_height: u32,
        /// Actual width.
        actual_width: u32,
        /// Actual height.
        actual_height: u32,
    },

    /// The screen geometry violates its invariants.
    #[error("Invalid screen geometry: {0}")]
    InvalidGeometry(String),

    /// The trigger event payload could not be read.
    #[error("Event error: {0}")]
    Event(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// PNG encoding of the composite failed.
    #[error("Image encoding error: {0}")]
    Encode(String),

    /// The result sink rejected the delivery.
    #[error("Delivery failed ({status}): {message}")]
    Delivery {
        /// HTTP status code, 0 when no response was received.
        status: u16,
        /// Error message from the sink.
        message: String,
    },

    /// A credential needed for delivery is not configured.
    #[error("No {what} configured. Set {env_var} or add it to config file.")]
    MissingCredential {
        /// What is missing.
        what: String,
        /// The environment variable name.
        env_var: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MockupError {
    /// Whether this error means "nothing was requested" rather than a failure.
    #[must_use]
    pub fn is_no_action(&self) -> bool {
        matches!(self, Self::CommandNotFound)
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

fn or_none(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("<none>")
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
