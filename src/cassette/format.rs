//! On-disk cassette layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MockupError;
use crate::ports::FetchedImage;

/// A recorded session: every image fetch in call order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable session name.
    pub name: String,
    /// When the recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Git commit the recording was made from.
    pub commit: String,
    /// Recorded fetches.
    #[serde(default)]
    pub exchanges: Vec<Exchange>,
}

/// One fetch and what came back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    /// Position within the cassette.
    pub seq: u64,
    /// Requested URL.
    pub url: String,
    /// Recorded result.
    pub outcome: Outcome,
}

/// A fetch result as stored on disk.
///
/// Only transport failures are recorded as failures; HTTP errors and non-image
/// bodies are ordinary responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// A response was received.
    Response(FetchedImage),
    /// The request failed before a response arrived.
    Failure {
        /// Whether the fetch timeout fired.
        #[serde(default)]
        timed_out: bool,
        /// Transport message.
        message: String,
    },
}

impl Outcome {
    /// Capture a live fetch result.
    #[must_use]
    pub fn from_result(result: &Result<FetchedImage, MockupError>) -> Self {
        match result {
            Ok(fetched) => Self::Response(fetched.clone()),
            Err(MockupError::Network {
                timed_out,
                message,
                ..
            }) => Self::Failure {
                timed_out: *timed_out,
                message: message.clone(),
            },
            Err(other) => Self::Failure {
                timed_out: false,
                message: other.to_string(),
            },
        }
    }

    /// Turn the stored outcome back into the result the live fetcher produced.
    ///
    /// # Errors
    ///
    /// Recorded failures come back as [`MockupError::Network`].
    pub fn into_result(self, url: &str) -> Result<FetchedImage, MockupError> {
        match self {
            Self::Response(fetched) => Ok(fetched),
            Self::Failure { timed_out, message } => Err(MockupError::Network {
                url: url.to_string(),
                status: None,
                timed_out,
                message,
            }),
        }
    }
}
