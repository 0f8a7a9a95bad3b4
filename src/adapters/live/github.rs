//! Live sink posting the mockup as a GitHub issue comment.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::MockupError;
use crate::ports::result_sink::{DeliverFuture, Delivery, DeliveryReceipt, ResultSink};

/// Default REST endpoint.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Where and as whom to post.
#[derive(Debug, Clone)]
pub struct GitHubTarget {
    /// REST API base URL, without trailing slash.
    pub api_base: String,
    /// `owner/repo`.
    pub repository: String,
    /// Token with `issues: write`.
    pub token: String,
    /// Public base URL the PNG is published under, if any.
    pub image_base_url: Option<String>,
}

/// Posts a comment on the originating issue.
///
/// GitHub has no REST endpoint for attaching images to comments, so the PNG
/// must already be reachable somewhere: when `image_base_url` is set the
/// comment embeds `{image_base_url}/{file name}`, otherwise it names the file
/// so it can be found among the run's artifacts.
pub struct GitHubCommentSink {
    client: Client,
    target: GitHubTarget,
}

impl GitHubCommentSink {
    /// Create a sink for the given repository, giving up on the API after
    /// `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(target: GitHubTarget, timeout: Duration) -> Result<Self, MockupError> {
        let client = Client::builder()
            .user_agent(concat!("phone-mockup/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| MockupError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, target })
    }
}

/// Markdown body of the result comment.
#[must_use]
pub fn comment_body(png_path: &Path, image_base_url: Option<&str>) -> String {
    let file_name = png_path.file_name().unwrap_or_default().to_string_lossy();
    match image_base_url {
        Some(base) => format!(
            "🎨 Here is your generated mockup!\n\n![Mockup]({}/{file_name})",
            base.trim_end_matches('/')
        ),
        None => format!(
            "🎨 Your mockup has been generated as `{file_name}`. \
             Download it from this run's artifacts."
        ),
    }
}

impl ResultSink for GitHubCommentSink {
    fn deliver(&self, delivery: &Delivery) -> DeliverFuture<'_> {
        let delivery = delivery.clone();
        Box::pin(async move {
            let issue = delivery.target.ok_or_else(|| {
                MockupError::InvalidArgument("an issue number is required to post a comment".into())
            })?;
            let url = format!(
                "{}/repos/{}/issues/{issue}/comments",
                self.target.api_base.trim_end_matches('/'),
                self.target.repository
            );
            let body = serde_json::json!({
                "body": comment_body(&delivery.png_path, self.target.image_base_url.as_deref()),
            });

            let response = self
                .client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.target.token))
                .header("Accept", "application/vnd.github+json")
                .json(&body)
                .send()
                .await
                .map_err(|e| transport_error(&e))?;

            let status = response.status();
            let response_text = response
                .text()
                .await
                .map_err(|e| MockupError::Delivery {
                    status: status.as_u16(),
                    message: e.to_string(),
                })?;

            if status.as_u16() != 201 {
                return Err(MockupError::Delivery {
                    status: status.as_u16(),
                    message: response_text,
                });
            }

            let created: CreatedComment =
                serde_json::from_str(&response_text).map_err(|e| MockupError::Delivery {
                    status: 201,
                    message: format!("Failed to parse response: {e}"),
                })?;
            info!(issue = %issue, url = %created.html_url, "mockup comment posted");
            Ok(DeliveryReceipt::Posted {
                url: created.html_url,
            })
        })
    }
}

fn transport_error(e: &reqwest::Error) -> MockupError {
    let message = if e.is_timeout() {
        warn!("GitHub API request timed out");
        format!("request timed out: {e}")
    } else {
        e.to_string()
    };
    MockupError::Delivery { status: 0, message }
}

// --- GitHub API response types ---

#[derive(Deserialize)]
struct CreatedComment {
    html_url: String,
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::thread;
    use std::time::Instant;

    use super::*;
    use crate::adapters::live::test_server::{response, serve_once};

    fn sink_with_timeout(
        api_base: String,
        image_base_url: Option<&str>,
        timeout: Duration,
    ) -> GitHubCommentSink {
        let target = GitHubTarget {
            api_base,
            repository: "octo/mockups".into(),
            token: "t0ken".into(),
            image_base_url: image_base_url.map(str::to_string),
        };
        GitHubCommentSink::new(target, timeout).unwrap()
    }

    fn sink(api_base: String, image_base_url: Option<&str>) -> GitHubCommentSink {
        sink_with_timeout(api_base, image_base_url, Duration::from_secs(30))
    }

    fn delivery(target: Option<&str>) -> Delivery {
        Delivery {
            target: target.map(str::to_string),
            png_path: PathBuf::from("out/mockup_result.png"),
        }
    }

    #[test]
    fn body_links_published_image() {
        let base = "https://cdn.example/runs/9/";
        let body = comment_body(Path::new("out/m.png"), Some(base));
        assert!(body.ends_with("![Mockup](https://cdn.example/runs/9/m.png)"));
    }

    #[test]
    fn body_without_base_names_the_file() {
        let body = comment_body(Path::new("out/m.png"), None);
        assert!(body.contains("`m.png`"));
        assert!(!body.contains("{image_url}"));
        assert!(!body.contains("!["));
    }

    #[tokio::test]
    async fn posts_comment_to_issue() {
        let (addr, requests) = serve_once(|_, _| {
            response(
                "201 Created",
                &[("Content-Type", "application/json")],
                br#"{"id": 1, "html_url": "https://github.com/octo/mockups/issues/42#issuecomment-1"}"#,
            )
        });

        let receipt = sink(format!("http://{addr}"), Some("https://cdn.example"))
            .deliver(&delivery(Some("42")))
            .await
            .unwrap();
        assert_eq!(
            receipt,
            DeliveryReceipt::Posted {
                url: "https://github.com/octo/mockups/issues/42#issuecomment-1".into()
            }
        );

        let request = requests.recv().unwrap();
        assert!(request.starts_with("POST /repos/octo/mockups/issues/42/comments "));
        let lower = request.to_ascii_lowercase();
        assert!(lower.contains("authorization: bearer t0ken"));
        assert!(lower.contains("accept: application/vnd.github+json"));
        assert!(request.contains("https://cdn.example/mockup_result.png"));
    }

    #[tokio::test]
    async fn rejected_post_is_delivery_error() {
        let (addr, _requests) = serve_once(|_, _| {
            response(
                "403 Forbidden",
                &[],
                br#"{"message": "Resource not accessible"}"#,
            )
        });

        let err = sink(format!("http://{addr}"), None)
            .deliver(&delivery(Some("1")))
            .await
            .unwrap_err();
        match err {
            MockupError::Delivery { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("Resource not accessible"));
            }
            other => panic!("expected Delivery, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_issue_number_is_rejected_before_posting() {
        let err = sink("http://127.0.0.1:9".into(), None)
            .deliver(&delivery(None))
            .await
            .unwrap_err();
        assert!(matches!(err, MockupError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn stalled_api_times_out_as_delivery_error() {
        let (addr, _requests) = serve_once(|_, _| {
            // Accept the comment but never answer.
            thread::sleep(Duration::from_secs(5));
            Vec::new()
        });

        let started = Instant::now();
        let base = format!("http://{addr}");
        let err = sink_with_timeout(base, None, Duration::from_millis(300))
            .deliver(&delivery(Some("42")))
            .await
            .unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(4));
        match err {
            MockupError::Delivery { status, message } => {
                assert_eq!(status, 0);
                assert!(message.contains("timed out"), "{message}");
            }
            other => panic!("expected Delivery, got {other:?}"),
        }
    }
}
