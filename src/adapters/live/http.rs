//! Live adapter fetching images over HTTP(S).

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::warn;

use crate::error::MockupError;
use crate::ports::image_source::{FetchFuture, FetchRequest, FetchedImage, ImageFetcher};

/// Browser-like identity; some image hosts reject default client agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Upper bound on the whole request, connect through body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Live image fetcher backed by `reqwest`.
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Create a fetcher sending `user_agent` and giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// initialisation failure).
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, MockupError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| MockupError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, request: &FetchRequest) -> FetchFuture<'_> {
        let url = request.url.clone();
        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| network(&url, &e))?;

            let status = response.status().as_u16();
            let final_url = response.url().to_string();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let data = response
                .bytes()
                .await
                .map_err(|e| network(&url, &e))?
                .to_vec();

            Ok(FetchedImage {
                url: final_url,
                status,
                content_type,
                data,
            })
        })
    }
}

fn network(url: &str, e: &reqwest::Error) -> MockupError {
    let timed_out = e.is_timeout();
    if timed_out {
        warn!(url, "image fetch timed out");
    }
    MockupError::Network {
        url: url.to_string(),
        status: e.status().map(|s| s.as_u16()),
        timed_out,
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::thread;
    use std::time::Instant;

    use super::*;
    use crate::adapters::live::test_server::{response, serve_once};
    use crate::fetch::fetch_image;

    fn fetcher(timeout: Duration) -> HttpImageFetcher {
        HttpImageFetcher::new(DEFAULT_USER_AGENT, timeout).unwrap()
    }

    fn request(url: String) -> FetchRequest {
        FetchRequest { url }
    }

    #[tokio::test]
    async fn returns_status_content_type_and_body() {
        let (addr, requests) = serve_once(|_, _| {
            response("200 OK", &[("Content-Type", "text/html")], b"<html>")
        });

        let fetched = fetcher(DEFAULT_TIMEOUT)
            .fetch(&request(format!("http://{addr}/page")))
            .await
            .unwrap();
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.content_type.as_deref(), Some("text/html"));
        assert_eq!(fetched.data, b"<html>");

        let request = requests.recv().unwrap().to_ascii_lowercase();
        let user_agent = format!("user-agent: {}", DEFAULT_USER_AGENT.to_ascii_lowercase());
        assert!(request.starts_with("get /page "));
        assert!(request.contains(&user_agent));
    }

    #[tokio::test]
    async fn html_response_is_rejected_as_not_an_image() {
        let (addr, _requests) = serve_once(|_, _| {
            let headers = [("Content-Type", "text/html; charset=utf-8")];
            response("200 OK", &headers, b"<html></html>")
        });

        let err = fetch_image(&fetcher(DEFAULT_TIMEOUT), &format!("http://{addr}/"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, MockupError::NotAnImage { byte_len: 13, .. }),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let (addr, _requests) = serve_once(|_, _| response("503 Service Unavailable", &[], b""));

        let err = fetch_image(&fetcher(DEFAULT_TIMEOUT), &format!("http://{addr}/"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, MockupError::Network { status: Some(503), .. }),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn silent_server_times_out_as_network_error() {
        let (addr, _requests) = serve_once(|_, _| {
            // Hold the connection open without answering.
            thread::sleep(Duration::from_secs(5));
            Vec::new()
        });

        let started = Instant::now();
        let err = fetcher(Duration::from_millis(300))
            .fetch(&request(format!("http://{addr}/slow.png")))
            .await
            .unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(4));
        assert!(
            matches!(err, MockupError::Network { timed_out: true, status: None, .. }),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let err = fetcher(DEFAULT_TIMEOUT)
            .fetch(&request(format!("http://{addr}/gone.png")))
            .await
            .unwrap_err();
        assert!(
            matches!(err, MockupError::Network { timed_out: false, .. }),
            "{err:?}"
        );
    }
}
