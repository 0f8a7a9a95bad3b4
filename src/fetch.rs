//! Source image retrieval and validation.

use image::DynamicImage;
use tracing::{debug, info};

use crate::error::MockupError;
use crate::ports::{FetchRequest, FetchedImage, ImageFetcher};

/// Fetch `url` through `fetcher` and decode the body as an image.
///
/// # Errors
///
/// [`MockupError::Network`] for transport failures, timeouts and non-2xx
/// responses; [`MockupError::NotAnImage`] when the response is not a decodable
/// image.
pub async fn fetch_image(
    fetcher: &dyn ImageFetcher,
    url: &str,
) -> Result<DynamicImage, MockupError> {
    info!(url, "downloading source image");
    let request = FetchRequest {
        url: url.to_string(),
    };
    let fetched = fetcher.fetch(&request).await?;
    decode_fetched(&fetched)
}

/// Validate a fetched response and decode it.
///
/// Checks run in order: HTTP status, declared content type (`image/*`),
/// non-empty body, decodability.
///
/// # Errors
///
/// See [`fetch_image`].
pub fn decode_fetched(fetched: &FetchedImage) -> Result<DynamicImage, MockupError> {
    let byte_len = fetched.data.len();
    debug!(
        status = fetched.status,
        content_type = fetched.content_type.as_deref().unwrap_or(""),
        byte_len,
        "response received"
    );

    if !fetched.is_success() {
        return Err(MockupError::Network {
            url: fetched.url.clone(),
            status: Some(fetched.status),
            timed_out: false,
            message: "server returned a non-success status".into(),
        });
    }

    let not_an_image = |reason: String| MockupError::NotAnImage {
        url: fetched.url.clone(),
        content_type: fetched.content_type.clone(),
        byte_len,
        reason,
    };

    let declared = fetched.content_type.as_deref().unwrap_or("");
    if !is_image_content_type(declared) {
        return Err(not_an_image("content type is not image/*".into()));
    }
    if byte_len == 0 {
        return Err(not_an_image("response body is empty".into()));
    }

    let format = image::guess_format(&fetched.data).ok();
    let img = image::load_from_memory(&fetched.data)
        .map_err(|e| not_an_image(format!("cannot decode image: {e}")))?;

    info!(
        format = ?format,
        width = img.width(),
        height = img.height(),
        "source image decoded"
    );
    Ok(img)
}

/// `image/png`, `Image/JPEG; charset=binary`, ... but not `text/html`.
fn is_image_content_type(value: &str) -> bool {
    value
        .trim_start()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}
