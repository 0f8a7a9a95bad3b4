//! Extraction of the `/mockup <url>` command from free text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Trigger token followed by whitespace and an http(s) URL.
static MOCKUP_COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/mockup\s+(https?://\S+)")
        .expect("valid mockup command regex")
});

/// Return the URL of the first `/mockup <url>` command in `text`.
///
/// The URL ends at the first whitespace character. Absent or empty text is a
/// normal "not found".
#[must_use]
pub fn extract_url(text: Option<&str>) -> Option<&str> {
    let text = text.filter(|t| !t.is_empty())?;
    MOCKUP_COMMAND
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
