//! GitHub issue/comment event payloads that carry `/mockup` commands.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::MockupError;

/// The parts of an `issues` or `issue_comment` webhook payload we use.
#[derive(Debug, Default, Deserialize)]
pub struct Event {
    /// `opened`, `created`, `edited`, ...
    #[serde(default)]
    pub action: Option<String>,
    /// The issue the event belongs to.
    #[serde(default)]
    pub issue: Option<Issue>,
    /// Present on `issue_comment` events.
    #[serde(default)]
    pub comment: Option<Comment>,
}

/// Issue fields.
#[derive(Debug, Default, Deserialize)]
pub struct Issue {
    /// Issue number within the repository.
    pub number: Option<u64>,
    /// Issue description.
    #[serde(default)]
    pub body: Option<String>,
}

/// Comment fields.
#[derive(Debug, Default, Deserialize)]
pub struct Comment {
    /// Comment text.
    #[serde(default)]
    pub body: Option<String>,
}

impl Event {
    /// Read and parse an event payload file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self, MockupError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            MockupError::Event(format!("Failed to read event {}: {e}", path.display()))
        })?;
        let event: Self = serde_json::from_str(&contents).map_err(|e| {
            MockupError::Event(format!("Failed to parse event {}: {e}", path.display()))
        })?;
        debug!(
            action = event.action.as_deref().unwrap_or("unknown"),
            issue = ?event.issue_number(),
            source = if event.comment_body().is_some() { "comment" } else { "issue body" },
            "event loaded"
        );
        Ok(event)
    }

    /// The text to search for a command: the comment, else the issue body.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.comment_body().or_else(|| {
            self.issue
                .as_ref()
                .and_then(|i| i.body.as_deref())
                .filter(|b| !b.is_empty())
        })
    }

    /// Number of the issue the result belongs to.
    #[must_use]
    pub fn issue_number(&self) -> Option<u64> {
        self.issue.as_ref().and_then(|i| i.number)
    }

    fn comment_body(&self) -> Option<&str> {
        self.comment
            .as_ref()
            .and_then(|c| c.body.as_deref())
            .filter(|b| !b.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Event {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn comment_body_wins() {
        let event = parse(
            r#"{"action": "created",
                "issue": {"number": 42, "body": "issue text"},
                "comment": {"body": "/mockup https://x/y.png"}}"#,
        );
        assert_eq!(event.body(), Some("/mockup https://x/y.png"));
        assert_eq!(event.issue_number(), Some(42));
    }

    #[test]
    fn falls_back_to_issue_body() {
        let event = parse(
            r#"{"action": "opened", "issue": {"number": 7, "body": "/mockup https://a/b.jpg"}}"#,
        );
        assert_eq!(event.body(), Some("/mockup https://a/b.jpg"));
    }

    #[test]
    fn empty_comment_falls_back_too() {
        let event = parse(
            r#"{"issue": {"number": 1, "body": "from issue"}, "comment": {"body": ""}}"#,
        );
        assert_eq!(event.body(), Some("from issue"));
    }

    #[test]
    fn null_bodies_are_absent() {
        let event = parse(
            r#"{"issue": {"number": 3, "body": null}, "comment": {"body": null}}"#,
        );
        assert_eq!(event.body(), None);
        assert_eq!(event.issue_number(), Some(3));
    }

    #[test]
    fn empty_payload_has_nothing() {
        let event = parse("{}");
        assert_eq!(event.body(), None);
        assert_eq!(event.issue_number(), None);
    }

    #[test]
    fn load_reports_bad_json() {
        let dir = std::env::temp_dir().join("mockup_event_bad_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("event.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(Event::load(&path), Err(MockupError::Event(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
