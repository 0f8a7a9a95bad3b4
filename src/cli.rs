//! CLI argument parsing with clap.

use std::path::PathBuf;

use clap::Parser;

use crate::error::MockupError;
use crate::event::Event;

/// Render a phone mockup from a `/mockup <image-url>` command.
#[derive(Parser, Debug)]
#[command(name = "mockup", version, about)]
pub struct Cli {
    /// Message text containing the `/mockup <url>` command; wins over `--event`.
    #[arg(short, long)]
    pub text: Option<String>,

    /// GitHub event payload (defaults to `$GITHUB_EVENT_PATH`).
    #[arg(short, long, env = "GITHUB_EVENT_PATH")]
    pub event: Option<PathBuf>,

    /// Issue to post the result on (overrides the event's issue number).
    #[arg(long)]
    pub issue: Option<u64>,

    /// Output PNG path.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Frame template path, tried before the built-in fallbacks.
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Download timeout in seconds.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Post the result as a comment on the issue.
    #[arg(long)]
    pub post: bool,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// The message to scan and where its result belongs.
#[derive(Debug, Default)]
pub struct Request {
    /// Free text that may hold the command.
    pub text: Option<String>,
    /// Delivery target (issue number).
    pub target: Option<String>,
}

impl Cli {
    /// Resolve the message text from `--text` or the event payload.
    ///
    /// # Errors
    ///
    /// Returns an error if neither is given or the event cannot be read.
    pub fn resolve_request(&self) -> Result<Request, MockupError> {
        let (text, event_issue) = if let Some(ref text) = self.text {
            (Some(text.clone()), None)
        } else if let Some(ref path) = self.event {
            let event = Event::load(path)?;
            (event.body().map(str::to_string), event.issue_number())
        } else {
            return Err(MockupError::InvalidArgument(
                "Provide --text or --event (or set GITHUB_EVENT_PATH)".into(),
            ));
        };
        let target = self.issue.or(event_issue).map(|n| n.to_string());
        Ok(Request { text, target })
    }
}
