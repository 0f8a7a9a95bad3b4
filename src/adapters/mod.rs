//! Adapter implementations for port traits.
//!
//! - `live/` — Real HTTP fetcher, GitHub comment sink, local file sink
//! - `recording/` — Record fetches to cassettes
//! - `replaying/` — Replay fetches from cassettes

pub mod live;
pub mod recording;
pub mod replaying;
