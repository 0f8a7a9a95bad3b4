//! Live adapters talking to real networks and filesystems.

pub mod file;
pub mod github;
pub mod http;
