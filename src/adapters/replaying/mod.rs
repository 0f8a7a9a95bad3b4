//! Replaying adapters that serve recorded fetches from cassettes.

pub mod image_fetcher;
