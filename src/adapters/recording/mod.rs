//! Recording adapters that capture fetches to cassettes.

pub mod image_fetcher;
