//! Result sink port: hand a finished mockup to its destination.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::error::MockupError;

/// A finished mockup ready for delivery.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Where the result should go (the originating issue number).
    pub target: Option<String>,
    /// The PNG written by the pipeline.
    pub png_path: PathBuf,
}

/// What the sink did with a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReceipt {
    /// Kept on local storage only.
    Saved(PathBuf),
    /// Posted to a remote location.
    Posted {
        /// Link to the posted message.
        url: String,
    },
}

/// Boxed future type returned by [`ResultSink::deliver`].
pub type DeliverFuture<'a> =
    Pin<Box<dyn Future<Output = Result<DeliveryReceipt, MockupError>> + Send + 'a>>;

/// Persists or publishes a finished mockup.
pub trait ResultSink: Send + Sync {
    /// Deliver the mockup described by `delivery`.
    fn deliver(&self, delivery: &Delivery) -> DeliverFuture<'_>;
}
