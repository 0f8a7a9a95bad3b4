//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the mockup core and an external
//! system. Implementations live in `src/adapters/`.

pub mod image_source;
pub mod result_sink;

pub use image_source::{FetchRequest, FetchedImage, ImageFetcher};
pub use result_sink::{Delivery, DeliveryReceipt, ResultSink};
