//! Local-only sink: the mockup stays where the pipeline wrote it.

use tracing::info;

use crate::ports::result_sink::{DeliverFuture, Delivery, DeliveryReceipt, ResultSink};

/// Sink that performs no remote delivery.
#[derive(Debug, Default)]
pub struct FileSink;

impl ResultSink for FileSink {
    fn deliver(&self, delivery: &Delivery) -> DeliverFuture<'_> {
        let path = delivery.png_path.clone();
        Box::pin(async move {
            info!(path = %path.display(), "mockup kept locally");
            Ok(DeliveryReceipt::Saved(path))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[tokio::test]
    async fn receipt_points_at_png() {
        let delivery = Delivery {
            target: Some("7".into()),
            png_path: PathBuf::from("out.png"),
        };
        let receipt = FileSink.deliver(&delivery).await.unwrap();
        assert_eq!(receipt, DeliveryReceipt::Saved(PathBuf::from("out.png")));
    }
}
