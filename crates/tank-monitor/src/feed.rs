//! Update Feed
//!
//! The data source that pushes tank documents lives outside this crate. It
//! reaches the monitor through [`TankFeed`]; closing the feed is how a
//! subscription is cancelled.

use std::future::Future;
use std::sync::Arc;
use tank_model::TankRecord;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info};

use crate::monitor::TankMonitor;

/// Event delivered by a feed
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// A new document for one tank
    Update(TankRecord),
    /// The data source reported a failure
    Error(String),
}

/// Source of tank updates
pub trait TankFeed {
    /// Next event, or `None` once the feed is closed
    fn next_event(&mut self) -> impl Future<Output = Option<FeedEvent>> + Send;
}

/// In-process feed backed by a tokio channel
pub struct ChannelFeed {
    receiver: mpsc::Receiver<FeedEvent>,
}

impl ChannelFeed {
    /// Create a feed and the sender that drives it. Dropping every sender
    /// closes the feed.
    pub fn channel(buffer: usize) -> (mpsc::Sender<FeedEvent>, Self) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (sender, Self { receiver })
    }
}

impl TankFeed for ChannelFeed {
    async fn next_event(&mut self) -> Option<FeedEvent> {
        self.receiver.recv().await
    }
}

/// Apply feed events to a shared monitor until the feed closes.
/// Returns the number of events processed.
pub async fn run_feed<F: TankFeed>(monitor: Arc<RwLock<TankMonitor>>, mut feed: F) -> usize {
    info!("Tank feed started");
    let mut processed = 0;

    while let Some(event) = feed.next_event().await {
        let mut monitor = monitor.write().await;
        match event {
            FeedEvent::Update(record) => {
                debug!("Feed update for tank {}", record.id);
                if let Err(e) = monitor.apply_update(record) {
                    monitor.record_error(e.to_string());
                }
            }
            FeedEvent::Error(message) => monitor.record_error(message),
        }
        processed += 1;
    }

    info!("Tank feed closed after {} events", processed);
    processed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tank_model::{SensorSnapshot, SensorStatus};

    #[tokio::test]
    async fn test_run_feed_applies_updates() {
        let monitor = Arc::new(RwLock::new(TankMonitor::default()));
        let (sender, feed) = ChannelFeed::channel(8);
        let driver = tokio::spawn(run_feed(monitor.clone(), feed));

        sender
            .send(FeedEvent::Update(TankRecord::new(
                "t1",
                SensorSnapshot::new().with("oxygen", 2.0),
            )))
            .await
            .unwrap();
        sender
            .send(FeedEvent::Update(TankRecord::new(
                "t2",
                SensorSnapshot::new().with("ph", 7.0),
            )))
            .await
            .unwrap();
        drop(sender);

        assert_eq!(driver.await.unwrap(), 2);

        let monitor = monitor.read().await;
        assert_eq!(monitor.tank_count(), 2);
        assert_eq!(
            monitor.tank("t1").unwrap().evaluation.overall,
            SensorStatus::Critical
        );
        assert_eq!(monitor.ledger().len(), 1);
    }

    #[tokio::test]
    async fn test_run_feed_sets_error_flag() {
        let monitor = Arc::new(RwLock::new(TankMonitor::default()));
        let (sender, feed) = ChannelFeed::channel(4);

        sender
            .send(FeedEvent::Error("connection lost".to_string()))
            .await
            .unwrap();
        sender
            .send(FeedEvent::Update(TankRecord::default()))
            .await
            .unwrap();
        drop(sender);

        assert_eq!(run_feed(monitor.clone(), feed).await, 2);

        let monitor = monitor.read().await;
        assert_eq!(
            monitor.state().error.as_deref(),
            Some("Tank record has no id")
        );
        assert_eq!(monitor.tank_count(), 0);
    }
}
