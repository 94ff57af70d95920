//! Tank Monitoring Session
//!
//! Owns the latest record of every tank, the threshold table, the alert
//! ledger and the reading history. Updates arrive through a [`TankFeed`].

mod feed;
mod monitor;

pub use feed::{run_feed, ChannelFeed, FeedEvent, TankFeed};
pub use monitor::{MonitorConfig, MonitorState, TankMonitor, TankView};

use storage::StorageError;
use thiserror::Error;

/// Monitor error types
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Tank record has no id")]
    MissingTankId,

    #[error("History storage failed: {0}")]
    Storage(#[from] StorageError),
}
