//! Storage Layer
//!
//! Keeps a bounded history of tank readings with repository pattern.

mod repository;

pub use repository::{ReadingRecord, Repository, DEFAULT_MAX_RECORDS};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}
