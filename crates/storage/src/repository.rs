//! Repository Implementation

use crate::StorageError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tank_model::{SensorSnapshot, SensorStatus};
use tracing::{debug, info};

/// Default retention (one day of per-minute updates for ~70 tanks)
pub const DEFAULT_MAX_RECORDS: usize = 100_000;

/// One accepted tank update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub tank_id: String,
    pub recorded_at: DateTime<Utc>,
    pub sensors: SensorSnapshot,
    pub overall: SensorStatus,
}

/// Repository for reading history (in-memory, bounded)
pub struct Repository {
    /// Reading records, oldest first
    readings: Mutex<VecDeque<ReadingRecord>>,
    /// Max records kept across all tanks
    max_records: usize,
}

impl Repository {
    /// Create a new in-memory repository
    pub fn new(max_records: usize) -> Self {
        let max_records = max_records.max(1);
        info!("Creating in-memory history repository (max {} records)", max_records);
        Self {
            readings: Mutex::new(VecDeque::with_capacity(max_records.min(10_000))),
            max_records,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, VecDeque<ReadingRecord>>, StorageError> {
        self.readings
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))
    }

    /// Append a reading record, evicting the oldest beyond retention
    pub fn insert_reading(&self, record: ReadingRecord) -> Result<(), StorageError> {
        let mut log = self.lock()?;

        while log.len() >= self.max_records {
            log.pop_front();
        }

        debug!("Stored reading for tank {}", record.tank_id);
        log.push_back(record);
        Ok(())
    }

    /// Most recent records for a tank, newest first
    pub fn get_history(&self, tank_id: &str, limit: usize) -> Result<Vec<ReadingRecord>, StorageError> {
        let log = self.lock()?;

        Ok(log
            .iter()
            .rev()
            .filter(|r| r.tank_id == tank_id)
            .take(limit)
            .cloned()
            .collect())
    }

    /// Total record count across tanks
    pub fn reading_count(&self) -> usize {
        self.readings.lock().map(|l| l.len()).unwrap_or(0)
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECORDS)
    }
}
