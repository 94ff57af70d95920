//! Alerting System
//!
//! Raises alerts for sensors outside their thresholds, deduplicates them per
//! tank and sensor while outstanding, and tracks acknowledgement.

mod generate;
mod manager;

pub use generate::{generate_alerts, generate_alerts_at};
pub use manager::{AlertFilter, AlertLedger, AlertPolicy};
