//! Threshold Evaluation
//!
//! Threshold tables per sensor, partial updates to them, and classification
//! of sensor snapshots into normal / warning / critical.

mod error;
mod evaluator;
mod table;

pub use error::ThresholdError;
pub use evaluator::{classify, classify_reading, evaluate, Breach, Evaluation};
pub use table::{SensorThreshold, SensorThresholdPatch, ThresholdPatch, ThresholdShape, ThresholdSpec};
