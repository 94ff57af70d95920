//! Tank Data Model
//!
//! Types shared by the evaluator, the alert ledger, storage and the API:
//! sensor snapshots, tank records, statuses and alerts.

mod alert;
mod sensor;
mod status;
mod tank;

pub use alert::Alert;
pub use sensor::{display_name, unit_for, Reading, SensorSnapshot, OXYGEN, PH, SALINITY, TEMPERATURE};
pub use status::{AlertSeverity, SensorStatus};
pub use tank::TankRecord;
