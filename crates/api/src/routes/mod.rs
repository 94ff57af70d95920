//! Route Handlers

pub mod alerts;
pub mod tanks;
pub mod thresholds;
