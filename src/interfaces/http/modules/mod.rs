//! HTTP API modules, one per resource

pub mod health;
pub mod metrics;
pub mod spots;
