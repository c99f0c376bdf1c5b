//! Spot aggregate
//!
//! Contains the Spot entity, its status table, the write-path rules and
//! the repository interface.

pub mod attributes;
pub mod model;
pub mod repository;

pub use attributes::{NumericInput, SpotAttributes};
pub use model::{status_name, NewSpot, Spot, SpotProjection, SpotStatus};
pub use repository::{SpotRepository, WithinQuery};
