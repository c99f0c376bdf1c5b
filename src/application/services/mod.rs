//! Application services

mod spot_query;
mod spot_registry;

pub use spot_query::{coerce_coordinate, BoundingBox, SpotQueryEngine, MAX_SPOTS_WITHIN_REGION};
pub use spot_registry::SpotRegistry;
