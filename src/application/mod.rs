pub mod services;

// Re-export key types for convenience
pub use services::{
    coerce_coordinate, BoundingBox, SpotQueryEngine, SpotRegistry, MAX_SPOTS_WITHIN_REGION,
};
