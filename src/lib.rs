//! # parkspot
//!
//! Parking spot registry with reservation-consistent status tracking and a
//! bounded region lookup, served over a REST API.
//!
//! ## Architecture
//!
//! - **domain**: Spot, lot and reservation models, validation rules and
//!   repository traits
//! - **application**: `SpotRegistry` (writes) and `SpotQueryEngine` (reads)
//! - **infrastructure**: SeaORM and in-memory repository implementations
//! - **interfaces**: axum HTTP API with an OpenAPI document
//! - **server**: runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider,
};

// Re-export API router
pub use interfaces::create_api_router;

pub use application::{SpotQueryEngine, SpotRegistry};
pub use shared::{AppError, DomainError, InfraError};
