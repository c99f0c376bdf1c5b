//! Database repository implementations
//!
//! One generic [`SeaOrmStore`] implements every per-aggregate repository
//! over any SeaORM connection, so the same code serves the pool and an
//! open transaction.

mod lot_repository;
mod reservation_repository;
mod spot_repository;
pub mod repository_provider;

pub use repository_provider::{SeaOrmRepositoryProvider, SeaOrmStore};
