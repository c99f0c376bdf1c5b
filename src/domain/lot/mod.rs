//! Lot aggregate (lookup only)

pub mod model;
pub mod repository;

pub use model::Lot;
pub use repository::LotRepository;
