pub mod lot;
pub mod repositories;
pub mod reservation;
pub mod spot;

// Re-export commonly used types
pub use lot::{Lot, LotRepository};
pub use repositories::{DomainResult, RepositoryProvider, UnitOfWork};
pub use reservation::{NewReservation, Reservation, ReservationRepository};
pub use spot::{
    status_name, NewSpot, NumericInput, Spot, SpotAttributes, SpotProjection, SpotRepository,
    SpotStatus, WithinQuery,
};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
