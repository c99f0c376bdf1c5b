//! Reservation aggregate
//!
//! The spot registry consumes this as a collaborator for cleanup only.

pub mod model;
pub mod repository;

pub use model::{NewReservation, Reservation};
pub use repository::ReservationRepository;
