//! Database entities module

pub mod lot;
pub mod reservation;
pub mod spot;

pub use lot::Entity as Lot;
pub use reservation::Entity as Reservation;
pub use spot::Entity as Spot;
