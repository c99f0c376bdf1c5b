//! Reservation repository interface

use async_trait::async_trait;

use super::model::{NewReservation, Reservation};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Save a new reservation
    async fn create(&self, reservation: NewReservation) -> DomainResult<Reservation>;

    /// All reservations referencing a spot
    async fn find_by_spot(&self, spot_id: i32) -> DomainResult<Vec<Reservation>>;

    async fn count_by_spot(&self, spot_id: i32) -> DomainResult<u64> {
        Ok(self.find_by_spot(spot_id).await?.len() as u64)
    }

    /// Delete every reservation referencing `spot_id`. Returns how many went.
    async fn destroy_all_by_spot(&self, spot_id: i32) -> DomainResult<u64>;

    /// Delete the first reservation found for `spot_id`, if any.
    /// Returns whether one was deleted.
    async fn destroy_one_by_spot(&self, spot_id: i32) -> DomainResult<bool>;
}
