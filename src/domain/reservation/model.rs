//! Reservation domain entity

use chrono::{DateTime, Utc};

/// A claim on a spot. Its lifecycle is driven by the reservation subsystem;
/// the spot registry only ever destroys reservations.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: i32,
    pub spot_id: i32,
    /// User holding the claim, if known
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A reservation that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub spot_id: i32,
    pub user_id: Option<String>,
}

impl NewReservation {
    pub fn for_spot(spot_id: i32) -> Self {
        Self {
            spot_id,
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}
