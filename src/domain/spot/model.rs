//! Spot domain entity

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Occupancy status of a spot.
///
/// Stored as an integer code and exposed by its symbolic name:
///
/// | name          | code |
/// |---------------|------|
/// | `AVAILABLE`   | 1    |
/// | `RESERVED`    | 2    |
/// | `OCCUPIED`    | 3    |
/// | `UNAVAILABLE` | 4    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpotStatus {
    Available,
    Reserved,
    Occupied,
    Unavailable,
}

impl SpotStatus {
    pub const ALL: [SpotStatus; 4] = [
        SpotStatus::Available,
        SpotStatus::Reserved,
        SpotStatus::Occupied,
        SpotStatus::Unavailable,
    ];

    pub const fn code(self) -> i32 {
        match self {
            Self::Available => 1,
            Self::Reserved => 2,
            Self::Occupied => 3,
            Self::Unavailable => 4,
        }
    }

    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Available),
            2 => Some(Self::Reserved),
            3 => Some(Self::Occupied),
            4 => Some(Self::Unavailable),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Reserved => "RESERVED",
            Self::Occupied => "OCCUPIED",
            Self::Unavailable => "UNAVAILABLE",
        }
    }

    /// Statuses the general create/update path may write.
    /// `RESERVED` and `OCCUPIED` belong to the reservation subsystem.
    pub const fn is_directly_writable(self) -> bool {
        matches!(self, Self::Available | Self::Unavailable)
    }

    /// Legal moves into `RESERVED`/`OCCUPIED` made by the reservation
    /// subsystem: a spot is reserved from `AVAILABLE`, occupied from
    /// `AVAILABLE` or `RESERVED`.
    pub const fn can_be_claimed_as(self, to: SpotStatus) -> bool {
        matches!(
            (self, to),
            (Self::Available, Self::Reserved)
                | (Self::Available, Self::Occupied)
                | (Self::Reserved, Self::Occupied)
        )
    }
}

/// Inverse lookup of the status table.
///
/// # Panics
///
/// On a code outside `1..=4`. Unknown codes never come from user input;
/// reaching this with one is a bug in the caller.
pub fn status_name(code: i32) -> SpotStatus {
    match SpotStatus::from_code(code) {
        Some(status) => status,
        None => panic!("spot status code {code} is not in the status table"),
    }
}

impl fmt::Display for SpotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpotStatus {
    type Err = ();

    /// Exact, case-sensitive match on the symbolic name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

/// A persisted parking spot.
#[derive(Debug, Clone, PartialEq)]
pub struct Spot {
    pub id: i32,
    pub lot_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    /// Raw status code as stored.
    pub status_code: i32,
}

impl Spot {
    pub fn status(&self) -> SpotStatus {
        status_name(self.status_code)
    }

    pub fn is_available(&self) -> bool {
        self.status_code == SpotStatus::Available.code()
    }

    pub fn is_reserved(&self) -> bool {
        self.status_code == SpotStatus::Reserved.code()
    }

    pub fn is_occupied(&self) -> bool {
        self.status_code == SpotStatus::Occupied.code()
    }

    pub fn is_unavailable(&self) -> bool {
        self.status_code == SpotStatus::Unavailable.code()
    }

    pub fn projection(&self) -> SpotProjection {
        SpotProjection {
            id: self.id,
            lot_id: self.lot_id,
            status: self.status(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// A validated spot that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSpot {
    pub lot_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub status: SpotStatus,
}

/// Public view of a spot returned by spatial lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotProjection {
    pub id: i32,
    pub lot_id: i32,
    pub status: SpotStatus,
    pub latitude: f64,
    pub longitude: f64,
}

// ── Tests ──────────────────────────────────────────────────────
