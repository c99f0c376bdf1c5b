//! Caller-supplied spot fields and the rules that turn them into a [`NewSpot`].

use serde::Deserialize;

use super::model::{NewSpot, Spot, SpotStatus};
use crate::shared::errors::ValidationErrors;

pub const MIN_COORDINATE: f64 = -180.0;
pub const MAX_COORDINATE: f64 = 180.0;

/// A numeric field as it arrives from a caller: a JSON number or a string.
/// Any other JSON value is kept so the rules can reject it by field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl NumericInput {
    /// Strict conversion. Text must be a complete finite number once
    /// surrounding whitespace is trimmed.
    pub fn to_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Record id: an integral number in `i32` range, or text holding one.
    pub fn to_id(&self) -> Option<i32> {
        match self {
            Self::Number(n) if n.fract() == 0.0 => {
                let in_range = *n >= f64::from(i32::MIN) && *n <= f64::from(i32::MAX);
                in_range.then_some(*n as i32)
            }
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl From<f64> for NumericInput {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for NumericInput {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for NumericInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Spot fields for a create, or the changed fields of an update.
/// `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpotAttributes {
    pub lot_id: Option<NumericInput>,
    pub latitude: Option<NumericInput>,
    pub longitude: Option<NumericInput>,
    pub status: Option<String>,
}

impl SpotAttributes {
    pub fn new(
        lot_id: i32,
        latitude: impl Into<NumericInput>,
        longitude: impl Into<NumericInput>,
        status: SpotStatus,
    ) -> Self {
        Self {
            lot_id: Some(lot_id.into()),
            latitude: Some(latitude.into()),
            longitude: Some(longitude.into()),
            status: Some(status.as_str().to_string()),
        }
    }

    /// The stored record expressed as attributes, status by symbolic name.
    pub fn from_spot(spot: &Spot) -> Self {
        Self::new(spot.lot_id, spot.latitude, spot.longitude, spot.status())
    }

    /// Overlay every supplied field of `changes`.
    pub fn merge(mut self, changes: SpotAttributes) -> Self {
        if changes.lot_id.is_some() {
            self.lot_id = changes.lot_id;
        }
        if changes.latitude.is_some() {
            self.latitude = changes.latitude;
        }
        if changes.longitude.is_some() {
            self.longitude = changes.longitude;
        }
        if changes.status.is_some() {
            self.status = changes.status;
        }
        self
    }

    /// The supplied `lot_id`, when it names a record id.
    pub fn lot_id(&self) -> Option<i32> {
        self.lot_id.as_ref().and_then(NumericInput::to_id)
    }

    /// Run every rule and collect all failures, in this order:
    /// `lot_id`, `latitude`, `longitude`, `status`.
    ///
    /// `lot_found` is the result of looking up `lot_id`; it is ignored when
    /// no usable `lot_id` was supplied.
    pub fn validate(&self, lot_found: bool) -> Result<NewSpot, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let lot_id = self.lot_id().filter(|_| lot_found);
        if lot_id.is_none() {
            errors.add("lot_id", "is invalid");
        }

        let latitude = check_coordinate(&mut errors, "latitude", self.latitude.as_ref());
        let longitude = check_coordinate(&mut errors, "longitude", self.longitude.as_ref());

        let status = self
            .status
            .as_deref()
            .and_then(|s| s.parse::<SpotStatus>().ok())
            .filter(|s| s.is_directly_writable());
        if status.is_none() {
            errors.add("status", "is invalid");
        }

        match (lot_id, latitude, longitude, status) {
            (Some(lot_id), Some(latitude), Some(longitude), Some(status)) if errors.is_empty() => {
                Ok(NewSpot {
                    lot_id,
                    latitude,
                    longitude,
                    status,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Presence, numericality and the closed [-180, 180] range.
fn check_coordinate(
    errors: &mut ValidationErrors,
    field: &'static str,
    input: Option<&NumericInput>,
) -> Option<f64> {
    if input.map_or(true, NumericInput::is_blank) {
        errors.add(field, "can't be blank");
    }

    let Some(value) = input.and_then(NumericInput::to_f64) else {
        errors.add(field, "is not a number");
        return None;
    };

    if value < MIN_COORDINATE {
        errors.add(field, "must be greater than or equal to -180");
        return None;
    }
    if value > MAX_COORDINATE {
        errors.add(field, "must be less than or equal to 180");
        return None;
    }
    Some(value)
}

// ── Tests ──────────────────────────────────────────────────────
