//! Spot DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{NumericInput, Spot, SpotAttributes, SpotProjection};

/// Spot in API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpotDto {
    pub id: i32,
    pub lot_id: i32,
    /// AVAILABLE, RESERVED, OCCUPIED or UNAVAILABLE
    pub status: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<SpotProjection> for SpotDto {
    fn from(p: SpotProjection) -> Self {
        Self {
            id: p.id,
            lot_id: p.lot_id,
            status: p.status.to_string(),
            latitude: p.latitude,
            longitude: p.longitude,
        }
    }
}

impl From<Spot> for SpotDto {
    fn from(s: Spot) -> Self {
        s.projection().into()
    }
}

/// Body of create and update requests.
///
/// On update, omitted fields keep their stored value. Every field may be
/// sent as a number or a numeric string; other values fail validation.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SpotRequest {
    #[schema(value_type = Option<i32>, example = 1)]
    pub lot_id: Option<NumericInput>,
    #[schema(value_type = Option<f64>, example = 41.3111)]
    pub latitude: Option<NumericInput>,
    #[schema(value_type = Option<f64>, example = 69.2797)]
    pub longitude: Option<NumericInput>,
    /// AVAILABLE or UNAVAILABLE
    pub status: Option<String>,
}

impl From<SpotRequest> for SpotAttributes {
    fn from(r: SpotRequest) -> Self {
        SpotAttributes {
            lot_id: r.lot_id,
            latitude: r.latitude,
            longitude: r.longitude,
            status: r.status,
        }
    }
}

/// Region query parameters. Kept as raw strings: coordinates are coerced
/// leniently, `lot_id` strictly.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WithinParams {
    /// Restrict to one lot; empty or omitted means all lots
    pub lot_id: Option<String>,
    /// Lower latitude bound
    pub lat1: Option<String>,
    /// Lower longitude bound
    pub long1: Option<String>,
    /// Upper latitude bound
    pub lat2: Option<String>,
    /// Upper longitude bound
    pub long2: Option<String>,
}

impl WithinParams {
    /// `Ok(None)` for an absent or empty `lot_id`.
    pub fn lot_filter(&self) -> Result<Option<i32>, String> {
        match self.lot_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| format!("Invalid lot_id: {}", raw)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(lot_id: Option<&str>) -> WithinParams {
        WithinParams {
            lot_id: lot_id.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn lot_filter_parsing() {
        assert_eq!(params(None).lot_filter(), Ok(None));
        assert_eq!(params(Some("")).lot_filter(), Ok(None));
        assert_eq!(params(Some("12")).lot_filter(), Ok(Some(12)));
        assert!(params(Some("twelve")).lot_filter().is_err());
        assert!(params(Some("1.5")).lot_filter().is_err());
    }

    #[test]
    fn request_accepts_numeric_strings() {
        let req: SpotRequest =
            serde_json::from_str(r#"{"lot_id": 1, "latitude": "5.5", "longitude": 7}"#).unwrap();
        assert_eq!(req.latitude, Some(NumericInput::Text("5.5".into())));
        assert_eq!(req.longitude, Some(NumericInput::Number(7.0)));
        assert!(req.status.is_none());
    }

    #[test]
    fn request_keeps_unexpected_values_for_validation() {
        let req: SpotRequest =
            serde_json::from_str(r#"{"lot_id": "abc", "latitude": false}"#).unwrap();
        let attrs = SpotAttributes::from(req);
        assert_eq!(attrs.lot_id(), None);
        assert_eq!(
            attrs.latitude,
            Some(NumericInput::Other(serde_json::Value::Bool(false)))
        );
    }
}
