//! Common API types: response envelope, error mapping, JSON extractor

mod api_json;

pub use api_json::{ApiJson, ApiJsonRejection};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::shared::{DomainError, ValidationErrors};

/// Standard API response envelope.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Payload; `null` on error except for validation failures
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Empty response for operations without return data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

/// One failed rule, as reported in a 422 body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorDto {
    pub field: String,
    pub message: String,
}

/// `data` of a 422 response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorBody {
    pub errors: Vec<FieldErrorDto>,
}

impl From<&ValidationErrors> for ValidationErrorBody {
    fn from(errors: &ValidationErrors) -> Self {
        Self {
            errors: errors
                .iter()
                .map(|e| FieldErrorDto {
                    field: e.field.to_string(),
                    message: e.message.clone(),
                })
                .collect(),
        }
    }
}

/// Error half of every handler result.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiResponse<ValidationErrorBody>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiResponse::error(message),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, e.to_string()),
            DomainError::Invalid(ref errors) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                body: ApiResponse {
                    success: false,
                    data: Some(ValidationErrorBody::from(errors)),
                    error: Some(errors.to_string()),
                },
            },
            DomainError::InvalidTransition { .. } => Self::new(StatusCode::CONFLICT, e.to_string()),
            DomainError::Storage(_) => {
                error!("Request failed: {}", e);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases = [
            (DomainError::not_found("Spot", 3), StatusCode::NOT_FOUND),
            (
                DomainError::InvalidTransition {
                    from: "OCCUPIED".into(),
                    to: "RESERVED".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                DomainError::Storage("disk full".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status, status);
            assert!(!api.body.success);
            assert!(api.body.data.is_none());
        }
    }

    #[test]
    fn validation_errors_keep_rule_order() {
        let mut errors = ValidationErrors::new();
        errors.add("lot_id", "is invalid");
        errors.add("latitude", "can't be blank");

        let api: ApiError = DomainError::Invalid(errors).into();
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            api.body.error.as_deref(),
            Some("lot_id is invalid; latitude can't be blank")
        );

        let json = serde_json::to_value(&api.body).unwrap();
        assert_eq!(json["data"]["errors"][0]["field"], "lot_id");
        assert_eq!(json["data"]["errors"][1]["message"], "can't be blank");
    }
}
