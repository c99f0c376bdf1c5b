//! JSON extractor for Axum
//!
//! `ApiJson<T>` works like `axum::Json<T>`, but a body that fails to parse
//! is answered with a 400 in the standard `ApiResponse` envelope instead of
//! axum's plain-text rejection.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

use super::ApiResponse;

/// ```ignore
/// async fn handler(ApiJson(body): ApiJson<SpotRequest>) {
///     // `body` is well-formed JSON of the right shape
/// }
/// ```
pub struct ApiJson<T>(pub T);

pub struct ApiJsonRejection(JsonRejection);

impl IntoResponse for ApiJsonRejection {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(format!("Invalid JSON: {}", self.0.body_text()));
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiJsonRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ApiJsonRejection)?;
        Ok(ApiJson(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────
