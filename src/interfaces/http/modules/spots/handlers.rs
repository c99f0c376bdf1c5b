//! Spot HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;

use crate::application::{BoundingBox, SpotQueryEngine, SpotRegistry};
use crate::interfaces::http::common::{
    ApiError, ApiJson, ApiResponse, EmptyData, ValidationErrorBody,
};

use super::dto::*;

/// Application state for spot handlers.
#[derive(Clone)]
pub struct SpotAppState {
    pub registry: Arc<SpotRegistry>,
    pub query: Arc<SpotQueryEngine>,
}

#[utoipa::path(
    get,
    path = "/api/v1/spots/within",
    tag = "Spots",
    params(WithinParams),
    responses(
        (status = 200, description = "Up to 100 spots inside the rectangle", body = ApiResponse<Vec<SpotDto>>),
        (status = 400, description = "lot_id is not an integer")
    )
)]
pub async fn find_within(
    State(state): State<SpotAppState>,
    Query(params): Query<WithinParams>,
) -> Result<Json<ApiResponse<Vec<SpotDto>>>, ApiError> {
    let lot_id = params.lot_filter().map_err(ApiError::bad_request)?;
    let area = BoundingBox::coerce(
        params.lat1.as_deref(),
        params.long1.as_deref(),
        params.lat2.as_deref(),
        params.long2.as_deref(),
    );

    let spots = state.query.find_within(lot_id, area).await?;
    Ok(Json(ApiResponse::success(
        spots.into_iter().map(SpotDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/spots",
    tag = "Spots",
    request_body = SpotRequest,
    responses(
        (status = 200, description = "Spot created", body = ApiResponse<SpotDto>),
        (status = 400, description = "Malformed JSON"),
        (status = 422, description = "Field validation failed", body = ApiResponse<ValidationErrorBody>)
    )
)]
pub async fn create_spot(
    State(state): State<SpotAppState>,
    ApiJson(request): ApiJson<SpotRequest>,
) -> Result<Json<ApiResponse<SpotDto>>, ApiError> {
    let spot = state.registry.create(request.into()).await?;
    Ok(Json(ApiResponse::success(spot.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/spots/{id}",
    tag = "Spots",
    params(("id" = i32, Path, description = "Spot ID")),
    responses(
        (status = 200, description = "Spot details", body = ApiResponse<SpotDto>),
        (status = 404, description = "Spot not found")
    )
)]
pub async fn get_spot(
    State(state): State<SpotAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<SpotDto>>, ApiError> {
    let spot = state.registry.find(id).await?;
    Ok(Json(ApiResponse::success(spot.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/spots/{id}",
    tag = "Spots",
    params(("id" = i32, Path, description = "Spot ID")),
    request_body = SpotRequest,
    responses(
        (status = 200, description = "Spot updated", body = ApiResponse<SpotDto>),
        (status = 404, description = "Spot not found"),
        (status = 422, description = "Field validation failed", body = ApiResponse<ValidationErrorBody>)
    )
)]
pub async fn update_spot(
    State(state): State<SpotAppState>,
    Path(id): Path<i32>,
    ApiJson(request): ApiJson<SpotRequest>,
) -> Result<Json<ApiResponse<SpotDto>>, ApiError> {
    let spot = state.registry.update(id, request.into()).await?;
    Ok(Json(ApiResponse::success(spot.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/spots/{id}",
    tag = "Spots",
    params(("id" = i32, Path, description = "Spot ID")),
    responses(
        (status = 200, description = "Spot deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Spot not found")
    )
)]
pub async fn delete_spot(
    State(state): State<SpotAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    state.registry.delete(id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    post,
    path = "/api/v1/spots/{id}/reserve",
    tag = "Spots",
    params(("id" = i32, Path, description = "Spot ID")),
    responses(
        (status = 200, description = "Spot is now RESERVED", body = ApiResponse<SpotDto>),
        (status = 404, description = "Spot not found"),
        (status = 409, description = "Spot is not AVAILABLE")
    )
)]
pub async fn reserve_spot(
    State(state): State<SpotAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<SpotDto>>, ApiError> {
    let spot = state.registry.mark_reserved(id).await?;
    Ok(Json(ApiResponse::success(spot.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/spots/{id}/occupy",
    tag = "Spots",
    params(("id" = i32, Path, description = "Spot ID")),
    responses(
        (status = 200, description = "Spot is now OCCUPIED", body = ApiResponse<SpotDto>),
        (status = 404, description = "Spot not found"),
        (status = 409, description = "Spot is neither AVAILABLE nor RESERVED")
    )
)]
pub async fn occupy_spot(
    State(state): State<SpotAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<SpotDto>>, ApiError> {
    let spot = state.registry.mark_occupied(id).await?;
    Ok(Json(ApiResponse::success(spot.into())))
}

// ── Tests ──────────────────────────────────────────────────────
