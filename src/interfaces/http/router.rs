//! API router with OpenAPI documentation

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::application::{SpotQueryEngine, SpotRegistry};
use crate::domain::RepositoryProvider;

use super::common::{ApiResponse, EmptyData, FieldErrorDto, ValidationErrorBody};
use super::modules::health::{self, ComponentHealth, HealthResponse, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::spots::{self, SpotAppState, SpotDto, SpotRequest};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Spots
        spots::find_within,
        spots::create_spot,
        spots::get_spot,
        spots::update_spot,
        spots::delete_spot,
        spots::reserve_spot,
        spots::occupy_spot,
    ),
    components(
        schemas(
            // Common
            ApiResponse<SpotDto>,
            ApiResponse<EmptyData>,
            ApiResponse<ValidationErrorBody>,
            FieldErrorDto,
            // Health
            HealthResponse,
            ComponentHealth,
            // Spots
            SpotDto,
            SpotRequest,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Spots", description = "Parking spot registry and region lookup"),
    ),
    info(
        title = "Parkspot Service API",
        version = "1.0.0",
        description = "REST API for parking spot inventory",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `/metrics` is mounted only when a Prometheus handle is supplied.
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    prometheus: Option<PrometheusHandle>,
) -> Router {
    let spot_state = SpotAppState {
        registry: Arc::new(SpotRegistry::new(repos.clone())),
        query: Arc::new(SpotQueryEngine::new(repos.clone())),
    };

    let spot_routes = Router::new()
        .route("/", post(spots::create_spot))
        .route("/within", get(spots::find_within))
        .route(
            "/{id}",
            get(spots::get_spot)
                .put(spots::update_spot)
                .delete(spots::delete_spot),
        )
        .route("/{id}/reserve", post(spots::reserve_spot))
        .route("/{id}/occupy", post(spots::occupy_spot))
        .with_state(spot_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            repos,
            started_at: Arc::new(Instant::now()),
        });

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .merge(health_routes)
        .nest("/api/v1/spots", spot_routes)
        .route("/api-docs/openapi.json", get(openapi_json));

    if let Some(handle) = prometheus {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        use tower::Service;
        let mut svc = router.into_service();
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = svc.call(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    fn router() -> Router {
        create_api_router(Arc::new(InMemoryRepositoryProvider::new()), None)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = get_json(router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"]["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn openapi_document_lists_spot_paths() {
        let (status, body) = get_json(router(), "/api-docs/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/v1/spots/{id}"].is_object());
        assert!(body["paths"]["/api/v1/spots/within"].is_object());
    }

    #[tokio::test]
    async fn metrics_route_absent_without_handle() {
        let (status, _) = get_json(router(), "/metrics").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn openapi_has_spot_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;
        assert!(schemas.contains_key("SpotDto"));
        assert!(schemas.contains_key("SpotRequest"));
    }
}
