//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::dashboard_handler::dashboard;
use super::handlers::{
    account_routes, admin_routes, auth_routes, catalog_routes, content_routes,
    conversation_routes, notification_routes, quote_routes, unread_count_routes, vendor_routes,
};
use super::middleware::{
    auth_middleware, optional_auth_middleware, rate_limit_auth_middleware, rate_limit_middleware,
};
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    // Signed-in routes; every handler receives the caller's Principal
    let protected = Router::new()
        .route("/dashboard", get(dashboard))
        .nest("/account", account_routes())
        .nest("/vendor", vendor_routes())
        .nest("/conversations", conversation_routes())
        .nest("/notifications", notification_routes())
        .nest("/admin", admin_routes())
        .merge(quote_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let optional = Router::new()
        .nest("/notifications", unread_count_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            optional_auth_middleware,
        ));

    let api = Router::new()
        .merge(catalog_routes())
        .nest("/site", content_routes())
        .merge(protected)
        .merge(optional)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        // Health check endpoints (no rate limiting)
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public authentication routes (stricter rate limiting)
        .nest(
            "/auth",
            auth_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_auth_middleware,
            )),
        )
        .merge(api)
        // Global middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "B2B Marketplace API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    redis: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                status: "healthy",
                error: None,
            },
            Err(e) => Self {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        }
    }

    fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

/// Health check endpoint with database and Redis connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (db, redis) = tokio::join!(state.database.ping(), state.cache.ping());
    let database = ServiceStatus::from_result(db);
    let redis = ServiceStatus::from_result(redis);

    let all_healthy = database.is_healthy() && redis.is_healthy();
    if !all_healthy {
        tracing::warn!(
            database = database.status,
            redis = redis.status,
            "Health check degraded"
        );
    }

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceHealth { database, redis },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_status_from_result() {
        let ok = ServiceStatus::from_result::<String>(Ok(()));
        assert!(ok.is_healthy());
        assert_eq!(ok.status, "healthy");

        let down = ServiceStatus::from_result(Err("connection refused"));
        assert!(!down.is_healthy());
        assert_eq!(down.error.as_deref(), Some("connection refused"));
    }
}
