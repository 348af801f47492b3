//! Application route configuration.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    booking_routes, catalog_admin_routes, catalog_routes, user_protected_routes,
    user_public_routes,
};
use super::middleware::{admin_middleware, auth_middleware};
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::{Config, DEFAULT_CORS_ORIGIN, MAX_UPLOAD_BYTES, UPLOADS_URL_PREFIX};

/// Room for the text parts that travel with an uploaded image
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Accounts: register/login/logout are public, the rest need a session
        .nest(
            "/user",
            user_public_routes().merge(user_protected_routes().route_layer(auth.clone())),
        )
        // Catalog: reads are public, mutations need an admin session.
        // The last route_layer runs first, so auth wraps the admin check.
        .nest(
            "/service",
            catalog_routes().merge(
                catalog_admin_routes()
                    .route_layer(middleware::from_fn(admin_middleware))
                    .route_layer(auth.clone()),
            ),
        )
        .nest("/booking", booking_routes().route_layer(auth))
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(state.uploads.dir()))
        // Global middleware
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Credentialed CORS for the single configured storefront origin.
fn cors_layer(config: &Config) -> CorsLayer {
    let origin = match config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => origin,
        Err(_) => {
            tracing::warn!(
                origin = %config.cors_origin,
                "Invalid CORS_ORIGIN, falling back to {}",
                DEFAULT_CORS_ORIGIN
            );
            HeaderValue::from_static(DEFAULT_CORS_ORIGIN)
        }
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

/// Root endpoint
async fn root() -> &'static str {
    "Door Elite API is running"
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
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with database connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match state.database.ping().await {
        Ok(_) => ServiceStatus {
            status: "healthy",
            error: None,
        },
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            ServiceStatus {
                status: "unhealthy",
                error: Some("database unreachable".to_string()),
            }
        }
    };

    let healthy = database.status == "healthy";
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        services: ServiceHealth { database },
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
