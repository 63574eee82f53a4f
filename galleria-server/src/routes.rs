//! Router configuration module
//!
//! Configures all routes, middleware layers, and creates the application router.

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::{Config, DEFAULT_ALLOWED_ORIGIN};
use crate::handlers::{health, list_images_handler, ready, upload_handler, AppState};
use crate::openapi::ApiDoc;

/// Prefix kept for clients that fetch files from `/images/<name>`
pub const LEGACY_FILES_PREFIX: &str = "/images";

/// Create the application router with default limits and CORS (for testing)
pub fn create_router(state: AppState) -> Router {
    create_router_with_config(&Config::default(), state)
}

/// Create the application router with custom configuration
pub fn create_router_with_config(config: &Config, state: AppState) -> Router {
    let cors = cors_layer(config);

    // Request body limit
    let body_limit = RequestBodyLimitLayer::new(config.body_limit_bytes());

    // Request timeout
    let timeout = TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(config.timeout_secs),
    );

    // Generated URLs and file serving share one prefix
    let files = ServeDir::new(state.store.root());

    let router = Router::new()
        .route("/upload", post(upload_handler))
        .route("/api/images", get(list_images_handler))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest_service(galleria_core::PUBLIC_PREFIX, files.clone())
        .nest_service(LEGACY_FILES_PREFIX, files)
        .with_state(state)
        // Multipart uploads are limited by the body limit layer instead
        .layer(axum::extract::DefaultBodyLimit::disable())
        .layer(cors)
        .layer(body_limit)
        .layer(timeout);

    // Conditionally apply rate limiting (disabled in tests, enabled in production)
    if config.rate_limit_enabled {
        let Some(governor_conf) = GovernorConfigBuilder::default()
            .per_second(config.rate_limit_per_sec)
            .burst_size(config.rate_limit_burst)
            .finish()
        else {
            tracing::error!(
                per_sec = config.rate_limit_per_sec,
                burst = config.rate_limit_burst,
                "Invalid rate limit settings, rate limiting DISABLED"
            );
            return router.layer(TraceLayer::new_for_http());
        };

        tracing::info!(
            "Rate limiting: {} req/s (burst: {})",
            config.rate_limit_per_sec,
            config.rate_limit_burst
        );

        router
            .layer(GovernorLayer::new(Arc::new(governor_conf)))
            .layer(TraceLayer::new_for_http())
    } else {
        tracing::warn!("Rate limiting: DISABLED");
        router.layer(TraceLayer::new_for_http())
    }
}

/// CORS policy: configured origins, a fixed method and header allow-list.
///
/// PUT, DELETE and Authorization are allowed although no route uses them yet.
fn cors_layer(config: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match &config.allowed_origins {
        Some(origins) => {
            let mut origins: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            if origins.is_empty() {
                origins.push(HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN));
            }
            tracing::info!("CORS: Restricting to {} origin(s)", origins.len());
            base.allow_origin(origins)
        }
        None => {
            tracing::warn!("CORS: Allowing all origins");
            base.allow_origin(Any)
        }
    }
}

/// GET /api-docs/openapi.json
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
