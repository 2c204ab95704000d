//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.server.allowed_origins);

    Router::new()
        // Search routes
        .route("/api/tomtom/charging-stations", post(handlers::charging_stations))
        .route("/api/tomtom/pois", post(handlers::pois))
        // Routing pass-throughs
        .route("/api/tomtom/reachable-range", post(handlers::reachable_range))
        .route("/api/tomtom/ev-route", post(handlers::ev_route))
        // Service routes
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        // Add middleware
        .layer(cors)
        // Add state
        .with_state(state)
}

/// CORS for the configured origins. A `*` entry allows any origin, which
/// rules out credentialed requests.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(86_400));

    if allowed_origins.iter().any(|origin| origin.trim() == "*") {
        tracing::warn!("CORS allows any origin; credentials are disabled");
        return base.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}
