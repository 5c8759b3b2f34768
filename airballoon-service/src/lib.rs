//! airballoon Service Library
//!
//! HTTP handlers and types for the airmass service.
//! This library is used by both the airballoon-service binary and integration tests.

pub mod handlers;

use std::sync::Arc;

use airballoon::AirmassCalculator;
use axum::{routing::get, Router};

/// Application state shared across handlers.
pub struct AppState {
    /// Calculator for airmass queries.
    pub calculator: AirmassCalculator,
}

/// Build the API routes (without documentation or middleware layers).
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/airmass", get(handlers::get_airmass))
        .route("/density", get(handlers::get_density))
        .route("/health", get(handlers::health_check))
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{
    AirmassQuery, AirmassResponse, DensityQuery, DensityResponse, ErrorResponse, HealthResponse,
};

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_router_serves_health() {
        let state = Arc::new(AppState {
            calculator: AirmassCalculator::new(),
        });

        let response = router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_router_unknown_route() {
        let state = Arc::new(AppState {
            calculator: AirmassCalculator::new(),
        });

        let response = router(state)
            .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
