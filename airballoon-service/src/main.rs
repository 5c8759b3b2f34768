//! airballoon Service - HTTP microservice for airmass calculations.
//!
//! A REST API computing relative airmass for observers at any elevation.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AIRBALLOON_PORT` | HTTP server port | 8080 |
//! | `AIRBALLOON_REL_TOLERANCE` | Relative quadrature tolerance | 1e-3 |
//! | `AIRBALLOON_ABS_TOLERANCE` | Absolute quadrature tolerance | 0 |
//! | `AIRBALLOON_MAX_SUBDIVISIONS` | Maximum quadrature intervals | 200 |
//! | `AIRBALLOON_STRICT_ALTITUDE` | Reject altitudes above 90° | false |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `GET /airmass?altitude=A&elevation=E` - Relative airmass
//! - `GET /density?elevation=E` - Atmospheric density
//! - `GET /health` - Health check
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use airballoon::AirmassCalculatorBuilder;
use airballoon_service::{handlers, router, AppState};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation for the airballoon service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "airballoon Airmass Service",
        version = "0.1.0",
        description = "REST API computing astronomical airmass for observers at any elevation.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "Pedro Sanz Martinez", url = "https://github.com/pedrosanzmtz/airballoon")
    ),
    paths(
        handlers::get_airmass,
        handlers::get_density,
        handlers::health_check,
    ),
    components(
        schemas(
            handlers::AirmassResponse,
            handlers::DensityResponse,
            handlers::ErrorResponse,
            handlers::HealthResponse,
        )
    ),
    tags(
        (name = "airmass", description = "Airmass and density endpoints"),
        (name = "system", description = "System and health endpoints")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "airballoon_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load port from environment (service-specific config)
    let port: u16 = std::env::var("AIRBALLOON_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    // The library handles AIRBALLOON_REL_TOLERANCE, AIRBALLOON_ABS_TOLERANCE,
    // AIRBALLOON_MAX_SUBDIVISIONS and AIRBALLOON_STRICT_ALTITUDE
    let calculator = AirmassCalculatorBuilder::from_env().build()?;

    tracing::info!(
        rel_tolerance = calculator.quadrature().tolerance().relative,
        abs_tolerance = calculator.quadrature().tolerance().absolute,
        max_subdivisions = calculator.quadrature().max_subdivisions(),
        strict_altitude = calculator.strict_altitude(),
        port = port,
        "Starting airballoon service"
    );

    // Integrate the sea-level reference before taking traffic
    let zenith = calculator.zenith_column_density()?;
    tracing::info!(zenith_column_density = zenith, "Reference column density ready");

    let state = Arc::new(AppState { calculator });

    // Build router
    let app = router(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
