//! HTTP request handlers for the airmass service.

use airballoon::{parse_scalar, AirmassError};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::AppState;

/// Query parameters for the airmass endpoint.
///
/// Values are taken as text so that list-valued input can be reported as a
/// type error rather than a generic parse failure.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AirmassQuery {
    /// Target altitude above the horizon in degrees (0 to 90).
    pub altitude: String,
    /// Observer elevation above sea level in meters (0 to 100000, exclusive).
    /// Default is sea level.
    pub elevation: Option<String>,
}

/// Query parameters for the density endpoint.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct DensityQuery {
    /// Elevation above sea level in meters (0 to 100000).
    pub elevation: String,
}

/// Successful airmass response.
#[derive(Debug, Serialize, ToSchema)]
pub struct AirmassResponse {
    /// Target altitude queried, degrees.
    pub altitude: f64,
    /// Observer elevation queried, meters.
    pub elevation: f64,
    /// Zenith angle of the target, degrees.
    pub zenith_angle: f64,
    /// Relative airmass (1.0 at the zenith from sea level).
    pub airmass: f64,
}

/// Successful density response.
#[derive(Debug, Serialize, ToSchema)]
pub struct DensityResponse {
    /// Elevation queried, meters.
    pub elevation: f64,
    /// Atmospheric density, kg/m³.
    pub density: f64,
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Get relative airmass for a target altitude and observer elevation.
///
/// # Returns
///
/// - `200 OK` with the airmass on success
/// - `400 Bad Request` if an argument is not a number or out of range
/// - `422 Unprocessable Entity` if the integration does not converge
#[utoipa::path(
    get,
    path = "/airmass",
    params(AirmassQuery),
    responses(
        (status = 200, description = "Relative airmass", body = AirmassResponse),
        (status = 400, description = "Invalid altitude or elevation", body = ErrorResponse),
        (status = 422, description = "Integration failed", body = ErrorResponse)
    ),
    tag = "airmass"
)]
pub async fn get_airmass(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AirmassQuery>,
) -> impl IntoResponse {
    tracing::debug!(
        altitude = %query.altitude,
        elevation = ?query.elevation,
        "Airmass query"
    );

    let result = parse_airmass_query(&query).and_then(|(altitude, elevation)| {
        let geometry = state.calculator.geometry(altitude, elevation)?;
        let airmass = state.calculator.airmass_at(&geometry)?;
        Ok(AirmassResponse {
            altitude,
            elevation,
            zenith_angle: geometry.zenith_angle_deg(),
            airmass,
        })
    });

    match result {
        Ok(response) => {
            tracing::info!(
                altitude = response.altitude,
                elevation = response.elevation,
                airmass = response.airmass,
                "Airmass computed"
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

fn parse_airmass_query(query: &AirmassQuery) -> airballoon::Result<(f64, f64)> {
    let altitude = parse_scalar("altitude", &query.altitude)?;
    let elevation = match &query.elevation {
        Some(raw) => parse_scalar("elevation", raw)?,
        None => 0.0,
    };
    Ok((altitude, elevation))
}

/// Get atmospheric density at an elevation.
#[utoipa::path(
    get,
    path = "/density",
    params(DensityQuery),
    responses(
        (status = 200, description = "Interpolated density", body = DensityResponse),
        (status = 400, description = "Invalid elevation", body = ErrorResponse)
    ),
    tag = "airmass"
)]
pub async fn get_density(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DensityQuery>,
) -> impl IntoResponse {
    let result = parse_scalar("elevation", &query.elevation).and_then(|elevation| {
        let density = state.calculator.model().density(elevation)?;
        Ok(DensityResponse { elevation, density })
    });

    match result {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Create an error response for a failed calculation.
fn error_response(e: AirmassError) -> axum::response::Response {
    let status = match &e {
        AirmassError::InvalidArgumentType { .. }
        | AirmassError::InvalidArgumentValue { .. }
        | AirmassError::ElevationOutOfRange { .. }
        | AirmassError::OutsideTable { .. } => StatusCode::BAD_REQUEST,
        AirmassError::IntegrationFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AirmassError::InvalidTable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    tracing::warn!(error = %e, status = status.as_u16(), "Airmass query failed");

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse)),
    tag = "system"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airmass_query_deserialize() {
        let json = r#"{"altitude": "35.5", "elevation": "4205"}"#;
        let query: AirmassQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.altitude, "35.5");
        assert_eq!(query.elevation.as_deref(), Some("4205"));
        assert_eq!(parse_airmass_query(&query).unwrap(), (35.5, 4205.0));
    }

    #[test]
    fn test_elevation_defaults_to_sea_level() {
        let query = AirmassQuery {
            altitude: "60".to_string(),
            elevation: None,
        };
        assert_eq!(parse_airmass_query(&query).unwrap(), (60.0, 0.0));
    }

    #[test]
    fn test_airmass_response_serialize() {
        let response = AirmassResponse {
            altitude: 30.0,
            elevation: 0.0,
            zenith_angle: 60.0,
            airmass: 1.9943,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("1.9943"));
        assert!(json.contains("zenith_angle"));
    }

    #[test]
    fn test_error_status_mapping() {
        let response = error_response(AirmassError::InvalidArgumentType {
            name: "altitude",
            found: "sequence",
        });
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = error_response(
            airballoon::QuadratureFailure::Roundoff { a: 0.0, b: 0.0 }.into(),
        );
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
