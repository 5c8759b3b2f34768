//! Error types for the airballoon library.

use thiserror::Error;

/// Errors that can occur when computing airmass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AirmassError {
    /// A non-scalar value was supplied where a single number is required.
    #[error("Altitude and elevation must be floats or integers ({name} was a {found})")]
    InvalidArgumentType {
        name: &'static str,
        found: &'static str,
    },

    /// Altitude or elevation is negative (or not finite).
    #[error("Altitude and elevation must be greater than or equal to zero ({name}={value})")]
    InvalidArgumentValue { name: &'static str, value: f64 },

    /// Observer elevation at or above the top of the modelled atmosphere.
    #[error("Elevation must be less than 100km (got {elevation}m)")]
    ElevationOutOfRange { elevation: f64 },

    /// Density requested outside the calibration range of the table.
    #[error("Elevation {elevation}m outside atmosphere table range [{min}m, {max}m]")]
    OutsideTable { elevation: f64, min: f64, max: f64 },

    /// A density table that cannot back a log-linear interpolant.
    #[error("Invalid atmosphere table: {reason}")]
    InvalidTable { reason: String },

    /// The quadrature did not converge or the integrand was undefined.
    #[error("Integration failed: {0}")]
    IntegrationFailure(#[from] QuadratureFailure),
}

/// Reasons the adaptive quadrature can give up.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuadratureFailure {
    /// The error target was not met within the allowed number of intervals.
    #[error(
        "maximum of {limit} subdivisions reached (estimate={estimate}, abs_error={abs_error})"
    )]
    SubdivisionLimit {
        limit: usize,
        estimate: f64,
        abs_error: f64,
    },

    /// An interval became too narrow to bisect in floating point.
    #[error("roundoff prevents bisecting [{a}, {b}]")]
    Roundoff { a: f64, b: f64 },

    /// The integrand returned NaN or an infinity.
    #[error("integrand is not finite at x={x} (value={value})")]
    NonFinite { x: f64, value: f64 },

    /// The line-of-sight integrand has a non-positive radicand.
    #[error(
        "column density integrand undefined at y={y}m (zenith={zenith_deg}°, observer={observer_elevation_m}m)"
    )]
    Domain {
        y: f64,
        zenith_deg: f64,
        observer_elevation_m: f64,
    },
}

/// Result type alias using [`AirmassError`].
pub type Result<T> = std::result::Result<T, AirmassError>;
