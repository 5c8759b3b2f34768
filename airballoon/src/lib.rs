//! # airballoon - Astronomical Airmass at Any Elevation
//!
//! Relative airmass for observers anywhere from sea level up to the edge of
//! space: mountain observatories, aircraft, and high-altitude balloons.
//!
//! Airmass is the column density of air along the line of sight to a target,
//! divided by the column density straight up from sea level. It is 1.0 at the
//! zenith from sea level, grows toward the horizon, and drops below 1.0 as the
//! observer climbs above part of the atmosphere.
//!
//! ## Features
//!
//! - **Curved Atmosphere**: Integrates through a spherical, layered atmosphere
//!   rather than assuming `sec(z)`
//! - **Any Elevation**: The observer need not sit at sea level
//! - **Reference Model**: CIRA-2012 densities, interpolated log-linearly
//! - **Adaptive Quadrature**: 21-point Gauss–Kronrod, ~0.1% accuracy by default
//!
//! ## Quick Start
//!
//! ```
//! use airballoon::airmass;
//!
//! // Target 30° above the horizon, observed from sea level
//! let x = airmass(30.0, 0.0)?;
//! assert!((x - 2.0).abs() < 0.02);
//!
//! // Same target from a balloon at 35 km
//! let x = airmass(30.0, 35_000.0)?;
//! assert!(x < 0.05);
//! # Ok::<(), airballoon::AirmassError>(())
//! ```
//!
//! ## Input Ranges
//!
//! - **Altitude**: degrees above the horizon, 0 to 90 (values above 90 are
//!   accepted unless strict mode is enabled)
//! - **Elevation**: meters above sea level, 0 up to but excluding 100 km
//!
//! ## Not Modelled
//!
//! Refraction is ignored: pass the apparent (refracted) altitude if it matters.

pub mod atmosphere;
pub mod calculator;
pub mod config;
pub mod error;
pub mod geometry;
pub mod integrand;
pub mod quadrature;

// Re-export main types at crate root for convenience
pub use atmosphere::{AtmosphereTable, DensityModel, CIRA_2012};
pub use calculator::{airmass, AirmassCalculator};
pub use config::AirmassCalculatorBuilder;
pub use error::{AirmassError, QuadratureFailure, Result};
pub use geometry::{parse_scalar, ObservationGeometry, KARMAN_LINE_M};
pub use integrand::{column_density_integrand, ColumnIntegrand, EARTH_RADIUS_M};
pub use quadrature::{Estimate, Quadrature, Tolerance};
