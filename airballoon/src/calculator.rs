//! Relative airmass calculation.
//!
//! This module provides [`AirmassCalculator`], which integrates the column
//! density along the line of sight and normalizes it by the column density
//! straight up from sea level.
//!
//! ```text
//!      σ(y_obs = elevation, z = 90° − altitude)
//! X = ──────────────────────────────────────────
//!              σ(y_obs = 0, z = 0°)
//! ```

use std::borrow::Cow;
use std::sync::OnceLock;

use tracing::debug;

use crate::atmosphere::DensityModel;
use crate::config::AirmassCalculatorBuilder;
use crate::error::Result;
use crate::geometry::{ObservationGeometry, KARMAN_LINE_M};
use crate::integrand::ColumnIntegrand;
use crate::quadrature::{Estimate, Quadrature};

/// Computes relative airmass for observers anywhere below the Karman line.
///
/// The calculator is immutable apart from the sea-level zenith column
/// density, which is integrated once on first use and then reused. It is
/// `Send + Sync` and can be shared between threads.
///
/// # Example
///
/// ```
/// use airballoon::AirmassCalculator;
///
/// let calculator = AirmassCalculator::new();
///
/// // Straight up from sea level is one airmass by definition
/// assert_eq!(calculator.airmass(90.0, 0.0)?, 1.0);
///
/// // Thirty degrees above the horizon is roughly sec(60°) = 2
/// let x = calculator.airmass(30.0, 0.0)?;
/// assert!((x - 2.0).abs() < 0.02);
/// # Ok::<(), airballoon::AirmassError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AirmassCalculator {
    model: Cow<'static, DensityModel>,
    quadrature: Quadrature,
    strict_altitude: bool,
    /// Sea-level zenith column density, kg/m².
    zenith_reference: OnceLock<f64>,
}

impl Default for AirmassCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl AirmassCalculator {
    /// Calculator over the CIRA-2012 atmosphere with the default tolerance
    /// (relative 1e-3, absolute 0).
    pub fn new() -> Self {
        Self::from_parts(
            Cow::Borrowed(DensityModel::cira_2012()),
            Quadrature::default(),
            false,
        )
    }

    /// Create a builder for more configuration options.
    pub fn builder() -> AirmassCalculatorBuilder {
        AirmassCalculatorBuilder::new()
    }

    pub(crate) fn from_parts(
        model: Cow<'static, DensityModel>,
        quadrature: Quadrature,
        strict_altitude: bool,
    ) -> Self {
        Self {
            model,
            quadrature,
            strict_altitude,
            zenith_reference: OnceLock::new(),
        }
    }

    /// Relative airmass toward a target `altitude` degrees above the horizon,
    /// seen from `elevation` meters above sea level.
    ///
    /// # Arguments
    ///
    /// * `altitude` - Target altitude in degrees, documented as 0 to 90
    /// * `elevation` - Observer elevation in meters, 0 to (but excluding) 100 km
    ///
    /// # Returns
    ///
    /// The dimensionless airmass, accurate to roughly 0.1%.
    ///
    /// # Errors
    ///
    /// - [`crate::AirmassError::InvalidArgumentValue`] for negative input (or
    ///   altitude above 90° in strict mode)
    /// - [`crate::AirmassError::ElevationOutOfRange`] for elevations of 100 km or more
    /// - [`crate::AirmassError::IntegrationFailure`] if the quadrature fails
    pub fn airmass(&self, altitude: f64, elevation: f64) -> Result<f64> {
        let geometry = self.geometry(altitude, elevation)?;
        self.airmass_at(&geometry)
    }

    /// Relative airmass for an already validated geometry.
    pub fn airmass_at(&self, geometry: &ObservationGeometry) -> Result<f64> {
        let absolute = self.column_density(geometry)?;
        let reference = self.zenith_column_density()?;
        Ok(absolute.value / reference)
    }

    /// Airmass at each of `altitudes` for a single observer elevation.
    ///
    /// Stops at the first failing altitude.
    pub fn airmass_series(&self, altitudes: &[f64], elevation: f64) -> Result<Vec<f64>> {
        altitudes
            .iter()
            .map(|&altitude| self.airmass(altitude, elevation))
            .collect()
    }

    /// Absolute column density (kg/m²) along the line of sight from the
    /// observer to the Karman line.
    pub fn column_density(&self, geometry: &ObservationGeometry) -> Result<Estimate> {
        self.integrate(
            geometry.zenith_angle_deg(),
            geometry.observer_elevation_m(),
        )
    }

    /// Column density (kg/m²) straight up from sea level.
    ///
    /// This is the normalization of every airmass. It is computed on the
    /// first call and cached; a failed attempt is not cached.
    pub fn zenith_column_density(&self) -> Result<f64> {
        if let Some(&reference) = self.zenith_reference.get() {
            return Ok(reference);
        }

        let reference = self.integrate(0.0, 0.0)?.value;
        // Racing threads all compute the same value
        let _ = self.zenith_reference.set(reference);
        Ok(reference)
    }

    /// Validate inputs according to this calculator's altitude policy.
    pub fn geometry(&self, altitude: f64, elevation: f64) -> Result<ObservationGeometry> {
        if self.strict_altitude {
            ObservationGeometry::new_strict(altitude, elevation)
        } else {
            ObservationGeometry::new(altitude, elevation)
        }
    }

    /// The density model in use.
    pub fn model(&self) -> &DensityModel {
        &self.model
    }

    /// The quadrature settings in use.
    pub fn quadrature(&self) -> &Quadrature {
        &self.quadrature
    }

    /// Whether altitudes above 90° are rejected.
    pub fn strict_altitude(&self) -> bool {
        self.strict_altitude
    }

    fn integrate(&self, zenith_deg: f64, observer_elevation_m: f64) -> Result<Estimate> {
        let integrand = ColumnIntegrand::new(&self.model, zenith_deg, observer_elevation_m);
        let estimate = self.quadrature.integrate(
            |height| integrand.eval_above_observer(height),
            0.0,
            KARMAN_LINE_M - observer_elevation_m,
        )?;

        debug!(
            zenith_deg,
            observer_elevation_m,
            column_density = estimate.value,
            abs_error = estimate.abs_error,
            evaluations = estimate.evaluations,
            subdivisions = estimate.subdivisions,
            "Column density integrated"
        );

        Ok(estimate)
    }
}

/// Relative airmass using a shared default [`AirmassCalculator`].
///
/// See [`AirmassCalculator::airmass`].
///
/// # Example
///
/// ```
/// let x = airballoon::airmass(45.0, 4_205.0)?; // Mauna Kea
/// assert!(x > 0.8 && x < 1.0);
/// # Ok::<(), airballoon::AirmassError>(())
/// ```
pub fn airmass(altitude: f64, elevation: f64) -> Result<f64> {
    static CALCULATOR: OnceLock<AirmassCalculator> = OnceLock::new();
    CALCULATOR
        .get_or_init(AirmassCalculator::new)
        .airmass(altitude, elevation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AirmassError;
    use approx::assert_relative_eq;

    #[test]
    fn test_zenith_from_sea_level_is_one() {
        let calculator = AirmassCalculator::new();
        assert_relative_eq!(calculator.airmass(90.0, 0.0).unwrap(), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_plane_parallel_limit() {
        // Away from the horizon the curved atmosphere is close to sec(z)
        let calculator = AirmassCalculator::new();
        for altitude in [30.0f64, 45.0, 60.0, 75.0] {
            let expected = 1.0 / altitude.to_radians().sin();
            let x = calculator.airmass(altitude, 0.0).unwrap();
            assert_relative_eq!(x, expected, max_relative = 1e-2);
            assert!(x <= expected * 1.001, "curvature shortens the path");
        }
    }

    #[test]
    fn test_horizon_airmass() {
        // Grazing incidence through a ~8 km scale height: a few tens of airmasses
        let x = AirmassCalculator::new().airmass(0.0, 0.0).unwrap();
        assert!(x > 30.0 && x < 45.0, "horizon airmass {}", x);
    }

    #[test]
    fn test_increases_toward_horizon() {
        let calculator = AirmassCalculator::new();
        for elevation in [0.0, 3_000.0, 30_000.0] {
            let mut previous = calculator.airmass(90.0, elevation).unwrap();
            for step in 1..=18 {
                let altitude = 90.0 - 5.0 * step as f64;
                let x = calculator.airmass(altitude, elevation).unwrap();
                assert!(
                    x >= previous,
                    "airmass fell from {} to {} at altitude {} (elevation {})",
                    previous,
                    x,
                    altitude,
                    elevation
                );
                previous = x;
            }
        }
    }

    #[test]
    fn test_higher_observer_sees_less_air() {
        let calculator = AirmassCalculator::new();
        for altitude in [90.0, 45.0, 10.0, 0.0] {
            let sea_level = calculator.airmass(altitude, 0.0).unwrap();
            let mut previous = sea_level;
            for elevation in [1_000.0, 5_000.0, 20_000.0, 50_000.0] {
                let x = calculator.airmass(altitude, elevation).unwrap();
                assert!(x <= sea_level);
                assert!(x <= previous);
                previous = x;
            }
        }
    }

    #[test]
    fn test_zenith_from_altitude() {
        // Straight up from 5 km leaves a bit over half the column overhead
        let x = AirmassCalculator::new().airmass(90.0, 5_000.0).unwrap();
        assert!(x > 0.50 && x < 0.56, "airmass {}", x);
    }

    #[test]
    fn test_validation_precedes_integration() {
        let calculator = AirmassCalculator::new();
        assert!(matches!(
            calculator.airmass(-1.0, 0.0),
            Err(AirmassError::InvalidArgumentValue { .. })
        ));
        assert!(matches!(
            calculator.airmass(45.0, 100_000.0),
            Err(AirmassError::ElevationOutOfRange { .. })
        ));
        assert!(calculator.zenith_reference.get().is_none());
        assert!(calculator.airmass(45.0, 99_999.9).is_ok());
    }

    #[test]
    fn test_reference_is_cached() {
        let calculator = AirmassCalculator::new();
        assert!(calculator.zenith_reference.get().is_none());
        let first = calculator.zenith_column_density().unwrap();
        assert_eq!(calculator.zenith_reference.get(), Some(&first));
        assert_eq!(calculator.zenith_column_density().unwrap(), first);
    }

    #[test]
    fn test_column_density_magnitude() {
        // About 1.03e4 kg/m² for a standard atmosphere
        let calculator = AirmassCalculator::new();
        let sigma = calculator.zenith_column_density().unwrap();
        assert!(sigma > 8_500.0 && sigma < 10_500.0, "column density {}", sigma);

        let geometry = ObservationGeometry::new(90.0, 0.0).unwrap();
        let estimate = calculator.column_density(&geometry).unwrap();
        assert_eq!(estimate.value, sigma);
        assert!(estimate.abs_error <= 1e-3 * sigma);
    }

    #[test]
    fn test_airmass_series() {
        let calculator = AirmassCalculator::new();
        let series = calculator.airmass_series(&[90.0, 30.0], 0.0).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[1], calculator.airmass(30.0, 0.0).unwrap());

        assert!(calculator.airmass_series(&[90.0, -3.0], 0.0).is_err());
    }

    #[test]
    fn test_altitude_above_zenith_is_permissive() {
        // 120° altitude mirrors 60°: cos² is even in the zenith angle
        let calculator = AirmassCalculator::new();
        let mirrored = calculator.airmass(120.0, 0.0).unwrap();
        let direct = calculator.airmass(60.0, 0.0).unwrap();
        assert_relative_eq!(mirrored, direct, max_relative = 1e-9);
    }

    #[test]
    fn test_shared_default() {
        assert_eq!(
            airmass(50.0, 1_000.0).unwrap(),
            AirmassCalculator::new().airmass(50.0, 1_000.0).unwrap()
        );
    }

    #[test]
    fn test_calculator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AirmassCalculator>();
    }
}
