//! Line-of-sight column density integrand.
//!
//! The column density along a path `s` is `σ = ∫ ρ(s) ds`. For a spherical
//! Earth of radius `Rₑ`, an observer at elevation `y_obs` and a target at
//! zenith angle `z`, changing variables from path length to height gives
//!
//! ```text
//!                 y_atm
//! σ(y_obs, z) =   ∫      ρ(y) (Rₑ + y) dy
//!                y_obs  ─────────────────────────────────────────────────────
//!                       √((Rₑ + y_obs)² cos² z − 2Rₑ(y_obs − y) + y² − y_obs²)
//! ```
//!
//! The observer is not assumed to sit at sea level.
//!
//! The radicand is evaluated as `(Rₑ + y_obs)² cos² z + (y − y_obs)(2Rₑ + y + y_obs)`,
//! algebraically the same expression. Written out term by term it cancels to
//! zero next to the observer for a horizontal line of sight.

use crate::atmosphere::DensityModel;
use crate::error::{QuadratureFailure, Result};

/// Mean radius of the Earth in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Integrand of the column density integral at height `y` meters.
///
/// `zenith_deg` is the zenith angle of the target in degrees and
/// `observer_elevation_m` the observer's height above sea level.
///
/// # Errors
///
/// - [`crate::AirmassError::OutsideTable`] if `y` is outside the density model
/// - [`crate::AirmassError::IntegrationFailure`] if the radicand is not positive
pub fn column_density_integrand(
    model: &DensityModel,
    y: f64,
    zenith_deg: f64,
    observer_elevation_m: f64,
) -> Result<f64> {
    let cos_z = zenith_deg.to_radians().cos();
    evaluate(
        model,
        y,
        y - observer_elevation_m,
        cos_z * cos_z,
        zenith_deg,
        observer_elevation_m,
    )
}

/// The integrand with the viewing geometry bound.
///
/// The calculator integrates over the height above the observer,
/// `|h| integrand.eval_above_observer(h)`, which keeps full precision next to
/// the observer where the integrand is steepest.
#[derive(Debug, Clone, Copy)]
pub struct ColumnIntegrand<'a> {
    model: &'a DensityModel,
    zenith_deg: f64,
    observer_elevation_m: f64,
    cos2_z: f64,
}

impl<'a> ColumnIntegrand<'a> {
    /// Bind a zenith angle (degrees) and observer elevation (meters).
    pub fn new(model: &'a DensityModel, zenith_deg: f64, observer_elevation_m: f64) -> Self {
        let cos_z = zenith_deg.to_radians().cos();
        Self {
            model,
            zenith_deg,
            observer_elevation_m,
            cos2_z: cos_z * cos_z,
        }
    }

    /// Evaluate at height `y` meters.
    pub fn eval(&self, y: f64) -> Result<f64> {
        evaluate(
            self.model,
            y,
            y - self.observer_elevation_m,
            self.cos2_z,
            self.zenith_deg,
            self.observer_elevation_m,
        )
    }

    /// Evaluate at `height` meters above the observer.
    ///
    /// The absolute height is capped at the top of the model, so rounding in
    /// `observer + height` cannot step outside the table.
    pub fn eval_above_observer(&self, height: f64) -> Result<f64> {
        let y = (self.observer_elevation_m + height).min(self.model.max_elevation());
        evaluate(
            self.model,
            y,
            height,
            self.cos2_z,
            self.zenith_deg,
            self.observer_elevation_m,
        )
    }

    pub fn zenith_deg(&self) -> f64 {
        self.zenith_deg
    }

    pub fn observer_elevation_m(&self) -> f64 {
        self.observer_elevation_m
    }
}

/// `height` is `y − y_obs`, passed separately so it is not recomputed from
/// two nearly equal elevations.
fn evaluate(
    model: &DensityModel,
    y: f64,
    height: f64,
    cos2_z: f64,
    zenith_deg: f64,
    y_obs: f64,
) -> Result<f64> {
    let r_obs = EARTH_RADIUS_M + y_obs;
    let radicand = r_obs * r_obs * cos2_z + height * (2.0 * EARTH_RADIUS_M + y + y_obs);

    if radicand.is_nan() || radicand <= 0.0 {
        return Err(QuadratureFailure::Domain {
            y,
            zenith_deg,
            observer_elevation_m: y_obs,
        }
        .into());
    }

    Ok(model.density(y)? * (EARTH_RADIUS_M + y) / radicand.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AirmassError;
    use approx::assert_relative_eq;

    #[test]
    fn test_zenith_reduces_to_density() {
        // z = 0: the radicand is (Rₑ + y)², so the integrand is ρ(y)
        let model = DensityModel::cira_2012();
        for y in [0.0, 1_000.0, 20_000.0, 55_555.0, 99_999.0] {
            let value = column_density_integrand(model, y, 0.0, 0.0).unwrap();
            assert_relative_eq!(value, model.density(y).unwrap(), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_zenith_from_altitude_reduces_to_density() {
        let model = DensityModel::cira_2012();
        let value = column_density_integrand(model, 30_000.0, 0.0, 4_000.0).unwrap();
        assert_relative_eq!(
            value,
            model.density(30_000.0).unwrap(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_slant_path_is_longer() {
        let model = DensityModel::cira_2012();
        let y = 2_000.0;
        let zenith = column_density_integrand(model, y, 0.0, 0.0).unwrap();
        let slant = column_density_integrand(model, y, 60.0, 0.0).unwrap();

        // Near the ground the slant factor is close to sec(z) = 2
        assert!(slant > zenith);
        assert_relative_eq!(slant / zenith, 2.0, max_relative = 1e-2);
    }

    #[test]
    fn test_bound_integrand_matches_free_function() {
        let model = DensityModel::cira_2012();
        let integrand = ColumnIntegrand::new(model, 37.5, 1_200.0);
        assert_eq!(integrand.zenith_deg(), 37.5);
        assert_eq!(integrand.observer_elevation_m(), 1_200.0);
        for y in [1_200.5, 5_000.0, 80_000.0] {
            assert_eq!(
                integrand.eval(y).unwrap(),
                column_density_integrand(model, y, 37.5, 1_200.0).unwrap()
            );
        }
    }

    #[test]
    fn test_horizon_is_singular_but_defined_above_observer() {
        let model = DensityModel::cira_2012();
        let near = column_density_integrand(model, 1.0, 90.0, 0.0).unwrap();
        let far = column_density_integrand(model, 1_000.0, 90.0, 0.0).unwrap();
        assert!(near.is_finite());
        assert!(near > far);
    }

    #[test]
    fn test_horizon_at_observer_stays_positive() {
        // The cos² z term alone must keep the radicand positive
        let model = DensityModel::cira_2012();
        for y_obs in [0.0, 400.37, 2_000.0, 99_999.999] {
            let value = column_density_integrand(model, y_obs, 90.0, y_obs).unwrap();
            assert!(value.is_finite() && value > 0.0, "y_obs {}: {}", y_obs, value);

            let integrand = ColumnIntegrand::new(model, -90.0, y_obs);
            let value = integrand.eval_above_observer(1e-9).unwrap();
            assert!(value.is_finite() && value > 0.0, "y_obs {}: {}", y_obs, value);
        }
    }

    #[test]
    fn test_height_above_observer_matches_absolute() {
        let model = DensityModel::cira_2012();
        let integrand = ColumnIntegrand::new(model, 80.0, 3_000.0);
        for height in [0.5, 1_000.0, 50_000.0] {
            assert_relative_eq!(
                integrand.eval_above_observer(height).unwrap(),
                integrand.eval(3_000.0 + height).unwrap(),
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn test_height_above_observer_capped_at_model_top() {
        let model = DensityModel::cira_2012();
        let integrand = ColumnIntegrand::new(model, 45.0, 99_999.999);
        // 99_999.999 + 0.001 may round past 100 km
        assert!(integrand.eval_above_observer(0.001).is_ok());
    }

    #[test]
    fn test_below_observer_is_domain_error() {
        let model = DensityModel::cira_2012();
        let result = column_density_integrand(model, 0.0, 90.0, 5_000.0);
        assert!(matches!(
            result,
            Err(AirmassError::IntegrationFailure(QuadratureFailure::Domain { .. }))
        ));
    }

    #[test]
    fn test_outside_model_propagates() {
        let model = DensityModel::cira_2012();
        let result = column_density_integrand(model, 100_001.0, 0.0, 0.0);
        assert!(matches!(result, Err(AirmassError::OutsideTable { .. })));
    }
}
