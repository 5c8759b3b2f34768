//! Atmospheric density model.
//!
//! This module provides [`AtmosphereTable`], a calibration table of density
//! against elevation, and [`DensityModel`], which turns the table into a
//! continuous density function.
//!
//! Density falls off roughly exponentially with height, so the model
//! interpolates linearly in `ln(density)` and exponentiates the result. With
//! only six calibration points this is far closer to the real profile than
//! interpolating the densities themselves.

use std::sync::OnceLock;

use crate::error::{AirmassError, Result};

/// CIRA-2012 reference atmosphere densities, sea level to 100 km.
///
/// Pairs of `(elevation in meters, density in kg/m³)`.
///
/// Source: COSPAR International Reference Atmosphere, chapter 1.3
/// (rev. 2012-08-11).
pub const CIRA_2012: [(f64, f64); 6] = [
    (0.0, 1.16e0),
    (20_000.0, 9.37e-2),
    (40_000.0, 4.02e-3),
    (60_000.0, 3.26e-4),
    (80_000.0, 1.83e-5),
    (100_000.0, 5.73e-7),
];

/// An immutable table of `(elevation, density)` calibration points.
///
/// Elevations are strictly increasing and densities strictly positive, so
/// every density has a logarithm.
#[derive(Debug, Clone, PartialEq)]
pub struct AtmosphereTable {
    points: Vec<(f64, f64)>,
}

impl AtmosphereTable {
    /// Build a table from `(elevation_m, density_kg_m3)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`AirmassError::InvalidTable`] if there are fewer than two
    /// points, elevations are not strictly increasing, or any value is not a
    /// finite number (densities must also be positive).
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self> {
        if points.len() < 2 {
            return Err(AirmassError::InvalidTable {
                reason: format!("need at least 2 points, got {}", points.len()),
            });
        }

        for &(elevation, density) in &points {
            if !elevation.is_finite() {
                return Err(AirmassError::InvalidTable {
                    reason: format!("elevation {} is not finite", elevation),
                });
            }
            if !(density.is_finite() && density > 0.0) {
                return Err(AirmassError::InvalidTable {
                    reason: format!(
                        "density {} at {}m must be finite and positive",
                        density, elevation
                    ),
                });
            }
        }

        if let Some(pair) = points.windows(2).find(|w| w[1].0 <= w[0].0) {
            return Err(AirmassError::InvalidTable {
                reason: format!(
                    "elevations must be strictly increasing ({}m followed by {}m)",
                    pair[0].0, pair[1].0
                ),
            });
        }

        Ok(Self { points })
    }

    /// The CIRA-2012 table from sea level to the Karman line.
    pub fn cira_2012() -> Self {
        Self {
            points: CIRA_2012.to_vec(),
        }
    }

    /// Calibration points as `(elevation_m, density_kg_m3)`.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Lowest tabulated elevation in meters.
    pub fn min_elevation(&self) -> f64 {
        self.points[0].0
    }

    /// Highest tabulated elevation in meters.
    pub fn max_elevation(&self) -> f64 {
        self.points[self.points.len() - 1].0
    }
}

/// Log-linear density interpolant over an [`AtmosphereTable`].
///
/// Construction takes the logarithm of each tabulated density once; lookups
/// are a binary search plus one `exp`.
///
/// # Example
///
/// ```
/// use airballoon::DensityModel;
///
/// let model = DensityModel::cira_2012();
/// assert_eq!(model.density(0.0)?, 1.16);
///
/// let rho = model.density(10_000.0)?;
/// assert!(rho < 1.16 && rho > 9.37e-2);
/// # Ok::<(), airballoon::AirmassError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DensityModel {
    table: AtmosphereTable,
    /// Tabulated elevations, split out for `partition_point`.
    elevations: Vec<f64>,
    /// Natural log of each tabulated density.
    log_densities: Vec<f64>,
}

impl DensityModel {
    /// Build the interpolant for `table`.
    pub fn new(table: AtmosphereTable) -> Self {
        let elevations = table.points.iter().map(|&(e, _)| e).collect();
        let log_densities = table.points.iter().map(|&(_, d)| d.ln()).collect();

        Self {
            table,
            elevations,
            log_densities,
        }
    }

    /// Shared CIRA-2012 model, built on first use.
    pub fn cira_2012() -> &'static DensityModel {
        static MODEL: OnceLock<DensityModel> = OnceLock::new();
        MODEL.get_or_init(|| DensityModel::new(AtmosphereTable::cira_2012()))
    }

    /// Density of the atmosphere in kg/m³ at `elevation` meters above sea level.
    ///
    /// Tabulated elevations return the tabulated density exactly.
    ///
    /// # Errors
    ///
    /// Returns [`AirmassError::OutsideTable`] if `elevation` lies outside the
    /// table (or is NaN). The interpolant never extrapolates.
    pub fn density(&self, elevation: f64) -> Result<f64> {
        let min = self.table.min_elevation();
        let max = self.table.max_elevation();
        if !(min..=max).contains(&elevation) {
            return Err(AirmassError::OutsideTable {
                elevation,
                min,
                max,
            });
        }

        // Index of the first knot strictly above `elevation`
        let upper = self.elevations.partition_point(|&e| e <= elevation);
        let last = self.elevations.len() - 1;
        if upper > last {
            return Ok(self.table.points[last].1);
        }

        let lower = upper - 1;
        let (e0, e1) = (self.elevations[lower], self.elevations[upper]);
        if elevation == e0 {
            return Ok(self.table.points[lower].1);
        }

        let t = (elevation - e0) / (e1 - e0);
        let (l0, l1) = (self.log_densities[lower], self.log_densities[upper]);
        Ok((l0 + t * (l1 - l0)).exp())
    }

    /// The underlying calibration table.
    pub fn table(&self) -> &AtmosphereTable {
        &self.table
    }

    /// Lowest elevation the model covers, in meters.
    pub fn min_elevation(&self) -> f64 {
        self.table.min_elevation()
    }

    /// Highest elevation the model covers, in meters.
    pub fn max_elevation(&self) -> f64 {
        self.table.max_elevation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cira_endpoints_exact() {
        let model = DensityModel::cira_2012();
        assert_eq!(model.density(0.0).unwrap(), 1.16);
        assert_eq!(model.density(100_000.0).unwrap(), 5.73e-7);
    }

    #[test]
    fn test_passes_through_every_knot() {
        let model = DensityModel::cira_2012();
        for &(elevation, density) in CIRA_2012.iter() {
            assert_eq!(model.density(elevation).unwrap(), density);
        }
    }

    #[test]
    fn test_log_linear_midpoint() {
        let model = DensityModel::cira_2012();

        // Halfway between knots the log-linear value is the geometric mean
        let expected = (1.16f64 * 9.37e-2).sqrt();
        assert_relative_eq!(
            model.density(10_000.0).unwrap(),
            expected,
            max_relative = 1e-12
        );

        let expected = (3.26e-4f64 * 1.83e-5).sqrt();
        assert_relative_eq!(
            model.density(70_000.0).unwrap(),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_density_decreases_with_height() {
        let model = DensityModel::cira_2012();
        let mut previous = model.density(0.0).unwrap();
        for step in 1..=100 {
            let rho = model.density(step as f64 * 1000.0).unwrap();
            assert!(rho < previous, "density must fall at {}km", step);
            previous = rho;
        }
    }

    #[test]
    fn test_outside_table() {
        let model = DensityModel::cira_2012();

        let result = model.density(-1.0);
        assert!(matches!(result, Err(AirmassError::OutsideTable { .. })));

        let result = model.density(100_000.1);
        if let Err(AirmassError::OutsideTable {
            elevation,
            min,
            max,
        }) = result
        {
            assert_eq!(elevation, 100_000.1);
            assert_eq!(min, 0.0);
            assert_eq!(max, 100_000.0);
        } else {
            panic!("Expected OutsideTable error");
        }

        assert!(model.density(f64::NAN).is_err());
    }

    #[test]
    fn test_table_validation() {
        assert!(AtmosphereTable::new(vec![(0.0, 1.0)]).is_err());
        assert!(AtmosphereTable::new(vec![(0.0, 1.0), (0.0, 0.5)]).is_err());
        assert!(AtmosphereTable::new(vec![(10.0, 1.0), (0.0, 0.5)]).is_err());
        assert!(AtmosphereTable::new(vec![(0.0, 1.0), (10.0, 0.0)]).is_err());
        assert!(AtmosphereTable::new(vec![(0.0, -1.0), (10.0, 0.5)]).is_err());
        assert!(AtmosphereTable::new(vec![(0.0, 1.0), (f64::INFINITY, 0.5)]).is_err());

        let table = AtmosphereTable::new(CIRA_2012.to_vec()).unwrap();
        assert_eq!(table, AtmosphereTable::cira_2012());
        assert_eq!(table.min_elevation(), 0.0);
        assert_eq!(table.max_elevation(), 100_000.0);
    }

    #[test]
    fn test_custom_table() {
        let table = AtmosphereTable::new(vec![(0.0, 1.0), (1000.0, 1.0)]).unwrap();
        let model = DensityModel::new(table);
        assert_relative_eq!(model.density(500.0).unwrap(), 1.0, max_relative = 1e-15);
        assert_eq!(model.max_elevation(), 1000.0);
    }
}
