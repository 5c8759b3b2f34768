//! Calculator configuration.
//!
//! [`AirmassCalculatorBuilder`] sets up an [`AirmassCalculator`] in code or
//! from environment variables.

use std::borrow::Cow;

use crate::atmosphere::DensityModel;
use crate::calculator::AirmassCalculator;
use crate::error::{AirmassError, Result};
use crate::geometry::KARMAN_LINE_M;
use crate::quadrature::{Quadrature, Tolerance, DEFAULT_MAX_SUBDIVISIONS};

/// Builder for creating [`AirmassCalculator`] with custom configuration.
///
/// # Example
///
/// ```
/// use airballoon::AirmassCalculatorBuilder;
///
/// let calculator = AirmassCalculatorBuilder::new()
///     .relative_tolerance(1e-6)
///     .strict_altitude(true)
///     .build()?;
///
/// assert!(calculator.airmass(91.0, 0.0).is_err());
/// # Ok::<(), airballoon::AirmassError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AirmassCalculatorBuilder {
    model: Option<DensityModel>,
    tolerance: Tolerance,
    max_subdivisions: usize,
    strict_altitude: bool,
}

impl Default for AirmassCalculatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AirmassCalculatorBuilder {
    /// Create a builder with the defaults: CIRA-2012, relative tolerance 1e-3,
    /// 200 subdivisions, permissive altitude.
    pub fn new() -> Self {
        Self {
            model: None,
            tolerance: Tolerance::default(),
            max_subdivisions: DEFAULT_MAX_SUBDIVISIONS,
            strict_altitude: false,
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `AIRBALLOON_REL_TOLERANCE` | Relative quadrature tolerance | 1e-3 |
    /// | `AIRBALLOON_ABS_TOLERANCE` | Absolute quadrature tolerance (kg/m²) | 0 |
    /// | `AIRBALLOON_MAX_SUBDIVISIONS` | Maximum quadrature intervals | 200 |
    /// | `AIRBALLOON_STRICT_ALTITUDE` | Reject altitudes above 90° (`true`/`1`) | false |
    ///
    /// Unset or unparseable variables keep their defaults.
    ///
    /// # Example
    ///
    /// ```bash
    /// export AIRBALLOON_REL_TOLERANCE=1e-5
    /// export AIRBALLOON_STRICT_ALTITUDE=true
    /// ```
    pub fn from_env() -> Self {
        let mut builder = Self::new();

        if let Some(relative) = env_parse::<f64>("AIRBALLOON_REL_TOLERANCE") {
            builder.tolerance.relative = relative;
        }
        if let Some(absolute) = env_parse::<f64>("AIRBALLOON_ABS_TOLERANCE") {
            builder.tolerance.absolute = absolute;
        }
        if let Some(limit) = env_parse::<usize>("AIRBALLOON_MAX_SUBDIVISIONS") {
            builder.max_subdivisions = limit;
        }
        if let Ok(strict) = std::env::var("AIRBALLOON_STRICT_ALTITUDE") {
            builder.strict_altitude = strict.eq_ignore_ascii_case("true") || strict == "1";
        }

        builder
    }

    /// Use a custom density model instead of CIRA-2012.
    ///
    /// The model must cover sea level to the Karman line.
    pub fn model(mut self, model: DensityModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the relative quadrature tolerance. Default is 1e-3.
    pub fn relative_tolerance(mut self, relative: f64) -> Self {
        self.tolerance.relative = relative;
        self
    }

    /// Set the absolute quadrature tolerance in kg/m². Default is 0.
    pub fn absolute_tolerance(mut self, absolute: f64) -> Self {
        self.tolerance.absolute = absolute;
        self
    }

    /// Set the maximum number of quadrature intervals. Default is 200.
    pub fn max_subdivisions(mut self, limit: usize) -> Self {
        self.max_subdivisions = limit;
        self
    }

    /// Reject target altitudes above 90°. Default is false.
    pub fn strict_altitude(mut self, strict: bool) -> Self {
        self.strict_altitude = strict;
        self
    }

    /// Build the [`AirmassCalculator`].
    ///
    /// # Errors
    ///
    /// - [`AirmassError::InvalidArgumentValue`] for a negative or unreachable
    ///   tolerance, or a zero subdivision limit
    /// - [`AirmassError::InvalidTable`] if a custom model does not span
    ///   0 to 100 km
    pub fn build(self) -> Result<AirmassCalculator> {
        let Tolerance { absolute, relative } = self.tolerance;
        if !absolute.is_finite() || absolute < 0.0 {
            return Err(AirmassError::InvalidArgumentValue {
                name: "absolute tolerance",
                value: absolute,
            });
        }
        // Same floor QUADPACK applies to a purely relative request
        if !relative.is_finite() || (absolute == 0.0 && relative < 50.0 * f64::EPSILON) {
            return Err(AirmassError::InvalidArgumentValue {
                name: "relative tolerance",
                value: relative,
            });
        }
        if self.max_subdivisions == 0 {
            return Err(AirmassError::InvalidArgumentValue {
                name: "max subdivisions",
                value: 0.0,
            });
        }

        let model = match self.model {
            Some(model) => {
                if model.min_elevation() > 0.0 || model.max_elevation() < KARMAN_LINE_M {
                    return Err(AirmassError::InvalidTable {
                        reason: format!(
                            "table spans [{}m, {}m], need [0m, {}m]",
                            model.min_elevation(),
                            model.max_elevation(),
                            KARMAN_LINE_M
                        ),
                    });
                }
                Cow::Owned(model)
            }
            None => Cow::Borrowed(DensityModel::cira_2012()),
        };

        Ok(AirmassCalculator::from_parts(
            model,
            Quadrature::new(self.tolerance, self.max_subdivisions),
            self.strict_altitude,
        ))
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}
