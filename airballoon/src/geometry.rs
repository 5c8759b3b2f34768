//! Observer/target geometry and input validation.

use crate::error::{AirmassError, Result};

/// Top of the modelled atmosphere (the Karman line) in meters.
pub const KARMAN_LINE_M: f64 = 100_000.0;

/// Where the observer stands and where the target sits in the sky.
///
/// Construct with [`ObservationGeometry::new`], which applies the airmass
/// input rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationGeometry {
    target_altitude_deg: f64,
    observer_elevation_m: f64,
}

impl ObservationGeometry {
    /// Validate and bundle a target altitude and observer elevation.
    ///
    /// # Arguments
    ///
    /// * `target_altitude_deg` - Degrees above the horizon, documented as 0 to 90
    /// * `observer_elevation_m` - Meters above sea level, 0 to (but excluding) 100 km
    ///
    /// # Errors
    ///
    /// - [`AirmassError::InvalidArgumentValue`] if either value is negative or
    ///   not finite
    /// - [`AirmassError::ElevationOutOfRange`] if the elevation is 100 km or more
    ///
    /// Altitudes above 90° are accepted; see [`Self::new_strict`].
    pub fn new(target_altitude_deg: f64, observer_elevation_m: f64) -> Result<Self> {
        check_non_negative("altitude", target_altitude_deg)?;
        check_non_negative("elevation", observer_elevation_m)?;

        if observer_elevation_m >= KARMAN_LINE_M {
            return Err(AirmassError::ElevationOutOfRange {
                elevation: observer_elevation_m,
            });
        }

        Ok(Self {
            target_altitude_deg,
            observer_elevation_m,
        })
    }

    /// Like [`Self::new`], but also rejects altitudes above 90°.
    pub fn new_strict(target_altitude_deg: f64, observer_elevation_m: f64) -> Result<Self> {
        let geometry = Self::new(target_altitude_deg, observer_elevation_m)?;
        if target_altitude_deg > 90.0 {
            return Err(AirmassError::InvalidArgumentValue {
                name: "altitude",
                value: target_altitude_deg,
            });
        }
        Ok(geometry)
    }

    /// Target altitude above the horizon in degrees.
    pub fn target_altitude_deg(&self) -> f64 {
        self.target_altitude_deg
    }

    /// Observer elevation above sea level in meters.
    pub fn observer_elevation_m(&self) -> f64 {
        self.observer_elevation_m
    }

    /// Zenith angle of the target in degrees (`90 − altitude`).
    pub fn zenith_angle_deg(&self) -> f64 {
        90.0 - self.target_altitude_deg
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AirmassError::InvalidArgumentValue { name, value });
    }
    Ok(())
}

/// Parse a textual altitude or elevation into a single number.
///
/// Front ends receive arguments as text (command-line flags, query strings);
/// this is where a list such as `10,20` or `[10, 20]` is told apart from a
/// scalar.
///
/// # Errors
///
/// Returns [`AirmassError::InvalidArgumentType`] with `found = "sequence"`
/// for list-like input and `found = "non-numeric value"` for anything else
/// that is not a number.
///
/// # Example
///
/// ```
/// use airballoon::{parse_scalar, AirmassError};
///
/// assert_eq!(parse_scalar("altitude", " 45.5 ")?, 45.5);
/// assert!(matches!(
///     parse_scalar("altitude", "[10, 20]"),
///     Err(AirmassError::InvalidArgumentType { found: "sequence", .. })
/// ));
/// # Ok::<(), AirmassError>(())
/// ```
pub fn parse_scalar(name: &'static str, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();

    let bracketed = matches!(trimmed.chars().next(), Some('[' | '('));
    let separated = trimmed.contains(&[',', ';'][..]) || trimmed.split_whitespace().count() > 1;
    if bracketed || separated {
        return Err(AirmassError::InvalidArgumentType {
            name,
            found: "sequence",
        });
    }

    trimmed
        .parse::<f64>()
        .map_err(|_| AirmassError::InvalidArgumentType {
            name,
            found: "non-numeric value",
        })
}
