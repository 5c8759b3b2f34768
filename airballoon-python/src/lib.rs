//! Python bindings for the airballoon airmass library.

#![allow(clippy::useless_conversion)]

use pyo3::exceptions::{PyRuntimeError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyList, PySequence, PyString, PyTuple};

// Use fully qualified path to avoid collision with the Python module name
use ::airballoon as airballoon_lib;
use airballoon_lib::AirmassError;

/// Map a library error onto the matching Python exception.
fn to_py_err(e: AirmassError) -> PyErr {
    match e {
        AirmassError::InvalidArgumentType { .. } => PyTypeError::new_err(e.to_string()),
        AirmassError::IntegrationFailure(_) => PyRuntimeError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}

/// Extract a single float, rejecting lists, tuples and other sequences.
fn extract_scalar(name: &'static str, value: &Bound<'_, PyAny>) -> PyResult<f64> {
    let is_sequence = value.is_instance_of::<PyList>()
        || value.is_instance_of::<PyTuple>()
        || (value.downcast::<PySequence>().is_ok() && !value.is_instance_of::<PyString>());
    if is_sequence {
        return Err(to_py_err(AirmassError::InvalidArgumentType {
            name,
            found: "sequence",
        }));
    }

    value.extract::<f64>().map_err(|_| {
        to_py_err(AirmassError::InvalidArgumentType {
            name,
            found: "non-numeric value",
        })
    })
}

/// Airmass calculator with its own tolerance and altitude policy.
///
/// The sea-level reference column is integrated once per instance.
///
/// Example:
///     >>> calc = AirmassCalculator(rel_tolerance=1e-6, strict_altitude=True)
///     >>> calc.airmass(30, 2000)
#[pyclass]
struct AirmassCalculator {
    inner: airballoon_lib::AirmassCalculator,
}

#[pymethods]
impl AirmassCalculator {
    /// Create a new calculator.
    ///
    /// Args:
    ///     rel_tolerance: Relative quadrature tolerance (default: 1e-3).
    ///     max_subdivisions: Maximum quadrature intervals (default: 200).
    ///     strict_altitude: Reject altitudes above 90 degrees (default: False).
    ///
    /// Raises:
    ///     ValueError: If a tolerance or the subdivision limit is invalid.
    #[new]
    #[pyo3(signature = (rel_tolerance=1e-3, max_subdivisions=200, strict_altitude=false))]
    fn new(rel_tolerance: f64, max_subdivisions: usize, strict_altitude: bool) -> PyResult<Self> {
        let inner = airballoon_lib::AirmassCalculatorBuilder::new()
            .relative_tolerance(rel_tolerance)
            .max_subdivisions(max_subdivisions)
            .strict_altitude(strict_altitude)
            .build()
            .map_err(to_py_err)?;
        Ok(AirmassCalculator { inner })
    }

    /// Relative airmass of a target seen from the given elevation.
    ///
    /// Args:
    ///     altitude: Target altitude above the horizon in degrees.
    ///     elevation: Observer elevation above sea level in meters (default: 0).
    ///
    /// Returns:
    ///     Dimensionless airmass.
    ///
    /// Raises:
    ///     TypeError: If an argument is not a single number.
    ///     ValueError: If an argument is out of range.
    ///     RuntimeError: If the integration fails.
    #[pyo3(signature = (altitude, elevation=None))]
    fn airmass(
        &self,
        altitude: &Bound<'_, PyAny>,
        elevation: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<f64> {
        let altitude = extract_scalar("altitude", altitude)?;
        let elevation = match elevation {
            Some(value) => extract_scalar("elevation", value)?,
            None => 0.0,
        };
        self.inner.airmass(altitude, elevation).map_err(to_py_err)
    }

    /// Absolute column density along the line of sight in kg/m².
    #[pyo3(signature = (altitude, elevation=None))]
    fn column_density(
        &self,
        altitude: &Bound<'_, PyAny>,
        elevation: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<f64> {
        let altitude = extract_scalar("altitude", altitude)?;
        let elevation = match elevation {
            Some(value) => extract_scalar("elevation", value)?,
            None => 0.0,
        };
        let geometry = self
            .inner
            .geometry(altitude, elevation)
            .map_err(to_py_err)?;
        self.inner
            .column_density(&geometry)
            .map(|estimate| estimate.value)
            .map_err(to_py_err)
    }

    /// Column density straight up from sea level in kg/m².
    fn zenith_column_density(&self) -> PyResult<f64> {
        self.inner.zenith_column_density().map_err(to_py_err)
    }

    #[getter]
    fn rel_tolerance(&self) -> f64 {
        self.inner.quadrature().tolerance().relative
    }

    #[getter]
    fn strict_altitude(&self) -> bool {
        self.inner.strict_altitude()
    }

    fn __repr__(&self) -> String {
        format!(
            "AirmassCalculator(rel_tolerance={}, max_subdivisions={}, strict_altitude={})",
            self.inner.quadrature().tolerance().relative,
            self.inner.quadrature().max_subdivisions(),
            if self.inner.strict_altitude() { "True" } else { "False" }
        )
    }
}

/// Relative airmass of a target seen from the given elevation.
///
/// Args:
///     altitude: Target altitude above the horizon in degrees.
///     elevation: Observer elevation above sea level in meters (default: 0).
///
/// Returns:
///     Dimensionless airmass, 1.0 at the zenith from sea level.
///
/// Raises:
///     TypeError: If an argument is a list, tuple or other non-number.
///     ValueError: If an argument is negative or the elevation is 100 km or more.
///     RuntimeError: If the integration fails.
///
/// Example:
///     >>> airmass(30, 0)
///     1.99...
#[pyfunction]
#[pyo3(signature = (altitude, elevation=None))]
fn airmass(altitude: &Bound<'_, PyAny>, elevation: Option<&Bound<'_, PyAny>>) -> PyResult<f64> {
    let altitude = extract_scalar("altitude", altitude)?;
    let elevation = match elevation {
        Some(value) => extract_scalar("elevation", value)?,
        None => 0.0,
    };
    airballoon_lib::airmass(altitude, elevation).map_err(to_py_err)
}

/// CIRA-2012 air density at an elevation.
///
/// Args:
///     elevation: Height above sea level in meters (0 to 100000).
///
/// Returns:
///     Density in kg/m³.
///
/// Raises:
///     ValueError: If the elevation is outside the table.
#[pyfunction]
fn density(elevation: &Bound<'_, PyAny>) -> PyResult<f64> {
    let elevation = extract_scalar("elevation", elevation)?;
    airballoon_lib::DensityModel::cira_2012()
        .density(elevation)
        .map_err(to_py_err)
}

/// Absolute column density along the line of sight.
///
/// Args:
///     altitude: Target altitude above the horizon in degrees.
///     elevation: Observer elevation above sea level in meters (default: 0).
///
/// Returns:
///     Column density in kg/m² from the observer to the Karman line.
///
/// Raises:
///     TypeError: If an argument is not a single number.
///     ValueError: If an argument is out of range.
///     RuntimeError: If the integration fails.
#[pyfunction]
#[pyo3(signature = (altitude, elevation=None))]
fn column_density(
    altitude: &Bound<'_, PyAny>,
    elevation: Option<&Bound<'_, PyAny>>,
) -> PyResult<f64> {
    let calculator = AirmassCalculator {
        inner: airballoon_lib::AirmassCalculator::new(),
    };
    calculator.column_density(altitude, elevation)
}

/// airballoon - Astronomical airmass at any elevation.
///
/// Example:
///     >>> import airballoon
///     >>> airballoon.airmass(45, 4200)
#[pymodule]
#[pyo3(name = "airballoon")]
fn airballoon_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<AirmassCalculator>()?;
    m.add_function(wrap_pyfunction!(airmass, m)?)?;
    m.add_function(wrap_pyfunction!(density, m)?)?;
    m.add_function(wrap_pyfunction!(column_density, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("EARTH_RADIUS_M", airballoon_lib::EARTH_RADIUS_M)?;
    m.add("KARMAN_LINE_M", airballoon_lib::KARMAN_LINE_M)?;
    Ok(())
}
