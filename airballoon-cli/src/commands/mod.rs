pub mod density;
pub mod info;
pub mod query;
pub mod table;

use airballoon::{AirmassCalculator, AirmassCalculatorBuilder};
use anyhow::{Context, Result};

/// Calculator options shared by every subcommand.
pub struct Settings {
    pub rel_tolerance: Option<f64>,
    pub max_subdivisions: Option<usize>,
    pub strict_altitude: bool,
}

impl Settings {
    /// Build a calculator from the environment, with command-line flags taking
    /// precedence.
    pub fn calculator(&self) -> Result<AirmassCalculator> {
        let mut builder = AirmassCalculatorBuilder::from_env();

        if let Some(relative) = self.rel_tolerance {
            builder = builder.relative_tolerance(relative);
        }
        if let Some(limit) = self.max_subdivisions {
            builder = builder.max_subdivisions(limit);
        }
        if self.strict_altitude {
            builder = builder.strict_altitude(true);
        }

        builder.build().context("Invalid calculator settings")
    }
}
