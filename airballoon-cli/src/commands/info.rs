use airballoon::{EARTH_RADIUS_M, KARMAN_LINE_M};
use anyhow::{Context, Result};

use super::Settings;

pub fn run(settings: &Settings) -> Result<()> {
    let calculator = settings.calculator()?;
    let model = calculator.model();
    let quadrature = calculator.quadrature();

    let zenith = calculator
        .zenith_column_density()
        .context("Failed to integrate zenith column density")?;

    println!("Atmosphere Model: CIRA-2012 (log-linear interpolation)");
    println!("{:-<40}", "");
    println!("{:>14} {:>20}", "Elevation (m)", "Density (kg/m³)");
    for &(elevation, density) in model.table().points() {
        println!("{:>14} {:>20e}", elevation, density);
    }

    println!();
    println!("Geometry");
    println!("{:-<40}", "");
    println!("Earth radius:      {} m", EARTH_RADIUS_M);
    println!("Karman line:       {} m", KARMAN_LINE_M);

    println!();
    println!("Calculator");
    println!("{:-<40}", "");
    println!("Relative tolerance:  {:e}", quadrature.tolerance().relative);
    println!("Absolute tolerance:  {:e}", quadrature.tolerance().absolute);
    println!("Max subdivisions:    {}", quadrature.max_subdivisions());
    println!(
        "Altitude > 90°:      {}",
        if calculator.strict_altitude() {
            "rejected"
        } else {
            "accepted"
        }
    );
    println!("Zenith column:       {:.2} kg/m²", zenith);

    Ok(())
}
