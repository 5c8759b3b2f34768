use airballoon::parse_scalar;
use anyhow::{Context, Result};
use serde::Serialize;

use super::Settings;

#[derive(Serialize)]
struct AirmassResponse {
    altitude: f64,
    elevation: f64,
    zenith_angle: f64,
    airmass: f64,
}

pub fn run(settings: &Settings, altitude: &str, elevation: &str, json: bool) -> Result<()> {
    let altitude = parse_scalar("altitude", altitude)?;
    let elevation = parse_scalar("elevation", elevation)?;

    let calculator = settings.calculator()?;
    let geometry = calculator.geometry(altitude, elevation)?;
    let airmass = calculator
        .airmass_at(&geometry)
        .context("Failed to compute airmass")?;

    if json {
        let response = AirmassResponse {
            altitude,
            elevation,
            zenith_angle: geometry.zenith_angle_deg(),
            airmass,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("{:.4}", airmass);
    }

    Ok(())
}
