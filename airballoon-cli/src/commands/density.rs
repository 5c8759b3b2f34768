use airballoon::{parse_scalar, DensityModel};
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Serialize)]
struct DensityResponse {
    elevation: f64,
    density: f64,
}

pub fn run(elevation: &str, json: bool) -> Result<()> {
    let elevation = parse_scalar("elevation", elevation)?;

    let density = DensityModel::cira_2012()
        .density(elevation)
        .context("Failed to interpolate density")?;

    if json {
        let response = DensityResponse { elevation, density };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("{:e}", density);
    }

    Ok(())
}
