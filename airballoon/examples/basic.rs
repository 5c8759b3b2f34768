//! Basic example demonstrating airballoon library usage.
//!
//! Run with: cargo run --example basic -- [elevation_m]

use airballoon::{AirmassCalculator, AirmassError};
use std::env;

fn main() -> Result<(), AirmassError> {
    // Observer elevation from the command line, sea level by default
    let elevation: f64 = match env::args().nth(1) {
        Some(raw) => airballoon::parse_scalar("elevation", &raw)?,
        None => 0.0,
    };

    let calculator = AirmassCalculator::new();

    println!("Relative airmass from {}m above sea level:", elevation);
    println!("{:-<40}", "");
    println!("{:>12} {:>12} {:>12}", "altitude", "airmass", "sec(z)");

    for altitude in [90.0f64, 60.0, 45.0, 30.0, 20.0, 10.0, 5.0, 0.0] {
        let x = calculator.airmass(altitude, elevation)?;
        let plane_parallel = 1.0 / altitude.to_radians().sin();
        println!("{:>11}° {:>12.4} {:>12.4}", altitude, x, plane_parallel);
    }

    Ok(())
}
