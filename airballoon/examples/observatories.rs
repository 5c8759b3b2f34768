//! Example comparing airmass at well-known observing sites.
//!
//! Run with: cargo run --example observatories -- [altitude_deg]

use airballoon::{airmass, AirmassError};
use std::env;

fn main() -> Result<(), AirmassError> {
    let altitude: f64 = match env::args().nth(1) {
        Some(raw) => airballoon::parse_scalar("altitude", &raw)?,
        None => 30.0,
    };

    let sites = [
        ("Sea level", 0.0),
        ("Kitt Peak, Arizona", 2_096.0),
        ("Paranal, Chile", 2_635.0),
        ("Mauna Kea, Hawaii", 4_205.0),
        ("SOFIA (airborne)", 13_700.0),
        ("Stratospheric balloon", 37_000.0),
    ];

    println!("Airmass toward a target {}° above the horizon:", altitude);
    println!("{:-<50}", "");

    for (name, elevation) in &sites {
        match airmass(altitude, *elevation) {
            Ok(x) => println!("{:<28} {:>7}m  {:.4}", name, elevation, x),
            Err(e) => println!("{:<28} error - {}", name, e),
        }
    }

    Ok(())
}
