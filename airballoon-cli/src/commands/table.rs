use airballoon::parse_scalar;
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;

use super::Settings;

/// Largest table the command will produce.
const MAX_ROWS: usize = 1_000_000;

/// Altitudes computed between progress bar updates.
const CHUNK_SIZE: usize = 8;

pub fn run(
    settings: &Settings,
    elevation: &str,
    from: f64,
    to: f64,
    step: f64,
    progress: bool,
) -> Result<()> {
    let elevation = parse_scalar("elevation", elevation)?;

    if !(step.is_finite() && step > 0.0) {
        bail!("Step must be a positive number of degrees, got {}", step);
    }
    if !(from.is_finite() && to.is_finite()) || to < from {
        bail!("Invalid altitude range: {} to {}", from, to);
    }

    // Guard against `from + n * step` overshooting `to` by rounding
    let intervals = ((to - from) / step + 1e-9).floor();
    if intervals >= MAX_ROWS as f64 {
        bail!(
            "Step {} gives more than {} rows between {} and {}",
            step,
            MAX_ROWS,
            from,
            to
        );
    }
    let count = intervals as usize + 1;

    let calculator = settings.calculator()?;

    let altitudes: Vec<f64> = (0..count).map(|i| from + i as f64 * step).collect();
    let geometries = altitudes
        .iter()
        .map(|&altitude| calculator.geometry(altitude, elevation))
        .collect::<airballoon::Result<Vec<_>>>()?;

    let pb = if progress {
        let pb = ProgressBar::new(count as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let stdout = io::stdout();
    let mut writer = csv::Writer::from_writer(stdout.lock());
    writer.write_record(["altitude", "zenith_angle", "airmass"])?;

    for (chunk, rows) in altitudes
        .chunks(CHUNK_SIZE)
        .zip(geometries.chunks(CHUNK_SIZE))
    {
        let series = calculator
            .airmass_series(chunk, elevation)
            .with_context(|| {
                format!(
                    "Failed to compute airmass between altitudes {} and {}",
                    chunk[0],
                    chunk[chunk.len() - 1]
                )
            })?;

        for ((altitude, geometry), airmass) in chunk.iter().zip(rows).zip(series) {
            writer.write_record([
                format!("{}", altitude),
                format!("{}", geometry.zenith_angle_deg()),
                format!("{:.6}", airmass),
            ])?;
        }

        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    writer.flush()?;

    Ok(())
}
