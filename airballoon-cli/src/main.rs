use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::Settings;

/// Astronomical airmass calculator for observers at any elevation
#[derive(Parser)]
#[command(name = "airballoon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Relative quadrature tolerance
    #[arg(short, long, global = true, env = "AIRBALLOON_REL_TOLERANCE")]
    rel_tolerance: Option<f64>,

    /// Maximum quadrature intervals
    #[arg(short, long, global = true, env = "AIRBALLOON_MAX_SUBDIVISIONS")]
    max_subdivisions: Option<usize>,

    /// Reject target altitudes above 90 degrees
    #[arg(short, long, global = true, env = "AIRBALLOON_STRICT_ALTITUDE")]
    strict_altitude: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute airmass for a single target and observer
    Query {
        /// Target altitude above the horizon in degrees
        #[arg(long, allow_hyphen_values = true)]
        altitude: String,

        /// Observer elevation above sea level in meters
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        elevation: String,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print a CSV table of airmass against altitude
    Table {
        /// Observer elevation above sea level in meters
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        elevation: String,

        /// First altitude in degrees
        #[arg(long, default_value_t = 0.0)]
        from: f64,

        /// Last altitude in degrees
        #[arg(long, default_value_t = 90.0)]
        to: f64,

        /// Altitude step in degrees
        #[arg(long, default_value_t = 5.0)]
        step: f64,

        /// Show a progress bar on stderr
        #[arg(short, long)]
        progress: bool,
    },

    /// Atmospheric density at an elevation
    Density {
        /// Elevation above sea level in meters
        #[arg(long, allow_hyphen_values = true)]
        elevation: String,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Display the atmosphere model and calculator settings
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings {
        rel_tolerance: cli.rel_tolerance,
        max_subdivisions: cli.max_subdivisions,
        strict_altitude: cli.strict_altitude,
    };

    match cli.command {
        Commands::Query {
            altitude,
            elevation,
            json,
        } => commands::query::run(&settings, &altitude, &elevation, json),
        Commands::Table {
            elevation,
            from,
            to,
            step,
            progress,
        } => commands::table::run(&settings, &elevation, from, to, step, progress),
        Commands::Density { elevation, json } => commands::density::run(&elevation, json),
        Commands::Info => commands::info::run(&settings),
    }
}
