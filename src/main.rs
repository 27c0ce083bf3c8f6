//! # Moon Calc Application Entry Point
//!
//! This binary crate loads the observer configuration, runs the lunar calculation for
//! one or more consecutive UTC days and prints a JSON report to stdout. Diagnostics go
//! to stderr through `tracing`; set `RUST_LOG=debug` to see the solver's output.

// Test modules
#[cfg(test)]
mod tests;

mod report;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use moon_calc_lib::config::Config;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Moonrise, moonset, transits and illumination for a date and place.
#[derive(Parser, Debug)]
#[command(name = "moon-calc", version, about)]
struct Args {
    /// First UTC day to compute (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Latitude in degrees, north positive (overrides config)
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude in degrees, east positive (overrides config)
    #[arg(long, allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Number of consecutive days
    #[arg(long, default_value_t = 1)]
    days: usize,

    /// Configuration file (defaults to ./moon-config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    if let Some(path) = &args.write_config {
        config
            .save_to_path(path)
            .with_context(|| format!("writing configuration to {}", path.display()))?;
        return Ok(());
    }

    let start = args.date.unwrap_or_else(|| Utc::now().date_naive());
    let latitude = args.lat.unwrap_or(config.observer.latitude);
    let longitude = args.lon.unwrap_or(config.observer.longitude);
    info!(
        "Computing {} day(s) from {} at {:.4}, {:.4}",
        args.days, start, latitude, longitude
    );

    let report = report::build_report(&config, start, args.days, latitude, longitude)
        .context("invalid observation request")?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
