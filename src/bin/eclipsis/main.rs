//! eclipsis: solar eclipse estimation from the command line
//!
//! Loads one SPK kernel, then evaluates every observer given with `--point`.
//! A kernel that cannot be loaded stops the program; a failing observer is
//! reported in the failure table and the others are still evaluated.

mod cli;

use anyhow::Context;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use log::info;

use cli::{Cli, Commands, ProbeArgs, RunArgs};
use eclipsis::eclipse::{run_batch, EclipseEstimator, EstimatorConfig, WindowConfig};
use eclipsis::ephemeris::{jpl_provider::JplProvider, Body, EphemerisProvider};
use eclipsis::observers::Observer;
use eclipsis::time::{format_utc_iso, parse_utc};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let provider = JplProvider::load(&cli.ephem)
        .with_context(|| format!("cannot load the ephemeris {}", cli.ephem))?;
    info!("Ephemeris {} loaded", cli.ephem);

    match &cli.command {
        Commands::Run(args) => run(&provider, args),
        Commands::Probe(args) => probe(&provider, args),
        Commands::Info => {
            println!("{}", provider.naif().info());
            Ok(())
        }
    }
}

fn run(provider: &JplProvider, args: &RunArgs) -> anyhow::Result<()> {
    let window = WindowConfig::new(
        &args.window.center,
        args.window.half_width,
        args.window.samples,
    )?
    .build()
    .context("invalid search window")?;

    let mut config = EstimatorConfig::default()
        .with_horizon_gating(args.horizon)
        .with_refinement(args.refine.into());
    if let Some(ms) = args.time_budget_ms {
        config = config.with_time_budget(std::time::Duration::from_millis(ms));
    }

    info!(
        "Scanning {} samples from {} to {}",
        window.len(),
        format_utc_iso(&window.first()),
        format_utc_iso(&window.last())
    );

    let report = run_batch(provider, &args.points, &window, &config, args.decimals);

    println!("{}", report.results_table());
    if let Some(failures) = report.failures_table() {
        println!("\nFailed observers");
        println!("{failures}");
    }

    let spacing = window.spacing_around(window.len() / 2).to_seconds();
    println!(
        "\nTime of maximum: best sample of the window, within ±{:.1} s.",
        spacing / 2.0
    );
    println!(
        "Partial magnitudes use the linear proxy (R_moon + R_sun - d) / (2 R_sun), \
         not the exact disk overlap."
    );
    println!("{}", report.summary());
    Ok(())
}

fn probe(provider: &JplProvider, args: &ProbeArgs) -> anyhow::Result<()> {
    let observer = Observer::new(
        args.point.latitude,
        args.point.longitude,
        args.elevation,
        None,
    )?;
    let epoch = parse_utc(&args.at)?;

    let estimator = EclipseEstimator::new(provider, EstimatorConfig::default());
    let (sun, moon) = provider.apparent_pair(&observer, &epoch)?;
    let (geometry, magnitude) = estimator.magnitude_at(&observer, &epoch)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "body",
            "distance (km)",
            "angular radius (deg)",
            "RA (deg)",
            "Dec (deg)",
            "altitude (deg)",
            "azimuth (deg)",
        ]);
    let mut sun_altitude = f64::NAN;
    for apparent in [sun, moon] {
        let horizontal = provider.altaz(apparent.body, &observer, &epoch)?;
        if apparent.body == Body::Sun {
            sun_altitude = horizontal.altitude;
        }
        let (ra, dec) = apparent.radec();
        table.add_row(vec![
            Cell::new(apparent.body),
            Cell::new(format!("{:.1}", apparent.distance_km)),
            Cell::new(format!("{:.5}", apparent.angular_radius().to_degrees())),
            Cell::new(format!("{ra:.4}")),
            Cell::new(format!("{dec:.4}")),
            Cell::new(format!("{:.3}", horizontal.altitude)),
            Cell::new(format!("{:.3}", horizontal.azimuth)),
        ]);
    }

    println!("Observer {} at {}", args.point, format_utc_iso(&epoch));
    println!("{table}");
    println!(
        "separation {:.5} deg, {}, magnitude {magnitude:.4}",
        geometry.separation.to_degrees(),
        geometry.contact()
    );
    if sun_altitude <= 0.0 {
        println!("Sun below the horizon ({sun_altitude:.2} deg)");
    }
    Ok(())
}
