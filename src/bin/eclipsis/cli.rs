//! CLI argument definitions for eclipsis

use clap::{Args, Parser, Subcommand, ValueEnum};

use eclipsis::constants::{
    DEFAULT_EPHEMERIS, DEFAULT_HALF_WIDTH_MINUTES, DEFAULT_MAGNITUDE_DECIMALS,
    DEFAULT_SAMPLE_COUNT, DEFAULT_WINDOW_CENTER, MAX_MAGNITUDE_DECIMALS,
};
use eclipsis::eclipse::{GeoPoint, Refinement};
use eclipsis::jpl_ephem::EphemFileSource;

#[derive(Parser)]
#[command(name = "eclipsis")]
#[command(about = "Solar eclipse time of maximum and magnitude for ground observers")]
#[command(version)]
pub struct Cli {
    /// Ephemeris source: "naif:DE421" (user cache) or a path to an SPK kernel
    #[arg(long, global = true, default_value = DEFAULT_EPHEMERIS)]
    pub ephem: EphemFileSource,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Estimate the eclipse maximum for a list of observers
    Run(RunArgs),

    /// Sun and Moon geometry for one observer at one instant
    Probe(ProbeArgs),

    /// Describe the loaded SPK kernel
    Info,
}

#[derive(Args)]
pub struct WindowArgs {
    /// Center of the search window (UTC)
    #[arg(long, default_value = DEFAULT_WINDOW_CENTER)]
    pub center: String,

    /// Half width of the search window, in minutes
    #[arg(long, default_value_t = DEFAULT_HALF_WIDTH_MINUTES)]
    pub half_width: f64,

    /// Number of samples in the search window
    #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
    pub samples: usize,
}

#[derive(Args)]
pub struct RunArgs {
    /// Observer as LAT,LON in degrees (repeatable)
    #[arg(long = "point", required = true, allow_hyphen_values = true)]
    pub points: Vec<GeoPoint>,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Report observers with the Sun below the horizon as not visible
    #[arg(long)]
    pub horizon: bool,

    /// Refinement of the discrete maximum
    #[arg(long, value_enum, default_value_t = RefineArg::None)]
    pub refine: RefineArg,

    /// Decimals kept on the reported magnitudes
    #[arg(
        long,
        default_value_t = DEFAULT_MAGNITUDE_DECIMALS,
        value_parser = clap::value_parser!(u32).range(0..=MAX_MAGNITUDE_DECIMALS as i64)
    )]
    pub decimals: u32,

    /// Per-observer time budget of the scan, in milliseconds
    #[arg(long)]
    pub time_budget_ms: Option<u64>,
}

#[derive(Args)]
pub struct ProbeArgs {
    /// Observer as LAT,LON in degrees
    #[arg(long = "point", allow_hyphen_values = true)]
    pub point: GeoPoint,

    /// Observer height above the ellipsoid, in meters
    #[arg(long, default_value_t = 0.0)]
    pub elevation: f64,

    /// Instant of the evaluation (UTC)
    #[arg(long, default_value = DEFAULT_WINDOW_CENTER)]
    pub at: String,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RefineArg {
    None,
    Parabolic,
}

impl From<RefineArg> for Refinement {
    fn from(value: RefineArg) -> Self {
        match value {
            RefineArg::None => Refinement::None,
            RefineArg::Parabolic => Refinement::Parabolic,
        }
    }
}
