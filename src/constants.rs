//! # Constants and type definitions for Eclipsis
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Astronomical and geophysical constants
//! - Unit conversions (degrees ↔ radians, arcseconds ↔ radians)
//! - Physical radii of the two bodies involved in a solar eclipse
//! - Reference values of the default eclipse search
//!
//! The body radii are fixed, process-wide values. They are not meant to be tuned at runtime.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Earth equatorial radius in meters (GRS1980/WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Earth polar radius in meters (GRS1980/WGS84)
pub const EARTH_MINOR_AXIS: f64 = 6_356_752.3;

/// Earth equatorial radius in kilometers
pub const EARTH_RADIUS_KM: f64 = EARTH_MAJOR_AXIS / 1000.;

/// Ratio of the sidereal day to the solar day
pub const SIDEREAL_RATIO: f64 = 1.00273790934;

/// Earth rotation rate in rad/s
pub const EARTH_ROTATION_RATE: f64 = DPI * SIDEREAL_RATIO / SECONDS_PER_DAY;

/// Speed of light in km/s
pub const VLIGHT: f64 = 2.99792458e5;

// -------------------------------------------------------------------------------------------------
// Eclipse bodies
// -------------------------------------------------------------------------------------------------

/// Mean radius of the Sun in kilometers
pub const SUN_RADIUS_KM: f64 = 696_340.0;

/// Mean radius of the Moon in kilometers
pub const MOON_RADIUS_KM: f64 = 1_737.4;

// -------------------------------------------------------------------------------------------------
// Reference search
// -------------------------------------------------------------------------------------------------

/// Center of the reference search window (total eclipse of 2026-08-12), UTC.
pub const DEFAULT_WINDOW_CENTER: &str = "2026-08-12T18:00:00 UTC";

/// Half-width of the reference search window, in minutes.
pub const DEFAULT_HALF_WIDTH_MINUTES: f64 = 60.0;

/// Number of samples of the reference search window.
pub const DEFAULT_SAMPLE_COUNT: usize = 1000;

/// Number of decimals kept on reported magnitudes.
pub const DEFAULT_MAGNITUDE_DECIMALS: u32 = 4;

/// Largest number of decimals accepted for reported magnitudes.
pub const MAX_MAGNITUDE_DECIMALS: u32 = 15;

/// Ephemeris used by the reference runs.
pub const DEFAULT_EPHEMERIS: &str = "naif:DE421";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
