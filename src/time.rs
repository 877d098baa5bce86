//! Time scales and sidereal time.
//!
//! All instants handled by the crate are [`hifitime::Epoch`] values. User facing
//! instants are read and written in UTC; the SPK reader works in ET seconds
//! (`Epoch::to_et_seconds`) and the Earth orientation routines in MJD TT.
//!
//! UT1 is taken equal to UTC when computing sidereal time. The difference stays
//! below 0.9 s by construction of the leap-second system, which moves a
//! topocentric Moon direction by at most a fraction of an arcsecond.
use std::str::FromStr;

use hifitime::{Duration, Epoch, TimeScale};

use crate::constants::{DPI, MJD, T2000};
use crate::eclipsis_errors::EclipsisError;

/// Parse a UTC instant.
///
/// Accepts every format understood by [`Epoch::from_str`] (ISO 8601 with an
/// optional time scale suffix). A string without suffix is read as UTC.
///
/// Arguments
/// -----------------
/// * `input`: the date string, e.g. `"2026-08-12T18:00:00"` or `"2026-08-12T18:00:00 UTC"`.
///
/// Return
/// ----------
/// * The parsed [`Epoch`], or [`EclipsisError::InvalidTime`].
pub fn parse_utc(input: &str) -> Result<Epoch, EclipsisError> {
    let trimmed = input.trim();
    let epoch = Epoch::from_str(trimmed)
        .or_else(|_| Epoch::from_gregorian_str(trimmed))
        .map_err(|e| EclipsisError::InvalidTime(format!("{trimmed}: {e}")))?;
    Ok(epoch)
}

/// Format an instant as an ISO 8601 UTC string with millisecond resolution,
/// e.g. `2026-08-12T17:46:03.512Z`.
pub fn format_utc_iso(epoch: &Epoch) -> String {
    let rounded = epoch.round(Duration::from_milliseconds(1.0));
    let (y, mo, d, h, mi, s, ns) = rounded.to_gregorian_utc();
    format!(
        "{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}.{:03}Z",
        ns / 1_000_000
    )
}

/// Modified Julian date of an instant in the UT1 scale, approximated by UTC.
pub fn mjd_ut1(epoch: &Epoch) -> MJD {
    epoch.to_mjd_utc_days()
}

/// Modified Julian date of an instant in the TT scale.
pub fn mjd_tt(epoch: &Epoch) -> MJD {
    epoch.to_time_scale(TimeScale::TT).to_mjd_tt_days()
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// IAU 1982 polynomial for the mean sidereal time at 0h UT1, plus the
/// rotation accumulated during the fraction of the day.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
pub fn gmst(tjm: MJD) -> f64 {
    // GMST at 0h UT1 (seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / 86400.0;

    let h = (tjm - itjm) * DPI;
    (gmst0 + h * RAP).rem_euclid(DPI)
}
