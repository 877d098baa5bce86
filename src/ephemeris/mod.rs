//! # Apparent positions of the Sun and the Moon
//!
//! The eclipse estimator only needs, for one observer and one instant, where
//! the Sun and the Moon appear on the sky and how far they are. This module
//! defines that contract:
//!
//! - [`Body`]: the two bodies of interest and their physical radii,
//! - [`ApparentBody`]: apparent direction, apparent distance, angular radius,
//! - [`HorizontalCoord`]: altitude and azimuth of a body for the horizon gate,
//! - [`EphemerisProvider`]: the trait implemented by ephemeris sources.
//!
//! [`jpl_provider::JplProvider`] is the implementation backed by a JPL SPK
//! kernel. Tests inject synthetic providers through the same trait.
//!
//! ## Frames & units
//!
//! Directions are unit vectors in the mean equator and equinox of J2000.
//! Distances are in **km**, angles in **radians** except the horizontal
//! coordinates, given in **degrees** like the observer coordinates.
pub mod jpl_provider;

use std::fmt;

use hifitime::Epoch;
use nalgebra::Vector3;

use crate::constants::{Degree, Kilometer, Radian, MOON_RADIUS_KM, SUN_RADIUS_KM};
use crate::eclipsis_errors::EclipsisError;
use crate::observers::{LocalFrame, Observer};
use crate::ref_system::cartesian_to_radec;

/// Celestial bodies taking part in a solar eclipse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Moon,
}

impl Body {
    /// Mean physical radius in km.
    pub fn radius_km(self) -> Kilometer {
        match self {
            Body::Sun => SUN_RADIUS_KM,
            Body::Moon => MOON_RADIUS_KM,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Sun => write!(f, "Sun"),
            Body::Moon => write!(f, "Moon"),
        }
    }
}

/// A body as seen by one observer at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApparentBody {
    pub body: Body,
    /// Unit vector toward the apparent position, equatorial J2000.
    pub direction: Vector3<f64>,
    /// Light-time corrected distance from the observer, in km.
    pub distance_km: Kilometer,
}

impl ApparentBody {
    /// Build an apparent body from a (not necessarily normalized) direction.
    ///
    /// Arguments
    /// -----------------
    /// * `body`: the body observed.
    /// * `direction`: any non null vector pointing to the apparent position.
    /// * `distance_km`: apparent distance in km.
    ///
    /// Return
    /// ----------
    /// * [`EclipsisError::DegenerateGeometry`] when the direction is null or not
    ///   finite, or when the observer would lie inside the body
    ///   (`distance_km <= radius`), where the angular radius is undefined.
    pub fn new(
        body: Body,
        direction: Vector3<f64>,
        distance_km: Kilometer,
    ) -> Result<Self, EclipsisError> {
        let norm = direction.norm();
        if !norm.is_finite() || norm == 0.0 {
            return Err(EclipsisError::DegenerateGeometry(format!(
                "{body} direction is null or not finite"
            )));
        }
        if !distance_km.is_finite() || distance_km <= body.radius_km() {
            return Err(EclipsisError::DegenerateGeometry(format!(
                "{body} distance {distance_km} km is not beyond its radius"
            )));
        }
        Ok(ApparentBody {
            body,
            direction: direction / norm,
            distance_km,
        })
    }

    /// Angular radius of the disk, `asin(R / distance)`, in radians.
    pub fn angular_radius(&self) -> Radian {
        (self.body.radius_km() / self.distance_km).asin()
    }

    /// Apparent right ascension and declination (J2000 axes), in degrees.
    pub fn radec(&self) -> (Degree, Degree) {
        let (alpha, delta, _) = cartesian_to_radec(&self.direction);
        (alpha.to_degrees(), delta.to_degrees())
    }
}

/// Altitude above the horizon and azimuth (from north, toward east), in degrees.
///
/// No atmospheric refraction is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalCoord {
    pub altitude: Degree,
    pub azimuth: Degree,
}

impl HorizontalCoord {
    /// Project a direction on the local horizon frame of an observer.
    ///
    /// Arguments
    /// -----------------
    /// * `direction`: unit vector toward the body, equatorial J2000.
    /// * `frame`: the observer local frame at the same instant.
    ///
    /// Return
    /// ----------
    /// * Altitude in [-90, 90] degrees and azimuth in [0, 360) degrees.
    pub fn from_direction(direction: &Vector3<f64>, frame: &LocalFrame) -> Self {
        let up = direction.dot(&frame.zenith).clamp(-1.0, 1.0);
        let north = direction.dot(&frame.north);
        let east = direction.dot(&frame.east);

        HorizontalCoord {
            altitude: up.asin().to_degrees(),
            azimuth: east.atan2(north).to_degrees().rem_euclid(360.0),
        }
    }

    pub fn is_above_horizon(&self) -> bool {
        self.altitude > 0.0
    }
}

/// Source of apparent Sun and Moon positions for a ground observer.
///
/// Implementations are deterministic and shared read-only between threads,
/// hence the `Sync` bound.
///
/// See also
/// ------------
/// * [`jpl_provider::JplProvider`] – SPK kernel backed implementation.
pub trait EphemerisProvider: Sync {
    /// Apparent direction and distance of `body` for `observer` at `epoch`.
    ///
    /// An instant outside the ephemeris coverage is an error of kind
    /// [`crate::eclipsis_errors::ErrorKind::UnavailableEphemeris`].
    fn apparent(
        &self,
        body: Body,
        observer: &Observer,
        epoch: &Epoch,
    ) -> Result<ApparentBody, EclipsisError>;

    /// Apparent Sun and Moon at the same instant, in that order.
    ///
    /// Implementations may override it to share the per-instant work.
    fn apparent_pair(
        &self,
        observer: &Observer,
        epoch: &Epoch,
    ) -> Result<(ApparentBody, ApparentBody), EclipsisError> {
        Ok((
            self.apparent(Body::Sun, observer, epoch)?,
            self.apparent(Body::Moon, observer, epoch)?,
        ))
    }

    /// Altitude and azimuth of `body` for `observer` at `epoch`.
    fn altaz(
        &self,
        body: Body,
        observer: &Observer,
        epoch: &Epoch,
    ) -> Result<HorizontalCoord, EclipsisError>;
}
