//! # Observer & Site Geometry
//!
//! This module provides the ground-based [`Observer`] used by the eclipse
//! estimator and the geometry that places it in space:
//!
//! - validated geodetic coordinates (latitude, longitude, elevation),
//! - the **geocentric parallax coordinates** (ρ·cosφ′, ρ·sinφ′) on the WGS84 ellipsoid,
//! - a precomputed **body-fixed** position,
//! - the observer **geocentric position and velocity** in the equatorial J2000
//!   frame at a given instant ([`Observer::geocentric_state`]),
//! - the **local horizon frame** (zenith, north, east) in the same frame
//!   ([`Observer::local_frame`]).
//!
//! ## Frames & conventions
//!
//! ```text
//! Body-fixed --(GAST)--> true equator of date --(nutation, precession)--> mean equator J2000
//! ```
//!
//! GAST is GMST plus the equation of the equinoxes. Polar motion is neglected.
//!
//! ## Units
//!
//! - Latitude, longitude: **degrees**, longitude east positive in [-180, 180].
//! - Elevation: **meters** above the ellipsoid.
//! - Positions: **km**. Velocities: **km/s**.
use hifitime::Epoch;
use nalgebra::{Matrix3, Vector3};
use ordered_float::NotNan;

use crate::constants::{
    Degree, Kilometer, Meter, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS, EARTH_RADIUS_KM,
    EARTH_ROTATION_RATE,
};
use crate::earth_orientation::{equequ, true_of_date_to_j2000};
use crate::eclipsis_errors::EclipsisError;
use crate::ref_system::rotmt;
use crate::time::{gmst, mjd_tt, mjd_ut1};

/// A point on the Earth's surface from which an eclipse is observed.
///
/// Immutable once constructed. All fields are checked at construction time:
/// latitude in [-90, 90], longitude in [-180, 180], finite elevation.
///
/// See also
/// ------------
/// * [`geodetic_to_parallax`] – Geodetic latitude/elevation → (ρ·cosφ′, ρ·sinφ′).
/// * [`Observer::geocentric_state`] – Position and velocity in equatorial J2000.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Observer {
    /// Geodetic latitude in **degrees**.
    pub latitude: NotNan<f64>,

    /// Geodetic longitude in **degrees** east of Greenwich.
    pub longitude: NotNan<f64>,

    /// Height above the WGS84 ellipsoid in **meters**.
    pub elevation: NotNan<f64>,

    /// Optional human-readable site name.
    pub name: Option<String>,

    /// ρ·cosφ′ (geocentric latitude φ′), in **Earth radii**.
    pub rho_cos_phi: NotNan<f64>,

    /// ρ·sinφ′ (geocentric latitude φ′), in **Earth radii**.
    pub rho_sin_phi: NotNan<f64>,

    /// Precomputed **body-fixed** position of the observer in **km**.
    observer_fixed_coord: Vector3<NotNan<f64>>,
}

/// Local horizon frame of an observer, as unit vectors in equatorial J2000.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    /// Normal to the ellipsoid, pointing up.
    pub zenith: Vector3<f64>,
    /// Horizontal, toward the geographic north.
    pub north: Vector3<f64>,
    /// Horizontal, toward the east.
    pub east: Vector3<f64>,
}

impl Observer {
    /// Create a new observer from geodetic coordinates.
    ///
    /// Arguments
    /// -----------------
    /// * `latitude`: Geodetic latitude in **degrees**, within [-90, 90].
    /// * `longitude`: Geodetic longitude in **degrees** (east positive), within [-180, 180].
    /// * `elevation`: Height above the reference ellipsoid in **meters**.
    /// * `name`: Optional site name.
    ///
    /// Return
    /// ----------
    /// * A constructed [`Observer`] with precomputed body-fixed position.
    ///
    /// Errors
    /// ----------
    /// * [`EclipsisError::InvalidLatitude`], [`EclipsisError::InvalidLongitude`] or
    ///   [`EclipsisError::InvalidElevation`] when a value is not finite or out of range.
    pub fn new(
        latitude: Degree,
        longitude: Degree,
        elevation: Meter,
        name: Option<String>,
    ) -> Result<Observer, EclipsisError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(EclipsisError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(EclipsisError::InvalidLongitude(longitude));
        }
        if !elevation.is_finite() {
            return Err(EclipsisError::InvalidElevation(elevation));
        }

        let (rho_cos_phi, rho_sin_phi) = geodetic_to_parallax(latitude, elevation);

        let lon_radians = longitude.to_radians();
        let body_fixed_coord: Vector3<NotNan<f64>> = Vector3::new(
            NotNan::new(EARTH_RADIUS_KM * rho_cos_phi * lon_radians.cos())?,
            NotNan::new(EARTH_RADIUS_KM * rho_cos_phi * lon_radians.sin())?,
            NotNan::new(EARTH_RADIUS_KM * rho_sin_phi)?,
        );

        Ok(Observer {
            latitude: NotNan::new(latitude)?,
            longitude: NotNan::new(longitude)?,
            elevation: NotNan::new(elevation)?,
            name,
            rho_cos_phi: NotNan::new(rho_cos_phi)?,
            rho_sin_phi: NotNan::new(rho_sin_phi)?,
            observer_fixed_coord: body_fixed_coord,
        })
    }

    /// Observer at sea level, without name.
    pub fn from_lat_lon(latitude: Degree, longitude: Degree) -> Result<Observer, EclipsisError> {
        Observer::new(latitude, longitude, 0.0, None)
    }

    /// Body-fixed position of the observer (not corrected from Earth motion), in km.
    pub fn body_fixed_coord(&self) -> Vector3<Kilometer> {
        self.observer_fixed_coord.map(|x| x.into_inner())
    }

    /// Compute the observer geocentric position and velocity in the equatorial J2000 frame.
    ///
    /// The velocity only accounts for the Earth rotation, `v = ω × r` in the
    /// body-fixed frame, rotated with the same matrix as the position.
    ///
    /// Arguments
    /// ---------
    /// * `epoch`: instant of observation.
    ///
    /// Returns
    /// --------
    /// * `(position, velocity)` in km and km/s.
    ///
    /// See also
    /// --------
    /// * [`earth_fixed_to_j2000`] – the rotation applied to the body-fixed vectors.
    pub fn geocentric_state(&self, epoch: &Epoch) -> (Vector3<f64>, Vector3<f64>) {
        let rotation = earth_fixed_to_j2000(epoch);
        self.geocentric_state_with(&rotation)
    }

    /// Same as [`Observer::geocentric_state`] with a precomputed Earth rotation matrix.
    pub fn geocentric_state_with(&self, rotation: &Matrix3<f64>) -> (Vector3<f64>, Vector3<f64>) {
        let dxbf = self.body_fixed_coord();
        let omega = Vector3::new(0.0, 0.0, EARTH_ROTATION_RATE);
        let dvbf = omega.cross(&dxbf);

        (rotation * dxbf, rotation * dvbf)
    }

    /// Local zenith, north and east directions in equatorial J2000.
    ///
    /// The zenith is the normal to the ellipsoid (geodetic latitude), so the
    /// altitude computed from it is the one a leveled instrument would measure,
    /// refraction aside.
    pub fn local_frame(&self, epoch: &Epoch) -> LocalFrame {
        self.local_frame_with(&earth_fixed_to_j2000(epoch))
    }

    /// Same as [`Observer::local_frame`] with a precomputed Earth rotation matrix.
    pub fn local_frame_with(&self, rotation: &Matrix3<f64>) -> LocalFrame {
        let (sin_lat, cos_lat) = self.latitude.to_radians().sin_cos();
        let (sin_lon, cos_lon) = self.longitude.to_radians().sin_cos();

        let zenith = Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);
        let north = Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
        let east = Vector3::new(-sin_lon, cos_lon, 0.0);

        LocalFrame {
            zenith: rotation * zenith,
            north: rotation * north,
            east: rotation * east,
        }
    }
}

impl std::fmt::Display for Observer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name} ")?;
        }
        write!(
            f,
            "(lat {:.4}°, lon {:.4}°, h {:.0} m)",
            self.latitude.into_inner(),
            self.longitude.into_inner(),
            self.elevation.into_inner()
        )
    }
}

/// Rotation from the Earth-fixed frame to the mean equator and equinox of J2000.
///
/// Combines the Greenwich apparent sidereal time (UT1 ≈ UTC) with the
/// nutation and precession of date.
pub fn earth_fixed_to_j2000(epoch: &Epoch) -> Matrix3<f64> {
    let tt = mjd_tt(epoch);
    let gast = gmst(mjd_ut1(epoch)) + equequ(tt);

    true_of_date_to_j2000(tt) * rotmt(gast, 2)
}

/// Compute the normalized geocentric coordinates of an observer on the WGS84 ellipsoid.
///
/// Arguments
/// ---------
/// * `lat` - Geodetic latitude in **radians**.
/// * `height` - Height above the ellipsoid in **meters**.
///
/// Returns
/// -------
/// * `(rho_cos_phi, rho_sin_phi)`, in Earth equatorial radii.
pub fn lat_alt_to_parallax(lat: f64, height: Meter) -> (f64, f64) {
    let axis_ratio = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;

    // Parametric latitude
    let u = (lat.sin() * axis_ratio).atan2(lat.cos());

    let rho_sin_phi = axis_ratio * u.sin() + (height / EARTH_MAJOR_AXIS) * lat.sin();
    let rho_cos_phi = u.cos() + (height / EARTH_MAJOR_AXIS) * lat.cos();

    (rho_cos_phi, rho_sin_phi)
}

/// Same as [`lat_alt_to_parallax`] with a latitude in **degrees**.
pub fn geodetic_to_parallax(lat: Degree, height: Meter) -> (f64, f64) {
    lat_alt_to_parallax(lat.to_radians(), height)
}
