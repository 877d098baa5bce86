//! Closed-form overlap of the solar and lunar disks.
//!
//! Given the angular separation `d` of the disk centers and their angular
//! radii `R☉`, `R☾` (radians), the magnitude is:
//!
//! ```text
//! d ≥ R☉ + R☾         →  0                          (no contact)
//! d ≤ |R☉ − R☾|       →  min(R☾, R☉) / R☉           (containment)
//! otherwise           →  (R☾ + R☉ − d) / (2 R☉)     (partial overlap)
//! ```
//!
//! The partial overlap branch is a linear proxy of the covered fraction of
//! the solar diameter, not the true overlap of two circles. It matches the
//! two other branches at their boundaries only when the radii are equal and
//! must be read as an approximation.
use std::fmt;

use crate::constants::Radian;
use crate::ephemeris::ApparentBody;
use crate::ref_system::angular_separation;

/// Relative position of the two disks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactGeometry {
    /// Disks are apart or externally tangent.
    NoContact,
    /// One disk lies entirely inside the other (total, annular or inside tangent).
    Containment,
    /// Disks cross each other.
    PartialOverlap,
}

impl fmt::Display for ContactGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContactGeometry::NoContact => "no contact",
            ContactGeometry::Containment => "containment",
            ContactGeometry::PartialOverlap => "partial overlap",
        };
        f.write_str(label)
    }
}

/// Classify the disk configuration, boundaries included in the first matching branch.
pub fn contact_geometry(separation: Radian, r_sun: Radian, r_moon: Radian) -> ContactGeometry {
    if separation >= r_sun + r_moon {
        ContactGeometry::NoContact
    } else if separation <= (r_sun - r_moon).abs() {
        ContactGeometry::Containment
    } else {
        ContactGeometry::PartialOverlap
    }
}

/// Eclipse magnitude from the disk geometry.
///
/// Arguments
/// -----------------
/// * `separation`: angle between the Sun and Moon centers, radians, non negative.
/// * `r_sun`: angular radius of the Sun, radians, positive.
/// * `r_moon`: angular radius of the Moon, radians, positive.
///
/// Return
/// ----------
/// * The magnitude in [0, 1]. Exactly `0.0` without contact.
///
/// See also
/// ------------
/// * [`contact_geometry`] – Branch selection.
pub fn eclipse_magnitude(separation: Radian, r_sun: Radian, r_moon: Radian) -> f64 {
    let magnitude = match contact_geometry(separation, r_sun, r_moon) {
        ContactGeometry::NoContact => return 0.0,
        ContactGeometry::Containment => r_moon.min(r_sun) / r_sun,
        ContactGeometry::PartialOverlap => (r_moon + r_sun - separation) / (2.0 * r_sun),
    };
    magnitude.clamp(0.0, 1.0)
}

/// Angular geometry of the two disks at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskGeometry {
    pub separation: Radian,
    pub sun_radius: Radian,
    pub moon_radius: Radian,
}

impl DiskGeometry {
    pub fn new(separation: Radian, sun_radius: Radian, moon_radius: Radian) -> Self {
        DiskGeometry {
            separation,
            sun_radius,
            moon_radius,
        }
    }

    /// Geometry of an apparent Sun and Moon computed for the same observer and instant.
    pub fn from_apparent(sun: &ApparentBody, moon: &ApparentBody) -> Self {
        DiskGeometry {
            separation: angular_separation(&sun.direction, &moon.direction),
            sun_radius: sun.angular_radius(),
            moon_radius: moon.angular_radius(),
        }
    }

    pub fn contact(&self) -> ContactGeometry {
        contact_geometry(self.separation, self.sun_radius, self.moon_radius)
    }

    pub fn magnitude(&self) -> f64 {
        eclipse_magnitude(self.separation, self.sun_radius, self.moon_radius)
    }
}
