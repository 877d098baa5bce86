//! Elementary rotations and vector geometry shared by the observer and
//! ephemeris code.
//!
//! Every vector handled here is expressed in the mean equator and equinox of
//! J2000 (the frame of the JPL SPK kernels) unless stated otherwise.
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{Radian, DPI, VLIGHT};

/// Build the rotation matrix of angle `alpha` around one of the coordinate axes.
///
/// Arguments
/// ---------
/// * `alpha`: rotation angle in radians.
/// * `k`: axis index, `0` for X, `1` for Y, `2` for Z.
///
/// Returns
/// --------
/// * The 3×3 rotation matrix, acting on column vectors.
pub fn rotmt(alpha: f64, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("**** ROTMT: invalid axis index {k} (must be 0,1,2) ****"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Angle between two vectors, in radians.
///
/// Uses `atan2(‖a × b‖, a · b)`, which keeps full precision for nearly aligned
/// vectors where `acos` of the normalized dot product loses half of its digits.
/// The separation between the Sun and the Moon at maximum eclipse is exactly
/// in that regime.
///
/// Returns `0.0` when either vector is null.
pub fn angular_separation(a: &Vector3<f64>, b: &Vector3<f64>) -> Radian {
    let cross = a.cross(b).norm();
    let dot = a.dot(b);
    if cross == 0.0 && dot == 0.0 {
        return 0.0;
    }
    cross.atan2(dot)
}

/// Apply the first order stellar aberration to a topocentric position vector.
///
/// Arguments
/// ---------
/// * `xrel`: position of the target relative to the observer, light-time corrected \[km\].
/// * `observer_velocity`: barycentric velocity of the observer \[km/s\].
///
/// Returns
/// --------
/// * The apparent position vector, shifted toward the direction of motion:
///
/// ```text
/// x_app = xrel + (‖xrel‖ / c) · v_obs
/// ```
///
/// The output is not normalized; its norm differs from `‖xrel‖` by a relative
/// amount of order v/c ≈ 1e-4 and must not be used as a distance.
pub fn correct_aberration(xrel: &Vector3<f64>, observer_velocity: &Vector3<f64>) -> Vector3<f64> {
    let light_time = xrel.norm() / VLIGHT;
    xrel + light_time * observer_velocity
}

/// Convert a Cartesian vector to right ascension, declination and norm.
///
/// Returns
/// --------
/// * `(α, δ, ρ)`, α in [0, 2π), δ in [−π/2, π/2], ρ in the unit of the input.
///   A null vector gives `(0, 0, 0)`.
pub fn cartesian_to_radec(cartesian_position: &Vector3<f64>) -> (Radian, Radian, f64) {
    let pos_norm = cartesian_position.norm();
    if pos_norm == 0. {
        return (0.0, 0.0, pos_norm);
    }

    let delta = (cartesian_position.z / pos_norm).clamp(-1.0, 1.0).asin();
    let alpha = cartesian_position
        .y
        .atan2(cartesian_position.x)
        .rem_euclid(DPI);
    (alpha, delta, pos_norm)
}
