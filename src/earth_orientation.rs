//! Precession, nutation and sidereal corrections of the Earth's equator.
//!
//! The routines follow the IAU 1976 precession and IAU 1980 nutation models.
//! The nutation series is truncated to its principal terms: the neglected
//! terms are each below 0.003 arcsec, which is far beneath the angular radius
//! of the Sun or the Moon.
//!
//! Matrix conventions
//! ------------------
//! * [`prec`] maps a vector from the **mean equator and equinox of date** to the
//!   **mean equator and equinox of J2000**.
//! * [`rnut80`] maps a vector from the **true** equator and equinox of date to
//!   the **mean** equator and equinox of date.
//! * [`true_of_date_to_j2000`] is their product.
use nalgebra::Matrix3;

use crate::{
    constants::{ArcSec, Radian, DPI, MJD, RADEG, RADSEC, T2000},
    ref_system::rotmt,
};

/// Compute the mean obliquity of the ecliptic (IAU 1976).
///
/// Arguments
/// -----------------
/// * `tjm`: Modified Julian Date (TT).
///
/// Return
/// ----------
/// * Mean obliquity ε in radians.
pub fn obleq(tjm: MJD) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / 36525.0;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// One term of the nutation series.
///
/// Multipliers of (l, l', F, D, Ω) followed by the longitude coefficients
/// (sin, sin·T) and the obliquity coefficients (cos, cos·T), in 0.1 mas.
struct NutationTerm {
    args: [f64; 5],
    psi: (f64, f64),
    eps: (f64, f64),
}

const fn term(args: [f64; 5], psi: (f64, f64), eps: (f64, f64)) -> NutationTerm {
    NutationTerm { args, psi, eps }
}

#[rustfmt::skip]
const NUTATION_TERMS: [NutationTerm; 26] = [
    term([ 0.,  0., 0.,  0., 1.], (-171996., -174.2), (92025.,  8.9)),
    term([ 0.,  0., 2., -2., 2.], ( -13187.,   -1.6), ( 5736., -3.1)),
    term([ 0.,  0., 2.,  0., 2.], (  -2274.,   -0.2), (  977., -0.5)),
    term([ 0.,  0., 0.,  0., 2.], (   2062.,    0.2), ( -895.,  0.5)),
    term([ 0.,  1., 0.,  0., 0.], (   1426.,   -3.4), (   54., -0.1)),
    term([ 1.,  0., 0.,  0., 0.], (    712.,    0.1), (   -7.,  0.0)),
    term([ 0.,  1., 2., -2., 2.], (   -517.,    1.2), (  224., -0.6)),
    term([ 0.,  0., 2.,  0., 1.], (   -386.,   -0.4), (  200.,  0.0)),
    term([ 1.,  0., 2.,  0., 2.], (   -301.,    0.0), (  129., -0.1)),
    term([ 0., -1., 2., -2., 2.], (    217.,   -0.5), (  -95.,  0.3)),
    term([ 1.,  0., 0., -2., 0.], (   -158.,    0.0), (    0.,  0.0)),
    term([ 0.,  0., 2., -2., 1.], (    129.,    0.1), (  -70.,  0.0)),
    term([-1.,  0., 2.,  0., 2.], (    123.,    0.0), (  -53.,  0.0)),
    term([ 0.,  0., 0.,  2., 0.], (     63.,    0.0), (    0.,  0.0)),
    term([ 1.,  0., 0.,  0., 1.], (     63.,    0.1), (  -33.,  0.0)),
    term([-1.,  0., 2.,  2., 2.], (    -59.,    0.0), (   26.,  0.0)),
    term([-1.,  0., 0.,  0., 1.], (    -58.,   -0.1), (   32.,  0.0)),
    term([ 1.,  0., 2.,  0., 1.], (    -51.,    0.0), (   27.,  0.0)),
    term([ 2.,  0., 0., -2., 0.], (     48.,    0.0), (    1.,  0.0)),
    term([-2.,  0., 2.,  0., 1.], (     46.,    0.0), (  -24.,  0.0)),
    term([ 0.,  0., 2.,  2., 2.], (    -38.,    0.0), (   16.,  0.0)),
    term([ 2.,  0., 2.,  0., 2.], (    -31.,    0.0), (   13.,  0.0)),
    term([ 2.,  0., 0.,  0., 0.], (     29.,    0.0), (    0.,  0.0)),
    term([ 1.,  0., 2., -2., 2.], (     29.,    0.0), (  -12.,  0.0)),
    term([ 0.,  0., 2.,  0., 0.], (     26.,    0.0), (    0.,  0.0)),
    term([ 0.,  0., 2., -2., 0.], (    -22.,    0.0), (    0.,  0.0)),
];

/// Compute the nutation angles in longitude (Δψ) and obliquity (Δε), IAU 1980.
///
/// Arguments
/// -----------------
/// * `tjm`: Modified Julian Date (TT).
///
/// Return
/// ----------
/// * `(dpsi, deps)` in arcseconds.
pub fn nutn80(tjm: MJD) -> (ArcSec, ArcSec) {
    let t = (tjm - T2000) / 36525.0;
    let t2 = t * t;
    let t3 = t2 * t;

    // Delaunay arguments (arcsec → rad)
    let fundamental = [
        (485866.733 + 1717915922.633 * t + 31.310 * t2 + 0.064 * t3) * RADSEC,
        (1287099.804 + 129596581.224 * t - 0.577 * t2 - 0.012 * t3) * RADSEC,
        (335778.877 + 1739527263.137 * t - 13.257 * t2 + 0.011 * t3) * RADSEC,
        (1072261.307 + 1602961601.328 * t - 6.891 * t2 + 0.019 * t3) * RADSEC,
        (450160.280 - 6962890.539 * t + 7.455 * t2 + 0.008 * t3) * RADSEC,
    ]
    .map(|arg| arg % DPI);

    let (dpsi, deps) = NUTATION_TERMS
        .iter()
        .fold((0.0, 0.0), |(dpsi, deps), term| {
            let arg: f64 = term
                .args
                .iter()
                .zip(fundamental.iter())
                .map(|(k, a)| k * a)
                .sum();
            (
                dpsi + (term.psi.0 + term.psi.1 * t) * arg.sin(),
                deps + (term.eps.0 + term.eps.1 * t) * arg.cos(),
            )
        });

    (dpsi * 1e-4, deps * 1e-4)
}

/// Nutation matrix, true equator of date → mean equator of date.
pub fn rnut80(tjm: MJD) -> Matrix3<f64> {
    let epsm = obleq(tjm);
    let (dpsi, deps) = nutn80(tjm);
    let epst = epsm + deps * RADSEC;

    rotmt(epsm, 0) * rotmt(-dpsi * RADSEC, 2) * rotmt(-epst, 0)
}

/// Equation of the equinoxes, Δψ·cos ε, in radians.
///
/// Added to GMST to obtain the Greenwich apparent sidereal time.
pub fn equequ(tjm: MJD) -> Radian {
    let (dpsi, _) = nutn80(tjm);
    RADSEC * dpsi * obleq(tjm).cos()
}

/// Precession matrix (IAU 1976), mean equator of date → mean equator of J2000.
pub fn prec(tjm: MJD) -> Matrix3<f64> {
    let t = (tjm - T2000) / 36525.0;

    let zeta = ((0.0000050 * t + 0.0000839) * t + 0.6406161) * t * RADEG;
    let z = ((0.0000051 * t + 0.0003041) * t + 0.6406161) * t * RADEG;
    let theta = ((-0.0000116 * t - 0.0001185) * t + 0.5567530) * t * RADEG;

    rotmt(-zeta, 2) * rotmt(theta, 1) * rotmt(-z, 2)
}

/// Combined rotation, true equator and equinox of date → mean equator and
/// equinox of J2000.
pub fn true_of_date_to_j2000(tjm: MJD) -> Matrix3<f64> {
    prec(tjm) * rnut80(tjm)
}
