//! Solar eclipse time of maximum and magnitude for ground observers.
//!
//! The Sun and the Moon are read from a JPL SPK kernel ([`jpl_ephem`]), seen
//! from a rotating Earth site ([`observers`]) with light time and aberration
//! ([`ephemeris`]). The eclipse maximum is the sample of smallest Sun–Moon
//! separation over a search window and its magnitude follows from the disk
//! geometry ([`eclipse`]).
pub mod constants;
pub mod earth_orientation;
pub mod eclipse;
pub mod eclipsis_errors;
pub mod ephemeris;
pub mod jpl_ephem;
pub mod observers;
pub mod ref_system;
pub mod time;

pub use eclipse::{
    run_batch, EclipseEstimate, EclipseEstimator, EclipseOutcome, EstimatorConfig, GeoPoint,
    SearchWindow, WindowConfig,
};
pub use eclipsis_errors::{EclipsisError, ErrorKind};
pub use ephemeris::{jpl_provider::JplProvider, ApparentBody, Body, EphemerisProvider};
pub use observers::Observer;
