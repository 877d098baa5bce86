//! # Solar eclipse estimation
//!
//! From the apparent Sun and Moon of an [`crate::ephemeris::EphemerisProvider`]:
//!
//! - [`search_window`]: the instants scanned for the maximum,
//! - [`magnitude`]: disk geometry and magnitude at one instant,
//! - [`estimator`]: time of maximum and magnitude for one observer,
//! - [`batch`]: many observers, ordered report and output rows.
//!
//! ## Approximations
//!
//! The time of maximum is the best sample of the window, so it is known to
//! within half the sample spacing (see
//! [`estimator::EclipseEstimate::time_resolution`]). The partial overlap
//! magnitude is a linear proxy of the covered diameter (see [`magnitude`]).
pub mod batch;
pub mod estimator;
pub mod magnitude;
pub mod search_window;

pub use batch::{run_batch, BatchReport, EclipseRecord, GeoPoint, ObserverOutcome};
pub use estimator::{
    EclipseEstimate, EclipseEstimator, EclipseOutcome, EstimatorConfig, Refinement,
};
pub use magnitude::{eclipse_magnitude, ContactGeometry, DiskGeometry};
pub use search_window::{SearchWindow, TimeSample, WindowConfig};
