//! Apparent Sun and Moon positions computed from a JPL SPK kernel.
//!
//! For an observer at instant `t` (ET seconds `et`):
//!
//! 1. the barycentric state of the observer is the barycentric Earth state
//!    (EMB + Earth/EMB) plus the geocentric state of the site, rotated from
//!    the Earth-fixed frame with precession, nutation and apparent sidereal time;
//! 2. the body position is evaluated at `et − τ`, where the light time `τ` is
//!    iterated until it changes by less than [`LIGHT_TIME_TOLERANCE`];
//! 3. the light-time corrected vector is shifted by the first order stellar
//!    aberration due to the observer barycentric velocity.
//!
//! The apparent distance is the norm of the light-time corrected vector,
//! before aberration.
use hifitime::Epoch;
use log::debug;
use nalgebra::{Matrix3, Vector3};

use crate::constants::VLIGHT;
use crate::eclipsis_errors::EclipsisError;
use crate::jpl_ephem::{EphemFileSource, NaifData, NaifId};
use crate::observers::{earth_fixed_to_j2000, Observer};
use crate::ref_system::correct_aberration;

use super::{ApparentBody, Body, EphemerisProvider, HorizontalCoord};

/// Maximum number of light-time iterations.
pub const MAX_LIGHT_TIME_ITERATIONS: usize = 10;

/// Convergence threshold of the light-time iteration, in seconds.
pub const LIGHT_TIME_TOLERANCE: f64 = 1e-9;

/// Segments read from the kernel: Sun, Earth-Moon barycenter, Earth, Moon.
pub const REQUIRED_SEGMENTS: [(NaifId, NaifId); 4] = [
    (NaifId::Sun, NaifId::SolarSystemBarycenter),
    (NaifId::EarthMoonBarycenter, NaifId::SolarSystemBarycenter),
    (NaifId::Earth, NaifId::EarthMoonBarycenter),
    (NaifId::Moon, NaifId::EarthMoonBarycenter),
];

/// Per-instant quantities shared by every body seen by one observer.
struct ObserverContext {
    et: f64,
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    rotation: Matrix3<f64>,
}

#[derive(Debug, Clone)]
pub struct JplProvider {
    naif: NaifData,
}

impl JplProvider {
    /// Resolve and load the kernel of an ephemeris source.
    ///
    /// Only the four segments of [`REQUIRED_SEGMENTS`] are read. Any failure
    /// (missing file, unsupported format, missing segment) is returned as an
    /// error of kind [`crate::eclipsis_errors::ErrorKind::UnavailableEphemeris`].
    pub fn load(source: &EphemFileSource) -> Result<Self, EclipsisError> {
        let path = source.resolve()?;
        debug!("Loading ephemeris {source} from {path}");
        let naif = NaifData::read_naif_file(&path, Some(&REQUIRED_SEGMENTS[..]))?;
        Ok(JplProvider { naif })
    }

    /// Wrap an already loaded kernel, checking that it holds every required segment.
    pub fn from_naif(naif: NaifData) -> Result<Self, EclipsisError> {
        for (target, center) in REQUIRED_SEGMENTS {
            if naif.coverage(target, center).is_none() {
                return Err(EclipsisError::MissingEphemerisSegment {
                    target: target.to_id(),
                    center: center.to_id(),
                });
            }
        }
        Ok(JplProvider { naif })
    }

    pub fn naif(&self) -> &NaifData {
        &self.naif
    }

    /// ET interval, in seconds, where every required segment is available.
    pub fn coverage(&self) -> Option<(f64, f64)> {
        REQUIRED_SEGMENTS
            .iter()
            .map(|(target, center)| self.naif.coverage(*target, *center))
            .try_fold((f64::NEG_INFINITY, f64::INFINITY), |(lo, hi), span| {
                span.map(|(start, end)| (lo.max(start), hi.min(end)))
            })
            .filter(|(lo, hi)| lo <= hi)
    }

    fn earth_state(&self, et: f64) -> Result<(Vector3<f64>, Vector3<f64>), EclipsisError> {
        let (emb_pos, emb_vel) = self.naif.ephemeris(
            NaifId::EarthMoonBarycenter,
            NaifId::SolarSystemBarycenter,
            et,
        )?;
        let (earth_pos, earth_vel) =
            self.naif
                .ephemeris(NaifId::Earth, NaifId::EarthMoonBarycenter, et)?;
        Ok((emb_pos + earth_pos, emb_vel + earth_vel))
    }

    /// Barycentric position of a body, in km.
    fn body_position(&self, body: Body, et: f64) -> Result<Vector3<f64>, EclipsisError> {
        match body {
            Body::Sun => Ok(self
                .naif
                .ephemeris(NaifId::Sun, NaifId::SolarSystemBarycenter, et)?
                .0),
            Body::Moon => {
                let (emb_pos, _) = self.naif.ephemeris(
                    NaifId::EarthMoonBarycenter,
                    NaifId::SolarSystemBarycenter,
                    et,
                )?;
                let (moon_pos, _) =
                    self.naif
                        .ephemeris(NaifId::Moon, NaifId::EarthMoonBarycenter, et)?;
                Ok(emb_pos + moon_pos)
            }
        }
    }

    fn observer_context(
        &self,
        observer: &Observer,
        epoch: &Epoch,
    ) -> Result<ObserverContext, EclipsisError> {
        let et = epoch.to_et_seconds();
        let rotation = earth_fixed_to_j2000(epoch);
        let (earth_pos, earth_vel) = self.earth_state(et)?;
        let (site_pos, site_vel) = observer.geocentric_state_with(&rotation);

        Ok(ObserverContext {
            et,
            position: earth_pos + site_pos,
            velocity: earth_vel + site_vel,
            rotation,
        })
    }

    fn apparent_from(
        &self,
        body: Body,
        context: &ObserverContext,
    ) -> Result<ApparentBody, EclipsisError> {
        let mut light_time = 0.0;
        let mut xrel = self.body_position(body, context.et)? - context.position;

        for _ in 0..MAX_LIGHT_TIME_ITERATIONS {
            let next = xrel.norm() / VLIGHT;
            let converged = (next - light_time).abs() < LIGHT_TIME_TOLERANCE;
            light_time = next;
            xrel = self.body_position(body, context.et - light_time)? - context.position;
            if converged {
                break;
            }
        }

        let apparent = correct_aberration(&xrel, &context.velocity);
        ApparentBody::new(body, apparent, xrel.norm())
    }
}

impl EphemerisProvider for JplProvider {
    fn apparent(
        &self,
        body: Body,
        observer: &Observer,
        epoch: &Epoch,
    ) -> Result<ApparentBody, EclipsisError> {
        let context = self.observer_context(observer, epoch)?;
        self.apparent_from(body, &context)
    }

    fn apparent_pair(
        &self,
        observer: &Observer,
        epoch: &Epoch,
    ) -> Result<(ApparentBody, ApparentBody), EclipsisError> {
        let context = self.observer_context(observer, epoch)?;
        Ok((
            self.apparent_from(Body::Sun, &context)?,
            self.apparent_from(Body::Moon, &context)?,
        ))
    }

    fn altaz(
        &self,
        body: Body,
        observer: &Observer,
        epoch: &Epoch,
    ) -> Result<HorizontalCoord, EclipsisError> {
        let context = self.observer_context(observer, epoch)?;
        let apparent = self.apparent_from(body, &context)?;
        let frame = observer.local_frame_with(&context.rotation);
        Ok(HorizontalCoord::from_direction(&apparent.direction, &frame))
    }
}
