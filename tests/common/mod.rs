#![allow(dead_code)]

use std::path::Path;

use camino::Utf8PathBuf;
use eclipsis::constants::{MOON_RADIUS_KM, SUN_RADIUS_KM};
use eclipsis::eclipse::search_window::SearchWindow;
use eclipsis::ephemeris::{ApparentBody, Body, EphemerisProvider, HorizontalCoord};
use eclipsis::eclipsis_errors::EclipsisError;
use eclipsis::jpl_ephem::NaifId;
use eclipsis::observers::Observer;
use hifitime::{Epoch, Unit};
use nalgebra::Vector3;

pub const SUN_DISTANCE_KM: f64 = 1.5e8;
pub const MOON_DISTANCE_KM: f64 = 384_400.0;

pub fn reference_epoch() -> Epoch {
    Epoch::from_gregorian_utc_hms(2026, 8, 12, 18, 0, 0)
}

pub fn sun_radius() -> f64 {
    (SUN_RADIUS_KM / SUN_DISTANCE_KM).asin()
}

pub fn moon_radius() -> f64 {
    (MOON_RADIUS_KM / MOON_DISTANCE_KM).asin()
}

/// ±`half_minutes` around the reference epoch.
pub fn window(half_minutes: i64, count: usize) -> SearchWindow {
    SearchWindow::uniform(reference_epoch(), half_minutes * Unit::Minute, count).unwrap()
}

type SeparationFn = dyn Fn(&Observer, f64) -> f64 + Send + Sync;
type AltitudeFn = dyn Fn(&Observer) -> f64 + Send + Sync;

/// Provider with the Sun fixed on the x axis and the Moon at a scripted
/// separation, a function of the observer and of the seconds elapsed since
/// [`reference_epoch`].
pub struct ScriptedProvider {
    separation: Box<SeparationFn>,
    sun_altitude: Box<AltitudeFn>,
    pub sun_distance: f64,
    pub moon_distance: f64,
    /// Instants after this one are out of coverage.
    pub coverage_end: Option<Epoch>,
}

impl ScriptedProvider {
    pub fn new(separation: impl Fn(&Observer, f64) -> f64 + Send + Sync + 'static) -> Self {
        ScriptedProvider {
            separation: Box::new(separation),
            sun_altitude: Box::new(|_| 45.0),
            sun_distance: SUN_DISTANCE_KM,
            moon_distance: MOON_DISTANCE_KM,
            coverage_end: None,
        }
    }

    /// Constant separation.
    pub fn fixed(separation: f64) -> Self {
        ScriptedProvider::new(move |_, _| separation)
    }

    /// Moon crossing the Sun at `rate` rad/s with a closest approach of
    /// `d_min` rad, `shift_s` seconds after the reference epoch.
    pub fn pass(shift_s: f64, rate: f64, d_min: f64) -> Self {
        ScriptedProvider::new(move |_, dt| {
            (d_min.powi(2) + (rate * (dt - shift_s)).powi(2)).sqrt()
        })
    }

    pub fn with_sun_altitude(
        mut self,
        altitude: impl Fn(&Observer) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.sun_altitude = Box::new(altitude);
        self
    }

    pub fn with_coverage_end(mut self, end: Epoch) -> Self {
        self.coverage_end = Some(end);
        self
    }

    fn check_coverage(&self, body: Body, epoch: &Epoch) -> Result<(), EclipsisError> {
        match self.coverage_end {
            Some(end) if *epoch > end => Err(EclipsisError::EphemerisOutOfRange {
                target: match body {
                    Body::Sun => 10,
                    Body::Moon => 301,
                },
                center: 0,
                et_seconds: epoch.to_et_seconds(),
            }),
            _ => Ok(()),
        }
    }
}

impl EphemerisProvider for ScriptedProvider {
    fn apparent(
        &self,
        body: Body,
        observer: &Observer,
        epoch: &Epoch,
    ) -> Result<ApparentBody, EclipsisError> {
        self.check_coverage(body, epoch)?;
        match body {
            Body::Sun => ApparentBody::new(body, Vector3::x(), self.sun_distance),
            Body::Moon => {
                let dt = (*epoch - reference_epoch()).to_seconds();
                let d = (self.separation)(observer, dt);
                ApparentBody::new(
                    body,
                    Vector3::new(d.cos(), d.sin(), 0.0),
                    self.moon_distance,
                )
            }
        }
    }

    fn altaz(
        &self,
        body: Body,
        observer: &Observer,
        epoch: &Epoch,
    ) -> Result<HorizontalCoord, EclipsisError> {
        self.check_coverage(body, epoch)?;
        Ok(HorizontalCoord {
            altitude: (self.sun_altitude)(observer),
            azimuth: 180.0,
        })
    }
}

// -------------------------------------------------------------------------------------------------
// SPK writer
// -------------------------------------------------------------------------------------------------

const RECORD: usize = 1024;

/// A type 2 segment with a linear motion:
/// `position(et) = position + velocity · (et − reference_et)`.
#[derive(Debug, Clone, Copy)]
pub struct LinearSegment {
    pub target: NaifId,
    pub center: NaifId,
    pub reference_et: f64,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub start_et: f64,
    pub end_et: f64,
    pub n_records: usize,
}

impl LinearSegment {
    pub fn fixed(target: NaifId, center: NaifId, position: Vector3<f64>, span: (f64, f64)) -> Self {
        LinearSegment::moving(target, center, position, Vector3::zeros(), span.0, span)
    }

    pub fn moving(
        target: NaifId,
        center: NaifId,
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        reference_et: f64,
        span: (f64, f64),
    ) -> Self {
        LinearSegment {
            target,
            center,
            reference_et,
            position,
            velocity,
            start_et: span.0,
            end_et: span.1,
            n_records: 4,
        }
    }

    fn at(&self, et: f64) -> Vector3<f64> {
        self.position + self.velocity * (et - self.reference_et)
    }
}

fn push_f64(file: &mut Vec<u8>, value: f64) {
    file.extend_from_slice(&value.to_le_bytes());
}

/// Little-endian SPK kernel holding degree-one Chebyshev segments.
///
/// Layout: file record, one comment record, one summary record, then the
/// segment data.
pub fn spk_bytes(segments: &[LinearSegment], comment: &str) -> Vec<u8> {
    let mut file = vec![0u8; RECORD * 3];

    file[0..8].copy_from_slice(b"DAF/SPK ");
    file[8..12].copy_from_slice(&2i32.to_le_bytes());
    file[12..16].copy_from_slice(&6i32.to_le_bytes());
    file[16..29].copy_from_slice(b"ECLIPSIS TEST");
    file[76..80].copy_from_slice(&3i32.to_le_bytes());
    file[80..84].copy_from_slice(&3i32.to_le_bytes());
    file[88..96].copy_from_slice(b"LTL-IEEE");
    let comment = &comment.as_bytes()[..comment.len().min(RECORD)];
    file[RECORD..RECORD + comment.len()].copy_from_slice(comment);

    let mut summaries = Vec::new();
    for segment in segments {
        let first_addr = file.len() / 8 + 1;
        let n = segment.n_records.max(1);
        let intlen = (segment.end_et - segment.start_et) / n as f64;
        let radius = intlen / 2.0;

        for k in 0..n {
            let mid = segment.start_et + (k as f64 + 0.5) * intlen;
            let center = segment.at(mid);
            let slope = segment.velocity * radius;
            push_f64(&mut file, mid);
            push_f64(&mut file, radius);
            for axis in 0..3 {
                push_f64(&mut file, center[axis]);
                push_f64(&mut file, slope[axis]);
            }
        }
        for value in [segment.start_et, intlen, 8.0, n as f64] {
            push_f64(&mut file, value);
        }
        let last_addr = file.len() / 8;

        summaries.push((
            segment.start_et,
            segment.end_et,
            [
                segment.target.to_id(),
                segment.center.to_id(),
                1,
                2,
                first_addr as i32,
                last_addr as i32,
            ],
        ));
    }

    let base = 2 * RECORD;
    file[base + 16..base + 24].copy_from_slice(&(summaries.len() as f64).to_le_bytes());
    for (i, (start, end, ints)) in summaries.iter().enumerate() {
        let off = base + 24 + i * 40;
        file[off..off + 8].copy_from_slice(&start.to_le_bytes());
        file[off + 8..off + 16].copy_from_slice(&end.to_le_bytes());
        for (j, v) in ints.iter().enumerate() {
            file[off + 16 + 4 * j..off + 20 + 4 * j].copy_from_slice(&v.to_le_bytes());
        }
    }
    file
}

pub fn write_spk(dir: &Path, name: &str, segments: &[LinearSegment]) -> Utf8PathBuf {
    let path = Utf8PathBuf::from_path_buf(dir.join(name)).unwrap();
    std::fs::write(&path, spk_bytes(segments, "JPL planetary and lunar ephemeris DE000\n"))
        .unwrap();
    path
}

/// Kernel where, at `epoch`, the Sun and the Moon lie on the line from the
/// geocenter through `observer`, at `SUN_DISTANCE_KM` and
/// `MOON_DISTANCE_KM` from it. The Moon moves at `moon_speed` km/s across
/// that line; the Earth stays at the barycenter.
pub fn transit_segments(observer: &Observer, epoch: &Epoch, moon_speed: f64) -> Vec<LinearSegment> {
    let et = epoch.to_et_seconds();
    let span = (et - 7200.0, et + 7200.0);

    let (site, _) = observer.geocentric_state(epoch);
    let up = site.normalize();
    let across = up.cross(&Vector3::z()).normalize();

    vec![
        LinearSegment::fixed(
            NaifId::Sun,
            NaifId::SolarSystemBarycenter,
            site + SUN_DISTANCE_KM * up,
            span,
        ),
        LinearSegment::fixed(
            NaifId::EarthMoonBarycenter,
            NaifId::SolarSystemBarycenter,
            Vector3::zeros(),
            span,
        ),
        LinearSegment::fixed(NaifId::Earth, NaifId::EarthMoonBarycenter, Vector3::zeros(), span),
        LinearSegment::moving(
            NaifId::Moon,
            NaifId::EarthMoonBarycenter,
            site + MOON_DISTANCE_KM * up,
            moon_speed * across,
            et,
            span,
        ),
    ]
}
