//! SPK type 2 records and their Chebyshev interpolation.
//!
//! Each record of a type 2 segment stores, as little-endian doubles:
//! 1. `mid`, the midpoint of the record interval (ET seconds),
//! 2. `radius`, the half length of that interval (seconds),
//! 3. `ncoeff` Chebyshev coefficients for X, then Y, then Z (km).
//!
//! Position at `et` is `Σ cₙ Tₙ(s)` with `s = (et - mid) / radius`. Velocity is
//! the time derivative of that series, `Σ cₙ T'ₙ(s) / radius`.
use std::io::{Read, Seek, SeekFrom};

use nalgebra::Vector3;
use nom::{multi::count, number::complete::le_f64, IResult, Parser};

use crate::eclipsis_errors::EclipsisError;

/// One Chebyshev record of a type 2 segment.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisRecord {
    /// Midpoint of the record time span (ET seconds from J2000 TDB).
    pub mid: f64,
    /// Half width of the record interval (seconds).
    pub radius: f64,
    /// Chebyshev coefficients for X (km).
    pub x: Vec<f64>,
    /// Chebyshev coefficients for Y (km).
    pub y: Vec<f64>,
    /// Chebyshev coefficients for Z (km).
    pub z: Vec<f64>,
}

impl EphemerisRecord {
    /// Decode one record from its raw bytes.
    ///
    /// Arguments
    /// -----------------
    /// * `input`: bytes starting at the record, at least `(2 + 3 ncoeff) * 8` long.
    /// * `ncoeff`: number of coefficients per axis.
    pub fn parse_record(input: &[u8], ncoeff: usize) -> IResult<&[u8], Self> {
        let (input, (mid, radius)) = (le_f64, le_f64).parse(input)?;
        let (input, x) = count(le_f64, ncoeff).parse(input)?;
        let (input, y) = count(le_f64, ncoeff).parse(input)?;
        let (input, z) = count(le_f64, ncoeff).parse(input)?;
        Ok((
            input,
            EphemerisRecord {
                mid,
                radius,
                x,
                y,
                z,
            },
        ))
    }

    /// Read `n_records` contiguous records starting at a segment address.
    ///
    /// Arguments
    /// -----------------
    /// * `reader`: seekable byte source holding the kernel.
    /// * `segment_start_addr`: first address of the segment in double words (1-based).
    /// * `rsize`: record size in double words.
    /// * `n_records`: number of records to decode.
    ///
    /// Return
    /// ----------
    /// * The records in file order. A record with a non positive radius is
    ///   reported as [`EclipsisError::UnsupportedDafFormat`].
    pub fn parse<R: Read + Seek>(
        reader: &mut R,
        segment_start_addr: usize,
        rsize: usize,
        n_records: usize,
    ) -> Result<Vec<Self>, EclipsisError> {
        if segment_start_addr == 0 || rsize < 5 {
            return Err(EclipsisError::UnsupportedDafFormat(format!(
                "invalid segment layout (start address {segment_start_addr}, record size {rsize})"
            )));
        }

        let record_bytes = rsize * 8;
        let ncoeff = (rsize - 2) / 3;

        let mut buffer = vec![0u8; record_bytes * n_records];
        reader.seek(SeekFrom::Start(((segment_start_addr - 1) * 8) as u64))?;
        reader.read_exact(&mut buffer)?;

        buffer
            .chunks_exact(record_bytes)
            .map(|chunk| {
                let (_, record) = EphemerisRecord::parse_record(chunk, ncoeff)?;
                if record.radius.is_nan() || record.radius <= 0.0 {
                    return Err(EclipsisError::UnsupportedDafFormat(format!(
                        "record centered at ET {} has radius {}",
                        record.mid, record.radius
                    )));
                }
                Ok(record)
            })
            .collect()
    }

    /// Interpolate position (km) and velocity (km/s) at an ET instant.
    ///
    /// The normalized time is clamped to `[-1, 1]`; callers select the record
    /// covering `ephem_time` so the clamp only absorbs rounding at the edges.
    pub fn interpolate(&self, ephem_time: f64) -> (Vector3<f64>, Vector3<f64>) {
        let s = ((ephem_time - self.mid) / self.radius).clamp(-1.0, 1.0);
        let n = self.x.len();

        // T_0 = 1, T_1 = s, T_n = 2 s T_{n-1} - T_{n-2}
        let mut poly = vec![0.0; n];
        // T'_0 = 0, T'_1 = 1, T'_n = 2 s T'_{n-1} + 2 T_{n-1} - T'_{n-2}
        let mut deriv = vec![0.0; n];
        if n > 0 {
            poly[0] = 1.0;
        }
        if n > 1 {
            poly[1] = s;
            deriv[1] = 1.0;
        }
        for k in 2..n {
            poly[k] = 2.0 * s * poly[k - 1] - poly[k - 2];
            deriv[k] = 2.0 * s * deriv[k - 1] + 2.0 * poly[k - 1] - deriv[k - 2];
        }

        let series = |coeffs: &[f64], basis: &[f64]| -> f64 {
            coeffs.iter().zip(basis).map(|(c, b)| c * b).sum()
        };

        let position = Vector3::new(
            series(&self.x, &poly),
            series(&self.y, &poly),
            series(&self.z, &poly),
        );
        let velocity = Vector3::new(
            series(&self.x, &deriv),
            series(&self.y, &deriv),
            series(&self.z, &deriv),
        ) / self.radius;

        (position, velocity)
    }
}
