//! Directory footer of an SPK type 2 segment.
//!
//! The last four double words of a type 2 segment describe how its records
//! are laid out:
//!
//! * `init`: start epoch of the first record (ET seconds from J2000 TDB),
//! * `intlen`: time span covered by each record (seconds),
//! * `rsize`: record size in **double words**, not bytes,
//! * `n_records`: number of records in the segment.
//!
//! DAF addresses count 8-byte words starting at 1, so the footer of a segment
//! ending at address `final_addr` starts at byte `(final_addr - 4) * 8`.
use std::io::{Read, Seek, SeekFrom};

use hifitime::{Duration, Epoch};
use nom::{number::complete::le_f64, IResult, Parser};

use crate::eclipsis_errors::EclipsisError;

/// Decoded directory footer of a segment.
///
/// See also
/// ------------
/// * [`DirectoryData::parse`] – Reads the four values from a kernel.
/// * [`super::ephemeris_record::EphemerisRecord`] – The records it describes.
#[derive(Debug, PartialEq, Clone)]
pub struct DirectoryData {
    pub init: f64,
    pub intlen: f64,
    pub rsize: usize,
    pub n_records: usize,
}

impl DirectoryData {
    /// Read the directory footer of the segment ending at `final_addr`.
    ///
    /// Arguments
    /// -----------------
    /// * `reader`: any seekable byte source holding the kernel.
    /// * `final_addr`: last address of the segment in double words (1-based).
    ///
    /// Return
    /// ----------
    /// * The footer, or [`EclipsisError::UnsupportedDafFormat`] when the values
    ///   cannot describe a type 2 segment (non positive interval, record size
    ///   below 5 words or not of the form `2 + 3n`, no record).
    pub fn parse<R: Read + Seek>(reader: &mut R, final_addr: usize) -> Result<Self, EclipsisError> {
        if final_addr < 4 {
            return Err(EclipsisError::UnsupportedDafFormat(format!(
                "segment final address {final_addr} is too small to hold a directory"
            )));
        }

        let mut dir_buf = [0u8; 32];
        reader.seek(SeekFrom::Start(((final_addr - 4) * 8) as u64))?;
        reader.read_exact(&mut dir_buf)?;

        let (_, (init, intlen, rsize, n_records)) = footer(&dir_buf)?;

        let valid = intlen.is_finite()
            && intlen > 0.0
            && rsize >= 5.0
            && (rsize as usize - 2) % 3 == 0
            && n_records >= 1.0
            && init.is_finite();
        if !valid {
            return Err(EclipsisError::UnsupportedDafFormat(format!(
                "invalid type 2 directory (init={init}, intlen={intlen}, rsize={rsize}, n={n_records})"
            )));
        }

        Ok(DirectoryData {
            init,
            intlen,
            rsize: rsize as usize,
            n_records: n_records as usize,
        })
    }

    /// Number of Chebyshev coefficients per axis in each record.
    pub fn n_coefficients(&self) -> usize {
        (self.rsize - 2) / 3
    }

    /// Index of the record covering an ET instant.
    ///
    /// The last record also covers the final boundary of the segment, so the
    /// index is clamped to `n_records - 1`. Instants before `init` give `None`.
    pub fn record_index(&self, et_seconds: f64) -> Option<usize> {
        let offset = (et_seconds - self.init) / self.intlen;
        if offset.is_nan() || offset < 0.0 {
            return None;
        }
        Some((offset.floor() as usize).min(self.n_records - 1))
    }
}

fn footer(input: &[u8]) -> IResult<&[u8], (f64, f64, f64, f64)> {
    (le_f64, le_f64, le_f64, le_f64).parse(input)
}

impl std::fmt::Display for DirectoryData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let epoch = Epoch::from_et_seconds(self.init);
        let record_length = Duration::from_seconds(self.intlen);

        writeln!(f, "+----------------+----------------------------+")?;
        writeln!(f, "| {:<14} | {:<26} |", "Field", "Value")?;
        writeln!(f, "+----------------+----------------------------+")?;
        writeln!(f, "| {:<14} | {:<26} |", "init (epoch)", epoch.to_string())?;
        writeln!(f, "| {:<14} | {:<26} |", "intlen", record_length.to_string())?;
        writeln!(f, "| {:<14} | {:<26} |", "rsize", self.rsize)?;
        writeln!(f, "| {:<14} | {:<26} |", "n_records", self.n_records)?;
        writeln!(f, "+----------------+----------------------------+")
    }
}

#[cfg(test)]
mod test_directory {
    use std::io::Cursor;

    use super::*;

    fn footer_at(final_addr: usize, values: [f64; 4]) -> Cursor<Vec<u8>> {
        let mut bytes = vec![0u8; (final_addr - 4) * 8];
        for v in values {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        Cursor::new(bytes)
    }

    #[test]
    fn test_parse_directory() {
        let mut cursor = footer_at(10, [-14200747200.0, 1382400.0, 41.0, 25112.0]);
        let dir = DirectoryData::parse(&mut cursor, 10).unwrap();
        assert_eq!(
            dir,
            DirectoryData {
                init: -14200747200.0,
                intlen: 1382400.0,
                rsize: 41,
                n_records: 25112
            }
        );
        assert_eq!(dir.n_coefficients(), 13);
    }

    #[test]
    fn test_invalid_directory() {
        let mut cursor = footer_at(10, [0.0, 0.0, 41.0, 10.0]);
        assert!(matches!(
            DirectoryData::parse(&mut cursor, 10),
            Err(EclipsisError::UnsupportedDafFormat(_))
        ));

        let mut cursor = footer_at(10, [0.0, 86400.0, 40.0, 10.0]);
        assert!(DirectoryData::parse(&mut cursor, 10).is_err());

        let mut short = Cursor::new(vec![0u8; 16]);
        assert!(matches!(
            DirectoryData::parse(&mut short, 10),
            Err(EclipsisError::IoError(_))
        ));
    }

    #[test]
    fn test_record_index() {
        let dir = DirectoryData {
            init: 0.0,
            intlen: 100.0,
            rsize: 11,
            n_records: 4,
        };
        assert_eq!(dir.record_index(0.0), Some(0));
        assert_eq!(dir.record_index(250.0), Some(2));
        assert_eq!(dir.record_index(400.0), Some(3));
        assert_eq!(dir.record_index(-1.0), None);
        assert_eq!(dir.record_index(f64::NAN), None);
    }

    #[test]
    fn test_directory_display() {
        let dir_data = DirectoryData {
            init: -14200747200.0,
            intlen: 1382400.0,
            rsize: 41,
            n_records: 25112,
        };

        let expected_output = r#"+----------------+----------------------------+
| Field          | Value                      |
+----------------+----------------------------+
| init (epoch)   | 1549-12-31T00:00:00 ET     |
| intlen         | 16 days                    |
| rsize          | 41                         |
| n_records      | 25112                      |
+----------------+----------------------------+
"#;
        assert_eq!(format!("{dir_data}"), expected_output);
    }
}
