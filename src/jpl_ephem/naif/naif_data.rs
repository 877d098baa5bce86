//! In-memory SPK kernel restricted to the segments a caller asks for.
//!
//! Loading walks the DAF structure in order:
//! 1. the **file record** ([`DAFHeader`]), validated as a little-endian SPK file,
//! 2. the **comment area**, searched for the JPL header ([`JPLEphemHeader`]),
//! 3. the chain of **summary records**, following `next` pointers until `0`,
//! 4. for every requested segment, its **directory** and **Chebyshev records**.
//!
//! Positions are in **km**, velocities in **km/s**, times in **ET seconds**
//! from J2000 TDB. The frame of every segment is the J2000 equator.
use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
};

use camino::Utf8Path;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};
use hifitime::Epoch;
use log::{debug, info, warn};
use nalgebra::Vector3;

use crate::eclipsis_errors::EclipsisError;

use super::{
    daf_header::{DAFHeader, DAF_RECORD_BYTES},
    directory::DirectoryData,
    ephemeris_record::EphemerisRecord,
    jpl_ephem_header::JPLEphemHeader,
    naif_ids::{naif_type::SpkDataType, NaifId},
    summary_record::{Summary, SummaryRecord},
};

/// A loaded SPK type 2 segment.
#[derive(Debug, Clone)]
pub struct SpkSegment {
    pub summary: Summary,
    pub directory: DirectoryData,
    pub records: Vec<EphemerisRecord>,
}

impl SpkSegment {
    /// State of the target relative to the center, or `None` outside the segment.
    fn state(&self, et_seconds: f64) -> Option<(Vector3<f64>, Vector3<f64>)> {
        if !self.summary.covers(et_seconds) {
            return None;
        }
        let idx = self.directory.record_index(et_seconds)?;
        self.records
            .get(idx)
            .map(|record| record.interpolate(et_seconds))
    }
}

// (target_id, center_id) -> segments in file order
type SegmentMap = HashMap<(i32, i32), Vec<SpkSegment>>;

#[derive(Debug, Clone)]
pub struct NaifData {
    pub(crate) daf_header: DAFHeader,
    pub(crate) header: Option<JPLEphemHeader>,
    pub(crate) summaries: Vec<Summary>,
    pub(crate) segments: SegmentMap,
}

impl NaifData {
    /// Open an SPK kernel and load the requested segments.
    ///
    /// Arguments
    /// -----------------
    /// * `file_path`: location of the `.bsp` file.
    /// * `wanted`: `(target, center)` pairs to load, `None` to load every
    ///   supported segment.
    ///
    /// Return
    /// ----------
    /// * The loaded kernel, or an error of kind
    ///   [`crate::eclipsis_errors::ErrorKind::UnavailableEphemeris`].
    ///
    /// See also
    /// ------------
    /// * [`NaifData::from_reader`] – Same pipeline over any seekable source.
    pub fn read_naif_file(
        file_path: &Utf8Path,
        wanted: Option<&[(NaifId, NaifId)]>,
    ) -> Result<Self, EclipsisError> {
        let file = File::open(file_path).map_err(|e| {
            EclipsisError::JPLFileNotFound(format!("{file_path} ({e})"))
        })?;
        let mut reader = BufReader::new(file);
        let naif = NaifData::from_reader(&mut reader, wanted)?;

        info!(
            "Loaded {} segment(s) from SPK kernel {file_path}{}",
            naif.segments.values().map(Vec::len).sum::<usize>(),
            naif.header
                .as_ref()
                .map(|h| format!(" ({})", h.version))
                .unwrap_or_default()
        );
        Ok(naif)
    }

    /// Decode an SPK kernel from a seekable byte source.
    ///
    /// When `wanted` is given, every requested pair must be present in the
    /// kernel with at least one type 2 segment. A requested segment of another
    /// type is an [`EclipsisError::UnsupportedSpkDataType`]; unrequested
    /// segments are never read.
    pub fn from_reader<R: Read + Seek>(
        reader: &mut R,
        wanted: Option<&[(NaifId, NaifId)]>,
    ) -> Result<Self, EclipsisError> {
        let wanted_ids: Option<HashSet<(i32, i32)>> = wanted.map(|pairs| {
            pairs
                .iter()
                .map(|(target, center)| (target.to_id(), center.to_id()))
                .collect()
        });

        // --- File record
        let mut buffer = [0u8; DAF_RECORD_BYTES];
        reader.seek(SeekFrom::Start(0))?;
        reader.read_exact(&mut buffer)?;
        let daf_header = DAFHeader::parse_spk(&buffer)?;

        // --- Comment area, between the file record and the first summary record
        let fward = daf_header.fward as usize;
        let header = if fward > 2 {
            let mut comment = vec![0u8; (fward - 2) * DAF_RECORD_BYTES];
            reader.read_exact(&mut comment)?;
            let text = String::from_utf8_lossy(&comment).replace('\0', "\n");
            JPLEphemHeader::from_comment(&text)
        } else {
            None
        };

        // --- Summary record chain
        let summary_words = daf_header.summary_words();
        let mut summaries = Vec::new();
        let mut visited = HashSet::new();
        let mut record_number = fward;
        while record_number != 0 {
            if !visited.insert(record_number) {
                return Err(EclipsisError::UnsupportedDafFormat(format!(
                    "summary record {record_number} is linked twice"
                )));
            }
            reader.seek(SeekFrom::Start(
                ((record_number - 1) * DAF_RECORD_BYTES) as u64,
            ))?;
            reader.read_exact(&mut buffer)?;
            let record = SummaryRecord::parse(&buffer, summary_words)?;
            debug!(
                "Summary record #{record_number}: {} segment(s), next #{}",
                record.summaries.len(),
                record.next
            );
            summaries.extend(record.summaries);
            record_number = record.next;
        }

        // --- Segments
        let mut segments: SegmentMap = HashMap::new();
        for summary in &summaries {
            let key = (summary.target, summary.center);
            let requested = wanted_ids.as_ref().map_or(true, |ids| ids.contains(&key));
            if !requested {
                continue;
            }

            let supported = SpkDataType::from_i32(summary.data_type)
                .map(SpkDataType::is_supported)
                .unwrap_or(false);
            if !supported {
                if wanted_ids.is_some() {
                    return Err(EclipsisError::UnsupportedSpkDataType {
                        target: summary.target,
                        data_type: summary.data_type,
                    });
                }
                warn!(
                    "Skipping SPK segment {} -> {} of unsupported type {}",
                    summary.center, summary.target, summary.data_type
                );
                continue;
            }

            if summary.initial_addr < 1 || summary.final_addr <= summary.initial_addr {
                return Err(EclipsisError::UnsupportedDafFormat(format!(
                    "segment {} -> {} has addresses {}..{}",
                    summary.center, summary.target, summary.initial_addr, summary.final_addr
                )));
            }

            let directory = DirectoryData::parse(reader, summary.final_addr as usize)?;
            let records = EphemerisRecord::parse(
                reader,
                summary.initial_addr as usize,
                directory.rsize,
                directory.n_records,
            )?;

            segments.entry(key).or_default().push(SpkSegment {
                summary: summary.clone(),
                directory,
                records,
            });
        }

        if let Some(ids) = &wanted_ids {
            let mut missing: Vec<_> = ids.iter().filter(|k| !segments.contains_key(k)).collect();
            missing.sort();
            if let Some(&&(target, center)) = missing.first() {
                return Err(EclipsisError::MissingEphemerisSegment { target, center });
            }
        }

        Ok(NaifData {
            daf_header,
            header,
            summaries,
            segments,
        })
    }

    /// Interpolate the state of `target` relative to `center` at an ET instant.
    ///
    /// When several segments of the pair cover the instant, the one stored
    /// last in the file wins.
    ///
    /// Arguments
    /// -----------------
    /// * `target`: NAIF body of interest.
    /// * `center`: NAIF body the state is relative to.
    /// * `et_seconds`: ET seconds from J2000 TDB.
    ///
    /// Return
    /// ----------
    /// * `(position [km], velocity [km/s])` in the J2000 equatorial frame.
    /// * [`EclipsisError::MissingEphemerisSegment`] if the pair was not loaded,
    ///   [`EclipsisError::EphemerisOutOfRange`] if no segment covers `et_seconds`.
    pub fn ephemeris(
        &self,
        target: NaifId,
        center: NaifId,
        et_seconds: f64,
    ) -> Result<(Vector3<f64>, Vector3<f64>), EclipsisError> {
        let key = (target.to_id(), center.to_id());
        let segments = self
            .segments
            .get(&key)
            .ok_or(EclipsisError::MissingEphemerisSegment {
                target: key.0,
                center: key.1,
            })?;

        segments
            .iter()
            .rev()
            .find_map(|segment| segment.state(et_seconds))
            .ok_or(EclipsisError::EphemerisOutOfRange {
                target: key.0,
                center: key.1,
                et_seconds,
            })
    }

    /// Time span, in ET seconds, covered by the loaded segments of a pair.
    ///
    /// Gaps between segments are not reported.
    pub fn coverage(&self, target: NaifId, center: NaifId) -> Option<(f64, f64)> {
        self.segments
            .get(&(target.to_id(), center.to_id()))?
            .iter()
            .map(|s| (s.summary.start_epoch, s.summary.end_epoch))
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
    }

    pub fn daf_header(&self) -> &DAFHeader {
        &self.daf_header
    }

    pub fn jpl_header(&self) -> Option<&JPLEphemHeader> {
        self.header.as_ref()
    }

    /// Every segment summary found in the kernel, loaded or not.
    pub fn summaries(&self) -> &[Summary] {
        &self.summaries
    }

    /// Human readable description of the kernel: file record, JPL header if
    /// any, and one table row per segment.
    pub fn info(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Target"),
            Cell::new("Center"),
            Cell::new("Type"),
            Cell::new("Start (TDB)"),
            Cell::new("End (TDB)"),
            Cell::new("Records"),
            Cell::new("Loaded"),
        ]);

        for summary in &self.summaries {
            let loaded = self
                .segments
                .get(&(summary.target, summary.center))
                .and_then(|segs| segs.iter().find(|s| &s.summary == summary));
            let data_type = SpkDataType::from_i32(summary.data_type)
                .map(|t| t.to_string())
                .unwrap_or_else(|_| summary.data_type.to_string());

            table.add_row(Row::from(vec![
                Cell::new(NaifId::from_id(summary.target)),
                Cell::new(NaifId::from_id(summary.center)),
                Cell::new(data_type),
                Cell::new(Epoch::from_et_seconds(summary.start_epoch)),
                Cell::new(Epoch::from_et_seconds(summary.end_epoch)),
                Cell::new(
                    loaded
                        .map(|s| s.directory.n_records.to_string())
                        .unwrap_or_else(|| "-".into()),
                )
                .set_alignment(CellAlignment::Right),
                Cell::new(if loaded.is_some() { "yes" } else { "no" }),
            ]));
        }

        let mut out = self.daf_header.to_string();
        if let Some(header) = &self.header {
            out.push_str(&header.to_string());
        }
        out.push_str(&table.to_string());
        out
    }
}

#[cfg(test)]
mod test_naif_data {
    use std::io::Cursor;

    use super::*;
    use approx::assert_relative_eq;

    /// Minimal SPK writer: one summary record, one type 2 segment per entry.
    /// Each segment holds `n` records of degree 1 with `x = a + b s` on every axis.
    fn build_kernel(segments: &[(i32, i32, i32, f64, f64, usize)], comment: &str) -> Vec<u8> {
        let mut file = vec![0u8; DAF_RECORD_BYTES * 3];

        file[0..8].copy_from_slice(b"DAF/SPK ");
        file[8..12].copy_from_slice(&2i32.to_le_bytes());
        file[12..16].copy_from_slice(&6i32.to_le_bytes());
        file[16..23].copy_from_slice(b"TESTSPK");
        file[76..80].copy_from_slice(&3i32.to_le_bytes());
        file[80..84].copy_from_slice(&3i32.to_le_bytes());
        file[88..96].copy_from_slice(b"LTL-IEEE");
        file[DAF_RECORD_BYTES..DAF_RECORD_BYTES + comment.len()]
            .copy_from_slice(comment.as_bytes());

        let mut summaries = Vec::new();
        for &(target, center, data_type, start, intlen, n) in segments {
            let first_addr = file.len() / 8 + 1;
            let rsize = 2 + 3 * 2;
            for k in 0..n {
                let mid = start + (k as f64 + 0.5) * intlen;
                for v in [mid, intlen / 2.0, k as f64, 1.0, k as f64, 1.0, k as f64, 1.0] {
                    file.extend_from_slice(&f64::to_le_bytes(v));
                }
            }
            for v in [start, intlen, rsize as f64, n as f64] {
                file.extend_from_slice(&f64::to_le_bytes(v));
            }
            let last_addr = file.len() / 8;
            summaries.push((
                start,
                start + intlen * n as f64,
                [target, center, 1, data_type, first_addr as i32, last_addr as i32],
            ));
        }

        let base = 2 * DAF_RECORD_BYTES;
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

    #[test]
    fn test_load_and_interpolate() {
        let kernel = build_kernel(
            &[(301, 3, 2, 0.0, 100.0, 4), (3, 0, 2, -50.0, 200.0, 2)],
            "JPL planetary and lunar ephemeris DE000\n",
        );
        let naif = NaifData::from_reader(&mut Cursor::new(kernel), None).unwrap();

        assert_eq!(naif.summaries().len(), 2);
        assert_eq!(naif.jpl_header().map(|h| h.version.as_str()), Some("DE000"));
        assert_eq!(naif.daf_header().internal_filename, "TESTSPK");

        // record k=2 covers [200, 300), mid 250, radius 50: x = 2 + s
        let (pos, vel) = naif.ephemeris(NaifId::Moon, NaifId::EarthMoonBarycenter, 275.0).unwrap();
        assert_relative_eq!(pos, Vector3::new(2.5, 2.5, 2.5), epsilon = 1e-12);
        assert_relative_eq!(vel, Vector3::new(0.02, 0.02, 0.02), epsilon = 1e-12);

        // final boundary belongs to the last record
        let (pos, _) = naif.ephemeris(NaifId::Moon, NaifId::EarthMoonBarycenter, 400.0).unwrap();
        assert_relative_eq!(pos.x, 4.0, epsilon = 1e-12);

        assert_eq!(
            naif.coverage(NaifId::EarthMoonBarycenter, NaifId::SolarSystemBarycenter),
            Some((-50.0, 350.0))
        );
    }

    #[test]
    fn test_out_of_range_and_missing() {
        let kernel = build_kernel(&[(301, 3, 2, 0.0, 100.0, 4)], "");
        let naif = NaifData::from_reader(&mut Cursor::new(kernel), None).unwrap();

        assert_eq!(
            naif.ephemeris(NaifId::Moon, NaifId::EarthMoonBarycenter, 400.5),
            Err(EclipsisError::EphemerisOutOfRange {
                target: 301,
                center: 3,
                et_seconds: 400.5
            })
        );
        assert_eq!(
            naif.ephemeris(NaifId::Sun, NaifId::SolarSystemBarycenter, 10.0),
            Err(EclipsisError::MissingEphemerisSegment {
                target: 10,
                center: 0
            })
        );
        assert!(naif.jpl_header().is_none());
    }

    #[test]
    fn test_wanted_filter() {
        let kernel = build_kernel(
            &[(301, 3, 2, 0.0, 100.0, 4), (10, 0, 2, 0.0, 100.0, 4), (499, 4, 3, 0.0, 100.0, 1)],
            "",
        );

        let naif = NaifData::from_reader(
            &mut Cursor::new(kernel.clone()),
            Some(&[(NaifId::Sun, NaifId::SolarSystemBarycenter)]),
        )
        .unwrap();
        assert_eq!(naif.segments.len(), 1);
        assert_eq!(naif.summaries().len(), 3);
        assert!(naif.ephemeris(NaifId::Moon, NaifId::EarthMoonBarycenter, 10.0).is_err());

        // unsupported types are skipped when loading everything
        let all = NaifData::from_reader(&mut Cursor::new(kernel.clone()), None).unwrap();
        assert_eq!(all.segments.len(), 2);
        assert!(all.info().contains("no"));

        assert_eq!(
            NaifData::from_reader(
                &mut Cursor::new(kernel.clone()),
                Some(&[(NaifId::Other(499), NaifId::Other(4))])
            )
            .err(),
            Some(EclipsisError::UnsupportedSpkDataType {
                target: 499,
                data_type: 3
            })
        );

        assert_eq!(
            NaifData::from_reader(
                &mut Cursor::new(kernel),
                Some(&[(NaifId::Earth, NaifId::EarthMoonBarycenter)])
            )
            .err(),
            Some(EclipsisError::MissingEphemerisSegment {
                target: 399,
                center: 3
            })
        );
    }

    #[test]
    fn test_not_a_kernel() {
        let mut cursor = Cursor::new(vec![0u8; 4096]);
        assert!(matches!(
            NaifData::from_reader(&mut cursor, None),
            Err(EclipsisError::UnsupportedDafFormat(_))
        ));

        let missing = NaifData::read_naif_file(Utf8Path::new("/nonexistent/de421.bsp"), None);
        assert!(matches!(missing, Err(EclipsisError::JPLFileNotFound(_))));
    }
}
