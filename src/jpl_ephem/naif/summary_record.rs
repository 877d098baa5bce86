//! DAF summary records and SPK segment descriptors.
//!
//! A summary record is one 1024-byte DAF record holding three control words
//! (`next`, `prev`, `nsum`, stored as doubles) followed by up to `nsum` array
//! summaries. For SPK kernels each summary packs two doubles (coverage in ET
//! seconds) and six integers (target, center, frame, data type, first and last
//! address of the segment). Summary records form a doubly linked list; `next`
//! is `0` on the last record.
use std::fmt;

use hifitime::Epoch;
use nom::{
    bytes::complete::take,
    number::complete::{le_f64, le_i32},
    IResult, Parser,
};

use crate::eclipsis_errors::EclipsisError;

use super::naif_ids::{naif_type::SpkDataType, NaifId};

#[derive(Debug, PartialEq, Clone)]
pub struct Summary {
    pub start_epoch: f64,
    pub end_epoch: f64,
    pub target: i32,
    pub center: i32,
    pub frame_id: i32,
    pub data_type: i32,
    pub initial_addr: i32,
    pub final_addr: i32,
}

impl Summary {
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, (start_epoch, end_epoch)) = (le_f64, le_f64).parse(input)?;
        let (input, (target, center, frame_id, data_type, initial_addr, final_addr)) =
            (le_i32, le_i32, le_i32, le_i32, le_i32, le_i32).parse(input)?;
        Ok((
            input,
            Summary {
                start_epoch,
                end_epoch,
                target,
                center,
                frame_id,
                data_type,
                initial_addr,
                final_addr,
            },
        ))
    }

    /// `true` when the segment covers the ET instant (bounds included).
    pub fn covers(&self, et_seconds: f64) -> bool {
        self.start_epoch <= et_seconds && et_seconds <= self.end_epoch
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data_type = SpkDataType::from_i32(self.data_type)
            .map(|t| t.to_string())
            .unwrap_or_else(|_| format!("Unknown type {}", self.data_type));

        let fields = [
            (
                "start_epoch",
                Epoch::from_et_seconds(self.start_epoch).to_string(),
            ),
            ("end_epoch", Epoch::from_et_seconds(self.end_epoch).to_string()),
            ("target", NaifId::from_id(self.target).to_string()),
            ("center", NaifId::from_id(self.center).to_string()),
            ("frame_id", self.frame_id.to_string()),
            ("data_type", data_type),
            ("initial_addr", self.initial_addr.to_string()),
            ("final_addr", self.final_addr.to_string()),
        ];

        let label_width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(10);
        let value_width = fields.iter().map(|(_, v)| v.len()).max().unwrap_or(10);

        let border = format!(
            "+{:-<label$}+{:-<value$}+",
            "",
            "",
            label = label_width + 2,
            value = value_width + 2
        );

        writeln!(f, "{border}")?;
        writeln!(f, "| {:<label_width$} | {:<value_width$} |", "Field", "Value")?;
        writeln!(f, "{border}")?;
        for (label, value) in fields {
            writeln!(f, "| {label:<label_width$} | {value:<value_width$} |")?;
        }
        writeln!(f, "{border}")
    }
}

/// One decoded summary record.
#[derive(Debug, PartialEq, Clone)]
pub struct SummaryRecord {
    /// Record number of the next summary record, `0` for the last one.
    pub next: usize,
    pub prev: usize,
    pub summaries: Vec<Summary>,
}

impl SummaryRecord {
    /// Decode a 1024-byte summary record.
    ///
    /// Arguments
    /// -----------------
    /// * `record`: the raw record bytes.
    /// * `summary_words`: size of one summary in double words (`ND + ceil(NI/2)`).
    ///
    /// Return
    /// ----------
    /// * The control words and the `nsum` summaries, or an
    ///   [`EclipsisError::UnsupportedDafFormat`] when `nsum` does not fit in the record.
    pub fn parse(record: &[u8], summary_words: usize) -> Result<Self, EclipsisError> {
        let (input, (next, prev, nsum)) = control_words(record)?;

        let stride = summary_words * 8;
        let capacity = (record.len().saturating_sub(24)) / stride.max(1);
        if nsum < 0.0 || nsum as usize > capacity || next < 0.0 || prev < 0.0 {
            return Err(EclipsisError::UnsupportedDafFormat(format!(
                "corrupted summary record (next={next}, prev={prev}, nsum={nsum})"
            )));
        }

        let mut summaries = Vec::with_capacity(nsum as usize);
        let mut rest = input;
        for _ in 0..nsum as usize {
            let (after, chunk) = take_summary(rest, stride)?;
            let (_, summary) = Summary::parse(chunk)?;
            summaries.push(summary);
            rest = after;
        }

        Ok(SummaryRecord {
            next: next as usize,
            prev: prev as usize,
            summaries,
        })
    }
}

fn control_words(input: &[u8]) -> IResult<&[u8], (f64, f64, f64)> {
    (le_f64, le_f64, le_f64).parse(input)
}

fn take_summary(input: &[u8], stride: usize) -> IResult<&[u8], &[u8]> {
    take(stride)(input)
}

#[cfg(test)]
mod test_summary {
    use super::*;

    fn summary_bytes(summary: &Summary) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&summary.start_epoch.to_le_bytes());
        bytes.extend_from_slice(&summary.end_epoch.to_le_bytes());
        for v in [
            summary.target,
            summary.center,
            summary.frame_id,
            summary.data_type,
            summary.initial_addr,
            summary.final_addr,
        ] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes
    }

    fn emb_summary() -> Summary {
        Summary {
            start_epoch: -3169195200.0,
            end_epoch: 1696852800.0,
            target: 3,
            center: 0,
            frame_id: 1,
            data_type: 2,
            initial_addr: 3021513,
            final_addr: 4051108,
        }
    }

    #[test]
    fn test_parse_summary_record() {
        let moon = Summary {
            target: 301,
            center: 3,
            initial_addr: 4051109,
            final_addr: 4500000,
            ..emb_summary()
        };

        let mut record = Vec::new();
        record.extend_from_slice(&7.0f64.to_le_bytes());
        record.extend_from_slice(&0.0f64.to_le_bytes());
        record.extend_from_slice(&2.0f64.to_le_bytes());
        record.extend(summary_bytes(&emb_summary()));
        record.extend(summary_bytes(&moon));
        record.resize(1024, 0);

        let parsed = SummaryRecord::parse(&record, 5).unwrap();
        assert_eq!(parsed.next, 7);
        assert_eq!(parsed.prev, 0);
        assert_eq!(parsed.summaries, vec![emb_summary(), moon]);
    }

    #[test]
    fn test_corrupted_summary_record() {
        let mut record = Vec::new();
        record.extend_from_slice(&0.0f64.to_le_bytes());
        record.extend_from_slice(&0.0f64.to_le_bytes());
        record.extend_from_slice(&200.0f64.to_le_bytes());
        record.resize(1024, 0);

        assert!(matches!(
            SummaryRecord::parse(&record, 5),
            Err(EclipsisError::UnsupportedDafFormat(_))
        ));
    }

    #[test]
    fn test_covers() {
        let summary = emb_summary();
        assert!(summary.covers(summary.start_epoch));
        assert!(summary.covers(0.0));
        assert!(!summary.covers(summary.end_epoch + 1.0));
    }

    #[test]
    fn test_summary_display() {
        let summary = Summary {
            start_epoch: -14200747200.0,
            end_epoch: 20514081600.0,
            ..emb_summary()
        };

        let expected = r#"+--------------+-------------------------+
| Field        | Value                   |
+--------------+-------------------------+
| start_epoch  | 1549-12-31T00:00:00 ET  |
| end_epoch    | 2650-01-25T00:00:00 ET  |
| target       | Earth-Moon Barycenter   |
| center       | Solar System Barycenter |
| frame_id     | 1                       |
| data_type    | Chebyshev Position Only |
| initial_addr | 3021513                 |
| final_addr   | 4051108                 |
+--------------+-------------------------+
"#;
        assert_eq!(format!("{summary}"), expected);
    }
}
