//! DAF (Double Precision Array File) file record.
//!
//! The first 1024-byte record of an SPK kernel describes the layout of the
//! rest of the file:
//!
//! * **`idword`**: format identifier (`"DAF/SPK "`), eight ASCII bytes.
//! * **`nd`** / **`ni`**: number of double / integer components of each array
//!   summary. SPK kernels use `nd = 2`, `ni = 6`.
//! * **`fward`** / **`bward`**: record numbers (1-based) of the first and last
//!   summary record.
//! * **`free`**: first free address (1-based, in double-precision words).
//! * **`internal_filename`**: kernel name (60 bytes, padded).
//! * **`locfmt`**: binary format of the numbers stored in the file.
//! * **`fptstr`**: FTP validation string.
//!
//! Only little-endian kernels (`"LTL-IEEE"`) are read. This is the format of
//! every planetary kernel distributed by NAIF since 2008.
use std::fmt;

use log::warn;
use nom::{bytes::complete::take, number::complete::le_i32, IResult};

use crate::eclipsis_errors::EclipsisError;

/// Size in bytes of a DAF physical record.
pub const DAF_RECORD_BYTES: usize = 1024;

#[derive(Debug, PartialEq, Clone)]
pub struct DAFHeader {
    pub idword: String,
    pub internal_filename: String,
    pub nd: i32,
    pub ni: i32,
    pub fward: i32,
    pub bward: i32,
    pub free: i32,
    pub locfmt: String,
    pub fptstr: String,
}

impl DAFHeader {
    /// Parse the raw file record with nom.
    ///
    /// Arguments
    /// -----------------
    /// * `input`: the first bytes of the file (at least 727).
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, id_word) = take(8usize)(input)?;
        let (input, nd) = le_i32(input)?;
        let (input, ni) = le_i32(input)?;
        let (input, ifname) = take(60usize)(input)?;
        let (input, fward) = le_i32(input)?;
        let (input, bward) = le_i32(input)?;
        let (input, free) = le_i32(input)?;
        let (input, locfmt) = take(8usize)(input)?;
        let (input, _) = take(603usize)(input)?; // reserved
        let (input, ftpstr) = take(28usize)(input)?;

        let text = |bytes: &[u8]| {
            String::from_utf8_lossy(bytes)
                .trim_matches(|c: char| c.is_whitespace() || c == '\0')
                .to_string()
        };

        Ok((
            input,
            DAFHeader {
                idword: text(id_word),
                internal_filename: text(ifname),
                nd,
                ni,
                fward,
                bward,
                free,
                locfmt: text(locfmt),
                fptstr: text(ftpstr),
            },
        ))
    }

    /// Parse the file record and check that it describes a little-endian SPK kernel.
    ///
    /// Return
    /// ----------
    /// * The header, or [`EclipsisError::UnsupportedDafFormat`] when the file is not
    ///   an SPK kernel, has a foreign byte order, or a summary layout other than
    ///   `nd = 2`, `ni = 6`.
    pub fn parse_spk(input: &[u8]) -> Result<Self, EclipsisError> {
        let (_, header) = DAFHeader::parse(input)?;

        if !header.idword.starts_with("DAF/SPK") && !header.idword.starts_with("NAIF/DAF") {
            return Err(EclipsisError::UnsupportedDafFormat(format!(
                "unexpected ID word {:?}",
                header.idword
            )));
        }

        match header.locfmt.as_str() {
            "LTL-IEEE" => {}
            // Pre-N0052 kernels leave the field empty
            "" => warn!(
                "DAF file '{}' does not declare its binary format, assuming LTL-IEEE",
                header.internal_filename
            ),
            other => {
                return Err(EclipsisError::UnsupportedDafFormat(format!(
                    "binary format {other} is not supported, only LTL-IEEE"
                )))
            }
        }

        if header.nd != 2 || header.ni != 6 {
            return Err(EclipsisError::UnsupportedDafFormat(format!(
                "summary layout ND={}, NI={} is not an SPK layout",
                header.nd, header.ni
            )));
        }

        if header.fward < 2 {
            return Err(EclipsisError::UnsupportedDafFormat(format!(
                "invalid first summary record {}",
                header.fward
            )));
        }

        Ok(header)
    }

    /// Size of one array summary, in double-precision words: `ND + ceil(NI / 2)`.
    pub fn summary_words(&self) -> usize {
        self.nd as usize + (self.ni as usize).div_ceil(2)
    }
}

impl fmt::Display for DAFHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABEL_WIDTH: usize = 18;
        const VALUE_WIDTH: usize = 50;

        let border = format!(
            "+{:-<label$}+{:-<value$}+",
            "",
            "",
            label = LABEL_WIDTH + 1,
            value = VALUE_WIDTH + 1
        );

        let rows = [
            ("DAF File Header", String::new()),
            ("ID Word", self.idword.clone()),
            ("Internal Name", self.internal_filename.clone()),
            ("ND / NI", format!("{} doubles, {} integers", self.nd, self.ni)),
            (
                "Summary records",
                format!("first #{}, last #{}", self.fward, self.bward),
            ),
            ("Free Addr", self.free.to_string()),
            ("Binary Format", self.locfmt.clone()),
        ];

        writeln!(f, "{border}")?;
        for (i, (label, value)) in rows.iter().enumerate() {
            writeln!(
                f,
                "| {:<label$}| {:<value$}|",
                label,
                value,
                label = LABEL_WIDTH,
                value = VALUE_WIDTH
            )?;
            if i == 0 {
                writeln!(f, "{border}")?;
            }
        }
        writeln!(f, "{border}")
    }
}
