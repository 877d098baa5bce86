//! Descriptive text found in the comment area of JPL planetary kernels.
//!
//! Kernels converted by JPL (`de421.bsp`, `de440.bsp`, ...) carry the original
//! ephemeris header in their DAF comment records:
//!
//! ```text
//! JPL planetary and lunar ephemeris DE440
//! Integrated 25 June 2020
//!
//! Time span covered by ephemeris:
//!
//! 31-DEC-1549 00:00 to   25-JAN-2650 00:00
//! JD   2287184.5   to   JD   2688976.5
//! ```
//!
//! The block is informative only. Kernels written by other tools have no such
//! text, and every field is therefore optional except the version line.
use std::fmt;

use nom::{
    bytes::complete::{tag, take_until},
    character::complete::{line_ending, multispace0, not_line_ending, space1},
    number::complete::double,
    IResult, Parser,
};

#[derive(Debug, PartialEq, Clone)]
pub struct JPLEphemHeader {
    pub version: String,
    pub creation_date: Option<String>,
    pub start_ephem: Option<String>,
    pub end_ephem: Option<String>,
    pub start_jd: Option<f64>,
    pub end_jd: Option<f64>,
}

impl JPLEphemHeader {
    fn parse_version(input: &str) -> IResult<&str, &str> {
        let (input, _) = take_until("JPL planetary and lunar ephemeris")(input)?;
        let (input, _) = tag("JPL planetary and lunar ephemeris ")(input)?;
        let (input, version) = not_line_ending(input)?;
        Ok((input, version.trim()))
    }

    fn parse_creation_date(input: &str) -> IResult<&str, &str> {
        let (input, _) = take_until("Integrated ")(input)?;
        let (input, _) = tag("Integrated ")(input)?;
        let (input, creation_date) = not_line_ending(input)?;
        Ok((input, creation_date.trim()))
    }

    fn parse_date_range(input: &str) -> IResult<&str, (&str, &str)> {
        let (input, _) = take_until("Time span covered by ephemeris:")(input)?;
        let (input, _) = tag("Time span covered by ephemeris:")(input)?;
        let (input, _) = multispace0(input)?;
        let (input, (start_ephem, _, end_ephem)) =
            (take_until(" to "), tag(" to "), not_line_ending).parse(input)?;
        Ok((input, (start_ephem.trim(), end_ephem.trim())))
    }

    fn parse_jd_range(input: &str) -> IResult<&str, (f64, f64)> {
        let (input, (_, _, _, start_jd, _, _, _, _, end_jd)) = (
            line_ending,
            tag("JD"),
            space1,
            |s| double(s),
            space1,
            tag("to"),
            space1,
            (tag("JD"), space1),
            |s| double(s),
        )
            .parse(input)?;
        Ok((input, (start_jd, end_jd)))
    }

    /// Extract the header fields from the comment area of a kernel.
    ///
    /// Arguments
    /// -----------------
    /// * `comment`: the comment records decoded as text, NUL bytes replaced by newlines.
    ///
    /// Return
    /// ----------
    /// * `None` when the text does not contain the JPL version line, otherwise
    ///   the header with whatever optional fields were found after it.
    pub fn from_comment(comment: &str) -> Option<Self> {
        let (rest, version) = Self::parse_version(comment).ok()?;

        let creation_date = Self::parse_creation_date(rest)
            .ok()
            .map(|(_, date)| date.to_string());

        let (dates, jd) = match Self::parse_date_range(rest) {
            Ok((after, (start, end))) => (
                Some((start.to_string(), end.to_string())),
                Self::parse_jd_range(after).ok().map(|(_, jd)| jd),
            ),
            Err(_) => (None, None),
        };
        let (start_ephem, end_ephem) = dates.unzip();
        let (start_jd, end_jd) = jd.unzip();

        Some(JPLEphemHeader {
            version: version.to_string(),
            creation_date,
            start_ephem,
            end_ephem,
            start_jd,
            end_jd,
        })
    }
}

impl fmt::Display for JPLEphemHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABEL_WIDTH: usize = 20;
        const VALUE_WIDTH: usize = 30;

        let border = format!(
            "+{:-<label$}+{:-<value$}+",
            "",
            "",
            label = LABEL_WIDTH + 2,
            value = VALUE_WIDTH + 2
        );
        let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

        let rows = [
            ("Version", self.version.clone()),
            ("Creation Date", or_dash(self.creation_date.clone())),
            ("Start Ephem", or_dash(self.start_ephem.clone())),
            ("End Ephem", or_dash(self.end_ephem.clone())),
            ("Start JD", or_dash(self.start_jd.map(|jd| format!("{jd:.6}")))),
            ("End JD", or_dash(self.end_jd.map(|jd| format!("{jd:.6}")))),
        ];

        writeln!(
            f,
            "+{:^label$}+{:^value$}+",
            "JPL Ephemeris Header",
            "",
            label = LABEL_WIDTH + 2,
            value = VALUE_WIDTH + 2
        )?;
        writeln!(f, "{border}")?;
        for (label, value) in rows {
            writeln!(f, "| {label:<LABEL_WIDTH$} | {value:<VALUE_WIDTH$} |")?;
        }
        writeln!(f, "{border}")
    }
}
