//! Planetary ephemeris versions distributed by NAIF as SPK kernels.
//!
//! ```rust
//! use eclipsis::jpl_ephem::naif::naif_version::NaifVersion;
//!
//! let v: NaifVersion = "DE421".parse().unwrap();
//! assert_eq!(v.get_filename(), "de421.bsp");
//! ```
use std::{fmt, str::FromStr};

use crate::eclipsis_errors::EclipsisError;

/// Ephemeris version identifiers.
///
/// Parsing is case insensitive: `"DE421"`, `"de421"` and `"De421"` are the
/// same version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaifVersion {
    DE405,
    DE421,
    DE430,
    DE432s,
    DE435,
    DE438,
    DE440,
    DE440s,
    DE442,
}

impl NaifVersion {
    /// Canonical BSP filename of this version, e.g. `"de421.bsp"`.
    pub fn get_filename(&self) -> &'static str {
        match self {
            NaifVersion::DE405 => "de405.bsp",
            NaifVersion::DE421 => "de421.bsp",
            NaifVersion::DE430 => "de430.bsp",
            NaifVersion::DE432s => "de432s.bsp",
            NaifVersion::DE435 => "de435.bsp",
            NaifVersion::DE438 => "de438.bsp",
            NaifVersion::DE440 => "de440.bsp",
            NaifVersion::DE440s => "de440s.bsp",
            NaifVersion::DE442 => "de442.bsp",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            NaifVersion::DE405 => "DE405",
            NaifVersion::DE421 => "DE421",
            NaifVersion::DE430 => "DE430",
            NaifVersion::DE432s => "DE432s",
            NaifVersion::DE435 => "DE435",
            NaifVersion::DE438 => "DE438",
            NaifVersion::DE440 => "DE440",
            NaifVersion::DE440s => "DE440s",
            NaifVersion::DE442 => "DE442",
        }
    }
}

impl FromStr for NaifVersion {
    type Err = EclipsisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let version = match s.trim().to_ascii_uppercase().as_str() {
            "DE405" => NaifVersion::DE405,
            "DE421" => NaifVersion::DE421,
            "DE430" => NaifVersion::DE430,
            "DE432S" => NaifVersion::DE432s,
            "DE435" => NaifVersion::DE435,
            "DE438" => NaifVersion::DE438,
            "DE440" => NaifVersion::DE440,
            "DE440S" => NaifVersion::DE440s,
            "DE442" => NaifVersion::DE442,
            _ => return Err(EclipsisError::InvalidJPLStringFormat(format!(
                "unknown NAIF ephemeris version '{s}'"
            ))),
        };
        Ok(version)
    }
}

impl fmt::Display for NaifVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod test_naif_version {
    use super::*;

    #[test]
    fn test_parse_version() {
        assert_eq!("DE421".parse::<NaifVersion>().unwrap(), NaifVersion::DE421);
        assert_eq!("de440s".parse::<NaifVersion>().unwrap(), NaifVersion::DE440s);
        assert_eq!(NaifVersion::DE440s.get_filename(), "de440s.bsp");
        assert_eq!(NaifVersion::DE432s.to_string(), "DE432s");
        assert!(matches!(
            "DE999".parse::<NaifVersion>(),
            Err(EclipsisError::InvalidJPLStringFormat(_))
        ));
    }
}
