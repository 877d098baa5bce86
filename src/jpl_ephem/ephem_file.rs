//! Selection and resolution of the SPK kernel used by a run.
//!
//! A source is written either as a NAIF version (`"naif:DE421"`), looked up in
//! the user cache directory, or as an explicit path (`"file:/data/de421.bsp"`
//! or a bare path). Kernels are never downloaded: a version missing from the
//! cache is reported together with the location where it is expected.
use std::{fmt, str::FromStr};

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;

use crate::eclipsis_errors::EclipsisError;

use super::naif::naif_version::NaifVersion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EphemFileSource {
    Naif(NaifVersion),
    File(Utf8PathBuf),
}

impl EphemFileSource {
    /// Directory holding cached kernels: `<cache dir>/eclipsis_cache/jpl_ephem`.
    pub fn cache_dir() -> Result<Utf8PathBuf, EclipsisError> {
        let base_dir = BaseDirs::new().ok_or_else(|| {
            EclipsisError::Utf8PathError("cannot determine the user cache directory".into())
        })?;
        let cache = Utf8Path::from_path(base_dir.cache_dir()).ok_or_else(|| {
            EclipsisError::Utf8PathError(format!(
                "cache directory {} is not valid UTF-8",
                base_dir.cache_dir().display()
            ))
        })?;
        Ok(cache.join("eclipsis_cache").join("jpl_ephem"))
    }

    /// Path where the kernel of this source is expected, whether it exists or not.
    pub fn expected_path(&self) -> Result<Utf8PathBuf, EclipsisError> {
        match self {
            EphemFileSource::Naif(version) => {
                Ok(Self::cache_dir()?.join(version.get_filename()))
            }
            EphemFileSource::File(path) => Ok(path.clone()),
        }
    }

    /// Locate the kernel on disk.
    ///
    /// Return
    /// ----------
    /// * The existing file path, or [`EclipsisError::JPLFileNotFound`].
    pub fn resolve(&self) -> Result<Utf8PathBuf, EclipsisError> {
        let path = self.expected_path()?;
        if path.is_file() {
            Ok(path)
        } else {
            Err(EclipsisError::JPLFileNotFound(path.to_string()))
        }
    }
}

impl TryFrom<&str> for EphemFileSource {
    type Error = EclipsisError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.is_empty() {
            return Err(EclipsisError::InvalidJPLEphemFileSource(
                "empty ephemeris source".into(),
            ));
        }

        match value.split_once(':') {
            Some((scheme, version)) if scheme.eq_ignore_ascii_case("naif") => {
                Ok(EphemFileSource::Naif(version.parse()?))
            }
            Some((scheme, path)) if scheme.eq_ignore_ascii_case("file") => {
                if path.is_empty() {
                    return Err(EclipsisError::InvalidJPLEphemFileSource(value.into()));
                }
                Ok(EphemFileSource::File(Utf8PathBuf::from(path)))
            }
            Some((scheme, _)) if scheme.eq_ignore_ascii_case("horizon") => Err(
                EclipsisError::InvalidJPLEphemFileSource(format!(
                    "{value}: only NAIF SPK kernels are supported"
                )),
            ),
            _ => Ok(EphemFileSource::File(Utf8PathBuf::from(value))),
        }
    }
}

impl FromStr for EphemFileSource {
    type Err = EclipsisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EphemFileSource::try_from(s)
    }
}

impl fmt::Display for EphemFileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EphemFileSource::Naif(version) => write!(f, "naif:{version}"),
            EphemFileSource::File(path) => write!(f, "file:{path}"),
        }
    }
}
