use thiserror::Error;

/// Broad classification of an [`EclipsisError`].
///
/// The batch driver uses it to decide how a failure is reported: every kind
/// is recorded against the observer that produced it, and only an ephemeris
/// that cannot be loaded stops a run before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-range input (coordinates, search window, time strings).
    InvalidInput,
    /// Ephemeris data missing, unreadable, or not covering a requested instant.
    UnavailableEphemeris,
    /// Numerical or runtime failure during an evaluation.
    Computation,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::UnavailableEphemeris => "unavailable ephemeris",
            ErrorKind::Computation => "computation failure",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug)]
pub enum EclipsisError {
    #[error("Invalid latitude: {0} (expected a finite value in [-90, 90] degrees)")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (expected a finite value in [-180, 180] degrees)")]
    InvalidLongitude(f64),

    #[error("Invalid elevation: {0} (expected a finite value in meters)")]
    InvalidElevation(f64),

    #[error("Invalid geographic point: {0}")]
    InvalidGeoPoint(String),

    #[error("The search window contains no time sample")]
    EmptySearchWindow,

    #[error("The search window is not strictly increasing at sample {0}")]
    NonIncreasingSearchWindow(usize),

    #[error("Invalid search window: {0}")]
    InvalidSearchWindow(String),

    #[error("Invalid time string: {0}")]
    InvalidTime(String),

    #[error("NaN encountered in an input value")]
    NanValue(#[from] ordered_float::FloatIsNan),

    #[error("Invalid JPL string format: {0}")]
    InvalidJPLStringFormat(String),

    #[error("Invalid JPL ephemeris file source: {0}")]
    InvalidJPLEphemFileSource(String),

    #[error("JPL File not found at: {0}")]
    JPLFileNotFound(String),

    #[error("UTF-8 Path error: {0}")]
    Utf8PathError(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Error during the nom parsing: {0}")]
    NomParsingError(String),

    #[error("Unsupported DAF file: {0}")]
    UnsupportedDafFormat(String),

    #[error("Invalid SPK data type: {0}")]
    InvalidSpkDataType(i32),

    #[error("Unsupported SPK data type {data_type} for target {target} (only Chebyshev position type 2 is read)")]
    UnsupportedSpkDataType { target: i32, data_type: i32 },

    #[error("No ephemeris segment for target {target} relative to center {center}")]
    MissingEphemerisSegment { target: i32, center: i32 },

    #[error("Ephemeris for target {target} relative to center {center} does not cover ET {et_seconds} s")]
    EphemerisOutOfRange {
        target: i32,
        center: i32,
        et_seconds: f64,
    },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Evaluation exceeded its time budget after {samples_done} samples ({elapsed_ms} ms)")]
    EvaluationTimedOut { samples_done: usize, elapsed_ms: u128 },
}

impl EclipsisError {
    /// Classify the error into the three families reported to users.
    pub fn kind(&self) -> ErrorKind {
        use EclipsisError::*;
        match self {
            InvalidLatitude(_)
            | InvalidLongitude(_)
            | InvalidElevation(_)
            | InvalidGeoPoint(_)
            | EmptySearchWindow
            | NonIncreasingSearchWindow(_)
            | InvalidSearchWindow(_)
            | InvalidTime(_)
            | NanValue(_) => ErrorKind::InvalidInput,

            InvalidJPLStringFormat(_)
            | InvalidJPLEphemFileSource(_)
            | JPLFileNotFound(_)
            | Utf8PathError(_)
            | IoError(_)
            | NomParsingError(_)
            | UnsupportedDafFormat(_)
            | InvalidSpkDataType(_)
            | UnsupportedSpkDataType { .. }
            | MissingEphemerisSegment { .. }
            | EphemerisOutOfRange { .. } => ErrorKind::UnavailableEphemeris,

            DegenerateGeometry(_) | EvaluationTimedOut { .. } => ErrorKind::Computation,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }

    pub fn is_unavailable_ephemeris(&self) -> bool {
        self.kind() == ErrorKind::UnavailableEphemeris
    }
}

impl<E: std::fmt::Debug> From<nom::Err<E>> for EclipsisError {
    fn from(err: nom::Err<E>) -> Self {
        EclipsisError::NomParsingError(format!("{err:?}"))
    }
}

impl PartialEq for EclipsisError {
    fn eq(&self, other: &Self) -> bool {
        use EclipsisError::*;
        match (self, other) {
            (InvalidLatitude(a), InvalidLatitude(b)) => a == b,
            (InvalidLongitude(a), InvalidLongitude(b)) => a == b,
            (InvalidElevation(a), InvalidElevation(b)) => a == b,
            (InvalidGeoPoint(a), InvalidGeoPoint(b)) => a == b,
            (NonIncreasingSearchWindow(a), NonIncreasingSearchWindow(b)) => a == b,
            (InvalidSearchWindow(a), InvalidSearchWindow(b)) => a == b,
            (InvalidTime(a), InvalidTime(b)) => a == b,
            (InvalidJPLStringFormat(a), InvalidJPLStringFormat(b)) => a == b,
            (InvalidJPLEphemFileSource(a), InvalidJPLEphemFileSource(b)) => a == b,
            (JPLFileNotFound(a), JPLFileNotFound(b)) => a == b,
            (Utf8PathError(a), Utf8PathError(b)) => a == b,
            (NomParsingError(a), NomParsingError(b)) => a == b,
            (UnsupportedDafFormat(a), UnsupportedDafFormat(b)) => a == b,
            (InvalidSpkDataType(a), InvalidSpkDataType(b)) => a == b,
            (DegenerateGeometry(a), DegenerateGeometry(b)) => a == b,
            (
                UnsupportedSpkDataType {
                    target: t1,
                    data_type: d1,
                },
                UnsupportedSpkDataType {
                    target: t2,
                    data_type: d2,
                },
            ) => t1 == t2 && d1 == d2,
            (
                MissingEphemerisSegment {
                    target: t1,
                    center: c1,
                },
                MissingEphemerisSegment {
                    target: t2,
                    center: c2,
                },
            ) => t1 == t2 && c1 == c2,
            (
                EphemerisOutOfRange {
                    target: t1,
                    center: c1,
                    et_seconds: e1,
                },
                EphemerisOutOfRange {
                    target: t2,
                    center: c2,
                    et_seconds: e2,
                },
            ) => t1 == t2 && c1 == c2 && e1 == e2,

            // Not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,
            (NanValue(_), NanValue(_)) => true,
            (EvaluationTimedOut { .. }, EvaluationTimedOut { .. }) => true,

            (EmptySearchWindow, EmptySearchWindow) => true,

            _ => false,
        }
    }
}
