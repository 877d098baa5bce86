use std::{convert::TryFrom, fmt};

use crate::eclipsis_errors::EclipsisError;

/// SPK segment data types, as stored in the fourth integer of a segment summary.
///
/// Only [`SpkDataType::ChebyshevPosition`] is interpolated. The other codes are
/// recognised so that a kernel mixing types can still be listed and its
/// unsupported segments reported by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SpkDataType {
    ModifiedDifferenceArray = 1,
    ChebyshevPosition = 2,
    ChebyshevPositionVelocity = 3,
    TwoBodyDiscreteStates = 5,
    EquallySpacedLagrange = 8,
    UnequallySpacedLagrange = 9,
    TwoLineElements = 10,
    HermiteUniform = 12,
    HermiteNonUniform = 13,
    ChebyshevNonUniform = 14,
    PrecessingConic = 15,
    EquinoctialElements = 17,
    ESAHermiteLagrange = 18,
    ESAPiecewiseInterpolation = 19,
    ChebyshevVelocity = 20,
    ExtendedModifiedDifferenceArray = 21,
}

impl SpkDataType {
    pub fn from_i32(value: i32) -> Result<Self, EclipsisError> {
        SpkDataType::try_from(value)
    }

    /// `true` when segments of this type can be interpolated by this crate.
    pub fn is_supported(self) -> bool {
        self == SpkDataType::ChebyshevPosition
    }
}

impl TryFrom<i32> for SpkDataType {
    type Error = EclipsisError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        use SpkDataType::*;
        let data_type = match value {
            1 => ModifiedDifferenceArray,
            2 => ChebyshevPosition,
            3 => ChebyshevPositionVelocity,
            5 => TwoBodyDiscreteStates,
            8 => EquallySpacedLagrange,
            9 => UnequallySpacedLagrange,
            10 => TwoLineElements,
            12 => HermiteUniform,
            13 => HermiteNonUniform,
            14 => ChebyshevNonUniform,
            15 => PrecessingConic,
            17 => EquinoctialElements,
            18 => ESAHermiteLagrange,
            19 => ESAPiecewiseInterpolation,
            20 => ChebyshevVelocity,
            21 => ExtendedModifiedDifferenceArray,
            _ => return Err(EclipsisError::InvalidSpkDataType(value)),
        };
        Ok(data_type)
    }
}

impl fmt::Display for SpkDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpkDataType::ModifiedDifferenceArray => "Modified Difference Array",
            SpkDataType::ChebyshevPosition => "Chebyshev Position Only",
            SpkDataType::ChebyshevPositionVelocity => "Chebyshev Position Velocity",
            SpkDataType::TwoBodyDiscreteStates => "Two Body Discrete States",
            SpkDataType::EquallySpacedLagrange => "Equally Spaced Lagrange",
            SpkDataType::UnequallySpacedLagrange => "Unequally Spaced Lagrange",
            SpkDataType::TwoLineElements => "Two Line Elements",
            SpkDataType::HermiteUniform => "Hermite Uniform",
            SpkDataType::HermiteNonUniform => "Hermite Non Uniform",
            SpkDataType::ChebyshevNonUniform => "Chebyshev Non Uniform",
            SpkDataType::PrecessingConic => "Precessing Conic",
            SpkDataType::EquinoctialElements => "Equinoctial Elements",
            SpkDataType::ESAHermiteLagrange => "ESA Hermite Lagrange",
            SpkDataType::ESAPiecewiseInterpolation => "ESA Piecewise Interpolation",
            SpkDataType::ChebyshevVelocity => "Chebyshev Velocity Only",
            SpkDataType::ExtendedModifiedDifferenceArray => "Extended Modified Difference Array",
        };
        write!(f, "{s}")
    }
}
