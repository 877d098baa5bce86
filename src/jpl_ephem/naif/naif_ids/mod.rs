//! NAIF integer codes of the bodies involved in a solar eclipse.
pub mod naif_type;

use std::fmt;

/// NAIF body identifier.
///
/// Only the bodies of the Sun → Earth → Moon chain have named variants; any
/// other code read from a kernel is kept as [`NaifId::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaifId {
    SolarSystemBarycenter,
    EarthMoonBarycenter,
    Sun,
    Earth,
    Moon,
    Other(i32),
}

impl NaifId {
    pub fn from_id(id: i32) -> Self {
        match id {
            0 => NaifId::SolarSystemBarycenter,
            3 => NaifId::EarthMoonBarycenter,
            10 => NaifId::Sun,
            399 => NaifId::Earth,
            301 => NaifId::Moon,
            other => NaifId::Other(other),
        }
    }

    pub fn to_id(self) -> i32 {
        match self {
            NaifId::SolarSystemBarycenter => 0,
            NaifId::EarthMoonBarycenter => 3,
            NaifId::Sun => 10,
            NaifId::Earth => 399,
            NaifId::Moon => 301,
            NaifId::Other(id) => id,
        }
    }
}

impl From<NaifId> for i32 {
    fn from(naif_id: NaifId) -> Self {
        naif_id.to_id()
    }
}

impl From<i32> for NaifId {
    fn from(id: i32) -> Self {
        NaifId::from_id(id)
    }
}

impl fmt::Display for NaifId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NaifId::SolarSystemBarycenter => write!(f, "Solar System Barycenter"),
            NaifId::EarthMoonBarycenter => write!(f, "Earth-Moon Barycenter"),
            NaifId::Sun => write!(f, "Sun"),
            NaifId::Earth => write!(f, "Earth"),
            NaifId::Moon => write!(f, "Moon"),
            NaifId::Other(id) => write!(f, "NAIF {id}"),
        }
    }
}

#[cfg(test)]
mod test_naif_ids {
    use super::*;

    #[test]
    fn test_round_trip_known_ids() {
        for id in [0, 3, 10, 399, 301] {
            assert_eq!(NaifId::from_id(id).to_id(), id);
        }
        assert_eq!(NaifId::from_id(301), NaifId::Moon);
        assert_eq!(NaifId::from_id(599), NaifId::Other(599));
        assert_eq!(i32::from(NaifId::Earth), 399);
    }

    #[test]
    fn test_display() {
        assert_eq!(NaifId::EarthMoonBarycenter.to_string(), "Earth-Moon Barycenter");
        assert_eq!(NaifId::Other(499).to_string(), "NAIF 499");
    }
}
