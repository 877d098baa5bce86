//! JPL planetary ephemerides read from NAIF SPK kernels.
pub mod ephem_file;
pub mod naif;

pub use ephem_file::EphemFileSource;
pub use naif::{naif_data::NaifData, naif_ids::NaifId};
