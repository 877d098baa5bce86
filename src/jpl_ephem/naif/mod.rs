//! Reader for NAIF SPK kernels (DAF binary files, type 2 segments).
pub mod daf_header;
pub mod directory;
pub mod ephemeris_record;
pub mod jpl_ephem_header;
pub mod naif_data;
pub mod naif_ids;
pub mod naif_version;
pub mod summary_record;
