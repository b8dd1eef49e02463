pub mod filename;
pub mod tz;
