pub mod punch;
pub mod punch_log;
pub mod summary;
