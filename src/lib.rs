pub mod config;
pub mod engine;
pub mod limits;
pub mod model;
pub mod submission;
pub mod wal;
