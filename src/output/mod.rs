//! Output module for reporting on the talk store

pub mod stats;

pub use stats::{load_statistics, print_statistics, StoreStatistics};
