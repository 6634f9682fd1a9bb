//! Persistence boundary for the assembled dataset
//!
//! The pipeline hands over one complete store snapshot at the end of a run;
//! this module writes it out as five JSON record sets (one file per entity
//! kind) and prints the end-of-run summary. There is no incremental
//! flushing: a run's data is persisted wholesale or not at all.

mod json;
mod stats;

pub use json::write_snapshot;
pub use stats::print_summary;
