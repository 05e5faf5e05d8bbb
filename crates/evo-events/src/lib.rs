//! Shared record types and serialization for the evolutionary game.
//!
//! This crate contains pure data structures with no simulation logic.
//! The engine produces these records; report writers and external tooling
//! consume them.

pub mod round;
pub mod snapshot;
pub mod summary;

// Re-export round types
pub use round::{RoundRecord, StrategyCounts};

// Re-export snapshot types
pub use snapshot::{generate_snapshot_id, NodeStrategy, StrategySnapshot};

// Re-export summary types
pub use summary::{generate_run_id, RunParameters, RunSummary};
