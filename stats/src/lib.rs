//! Derivation of per-player statistics from the point-event log.
//!
//! The aggregator is deliberately stateless: [`apply_event`] encodes the
//! per-event update rules once, and both the live incremental path (the
//! state machine calls it after each resolved point) and the batch
//! [`recompute`] fold the same function over events. Recomputing a stored
//! log therefore reproduces the incrementally maintained table exactly.

pub mod aggregate;
pub mod table;

pub use aggregate::{apply_event, by_profile, recompute};
pub use table::{PlayerStats, StatsTable};
