//! Shared value types for doubles match tracking
//!
//! This crate defines the seat/team identifiers and the immutable
//! point-event record that every other component operates on. Events are
//! append-only: once a point is resolved and logged, its record is never
//! mutated and serves as the sole source of truth for stats recomputation.

pub mod event;
pub mod types;

// Re-export commonly used items
pub use event::{describe_point, PointEvent, RallyRecord, ServeRecord};
pub use types::{Player, RallyOutcome, SeatId, ServeEnding, TeamId};
