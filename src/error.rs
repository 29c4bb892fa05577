//! Typed errors for the stateful edges of the crate.
//!
//! The placement engine itself never fails: conflicts and infeasible drops are
//! reported as data. Errors only arise when a trip timeline is constructed
//! with broken invariants or when the block repository is misused.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Rejected [`TripTimeline`](crate::timeline::TripTimeline) construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineError {
    #[error("pixels-per-hour scale must be positive and finite, got {0}")]
    InvalidScale(f64),
    #[error("trip end {end} must be after trip start {start}")]
    EmptyRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// Failures of [`BlockStore`](crate::store::BlockStore) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("a block with id `{0}` already exists")]
    DuplicateId(String),
    #[error("no block with id `{0}`")]
    NotFound(String),
}
