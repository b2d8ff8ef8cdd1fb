//! Errors raised by the event-sourcing machinery.

use thiserror::Error;
use uuid::Uuid;

/// Failure of a stream operation, as opposed to an inventory rule rejection.
///
/// Rule rejections travel as typed failures owned by the inventory context;
/// these are about streams that are missing or already exist, writers that
/// raced, requests that make no sense for the aggregate, and storage.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No event stream exists for this id.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// A create-once stream already has history.
    #[error("aggregate already exists: {0}")]
    AggregateAlreadyExists(Uuid),

    /// Another writer appended first.
    #[error(
        "concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        /// Stream that moved on.
        aggregate_id: Uuid,
        /// Version the writer loaded.
        expected: i64,
        /// Version found at append time.
        actual: i64,
    },

    /// The request is not meaningful for the aggregate's current state.
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage or payload decoding failed.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
