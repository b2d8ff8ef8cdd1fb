//! Append-only event storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

/// An event as kept by a repository: metadata plus the JSON payload.
#[derive(Debug, Clone)]
pub struct StoredEvent {
    /// Event id.
    pub event_id: Uuid,
    /// Stream the event belongs to.
    pub aggregate_id: Uuid,
    /// Discriminator used to decode `payload`.
    pub event_type: String,
    /// Serialized event body.
    pub payload: serde_json::Value,
    /// Position in the stream, starting at 1.
    pub sequence_number: i64,
    /// Request that led to the event.
    pub correlation_id: Uuid,
    /// Direct cause of the event.
    pub causation_id: Uuid,
    /// When the event was recorded.
    pub occurred_at: DateTime<Utc>,
}

/// Per-aggregate event streams with optimistic concurrency.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Every event in the stream, in sequence order. An unknown stream is
    /// empty, not an error.
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError>;

    /// Appends `events` after `expected_version`, the sequence number the
    /// writer last saw.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ConcurrencyConflict` if the stream has moved past
    /// `expected_version`, and `DomainError::Infrastructure` if storage fails.
    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError>;
}
