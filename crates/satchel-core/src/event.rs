//! Events recorded against an aggregate stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope fields shared by every recorded event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Identifies this event; time-ordered (UUIDv7).
    pub event_id: Uuid,
    /// Wire name of the event variant, e.g. `action_applied`.
    pub event_type: String,
    /// Stream the event is appended to. For inventories this is the character.
    pub aggregate_id: Uuid,
    /// Position in the stream, starting at 1.
    pub sequence_number: i64,
    /// Request that produced the event.
    pub correlation_id: Uuid,
    /// Direct cause; equal to `correlation_id` for events raised by a command.
    pub causation_id: Uuid,
    /// Clock reading when the event was raised.
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// Builds metadata for a freshly produced event whose cause is the command
    /// identified by `correlation_id`.
    #[must_use]
    pub fn for_command(
        event_type: &str,
        aggregate_id: Uuid,
        sequence_number: i64,
        correlation_id: Uuid,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            event_type: event_type.to_owned(),
            aggregate_id,
            sequence_number,
            correlation_id,
            causation_id: correlation_id,
            occurred_at,
        }
    }
}

/// An event that can be written to an [`EventRepository`](crate::repository::EventRepository).
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Wire name stored alongside the payload.
    fn event_type(&self) -> &'static str;

    /// JSON body stored in the stream.
    fn to_payload(&self) -> serde_json::Value;

    /// Envelope fields.
    fn metadata(&self) -> &EventMetadata;
}
