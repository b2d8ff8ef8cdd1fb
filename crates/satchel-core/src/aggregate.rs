//! Event-sourced aggregate roots.

use uuid::Uuid;

use crate::event::DomainEvent;

/// An aggregate rebuilt by replaying its event stream.
///
/// A character's inventory is one aggregate: every accepted mutation is an
/// event, and replaying the stream yields the current authoritative snapshot.
/// New events are buffered as uncommitted until the handler appends them.
pub trait AggregateRoot: Send + Sync {
    /// Events in this aggregate's stream.
    type Event: DomainEvent;

    /// Stream key.
    fn aggregate_id(&self) -> Uuid;

    /// Sequence number of the last persisted event; 0 for a new stream.
    fn version(&self) -> i64;

    /// Folds one persisted event into the state.
    fn apply(&mut self, event: &Self::Event);

    /// Events produced since the aggregate was loaded.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Drops the uncommitted buffer once it has been appended.
    fn clear_uncommitted_events(&mut self);

    /// Sequence number the next recorded event must carry.
    fn next_sequence_number(&self) -> i64 {
        let pending = i64::try_from(self.uncommitted_events().len()).unwrap_or(i64::MAX);
        self.version().saturating_add(pending).saturating_add(1)
    }
}
