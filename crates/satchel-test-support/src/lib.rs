//! Shared test mocks and fixtures for the Satchel inventory engine.

mod catalog;
mod clock;
mod mutator;
mod repository;

pub use catalog::sample_catalog;
pub use clock::{FixedClock, ManualClock, fixed_now};
pub use mutator::{AppliedEffects, RecordingCharacterMutator};
pub use repository::{
    AppendCall, ConflictingEventRepository, EmptyEventRepository, FailingEventRepository,
    RecordingEventRepository,
};
