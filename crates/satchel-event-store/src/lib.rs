//! Satchel event store.
//!
//! Event persistence for the inventory aggregates. Persistence to disk is
//! outside this workspace; the store keeps streams in memory for the lifetime
//! of the server process and enforces the same optimistic-concurrency
//! contract a durable store would.

pub mod memory_event_repository;
