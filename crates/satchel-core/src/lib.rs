//! Satchel Core: shared domain abstractions.
//!
//! This crate defines the traits and types that every bounded context
//! depends on: event-sourced aggregates, the event repository, the clock,
//! and the read-only collaborators (item catalog, character mutation) that
//! are injected into the inventory engine. It contains no infrastructure code.

pub mod aggregate;
pub mod catalog;
pub mod clock;
pub mod effects;
pub mod error;
pub mod event;
pub mod repository;
