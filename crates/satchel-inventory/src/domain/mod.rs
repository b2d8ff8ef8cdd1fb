//! Domain layer for the Inventory & Equipment context.

pub mod actions;
pub mod aggregates;
pub mod commands;
pub mod encumbrance;
pub mod events;
pub mod failure;
pub mod ground;
pub mod location;
pub mod model;
pub mod placement;
pub mod processor;
pub mod seeding;
