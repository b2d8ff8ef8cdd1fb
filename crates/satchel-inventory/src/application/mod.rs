//! Application layer for the Inventory & Equipment context.

pub mod command_handlers;
pub mod locks;
pub mod query_handlers;
pub mod sessions;
