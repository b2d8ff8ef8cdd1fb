//! Application layer for the Static Content context.

pub mod loader;
pub mod query_handlers;
