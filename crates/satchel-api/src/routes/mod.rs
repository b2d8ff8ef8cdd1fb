//! Route modules organized by bounded context.

pub mod content;
pub mod ground;
pub mod health;
pub mod inventory;
pub mod session;
