//! Domain layer for the Static Content context.

pub mod catalog;
pub mod starting_gear;
