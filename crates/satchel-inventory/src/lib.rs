//! Satchel Inventory & Equipment bounded context.
//!
//! Owns the authoritative representation of a character's carried items and
//! the atomic operations that transform it: equip, unequip, move, stack,
//! split, drop and use, plus seeding from a grant list, picking items up from
//! the ground and registering a storage vault.

pub mod application;
pub mod domain;
