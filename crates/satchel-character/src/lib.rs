//! Satchel Character Creation bounded context.
//!
//! Responsible for the starting-gear configuration a class offers, the
//! back-navigable equipment-choice wizard that resolves it into a grant list,
//! and the vitals ledger that consumable effects are applied to.

pub mod domain;
