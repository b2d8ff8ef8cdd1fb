//! Domain layer for the Character Creation context.

pub mod grants;
pub mod starting_gear;
pub mod vitals;
pub mod wizard;
