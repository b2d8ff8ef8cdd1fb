//! Satchel Static Content context.
//!
//! Responsible for loading the item catalog and class starting gear from
//! YAML, validating cross-references, and versioning the loaded content by
//! hash.

pub mod application;
pub mod domain;
pub mod error;
