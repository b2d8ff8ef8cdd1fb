//! Query handlers for the Static Content context.

use satchel_character::domain::starting_gear::ClassStartingGear;

use crate::domain::starting_gear::StartingGearTable;
use crate::error::ContentError;

/// Retrieves a class's starting gear for presentation by the wizard client.
///
/// # Errors
///
/// Returns `ContentError::UnknownClass` if the table has no such class.
pub fn get_starting_gear(
    table: &StartingGearTable,
    class: &str,
) -> Result<ClassStartingGear, ContentError> {
    let starting_gear = table
        .get(class)
        .cloned()
        .ok_or_else(|| ContentError::UnknownClass(class.to_owned()))?;
    Ok(ClassStartingGear {
        class: class.to_owned(),
        starting_gear,
    })
}
