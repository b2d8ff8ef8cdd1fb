//! Loads content files from disk at startup.

use std::path::Path;

use satchel_core::catalog::ItemCatalog;
use tracing::info;

use crate::domain::catalog::StaticCatalog;
use crate::domain::starting_gear::StartingGearTable;
use crate::error::ContentError;

fn read(path: &Path) -> Result<String, ContentError> {
    std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Loads the item catalog from a YAML file.
///
/// # Errors
///
/// Returns `ContentError::Io` if the file cannot be read, or any error of
/// [`StaticCatalog::from_yaml_str`].
pub fn load_catalog(path: &Path) -> Result<StaticCatalog, ContentError> {
    let catalog = StaticCatalog::from_yaml_str(&read(path)?)?;
    info!(
        path = %path.display(),
        items = catalog.len(),
        content_version = catalog.content_version(),
        "item catalog loaded"
    );
    Ok(catalog)
}

/// Loads class starting gear from a YAML file and validates it against the
/// catalog.
///
/// # Errors
///
/// Returns `ContentError::Io` if the file cannot be read, any error of
/// [`StartingGearTable::from_yaml_str`], or `ContentError::UnknownGearItem`.
pub fn load_starting_gear(
    path: &Path,
    catalog: &dyn ItemCatalog,
) -> Result<StartingGearTable, ContentError> {
    let table = StartingGearTable::from_yaml_str(&read(path)?)?;
    table.validate_against(catalog)?;
    info!(
        path = %path.display(),
        classes = table.classes().count(),
        "starting gear loaded"
    );
    Ok(table)
}
