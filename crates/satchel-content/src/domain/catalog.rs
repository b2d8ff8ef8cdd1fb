//! The static item catalog.

use std::collections::HashMap;

use satchel_core::catalog::{ItemCatalog, ItemDefinition};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::ContentError;

/// On-disk layout of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    items: Vec<ItemDefinition>,
}

/// Memory-resident item catalog keyed by item identifier.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: HashMap<String, ItemDefinition>,
    content_version: String,
}

impl StaticCatalog {
    /// Builds a catalog from definitions.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::DuplicateItem` if two definitions share an id
    /// and `ContentError::UnknownPackItem` if a pack lists an unknown item.
    pub fn from_definitions(definitions: Vec<ItemDefinition>) -> Result<Self, ContentError> {
        let mut items = HashMap::with_capacity(definitions.len());
        for definition in definitions {
            if items.contains_key(&definition.id) {
                return Err(ContentError::DuplicateItem(definition.id));
            }
            items.insert(definition.id.clone(), definition);
        }

        for pack in items.values().filter(|d| d.is_pack()) {
            if let Some(entry) = pack.contents.iter().find(|e| !items.contains_key(&e.item)) {
                return Err(ContentError::UnknownPackItem {
                    pack: pack.id.clone(),
                    item: entry.item.clone(),
                });
            }
        }

        let content_version = content_version(&items);
        Ok(Self {
            items,
            content_version,
        })
    }

    /// Parses a catalog from YAML of the form `items: [...]`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Parse` for malformed YAML, plus the errors of
    /// [`StaticCatalog::from_definitions`].
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ContentError> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::from_definitions(file.items)
    }

    /// Hex SHA-256 over the catalog's definitions in id order.
    #[must_use]
    pub fn content_version(&self) -> &str {
        &self.content_version
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the catalog holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemCatalog for StaticCatalog {
    fn get_item(&self, item_id: &str) -> Option<&ItemDefinition> {
        self.items.get(item_id)
    }
}

fn content_version(items: &HashMap<String, ItemDefinition>) -> String {
    let mut ids: Vec<&String> = items.keys().collect();
    ids.sort();

    let mut hasher = Sha256::new();
    for id in ids {
        // Serializing a derived Serialize type into a Vec cannot fail.
        if let Ok(bytes) = serde_json::to_vec(&items[id]) {
            hasher.update(&bytes);
        }
    }
    format!("{:x}", hasher.finalize())
}
