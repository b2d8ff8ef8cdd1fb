//! Where a character is, and whether a vault can be reached from there.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A character's current position in the world.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// City or region identifier.
    pub city: String,
    /// Building within the city, when inside one.
    #[serde(default)]
    pub building: Option<String>,
}

impl Location {
    /// A location out in the open.
    #[must_use]
    pub fn outdoors(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            building: None,
        }
    }

    /// A location inside a building.
    #[must_use]
    pub fn inside(city: impl Into<String>, building: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            building: Some(building.into()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.building {
            Some(building) => write!(f, "{}/{building}", self.city),
            None => f.write_str(&self.city),
        }
    }
}

/// The building a vault is kept in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VaultLocation {
    /// City identifier.
    pub city: String,
    /// Building identifier.
    pub building: String,
}

/// Policy deciding whether a vault can be reached from a location.
pub trait VaultAccess: Send + Sync {
    /// Returns `true` if `vault` is reachable from `location`.
    fn can_reach(&self, vault: &VaultLocation, location: &Location) -> bool;
}

/// The default policy: the character must stand inside the vault's building.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoLocatedVaultAccess;

impl VaultAccess for CoLocatedVaultAccess {
    fn can_reach(&self, vault: &VaultLocation, location: &Location) -> bool {
        location.city == vault.city && location.building.as_deref() == Some(vault.building.as_str())
    }
}
