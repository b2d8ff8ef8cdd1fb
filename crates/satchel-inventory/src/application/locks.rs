//! Per-character serialization of mutations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// One async lock per character.
///
/// Handlers hold the guard across load, apply and append, so two requests
/// for the same character never interleave. Different characters never
/// contend.
#[derive(Debug, Default)]
pub struct CharacterLocks {
    locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl CharacterLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for and takes the lock for `character_id`.
    pub async fn lock(&self, character_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(character_id)
            .or_default()
            .clone();
        lock.lock_owned().await
    }
}
