//! Ephemeral ground store.
//!
//! Items dropped by a character lie at the location they were dropped, for a
//! limited time. Expired entries are pruned lazily, across every location,
//! whenever the store is touched; nothing here is persisted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use satchel_core::clock::Clock;
use serde::Serialize;
use tracing::debug;

use super::failure::{Failure, FailureKind};
use super::location::Location;

/// Units of one item lying on the ground.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroundItem {
    /// Item identifier.
    pub item_id: String,
    /// Units lying here.
    pub quantity: u32,
    /// When the units were dropped; drives expiry.
    pub dropped_at: DateTime<Utc>,
}

/// Location-keyed list of dropped items with a time-to-live.
pub struct GroundStore {
    entries: Mutex<HashMap<Location, Vec<GroundItem>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl GroundStore {
    /// One in-game day.
    #[must_use]
    pub fn default_ttl() -> Duration {
        Duration::days(1)
    }

    /// Creates an empty store whose entries expire after `ttl`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Locks the map and prunes expired entries everywhere.
    ///
    /// Locations left without entries are dropped from the map.
    fn locked(&self) -> MutexGuard<'_, HashMap<Location, Vec<GroundItem>>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let cutoff = self.clock.now() - self.ttl;
        let mut expired = 0;
        entries.retain(|_, items| {
            let before = items.len();
            items.retain(|item| item.dropped_at > cutoff);
            expired += before - items.len();
            !items.is_empty()
        });
        if expired > 0 {
            debug!(expired, "Pruned ground items");
        }
        entries
    }

    /// Appends dropped units at `location`.
    pub fn drop_item(&self, location: &Location, item_id: &str, quantity: u32) {
        let dropped_at = self.clock.now();
        let mut entries = self.locked();
        entries.entry(location.clone()).or_default().push(GroundItem {
            item_id: item_id.to_owned(),
            quantity,
            dropped_at,
        });
        debug!(%location, item_id, quantity, "Item dropped on the ground");
    }

    /// Items currently lying at `location`, oldest first.
    #[must_use]
    pub fn items_at(&self, location: &Location) -> Vec<GroundItem> {
        self.locked().get(location).cloned().unwrap_or_default()
    }

    /// Removes `quantity` units of `item_id` from `location`.
    ///
    /// Units come out of matching entries oldest first until the request is
    /// met. Each returned part keeps the drop time of the entry it came from,
    /// so [`restore`](Self::restore) can put them back as they were.
    ///
    /// # Errors
    ///
    /// `QuantityOutOfRange` for a zero quantity or when fewer units lie here
    /// in total; `ItemNotFound` when nothing of `item_id` lies here. Nothing
    /// is removed on error.
    pub fn take(
        &self,
        location: &Location,
        item_id: &str,
        quantity: u32,
    ) -> Result<Vec<GroundItem>, Failure> {
        if quantity == 0 {
            return Err(Failure::new(
                FailureKind::QuantityOutOfRange,
                "pick up at least one unit",
            ));
        }
        let mut entries = self.locked();
        let items = entries
            .get_mut(location)
            .filter(|items| items.iter().any(|i| i.item_id == item_id))
            .ok_or_else(|| {
                Failure::new(
                    FailureKind::ItemNotFound,
                    format!("no {item_id} on the ground at {location}"),
                )
            })?;
        let available: u64 = items
            .iter()
            .filter(|i| i.item_id == item_id)
            .map(|i| u64::from(i.quantity))
            .sum();
        if available < u64::from(quantity) {
            return Err(Failure::new(
                FailureKind::QuantityOutOfRange,
                format!("only {available} {item_id} on the ground at {location}"),
            ));
        }

        let mut remaining = quantity;
        let mut taken = Vec::new();
        for item in items.iter_mut().filter(|i| i.item_id == item_id) {
            if remaining == 0 {
                break;
            }
            let units = item.quantity.min(remaining);
            item.quantity -= units;
            remaining -= units;
            taken.push(GroundItem {
                quantity: units,
                ..item.clone()
            });
        }
        items.retain(|i| i.quantity > 0);
        if items.is_empty() {
            entries.remove(location);
        }
        Ok(taken)
    }

    /// Puts back the parts returned by a failed pick-up, with their drop
    /// times; the location stays ordered oldest first.
    pub fn restore(&self, location: &Location, taken: Vec<GroundItem>) {
        let mut entries = self.locked();
        let items = entries.entry(location.clone()).or_default();
        items.extend(taken);
        items.sort_by_key(|item| item.dropped_at);
    }
}
