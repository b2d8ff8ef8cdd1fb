//! The client state synchronizer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use satchel_inventory::domain::actions::ActionRequest;
use satchel_inventory::domain::model::Inventory;
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::SyncError;
use crate::transport::InventoryTransport;

/// Clears the in-flight flag when the action completes or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One session's cached view of the authoritative inventory.
///
/// The cache only ever holds a snapshot the server sent. Observers subscribe
/// to a `watch` channel and see every replacement.
pub struct Synchronizer {
    transport: Arc<dyn InventoryTransport>,
    session_id: Uuid,
    cache: watch::Sender<Option<Inventory>>,
    in_flight: AtomicBool,
}

impl Synchronizer {
    /// Creates a synchronizer with an empty cache.
    #[must_use]
    pub fn new(transport: Arc<dyn InventoryTransport>, session_id: Uuid) -> Self {
        let (cache, _) = watch::channel(None);
        Self {
            transport,
            session_id,
            cache,
            in_flight: AtomicBool::new(false),
        }
    }

    /// The session this synchronizer serves.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The last authoritative snapshot, if one has been received.
    #[must_use]
    pub fn snapshot(&self) -> Option<Inventory> {
        self.cache.borrow().clone()
    }

    /// Subscribes to cache replacements.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Inventory>> {
        self.cache.subscribe()
    }

    /// Returns `true` while an action is awaiting its response.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn replace(&self, inventory: Inventory) {
        self.cache.send_replace(Some(inventory));
    }

    /// Fetches the current snapshot and replaces the cache with it.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Transport` if the fetch fails; the cache is left
    /// untouched.
    pub async fn refresh(&self) -> Result<Inventory, SyncError> {
        let inventory = self.transport.fetch_snapshot(self.session_id).await?;
        self.replace(inventory.clone());
        debug!(session_id = %self.session_id, "Inventory refreshed");
        Ok(inventory)
    }

    /// Sends one action and, on success, replaces the cache with the new
    /// snapshot.
    ///
    /// Returns the server's message.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Busy` if another action is in flight,
    /// `SyncError::Rejected` with the server's failure if the action was
    /// refused, and `SyncError::Transport` if the request did not complete.
    /// The cache is unchanged in every error case.
    pub async fn send_action(&self, request: &ActionRequest) -> Result<String, SyncError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SyncError::Busy);
        }
        let _in_flight = InFlight(&self.in_flight);

        let response = self.transport.send_action(self.session_id, request).await?;
        match response.into_result() {
            Ok((inventory, message)) => {
                self.replace(inventory);
                Ok(message)
            }
            Err(failure) => {
                info!(
                    session_id = %self.session_id,
                    kind = %failure.kind,
                    "Action refused by server: {}",
                    failure.message
                );
                Err(failure.into())
            }
        }
    }
}
