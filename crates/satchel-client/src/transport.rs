//! The seam between the synchronizer and the server.

use async_trait::async_trait;
use satchel_inventory::domain::actions::{ActionRequest, ActionResponse};
use satchel_inventory::domain::model::Inventory;
use uuid::Uuid;

use crate::error::TransportError;

/// Carries requests for one session to the authoritative server.
///
/// A rejected action is a successful round trip: it comes back as an
/// [`ActionResponse`] with `success == false`, not as a `TransportError`.
#[async_trait]
pub trait InventoryTransport: Send + Sync {
    /// Fetches the current snapshot for the session's character.
    async fn fetch_snapshot(&self, session_id: Uuid) -> Result<Inventory, TransportError>;

    /// Submits one action request.
    async fn send_action(
        &self,
        session_id: Uuid,
        request: &ActionRequest,
    ) -> Result<ActionResponse, TransportError>;
}
