//! `reqwest` transport against the Satchel HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use satchel_inventory::domain::actions::{ActionRequest, ActionResponse};
use satchel_inventory::domain::model::Inventory;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::TransportError;
use crate::transport::InventoryTransport;

#[derive(Deserialize)]
struct InventoryBody {
    inventory: Inventory,
}

/// Talks to a running API server.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Creates a transport using an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    fn session_url(&self, session_id: Uuid) -> String {
        format!("{}/api/v1/inventory/sessions/{session_id}", self.base_url)
    }
}

#[async_trait]
impl InventoryTransport for HttpTransport {
    async fn fetch_snapshot(&self, session_id: Uuid) -> Result<Inventory, TransportError> {
        let resp = self.client.get(self.session_url(session_id)).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let body: InventoryBody = resp.json().await?;
        Ok(body.inventory)
    }

    async fn send_action(
        &self,
        session_id: Uuid,
        request: &ActionRequest,
    ) -> Result<ActionResponse, TransportError> {
        let url = format!("{}/actions", self.session_url(session_id));
        let resp = self.client.post(url).json(request).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        debug!(%session_id, status = status.as_u16(), "Action response received");

        // Rejections arrive as 4xx with an action response body.
        let parsed = (status.is_success() || status.is_client_error())
            .then(|| serde_json::from_str::<ActionResponse>(&body).ok())
            .flatten();
        if let Some(response) = parsed {
            return Ok(response);
        }
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
