//! Client-side error types.

use satchel_inventory::domain::failure::Failure;
use thiserror::Error;

/// A request that never produced an answer from the server.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, timeout or body decoding failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a status the client does not understand.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Other(String),
}

/// Why a synchronizer call did not update the cache.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Another action is still in flight.
    #[error("an action is already in flight")]
    Busy,

    /// The server rejected the action.
    #[error(transparent)]
    Rejected(#[from] Failure),

    /// The request did not complete.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
