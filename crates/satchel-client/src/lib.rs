//! Satchel Client: keeps a client's view of an inventory in step with the
//! server.
//!
//! The client never decides whether an action is valid. It caches the last
//! authoritative snapshot, forwards action requests through a transport, and
//! replaces the cache wholesale with whatever the server answers.

pub mod error;
pub mod http;
pub mod synchronizer;
pub mod transport;

pub use error::{SyncError, TransportError};
pub use http::HttpTransport;
pub use synchronizer::Synchronizer;
pub use transport::InventoryTransport;
