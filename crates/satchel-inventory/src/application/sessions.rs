//! Active play sessions.
//!
//! A session binds a request to a character and to that character's current
//! location. Actions, pick-ups and vault registration all address a session
//! rather than a character directly.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use satchel_core::clock::Clock;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::domain::failure::{Failure, FailureKind};
use crate::domain::location::Location;

/// An open session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Session identifier.
    pub session_id: Uuid,
    /// The character playing in this session.
    pub character_id: Uuid,
    /// Where the character currently is.
    pub location: Location,
    /// When the session was opened.
    pub opened_at: DateTime<Utc>,
}

/// In-memory registry of open sessions.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, Session>>,
}

fn no_session(session_id: Uuid) -> Failure {
    Failure::new(
        FailureKind::NoActiveSession,
        format!("no active session {session_id}"),
    )
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session for `character_id` at `location`.
    pub fn open(&self, character_id: Uuid, location: Location, clock: &dyn Clock) -> Session {
        let session = Session {
            session_id: Uuid::now_v7(),
            character_id,
            location,
            opened_at: clock.now(),
        };
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.session_id, session.clone());
        info!(
            session_id = %session.session_id,
            %character_id,
            location = %session.location,
            "Session opened"
        );
        session
    }

    /// Returns the open session `session_id`.
    ///
    /// # Errors
    ///
    /// Returns a `NoActiveSession` failure if the session is not open.
    pub fn get(&self, session_id: Uuid) -> Result<Session, Failure> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&session_id)
            .cloned()
            .ok_or_else(|| no_session(session_id))
    }

    /// Moves the session's character to `location`.
    ///
    /// # Errors
    ///
    /// Returns a `NoActiveSession` failure if the session is not open.
    pub fn relocate(&self, session_id: Uuid, location: Location) -> Result<Session, Failure> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| no_session(session_id))?;
        session.location = location;
        info!(%session_id, location = %session.location, "Session relocated");
        Ok(session.clone())
    }

    /// Closes the session.
    ///
    /// # Errors
    ///
    /// Returns a `NoActiveSession` failure if the session is not open.
    pub fn close(&self, session_id: Uuid) -> Result<Session, Failure> {
        let session = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&session_id)
            .ok_or_else(|| no_session(session_id))?;
        info!(%session_id, "Session closed");
        Ok(session)
    }
}
