//! Session Storage Trait
//!
//! Local persistence of the current session so it survives restarts.

use crate::domain::session::Session;
use crate::error::SessionResult;

pub trait SessionStorage: Send + Sync {
    /// Load the persisted session, if any
    fn load(&self) -> SessionResult<Option<Session>>;

    /// Persist a session, replacing any previous one
    fn save(&self, session: &Session) -> SessionResult<()>;

    /// Remove the persisted session; absent is not an error
    fn clear(&self) -> SessionResult<()>;
}
