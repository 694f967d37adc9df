use crate::RouteSession;
use dashmap::DashMap;
use log::debug;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

/// Opaque per-conversation key, e.g. a chat id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl From<i64> for SessionId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// All sessions known to this process.
///
/// Sessions are created on first contact and live as long as the
/// store. Each one sits behind its own async mutex: holding it
/// serializes work on that conversation without blocking any other.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, Arc<Mutex<RouteSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `id`, creating it if this is the first
    /// time we've seen `id`.
    ///
    /// The map itself is only locked for the duration of this call;
    /// callers lock the returned session.
    pub fn session(&self, id: &SessionId) -> Arc<Mutex<RouteSession>> {
        if let Some(session) = self.sessions.get(id) {
            return Arc::clone(session.value());
        }
        let session = self.sessions.entry(id.clone()).or_insert_with(|| {
            debug!("new session {id}");
            Arc::default()
        });
        Arc::clone(session.value())
    }

    /// Returns the number of sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
