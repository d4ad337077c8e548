// src/core/session.rs - In-memory session registry with expiry

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::types::{Message, Session};
use crate::infra::clock::{Clock, SystemClock};

/// Shared handle to one session. Lock it only for short, synchronous work.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-wide registry of live sessions.
///
/// Constructed once at startup and shared with the orchestrator. Nothing is
/// persisted; sessions disappear on [`SessionStore::sweep_expired`],
/// [`SessionStore::clear`], or process exit.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionHandle>>,
    clock: Arc<dyn Clock>,
    /// Oldest messages are dropped past this many. `None` means unbounded.
    max_messages: Option<usize>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            clock,
            max_messages: None,
        }
    }

    /// Cap per-session history length.
    pub fn with_max_messages(mut self, max: Option<usize>) -> Self {
        self.max_messages = max.filter(|m| *m > 0);
        self
    }

    /// Fetch the session for `id`, creating it if unknown. A missing or
    /// empty id gets a freshly generated one.
    ///
    /// Check and insert happen under one lock, so concurrent callers with
    /// the same id always share a single session.
    pub fn get_or_create(&self, id: Option<&str>) -> SessionHandle {
        let id = match id.filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };

        let mut sessions = lock(&self.sessions);
        sessions
            .entry(id)
            .or_insert_with_key(|id| {
                tracing::info!(session_id = %id, "Session created");
                Arc::new(Mutex::new(Session::new(id.clone(), self.clock.now())))
            })
            .clone()
    }

    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        lock(&self.sessions).get(id).cloned()
    }

    /// Append a message to the end of the session's history.
    pub fn append(&self, session: &SessionHandle, message: Message) {
        let mut s = lock(session);
        s.messages.push(message);
        if let Some(max) = self.max_messages {
            let excess = s.messages.len().saturating_sub(max);
            if excess > 0 {
                s.messages.drain(..excess);
            }
        }
    }

    /// Remove every session with `now - created_at > retention`.
    /// Returns how many were removed.
    pub fn sweep_expired(&self, now: DateTime<Utc>, retention: Duration) -> usize {
        let mut sessions = lock(&self.sessions);
        let before = sessions.len();
        sessions.retain(|_, handle| now - lock(handle).created_at <= retention);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        lock(&self.sessions).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all sessions. Used at shutdown.
    pub fn clear(&self) {
        lock(&self.sessions).clear();
    }
}
