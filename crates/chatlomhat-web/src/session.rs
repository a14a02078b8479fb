//! Per-visitor form state.
//!
//! A visitor is identified by a UUID carried in a hidden `session` field. The
//! map lock is only held for synchronous updates, never across a backend call.

use std::collections::HashMap;

use chatlomhat_client::{ConnectivityStatus, ExerciseGenerator, SolverForm};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug)]
pub struct UiSession {
    pub solver: SolverForm,
    pub exercises: ExerciseGenerator,
    pub connectivity: ConnectivityStatus,
    /// A health probe for this session is in flight.
    pub probing: bool,
    last_seen: DateTime<Utc>,
}

impl Default for UiSession {
    fn default() -> Self {
        Self {
            solver: SolverForm::new(),
            exercises: ExerciseGenerator::new(),
            connectivity: ConnectivityStatus::Checking,
            probing: false,
            last_seen: Utc::now(),
        }
    }
}

pub const DEFAULT_MAX_SESSIONS: usize = 1_000;

pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, UiSession>>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::hours(1), DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Run `f` against the session, creating it on first use.
    /// Idle sessions are dropped on the way, and past the cap the least
    /// recently seen ones go too.
    pub async fn with<R>(&self, id: Uuid, f: impl FnOnce(&mut UiSession) -> R) -> R {
        let mut sessions = self.sessions.lock().await;
        let now = Utc::now();
        let ttl = self.idle_ttl;
        sessions.retain(|sid, session| *sid == id || now - session.last_seen < ttl);

        if !sessions.contains_key(&id) {
            while sessions.len() >= self.max_sessions {
                let oldest = sessions
                    .iter()
                    .min_by_key(|(_, session)| session.last_seen)
                    .map(|(sid, _)| *sid);
                match oldest {
                    Some(sid) => {
                        tracing::debug!(session = %sid, "Evicting least recently seen UI session");
                        sessions.remove(&sid);
                    }
                    None => break,
                }
            }
        }

        let session = sessions.entry(id).or_default();
        session.last_seen = now;
        f(session)
    }

    /// Like [`with`](Self::with) but never creates a session. Background work
    /// uses this so an evicted visitor is not brought back.
    pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut UiSession) -> R) -> Option<R> {
        self.sessions.lock().await.get_mut(&id).map(f)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

pub fn parse_session(raw: Option<&str>) -> Option<Uuid> {
    raw.and_then(|s| Uuid::parse_str(s.trim()).ok())
}

/// Parse the hidden session field, minting a fresh id when absent or malformed.
pub fn session_id(raw: Option<&str>) -> Uuid {
    parse_session(raw).unwrap_or_else(Uuid::new_v4)
}
