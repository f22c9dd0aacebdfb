//! Funnel session management
//!
//! One [`Session`] per visitor, holding their funnel state machine plus
//! activity bookkeeping. The manager bounds concurrent sessions and sweeps
//! idle ones; removal drops the funnel, which cancels any in-flight
//! simulated dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use uuid::Uuid;

use funnel_engine::Funnel;

use crate::ServerError;

/// One visitor's funnel session
pub struct Session {
    pub funnel: Funnel,
    created_at: Instant,
    last_activity: RwLock<Instant>,
}

impl Session {
    fn new(funnel: Funnel) -> Self {
        let now = Instant::now();
        Self {
            funnel,
            created_at: now,
            last_activity: RwLock::new(now),
        }
    }

    pub fn id(&self) -> Uuid {
        self.funnel.id()
    }

    /// Record activity
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    pub fn is_expired(&self, idle_timeout: Duration) -> bool {
        self.last_activity.read().elapsed() > idle_timeout
    }
}

/// Bounded funnel session registry
pub struct SessionManager {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
    max_sessions: usize,
}

impl SessionManager {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
        }
    }

    /// Register a fresh funnel
    pub fn create(&self, funnel: Funnel) -> Result<Arc<Session>, ServerError> {
        let mut sessions = self.sessions.write();
        if sessions.len() >= self.max_sessions {
            return Err(ServerError::Capacity);
        }
        let session = Arc::new(Session::new(funnel));
        sessions.insert(session.id(), Arc::clone(&session));
        Ok(session)
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        self.sessions.read().get(&id).cloned()
    }

    /// Remove a session; dropping it cancels pending simulated work
    pub fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().remove(&id).is_some()
    }

    pub fn list_ids(&self) -> Vec<Uuid> {
        self.sessions.read().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Drop sessions idle past the timeout; returns how many were removed
    pub fn sweep_expired(&self, idle_timeout: Duration) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(idle_timeout));
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = sessions.len(), "swept idle funnel sessions");
        }
        removed
    }
}
