// Process-wide session registry.
//
// Sessions live behind their own mutex so operations on one id are
// serialized while other ids proceed. The map itself is never handed out.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use ttt_shared::{SessionId, SessionSnapshot, SessionStatus};

use crate::error::GameError;
use crate::game::Session;

pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Default)]
struct Inner {
    sessions: HashMap<SessionId, SessionHandle>,
    // insertion order, for stable listing
    order: Vec<SessionId>,
}

#[derive(Default)]
pub struct SessionRegistry {
    inner: RwLock<Inner>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session under its own id and return its handle.
    pub async fn insert(&self, session: Session) -> SessionHandle {
        let id = session.id().clone();
        let handle = Arc::new(Mutex::new(session));
        let mut inner = self.inner.write().await;
        if inner.sessions.insert(id.clone(), handle.clone()).is_none() {
            inner.order.push(id);
        }
        handle
    }

    pub async fn get(&self, id: &SessionId) -> Result<SessionHandle, GameError> {
        self.inner
            .read()
            .await
            .sessions
            .get(id)
            .cloned()
            .ok_or(GameError::NotFound)
    }

    /// Handles of all sessions in insertion order.
    async fn handles(&self) -> Vec<SessionHandle> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.sessions.get(id).cloned())
            .collect()
    }

    /// Snapshots of all sessions in insertion order.
    pub async fn snapshots(&self) -> Vec<SessionSnapshot> {
        let mut out = Vec::new();
        for handle in self.handles().await {
            out.push(handle.lock().await.snapshot());
        }
        out
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remove concluded sessions whose conclusion is older than `cutoff`.
    ///
    /// Concluded sessions never change again, so the decision made while
    /// scanning still holds when the write lock is taken.
    pub async fn evict_concluded_before(&self, cutoff: DateTime<Utc>) -> Vec<SessionId> {
        let mut expired = Vec::new();
        for handle in self.handles().await {
            let session = handle.lock().await;
            if session.status() == SessionStatus::Concluded
                && session.concluded_at().is_some_and(|at| at < cutoff)
            {
                expired.push(session.id().clone());
            }
        }
        if expired.is_empty() {
            return expired;
        }

        let mut inner = self.inner.write().await;
        for id in &expired {
            inner.sessions.remove(id);
        }
        inner.order.retain(|id| !expired.contains(id));
        expired
    }
}
