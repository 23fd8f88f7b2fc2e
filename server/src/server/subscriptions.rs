// Observer registry: which live connections want updates for which session.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use ttt_shared::{ServerMsg, SessionId};

pub type ConnectionId = u64;

#[derive(Default)]
struct Inner {
    by_session: HashMap<SessionId, HashMap<ConnectionId, UnboundedSender<ServerMsg>>>,
    by_connection: HashMap<ConnectionId, SessionId>,
}

impl Inner {
    fn detach(&mut self, conn: ConnectionId) -> Option<SessionId> {
        let session_id = self.by_connection.remove(&conn)?;
        if let Some(subs) = self.by_session.get_mut(&session_id) {
            subs.remove(&conn);
            if subs.is_empty() {
                self.by_session.remove(&session_id);
            }
        }
        Some(session_id)
    }
}

/// Each connection follows at most one session at a time.
#[derive(Default)]
pub struct Subscriptions {
    inner: Mutex<Inner>,
    next_id: AtomicU64,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_connection_id(&self) -> ConnectionId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Attach `conn` to `session_id`, replacing any previous session.
    pub async fn subscribe(
        &self,
        conn: ConnectionId,
        session_id: SessionId,
        tx: UnboundedSender<ServerMsg>,
    ) {
        let mut inner = self.inner.lock().await;
        inner.detach(conn);
        inner
            .by_session
            .entry(session_id.clone())
            .or_default()
            .insert(conn, tx);
        inner.by_connection.insert(conn, session_id);
    }

    pub async fn unsubscribe(&self, conn: ConnectionId) -> Option<SessionId> {
        self.inner.lock().await.detach(conn)
    }

    /// Send `msg` to every subscriber of `session_id`.
    ///
    /// Closed connections are skipped and forgotten. Returns how many
    /// connections the message was handed to.
    pub async fn publish(&self, session_id: &SessionId, msg: &ServerMsg) -> usize {
        let mut inner = self.inner.lock().await;
        let Some(subs) = inner.by_session.get(session_id) else {
            return 0;
        };

        let mut delivered = 0;
        let mut closed = Vec::new();
        for (conn, tx) in subs {
            if tx.send(msg.clone()).is_ok() {
                delivered += 1;
            } else {
                closed.push(*conn);
            }
        }
        for conn in closed {
            tracing::debug!(conn, session = %session_id, "dropping closed subscriber");
            inner.detach(conn);
        }
        delivered
    }

    /// Forget every subscription to `session_id`.
    pub async fn drop_session(&self, session_id: &SessionId) {
        let mut inner = self.inner.lock().await;
        if let Some(subs) = inner.by_session.remove(session_id) {
            for conn in subs.keys() {
                inner.by_connection.remove(conn);
            }
        }
    }

    pub async fn subscriber_count(&self, session_id: &SessionId) -> usize {
        self.inner
            .lock()
            .await
            .by_session
            .get(session_id)
            .map_or(0, HashMap::len)
    }
}
