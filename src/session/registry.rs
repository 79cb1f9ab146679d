//! Registry of connected sessions
//!
//! A session exists while its event stream is open: `connect` creates it and
//! hands back a guard, dropping the guard removes it.

use super::{Session, SessionSnapshot};
use crate::llm::LlmService;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

pub type SessionId = String;

/// Shared handle to one session
#[derive(Clone)]
pub struct SessionHandle {
    pub session: Arc<Mutex<Session>>,
    pub broadcast_tx: broadcast::Sender<SessionSnapshot>,
}

impl SessionHandle {
    /// Push a redraw to the tab. No receiver is not an error.
    pub fn publish(&self, snapshot: SessionSnapshot) {
        let _ = self.broadcast_tx.send(snapshot);
    }
}

pub struct SessionRegistry {
    sessions: Arc<DashMap<SessionId, SessionHandle>>,
    service: Arc<dyn LlmService>,
}

impl SessionRegistry {
    pub fn new(service: Arc<dyn LlmService>) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            service,
        }
    }

    /// Create a session for a newly connected tab
    pub fn connect(&self) -> (SessionId, SessionHandle, SessionGuard) {
        let id = uuid::Uuid::new_v4().to_string();
        let (broadcast_tx, _) = broadcast::channel(32);
        let handle = SessionHandle {
            session: Arc::new(Mutex::new(Session::new(self.service.clone()))),
            broadcast_tx,
        };

        self.sessions.insert(id.clone(), handle.clone());
        tracing::info!(session_id = %id, active = self.len(), "Session opened");

        let guard = SessionGuard {
            id: id.clone(),
            sessions: Arc::clone(&self.sessions),
        };
        (id, handle, guard)
    }

    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

/// Removes its session when dropped
pub struct SessionGuard {
    id: SessionId,
    sessions: Arc<DashMap<SessionId, SessionHandle>>,
}

impl SessionGuard {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.sessions.remove(&self.id).is_some() {
            tracing::info!(
                session_id = %self.id,
                active = self.sessions.len(),
                "Session closed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::MockLlmService;
    use crate::session::SamplingConfig;

    fn registry() -> (SessionRegistry, Arc<MockLlmService>) {
        let mock = Arc::new(MockLlmService::new("mock"));
        (SessionRegistry::new(mock.clone()), mock)
    }

    #[test]
    fn test_connect_and_disconnect() {
        let (registry, _mock) = registry();
        let (id, _handle, guard) = registry.connect();
        assert_eq!(guard.id(), id);
        assert!(registry.get(&id).is_some());
        assert_eq!(registry.len(), 1);

        drop(guard);
        assert!(registry.get(&id).is_none());
        assert_eq!(registry.len(), 0);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let (registry, mock) = registry();
        mock.queue_reply("for a");
        let (a, _ha, _ga) = registry.connect();
        let (b, _hb, _gb) = registry.connect();
        assert_ne!(a, b);

        let handle_a = registry.get(&a).unwrap();
        handle_a
            .session
            .lock()
            .await
            .submit("hello", SamplingConfig::default())
            .await
            .unwrap();

        let handle_b = registry.get(&b).unwrap();
        assert_eq!(handle_a.session.lock().await.transcript().len(), 2);
        assert!(handle_b.session.lock().await.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let (registry, _mock) = registry();
        let (_id, handle, _guard) = registry.connect();
        let mut rx = handle.broadcast_tx.subscribe();

        let snapshot = handle.session.lock().await.snapshot(false);
        handle.publish(snapshot);

        let received = rx.recv().await.unwrap();
        assert!(received.entries.is_empty());
        assert!(!received.awaiting_reply);
    }
}
