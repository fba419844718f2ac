//! In-memory session store.
//!
//! Maps session id → current `WorkflowState` for the lifetime of the
//! process. No expiry and no per-session serialization of callers:
//! overlapping requests for the same session id race on the shared state,
//! so callers must not issue concurrent requests for one session.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::workflow::state::WorkflowState;

/// Injectable key-value store for workflow sessions. Cloning shares the
/// underlying map.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, WorkflowState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fresh state under a new session id.
    pub async fn create(&self, state: WorkflowState) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .await
            .insert(session_id.clone(), state);
        session_id
    }

    /// Clone out the current state for a session.
    pub async fn get(&self, session_id: &str) -> Option<WorkflowState> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Replace the stored state for a session.
    pub async fn put(&self, session_id: &str, state: WorkflowState) {
        self.sessions
            .write()
            .await
            .insert(session_id.to_string(), state);
    }

    /// Remove a session; returns whether it existed.
    pub async fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
