use std::collections::HashMap;
use std::sync::Arc;
use teloxide::types::UserId;
use tokio::sync::Mutex;

use crate::order::flow::ConversationSession;

/// In-memory session map, shared across handlers.
///
/// The map itself is only locked for point operations, so handlers for
/// different users never contend for long. `user_lock` hands out one mutex
/// per user id; a handler holds it for its whole run, which serializes
/// events from the same user and keeps a session from being edited by two
/// interleaved handlers.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<UserId, ConversationSession>>,
    locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The per-user handler lock. Entries are created on first use and kept
    /// for the process lifetime.
    pub async fn user_lock(&self, user_id: UserId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub async fn get(&self, user_id: UserId) -> Option<ConversationSession> {
        self.sessions.lock().await.get(&user_id).cloned()
    }

    /// Inserts or replaces the user's session. Replacing an in-flight
    /// session is the documented restart-mid-flow behavior, not an error.
    pub async fn set(&self, user_id: UserId, session: ConversationSession) {
        self.sessions.lock().await.insert(user_id, session);
    }

    pub async fn remove(&self, user_id: UserId) -> Option<ConversationSession> {
        self.sessions.lock().await.remove(&user_id)
    }
}
