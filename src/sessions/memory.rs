use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Session, SessionStore};
use crate::storage::StoreError;

/// In-process session store keyed by user id.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl MemorySessionStore {
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn upsert(&self, session: &Session) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session.user_id)
            .and_modify(|s| s.refresh_token_hash = session.refresh_token_hash.clone())
            .or_insert_with(|| session.clone());
        Ok(())
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> Result<Session, StoreError> {
        self.sessions
            .read()
            .await
            .get(&user_id)
            .cloned()
            .ok_or(StoreError::SessionNotFound)
    }

    async fn delete(&self, session_id: Uuid) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .retain(|_, s| s.id != session_id);
        Ok(())
    }
}
