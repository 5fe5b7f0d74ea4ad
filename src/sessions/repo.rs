use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Session, SessionStore};
use crate::storage::{with_timeout, StoreError};

#[derive(Clone)]
pub struct PgSessionStore {
    db: PgPool,
    timeout: Duration,
}

impl PgSessionStore {
    pub fn new(db: PgPool, timeout: Duration) -> Self {
        Self { db, timeout }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn upsert(&self, session: &Session) -> Result<(), StoreError> {
        with_timeout(self.timeout, async {
            sqlx::query(
                r#"
                INSERT INTO sessions (id, user_id, refresh_token_hash)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id)
                DO UPDATE SET refresh_token_hash = EXCLUDED.refresh_token_hash,
                              updated_at = now()
                "#,
            )
            .bind(session.id)
            .bind(session.user_id)
            .bind(&session.refresh_token_hash)
            .execute(&self.db)
            .await?;
            Ok::<_, StoreError>(())
        })
        .await
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> Result<Session, StoreError> {
        with_timeout(self.timeout, async {
            sqlx::query_as::<_, Session>(
                r#"
                SELECT id, user_id, refresh_token_hash
                FROM sessions
                WHERE user_id = $1
                "#,
            )
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(StoreError::SessionNotFound)
        })
        .await
    }

    async fn delete(&self, session_id: Uuid) -> Result<(), StoreError> {
        with_timeout(self.timeout, async {
            sqlx::query("DELETE FROM sessions WHERE id = $1")
                .bind(session_id)
                .execute(&self.db)
                .await?;
            Ok::<_, StoreError>(())
        })
        .await
    }
}
