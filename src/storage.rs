use std::{future::Future, sync::Arc, time::Duration};

use sqlx::PgPool;
use thiserror::Error;

use crate::{
    sessions::{MemorySessionStore, PgSessionStore, SessionStore},
    users::{MemoryUserStore, PgUserStore, UserDirectory},
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid user id")]
    InvalidUserId,
    #[error("user not found")]
    UserNotFound,
    #[error("session not found")]
    SessionNotFound,
    #[error("a user with that email already exists")]
    DuplicateEmail,
    #[error("invalid email")]
    InvalidEmail,
    #[error("query timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Bounds a store call by `limit`; the future is dropped on expiry.
pub(crate) async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}

/// Backends the lifecycle workflows persist through.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserDirectory>,
    pub sessions: Arc<dyn SessionStore>,
}

impl Storage {
    pub fn postgres(db: PgPool, query_timeout: Duration) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(db.clone(), query_timeout)),
            sessions: Arc::new(PgSessionStore::new(db, query_timeout)),
        }
    }

    pub fn memory() -> Self {
        Self {
            users: Arc::new(MemoryUserStore::default()),
            sessions: Arc::new(MemorySessionStore::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn with_timeout_passes_through_result() {
        let ok = with_timeout(Duration::from_secs(1), async { Ok::<_, StoreError>(7) })
            .await
            .unwrap();
        assert_eq!(ok, 7);

        let err = with_timeout(Duration::from_secs(1), async {
            Err::<(), _>(StoreError::UserNotFound)
        })
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::UserNotFound));
    }

    #[tokio::test(start_paused = true)]
    async fn with_timeout_surfaces_timeout() {
        let err = with_timeout(Duration::from_secs(5), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, StoreError>(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::Timeout(_)));
        assert!(err.to_string().contains("timed out"));
    }
}
