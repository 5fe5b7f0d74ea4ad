use async_trait::async_trait;
use uuid::Uuid;

use crate::storage::StoreError;

mod memory;
mod repo;
mod repo_types;

pub use memory::MemorySessionStore;
pub use repo::PgSessionStore;
pub use repo_types::Session;

/// Holds at most one session per user, keyed on `user_id`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a session for `session.user_id`, or replace the hash of the existing one.
    async fn upsert(&self, session: &Session) -> Result<(), StoreError>;
    async fn get_by_user_id(&self, user_id: Uuid) -> Result<Session, StoreError>;
    /// No error when the session is already gone.
    async fn delete(&self, session_id: Uuid) -> Result<(), StoreError>;
}
