use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Server-side record binding a user to the hash of their current refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing)]
    pub refresh_token_hash: String,
}

impl Session {
    pub fn new(user_id: Uuid, refresh_token_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            refresh_token_hash,
        }
    }
}
