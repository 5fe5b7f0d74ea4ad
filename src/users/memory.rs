use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{normalize_email, parse_user_id, User, UserDirectory};
use crate::storage::StoreError;

/// In-process user directory with the same error semantics as Postgres.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    /// Insert a user with a caller-chosen id.
    pub async fn insert(&self, user: User) -> Result<User, StoreError> {
        let email = normalize_email(&user.email)?;
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = User { id: user.id, email };
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserDirectory for MemoryUserStore {
    async fn get_by_id(&self, id: &str) -> Result<User, StoreError> {
        let id = parse_user_id(id)?;
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::UserNotFound)
    }

    async fn create(&self, email: &str) -> Result<User, StoreError> {
        self.insert(User {
            id: Uuid::new_v4(),
            email: email.to_string(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_by_id_distinguishes_invalid_from_missing() {
        let store = MemoryUserStore::default();
        let user = store.create("test@test.com").await.unwrap();

        assert_eq!(store.get_by_id(&user.id.to_string()).await.unwrap(), user);
        assert!(matches!(
            store.get_by_id("invalid-user-id").await,
            Err(StoreError::InvalidUserId)
        ));
        assert!(matches!(
            store
                .get_by_id("1e2e06f9-a42f-4e9e-a5e0-f2f376e70dc6")
                .await,
            Err(StoreError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let store = MemoryUserStore::default();
        store.create("dup@example.com").await.unwrap();
        assert!(matches!(
            store.create("DUP@example.com").await,
            Err(StoreError::DuplicateEmail)
        ));
    }

    #[tokio::test]
    async fn insert_keeps_given_id() {
        let store = MemoryUserStore::default();
        let id = Uuid::parse_str("86990727-379a-42ea-a71d-69179969e777").unwrap();
        store
            .insert(User {
                id,
                email: "a@x.com".into(),
            })
            .await
            .unwrap();
        let found = store
            .get_by_id("86990727-379a-42ea-a71d-69179969e777")
            .await
            .unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.email, "a@x.com");
    }
}
