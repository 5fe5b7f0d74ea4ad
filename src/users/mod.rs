use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::storage::StoreError;

mod memory;
mod repo;
mod repo_types;

pub use memory::MemoryUserStore;
pub use repo::PgUserStore;
pub use repo_types::User;

/// Resolves user identities.
///
/// Every backend rejects a syntactically invalid id with
/// [`StoreError::InvalidUserId`] before looking anything up, so malformed
/// ids fail the same way whether or not some key happens to match.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Result<User, StoreError>;
    async fn create(&self, email: &str) -> Result<User, StoreError>;
}

pub(crate) fn parse_user_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id).map_err(|_| StoreError::InvalidUserId)
}

pub(crate) fn normalize_email(email: &str) -> Result<String, StoreError> {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    let email = email.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(StoreError::InvalidEmail);
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_user_id_accepts_uuid_only() {
        assert!(parse_user_id("86990727-379a-42ea-a71d-69179969e777").is_ok());
        assert!(matches!(
            parse_user_id("not-a-uuid"),
            Err(StoreError::InvalidUserId)
        ));
        assert!(matches!(parse_user_id(""), Err(StoreError::InvalidUserId)));
    }

    #[test]
    fn normalize_email_lowercases_and_validates() {
        assert_eq!(normalize_email("  A@X.com ").unwrap(), "a@x.com");
        assert!(matches!(
            normalize_email("nope"),
            Err(StoreError::InvalidEmail)
        ));
    }
}
