use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::error;

use crate::config::HashConfig;

#[derive(Debug, Error)]
#[error("hashing failed: {0}")]
pub struct HashingFailure(String);

/// Argon2id hasher for secrets kept at rest (refresh tokens).
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    pub fn new(cfg: &HashConfig) -> Result<Self, HashingFailure> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| HashingFailure(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, secret: &str) -> Result<String, HashingFailure> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                HashingFailure(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// `false` on mismatch and on a stored hash that does not parse.
    pub fn verify(&self, hash: &str, candidate: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        self.argon2
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }

    /// [`hash`](Self::hash) on the blocking pool.
    pub async fn hash_async(&self, secret: String) -> Result<String, HashingFailure> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| HashingFailure(format!("hash task panicked: {e}")))?
    }

    pub async fn verify_async(
        &self,
        hash: String,
        candidate: String,
    ) -> Result<bool, HashingFailure> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &candidate))
            .await
            .map_err(|e| HashingFailure(format!("verify task panicked: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> CredentialHasher {
        CredentialHasher::new(&HashConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("valid params")
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = cheap();
        let secret = "q9HkT1r0J9mVd7c2sXbYlA4eWn5uPz8oKjRtFgHcS3M=";
        let hash = hasher.hash(secret).expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(&hash, secret));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let hasher = cheap();
        let hash = hasher.hash("correct-horse-battery-staple").unwrap();
        assert!(!hasher.verify(&hash, "wrong-secret"));
    }

    #[test]
    fn verify_is_false_on_malformed_hash() {
        assert!(!cheap().verify("not-a-valid-hash", "anything"));
        assert!(!cheap().verify("", "anything"));
    }

    #[test]
    fn same_secret_hashes_differently() {
        let hasher = cheap();
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify(&a, "same") && hasher.verify(&b, "same"));
    }

    #[tokio::test]
    async fn async_variants_run_on_blocking_pool() {
        let hasher = cheap();
        let hash = hasher.hash_async("rotated".to_string()).await.unwrap();
        assert!(hasher
            .verify_async(hash.clone(), "rotated".to_string())
            .await
            .unwrap());
        assert!(!hasher
            .verify_async(hash, "replayed".to_string())
            .await
            .unwrap());
        assert!(!hasher
            .verify_async("garbage".to_string(), "rotated".to_string())
            .await
            .unwrap());
    }

    #[test]
    fn new_rejects_invalid_params() {
        let err = CredentialHasher::new(&HashConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(err.is_err());
    }
}
