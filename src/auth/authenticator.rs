use std::sync::atomic::{AtomicU64, Ordering};

use base64ct::{Base64, Encoding};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;
use tracing::debug;

use super::claims::AccessClaims;
use crate::config::MIN_JWT_SECRET_BYTES;

/// Refresh tokens carry 256 bits of entropy.
const REFRESH_TOKEN_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign access token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("invalid access token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("failed to generate refresh token: {0}")]
    Entropy(#[source] rand::Error),
    #[error("signing key is too short")]
    WeakKey,
}

pub trait Authenticator: Send + Sync {
    fn generate_access_token(&self, claims: &AccessClaims) -> Result<String, TokenError>;
    fn validate_access_token(&self, token: &str) -> Result<AccessClaims, TokenError>;
    fn generate_refresh_token(&self) -> Result<String, TokenError>;
}

/// HS512 signer used in production.
pub struct JwtAuthenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(TokenError::WeakKey);
        }
        let mut validation = Validation::new(Algorithm::HS512);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.validate_exp = true;
        validation.leeway = 0;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }
}

impl Authenticator for JwtAuthenticator {
    fn generate_access_token(&self, claims: &AccessClaims) -> Result<String, TokenError> {
        let token = encode(&Header::new(Algorithm::HS512), claims, &self.encoding)
            .map_err(TokenError::Signing)?;
        debug!(user_id = %claims.sub, "access token signed");
        Ok(token)
    }

    fn validate_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let data = decode::<AccessClaims>(token, &self.decoding, &self.validation)
            .map_err(TokenError::Invalid)?;
        debug!(user_id = %data.claims.sub, "access token verified");
        Ok(data.claims)
    }

    fn generate_refresh_token(&self) -> Result<String, TokenError> {
        let mut buf = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.try_fill_bytes(&mut buf).map_err(TokenError::Entropy)?;
        Ok(Base64::encode_string(&buf))
    }
}

const TEST_SECRET: &str = "test";

/// Fixed-key authenticator for tests. Expiry is not enforced and refresh
/// tokens are predictable but never repeat.
#[derive(Default)]
pub struct TestAuthenticator {
    issued: AtomicU64,
}

impl TestAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Authenticator for TestAuthenticator {
    fn generate_access_token(&self, claims: &AccessClaims) -> Result<String, TokenError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .map_err(TokenError::Signing)
    }

    fn validate_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(TEST_SECRET.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(TokenError::Invalid)
    }

    fn generate_refresh_token(&self) -> Result<String, TokenError> {
        let n = self.issued.fetch_add(1, Ordering::Relaxed);
        Ok(format!("test-refresh-token-{n}"))
    }
}
