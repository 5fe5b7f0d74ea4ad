use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{claims::AccessClaims, extractors::AuthSession};
use crate::{
    error::AppError,
    notify::{self, Notification},
    sessions::Session,
    state::AppState,
    users::User,
};

/// Result of a successful issuance.
#[derive(Debug)]
pub struct IssuedTokens {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of a successful refresh.
#[derive(Debug)]
pub struct RotatedTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issue an access/refresh pair for `user_id`, replacing any prior session
/// of that user. Nothing is persisted unless every token was minted and hashed.
pub async fn issue_tokens(
    state: &AppState,
    user_id: Option<&str>,
    address: &str,
) -> Result<IssuedTokens, AppError> {
    let user_id = user_id
        .filter(|id| !id.is_empty())
        .ok_or(AppError::MissingParameter("user_id"))?;

    let user = state.storage.users.get_by_id(user_id).await?;

    let access_token = mint_access_token(state, user.id, address)?;
    let (refresh_token, refresh_token_hash) = mint_refresh_token(state).await?;

    state
        .storage
        .sessions
        .upsert(&Session::new(user.id, refresh_token_hash))
        .await?;

    info!(user_id = %user.id, %address, "tokens issued");
    Ok(IssuedTokens {
        user,
        access_token,
        refresh_token,
    })
}

/// Exchange the presented refresh token for a new pair. The stored hash is
/// overwritten before returning, so the presented token cannot be used again.
pub async fn refresh_tokens(
    state: &AppState,
    auth: &AuthSession,
    presented: Option<&str>,
    address: &str,
) -> Result<RotatedTokens, AppError> {
    let presented = presented
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingCredential("refresh token"))?;

    let user = &auth.user;
    let mut session = state.storage.sessions.get_by_user_id(user.id).await?;

    let matches = state
        .hasher
        .verify_async(session.refresh_token_hash.clone(), presented.to_string())
        .await?;
    if !matches {
        warn!(user_id = %user.id, "refresh token mismatch");
        return Err(AppError::RefreshTokenMismatch);
    }

    if auth.issued_address != address {
        warn!(
            user_id = %user.id,
            issued = %auth.issued_address,
            current = %address,
            "client address changed since issuance"
        );
        notify::dispatch(
            state.notifier.clone(),
            Notification::address_changed(&user.email, &auth.issued_address, address),
        );
    }

    let access_token = mint_access_token(state, user.id, address)?;
    let (refresh_token, refresh_token_hash) = mint_refresh_token(state).await?;

    session.refresh_token_hash = refresh_token_hash;
    state.storage.sessions.upsert(&session).await?;

    info!(user_id = %user.id, %address, "tokens refreshed");
    Ok(RotatedTokens {
        access_token,
        refresh_token,
    })
}

fn mint_access_token(state: &AppState, user_id: Uuid, address: &str) -> Result<String, AppError> {
    let claims = AccessClaims::new(user_id, address, state.config.jwt.access_ttl());
    Ok(state.authenticator.generate_access_token(&claims)?)
}

async fn mint_refresh_token(state: &AppState) -> Result<(String, String), AppError> {
    let token = state.authenticator.generate_refresh_token()?;
    let hash = state.hasher.hash_async(token.clone()).await?;
    debug!("refresh token minted");
    Ok((token, hash))
}
