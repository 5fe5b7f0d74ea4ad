use crate::state::AppState;
use axum::Router;

pub mod authenticator;
mod claims;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod hasher;
pub mod services;

pub use authenticator::{Authenticator, JwtAuthenticator, TestAuthenticator, TokenError};
pub use claims::AccessClaims;
pub use hasher::CredentialHasher;

/// Name of the cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token";

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
