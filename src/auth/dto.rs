use serde::{Deserialize, Serialize};

use crate::users::User;

/// Query string of `GET /auth/tokens`.
#[derive(Debug, Deserialize)]
pub struct TokensQuery {
    pub user_id: Option<String>,
}

/// Response returned after issuing tokens: the user record plus the access token.
#[derive(Debug, Serialize)]
pub struct CreateTokensResponse {
    #[serde(flatten)]
    pub user: User,
    pub access_token: String,
}

/// Response returned after a refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}
