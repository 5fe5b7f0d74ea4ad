use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use axum_extra::extract::{
    cookie::{Cookie, CookieJar},
    WithRejection,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{CreateTokensResponse, RefreshResponse, TokensQuery},
        extractors::{AuthSession, ClientAddr},
        services::{issue_tokens, refresh_tokens},
        REFRESH_COOKIE,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/tokens", get(create_tokens))
        .route("/auth/refresh", get(refresh))
}

/// GET /auth/tokens?user_id=<uuid>
#[instrument(skip(state, jar, query))]
pub async fn create_tokens(
    State(state): State<AppState>,
    ClientAddr(address): ClientAddr,
    WithRejection(Query(query), _): WithRejection<Query<TokensQuery>, AppError>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<CreateTokensResponse>), AppError> {
    let issued = issue_tokens(&state, query.user_id.as_deref(), &address).await?;

    let jar = jar.add(refresh_cookie(&state, issued.refresh_token));
    Ok((
        jar,
        Json(CreateTokensResponse {
            user: issued.user,
            access_token: issued.access_token,
        }),
    ))
}

/// GET /auth/refresh, behind a bearer access token.
#[instrument(skip(state, auth, jar), fields(user_id = %auth.user.id))]
pub async fn refresh(
    State(state): State<AppState>,
    auth: AuthSession,
    ClientAddr(address): ClientAddr,
    jar: CookieJar,
) -> Result<(CookieJar, Json<RefreshResponse>), AppError> {
    let presented = jar.get(REFRESH_COOKIE).map(|c| c.value());
    let rotated = refresh_tokens(&state, &auth, presented, &address).await?;

    let jar = jar.add(refresh_cookie(&state, rotated.refresh_token));
    Ok((
        jar,
        Json(RefreshResponse {
            access_token: rotated.access_token,
        }),
    ))
}

fn refresh_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(state.config.http.cookie_secure)
        .build()
}
