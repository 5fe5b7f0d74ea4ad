use std::net::{IpAddr, SocketAddr};

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use crate::{error::AppError, state::AppState, users::User};

/// Identity established by a valid access token, threaded through the
/// refresh workflow.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    /// Client address bound into the token when it was issued.
    pub issued_address: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("authorization header is missing".into()))?;

        // Expect exactly "Bearer <token>"
        let token = header
            .to_str()
            .ok()
            .and_then(|v| v.split_once(' '))
            .filter(|(scheme, token)| *scheme == "Bearer" && !token.is_empty() && !token.contains(' '))
            .map(|(_, token)| token)
            .ok_or_else(|| AppError::Unauthorized("authorization header is malformed".into()))?;

        let claims = state
            .authenticator
            .validate_access_token(token)
            .map_err(|e| {
                warn!(error = %e, "access token rejected");
                AppError::from(e)
            })?;

        let user = state.storage.users.get_by_id(&claims.sub).await?;

        Ok(AuthSession {
            user,
            issued_address: claims.ip_address,
        })
    }
}

/// IP address of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

#[async_trait]
impl FromRequestParts<AppState> for ClientAddr {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.config.http.trust_proxy_headers {
            if let Some(ip) = forwarded_ip(&parts.headers) {
                return Ok(ClientAddr(ip.to_string()));
            }
        }

        let ConnectInfo(addr) = ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Internal("client address unavailable".into()))?;
        Ok(ClientAddr(addr.ip().to_string()))
    }
}

/// `X-Real-IP`, else the first hop of `X-Forwarded-For`.
fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let parse = |v: &str| v.trim().parse::<IpAddr>().ok();

    if let Some(ip) = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(parse)
    {
        return Some(ip);
    }

    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_ip_prefers_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.9, 10.0.0.1"));
        assert_eq!(forwarded_ip(&headers), Some("10.0.0.9".parse().unwrap()));

        headers.insert("x-real-ip", HeaderValue::from_static("192.168.1.4"));
        assert_eq!(forwarded_ip(&headers), Some("192.168.1.4".parse().unwrap()));
    }

    #[test]
    fn forwarded_ip_ignores_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("not-an-ip"));
        assert_eq!(forwarded_ip(&headers), None);
        assert_eq!(forwarded_ip(&HeaderMap::new()), None);
    }
}
