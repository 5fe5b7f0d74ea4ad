use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// JWT payload of an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    pub sub: String,        // user ID
    pub ip_address: String, // client address at issuance
    pub iat: i64,           // issued at (unix timestamp)
    pub exp: i64,           // expires at (unix timestamp)
    pub jti: Uuid,          // token ID
}

impl AccessClaims {
    pub fn new(user_id: Uuid, ip_address: impl Into<String>, ttl: Duration) -> Self {
        let now = OffsetDateTime::now_utc();
        let exp = now + time::Duration::seconds(ttl.as_secs() as i64);
        Self {
            sub: user_id.to_string(),
            ip_address: ip_address.into(),
            iat: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
            jti: Uuid::new_v4(),
        }
    }
}
