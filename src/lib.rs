//! Access/refresh token issuance and rotation for a single-identity service.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod notify;
pub mod sessions;
pub mod state;
pub mod storage;
pub mod users;

pub fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tokensmith=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}
