use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::DbConfig;

pub async fn connect(cfg: &DbConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .idle_timeout(Duration::from_secs(cfg.max_idle_secs))
        .acquire_timeout(cfg.query_timeout())
        .connect(&cfg.url)
        .await
        .context("connect to database")?;

    sqlx::query("SELECT 1")
        .execute(&db)
        .await
        .context("ping database")?;
    tracing::info!("database connection pool established");
    Ok(db)
}

pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    Ok(())
}
