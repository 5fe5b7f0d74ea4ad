use anyhow::Context;
use tokensmith::{config::DbConfig, db, users::PgUserStore};

const EMAILS: [&str; 3] = ["admin@example.com", "user@example.com", "guest@example.com"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tokensmith::init_tracing();

    let cfg = DbConfig {
        url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
        max_connections: 2,
        max_idle_secs: 10,
        query_timeout_secs: 5,
    };
    let pool = db::connect(&cfg).await?;
    db::migrate(&pool).await?;

    let users = PgUserStore::new(pool, cfg.query_timeout())
        .create_many(&EMAILS)
        .await
        .context("seed users")?;

    for user in &users {
        tracing::info!(user_id = %user.id, email = %user.email, "user seeded");
    }
    tracing::info!(count = users.len(), "seeding complete");
    Ok(())
}
