use tokensmith::{app, config::AppConfig, db, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tokensmith::init_tracing();

    let config = AppConfig::from_env()?;
    let pool = db::connect(&config.db).await?;
    db::migrate(&pool).await?;

    let http = config.http.clone();
    let state = AppState::init(config, pool)?;
    app::serve(app::build_app(state), &http).await
}
