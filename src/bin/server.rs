use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pokequiz_engine::http::{router, AppState};
use pokequiz_engine::{
    CachedItemProvider, PokeApiCatalog, QuizConfig, QuizEngine, SqliteScoreStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pokequiz_server=debug,pokequiz_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = QuizConfig::from_env();

    tracing::info!("Starting PokeQuiz server");
    tracing::info!("Database: {}", config.db_path);
    tracing::info!("Catalog: {}", config.pokeapi_url);

    let catalog = PokeApiCatalog::new(&config.pokeapi_url, config.http_timeout())?;
    let items = CachedItemProvider::new(Arc::new(catalog), config.cache_settings());
    let scores = SqliteScoreStore::new(&config.db_path).await?;

    let engine = QuizEngine::new(Arc::new(items), Arc::new(scores));

    let stats = engine.score_stats().await?;
    tracing::info!("Leaderboard holds {} games", stats.total_games);
    let app = router(AppState::new(engine));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
