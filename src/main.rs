//! Architekt kúziel - content management backend with AI assistants

use anyhow::Result;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use architekt::{
    api::{self, AppState},
    cache::create_cache,
    config::Config,
    db,
};

/// How often expired sessions and stale rate-limit windows are dropped
const CLEANUP_INTERVAL_SECS: u64 = 300;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "architekt=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Architekt kúziel...");

    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    let pending = db::migrations::pending_count(&pool).await?;
    let applied = db::migrations::run_migrations(&pool).await?;
    if !db::migrations::is_up_to_date(&pool).await? {
        anyhow::bail!("Database schema is still behind after applying {} migrations", applied);
    }
    let total = db::migrations::total_migrations();
    match i32::try_from(total).ok().and_then(db::migrations::get_migration) {
        Some(latest) => tracing::info!(
            "Database schema at version {} ({}), applied {} of {} pending migrations",
            latest.version,
            latest.name,
            applied,
            pending
        ),
        None => tracing::info!("Database migrations completed ({} known)", total),
    }

    let cache = create_cache(&config.cache).await?;
    tracing::info!("Cache initialized");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, pool, cache)?;

    let seeded = state.tag_service.init_defaults().await?;
    if seeded > 0 {
        tracing::info!("Default tags created");
    }

    if state.enhanced_ai_service.is_remote() {
        tracing::info!(
            "Enhanced AI uses remote providers (preferred: {})",
            state.enhanced_ai_service.preferred_provider().await
        );
    } else {
        tracing::info!("Enhanced AI runs in local mode");
    }

    {
        let users = state.user_service.clone();
        let limiter = state.rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(CLEANUP_INTERVAL_SECS));
            loop {
                interval.tick().await;
                limiter.cleanup().await;
                match users.cleanup_expired_sessions().await {
                    Ok(0) => {}
                    Ok(n) => tracing::debug!("Removed {} expired sessions", n),
                    Err(e) => tracing::warn!("Session cleanup failed: {}", e),
                }
            }
        });
    }

    let app = api::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
