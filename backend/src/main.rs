use std::sync::Arc;

use devconnect::{
    create_router, db, get_db_pool, utils, AppState, Config,
    db::{ConnectionStore, MemoryStore, PgStore},
    utils::StoreKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    utils::init_logging();

    let config = Config::from_env()?;
    let store = open_store(config.store).await?;

    let port = config.port;
    let app = create_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Server running on port {}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn open_store(kind: StoreKind) -> anyhow::Result<Arc<dyn ConnectionStore>> {
    match kind {
        StoreKind::Postgres => {
            let db_config = db::DatabaseConfig::from_env()?;
            let pool = get_db_pool(&db_config).await?;

            // Run migrations
            db::migrations::run_migrations(&pool).await?;

            Ok(Arc::new(PgStore::new(pool)))
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store; all data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
