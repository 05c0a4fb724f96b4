//! inventory-catalog server binary.
//!
//! Configuration is read from the environment (see `config`). Without
//! `DATABASE_URL` the server runs on the in-memory store.

use std::sync::Arc;

use anyhow::{Context, Result};
use catalog_core::memory::MemoryStore;
use catalog_core::service::{CatalogService, CatalogServiceImpl};
use inventory_catalog::build_router;
use inventory_catalog::config::ServerConfig;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,inventory_catalog=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let service = build_service(&config).await?;
    let app = build_router(service);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!("inventory-catalog listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

fn memory_service() -> Arc<dyn CatalogService> {
    let store = Arc::new(MemoryStore::new());
    Arc::new(CatalogServiceImpl::new(store.clone(), store.clone(), store))
}

#[cfg(feature = "database")]
async fn build_service(config: &ServerConfig) -> Result<Arc<dyn CatalogService>> {
    use catalog_postgres::PgStores;
    use sqlx::postgres::PgPoolOptions;

    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; using the in-memory store, data will not persist");
        return Ok(memory_service());
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to database")?;
    tracing::info!("Connected to database");

    if config.run_migrations {
        catalog_postgres::migrate(&pool)
            .await
            .context("failed to apply migrations")?;
        tracing::info!("Migrations applied");
    }

    let stores = PgStores::new(pool);
    Ok(Arc::new(CatalogServiceImpl::new(
        Arc::new(stores.categories),
        Arc::new(stores.products),
        Arc::new(stores.skus),
    )))
}

#[cfg(not(feature = "database"))]
async fn build_service(config: &ServerConfig) -> Result<Arc<dyn CatalogService>> {
    if config.database_url.is_some() {
        tracing::warn!("DATABASE_URL ignored: built without the `database` feature");
    }
    tracing::warn!("using the in-memory store, data will not persist");
    Ok(memory_service())
}
